//! Engine-facing tracked-object handles.

use std::sync::Arc;

use arc_swap::ArcSwap;
use glam::{Vec2, Vec3};

use super::AnchorId;
use crate::math::Pose;

/// Orientation of a detected plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaneAlignment {
    #[default]
    Horizontal,
    Vertical,
}

/// What kind of feature an anchor tracks.
///
/// Planes and images lie in the anchor's local XZ plane with +Y as normal.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AnchorKind {
    /// A bare point anchor with no known extent.
    #[default]
    Generic,
    /// A detected plane. `center` is the plane center relative to the anchor
    /// origin; `extent` is the full width (X) and depth (Z).
    Plane {
        alignment: PlaneAlignment,
        center: Vec3,
        extent: Vec2,
    },
    /// A detected reference image. `reference_index` points into the
    /// reference image set that seeded detection.
    Image {
        reference_index: usize,
        physical_size: Vec2,
    },
}

impl AnchorKind {
    /// Local-space center and half-extent of the anchor's bounding rectangle,
    /// if the kind carries one.
    pub fn bounds(&self) -> Option<(Vec3, Vec2)> {
        match self {
            AnchorKind::Generic => None,
            AnchorKind::Plane { center, extent, .. } => Some((*center, *extent * 0.5)),
            AnchorKind::Image { physical_size, .. } => Some((Vec3::ZERO, *physical_size * 0.5)),
        }
    }

    pub fn reference_index(&self) -> Option<usize> {
        match self {
            AnchorKind::Image {
                reference_index, ..
            } => Some(*reference_index),
            _ => None,
        }
    }
}

/// Per-anchor tracking status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorTrackingStatus {
    /// The session is currently tracking this anchor.
    Tracked,
    /// The anchor was removed or the session was torn down.
    Lost,
}

/// Snapshot of a tracker's mutable state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorState {
    pub pose: Pose,
    pub kind: AnchorKind,
    pub status: AnchorTrackingStatus,
    /// Number of pose updates applied since creation.
    pub revision: u64,
}

/// Engine-facing representation of a tracked anchor.
///
/// Handles are shared (`Arc<AnchorTracker>`): the registry owns one
/// reference and readers may hold more. Updates publish a whole new state
/// with an atomic swap, so readers always see a consistent snapshot and never
/// block. Writers are serialized by the registry lock.
#[derive(Debug)]
pub struct AnchorTracker {
    id: AnchorId,
    name: String,
    state: ArcSwap<AnchorState>,
}

impl AnchorTracker {
    pub fn new(id: AnchorId, pose: Pose, kind: AnchorKind) -> Self {
        Self {
            id,
            name: format!("Anchor {id}"),
            state: ArcSwap::from_pointee(AnchorState {
                pose,
                kind,
                status: AnchorTrackingStatus::Tracked,
                revision: 0,
            }),
        }
    }

    pub fn id(&self) -> AnchorId {
        self.id
    }

    /// Tracker name exposed to the host ("Anchor <uuid>").
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> AnchorState {
        **self.state.load()
    }

    pub fn pose(&self) -> Pose {
        self.state.load().pose
    }

    pub fn kind(&self) -> AnchorKind {
        self.state.load().kind
    }

    pub fn status(&self) -> AnchorTrackingStatus {
        self.state.load().status
    }

    pub fn is_tracked(&self) -> bool {
        self.status() == AnchorTrackingStatus::Tracked
    }

    /// Replace pose and kind, marking the anchor as tracked.
    pub(crate) fn update(&self, pose: Pose, kind: AnchorKind) {
        self.state.rcu(|state| {
            Arc::new(AnchorState {
                pose,
                kind,
                status: AnchorTrackingStatus::Tracked,
                revision: state.revision + 1,
            })
        });
    }

    pub(crate) fn mark_lost(&self) {
        self.state.rcu(|state| {
            Arc::new(AnchorState {
                status: AnchorTrackingStatus::Lost,
                ..**state
            })
        });
    }
}
