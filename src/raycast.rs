//! Screen-space raycasts against tracked anchors.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::anchor::{AnchorId, AnchorSlot, AnchorTrackingStatus};
use crate::frame::DepthConvention;
use crate::math::Pose;

/// A world-space ray with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Ray from the camera through `screen`, normalized to [0, 1] with the
    /// origin at the top-left.
    ///
    /// `projection` must match `convention`. Returns `None` for a degenerate
    /// projection.
    pub fn from_screen(
        screen: Vec2,
        camera: Pose,
        projection: Mat4,
        convention: DepthConvention,
    ) -> Option<Self> {
        let inv_proj = projection.inverse();
        if !inv_proj.is_finite() {
            return None;
        }
        let ndc = Vec2::new(screen.x * 2.0 - 1.0, 1.0 - screen.y * 2.0);
        let far = inv_proj * Vec4::new(ndc.x, ndc.y, convention.far_ndc(), 1.0);
        if far.w.abs() < f32::EPSILON {
            return None;
        }
        let target = camera.transform_point(far.truncate() / far.w);
        let direction = (target - camera.translation).try_normalize()?;
        Some(Self {
            origin: camera.translation,
            direction,
        })
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// One raycast result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub id: AnchorId,
    /// Hit point with the anchor's orientation.
    pub pose: Pose,
    /// Distance from the ray origin in world units.
    pub distance: f32,
}

/// Intersect `ray` with the local XZ plane of `pose`, limited to a rectangle
/// of `half_extent` around `center` (in the anchor's local space).
pub fn intersect_anchor_plane(
    ray: &Ray,
    pose: &Pose,
    center: Vec3,
    half_extent: Vec2,
) -> Option<f32> {
    let normal = pose.up();
    let denom = normal.dot(ray.direction);
    if denom.abs() < 1e-6 {
        return None;
    }
    let distance = (pose.translation - ray.origin).dot(normal) / denom;
    if distance < 0.0 {
        return None;
    }
    let local = pose.inverse().transform_point(ray.at(distance)) - center;
    (local.x.abs() <= half_extent.x && local.z.abs() <= half_extent.y).then_some(distance)
}

/// Intersect `ray` with every anchor, nearest hit first.
///
/// Anchors without a known extent are treated as a square of
/// `fallback_half_extent` around their origin. Lost anchors are skipped.
pub fn raycast_anchors<'a, I>(ray: &Ray, anchors: I, fallback_half_extent: f32) -> Vec<RaycastHit>
where
    I: IntoIterator<Item = &'a AnchorSlot>,
{
    let mut hits: Vec<RaycastHit> = anchors
        .into_iter()
        .filter_map(|slot| {
            let state = slot.tracker.state();
            if state.status != AnchorTrackingStatus::Tracked {
                return None;
            }
            let (center, half_extent) = state
                .kind
                .bounds()
                .unwrap_or((Vec3::ZERO, Vec2::splat(fallback_half_extent)));
            let distance = intersect_anchor_plane(ray, &state.pose, center, half_extent)?;
            Some(RaycastHit {
                id: slot.id,
                pose: Pose::new(state.pose.rotation, ray.at(distance)),
                distance,
            })
        })
        .collect();
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}
