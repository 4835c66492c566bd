//! Data the session produces each frame.

use std::sync::Arc;

use glam::{Vec2, Vec3};

use crate::anchor::AnchorId;
use crate::frame::{SessionFrameState, ViewIntrinsics};
use crate::image::{EnvironmentMap, ImagePlane, ReferenceImageSet};
use crate::math::Pose;

/// Why session tracking is limited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitedReason {
    Initializing,
    Relocalizing,
    ExcessiveMotion,
    InsufficientFeatures,
}

/// Tracking quality as reported by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionTrackingState {
    #[default]
    NotAvailable,
    Limited(LimitedReason),
    Normal,
}

/// Tracking status exposed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingStatus {
    NormalTracking,
    ExcessiveMotion,
    InsufficientFeatures,
    UnknownTracking,
    #[default]
    NotTracking,
}

impl From<SessionTrackingState> for TrackingStatus {
    fn from(state: SessionTrackingState) -> Self {
        match state {
            SessionTrackingState::Normal => TrackingStatus::NormalTracking,
            SessionTrackingState::Limited(LimitedReason::ExcessiveMotion) => {
                TrackingStatus::ExcessiveMotion
            }
            SessionTrackingState::Limited(LimitedReason::InsufficientFeatures) => {
                TrackingStatus::InsufficientFeatures
            }
            SessionTrackingState::Limited(_) => TrackingStatus::UnknownTracking,
            SessionTrackingState::NotAvailable => TrackingStatus::NotTracking,
        }
    }
}

/// Scene lighting estimated from the camera feed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightEstimate {
    /// Ambient intensity in lumens (1000 is neutral).
    pub ambient_intensity: f32,
    /// Ambient color temperature in Kelvin (6500 is neutral).
    pub ambient_color_temperature: f32,
    /// Camera exposure offset in EV.
    pub exposure_offset: f32,
}

impl Default for LightEstimate {
    fn default() -> Self {
        Self {
            ambient_intensity: 1000.0,
            ambient_color_temperature: 6500.0,
            exposure_offset: 0.0,
        }
    }
}

/// Everything the session reports for its current frame.
#[derive(Debug, Clone, Default)]
pub struct CameraFrame {
    pub timestamp: f64,
    pub camera_pose: Pose,
    pub tracking_state: SessionTrackingState,
    pub intrinsics: [Option<ViewIntrinsics>; 2],
    pub eye_offsets: Option<[Vec3; 2]>,
    pub eye_height: f32,
    /// Display size in pixels, if the session knows it.
    pub display_size: Option<Vec2>,
    /// Camera image planes (1 packed or 2 planar).
    pub image_planes: Option<Vec<ImagePlane>>,
    pub light_estimate: Option<LightEstimate>,
    pub environment_map: Option<EnvironmentMap>,
}

impl CameraFrame {
    pub fn frame_state(&self) -> SessionFrameState {
        SessionFrameState {
            timestamp: self.timestamp,
            camera_pose: self.camera_pose,
            intrinsics: self.intrinsics,
            eye_offsets: self.eye_offsets,
            eye_height: self.eye_height,
        }
    }
}

/// A hit reported by the session's own hit-test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionHit {
    /// Anchor that was hit, if the hit belongs to one.
    pub anchor: Option<AnchorId>,
    /// World pose of the hit point.
    pub pose: Pose,
    /// Distance from the camera in meters.
    pub distance: f32,
}

/// Features requested when (re)running the session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionConfiguration {
    pub plane_detection: bool,
    pub light_estimation: bool,
    pub image_tracking: bool,
    /// Reference images to detect when image tracking is enabled.
    pub reference_images: Option<Arc<ReferenceImageSet>>,
}
