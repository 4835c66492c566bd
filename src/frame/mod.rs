//! Per-frame camera transforms and projections.
//!
//! The session refreshes camera pose and intrinsics independently of the
//! host's frame loop. [`FrameTransformPipeline`] latches that data once per
//! frame and converts it into the host's coordinate and clip-space
//! conventions, for one (mono) or two (stereo) views.

mod pipeline;
mod projection;

pub use pipeline::{FrameTransformPipeline, PipelineConfig, SessionFrameState, ViewUniformData};
pub use projection::{perspective, DepthConvention, ViewIntrinsics};

use glam::Quat;

/// Number of independently projected views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Single view (handheld AR).
    #[default]
    Mono,
    /// Two views (headset passthrough or stereo compositing).
    Stereo,
}

impl ViewMode {
    pub fn view_count(&self) -> u32 {
        match self {
            ViewMode::Mono => 1,
            ViewMode::Stereo => 2,
        }
    }
}

/// Physical orientation of the display relative to the camera sensor.
///
/// The sensor's native orientation is landscape-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenOrientation {
    #[default]
    LandscapeRight,
    Portrait,
    LandscapeLeft,
    PortraitUpsideDown,
}

impl ScreenOrientation {
    /// Roll about the camera's view axis that keeps the image upright.
    pub fn roll(&self) -> Quat {
        use std::f32::consts::{FRAC_PI_2, PI};
        match self {
            ScreenOrientation::LandscapeRight => Quat::IDENTITY,
            ScreenOrientation::Portrait => Quat::from_rotation_z(FRAC_PI_2),
            ScreenOrientation::LandscapeLeft => Quat::from_rotation_z(PI),
            ScreenOrientation::PortraitUpsideDown => Quat::from_rotation_z(-FRAC_PI_2),
        }
    }
}
