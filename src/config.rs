//! Bridge configuration.

use glam::Vec2;

use crate::error::ArResult;
use crate::frame::{DepthConvention, PipelineConfig, ScreenOrientation, ViewMode};
use crate::math::Pose;
use crate::present::{LensProfile, PresentationCompositor};

/// Configuration for an [`ArInterface`](crate::ArInterface).
///
/// # Example
///
/// ```
/// use redlilium_ar::{ArConfig, DepthConvention, ViewMode};
///
/// let config = ArConfig::default()
///     .with_max_anchors(64)
///     .with_depth_convention(DepthConvention::ReversedZ)
///     .with_view_mode(ViewMode::Stereo);
/// assert_eq!(config.max_anchors, 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArConfig {
    /// Capacity of the anchor registry.
    pub max_anchors: usize,
    /// Default clip planes, used when a caller passes an invalid range.
    pub z_near: f32,
    pub z_far: f32,
    /// Clip-space depth convention of the host renderer.
    pub depth_convention: DepthConvention,
    pub view_mode: ViewMode,
    /// Eye separation in meters for stereo without device-reported offsets.
    pub interocular_distance: f32,
    /// Transform applied on top of the session camera pose.
    pub head_offset: Pose,
    /// Meters in session space per host world unit.
    pub world_scale: f32,
    /// Display size in pixels.
    pub display_size: Vec2,
    pub orientation: ScreenOrientation,
    /// Half-size in meters of the square used to raycast anchors without an
    /// extent.
    pub raycast_fallback_extent: f32,
    pub lens: Option<LensProfile>,
    /// Render stereo views into layers of one target.
    pub use_layers: bool,
}

impl Default for ArConfig {
    fn default() -> Self {
        Self {
            max_anchors: 32,
            z_near: 0.05,
            z_far: 100.0,
            depth_convention: DepthConvention::ZeroToOne,
            view_mode: ViewMode::Mono,
            interocular_distance: 0.064,
            head_offset: Pose::IDENTITY,
            world_scale: 1.0,
            display_size: Vec2::new(1280.0, 720.0),
            orientation: ScreenOrientation::LandscapeRight,
            raycast_fallback_extent: 0.1,
            lens: None,
            use_layers: false,
        }
    }
}

impl ArConfig {
    pub fn with_max_anchors(mut self, max_anchors: usize) -> Self {
        self.max_anchors = max_anchors;
        self
    }

    pub fn with_clip_planes(mut self, z_near: f32, z_far: f32) -> Self {
        self.z_near = z_near;
        self.z_far = z_far;
        self
    }

    pub fn with_depth_convention(mut self, depth_convention: DepthConvention) -> Self {
        self.depth_convention = depth_convention;
        self
    }

    pub fn with_view_mode(mut self, view_mode: ViewMode) -> Self {
        self.view_mode = view_mode;
        self
    }

    pub fn with_interocular_distance(mut self, distance: f32) -> Self {
        self.interocular_distance = distance;
        self
    }

    pub fn with_head_offset(mut self, head_offset: Pose) -> Self {
        self.head_offset = head_offset;
        self
    }

    pub fn with_world_scale(mut self, world_scale: f32) -> Self {
        self.world_scale = world_scale;
        self
    }

    pub fn with_display_size(mut self, display_size: Vec2) -> Self {
        self.display_size = display_size;
        self
    }

    pub fn with_orientation(mut self, orientation: ScreenOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_raycast_fallback_extent(mut self, extent: f32) -> Self {
        self.raycast_fallback_extent = extent;
        self
    }

    /// Attach a headset lens profile. Fails if the profile is degenerate.
    pub fn with_lens(mut self, lens: LensProfile) -> ArResult<Self> {
        lens.validate()?;
        self.lens = Some(lens);
        Ok(self)
    }

    pub fn with_layers(mut self, use_layers: bool) -> Self {
        self.use_layers = use_layers;
        self
    }

    /// Pipeline settings derived from this configuration.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            view_mode: self.view_mode,
            depth_convention: self.depth_convention,
            orientation: self.orientation,
            head_offset: self.head_offset,
            world_scale: self.world_scale,
            interocular_distance: self.interocular_distance,
            z_near: self.z_near,
            z_far: self.z_far,
            ..PipelineConfig::default()
        }
    }

    pub fn compositor(&self) -> PresentationCompositor {
        PresentationCompositor::new(self.lens, self.use_layers)
    }
}
