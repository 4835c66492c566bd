//! Frame transform pipeline.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3, Vec4};

use super::{DepthConvention, ScreenOrientation, ViewIntrinsics, ViewMode};
use crate::math::Pose;

/// Settings that shape how session data is mapped into the host's space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    pub view_mode: ViewMode,
    pub depth_convention: DepthConvention,
    pub orientation: ScreenOrientation,
    /// Pre-multiplied onto the session camera pose.
    pub head_offset: Pose,
    /// Meters in session space per host world unit.
    pub world_scale: f32,
    /// Eye separation used for stereo when the device reports no per-eye offsets.
    pub interocular_distance: f32,
    /// Vertical field of view used when the session reports no intrinsics.
    pub fallback_fov_y: f32,
    /// Clip planes used when the caller passes an invalid range.
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::Mono,
            depth_convention: DepthConvention::ZeroToOne,
            orientation: ScreenOrientation::LandscapeRight,
            head_offset: Pose::IDENTITY,
            world_scale: 1.0,
            interocular_distance: 0.064,
            fallback_fov_y: 60f32.to_radians(),
            z_near: 0.05,
            z_far: 100.0,
        }
    }
}

/// Camera state reported by the session for one frame.
///
/// Recomputed every frame and never carried over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionFrameState {
    pub timestamp: f64,
    /// Session camera pose in session space.
    pub camera_pose: Pose,
    /// Per-view intrinsics; `None` falls back to the configured field of view.
    pub intrinsics: [Option<ViewIntrinsics>; 2],
    /// Device-reported per-eye offsets in camera space, if any.
    pub eye_offsets: Option<[Vec3; 2]>,
    pub eye_height: f32,
}

impl Default for SessionFrameState {
    fn default() -> Self {
        Self {
            timestamp: 0.0,
            camera_pose: Pose::IDENTITY,
            intrinsics: [None, None],
            eye_offsets: None,
            eye_height: 0.0,
        }
    }
}

/// Per-view matrices laid out for direct upload to a uniform buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ViewUniformData {
    pub view: Mat4,
    pub proj: Mat4,
    pub view_proj: Mat4,
    pub inv_view: Mat4,
    pub inv_proj: Mat4,
    pub position: Vec4,
    pub near_far: Vec4,
}

/// Converts latched session camera state into per-view transforms and
/// projections.
///
/// Call [`begin_frame`](Self::begin_frame) once per rendered frame; every
/// query afterward sees the same state until the next call.
#[derive(Debug, Clone)]
pub struct FrameTransformPipeline {
    config: PipelineConfig,
    state: Option<SessionFrameState>,
    camera_transform: Pose,
}

impl FrameTransformPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            state: None,
            camera_transform: Pose::IDENTITY,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Replace the whole configuration, re-deriving the camera transform.
    pub fn set_config(&mut self, config: PipelineConfig) {
        self.config = config;
        self.refresh_camera_transform();
    }

    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        self.config.view_mode = view_mode;
    }

    pub fn set_orientation(&mut self, orientation: ScreenOrientation) {
        self.config.orientation = orientation;
        self.refresh_camera_transform();
    }

    /// Latch the session's camera state for this frame.
    pub fn begin_frame(&mut self, state: SessionFrameState) {
        self.state = Some(state);
        self.refresh_camera_transform();
    }

    /// Forget the latched state; queries return defaults until the next frame.
    pub fn clear(&mut self) {
        self.state = None;
        self.camera_transform = Pose::IDENTITY;
    }

    pub fn state(&self) -> Option<&SessionFrameState> {
        self.state.as_ref()
    }

    pub fn has_frame(&self) -> bool {
        self.state.is_some()
    }

    pub fn view_count(&self) -> u32 {
        self.config.view_mode.view_count()
    }

    pub fn eye_height(&self) -> f32 {
        self.state.map_or(0.0, |state| state.eye_height)
    }

    fn refresh_camera_transform(&mut self) {
        self.camera_transform = match self.state {
            Some(_) => {
                self.config.head_offset * self.session_camera_pose().scaled(self.config.world_scale)
            }
            None => Pose::IDENTITY,
        };
    }

    /// Session camera pose in session space, rolled to the display
    /// orientation. Anchor poses live in the same space.
    pub fn session_camera_pose(&self) -> Pose {
        self.state.map_or(Pose::IDENTITY, |state| {
            Pose::new(
                (state.camera_pose.rotation * self.config.orientation.roll()).normalize(),
                state.camera_pose.translation,
            )
        })
    }

    /// Session camera pose in host space, including the head offset.
    pub fn camera_transform(&self) -> Pose {
        self.camera_transform
    }

    /// Camera-space offset of `view`.
    ///
    /// Mono has no offset. Stereo uses device-reported offsets when present,
    /// otherwise half the interocular distance along the camera's local X.
    pub fn eye_offset(&self, view: u32) -> Pose {
        if self.config.view_mode == ViewMode::Mono || view > 1 {
            return Pose::IDENTITY;
        }
        let offset = match self.state.and_then(|state| state.eye_offsets) {
            Some(offsets) => offsets[view as usize],
            None => {
                let half = self.config.interocular_distance * 0.5;
                let sign = if view == 0 { -1.0 } else { 1.0 };
                Vec3::new(sign * half, 0.0, 0.0)
            }
        };
        Pose::from_translation(offset * self.config.world_scale)
    }

    /// World transform of `view` given the host's camera origin `base`.
    pub fn transform_for_view(&self, view: u32, base: Pose) -> Pose {
        base * self.camera_transform * self.eye_offset(view)
    }

    /// Intrinsics for `view` in display orientation.
    pub fn intrinsics_for_view(&self, view: u32, aspect: f32) -> ViewIntrinsics {
        let reported = self.state.and_then(|state| {
            let index = (view as usize).min(1);
            state.intrinsics[index].or(state.intrinsics[0])
        });
        match reported {
            Some(intrinsics) if intrinsics.is_valid() => {
                intrinsics.oriented(self.config.orientation)
            }
            _ => ViewIntrinsics::from_fov(self.config.fallback_fov_y, Vec2::new(aspect, 1.0)),
        }
    }

    /// Projection matrix for `view` in the host's clip-space convention.
    pub fn projection_for_view(&self, view: u32, aspect: f32, z_near: f32, z_far: f32) -> Mat4 {
        let (z_near, z_far) = self.clip_range(z_near, z_far);
        let aspect = if aspect > 0.0 && aspect.is_finite() {
            aspect
        } else {
            log::warn!("Invalid aspect ratio {}, using 1.0", aspect);
            1.0
        };
        self.intrinsics_for_view(view, aspect)
            .projection(aspect, z_near, z_far, self.config.depth_convention)
    }

    fn clip_range(&self, z_near: f32, z_far: f32) -> (f32, f32) {
        if z_near > 0.0 && z_far > z_near && z_far.is_finite() {
            (z_near, z_far)
        } else {
            log::warn!(
                "Invalid clip range [{}, {}], using [{}, {}]",
                z_near,
                z_far,
                self.config.z_near,
                self.config.z_far
            );
            (self.config.z_near, self.config.z_far)
        }
    }

    /// View/projection block for `view`, ready for upload.
    pub fn view_uniforms(
        &self,
        view: u32,
        base: Pose,
        aspect: f32,
        z_near: f32,
        z_far: f32,
    ) -> ViewUniformData {
        let (z_near, z_far) = self.clip_range(z_near, z_far);
        let world = self.transform_for_view(view, base);
        let inv_view = world.matrix();
        let view_matrix = world.inverse().matrix();
        let proj = self.projection_for_view(view, aspect, z_near, z_far);

        ViewUniformData {
            view: view_matrix,
            proj,
            view_proj: proj * view_matrix,
            inv_view,
            inv_proj: proj.inverse(),
            position: world.translation.extend(1.0),
            near_far: Vec4::new(z_near, z_far, 0.0, 0.0),
        }
    }
}

impl Default for FrameTransformPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
