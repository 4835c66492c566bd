//! The host-facing AR interface.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use glam::{Mat4, Vec2, Vec3};

use crate::anchor::{AnchorId, AnchorSink, AnchorSlot, AnchorTracker};
use crate::config::ArConfig;
use crate::error::{ArError, ArResult};
use crate::frame::{FrameTransformPipeline, ScreenOrientation, ViewMode, ViewUniformData};
use crate::image::{
    EnvironmentMap, ImagePlaneBuffer, ReferenceEntry, ReferenceImage, ReferenceImageSet,
};
use crate::math::{Pose, Rect2};
use crate::present::{BlitToScreen, PresentationCompositor, RenderTargetId};
use crate::raycast::{raycast_anchors, Ray, RaycastHit};
use crate::session::{
    ArSession, Capabilities, LightEstimate, SessionConfiguration, SessionHit, TrackingStatus,
};

/// Session features the host toggles at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionOptions {
    pub plane_detection: bool,
    pub light_estimation: bool,
    pub image_tracking: bool,
}

/// Bridges one AR session to the host renderer.
///
/// The host owns the interface and calls [`process`](Self::process) once per
/// frame before rendering. Anchor events arrive concurrently from the
/// session's own thread through the shared [`AnchorSink`].
///
/// While uninitialized, every frame query returns a default: identity camera
/// transform, zero views, no blits.
pub struct ArInterface {
    config: ArConfig,
    session: Box<dyn ArSession>,
    initialized: bool,
    session_started: bool,
    options: SessionOptions,
    anchors: AnchorSink,
    pipeline: FrameTransformPipeline,
    image_planes: Arc<ImagePlaneBuffer>,
    reference_images: ArcSwapOption<ReferenceImageSet>,
    light: LightEstimate,
    environment_map: Option<EnvironmentMap>,
    compositor: PresentationCompositor,
    tracking_status: TrackingStatus,
    display_size: Vec2,
}

impl ArInterface {
    pub fn new(session: impl ArSession + 'static, config: ArConfig) -> Self {
        Self::from_boxed(Box::new(session), config)
    }

    pub fn from_boxed(session: Box<dyn ArSession>, config: ArConfig) -> Self {
        Self {
            session,
            initialized: false,
            session_started: false,
            options: SessionOptions::default(),
            anchors: AnchorSink::new(config.max_anchors),
            pipeline: FrameTransformPipeline::new(config.pipeline_config()),
            image_planes: Arc::new(ImagePlaneBuffer::new()),
            reference_images: ArcSwapOption::empty(),
            light: LightEstimate::default(),
            environment_map: None,
            compositor: config.compositor(),
            tracking_status: TrackingStatus::NotTracking,
            display_size: config.display_size,
            config,
        }
    }

    pub fn name(&self) -> &str {
        self.session.name()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.session.capabilities()
    }

    pub fn config(&self) -> &ArConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Initialize the interface and start the session.
    ///
    /// Fails with [`ArError::SessionUnavailable`] on devices without AR
    /// support; the interface then stays uninitialized.
    pub fn initialize(&mut self) -> ArResult<()> {
        if self.initialized {
            return Ok(());
        }
        if !self.session.is_available() {
            log::warn!("AR session '{}' is not available on this device", self.name());
            return Err(ArError::SessionUnavailable(self.name().to_string()));
        }
        self.initialized = true;
        if let Err(err) = self.start_session() {
            self.initialized = false;
            return Err(err);
        }
        log::info!("AR interface '{}' initialized", self.name());
        Ok(())
    }

    /// Stop the session and drop all per-frame state.
    pub fn uninitialize(&mut self) {
        if !self.initialized {
            return;
        }
        self.stop_session();
        self.pipeline.clear();
        self.image_planes.clear();
        self.environment_map = None;
        self.tracking_status = TrackingStatus::NotTracking;
        self.initialized = false;
        log::info!("AR interface '{}' uninitialized", self.name());
    }

    /// Run the session with the current options and reference images.
    ///
    /// Running an already started session applies the new configuration.
    pub fn start_session(&mut self) -> ArResult<()> {
        if !self.initialized {
            return Err(ArError::NotInitialized);
        }
        let configuration = self.session_configuration(self.options);
        if !self.session_started {
            self.anchors.open();
        }
        if let Err(err) = self.session.run(&configuration, self.anchors.clone()) {
            if !self.session_started {
                self.anchors.close();
            }
            return Err(err);
        }
        if !self.session_started {
            log::info!("AR session '{}' started", self.name());
        }
        self.session_started = true;
        Ok(())
    }

    /// Pause the session and remove every anchor.
    ///
    /// The anchor sink stays closed until the next start, so callbacks the
    /// stopped session still delivers are dropped.
    pub fn stop_session(&mut self) {
        if self.session_started {
            self.session.pause();
            self.session_started = false;
            log::info!("AR session '{}' stopped", self.name());
        }
        self.anchors.close();
    }

    pub fn is_session_running(&self) -> bool {
        self.session_started
    }

    /// Pull the session's current frame and latch it for this render frame.
    pub fn process(&mut self) {
        if !self.initialized || !self.session_started {
            return;
        }
        let Some(frame) = self.session.current_frame() else {
            return;
        };

        self.pipeline.begin_frame(frame.frame_state());
        if let Some(display_size) = frame.display_size {
            self.display_size = display_size;
        }
        if let Some(planes) = frame.image_planes {
            if let Err(err) = self.image_planes.refresh(planes, frame.timestamp) {
                log::warn!("Dropping camera image at {:.3}s: {}", frame.timestamp, err);
            }
        }
        if self.options.light_estimation {
            if let Some(light) = frame.light_estimate {
                self.light = light;
            }
            if frame.environment_map.is_some() {
                self.environment_map = frame.environment_map;
            }
        }
        self.tracking_status = frame.tracking_state.into();
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    pub fn plane_detection_enabled(&self) -> bool {
        self.options.plane_detection
    }

    pub fn set_plane_detection_enabled(&mut self, enabled: bool) -> ArResult<()> {
        if enabled {
            self.require(Capabilities::PLANE_DETECTION)?;
        }
        self.apply_options(SessionOptions {
            plane_detection: enabled,
            ..self.options
        })
    }

    pub fn light_estimation_enabled(&self) -> bool {
        self.options.light_estimation
    }

    pub fn set_light_estimation_enabled(&mut self, enabled: bool) -> ArResult<()> {
        if enabled {
            self.require(Capabilities::LIGHT_ESTIMATION)?;
        }
        self.apply_options(SessionOptions {
            light_estimation: enabled,
            ..self.options
        })
    }

    pub fn image_tracking_enabled(&self) -> bool {
        self.options.image_tracking
    }

    pub fn set_image_tracking_enabled(&mut self, enabled: bool) -> ArResult<()> {
        if enabled {
            self.require(Capabilities::IMAGE_TRACKING)?;
        }
        self.apply_options(SessionOptions {
            image_tracking: enabled,
            ..self.options
        })
    }

    fn apply_options(&mut self, options: SessionOptions) -> ArResult<()> {
        if options == self.options {
            return Ok(());
        }
        if self.session_started {
            let configuration = self.session_configuration(options);
            self.session.run(&configuration, self.anchors.clone())?;
        }
        self.options = options;
        Ok(())
    }

    /// Replace the reference images used for image tracking.
    ///
    /// `images[i]` is printed `physical_widths[i]` meters wide; detected image
    /// anchors report `i` as their reference index. Fails with
    /// [`ArError::ArgumentMismatch`] without changing state if the lengths
    /// differ. A running image-tracking session picks the new set up on its
    /// next configuration.
    pub fn set_reference_images(
        &mut self,
        images: Vec<ReferenceImage>,
        physical_widths: Vec<f32>,
    ) -> ArResult<()> {
        let set = ReferenceImageSet::new(images, physical_widths)?;
        if self.options.image_tracking && self.session_started {
            log::warn!(
                "Reference images changed while image tracking is running, \
                 they apply on the next session configuration"
            );
        }
        log::debug!("Stored {} reference images", set.len());
        self.reference_images.store(Some(Arc::new(set)));
        Ok(())
    }

    pub fn reference_images(&self) -> Option<Arc<ReferenceImageSet>> {
        self.reference_images.load_full()
    }

    /// The reference image an image anchor was detected from.
    pub fn reference_image_for_anchor(&self, id: &AnchorId) -> Option<ReferenceEntry> {
        let index = self.anchors.get(id)?.kind().reference_index()?;
        self.reference_images.load_full()?.get(index).cloned()
    }

    /// Ambient light intensity, 1.0 being neutral.
    pub fn ambient_intensity(&self) -> f32 {
        self.light.ambient_intensity / 1000.0
    }

    /// Ambient color temperature in Kelvin.
    pub fn ambient_color_temperature(&self) -> f32 {
        self.light.ambient_color_temperature
    }

    pub fn exposure_offset(&self) -> f32 {
        self.light.exposure_offset
    }

    pub fn environment_map(&self) -> Option<EnvironmentMap> {
        self.environment_map.clone()
    }

    /// Camera image planes of the latest frame. Safe to share with other
    /// threads.
    pub fn image_planes(&self) -> &Arc<ImagePlaneBuffer> {
        &self.image_planes
    }

    pub fn tracking_status(&self) -> TrackingStatus {
        if self.initialized {
            self.tracking_status
        } else {
            TrackingStatus::NotTracking
        }
    }

    /// The shared anchor sink. Sessions deliver events to clones of it.
    pub fn anchors(&self) -> &AnchorSink {
        &self.anchors
    }

    pub fn anchor(&self, id: &AnchorId) -> Option<Arc<AnchorTracker>> {
        self.anchors.get(id)
    }

    pub fn anchor_snapshot(&self) -> Vec<AnchorSlot> {
        self.anchors.snapshot()
    }

    /// Anchors hit by a ray through `screen`, nearest first.
    ///
    /// `screen` is normalized to [0, 1] with the origin at the top-left. Hits
    /// are in session space, like anchor poses. The session's native
    /// hit-test is used when it has one; otherwise each anchor is tested as
    /// a plane at its pose.
    pub fn raycast(&self, screen: Vec2) -> Vec<RaycastHit> {
        if !self.initialized || !self.pipeline.has_frame() {
            return Vec::new();
        }
        if let Some(hits) = self.session.hit_test(screen) {
            return anchor_hits(hits);
        }

        let aspect = self.display_size.x / self.display_size.y;
        let projection = self
            .pipeline
            .projection_for_view(0, aspect, self.config.z_near, self.config.z_far);
        let Some(ray) = Ray::from_screen(
            screen,
            self.pipeline.session_camera_pose(),
            projection,
            self.config.depth_convention,
        ) else {
            return Vec::new();
        };
        let fallback = self.config.raycast_fallback_extent;
        self.anchors
            .with_registry(|registry| raycast_anchors(&ray, registry.iter(), fallback))
    }

    pub fn set_passthrough(&mut self, enabled: bool) -> ArResult<()> {
        self.require(Capabilities::PASSTHROUGH)?;
        self.session.set_passthrough(enabled)
    }

    pub fn trigger_haptic_pulse(
        &mut self,
        frequency: f32,
        amplitude: f32,
        duration: f32,
    ) -> ArResult<()> {
        self.require(Capabilities::HAPTICS)?;
        self.session.trigger_haptic_pulse(frequency, amplitude, duration)
    }

    pub fn play_area(&self) -> ArResult<Vec<Vec3>> {
        self.require(Capabilities::PLAY_AREA)?;
        self.session.play_area()
    }

    fn require(&self, capability: Capabilities) -> ArResult<()> {
        if self.session.capabilities().contains(capability) {
            Ok(())
        } else {
            Err(ArError::Unsupported(capability))
        }
    }

    pub fn set_view_mode(&mut self, view_mode: ViewMode) -> ArResult<()> {
        let capability = match view_mode {
            ViewMode::Mono => Capabilities::MONO,
            ViewMode::Stereo => Capabilities::STEREO,
        };
        self.require(capability)?;
        self.config.view_mode = view_mode;
        self.pipeline.set_view_mode(view_mode);
        Ok(())
    }

    pub fn set_orientation(&mut self, orientation: ScreenOrientation) {
        self.config.orientation = orientation;
        self.pipeline.set_orientation(orientation);
    }

    pub fn set_display_size(&mut self, display_size: Vec2) {
        self.display_size = display_size;
    }

    pub fn display_size(&self) -> Vec2 {
        self.display_size
    }

    /// Render target size in pixels for the current view count.
    pub fn render_target_size(&self) -> Vec2 {
        self.compositor
            .render_target_size(self.display_size, self.view_count().max(1))
    }

    pub fn view_count(&self) -> u32 {
        if self.initialized {
            self.pipeline.view_count()
        } else {
            0
        }
    }

    pub fn eye_height(&self) -> f32 {
        self.pipeline.eye_height()
    }

    pub fn camera_transform(&self) -> Pose {
        if self.initialized {
            self.pipeline.camera_transform()
        } else {
            Pose::IDENTITY
        }
    }

    pub fn transform_for_view(&self, view: u32, base: Pose) -> Pose {
        if self.initialized {
            self.pipeline.transform_for_view(view, base)
        } else {
            base
        }
    }

    pub fn projection_for_view(&self, view: u32, aspect: f32, z_near: f32, z_far: f32) -> Mat4 {
        self.pipeline.projection_for_view(view, aspect, z_near, z_far)
    }

    pub fn view_uniforms(
        &self,
        view: u32,
        base: Pose,
        aspect: f32,
        z_near: f32,
        z_far: f32,
    ) -> ViewUniformData {
        let base = if self.initialized {
            base
        } else {
            Pose::IDENTITY
        };
        self.pipeline.view_uniforms(view, base, aspect, z_near, z_far)
    }

    /// Blits that present `render_target` on `screen_rect` after rendering.
    pub fn post_draw_viewport(
        &self,
        render_target: RenderTargetId,
        screen_rect: Rect2,
    ) -> Vec<BlitToScreen> {
        self.compositor.compose(render_target, screen_rect, self.view_count())
    }

    fn session_configuration(&self, options: SessionOptions) -> SessionConfiguration {
        SessionConfiguration {
            plane_detection: options.plane_detection,
            light_estimation: options.light_estimation,
            image_tracking: options.image_tracking,
            reference_images: self.reference_images.load_full(),
        }
    }
}

impl Drop for ArInterface {
    fn drop(&mut self) {
        self.uninitialize();
    }
}

fn anchor_hits(hits: Vec<SessionHit>) -> Vec<RaycastHit> {
    let mut hits: Vec<RaycastHit> = hits
        .into_iter()
        .filter_map(|hit| {
            Some(RaycastHit {
                id: hit.anchor?,
                pose: hit.pose,
                distance: hit.distance,
            })
        })
        .collect();
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}
