//! A deterministic in-process session.
//!
//! Used by the test suite and benchmarks, and useful to hosts that want to
//! replay recorded sessions. Frames and anchor events are pushed from the
//! outside instead of coming from a device.

use std::collections::VecDeque;
use std::sync::Arc;

use glam::{Vec2, Vec3};
use parking_lot::Mutex;

use super::{ArSession, CameraFrame, Capabilities, SessionConfiguration, SessionHit};
use crate::anchor::{AnchorEvent, AnchorId, AnchorKind, AnchorSink, IngestOutcome};
use crate::error::{ArError, ArResult};
use crate::math::Pose;

struct ScriptState {
    available: bool,
    capabilities: Capabilities,
    running: bool,
    run_count: u32,
    configuration: Option<SessionConfiguration>,
    sink: Option<AnchorSink>,
    queued: VecDeque<CameraFrame>,
    latest: Option<CameraFrame>,
    hits: Option<Vec<SessionHit>>,
    passthrough: bool,
    haptic_pulses: u32,
    play_area: Vec<Vec3>,
}

/// Session driven by a script instead of a device.
///
/// Cloning yields another handle to the same session, so a test can hand one
/// clone to the interface and keep driving the other.
#[derive(Clone)]
pub struct ScriptedSession {
    name: Arc<str>,
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedSession {
    /// An available handheld session.
    pub fn new() -> Self {
        Self::with_capabilities(Capabilities::handheld_ar())
    }

    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        Self {
            name: Arc::from("scripted"),
            state: Arc::new(Mutex::new(ScriptState {
                available: true,
                capabilities,
                running: false,
                run_count: 0,
                configuration: None,
                sink: None,
                queued: VecDeque::new(),
                latest: None,
                hits: None,
                passthrough: false,
                haptic_pulses: 0,
                play_area: Vec::new(),
            })),
        }
    }

    /// A session on a device without AR support.
    pub fn unavailable() -> Self {
        let session = Self::new();
        session.state.lock().available = false;
        session
    }

    /// Queue a frame. Frames are handed out in order; the last one repeats.
    pub fn push_frame(&self, frame: CameraFrame) {
        self.state.lock().queued.push_back(frame);
    }

    /// Deliver an anchor event as the session's callback context would.
    ///
    /// Returns `None` while the session is not running.
    pub fn emit(&self, event: AnchorEvent) -> Option<IngestOutcome> {
        let sink = {
            let state = self.state.lock();
            if !state.running {
                return None;
            }
            state.sink.clone()?
        };
        Some(sink.ingest(event))
    }

    /// Report a detection of the reference image at `reference_index`.
    ///
    /// Only fires when image tracking is enabled and the index exists in the
    /// configured reference set.
    pub fn detect_image(
        &self,
        id: AnchorId,
        reference_index: usize,
        pose: Pose,
    ) -> Option<IngestOutcome> {
        let physical_size = {
            let state = self.state.lock();
            let configuration = state.configuration.as_ref()?;
            if !configuration.image_tracking {
                return None;
            }
            configuration
                .reference_images
                .as_ref()?
                .get(reference_index)?
                .physical_size()
        };
        self.emit(AnchorEvent::Added {
            id,
            pose,
            kind: AnchorKind::Image {
                reference_index,
                physical_size,
            },
        })
    }

    /// Make the session answer hit-tests natively with `hits`.
    pub fn set_hit_results(&self, hits: Option<Vec<SessionHit>>) {
        self.state.lock().hits = hits;
    }

    pub fn set_play_area(&self, boundary: Vec<Vec3>) {
        self.state.lock().play_area = boundary;
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().running
    }

    /// Number of times `run` succeeded.
    pub fn run_count(&self) -> u32 {
        self.state.lock().run_count
    }

    /// Configuration passed to the most recent `run`.
    pub fn configuration(&self) -> Option<SessionConfiguration> {
        self.state.lock().configuration.clone()
    }

    pub fn passthrough(&self) -> bool {
        self.state.lock().passthrough
    }

    pub fn haptic_pulses(&self) -> u32 {
        self.state.lock().haptic_pulses
    }
}

impl Default for ScriptedSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ArSession for ScriptedSession {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        self.state.lock().available
    }

    fn capabilities(&self) -> Capabilities {
        self.state.lock().capabilities
    }

    fn run(&mut self, configuration: &SessionConfiguration, anchors: AnchorSink) -> ArResult<()> {
        let mut state = self.state.lock();
        if !state.available {
            return Err(ArError::SessionUnavailable(self.name.to_string()));
        }
        state.running = true;
        state.run_count += 1;
        state.configuration = Some(configuration.clone());
        state.sink = Some(anchors);
        Ok(())
    }

    fn pause(&mut self) {
        self.state.lock().running = false;
    }

    fn current_frame(&mut self) -> Option<CameraFrame> {
        let mut state = self.state.lock();
        if !state.running {
            return None;
        }
        if let Some(frame) = state.queued.pop_front() {
            state.latest = Some(frame);
        }
        state.latest.clone()
    }

    fn hit_test(&self, _screen: Vec2) -> Option<Vec<SessionHit>> {
        self.state.lock().hits.clone()
    }

    fn set_passthrough(&mut self, enabled: bool) -> ArResult<()> {
        let mut state = self.state.lock();
        if !state.capabilities.contains(Capabilities::PASSTHROUGH) {
            return Err(ArError::Unsupported(Capabilities::PASSTHROUGH));
        }
        state.passthrough = enabled;
        Ok(())
    }

    fn trigger_haptic_pulse(
        &mut self,
        _frequency: f32,
        _amplitude: f32,
        _duration: f32,
    ) -> ArResult<()> {
        let mut state = self.state.lock();
        if !state.capabilities.contains(Capabilities::HAPTICS) {
            return Err(ArError::Unsupported(Capabilities::HAPTICS));
        }
        state.haptic_pulses += 1;
        Ok(())
    }

    fn play_area(&self) -> ArResult<Vec<Vec3>> {
        let state = self.state.lock();
        if !state.capabilities.contains(Capabilities::PLAY_AREA) {
            return Err(ArError::Unsupported(Capabilities::PLAY_AREA));
        }
        Ok(state.play_area.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_replay_in_order_and_last_repeats() {
        let mut session = ScriptedSession::new();
        session
            .run(&SessionConfiguration::default(), AnchorSink::new(4))
            .unwrap();
        for t in [1.0, 2.0] {
            session.push_frame(CameraFrame {
                timestamp: t,
                ..Default::default()
            });
        }

        assert_eq!(session.current_frame().unwrap().timestamp, 1.0);
        assert_eq!(session.current_frame().unwrap().timestamp, 2.0);
        assert_eq!(session.current_frame().unwrap().timestamp, 2.0);
    }

    #[test]
    fn test_emit_requires_running_session() {
        let mut session = ScriptedSession::new();
        let sink = AnchorSink::new(4);
        let event = AnchorEvent::Removed {
            id: AnchorId::from_u128(1),
        };
        assert_eq!(session.emit(event), None);

        session.run(&SessionConfiguration::default(), sink).unwrap();
        assert_eq!(session.emit(event), Some(IngestOutcome::Stale));
    }

    #[test]
    fn test_unavailable_session_refuses_to_run() {
        let mut session = ScriptedSession::unavailable();
        let result = session.run(&SessionConfiguration::default(), AnchorSink::new(1));
        assert!(matches!(result, Err(ArError::SessionUnavailable(_))));
        assert!(!session.is_running());
    }

    #[test]
    fn test_optional_capabilities_report_unsupported() {
        let mut session = ScriptedSession::new();
        assert_eq!(
            session.set_passthrough(true),
            Err(ArError::Unsupported(Capabilities::PASSTHROUGH))
        );
        assert!(session.play_area().is_err());

        let mut headset = ScriptedSession::with_capabilities(
            Capabilities::STEREO | Capabilities::PASSTHROUGH | Capabilities::HAPTICS,
        );
        headset.set_passthrough(true).unwrap();
        headset.trigger_haptic_pulse(160.0, 0.5, 0.1).unwrap();
        assert!(headset.passthrough());
        assert_eq!(headset.haptic_pulses(), 1);
    }
}
