//! The seam between the bridge and a platform AR session.
//!
//! A platform integration implements [`ArSession`]. The bridge drives it from
//! the host thread (`run`, `pause`, `current_frame`) while the session
//! delivers anchor events from its own callback context through the
//! [`AnchorSink`] handed to `run`.

mod capabilities;
mod frame;
mod scripted;

pub use capabilities::Capabilities;
pub use frame::{
    CameraFrame, LightEstimate, LimitedReason, SessionConfiguration, SessionHit,
    SessionTrackingState, TrackingStatus,
};
pub use scripted::ScriptedSession;

use glam::{Vec2, Vec3};

use crate::anchor::AnchorSink;
use crate::error::{ArError, ArResult};

/// A platform AR session.
///
/// Optional capabilities have default implementations that report
/// [`ArError::Unsupported`]; sessions override the ones they offer and
/// advertise them through [`capabilities`](Self::capabilities).
pub trait ArSession: Send {
    fn name(&self) -> &str;

    /// Whether the device can run this session at all.
    fn is_available(&self) -> bool;

    fn capabilities(&self) -> Capabilities;

    /// Start or reconfigure the session.
    ///
    /// Anchor events must be delivered to `anchors` from then on, from any
    /// thread. Calling `run` again while running applies the new
    /// configuration.
    fn run(&mut self, configuration: &SessionConfiguration, anchors: AnchorSink) -> ArResult<()>;

    fn pause(&mut self);

    /// The most recent frame, if the session has produced one.
    fn current_frame(&mut self) -> Option<CameraFrame>;

    /// Native hit-test against the session's own scene understanding.
    ///
    /// `screen` is normalized with the origin at the top-left. `None` means
    /// the session has no native hit-test and the bridge should raycast the
    /// anchor registry itself.
    fn hit_test(&self, _screen: Vec2) -> Option<Vec<SessionHit>> {
        None
    }

    fn set_passthrough(&mut self, _enabled: bool) -> ArResult<()> {
        Err(ArError::Unsupported(Capabilities::PASSTHROUGH))
    }

    fn trigger_haptic_pulse(
        &mut self,
        _frequency: f32,
        _amplitude: f32,
        _duration: f32,
    ) -> ArResult<()> {
        Err(ArError::Unsupported(Capabilities::HAPTICS))
    }

    /// Boundary of the play area on the floor, in session space.
    fn play_area(&self) -> ArResult<Vec<Vec3>> {
        Err(ArError::Unsupported(Capabilities::PLAY_AREA))
    }
}
