//! RedLilium AR - bridges an augmented-reality tracking session to a host
//! renderer.
//!
//! # Overview
//!
//! The AR session runs on its own schedule and reports camera frames and
//! anchor lifecycle events. This crate keeps a live registry of tracked
//! anchors fed from the session's callback thread, and turns the session's
//! camera state into per-view transforms, projections and presentation
//! blits once per rendered frame.
//!
//! - [`anchor`] - identity-keyed, fixed-capacity anchor registry and ingestion
//! - [`frame`] - camera transform and projection pipeline (mono and stereo)
//! - [`image`] - double-buffered camera planes, reference images, cubemaps
//! - [`present`] - blit descriptions with optional lens distortion
//! - [`session`] - the [`ArSession`] trait and a scripted implementation
//! - [`ArInterface`] - the host-facing object tying it all together
//!
//! # Example
//!
//! ```
//! use redlilium_ar::{ArConfig, ArInterface, ScriptedSession};
//!
//! redlilium_ar::init();
//! let mut interface = ArInterface::new(ScriptedSession::new(), ArConfig::default());
//! interface.initialize().unwrap();
//! interface.process();
//! assert_eq!(interface.view_count(), 1);
//! ```

pub mod anchor;
pub mod config;
pub mod error;
pub mod frame;
pub mod image;
pub mod interface;
pub mod math;
pub mod present;
pub mod raycast;
pub mod session;

pub use anchor::{AnchorEvent, AnchorId, AnchorKind, AnchorSink, AnchorTracker};
pub use config::ArConfig;
pub use error::{ArError, ArResult};
pub use frame::{DepthConvention, ScreenOrientation, ViewMode, ViewUniformData};
pub use image::{ReferenceImage, ReferenceImageSet};
pub use interface::{ArInterface, SessionOptions};
pub use math::{Pose, Rect2, Rect2i};
pub use present::{BlitToScreen, LensProfile, RenderTargetId};
pub use raycast::RaycastHit;
pub use session::{ArSession, Capabilities, CameraFrame, ScriptedSession, TrackingStatus};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the AR subsystem.
///
/// Only logs the version; call once before creating an interface.
pub fn init() {
    log::info!("RedLilium AR v{} initialized", VERSION);
}
