//! Error types for the AR bridge.

use thiserror::Error;

use crate::anchor::AnchorId;
use crate::session::Capabilities;

/// Errors reported by the AR bridge.
///
/// Only configuration calls made directly by the host fail synchronously.
/// Errors raised on the anchor ingestion path are logged and counted, never
/// propagated into the render loop.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArError {
    /// The anchor registry is full; the event that needed a new slot was dropped.
    #[error("anchor registry full ({max_anchors} slots), dropping anchor {identity}")]
    CapacityExceeded {
        identity: AnchorId,
        max_anchors: usize,
    },
    /// Reference image and physical width arrays differ in length.
    #[error("reference image count ({images}) does not match physical width count ({widths})")]
    ArgumentMismatch { images: usize, widths: usize },
    /// The AR capability is not present on this device.
    #[error("AR session unavailable: {0}")]
    SessionUnavailable(String),
    /// The interface has not been initialized.
    #[error("AR interface not initialized")]
    NotInitialized,
    /// The requested capability is not implemented by the session.
    #[error("capability not supported: {0:?}")]
    Unsupported(Capabilities),
    /// An invalid parameter was provided.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type ArResult<T> = Result<T, ArError>;
