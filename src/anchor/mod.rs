//! Anchor tracking.
//!
//! - [`AnchorId`] - opaque 16-byte identity assigned by the session
//! - [`AnchorTracker`] - shared engine-facing handle with pose and status
//! - [`AnchorRegistry`] - fixed-capacity, dense, identity-keyed table
//! - [`AnchorSink`] - synchronized ingestion of session events

mod id;
mod ingest;
mod registry;
mod tracker;

pub use id::AnchorId;
pub use ingest::{AnchorEvent, AnchorSink, IngestOutcome, IngestStats, IngestStatsSnapshot};
pub use registry::{AnchorRegistry, AnchorSlot, SlotAllocation, MAX_ANCHOR_CAPACITY};
pub use tracker::{
    AnchorKind, AnchorState, AnchorTracker, AnchorTrackingStatus, PlaneAlignment,
};
