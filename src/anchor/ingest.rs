//! Anchor lifecycle events delivered from the AR session's callback context.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::{AnchorId, AnchorKind, AnchorRegistry, AnchorSlot, AnchorTracker};
use crate::math::Pose;

/// A plain-data anchor lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorEvent {
    Added {
        id: AnchorId,
        pose: Pose,
        kind: AnchorKind,
    },
    Updated {
        id: AnchorId,
        pose: Pose,
        kind: AnchorKind,
    },
    Removed {
        id: AnchorId,
    },
}

impl AnchorEvent {
    pub fn id(&self) -> AnchorId {
        match self {
            AnchorEvent::Added { id, .. }
            | AnchorEvent::Updated { id, .. }
            | AnchorEvent::Removed { id } => *id,
        }
    }
}

/// What applying an event did to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Created,
    Updated,
    Removed,
    /// Removal of an identity that is not in the registry, or any event
    /// delivered while the sink is closed.
    Stale,
    /// No slot was available; the event was discarded.
    Dropped,
}

/// Counters for ingested events.
#[derive(Debug, Default)]
pub struct IngestStats {
    created: AtomicU64,
    updated: AtomicU64,
    removed: AtomicU64,
    stale: AtomicU64,
    dropped: AtomicU64,
}

/// Plain copy of [`IngestStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestStatsSnapshot {
    pub created: u64,
    pub updated: u64,
    pub removed: u64,
    pub stale: u64,
    pub dropped: u64,
}

impl IngestStats {
    fn record(&self, outcome: IngestOutcome) {
        let counter = match outcome {
            IngestOutcome::Created => &self.created,
            IngestOutcome::Updated => &self.updated,
            IngestOutcome::Removed => &self.removed,
            IngestOutcome::Stale => &self.stale,
            IngestOutcome::Dropped => &self.dropped,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> IngestStatsSnapshot {
        IngestStatsSnapshot {
            created: self.created.load(Ordering::Relaxed),
            updated: self.updated.load(Ordering::Relaxed),
            removed: self.removed.load(Ordering::Relaxed),
            stale: self.stale.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

struct SinkState {
    registry: AnchorRegistry,
    open: bool,
}

struct SinkShared {
    state: Mutex<SinkState>,
    stats: IngestStats,
}

/// Thread-safe entry point for anchor events.
///
/// Cloning a sink is cheap; every clone shares the same registry. The AR
/// session keeps one clone on its callback thread while the render thread
/// reads through another. All registry access goes through one mutex and the
/// critical sections only touch the slot array. Tracker state is swapped
/// atomically, so no other lock is ever taken while it is held.
///
/// A closed sink drops every event as stale. [`close`](Self::close) empties
/// the registry and closes it in one step, so callbacks still in flight from
/// a stopped session cannot bring anchors back.
#[derive(Clone)]
pub struct AnchorSink {
    shared: Arc<SinkShared>,
}

impl AnchorSink {
    pub fn new(max_anchors: usize) -> Self {
        Self {
            shared: Arc::new(SinkShared {
                state: Mutex::new(SinkState {
                    registry: AnchorRegistry::new(max_anchors),
                    open: true,
                }),
                stats: IngestStats::default(),
            }),
        }
    }

    /// Apply one event. Never fails: capacity overflow and stale identities
    /// are logged and counted.
    pub fn ingest(&self, event: AnchorEvent) -> IngestOutcome {
        let outcome = match event {
            AnchorEvent::Added { id, pose, kind } => self.add_or_update(id, pose, kind, false),
            // The session does not guarantee Added arrives before Updated.
            AnchorEvent::Updated { id, pose, kind } => self.add_or_update(id, pose, kind, true),
            AnchorEvent::Removed { id } => self.remove(id),
        };
        self.shared.stats.record(outcome);
        outcome
    }

    pub fn ingest_all<I>(&self, events: I)
    where
        I: IntoIterator<Item = AnchorEvent>,
    {
        for event in events {
            self.ingest(event);
        }
    }

    fn add_or_update(
        &self,
        id: AnchorId,
        pose: Pose,
        kind: AnchorKind,
        is_update: bool,
    ) -> IngestOutcome {
        let mut state = self.shared.state.lock();
        if !state.open {
            drop(state);
            log::trace!("Ignoring event for anchor {} on a closed sink", id);
            return IngestOutcome::Stale;
        }
        let allocation = state
            .registry
            .find_or_allocate(id, || AnchorTracker::new(id, pose, kind));

        match allocation {
            Ok(alloc) if alloc.created => {
                drop(state);
                if is_update {
                    log::debug!("Anchor {} updated before it was added, tracking it now", id);
                } else {
                    log::debug!("Anchor {} added", id);
                }
                IngestOutcome::Created
            }
            Ok(alloc) => {
                if let Some(slot) = state.registry.slot(alloc.index) {
                    slot.tracker.update(pose, kind);
                }
                IngestOutcome::Updated
            }
            Err(err) => {
                drop(state);
                log::warn!("{}", err);
                IngestOutcome::Dropped
            }
        }
    }

    fn remove(&self, id: AnchorId) -> IngestOutcome {
        let removed = self.shared.state.lock().registry.remove(&id);
        match removed {
            Some(_) => {
                log::debug!("Anchor {} removed", id);
                IngestOutcome::Removed
            }
            None => {
                log::trace!("Ignoring removal of unknown anchor {}", id);
                IngestOutcome::Stale
            }
        }
    }

    /// Remove every anchor. Safe to call while events are still arriving;
    /// on an open sink, events delivered afterward repopulate the registry.
    pub fn remove_all(&self) -> usize {
        let removed = self.shared.state.lock().registry.remove_all();
        if removed > 0 {
            log::debug!("Removed all {} anchors", removed);
        }
        removed
    }

    /// Remove every anchor and stop accepting events until
    /// [`open`](Self::open) is called.
    pub fn close(&self) -> usize {
        let removed = {
            let mut state = self.shared.state.lock();
            state.open = false;
            state.registry.remove_all()
        };
        log::debug!("Anchor sink closed, removed {} anchors", removed);
        removed
    }

    /// Accept events again after [`close`](Self::close).
    pub fn open(&self) {
        self.shared.state.lock().open = true;
    }

    pub fn is_open(&self) -> bool {
        self.shared.state.lock().open
    }

    pub fn get(&self, id: &AnchorId) -> Option<Arc<AnchorTracker>> {
        self.shared.state.lock().registry.get(id)
    }

    pub fn len(&self) -> usize {
        self.shared.state.lock().registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_anchors(&self) -> usize {
        self.shared.state.lock().registry.max_anchors()
    }

    /// Copy of all live slots, taken under the lock.
    pub fn snapshot(&self) -> Vec<AnchorSlot> {
        self.shared.state.lock().registry.iter().cloned().collect()
    }

    /// Run `f` with the registry locked. Keep `f` short: the session thread
    /// waits on the same lock.
    pub fn with_registry<R>(&self, f: impl FnOnce(&AnchorRegistry) -> R) -> R {
        f(&self.shared.state.lock().registry)
    }

    pub fn stats(&self) -> IngestStatsSnapshot {
        self.shared.stats.snapshot()
    }
}

impl std::fmt::Debug for AnchorSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnchorSink")
            .field("stats", &self.shared.stats.snapshot())
            .finish()
    }
}
