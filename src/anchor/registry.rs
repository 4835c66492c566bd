//! Fixed-capacity anchor registry.
//!
//! The registry is a dense array of `(identity, tracker)` slots. Lookups are a
//! linear scan, which is fine at the tens-of-anchors population of a
//! room-scale AR scene. Removal shifts later slots down so iteration never
//! sees gaps and `len()` always equals the number of live entries.

use std::sync::Arc;

use super::{AnchorId, AnchorTracker};
use crate::error::{ArError, ArResult};

/// Largest capacity a registry accepts. Larger requests are clamped.
pub const MAX_ANCHOR_CAPACITY: usize = 4096;

/// One occupied registry slot.
#[derive(Debug, Clone)]
pub struct AnchorSlot {
    pub id: AnchorId,
    pub tracker: Arc<AnchorTracker>,
}

/// Result of [`AnchorRegistry::find_or_allocate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAllocation {
    /// Index of the slot holding the identity.
    pub index: usize,
    /// True if the slot was created by this call.
    pub created: bool,
}

/// Identity-keyed table of tracked anchors with a hard capacity.
///
/// The registry itself is not synchronized; [`AnchorSink`](super::AnchorSink)
/// wraps it in a single mutex shared by the session and render contexts.
#[derive(Debug)]
pub struct AnchorRegistry {
    slots: Vec<AnchorSlot>,
    max_anchors: usize,
}

impl AnchorRegistry {
    /// Create an empty registry. Storage for `max_anchors` slots is reserved
    /// up front and never grows. Capacities above [`MAX_ANCHOR_CAPACITY`] are
    /// clamped.
    pub fn new(max_anchors: usize) -> Self {
        if max_anchors > MAX_ANCHOR_CAPACITY {
            log::warn!(
                "Anchor capacity {} exceeds the limit, clamping to {}",
                max_anchors,
                MAX_ANCHOR_CAPACITY
            );
        }
        let max_anchors = max_anchors.min(MAX_ANCHOR_CAPACITY);
        Self {
            slots: Vec::with_capacity(max_anchors),
            max_anchors,
        }
    }

    pub fn max_anchors(&self) -> usize {
        self.max_anchors
    }

    /// Number of live anchors.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.max_anchors
    }

    /// Index of the slot holding `id`, if any.
    pub fn position(&self, id: &AnchorId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.id == *id)
    }

    /// Find the slot for `id`, creating it with `make_tracker` if absent.
    ///
    /// `make_tracker` only runs when a new slot is appended. Fails with
    /// [`ArError::CapacityExceeded`] when the identity is unknown and every
    /// slot is taken; the registry is left unchanged in that case.
    pub fn find_or_allocate<F>(
        &mut self,
        id: AnchorId,
        make_tracker: F,
    ) -> ArResult<SlotAllocation>
    where
        F: FnOnce() -> AnchorTracker,
    {
        if let Some(index) = self.position(&id) {
            return Ok(SlotAllocation {
                index,
                created: false,
            });
        }

        if self.is_full() {
            return Err(ArError::CapacityExceeded {
                identity: id,
                max_anchors: self.max_anchors,
            });
        }

        self.slots.push(AnchorSlot {
            id,
            tracker: Arc::new(make_tracker()),
        });
        Ok(SlotAllocation {
            index: self.slots.len() - 1,
            created: true,
        })
    }

    /// Remove `id`, returning its tracker.
    ///
    /// Unknown identities are a no-op: the session may report a removal more
    /// than once or for an anchor that was dropped at capacity.
    pub fn remove(&mut self, id: &AnchorId) -> Option<Arc<AnchorTracker>> {
        let index = self.position(id)?;
        let slot = self.slots.remove(index);
        slot.tracker.mark_lost();
        Some(slot.tracker)
    }

    /// Release every tracker and reset the count to zero.
    ///
    /// Every handle is marked lost before it is released, so external holders
    /// observe the teardown even if they keep their reference alive.
    pub fn remove_all(&mut self) -> usize {
        let removed = self.slots.len();
        for slot in self.slots.drain(..) {
            slot.tracker.mark_lost();
        }
        removed
    }

    pub fn get(&self, id: &AnchorId) -> Option<Arc<AnchorTracker>> {
        self.slots
            .iter()
            .find(|slot| slot.id == *id)
            .map(|slot| slot.tracker.clone())
    }

    pub fn slot(&self, index: usize) -> Option<&AnchorSlot> {
        self.slots.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnchorSlot> {
        self.slots.iter()
    }

    pub fn contains(&self, id: &AnchorId) -> bool {
        self.position(id).is_some()
    }
}
