//! Optional x-bounds synchronisation between panels of one view tree.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::data_types::SubscriberId;

#[derive(Clone, Debug, PartialEq)]
pub struct SyncedBounds {
    pub source_id: SubscriberId,
    pub min: f64,
    pub max: f64,
}

#[derive(Clone, Default)]
pub struct BoundsSyncContext {
    bounds: Arc<RwLock<Option<SyncedBounds>>>,
}

impl BoundsSyncContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes a range; non-finite or empty ranges are ignored.
    pub fn publish(&self, bounds: SyncedBounds) {
        if !(bounds.min.is_finite() && bounds.max.is_finite() && bounds.min < bounds.max) {
            return;
        }
        *self.bounds.write() = Some(bounds);
    }

    pub fn clear(&self) {
        *self.bounds.write() = None;
    }

    pub fn get(&self) -> Option<SyncedBounds> {
        self.bounds.read().clone()
    }

    /// Bounds published by a panel other than `viewer`.
    pub fn foreign(&self, viewer: &SubscriberId) -> Option<SyncedBounds> {
        self.get().filter(|b| &b.source_id != viewer)
    }
}
