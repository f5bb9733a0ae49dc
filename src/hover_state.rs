//! Cross-panel hover state.
//!
//! One `HoverContext` is created per view tree and cloned into every panel
//! it hosts. Panels write and clear their own entry; readers look entries up
//! by identity.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use crate::data_types::{HoverEntry, HoverValue, SubscriberId, XAxisMode};

#[derive(Default)]
struct HoverTable {
    /// Value and write sequence of each panel's entry.
    entries: HashMap<SubscriberId, (HoverValue, u64)>,
    next_seq: u64,
}

#[derive(Clone, Default)]
pub struct HoverContext {
    table: Arc<RwLock<HoverTable>>,
    version: Arc<AtomicU64>,
}

impl HoverContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, entry: HoverEntry) {
        let mut table = self.table.write();
        table.next_seq += 1;
        let seq = table.next_seq;
        table.entries.insert(entry.component_id, (entry.value, seq));
        self.version.fetch_add(1, Ordering::Release);
    }

    /// Removes the entry written by `id`. Clearing an absent entry is a no-op.
    pub fn clear(&self, id: &SubscriberId) {
        let mut table = self.table.write();
        if table.entries.remove(id).is_none() {
            return;
        }
        self.version.fetch_add(1, Ordering::Release);
        trace!(%id, "hover cleared");
    }

    pub fn get(&self, id: &SubscriberId) -> Option<HoverValue> {
        self.table.read().entries.get(id).map(|(value, _)| *value)
    }

    /// Most recently written entry still present. Once the latest writer
    /// clears, the next most recent panel's entry takes over.
    pub fn current(&self) -> Option<HoverEntry> {
        let table = self.table.read();
        let (id, (value, _)) = table.entries.iter().max_by_key(|(_, (_, seq))| *seq)?;
        Some(HoverEntry {
            component_id: id.clone(),
            value: *value,
        })
    }

    /// Incremented on every change; lets panels skip redundant cursor redraws.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// X position at which `viewer` should draw its synchronized cursor.
    /// Timeline positions are shared with every timestamp panel; any other
    /// value is only meaningful to the panel that produced it.
    pub fn synced_cursor(&self, viewer: &SubscriberId, viewer_mode: XAxisMode) -> Option<f64> {
        let entry = self.current()?;
        match entry.value {
            HoverValue::PlaybackSeconds(seconds) if viewer_mode.is_timestamp() => Some(seconds),
            HoverValue::Other(value) if &entry.component_id == viewer => Some(value),
            _ => None,
        }
    }
}
