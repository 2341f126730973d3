//! Model Cache
//!
//! Process-wide store of assembled models keyed by schema name. Each name
//! owns one `OnceCell` slot: the first request assembles, concurrent
//! requests for the same name block on that slot and receive the same
//! `Arc`, so a shared parent is assembled at most once per run. The map
//! lock is held only to fetch or create a slot, never while assembling.
//!
//! Failures are cached as well; every waiter gets the same error.

use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::ModelDescriptor;
use crate::error::Result;

type Slot = Arc<OnceCell<Result<Arc<ModelDescriptor>>>>;

#[derive(Debug, Default)]
pub struct ModelCache {
    slots: Mutex<HashMap<String, Slot>>,
    assemblies: AtomicUsize,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached model for `name`, running `assemble` only on the first request
    pub fn get_or_assemble<F>(&self, name: &str, assemble: F) -> Result<Arc<ModelDescriptor>>
    where
        F: FnOnce() -> Result<ModelDescriptor>,
    {
        let slot = self.slot(name);
        slot.get_or_init(|| {
            self.assemblies.fetch_add(1, Ordering::SeqCst);
            tracing::debug!(schema = name, "assembling (cache miss)");
            assemble().map(Arc::new)
        })
        .clone()
    }

    /// Completed entry for `name`, without assembling
    pub fn get(&self, name: &str) -> Option<Result<Arc<ModelDescriptor>>> {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.get(name).and_then(|slot| slot.get().cloned())
    }

    /// Number of assemblies actually run
    pub fn assemblies(&self) -> usize {
        self.assemblies.load(Ordering::SeqCst)
    }

    /// Number of completed entries
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.values().filter(|slot| slot.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, name: &str) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.entry(name.to_string()).or_default().clone()
    }
}
