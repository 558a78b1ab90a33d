//! Listener registry with replace-on-reregister and lazy death handling.
//!
//! The same registry type serves the controller-level channel
//! (`CallbackRegistry<EventListener>`) and each chip's own channel
//! (`CallbackRegistry<Arc<dyn WifiChipEventCallback>>`).
//!
//! Delivery happens on a snapshot taken under the registry lock and runs with
//! the lock released, so listeners may register or unregister from inside a
//! callback.

use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::{debug, warn};
use wlan_common::event::{CallbackError, CallbackResult, ListenerId};

/// Outcome of a broadcast. Broadcasting never fails as a whole.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Listeners that accepted the event.
    pub delivered: usize,
    /// Listeners that reported a non-fatal delivery failure.
    pub failed: usize,
    /// Listeners found dead and dropped.
    pub dropped: usize,
}

struct Entry<H> {
    /// Bumped on every registration so a dead-listener sweep never removes a
    /// handle registered after the snapshot was taken.
    generation: u64,
    handle: H,
}

/// Mapping from listener identity to listener handle.
pub struct CallbackRegistry<H> {
    name: &'static str,
    inner: Mutex<RegistryInner<H>>,
}

struct RegistryInner<H> {
    next_generation: u64,
    entries: HashMap<ListenerId, Entry<H>>,
}

impl<H: Clone> CallbackRegistry<H> {
    /// Create an empty registry. `name` only shows up in logs.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: Mutex::new(RegistryInner {
                next_generation: 0,
                entries: HashMap::new(),
            }),
        }
    }

    /// Register a listener. Returns `true` if an entry with the same
    /// identity was replaced.
    pub fn register(&self, id: ListenerId, handle: H) -> bool {
        let mut inner = self.inner.lock();
        let generation = inner.next_generation;
        inner.next_generation += 1;
        let replaced = inner
            .entries
            .insert(id, Entry { generation, handle })
            .is_some();
        debug!(
            "[{}] {} {}",
            self.name,
            if replaced { "re-registered" } else { "registered" },
            id
        );
        replaced
    }

    /// Remove a listener. Returns `true` if it was registered.
    pub fn unregister(&self, id: ListenerId) -> bool {
        let removed = self.inner.lock().entries.remove(&id).is_some();
        if removed {
            debug!("[{}] unregistered {}", self.name, id);
        }
        removed
    }

    /// Whether a listener with this identity is registered.
    pub fn contains(&self, id: ListenerId) -> bool {
        self.inner.lock().entries.contains_key(&id)
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// True if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every registration.
    pub fn clear(&self) {
        self.inner.lock().entries.clear();
    }

    /// Deliver an event to every registered listener.
    ///
    /// A listener returning [`CallbackError::Failed`] is logged and kept; one
    /// returning [`CallbackError::Dead`] is dropped after the pass. Neither
    /// affects delivery to the remaining listeners.
    pub fn broadcast<F>(&self, mut deliver: F) -> BroadcastReport
    where
        F: FnMut(&H) -> CallbackResult,
    {
        let snapshot: Vec<(ListenerId, u64, H)> = {
            let inner = self.inner.lock();
            inner
                .entries
                .iter()
                .map(|(id, entry)| (*id, entry.generation, entry.handle.clone()))
                .collect()
        };

        let mut report = BroadcastReport::default();
        let mut dead = Vec::new();
        for (id, generation, handle) in &snapshot {
            match deliver(handle) {
                Ok(()) => report.delivered += 1,
                Err(CallbackError::Dead) => {
                    debug!("[{}] {} is dead, dropping", self.name, id);
                    dead.push((*id, *generation));
                }
                Err(e) => {
                    warn!("[{}] delivery to {} failed: {}", self.name, id, e);
                    report.failed += 1;
                }
            }
        }

        if !dead.is_empty() {
            let mut inner = self.inner.lock();
            for (id, generation) in dead {
                if inner
                    .entries
                    .get(&id)
                    .is_some_and(|entry| entry.generation == generation)
                {
                    inner.entries.remove(&id);
                    report.dropped += 1;
                }
            }
        }

        report
    }
}
