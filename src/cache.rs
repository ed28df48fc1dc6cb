// Bounded LRU cache of serialized range answers
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use tracing::debug;

/// Client-supplied `(min_date, max_date)` strings, exactly as received.
pub type RangeKey = (String, String);

type Slot = Arc<OnceLock<Arc<[u8]>>>;

struct Entry {
    slot: Slot,
    last_used: u64,
}

struct Inner {
    entries: HashMap<RangeKey, Entry>,
    tick: u64,
}

/// Memoizes range answers. Lookups for the same key share one computation;
/// different keys compute in parallel.
pub struct RangeCache {
    capacity: usize,
    inner: Mutex<Inner>,
}

impl RangeCache {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "cache capacity must be positive");
        Self {
            capacity,
            inner: Mutex::new(Inner {
                entries: HashMap::with_capacity(capacity + 1),
                tick: 0,
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: &RangeKey) -> bool {
        self.lock().entries.contains_key(key)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // the map stays consistent even if a holder panicked
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Finds or creates the slot for `key`, marking it most recently used and
    /// evicting least recently used finished entries when over capacity.
    fn slot(&self, key: &RangeKey) -> Slot {
        let mut inner = self.lock();
        inner.tick += 1;
        let tick = inner.tick;

        if let Some(entry) = inner.entries.get_mut(key) {
            entry.last_used = tick;
            return Arc::clone(&entry.slot);
        }

        let slot: Slot = Arc::new(OnceLock::new());
        inner.entries.insert(
            key.clone(),
            Entry {
                slot: Arc::clone(&slot),
                last_used: tick,
            },
        );

        // only finished entries are evictable; while computations are in
        // flight the map may hold more than `capacity` entries
        while inner.entries.len() > self.capacity {
            let oldest = inner
                .entries
                .iter()
                .filter(|(candidate, entry)| *candidate != key && entry.slot.get().is_some())
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone());
            let Some(oldest) = oldest else {
                debug!(action = "overflow", component = "range_cache", len = inner.entries.len(), capacity = self.capacity, "All other entries are still computing");
                break;
            };
            inner.entries.remove(&oldest);
            debug!(action = "evict", component = "range_cache", min_date = %oldest.0, max_date = %oldest.1, "Evicted least recently used entry");
        }
        slot
    }

    /// Returns the cached answer for `key`, running `compute` only on a miss.
    /// Concurrent callers with the same key wait for a single `compute`.
    pub fn get_or_compute<F>(&self, key: &RangeKey, compute: F) -> Arc<[u8]>
    where
        F: FnOnce() -> Vec<u8>,
    {
        let slot = self.slot(key);
        Arc::clone(slot.get_or_init(|| {
            debug!(action = "miss", component = "range_cache", min_date = %key.0, max_date = %key.1, "Computing range answer");
            Arc::from(compute())
        }))
    }
}
