// Compute-once cache of classified beatmaps keyed by beatmap identity

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use catch_model::BeatmapKey;
use log::trace;

use crate::calculator::ClassifiedBeatmap;

/// Storage for classified beatmaps shared between checks.
///
/// Implementations must compute at most once per key when several callers
/// ask for the same missing key at the same time.
pub trait DistanceCache: Send + Sync {
    /// Previously stored result for `key`, if any.
    fn get(&self, key: &BeatmapKey) -> Option<Arc<ClassifiedBeatmap>>;

    /// Store `classified` under its own key, replacing any previous value.
    fn insert(&self, classified: ClassifiedBeatmap) -> Arc<ClassifiedBeatmap>;

    /// Return the stored result for `key`, running `compute` only if there is none.
    ///
    /// A failed computation stores nothing.
    fn get_or_compute(
        &self,
        key: &BeatmapKey,
        compute: &dyn Fn() -> Result<ClassifiedBeatmap>,
    ) -> Result<Arc<ClassifiedBeatmap>>;

    /// Drop the stored result for `key`.
    fn invalidate(&self, key: &BeatmapKey) -> Option<Arc<ClassifiedBeatmap>>;
}

type Slot = Arc<Mutex<Option<Arc<ClassifiedBeatmap>>>>;

// Stored values are immutable once published, so a poisoned lock holds nothing half-written
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process `DistanceCache`.
///
/// Each key has its own slot; the slot stays locked while its value is
/// computed, so concurrent first requests wait for one computation instead
/// of repeating it, while other keys proceed independently.
#[derive(Debug, Default)]
pub struct MemoryDistanceCache {
    slots: Mutex<HashMap<BeatmapKey, Slot>>,
}

impl MemoryDistanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: &BeatmapKey) -> Slot {
        let mut slots = lock(&self.slots);
        Arc::clone(slots.entry(key.clone()).or_default())
    }

    fn existing_slot(&self, key: &BeatmapKey) -> Option<Slot> {
        lock(&self.slots).get(key).map(Arc::clone)
    }

    /// Drop `slot` from the map if it is still empty and no other caller holds it.
    ///
    /// Must not be called with `slot` locked.
    fn discard_empty_slot(&self, key: &BeatmapKey, slot: &Slot) {
        let mut slots = lock(&self.slots);
        // the map and `slot` itself; clones are only handed out under the map lock
        let unused = slots
            .get(key)
            .is_some_and(|stored| Arc::ptr_eq(stored, slot) && Arc::strong_count(slot) == 2);
        if unused && lock(slot).is_none() {
            slots.remove(key);
        }
    }

    /// Number of keys with a stored result.
    pub fn len(&self) -> usize {
        let slots: Vec<Slot> = lock(&self.slots).values().map(Arc::clone).collect();
        slots.iter().filter(|slot| lock(slot).is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DistanceCache for MemoryDistanceCache {
    fn get(&self, key: &BeatmapKey) -> Option<Arc<ClassifiedBeatmap>> {
        let slot = self.existing_slot(key)?;
        let value = lock(&slot).clone();
        value
    }

    fn insert(&self, classified: ClassifiedBeatmap) -> Arc<ClassifiedBeatmap> {
        let slot = self.slot(classified.key());
        let classified = Arc::new(classified);
        *lock(&slot) = Some(Arc::clone(&classified));
        classified
    }

    fn get_or_compute(
        &self,
        key: &BeatmapKey,
        compute: &dyn Fn() -> Result<ClassifiedBeatmap>,
    ) -> Result<Arc<ClassifiedBeatmap>> {
        let slot = self.slot(key);
        let mut value = lock(&slot);
        if let Some(existing) = value.as_ref() {
            trace!("distance cache hit for {key}");
            return Ok(Arc::clone(existing));
        }

        let computed = match compute() {
            Ok(computed) => Arc::new(computed),
            Err(err) => {
                drop(value);
                self.discard_empty_slot(key, &slot);
                return Err(err);
            }
        };
        *value = Some(Arc::clone(&computed));
        Ok(computed)
    }

    fn invalidate(&self, key: &BeatmapKey) -> Option<Arc<ClassifiedBeatmap>> {
        let slot = lock(&self.slots).remove(key)?;
        let value = lock(&slot).take();
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use catch_model::BeatmapMetadata;

    fn key(version: &str) -> BeatmapKey {
        BeatmapKey::from_metadata(&BeatmapMetadata {
            version: version.to_string(),
            ..Default::default()
        })
    }

    fn empty(version: &str) -> ClassifiedBeatmap {
        ClassifiedBeatmap::new(key(version), Vec::new())
    }

    #[test]
    fn missing_key_is_none() {
        let cache = MemoryDistanceCache::new();
        assert!(cache.get(&key("Rain")).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn insert_then_get() {
        let cache = MemoryDistanceCache::new();
        let stored = cache.insert(empty("Rain"));
        let fetched = cache.get(&key("Rain")).unwrap();
        assert!(Arc::ptr_eq(&stored, &fetched));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn insert_replaces() {
        let cache = MemoryDistanceCache::new();
        let first = cache.insert(empty("Rain"));
        let second = cache.insert(empty("Rain"));
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&second, &cache.get(&key("Rain")).unwrap()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn compute_runs_once() {
        let cache = MemoryDistanceCache::new();
        let calls = AtomicUsize::new(0);
        let compute = || -> Result<ClassifiedBeatmap> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(empty("Platter"))
        };

        let a = cache.get_or_compute(&key("Platter"), &compute).unwrap();
        let b = cache.get_or_compute(&key("Platter"), &compute).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_compute_stores_nothing() {
        let cache = MemoryDistanceCache::new();
        let result = cache.get_or_compute(&key("Salad"), &|| -> Result<ClassifiedBeatmap> {
            anyhow::bail!("broken beatmap")
        });
        assert!(result.is_err());
        assert!(cache.get(&key("Salad")).is_none());
        assert!(lock(&cache.slots).is_empty());

        let retried = cache.get_or_compute(&key("Salad"), &|| -> Result<ClassifiedBeatmap> {
            Ok(empty("Salad"))
        });
        assert!(retried.is_ok());
    }

    #[test]
    fn repeated_failures_do_not_grow_the_map() {
        let cache = MemoryDistanceCache::new();
        for version in ["Cup", "Salad", "Platter", "Rain"] {
            let result = cache.get_or_compute(&key(version), &|| -> Result<ClassifiedBeatmap> {
                anyhow::bail!("broken beatmap")
            });
            assert!(result.is_err());
        }
        assert!(lock(&cache.slots).is_empty());
        assert!(cache.is_empty());
    }

    #[test]
    fn failure_keeps_slot_with_a_stored_value() {
        let cache = MemoryDistanceCache::new();
        let stored = cache.insert(empty("Rain"));
        let fetched = cache
            .get_or_compute(&key("Rain"), &|| -> Result<ClassifiedBeatmap> {
                anyhow::bail!("not called")
            })
            .unwrap();
        assert!(Arc::ptr_eq(&stored, &fetched));
        assert_eq!(lock(&cache.slots).len(), 1);
    }

    #[test]
    fn concurrent_first_access_computes_once() {
        let cache = MemoryDistanceCache::new();
        let calls = AtomicUsize::new(0);
        let compute = || -> Result<ClassifiedBeatmap> {
            calls.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(20));
            Ok(empty("Overdose"))
        };

        let results: Vec<Arc<ClassifiedBeatmap>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| cache.get_or_compute(&key("Overdose"), &compute).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|r| Arc::ptr_eq(r, &results[0])));
    }

    #[test]
    fn invalidate_removes() {
        let cache = MemoryDistanceCache::new();
        cache.insert(empty("Cup"));
        assert!(cache.invalidate(&key("Cup")).is_some());
        assert!(cache.get(&key("Cup")).is_none());
        assert!(cache.invalidate(&key("Cup")).is_none());
    }
}
