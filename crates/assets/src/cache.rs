use crate::error::ResourceError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};

/// Loads one asset type from disk and releases its native resources.
///
/// The trait is the cache's test seam: production loaders decode real
/// files, tests inject counting stubs.
pub trait AssetLoader {
    type Asset;

    fn load(&self, path: &Path) -> Result<Self::Asset, ResourceError>;

    /// Release native resources when the cache evicts the asset.
    fn dispose(&self, _asset: &Self::Asset) {}
}

enum Slot<A> {
    /// A load is in flight; acquirers wait and re-examine.
    Loading,
    Ready { asset: Arc<A>, refs: u32 },
}

/// Reference-counted cache for one asset type.
///
/// `acquire` returns the shared handle, bumping the count on a hit and
/// loading on a miss. While a load is in flight, further acquires of the
/// same key block on the condvar and share the one result — exactly one
/// load runs per key per miss. `release` drops the count; at zero the
/// entry is evicted and the loader's `dispose` runs.
pub struct ResourceCache<L: AssetLoader> {
    loader: L,
    base_path: PathBuf,
    slots: Mutex<BTreeMap<String, Slot<L::Asset>>>,
    loaded: Condvar,
}

impl<L: AssetLoader> ResourceCache<L> {
    pub fn new(loader: L, base_path: impl Into<PathBuf>) -> Self {
        Self {
            loader,
            base_path: base_path.into(),
            slots: Mutex::new(BTreeMap::new()),
            loaded: Condvar::new(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the named asset, loading it on a miss.
    pub fn acquire(&self, name: &str) -> Result<Arc<L::Asset>, ResourceError> {
        let mut slots = self.lock_slots();
        loop {
            match slots.get_mut(name) {
                Some(Slot::Ready { asset, refs }) => {
                    *refs += 1;
                    return Ok(Arc::clone(asset));
                }
                Some(Slot::Loading) => {
                    slots = self
                        .loaded
                        .wait(slots)
                        .unwrap_or_else(|e| e.into_inner());
                }
                None => break,
            }
        }
        slots.insert(name.to_string(), Slot::Loading);
        drop(slots);

        // The load runs outside the lock so resident entries stay reachable
        // while the file is read.
        let result = self.loader.load(&self.base_path.join(name));

        let mut slots = self.lock_slots();
        match result {
            Ok(asset) => {
                let asset = Arc::new(asset);
                slots.insert(
                    name.to_string(),
                    Slot::Ready {
                        asset: Arc::clone(&asset),
                        refs: 1,
                    },
                );
                self.loaded.notify_all();
                tracing::debug!(name, "asset loaded");
                Ok(asset)
            }
            Err(err) => {
                // No stale entry: waiters wake, see the empty slot, and
                // retry the load themselves.
                slots.remove(name);
                self.loaded.notify_all();
                tracing::warn!(name, error = %err, "asset load failed");
                Err(err)
            }
        }
    }

    /// Drop one reference to the named asset. Releasing an unknown key is
    /// a no-op. When the count reaches zero the entry is evicted and the
    /// loader disposes it.
    pub fn release(&self, name: &str) {
        let evicted = {
            let mut slots = self.lock_slots();
            match slots.get_mut(name) {
                Some(Slot::Ready { refs, .. }) => {
                    *refs -= 1;
                    if *refs == 0 {
                        match slots.remove(name) {
                            Some(Slot::Ready { asset, .. }) => Some(asset),
                            _ => None,
                        }
                    } else {
                        None
                    }
                }
                _ => None,
            }
        };
        // Dispose outside the lock.
        if let Some(asset) = evicted {
            self.loader.dispose(&asset);
            tracing::debug!(name, "asset evicted");
        }
    }

    /// Current reference count for a resident entry.
    pub fn ref_count(&self, name: &str) -> Option<u32> {
        match self.lock_slots().get(name) {
            Some(Slot::Ready { refs, .. }) => Some(*refs),
            _ => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock_slots().contains_key(name)
    }

    /// Number of resident (or in-flight) entries.
    pub fn len(&self) -> usize {
        self.lock_slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_slots(&self) -> MutexGuard<'_, BTreeMap<String, Slot<L::Asset>>> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    /// Stub loader: counts loads and disposals, optionally failing or
    /// sleeping to hold a load in flight.
    #[derive(Default)]
    struct StubLoader {
        loads: AtomicU32,
        disposals: AtomicU32,
        fail_first: AtomicU32,
        delay: Option<Duration>,
    }

    impl AssetLoader for StubLoader {
        type Asset = String;

        fn load(&self, path: &Path) -> Result<String, ResourceError> {
            if let Some(delay) = self.delay {
                std::thread::sleep(delay);
            }
            self.loads.fetch_add(1, Ordering::SeqCst);
            if self
                .fail_first
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(ResourceError::Decode {
                    path: path.to_path_buf(),
                    reason: "stub failure".into(),
                });
            }
            Ok(path.display().to_string())
        }

        fn dispose(&self, _asset: &String) {
            self.disposals.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn stub_cache() -> ResourceCache<StubLoader> {
        ResourceCache::new(StubLoader::default(), "assets/test")
    }

    #[test]
    fn hit_increments_and_shares() {
        let cache = stub_cache();
        let a = cache.acquire("a.bin").unwrap();
        let b = cache.acquire("a.bin").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.ref_count("a.bin"), Some(2));
        assert_eq!(cache.loader.loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn acquire_n_release_n_empties_cache() {
        let cache = stub_cache();
        for _ in 0..3 {
            cache.acquire("a.bin").unwrap();
        }
        for _ in 0..2 {
            cache.release("a.bin");
        }
        assert_eq!(cache.ref_count("a.bin"), Some(1));
        assert!(cache.contains("a.bin"));

        cache.release("a.bin");
        assert!(!cache.contains("a.bin"));
        assert!(cache.is_empty());
        assert_eq!(cache.loader.disposals.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn release_unknown_key_is_noop() {
        let cache = stub_cache();
        cache.release("missing.bin");
        cache.acquire("a.bin").unwrap();
        cache.release("a.bin");
        // Extra release after eviction is also a no-op.
        cache.release("a.bin");
        assert_eq!(cache.loader.disposals.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_load_leaves_no_entry() {
        let cache = ResourceCache::new(
            StubLoader {
                fail_first: AtomicU32::new(1),
                ..Default::default()
            },
            "assets/test",
        );
        assert!(cache.acquire("a.bin").is_err());
        assert!(!cache.contains("a.bin"));
        // The next acquire retries fresh and succeeds.
        assert!(cache.acquire("a.bin").is_ok());
        assert_eq!(cache.loader.loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn concurrent_acquires_share_one_load() {
        let cache = Arc::new(ResourceCache::new(
            StubLoader {
                delay: Some(Duration::from_millis(50)),
                ..Default::default()
            },
            "assets/test",
        ));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.acquire("shared.bin").map(|_| ()))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        assert_eq!(cache.loader.loads.load(Ordering::SeqCst), 1);
        assert_eq!(cache.ref_count("shared.bin"), Some(4));
    }

    #[test]
    fn distinct_keys_load_independently() {
        let cache = stub_cache();
        cache.acquire("a.bin").unwrap();
        cache.acquire("b.bin").unwrap();
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.loader.loads.load(Ordering::SeqCst), 2);
    }
}
