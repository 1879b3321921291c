use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::error::{KvError, KvResult};
use crate::pattern::KeyPattern;
use crate::traits::KvBackend;

/// In-memory, `BTreeMap`-based key-value backend.
///
/// Intended for tests and embedding. Counters live in the same namespace as
/// ordinary values, stored as ASCII decimal strings the way Redis keeps
/// them, so a counter key shows up in `keys(&KeyPattern::All)`. Enumeration
/// order is lexicographic.
pub struct InMemoryKv {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryKv {
    /// Create a new empty backend.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    fn read_map(&self) -> KvResult<RwLockReadGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.entries
            .read()
            .map_err(|e| KvError::Poisoned(e.to_string()))
    }

    fn write_map(&self) -> KvResult<RwLockWriteGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.entries
            .write()
            .map_err(|e| KvError::Poisoned(e.to_string()))
    }

    /// Number of keys currently held, counters included.
    pub fn len(&self) -> KvResult<usize> {
        Ok(self.read_map()?.len())
    }

    /// Returns `true` if no keys are held.
    pub fn is_empty(&self) -> KvResult<bool> {
        Ok(self.read_map()?.is_empty())
    }

    /// Remove every key, counters included.
    pub fn clear(&self) -> KvResult<()> {
        self.write_map()?.clear();
        Ok(())
    }

    /// Sorted list of every key.
    pub fn all_keys(&self) -> KvResult<Vec<String>> {
        Ok(self.read_map()?.keys().cloned().collect())
    }
}

impl Default for InMemoryKv {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KvBackend for InMemoryKv {
    async fn incr(&self, key: &str) -> KvResult<i64> {
        let mut map = self.write_map()?;
        let current = match map.get(key) {
            None => 0,
            Some(raw) => std::str::from_utf8(raw)
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .ok_or_else(|| KvError::NotAnInteger {
                    key: key.to_string(),
                })?,
        };
        let next = current.checked_add(1).ok_or_else(|| KvError::NotAnInteger {
            key: key.to_string(),
        })?;
        map.insert(key.to_string(), next.to_string().into_bytes());
        Ok(next)
    }

    async fn get(&self, key: &str) -> KvResult<Option<Vec<u8>>> {
        Ok(self.read_map()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> KvResult<()> {
        self.write_map()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> KvResult<bool> {
        Ok(self.write_map()?.remove(key).is_some())
    }

    async fn keys(&self, pattern: &KeyPattern) -> KvResult<Vec<String>> {
        let map = self.read_map()?;
        let keys = match pattern {
            // Prefix scans can use the ordered range directly.
            KeyPattern::Prefix(prefix) => map
                .range(prefix.clone()..)
                .take_while(|(k, _)| k.starts_with(prefix.as_str()))
                .map(|(k, _)| k.clone())
                .collect(),
            _ => map
                .keys()
                .filter(|k| pattern.matches(k))
                .cloned()
                .collect(),
        };
        Ok(keys)
    }

    async fn exists(&self, key: &str) -> KvResult<bool> {
        Ok(self.read_map()?.contains_key(key))
    }
}

impl std::fmt::Debug for InMemoryKv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryKv")
            .field("key_count", &self.len().ok())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    // -----------------------------------------------------------------------
    // Counter
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn incr_starts_at_one() {
        let kv = InMemoryKv::new();
        assert_eq!(kv.incr("counter").await.unwrap(), 1);
        assert_eq!(kv.incr("counter").await.unwrap(), 2);
        assert_eq!(kv.get("counter").await.unwrap(), Some(b"2".to_vec()));
    }

    #[tokio::test]
    async fn incr_rejects_non_integer() {
        let kv = InMemoryKv::new();
        kv.set("counter", b"abc").await.unwrap();
        let err = kv.incr("counter").await.unwrap_err();
        assert!(matches!(err, KvError::NotAnInteger { .. }));
    }

    #[tokio::test]
    async fn incr_continues_from_stored_integer() {
        let kv = InMemoryKv::new();
        kv.set("counter", b"41").await.unwrap();
        assert_eq!(kv.incr("counter").await.unwrap(), 42);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_incr_yields_distinct_values() {
        let kv = Arc::new(InMemoryKv::new());
        let handles: Vec<_> = (0..32)
            .map(|_| {
                let kv = Arc::clone(&kv);
                tokio::spawn(async move { kv.incr("counter").await.unwrap() })
            })
            .collect();

        let mut values = Vec::new();
        for h in handles {
            values.push(h.await.unwrap());
        }
        values.sort();
        assert_eq!(values, (1..=32).collect::<Vec<i64>>());
    }

    // -----------------------------------------------------------------------
    // Get / Set / Delete
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn set_then_get() {
        let kv = InMemoryKv::new();
        kv.set("person:1", b"payload").await.unwrap();
        assert_eq!(kv.get("person:1").await.unwrap(), Some(b"payload".to_vec()));
        assert!(kv.exists("person:1").await.unwrap());
    }

    #[tokio::test]
    async fn set_overwrites() {
        let kv = InMemoryKv::new();
        kv.set("k", b"one").await.unwrap();
        kv.set("k", b"two").await.unwrap();
        assert_eq!(kv.get("k").await.unwrap(), Some(b"two".to_vec()));
        assert_eq!(kv.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn get_missing_is_none() {
        let kv = InMemoryKv::new();
        assert!(kv.get("nope").await.unwrap().is_none());
        assert!(!kv.exists("nope").await.unwrap());
    }

    #[tokio::test]
    async fn delete_reports_presence() {
        let kv = InMemoryKv::new();
        kv.set("k", b"v").await.unwrap();
        assert!(kv.delete("k").await.unwrap());
        assert!(!kv.delete("k").await.unwrap());
        assert!(kv.is_empty().unwrap());
    }

    // -----------------------------------------------------------------------
    // Enumeration
    // -----------------------------------------------------------------------

    async fn seeded() -> InMemoryKv {
        let kv = InMemoryKv::new();
        for key in ["person:1", "animal:2", "person:3", "personal:4", "object_counter"] {
            kv.set(key, b"x").await.unwrap();
        }
        kv
    }

    #[tokio::test]
    async fn keys_all_is_sorted() {
        let kv = seeded().await;
        let keys = kv.keys(&KeyPattern::All).await.unwrap();
        assert_eq!(
            keys,
            vec!["animal:2", "object_counter", "person:1", "person:3", "personal:4"]
        );
    }

    #[tokio::test]
    async fn keys_by_prefix() {
        let kv = seeded().await;
        let keys = kv.keys(&KeyPattern::prefix("person:")).await.unwrap();
        assert_eq!(keys, vec!["person:1", "person:3"]);
    }

    #[tokio::test]
    async fn keys_by_suffix() {
        let kv = seeded().await;
        let keys = kv.keys(&KeyPattern::suffix(":2")).await.unwrap();
        assert_eq!(keys, vec!["animal:2"]);
        assert!(kv.keys(&KeyPattern::suffix(":9")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clear_and_all_keys() {
        let kv = seeded().await;
        assert_eq!(kv.all_keys().unwrap().len(), 5);
        kv.clear().unwrap();
        assert!(kv.is_empty().unwrap());
    }

    #[test]
    fn poisoned_lock_is_reported() {
        let kv = Arc::new(InMemoryKv::new());
        let holder = Arc::clone(&kv);
        let _ = std::thread::spawn(move || {
            let _guard = holder.entries.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(matches!(kv.len(), Err(KvError::Poisoned(_))));
        assert!(matches!(kv.is_empty(), Err(KvError::Poisoned(_))));
        assert!(matches!(kv.all_keys(), Err(KvError::Poisoned(_))));
    }

    #[test]
    fn debug_format() {
        let kv = InMemoryKv::default();
        let debug = format!("{kv:?}");
        assert!(debug.contains("InMemoryKv"));
        assert!(debug.contains("key_count"));
    }
}
