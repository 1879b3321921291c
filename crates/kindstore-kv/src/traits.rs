use async_trait::async_trait;

use crate::error::KvResult;
use crate::pattern::KeyPattern;

/// Backing key-value service used by the object store.
///
/// All implementations must satisfy these invariants:
/// - `incr` is atomic across every client of the backend. A missing key
///   counts as `0`, so the first increment returns `1`.
/// - `set` overwrites unconditionally and sets no expiry.
/// - `keys` returns a point-in-time list of names; a key it reports may be
///   gone by the time it is read.
/// - Failures are propagated, never retried or swallowed.
#[async_trait]
pub trait KvBackend: Send + Sync {
    /// Atomically increment the integer at `key` and return the new value.
    async fn incr(&self, key: &str) -> KvResult<i64>;

    /// Read the value at `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    async fn get(&self, key: &str) -> KvResult<Option<Vec<u8>>>;

    /// Write `value` at `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &[u8]) -> KvResult<()>;

    /// Delete `key`. Returns `true` if the key existed.
    async fn delete(&self, key: &str) -> KvResult<bool>;

    /// List every key matching `pattern`, in backend enumeration order.
    async fn keys(&self, pattern: &KeyPattern) -> KvResult<Vec<String>>;

    /// Check whether `key` exists.
    ///
    /// Default implementation reads the value. Backends may override with a
    /// cheaper existence probe.
    async fn exists(&self, key: &str) -> KvResult<bool> {
        Ok(self.get(key).await?.is_some())
    }
}
