//! Backing key-value service for kindstore.
//!
//! The object store needs very little from its backend: an atomic counter,
//! unconditional get/set/delete of byte values, and key enumeration by
//! prefix or suffix. [`KvBackend`] captures exactly that.
//!
//! # Backends
//!
//! - [`InMemoryKv`] - `BTreeMap`-based backend for tests and embedding
//! - `RedisKv` - pooled Redis backend (feature `redis`)
//!
//! # Design Rules
//!
//! 1. Counter increments are atomic; no two callers observe the same value.
//! 2. Writes overwrite unconditionally and never expire.
//! 3. Enumeration is a snapshot of key names only; values are read separately.
//! 4. Backend errors are returned as-is, never retried.

pub mod config;
pub mod error;
pub mod memory;
pub mod pattern;
#[cfg(feature = "redis")]
pub mod redis_kv;
pub mod traits;

pub use config::RedisConfig;
pub use error::{KvError, KvResult};
pub use memory::InMemoryKv;
pub use pattern::KeyPattern;
#[cfg(feature = "redis")]
pub use redis_kv::RedisKv;
pub use traits::KvBackend;
