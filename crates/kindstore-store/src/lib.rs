//! Polymorphic object store for kindstore.
//!
//! One backing key-value namespace holds records of many kinds. This crate
//! maps the five store operations onto that namespace:
//!
//! - **store**: allocate an id from a shared counter, write `<kind>:<id>`
//! - **get by id**: scan for `*:<id>`, decode by the kind in front of it
//! - **get by name**: scan every key, decode, compare names
//! - **list**: scan `<kind>:*`, decode each entry
//! - **delete**: scan for `*:<id>`, delete the match
//!
//! # Modules
//!
//! - [`traits`] - The [`ObjectDb`] contract
//! - [`db`] - [`KvObjectDb`], the adapter over any [`KvBackend`]
//! - [`registry`] - [`KindRegistry`], kind tag to decoder dispatch
//! - [`context`] - [`Context`], cancellation and deadlines
//! - [`config`] - [`StoreConfig`]
//!
//! [`KvBackend`]: kindstore_kv::KvBackend

pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod registry;
pub mod traits;

pub use config::StoreConfig;
pub use context::Context;
pub use db::KvObjectDb;
pub use error::{StoreError, StoreResult};
pub use registry::{DecodeFn, KindRegistry};
pub use traits::ObjectDb;
