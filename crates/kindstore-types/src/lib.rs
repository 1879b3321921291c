//! Foundation types for kindstore.
//!
//! This crate defines what a storable record is and how it is laid out in a
//! flat key-value namespace. Every other kindstore crate depends on
//! `kindstore-types`.
//!
//! # Key Types
//!
//! - [`Object`] - Object-safe record contract (kind, id, name, encode)
//! - [`Record`] - Concrete, decodable record variant with a fixed kind tag
//! - [`EntryKey`] - The `<kind>:<id>` storage key
//! - [`Person`], [`Animal`] - Built-in record variants
//!
//! Payloads are JSON objects carrying a `kind` tag next to the record's own
//! fields; see [`codec`].

pub mod codec;
pub mod error;
pub mod key;
pub mod object;
pub mod records;

pub use codec::{decode, encode};
pub use error::{CodecError, CodecResult, KeyError};
pub use key::{validate_id, validate_kind, EntryKey, KEY_SEPARATOR};
pub use object::{AsAny, Object, Record};
pub use records::{Animal, Person};
