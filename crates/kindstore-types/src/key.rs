//! Storage key layout.
//!
//! Every record lives under a single key of the form `<kind>:<id>`. Both
//! components must be non-empty and must not contain the separator, since
//! the kind is recovered from a key by splitting on the first `:`.

use std::fmt;

use crate::error::KeyError;

/// Separator between the kind and id components of a key.
pub const KEY_SEPARATOR: char = ':';

/// Validate a kind tag, returning `Ok(())` if it can be used as a key prefix.
///
/// # Examples
///
/// ```
/// use kindstore_types::validate_kind;
///
/// assert!(validate_kind("person").is_ok());
/// assert!(validate_kind("").is_err());
/// assert!(validate_kind("a:b").is_err());
/// ```
pub fn validate_kind(kind: &str) -> Result<(), KeyError> {
    if kind.is_empty() {
        return Err(KeyError::EmptyKind);
    }
    if kind.contains(KEY_SEPARATOR) {
        return Err(KeyError::InvalidKind {
            kind: kind.to_string(),
        });
    }
    Ok(())
}

/// Validate a record id, returning `Ok(())` if it can be used as a key suffix.
pub fn validate_id(id: &str) -> Result<(), KeyError> {
    if id.is_empty() {
        return Err(KeyError::EmptyId);
    }
    if id.contains(KEY_SEPARATOR) {
        return Err(KeyError::InvalidId { id: id.to_string() });
    }
    Ok(())
}

/// A parsed `<kind>:<id>` storage key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryKey {
    kind: String,
    id: String,
}

impl EntryKey {
    /// Build a key from its components, validating both.
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Result<Self, KeyError> {
        let kind = kind.into();
        let id = id.into();
        validate_kind(&kind)?;
        validate_id(&id)?;
        Ok(Self { kind, id })
    }

    /// Parse a raw key by splitting on the first separator.
    ///
    /// Keys without a separator (such as the id counter) and keys whose id
    /// part contains a further separator are rejected.
    pub fn parse(raw: &str) -> Result<Self, KeyError> {
        let (kind, id) = raw
            .split_once(KEY_SEPARATOR)
            .ok_or_else(|| KeyError::Malformed(raw.to_string()))?;
        Self::new(kind, id).map_err(|_| KeyError::Malformed(raw.to_string()))
    }

    /// The kind component.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The id component.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Prefix shared by every key of `kind`, e.g. `person:`.
    pub fn kind_prefix(kind: &str) -> String {
        format!("{kind}{KEY_SEPARATOR}")
    }

    /// Suffix shared by every key with `id`, e.g. `:42`.
    pub fn id_suffix(id: &str) -> String {
        format!("{KEY_SEPARATOR}{id}")
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{KEY_SEPARATOR}{}", self.kind, self.id)
    }
}
