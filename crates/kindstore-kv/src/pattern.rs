use std::fmt;

/// Characters with special meaning in a Redis glob.
const GLOB_META: &[char] = &['*', '?', '[', ']', '\\'];

/// Key enumeration pattern.
///
/// Only the three shapes the object store needs are expressible, which keeps
/// local matching trivial and lets remote backends render an escaped glob.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyPattern {
    /// Every key (`*`).
    All,
    /// Keys starting with the given literal (`<prefix>*`).
    Prefix(String),
    /// Keys ending with the given literal (`*<suffix>`).
    Suffix(String),
}

impl KeyPattern {
    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self::Prefix(prefix.into())
    }

    pub fn suffix(suffix: impl Into<String>) -> Self {
        Self::Suffix(suffix.into())
    }

    /// Returns `true` if `key` matches this pattern.
    pub fn matches(&self, key: &str) -> bool {
        match self {
            Self::All => true,
            Self::Prefix(p) => key.starts_with(p.as_str()),
            Self::Suffix(s) => key.ends_with(s.as_str()),
        }
    }

    /// Render as a Redis `KEYS`/`SCAN MATCH` glob, escaping the literal part.
    pub fn to_glob(&self) -> String {
        match self {
            Self::All => "*".to_string(),
            Self::Prefix(p) => format!("{}*", escape_glob(p)),
            Self::Suffix(s) => format!("*{}", escape_glob(s)),
        }
    }
}

impl fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_glob())
    }
}

fn escape_glob(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    for ch in literal.chars() {
        if GLOB_META.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
