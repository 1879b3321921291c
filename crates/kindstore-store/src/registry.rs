//! Kind registry: maps a kind tag to the decoder for its record variant.
//!
//! The registry is filled once when the store is built. Adding a variant is
//! a single `register::<T>()` call; no decode site switches on kind strings.

use std::collections::HashMap;
use std::fmt;

use kindstore_types::{codec, validate_kind, Animal, CodecResult, Object, Person, Record};

use crate::error::{StoreError, StoreResult};

/// Decodes a payload into a boxed record of one specific variant.
pub type DecodeFn = fn(&[u8]) -> CodecResult<Box<dyn Object>>;

fn decode_boxed<T: Record>(data: &[u8]) -> CodecResult<Box<dyn Object>> {
    let record: T = codec::decode(data)?;
    Ok(Box::new(record))
}

/// Kind tag to decoder mapping.
#[derive(Clone, Default)]
pub struct KindRegistry {
    decoders: HashMap<String, DecodeFn>,
}

impl KindRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in [`Person`] and [`Animal`] variants.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.decoders.insert(Person::KIND.to_string(), decode_boxed::<Person>);
        registry.decoders.insert(Animal::KIND.to_string(), decode_boxed::<Animal>);
        registry
    }

    /// Register variant `T` under `T::KIND`.
    ///
    /// Fails if the kind is not a valid key prefix or is already taken.
    pub fn register<T: Record>(&mut self) -> StoreResult<&mut Self> {
        validate_kind(T::KIND)?;
        if self.decoders.contains_key(T::KIND) {
            return Err(StoreError::Config(format!(
                "kind {:?} is already registered",
                T::KIND
            )));
        }
        self.decoders.insert(T::KIND.to_string(), decode_boxed::<T>);
        Ok(self)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.decoders.contains_key(kind)
    }

    pub fn decoder(&self, kind: &str) -> Option<DecodeFn> {
        self.decoders.get(kind).copied()
    }

    /// Decode `data` as the variant registered for `kind`.
    ///
    /// `key` is only used to label a decode failure.
    pub fn decode(&self, kind: &str, key: &str, data: &[u8]) -> StoreResult<Box<dyn Object>> {
        let decode = self
            .decoder(kind)
            .ok_or_else(|| StoreError::UnknownKind(kind.to_string()))?;
        decode(data).map_err(|source| StoreError::Decode {
            key: key.to_string(),
            source,
        })
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.decoders.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

impl fmt::Debug for KindRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KindRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kindstore_types::KeyError;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Plant {
        id: String,
        name: String,
        height_cm: u32,
    }

    impl Object for Plant {
        fn kind(&self) -> &str {
            Self::KIND
        }
        fn id(&self) -> &str {
            &self.id
        }
        fn name(&self) -> &str {
            &self.name
        }
        fn set_id(&mut self, id: String) {
            self.id = id;
        }
        fn set_name(&mut self, name: String) {
            self.name = name;
        }
        fn encode(&self) -> CodecResult<Vec<u8>> {
            codec::encode(self)
        }
    }

    impl Record for Plant {
        const KIND: &'static str = "plant";
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Broken {
        id: String,
        name: String,
    }

    impl Object for Broken {
        fn kind(&self) -> &str {
            Self::KIND
        }
        fn id(&self) -> &str {
            &self.id
        }
        fn name(&self) -> &str {
            &self.name
        }
        fn set_id(&mut self, id: String) {
            self.id = id;
        }
        fn set_name(&mut self, name: String) {
            self.name = name;
        }
        fn encode(&self) -> CodecResult<Vec<u8>> {
            codec::encode(self)
        }
    }

    impl Record for Broken {
        const KIND: &'static str = "bro:ken";
    }

    #[test]
    fn builtin_kinds() {
        let registry = KindRegistry::with_builtin();
        assert_eq!(registry.kinds(), vec!["animal", "person"]);
        assert!(registry.contains("person"));
        assert!(!registry.contains("plant"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn register_adds_variant() {
        let mut registry = KindRegistry::with_builtin();
        registry.register::<Plant>().unwrap();
        assert!(registry.contains("plant"));

        let plant = Plant {
            id: "5".into(),
            name: "Fern".into(),
            height_cm: 40,
        };
        let payload = plant.encode().unwrap();
        let decoded = registry.decode("plant", "plant:5", &payload).unwrap();
        assert_eq!(decoded.downcast_ref::<Plant>().unwrap().height_cm, 40);
    }

    #[test]
    fn register_rejects_duplicates() {
        let mut registry = KindRegistry::with_builtin();
        let err = registry.register::<Person>().unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn register_rejects_separator_in_kind() {
        let mut registry = KindRegistry::new();
        let err = registry.register::<Broken>().unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidKey(KeyError::InvalidKind { .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn decode_unknown_kind() {
        let registry = KindRegistry::with_builtin();
        let err = registry.decode("robot", "robot:1", b"{}").unwrap_err();
        assert!(matches!(err, StoreError::UnknownKind(ref k) if k == "robot"));
    }

    #[test]
    fn decode_bad_payload_names_key() {
        let registry = KindRegistry::with_builtin();
        let err = registry.decode("person", "person:1", b"{oops").unwrap_err();
        assert!(matches!(err, StoreError::Decode { ref key, .. } if key == "person:1"));
    }

    #[test]
    fn decode_dispatches_on_kind() {
        let registry = KindRegistry::with_builtin();
        let payload = Animal::new("Fluffy", "cat").encode().unwrap();
        let obj = registry.decode("animal", "animal:2", &payload).unwrap();
        assert!(obj.is::<Animal>());
        assert_eq!(obj.name(), "Fluffy");
    }

    #[test]
    fn debug_lists_kinds() {
        let debug = format!("{:?}", KindRegistry::with_builtin());
        assert!(debug.contains("animal"));
        assert!(debug.contains("person"));
    }
}
