use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::CodecResult;
use crate::object::{Object, Record};

// ---------------------------------------------------------------------------
// Person
// ---------------------------------------------------------------------------

/// A person record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub age: i32,
}

impl Person {
    /// Create a transient (not yet stored) person.
    pub fn new(name: impl Into<String>, age: i32) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            age,
        }
    }
}

impl Object for Person {
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

impl Record for Person {
    const KIND: &'static str = "person";
}

// ---------------------------------------------------------------------------
// Animal
// ---------------------------------------------------------------------------

/// An animal record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animal {
    pub id: String,
    pub name: String,
    /// Serialized as `type`.
    #[serde(rename = "type")]
    pub species: String,
}

impl Animal {
    /// Create a transient (not yet stored) animal.
    pub fn new(name: impl Into<String>, species: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            species: species.into(),
        }
    }
}

impl Object for Animal {
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

impl Record for Animal {
    const KIND: &'static str = "animal";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_records_are_transient() {
        assert_eq!(Person::new("Alice", 30).id, "");
        assert_eq!(Animal::new("Rover", "dog").id, "");
    }

    #[test]
    fn kinds_are_fixed_per_variant() {
        assert_eq!(Person::new("a", 1).kind(), "person");
        assert_eq!(Animal::new("b", "c").kind(), "animal");
        assert_ne!(Person::KIND, Animal::KIND);
    }

    #[test]
    fn animal_species_is_serialized_as_type() {
        let json = serde_json::to_value(Animal::new("Rover", "Golden Retriever")).unwrap();
        assert_eq!(json["type"], "Golden Retriever");
        assert!(json.get("species").is_none());
    }

    #[test]
    fn encode_goes_through_codec() {
        let person = Person::new("Alice", 30);
        let decoded: Person = codec::decode(&person.encode().unwrap()).unwrap();
        assert_eq!(decoded, person);
    }
}
