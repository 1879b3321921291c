//! Payload encoding.
//!
//! A payload is a JSON object holding the record's own fields plus a `kind`
//! tag, e.g. `{"kind":"person","id":"1","name":"Alice","age":30}`. The tag
//! lets a payload be checked against the variant chosen from its key.

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, CodecResult};
use crate::object::Record;

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    kind: &'a str,
    #[serde(flatten)]
    record: &'a T,
}

/// Just the tag, read before committing to a variant's field layout.
#[derive(Deserialize)]
struct Tag {
    kind: String,
}

#[derive(Deserialize)]
struct Envelope<T> {
    kind: String,
    #[serde(flatten)]
    record: T,
}

/// Encode a record into its tagged payload.
pub fn encode<T: Record>(record: &T) -> CodecResult<Vec<u8>> {
    let envelope = EnvelopeRef {
        kind: T::KIND,
        record,
    };
    Ok(serde_json::to_vec(&envelope)?)
}

/// Decode a payload into `T`, rejecting payloads tagged with another kind.
pub fn decode<T: Record>(data: &[u8]) -> CodecResult<T> {
    let Tag { kind } = serde_json::from_slice(data)?;
    if kind != T::KIND {
        return Err(CodecError::KindMismatch {
            expected: T::KIND.to_string(),
            found: kind,
        });
    }
    let envelope: Envelope<T> = serde_json::from_slice(data)?;
    Ok(envelope.record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Animal, Person};

    #[test]
    fn payload_carries_kind_and_fields() {
        let mut person = Person::new("Alice", 30);
        person.id = "1".into();
        let value: serde_json::Value = serde_json::from_slice(&encode(&person).unwrap()).unwrap();
        assert_eq!(value["kind"], "person");
        assert_eq!(value["id"], "1");
        assert_eq!(value["name"], "Alice");
        assert_eq!(value["age"], 30);
    }

    #[test]
    fn decode_restores_every_field() {
        let mut animal = Animal::new("Fluffy", "cat");
        animal.id = "2".into();
        let decoded: Animal = decode(&encode(&animal).unwrap()).unwrap();
        assert_eq!(decoded, animal);
    }

    #[test]
    fn decode_rejects_other_kind() {
        let payload = encode(&Person::new("Alice", 30)).unwrap();
        let err = decode::<Animal>(&payload).unwrap_err();
        assert!(matches!(
            err,
            CodecError::KindMismatch { ref expected, ref found }
                if expected == "animal" && found == "person"
        ));
    }

    #[test]
    fn decode_reports_mismatch_between_same_shaped_kinds() {
        let payload = br#"{"kind":"animal","id":"5","name":"Rex","age":3}"#;
        assert!(matches!(
            decode::<Person>(payload),
            Err(CodecError::KindMismatch { ref found, .. }) if found == "animal"
        ));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            decode::<Person>(b"not json"),
            Err(CodecError::Json(_))
        ));
    }

    #[test]
    fn decode_requires_kind_tag() {
        let untagged = br#"{"id":"1","name":"Alice","age":30}"#;
        assert!(decode::<Person>(untagged).is_err());
    }
}
