//! How `uuid::Uuid` ids are written to MongoDB.
//!
//! Every collection stores ids as BSON binary subtype 4. A plain `Uuid` field
//! is unsafe here: the driver's document serializer is not human-readable, so
//! it writes generic binary, while `to_bson` writes a string, and the two
//! never compare equal in a filter. Document structs use the `with` modules
//! below and filters use [`uuid_bson`], so both sides always agree.

use mongodb::bson::{self, Bson};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// The driver's UUID type for `id`
pub fn stored_uuid(id: Uuid) -> bson::Uuid {
    bson::Uuid::from_bytes(id.into_bytes())
}

/// `id` as a filter or update operand
pub fn uuid_bson(id: Uuid) -> Bson {
    Bson::from(stored_uuid(id))
}

fn from_stored(id: bson::Uuid) -> Uuid {
    Uuid::from_bytes(id.bytes())
}

/// `#[serde(with = "database::mongodb::uuid_as_binary")]` for a `Uuid` field
pub mod uuid_as_binary {
    use super::*;

    pub fn serialize<S: Serializer>(id: &Uuid, serializer: S) -> Result<S::Ok, S::Error> {
        stored_uuid(*id).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Uuid, D::Error> {
        bson::Uuid::deserialize(deserializer).map(from_stored)
    }
}

/// `#[serde(with = "database::mongodb::uuid_vec_as_binary")]` for a `Vec<Uuid>` field
pub mod uuid_vec_as_binary {
    use super::*;

    pub fn serialize<S: Serializer>(ids: &[Uuid], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(ids.iter().map(|id| stored_uuid(*id)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Uuid>, D::Error> {
        let ids = Vec::<bson::Uuid>::deserialize(deserializer)?;
        Ok(ids.into_iter().map(from_stored).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, spec::BinarySubtype};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Stored {
        #[serde(rename = "_id", with = "uuid_as_binary")]
        id: Uuid,
        #[serde(default, with = "uuid_vec_as_binary")]
        refs: Vec<Uuid>,
    }

    #[test]
    fn test_written_id_matches_filter_operand() {
        let id = Uuid::now_v7();
        let other = Uuid::now_v7();
        let stored = Stored { id, refs: vec![other] };

        // Same serializer the driver uses for inserts
        let raw = bson::to_raw_document_buf(&stored).unwrap();
        let written = raw.to_document().unwrap();

        assert_eq!(written.get("_id"), Some(&uuid_bson(id)));
        assert_eq!(written.get_array("refs").unwrap(), &vec![uuid_bson(other)]);

        let filter = doc! { "_id": uuid_bson(id) };
        assert_eq!(filter.get("_id"), written.get("_id"));
    }

    #[test]
    fn test_ids_are_binary_subtype_4() {
        match uuid_bson(Uuid::now_v7()) {
            Bson::Binary(binary) => {
                assert_eq!(binary.subtype, BinarySubtype::Uuid);
                assert_eq!(binary.bytes.len(), 16);
            }
            other => panic!("expected binary, got {:?}", other),
        }
    }

    #[test]
    fn test_raw_and_document_encodings_agree() {
        let stored = Stored {
            id: Uuid::now_v7(),
            refs: vec![Uuid::now_v7(), Uuid::now_v7()],
        };

        let via_raw = bson::to_raw_document_buf(&stored).unwrap().to_document().unwrap();
        let via_document = bson::to_document(&stored).unwrap();
        assert_eq!(via_raw, via_document);
    }

    #[test]
    fn test_reads_back_through_both_deserializers() {
        let stored = Stored {
            id: Uuid::now_v7(),
            refs: vec![Uuid::now_v7()],
        };

        let raw = bson::to_raw_document_buf(&stored).unwrap();
        let from_raw: Stored = bson::from_slice(raw.as_bytes()).unwrap();
        assert_eq!(from_raw, stored);

        let from_document: Stored = bson::from_document(raw.to_document().unwrap()).unwrap();
        assert_eq!(from_document, stored);
    }

    #[test]
    fn test_missing_refs_default_to_empty() {
        let id = Uuid::now_v7();
        let stored: Stored = bson::from_document(doc! { "_id": uuid_bson(id) }).unwrap();
        assert_eq!(stored, Stored { id, refs: Vec::new() });
    }
}
