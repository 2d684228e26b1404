//! Identifier validation.
//!
//! All ids in the store are 24-hex-character ObjectIds generated by
//! MongoDB. Malformed strings are rejected here, before any query reaches
//! the store layer.

use mongodb::bson::oid::ObjectId;

use crate::error::{StoreError, StoreResult};

/// Parse a client-supplied id string into an [`ObjectId`].
pub fn parse_object_id(id: &str) -> StoreResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| StoreError::invalid_id(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_24_hex_id_parses() {
        let oid = parse_object_id("507f1f77bcf86cd799439011").unwrap();
        assert_eq!(oid.to_hex(), "507f1f77bcf86cd799439011");
    }

    #[test]
    fn test_malformed_ids_are_rejected() {
        for bad in ["not-an-id", "", "507f1f77", "507f1f77bcf86cd79943901z", "507f1f77bcf86cd7994390111"] {
            let err = parse_object_id(bad).unwrap_err();
            assert!(matches!(err, StoreError::InvalidId(_)), "{bad:?} should be invalid");
        }
    }

    #[test]
    fn test_uppercase_hex_is_accepted() {
        assert!(parse_object_id("507F1F77BCF86CD799439011").is_ok());
    }
}
