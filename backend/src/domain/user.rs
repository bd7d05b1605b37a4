//! User data model.
//!
//! `UserRecord` mirrors what is persisted in the `users` collection and
//! carries the password hash. `UserProfile` is the public projection handed
//! to clients; it never contains the hash.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Document, DocumentId};

/// Persisted user document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    #[serde(default)]
    pub name: String,
    pub email: String,
    /// PHC-formatted password hash.
    pub password: String,
}

impl UserRecord {
    /// Decode a stored document, ignoring unknown fields.
    pub fn from_document(document: Document) -> Result<Self, serde_json::Error> {
        serde_json::from_value(serde_json::Value::Object(document))
    }

    /// Encode for insertion. An absent id is left for the store to assign.
    pub fn into_document(self) -> Result<Document, serde_json::Error> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => Ok(map),
            _ => Ok(Document::new()),
        }
    }
}

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub id: Option<DocumentId>,
    pub name: String,
    pub email: String,
}

impl From<UserRecord> for UserProfile {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn stored_document_decodes_and_profile_drops_hash() {
        let document = json!({
            "_id": "u1",
            "name": "Ada",
            "email": "ada@example.com",
            "password": "$argon2id$v=19$...",
            "legacy": true
        });
        let serde_json::Value::Object(map) = document else {
            panic!("object literal");
        };
        let record = UserRecord::from_document(map).expect("decode");
        let profile = UserProfile::from(record);
        let value = serde_json::to_value(&profile).expect("serialise");
        assert_eq!(
            value,
            json!({ "_id": "u1", "name": "Ada", "email": "ada@example.com" })
        );
    }

    #[rstest]
    fn missing_name_defaults_to_empty() {
        let serde_json::Value::Object(map) = json!({ "email": "a@x.com", "password": "h" }) else {
            panic!("object literal");
        };
        let record = UserRecord::from_document(map).expect("decode");
        assert!(record.name.is_empty());
        assert!(record.id.is_none());
    }

    #[rstest]
    fn new_record_encodes_without_id() {
        let record = UserRecord {
            id: None,
            name: "Ada".into(),
            email: "a@x.com".into(),
            password: "h".into(),
        };
        let document = record.into_document().expect("encode");
        assert!(!document.contains_key("_id"));
        assert_eq!(document.get("email"), Some(&json!("a@x.com")));
    }
}
