//! Translation between domain documents (JSON) and BSON.
//!
//! Object identifiers travel as 24-digit hex strings on the domain side and
//! as `ObjectId` values in the database. Any other string `_id` is stored and
//! matched as a plain string. Dates are rendered as RFC 3339 strings.
//! Everything else maps structurally.

use mongodb::bson::{self, Bson, Document as BsonDocument, doc, oid::ObjectId};
use serde_json::{Map, Number, Value};

use crate::domain::ports::DocumentStoreError;
use crate::domain::{Document, DocumentId, Filter, ID_FIELD, Update};

/// Encode a string `_id`: an `ObjectId` when it parses as one, else a string.
fn id_to_bson(raw: &str) -> Bson {
    ObjectId::parse_str(raw)
        .map(Bson::ObjectId)
        .unwrap_or_else(|_| Bson::String(raw.to_owned()))
}

fn json_to_bson(value: &Value) -> Result<Bson, DocumentStoreError> {
    bson::to_bson(value).map_err(|err| DocumentStoreError::query(err.to_string()))
}

/// Encode a document for storage.
///
/// A string `_id` that parses as an `ObjectId` is stored as one, so ids
/// echoed back by clients address the same document.
pub(super) fn to_bson_document(document: &Document) -> Result<BsonDocument, DocumentStoreError> {
    let mut encoded = BsonDocument::new();
    for (field, value) in document {
        let bson = match (field.as_str(), value) {
            (ID_FIELD, Value::String(raw)) => id_to_bson(raw),
            _ => json_to_bson(value)?,
        };
        encoded.insert(field.clone(), bson);
    }
    Ok(encoded)
}

pub(super) fn to_filter(filter: &Filter) -> Result<BsonDocument, DocumentStoreError> {
    Ok(match filter {
        Filter::All => doc! {},
        Filter::Id(id) => {
            let id = id_to_bson(id.as_ref());
            doc! { "_id": id }
        }
        Filter::Eq { field, value } => {
            let mut filter = BsonDocument::new();
            filter.insert(field.clone(), json_to_bson(value)?);
            filter
        }
    })
}

pub(super) fn to_update(update: &Update) -> Result<BsonDocument, DocumentStoreError> {
    Ok(match update {
        Update::Set(fields) => {
            let fields = to_bson_document(fields)?;
            doc! { "$set": fields }
        }
        Update::Increment { field, by } => {
            let mut increment = BsonDocument::new();
            increment.insert(field.clone(), Bson::Int64(*by));
            doc! { "$inc": increment }
        }
    })
}

/// Render a stored value as JSON.
pub(super) fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(id) => Value::String(id.to_hex()),
        Bson::String(text) => Value::String(text),
        Bson::Boolean(flag) => Value::Bool(flag),
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Int32(number) => Value::from(number),
        Bson::Int64(number) => Value::from(number),
        Bson::Double(number) => Number::from_f64(number).map_or(Value::Null, Value::Number),
        Bson::DateTime(moment) => moment
            .try_to_rfc3339_string()
            .map_or_else(|_| Value::from(moment.timestamp_millis()), Value::String),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        Bson::Document(document) => Value::Object(from_bson_document(document)),
        other => other.into_relaxed_extjson(),
    }
}

pub(super) fn from_bson_document(document: BsonDocument) -> Document {
    document
        .into_iter()
        .map(|(field, value)| (field, bson_to_json(value)))
        .collect::<Map<String, Value>>()
}

/// Identifier reported by the driver for an inserted or upserted document.
pub(super) fn document_id(value: Bson) -> Result<DocumentId, DocumentStoreError> {
    let raw = match value {
        Bson::ObjectId(id) => id.to_hex(),
        Bson::String(text) => text,
        other => other.into_relaxed_extjson().to_string(),
    };
    DocumentId::stored(&raw).ok_or_else(|| DocumentStoreError::invalid_id(raw))
}
