//! Document-store vocabulary shared by the domain and its adapters.
//!
//! Documents are free-form JSON objects. Identifiers are opaque strings whose
//! concrete format belongs to the storage adapter; the domain only requires
//! that they are non-blank.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// A stored or submitted document.
pub type Document = Map<String, Value>;

/// Field name holding a document's identifier.
pub const ID_FIELD: &str = "_id";

/// Collections exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Supplies,
    Volunteers,
    Donations,
    Categories,
    Comments,
    Testimonials,
}

impl Collection {
    /// Name of the backing collection in the document store.
    pub fn name(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Supplies => "supplies",
            Self::Volunteers => "volunteers",
            Self::Donations => "donation",
            Self::Categories => "category",
            Self::Comments => "comments",
            Self::Testimonials => "testimonials",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Validation error for [`DocumentId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentIdValidationError {
    Empty,
}

impl fmt::Display for DocumentIdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "document id must not be empty"),
        }
    }
}

impl std::error::Error for DocumentIdValidationError {}

/// Opaque document identifier.
///
/// # Examples
/// ```
/// use relief_backend::domain::DocumentId;
///
/// let id = DocumentId::new("65f1c0ffee0000000000abcd").expect("non-empty id");
/// assert_eq!(id.as_ref(), "65f1c0ffee0000000000abcd");
/// assert!(DocumentId::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String)]
pub struct DocumentId(String);

impl DocumentId {
    /// Validate and construct an identifier from its string form.
    pub fn new(id: impl Into<String>) -> Result<Self, DocumentIdValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(DocumentIdValidationError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Wrap an identifier minted by a storage adapter.
    pub(crate) fn from_generated(id: String) -> Self {
        Self(id)
    }

    /// Wrap an identifier read back from storage.
    ///
    /// Unlike [`DocumentId::new`] the value is kept verbatim, so a stored id
    /// with surrounding whitespace still matches its own document. Blank ids
    /// are rejected.
    pub(crate) fn stored(raw: &str) -> Option<Self> {
        (!raw.trim().is_empty()).then(|| Self(raw.to_owned()))
    }

    /// Read the identifier of a stored document, if it carries a non-blank
    /// string id.
    pub fn of(document: &Document) -> Option<Self> {
        document
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .and_then(Self::stored)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<DocumentId> for String {
    fn from(value: DocumentId) -> Self {
        value.0
    }
}

impl TryFrom<String> for DocumentId {
    type Error = DocumentIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Selection criteria for store operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every document in the collection.
    All,
    /// Matches the document with the given identifier.
    Id(DocumentId),
    /// Matches documents whose `field` equals `value`.
    Eq { field: String, value: Value },
}

impl Filter {
    /// Match a single field against a value.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Whether `document` satisfies this filter.
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Self::All => true,
            Self::Id(id) => document.get(ID_FIELD).and_then(Value::as_str) == Some(id.as_ref()),
            Self::Eq { field, value } => document.get(field) == Some(value),
        }
    }
}

/// Mutation applied by [`update_one`](crate::domain::ports::DocumentStore::update_one).
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// Overwrite the listed fields.
    Set(Document),
    /// Atomically add `by` to a numeric field, treating a missing field as zero.
    Increment { field: String, by: i64 },
}

impl Update {
    /// Increment `field` by `by`.
    pub fn increment(field: impl Into<String>, by: i64) -> Self {
        Self::Increment {
            field: field.into(),
            by,
        }
    }
}

/// Options for update operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Insert a new document when the filter matches nothing.
    pub upsert: bool,
}

impl UpdateOptions {
    /// Options with upsert enabled.
    pub fn upsert() -> Self {
        Self { upsert: true }
    }
}

/// Result of inserting one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertOutcome {
    pub acknowledged: bool,
    pub inserted_id: DocumentId,
}

/// Result of updating one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<DocumentId>,
}

/// Result of deleting one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub acknowledged: bool,
    pub deleted_count: u64,
}
