//! Driving ports for the pass-through collections (supplies, volunteers,
//! categories, donations, comments, testimonials).

use async_trait::async_trait;

use crate::domain::{
    Collection, DeleteOutcome, Document, DocumentId, Error, InsertOutcome, UpdateOutcome,
};

/// Read side of the pass-through collections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordsQuery: Send + Sync {
    /// Every document in `collection`, unpaginated.
    async fn list(&self, collection: Collection) -> Result<Vec<Document>, Error>;

    /// The document with `id`, if any.
    async fn get(&self, collection: Collection, id: &DocumentId)
    -> Result<Option<Document>, Error>;
}

/// Write side of the pass-through collections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordsCommand: Send + Sync {
    /// Store `document` as submitted.
    async fn insert(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<InsertOutcome, Error>;

    /// Overwrite `fields` on the document with `id`, creating it when absent.
    async fn update_fields(
        &self,
        collection: Collection,
        id: &DocumentId,
        fields: Document,
    ) -> Result<UpdateOutcome, Error>;

    /// Remove the document with `id`.
    async fn delete(&self, collection: Collection, id: &DocumentId)
    -> Result<DeleteOutcome, Error>;
}
