//! Driven port for the document database.
//!
//! Every service reaches storage through this trait so tests can substitute
//! the in-memory adapter or a `mockall` double for MongoDB.

use async_trait::async_trait;
use tracing::error;

use crate::domain::{
    Collection, DeleteOutcome, Document, Error, Filter, InsertOutcome, Update, UpdateOptions,
    UpdateOutcome,
};

use super::define_port_error;

define_port_error! {
    /// Failures raised by document store adapters.
    pub enum DocumentStoreError {
        /// The store could not be reached.
        Connection { message: String } => "document store connection failed: {message}",
        /// The store rejected or failed to execute an operation.
        Query { message: String } => "document store operation failed: {message}",
        /// The identifier is not valid for the backing store.
        InvalidId { id: String } => "invalid document id: {id}",
    }
}

/// Minimal set of operations the services need from a document database.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Return the first document matching `filter`.
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, DocumentStoreError>;

    /// Return every document matching `filter`, fully materialised.
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<Document>, DocumentStoreError>;

    /// Insert `document`, assigning an identifier when it has none.
    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<InsertOutcome, DocumentStoreError>;

    /// Apply `update` to the first document matching `filter`.
    ///
    /// With `options.upsert` set, a document built from the filter is
    /// inserted when nothing matches. [`Update::Increment`] must be applied
    /// atomically by the adapter.
    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        update: &Update,
        options: UpdateOptions,
    ) -> Result<UpdateOutcome, DocumentStoreError>;

    /// Delete the first document matching `filter`.
    async fn delete_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<DeleteOutcome, DocumentStoreError>;
}

impl From<DocumentStoreError> for Error {
    fn from(err: DocumentStoreError) -> Self {
        match err {
            DocumentStoreError::InvalidId { id } => {
                Error::invalid_request(format!("invalid document id: {id}"))
            }
            other => {
                error!(error = %other, "document store failure");
                Error::internal(other.to_string())
            }
        }
    }
}
