//! Pass-through record access for the simple collections.
//!
//! Each operation is a single store call. Documents are stored as submitted;
//! no schema is enforced.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::ports::{DocumentStore, RecordsCommand, RecordsQuery};
use super::{
    Collection, DeleteOutcome, Document, DocumentId, Error, Filter, InsertOutcome, Update,
    UpdateOptions, UpdateOutcome,
};

/// Implements [`RecordsQuery`] and [`RecordsCommand`] over a [`DocumentStore`].
#[derive(Clone)]
pub struct RecordsService {
    store: Arc<dyn DocumentStore>,
}

impl RecordsService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RecordsQuery for RecordsService {
    async fn list(&self, collection: Collection) -> Result<Vec<Document>, Error> {
        let documents = self.store.find(collection, &Filter::All).await?;
        debug!(%collection, count = documents.len(), "listed documents");
        Ok(documents)
    }

    async fn get(
        &self,
        collection: Collection,
        id: &DocumentId,
    ) -> Result<Option<Document>, Error> {
        Ok(self
            .store
            .find_one(collection, &Filter::Id(id.clone()))
            .await?)
    }
}

#[async_trait]
impl RecordsCommand for RecordsService {
    async fn insert(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<InsertOutcome, Error> {
        let outcome = self.store.insert_one(collection, document).await?;
        debug!(%collection, inserted_id = %outcome.inserted_id, "inserted document");
        Ok(outcome)
    }

    async fn update_fields(
        &self,
        collection: Collection,
        id: &DocumentId,
        fields: Document,
    ) -> Result<UpdateOutcome, Error> {
        if fields.is_empty() {
            return Err(Error::invalid_request("no fields to update"));
        }
        Ok(self
            .store
            .update_one(
                collection,
                &Filter::Id(id.clone()),
                &Update::Set(fields),
                UpdateOptions::upsert(),
            )
            .await?)
    }

    async fn delete(
        &self,
        collection: Collection,
        id: &DocumentId,
    ) -> Result<DeleteOutcome, Error> {
        Ok(self
            .store
            .delete_one(collection, &Filter::Id(id.clone()))
            .await?)
    }
}
