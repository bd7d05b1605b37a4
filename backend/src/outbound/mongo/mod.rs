//! MongoDB adapter for the [`DocumentStore`] port.
//!
//! The adapter is a thin translator: filters and updates become BSON
//! documents, results come back as JSON objects with `ObjectId`s rendered as
//! hex strings. No business logic lives here.

mod convert;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{Document as BsonDocument, doc};
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::{Client, Collection as MongoCollection, Database};
use tracing::{debug, info};

use crate::domain::ports::{DocumentStore, DocumentStoreError};
use crate::domain::{
    Collection, DeleteOutcome, Document, Filter, InsertOutcome, Update, UpdateOptions,
    UpdateOutcome,
};

use self::convert::{
    document_id, from_bson_document, to_bson_document, to_filter, to_update,
};

/// Map driver errors onto the port's connection and query variants.
fn map_mongo_error(error: MongoError) -> DocumentStoreError {
    debug!(error = %error, "mongodb operation failed");
    match *error.kind {
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) | ErrorKind::DnsResolve { .. } => {
            DocumentStoreError::connection(error.to_string())
        }
        _ => DocumentStoreError::query(error.to_string()),
    }
}

/// [`DocumentStore`] backed by a MongoDB database.
#[derive(Debug, Clone)]
pub struct MongoDocumentStore {
    database: Database,
}

impl MongoDocumentStore {
    /// Connect to `uri` and verify the deployment answers a ping.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, DocumentStoreError> {
        let client = Client::with_uri_str(uri).await.map_err(map_mongo_error)?;
        let database = client.database(database);
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(map_mongo_error)?;
        info!(database = database.name(), "connected to mongodb");
        Ok(Self { database })
    }

    fn collection(&self, collection: Collection) -> MongoCollection<BsonDocument> {
        self.database.collection(collection.name())
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, DocumentStoreError> {
        let filter = to_filter(filter)?;
        let found = self
            .collection(collection)
            .find_one(filter)
            .await
            .map_err(map_mongo_error)?;
        Ok(found.map(from_bson_document))
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<Document>, DocumentStoreError> {
        let filter = to_filter(filter)?;
        let documents: Vec<BsonDocument> = self
            .collection(collection)
            .find(filter)
            .await
            .map_err(map_mongo_error)?
            .try_collect()
            .await
            .map_err(map_mongo_error)?;
        Ok(documents.into_iter().map(from_bson_document).collect())
    }

    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<InsertOutcome, DocumentStoreError> {
        let document = to_bson_document(&document)?;
        let result = self
            .collection(collection)
            .insert_one(document)
            .await
            .map_err(map_mongo_error)?;
        Ok(InsertOutcome {
            acknowledged: true,
            inserted_id: document_id(result.inserted_id)?,
        })
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        update: &Update,
        options: UpdateOptions,
    ) -> Result<UpdateOutcome, DocumentStoreError> {
        let filter = to_filter(filter)?;
        let update = to_update(update)?;
        let result = self
            .collection(collection)
            .update_one(filter, update)
            .upsert(options.upsert)
            .await
            .map_err(map_mongo_error)?;
        let upserted_id = result.upserted_id.map(document_id).transpose()?;
        Ok(UpdateOutcome {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: u64::from(upserted_id.is_some()),
            upserted_id,
        })
    }

    async fn delete_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<DeleteOutcome, DocumentStoreError> {
        let filter = to_filter(filter)?;
        let result = self
            .collection(collection)
            .delete_one(filter)
            .await
            .map_err(map_mongo_error)?;
        Ok(DeleteOutcome {
            acknowledged: true,
            deleted_count: result.deleted_count,
        })
    }
}
