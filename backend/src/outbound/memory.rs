//! In-process [`DocumentStore`] used when no database URI is configured and
//! throughout the test suite.
//!
//! Collections live in a single mutex-guarded map, so every operation,
//! including [`Update::Increment`], is atomic with respect to the others.
//! Identifiers are UUIDs in simple (hex) form.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::ports::{DocumentStore, DocumentStoreError};
use crate::domain::{
    Collection, DeleteOutcome, Document, DocumentId, Filter, ID_FIELD, InsertOutcome, Update,
    UpdateOptions, UpdateOutcome,
};

/// Volatile document store backed by process memory.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: Mutex<HashMap<Collection, Vec<Document>>>,
}

impl InMemoryDocumentStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `document` verbatim, bypassing id assignment.
    ///
    /// Intended for fixtures such as the pre-seeded category list.
    pub fn seed(&self, collection: Collection, document: Document) {
        self.lock().entry(collection).or_default().push(document);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Collection, Vec<Document>>> {
        // Updates are applied to a clone and swapped in, so a poisoned map
        // never holds a half-applied document.
        self.collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn fresh_id() -> DocumentId {
    DocumentId::from_generated(Uuid::new_v4().simple().to_string())
}

/// Seed document for an upsert: the filter's equality terms plus an id.
fn upsert_base(filter: &Filter) -> (DocumentId, Document) {
    let mut document = Document::new();
    let id = match filter {
        Filter::Id(id) => id.clone(),
        Filter::Eq { field, value } => {
            document.insert(field.clone(), value.clone());
            fresh_id()
        }
        Filter::All => fresh_id(),
    };
    document.insert(ID_FIELD.to_owned(), Value::String(id.to_string()));
    (id, document)
}

/// Apply `update` in place, returning whether anything changed.
fn apply(document: &mut Document, update: &Update) -> Result<bool, DocumentStoreError> {
    match update {
        Update::Set(fields) => {
            let mut changed = false;
            for (field, value) in fields {
                if field == ID_FIELD && document.get(ID_FIELD) != Some(value) {
                    return Err(DocumentStoreError::query("the _id field is immutable"));
                }
                if document.get(field) != Some(value) {
                    document.insert(field.clone(), value.clone());
                    changed = true;
                }
            }
            Ok(changed)
        }
        Update::Increment { field, by } => {
            let current = match document.get(field) {
                None | Some(Value::Null) => 0,
                Some(value) => value.as_i64().ok_or_else(|| {
                    DocumentStoreError::query(format!("cannot increment non-integer field {field}"))
                })?,
            };
            let next = current.checked_add(*by).ok_or_else(|| {
                DocumentStoreError::query(format!("increment of {field} overflows"))
            })?;
            document.insert(field.clone(), Value::from(next));
            Ok(*by != 0)
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, DocumentStoreError> {
        Ok(self
            .lock()
            .get(&collection)
            .and_then(|documents| documents.iter().find(|doc| filter.matches(doc)))
            .cloned())
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<Document>, DocumentStoreError> {
        Ok(self
            .lock()
            .get(&collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|doc| filter.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert_one(
        &self,
        collection: Collection,
        mut document: Document,
    ) -> Result<InsertOutcome, DocumentStoreError> {
        let id = match document.get(ID_FIELD) {
            None => fresh_id(),
            Some(Value::String(raw)) => DocumentId::stored(raw)
                .ok_or_else(|| DocumentStoreError::invalid_id(raw.as_str()))?,
            Some(other) => return Err(DocumentStoreError::invalid_id(other.to_string())),
        };
        document.insert(ID_FIELD.to_owned(), Value::String(id.to_string()));

        let mut collections = self.lock();
        let documents = collections.entry(collection).or_default();
        let duplicate = Filter::Id(id.clone());
        if documents.iter().any(|doc| duplicate.matches(doc)) {
            return Err(DocumentStoreError::query(format!(
                "duplicate key {id} in {collection}"
            )));
        }
        documents.push(document);
        Ok(InsertOutcome {
            acknowledged: true,
            inserted_id: id,
        })
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        update: &Update,
        options: UpdateOptions,
    ) -> Result<UpdateOutcome, DocumentStoreError> {
        let mut collections = self.lock();
        let documents = collections.entry(collection).or_default();

        if let Some(existing) = documents.iter_mut().find(|doc| filter.matches(doc)) {
            let mut candidate = existing.clone();
            let changed = apply(&mut candidate, update)?;
            *existing = candidate;
            return Ok(UpdateOutcome {
                acknowledged: true,
                matched_count: 1,
                modified_count: u64::from(changed),
                ..UpdateOutcome::default()
            });
        }

        if !options.upsert {
            return Ok(UpdateOutcome {
                acknowledged: true,
                ..UpdateOutcome::default()
            });
        }

        let (id, mut document) = upsert_base(filter);
        apply(&mut document, update)?;
        documents.push(document);
        Ok(UpdateOutcome {
            acknowledged: true,
            upserted_count: 1,
            upserted_id: Some(id),
            ..UpdateOutcome::default()
        })
    }

    async fn delete_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<DeleteOutcome, DocumentStoreError> {
        let mut collections = self.lock();
        let Some(documents) = collections.get_mut(&collection) else {
            return Ok(DeleteOutcome {
                acknowledged: true,
                deleted_count: 0,
            });
        };
        let deleted_count = match documents.iter().position(|doc| filter.matches(doc)) {
            Some(index) => {
                documents.remove(index);
                1
            }
            None => 0,
        };
        Ok(DeleteOutcome {
            acknowledged: true,
            deleted_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[fixture]
    fn store() -> InMemoryDocumentStore {
        InMemoryDocumentStore::new()
    }

    #[rstest]
    #[tokio::test]
    async fn insert_assigns_hex_id(store: InMemoryDocumentStore) {
        let outcome = store
            .insert_one(Collection::Comments, doc(json!({ "text": "thanks" })))
            .await
            .expect("insert");
        assert!(outcome.acknowledged);
        assert_eq!(outcome.inserted_id.as_ref().len(), 32);
        let stored = store
            .find_one(Collection::Comments, &Filter::Id(outcome.inserted_id.clone()))
            .await
            .expect("find")
            .expect("present");
        assert_eq!(stored.get("text"), Some(&json!("thanks")));
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_ids_are_rejected(store: InMemoryDocumentStore) {
        store
            .insert_one(Collection::Supplies, doc(json!({ "_id": "s1" })))
            .await
            .expect("first");
        let err = store
            .insert_one(Collection::Supplies, doc(json!({ "_id": "s1" })))
            .await
            .expect_err("duplicate");
        assert!(matches!(err, DocumentStoreError::Query { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn non_string_ids_are_invalid(store: InMemoryDocumentStore) {
        let err = store
            .insert_one(Collection::Supplies, doc(json!({ "_id": 12 })))
            .await
            .expect_err("numeric id");
        assert!(matches!(err, DocumentStoreError::InvalidId { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn increment_treats_missing_field_as_zero(store: InMemoryDocumentStore) {
        store.seed(Collection::Categories, doc(json!({ "_id": "c1", "category": "Food" })));
        let outcome = store
            .update_one(
                Collection::Categories,
                &Filter::Id(DocumentId::new("c1").expect("id")),
                &Update::increment("totalDonate", 1),
                UpdateOptions::default(),
            )
            .await
            .expect("update");
        assert_eq!((outcome.matched_count, outcome.modified_count), (1, 1));
        let stored = store
            .find_one(Collection::Categories, &Filter::eq("category", "Food"))
            .await
            .expect("find")
            .expect("present");
        assert_eq!(stored.get("totalDonate"), Some(&json!(1)));
    }

    #[rstest]
    #[tokio::test]
    async fn increment_rejects_non_integer(store: InMemoryDocumentStore) {
        store.seed(Collection::Categories, doc(json!({ "_id": "c1", "totalDonate": "many" })));
        let err = store
            .update_one(
                Collection::Categories,
                &Filter::Id(DocumentId::new("c1").expect("id")),
                &Update::increment("totalDonate", 1),
                UpdateOptions::upsert(),
            )
            .await
            .expect_err("non-integer");
        assert!(matches!(err, DocumentStoreError::Query { .. }));
        let stored = store
            .find_one(Collection::Categories, &Filter::All)
            .await
            .expect("find")
            .expect("present");
        assert_eq!(stored.get("totalDonate"), Some(&json!("many")));
    }

    #[rstest]
    #[tokio::test]
    async fn upsert_by_id_creates_document(store: InMemoryDocumentStore) {
        let id = DocumentId::new("s9").expect("id");
        let outcome = store
            .update_one(
                Collection::Supplies,
                &Filter::Id(id.clone()),
                &Update::Set(doc(json!({ "title": "Water" }))),
                UpdateOptions::upsert(),
            )
            .await
            .expect("upsert");
        assert_eq!(outcome.upserted_id, Some(id.clone()));
        assert_eq!(outcome.matched_count, 0);
        let stored = store
            .find_one(Collection::Supplies, &Filter::Id(id))
            .await
            .expect("find")
            .expect("present");
        assert_eq!(stored.get("title"), Some(&json!("Water")));
    }

    #[rstest]
    #[tokio::test]
    async fn update_without_upsert_leaves_store_untouched(store: InMemoryDocumentStore) {
        let outcome = store
            .update_one(
                Collection::Supplies,
                &Filter::eq("title", "Water"),
                &Update::Set(doc(json!({ "quantity": 1 }))),
                UpdateOptions::default(),
            )
            .await
            .expect("update");
        assert_eq!(outcome.matched_count, 0);
        assert!(store
            .find(Collection::Supplies, &Filter::All)
            .await
            .expect("list")
            .is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn unchanged_set_reports_no_modification(store: InMemoryDocumentStore) {
        store.seed(Collection::Supplies, doc(json!({ "_id": "s1", "title": "Rice" })));
        let outcome = store
            .update_one(
                Collection::Supplies,
                &Filter::Id(DocumentId::new("s1").expect("id")),
                &Update::Set(doc(json!({ "title": "Rice" }))),
                UpdateOptions::upsert(),
            )
            .await
            .expect("update");
        assert_eq!((outcome.matched_count, outcome.modified_count), (1, 0));
    }

    #[rstest]
    #[tokio::test]
    async fn delete_removes_first_match(store: InMemoryDocumentStore) {
        store.seed(Collection::Comments, doc(json!({ "_id": "a", "author": "x" })));
        store.seed(Collection::Comments, doc(json!({ "_id": "b", "author": "x" })));
        let outcome = store
            .delete_one(Collection::Comments, &Filter::eq("author", "x"))
            .await
            .expect("delete");
        assert_eq!(outcome.deleted_count, 1);
        let left = store
            .find(Collection::Comments, &Filter::All)
            .await
            .expect("list");
        assert_eq!(left.len(), 1);
        assert_eq!(DocumentId::of(&left[0]), DocumentId::new("b").ok());
    }

    #[rstest]
    #[tokio::test]
    async fn inserted_ids_are_kept_verbatim(store: InMemoryDocumentStore) {
        let outcome = store
            .insert_one(Collection::Supplies, doc(json!({ "_id": " s1 ", "title": "Rice" })))
            .await
            .expect("insert");
        assert_eq!(outcome.inserted_id.as_ref(), " s1 ");
        let stored = store
            .find_one(Collection::Supplies, &Filter::Id(outcome.inserted_id))
            .await
            .expect("find")
            .expect("present");
        assert_eq!(stored.get("title"), Some(&json!("Rice")));
    }
}
