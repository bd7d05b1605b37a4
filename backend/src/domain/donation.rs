//! Donation recording.
//!
//! A donation touches two collections: the category aggregate gains one to
//! its `totalDonate`, and the donor's record either gains one to its
//! `donateSupply` or is created from the submission. Both counters are
//! updated with the store's atomic increment so concurrent donations never
//! lose an update. The donor existence check is not atomic: two concurrent
//! first donations from one email may both insert.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::ports::{DocumentStore, DonationCommand};
use super::{
    Collection, Document, DocumentId, Error, Filter, InsertOutcome, Update, UpdateOptions,
};

/// Category name field on both submissions and category documents.
pub const CATEGORY_FIELD: &str = "category";
/// Running donation counter on a category document.
pub const TOTAL_DONATE_FIELD: &str = "totalDonate";
/// Donor email on a submission and on the donor record.
pub const USER_EMAIL_FIELD: &str = "userEmail";
/// Running donation counter on a donor record.
pub const DONATE_SUPPLY_FIELD: &str = "donateSupply";

/// Reasons a donation payload is rejected before any write happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DonationValidationError {
    MissingCategory,
    MissingUserEmail,
    InvalidDonateSupply,
}

impl fmt::Display for DonationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCategory => write!(f, "category must be a non-empty string"),
            Self::MissingUserEmail => write!(f, "userEmail must be a non-empty string"),
            Self::InvalidDonateSupply => write!(f, "donateSupply must be an integer"),
        }
    }
}

impl std::error::Error for DonationValidationError {}

impl From<DonationValidationError> for Error {
    fn from(err: DonationValidationError) -> Self {
        Error::invalid_request(err.to_string())
    }
}

fn required_text(document: &Document, field: &str) -> Option<String> {
    document
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

/// A validated donation payload.
///
/// The original document is kept so unknown fields pass through to the
/// donor record untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct DonationSubmission {
    category: String,
    user_email: String,
    document: Document,
}

impl DonationSubmission {
    /// Validate a raw JSON object.
    ///
    /// `category` and `userEmail` must be non-blank strings. `donateSupply`
    /// may be absent or `null`; any other non-integer value is rejected.
    pub fn try_from_document(document: Document) -> Result<Self, DonationValidationError> {
        let category = required_text(&document, CATEGORY_FIELD)
            .ok_or(DonationValidationError::MissingCategory)?;
        let user_email = required_text(&document, USER_EMAIL_FIELD)
            .ok_or(DonationValidationError::MissingUserEmail)?;
        match document.get(DONATE_SUPPLY_FIELD) {
            None | Some(Value::Null) => {}
            Some(value) if value.is_i64() || value.is_u64() => {}
            Some(_) => return Err(DonationValidationError::InvalidDonateSupply),
        }
        Ok(Self {
            category,
            user_email,
            document,
        })
    }

    pub fn category(&self) -> &str {
        self.category.as_str()
    }

    pub fn user_email(&self) -> &str {
        self.user_email.as_str()
    }

    /// The document stored for a first-time donor.
    fn into_donor_record(self) -> Document {
        let mut document = self.document;
        let needs_default = document
            .get(DONATE_SUPPLY_FIELD)
            .is_none_or(Value::is_null);
        if needs_default {
            document.insert(DONATE_SUPPLY_FIELD.to_owned(), Value::from(1));
        }
        document
    }
}

/// What the recorder did with the donor record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DonationOutcome {
    /// An existing donor's counter was incremented.
    DonorUpdated,
    /// A new donor record was inserted.
    DonorInserted(InsertOutcome),
}

/// Records donations against a [`DocumentStore`].
pub struct DonationRecorder {
    store: Arc<dyn DocumentStore>,
}

impl DonationRecorder {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    async fn increment_by_id(
        &self,
        collection: Collection,
        id: DocumentId,
        field: &str,
    ) -> Result<(), Error> {
        self.store
            .update_one(
                collection,
                &Filter::Id(id),
                &Update::increment(field, 1),
                UpdateOptions::upsert(),
            )
            .await?;
        Ok(())
    }
}

fn stored_id(collection: Collection, document: &Document) -> Result<DocumentId, Error> {
    DocumentId::of(document).ok_or_else(|| {
        warn!(%collection, "stored document has no string identifier");
        Error::internal(format!("{collection} document is missing its identifier"))
    })
}

#[async_trait]
impl DonationCommand for DonationRecorder {
    async fn record(&self, submission: DonationSubmission) -> Result<DonationOutcome, Error> {
        let category = self
            .store
            .find_one(
                Collection::Categories,
                &Filter::eq(CATEGORY_FIELD, submission.category()),
            )
            .await?
            .ok_or_else(|| {
                Error::not_found(format!("category {} does not exist", submission.category()))
            })?;
        let category_id = stored_id(Collection::Categories, &category)?;
        self.increment_by_id(Collection::Categories, category_id, TOTAL_DONATE_FIELD)
            .await?;
        debug!(category = submission.category(), "category total incremented");

        let donor = self
            .store
            .find_one(
                Collection::Donations,
                &Filter::eq(USER_EMAIL_FIELD, submission.user_email()),
            )
            .await?;

        match donor {
            Some(existing) => {
                let donor_id = stored_id(Collection::Donations, &existing)?;
                self.increment_by_id(Collection::Donations, donor_id, DONATE_SUPPLY_FIELD)
                    .await?;
                info!(category = submission.category(), "donation recorded for returning donor");
                Ok(DonationOutcome::DonorUpdated)
            }
            None => {
                let outcome = self
                    .store
                    .insert_one(Collection::Donations, submission.into_donor_record())
                    .await?;
                info!(inserted_id = %outcome.inserted_id, "donation recorded for new donor");
                Ok(DonationOutcome::DonorInserted(outcome))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Recorder behaviour against the in-memory store and mocked failures.

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{DocumentStoreError, MockDocumentStore};
    use crate::outbound::memory::InMemoryDocumentStore;
    use rstest::{fixture, rstest};
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn submission(value: Value) -> DonationSubmission {
        DonationSubmission::try_from_document(doc(value)).expect("valid submission")
    }

    #[fixture]
    fn seeded_store() -> Arc<InMemoryDocumentStore> {
        let store = Arc::new(InMemoryDocumentStore::default());
        store.seed(
            Collection::Categories,
            doc(json!({ "_id": "cat-food", "category": "Food", "totalDonate": 5 })),
        );
        store
    }

    async fn field_of(
        store: &InMemoryDocumentStore,
        collection: Collection,
        filter: Filter,
        field: &str,
    ) -> Option<Value> {
        store
            .find_one(collection, &filter)
            .await
            .expect("find")
            .and_then(|document| document.get(field).cloned())
    }

    #[rstest]
    #[case(json!({ "userEmail": "a@x.com" }), DonationValidationError::MissingCategory)]
    #[case(json!({ "category": "  ", "userEmail": "a@x.com" }), DonationValidationError::MissingCategory)]
    #[case(json!({ "category": "Food" }), DonationValidationError::MissingUserEmail)]
    #[case(json!({ "category": "Food", "userEmail": 4 }), DonationValidationError::MissingUserEmail)]
    #[case(
        json!({ "category": "Food", "userEmail": "a@x.com", "donateSupply": "two" }),
        DonationValidationError::InvalidDonateSupply
    )]
    #[case(
        json!({ "category": "Food", "userEmail": "a@x.com", "donateSupply": 1.5 }),
        DonationValidationError::InvalidDonateSupply
    )]
    fn rejects_invalid_payloads(#[case] payload: Value, #[case] expected: DonationValidationError) {
        let err = DonationSubmission::try_from_document(doc(payload)).expect_err("invalid");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn first_donation_inserts_donor_and_bumps_category(
        seeded_store: Arc<InMemoryDocumentStore>,
    ) {
        let recorder = DonationRecorder::new(seeded_store.clone());
        let outcome = recorder
            .record(submission(json!({
                "category": "Food",
                "userEmail": "a@x.com",
                "name": "Ada"
            })))
            .await
            .expect("recorded");

        assert!(matches!(outcome, DonationOutcome::DonorInserted(ref o) if o.acknowledged));
        assert_eq!(
            field_of(&seeded_store, Collection::Categories, Filter::eq("category", "Food"), TOTAL_DONATE_FIELD).await,
            Some(json!(6))
        );
        let donor = seeded_store
            .find_one(Collection::Donations, &Filter::eq(USER_EMAIL_FIELD, "a@x.com"))
            .await
            .expect("find")
            .expect("donor inserted");
        assert_eq!(donor.get(DONATE_SUPPLY_FIELD), Some(&json!(1)));
        assert_eq!(donor.get("name"), Some(&json!("Ada")));
    }

    #[rstest]
    #[tokio::test]
    async fn supplied_donate_supply_is_kept_on_insert(seeded_store: Arc<InMemoryDocumentStore>) {
        let recorder = DonationRecorder::new(seeded_store.clone());
        recorder
            .record(submission(json!({
                "category": "Food",
                "userEmail": "a@x.com",
                "donateSupply": 3
            })))
            .await
            .expect("recorded");
        assert_eq!(
            field_of(&seeded_store, Collection::Donations, Filter::eq(USER_EMAIL_FIELD, "a@x.com"), DONATE_SUPPLY_FIELD).await,
            Some(json!(3))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn returning_donor_is_incremented(seeded_store: Arc<InMemoryDocumentStore>) {
        seeded_store.seed(
            Collection::Donations,
            doc(json!({ "_id": "d1", "userEmail": "a@x.com", "donateSupply": 2 })),
        );
        let recorder = DonationRecorder::new(seeded_store.clone());
        let outcome = recorder
            .record(submission(json!({ "category": "Food", "userEmail": "a@x.com" })))
            .await
            .expect("recorded");

        assert_eq!(outcome, DonationOutcome::DonorUpdated);
        assert_eq!(
            field_of(&seeded_store, Collection::Donations, Filter::eq(USER_EMAIL_FIELD, "a@x.com"), DONATE_SUPPLY_FIELD).await,
            Some(json!(3))
        );
        let donors = seeded_store
            .find(Collection::Donations, &Filter::All)
            .await
            .expect("list");
        assert_eq!(donors.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn successive_donations_add_two(seeded_store: Arc<InMemoryDocumentStore>) {
        let recorder = DonationRecorder::new(seeded_store.clone());
        for _ in 0..2 {
            recorder
                .record(submission(json!({ "category": "Food", "userEmail": "a@x.com" })))
                .await
                .expect("recorded");
        }
        assert_eq!(
            field_of(&seeded_store, Collection::Categories, Filter::eq("category", "Food"), TOTAL_DONATE_FIELD).await,
            Some(json!(7))
        );
        assert_eq!(
            field_of(&seeded_store, Collection::Donations, Filter::eq(USER_EMAIL_FIELD, "a@x.com"), DONATE_SUPPLY_FIELD).await,
            Some(json!(2))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn concurrent_donations_do_not_lose_updates(seeded_store: Arc<InMemoryDocumentStore>) {
        seeded_store.seed(
            Collection::Donations,
            doc(json!({ "_id": "d1", "userEmail": "a@x.com", "donateSupply": 1 })),
        );
        seeded_store.seed(
            Collection::Donations,
            doc(json!({ "_id": "d2", "userEmail": "b@x.com", "donateSupply": 1 })),
        );
        let recorder = Arc::new(DonationRecorder::new(seeded_store.clone()));
        let first = {
            let recorder = recorder.clone();
            tokio::spawn(async move {
                recorder
                    .record(submission(json!({ "category": "Food", "userEmail": "a@x.com" })))
                    .await
            })
        };
        let second = {
            let recorder = recorder.clone();
            tokio::spawn(async move {
                recorder
                    .record(submission(json!({ "category": "Food", "userEmail": "b@x.com" })))
                    .await
            })
        };
        first.await.expect("join").expect("first recorded");
        second.await.expect("join").expect("second recorded");

        assert_eq!(
            field_of(&seeded_store, Collection::Categories, Filter::eq("category", "Food"), TOTAL_DONATE_FIELD).await,
            Some(json!(7))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_category_is_rejected_without_writes() {
        let mut store = MockDocumentStore::new();
        store
            .expect_find_one()
            .times(1)
            .withf(|collection, _| *collection == Collection::Categories)
            .returning(|_, _| Ok(None));
        store.expect_update_one().times(0);
        store.expect_insert_one().times(0);

        let recorder = DonationRecorder::new(Arc::new(store));
        let err = recorder
            .record(submission(json!({ "category": "Toys", "userEmail": "a@x.com" })))
            .await
            .expect_err("missing category");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn counters_use_atomic_increments() {
        let mut store = MockDocumentStore::new();
        store
            .expect_find_one()
            .withf(|collection, _| *collection == Collection::Categories)
            .returning(|_, _| Ok(Some(doc(json!({ "_id": "c1", "category": "Food", "totalDonate": 5 })))));
        store
            .expect_find_one()
            .withf(|collection, _| *collection == Collection::Donations)
            .returning(|_, _| Ok(Some(doc(json!({ "_id": "d1", "userEmail": "a@x.com", "donateSupply": 1 })))));
        store
            .expect_update_one()
            .times(2)
            .withf(|_, filter, update, options| {
                matches!(filter, Filter::Id(_))
                    && matches!(update, Update::Increment { by: 1, .. })
                    && options.upsert
            })
            .returning(|_, _, _, _| {
                Ok(crate::domain::UpdateOutcome {
                    acknowledged: true,
                    matched_count: 1,
                    modified_count: 1,
                    ..Default::default()
                })
            });

        let recorder = DonationRecorder::new(Arc::new(store));
        let outcome = recorder
            .record(submission(json!({ "category": "Food", "userEmail": "a@x.com" })))
            .await
            .expect("recorded");
        assert_eq!(outcome, DonationOutcome::DonorUpdated);
    }

    #[rstest]
    #[tokio::test]
    async fn donor_failure_keeps_category_write() {
        let mut store = MockDocumentStore::new();
        store
            .expect_find_one()
            .withf(|collection, _| *collection == Collection::Categories)
            .returning(|_, _| Ok(Some(doc(json!({ "_id": "c1", "category": "Food", "totalDonate": 5 })))));
        store
            .expect_find_one()
            .withf(|collection, _| *collection == Collection::Donations)
            .returning(|_, _| Ok(None));
        store
            .expect_update_one()
            .times(1)
            .withf(|collection, _, _, _| *collection == Collection::Categories)
            .returning(|_, _, _, _| Ok(crate::domain::UpdateOutcome::default()));
        store
            .expect_insert_one()
            .times(1)
            .returning(|_, _| Err(DocumentStoreError::connection("socket closed")));

        let recorder = DonationRecorder::new(Arc::new(store));
        let err = recorder
            .record(submission(json!({ "category": "Food", "userEmail": "a@x.com" })))
            .await
            .expect_err("insert fails");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
