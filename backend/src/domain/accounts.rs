//! Account service: registration, login, and profile lookup.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use super::ports::{
    AccountService, DocumentStore, PasswordHashError, PasswordHasher, TokenError, TokenService,
};
use super::{
    AccessToken, Collection, Document, Error, Filter, LoginCredentials, Registration, UserProfile,
    UserRecord,
};

/// Message returned when an email is already registered.
pub const USER_EXISTS_MESSAGE: &str = "User already exists";
/// Message returned for any failed login, so callers cannot probe for emails.
pub const INVALID_LOGIN_MESSAGE: &str = "Invalid email or password";

const EMAIL_FIELD: &str = "email";

/// Concrete [`AccountService`] over the document store.
pub struct AccountServiceImpl {
    store: Arc<dyn DocumentStore>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl AccountServiceImpl {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    async fn find_record(&self, email: &str) -> Result<Option<UserRecord>, Error> {
        let Some(document) = self
            .store
            .find_one(Collection::Users, &Filter::eq(EMAIL_FIELD, email))
            .await?
        else {
            return Ok(None);
        };
        decode_user(document).map(Some)
    }
}

fn decode_user(document: Document) -> Result<UserRecord, Error> {
    UserRecord::from_document(document).map_err(|err| {
        error!(error = %err, "stored user document is malformed");
        Error::internal(format!("malformed user document: {err}"))
    })
}

fn map_hash_error(err: PasswordHashError) -> Error {
    error!(error = %err, "password hashing failed");
    Error::internal(err.to_string())
}

fn map_token_error(err: TokenError) -> Error {
    error!(error = %err, "token issuance failed");
    Error::internal(err.to_string())
}

#[async_trait]
impl AccountService for AccountServiceImpl {
    async fn register(&self, registration: Registration) -> Result<(), Error> {
        if self.find_record(registration.email()).await?.is_some() {
            return Err(Error::invalid_request(USER_EXISTS_MESSAGE));
        }

        let password = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(map_hash_error)?;
        let record = UserRecord {
            id: None,
            name: registration.name().to_owned(),
            email: registration.email().to_owned(),
            password,
        };
        let document = record
            .into_document()
            .map_err(|err| Error::internal(format!("failed to encode user: {err}")))?;
        let outcome = self.store.insert_one(Collection::Users, document).await?;
        info!(user_id = %outcome.inserted_id, "user registered");
        Ok(())
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<AccessToken, Error> {
        let Some(record) = self.find_record(credentials.email()).await? else {
            return Err(Error::unauthorized(INVALID_LOGIN_MESSAGE));
        };

        let matches = match self
            .hasher
            .verify(credentials.password(), &record.password)
            .await
        {
            Ok(matches) => matches,
            Err(PasswordHashError::MalformedHash { message }) => {
                warn!(%message, "stored password hash cannot be verified");
                false
            }
            Err(other) => return Err(map_hash_error(other)),
        };
        if !matches {
            return Err(Error::unauthorized(INVALID_LOGIN_MESSAGE));
        }

        self.tokens
            .issue(&record.email)
            .map_err(map_token_error)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>, Error> {
        Ok(self.find_record(email).await?.map(UserProfile::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockPasswordHasher, MockTokenService};
    use crate::outbound::memory::InMemoryDocumentStore;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn store() -> Arc<InMemoryDocumentStore> {
        Arc::new(InMemoryDocumentStore::default())
    }

    /// Hasher that prefixes the password, enough to exercise the service.
    fn fake_hasher() -> MockPasswordHasher {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .returning(|password| Ok(format!("hashed:{password}")));
        hasher
            .expect_verify()
            .returning(|password, hash| Ok(hash == format!("hashed:{password}")));
        hasher
    }

    fn fake_tokens() -> MockTokenService {
        let mut tokens = MockTokenService::new();
        tokens
            .expect_issue()
            .returning(|email| Ok(AccessToken::new(format!("token-for-{email}"))));
        tokens
    }

    fn service(store: Arc<InMemoryDocumentStore>) -> AccountServiceImpl {
        AccountServiceImpl::new(store, Arc::new(fake_hasher()), Arc::new(fake_tokens()))
    }

    fn registration() -> Registration {
        Registration::try_from_parts("Ada", "ada@example.com", "pw").expect("valid")
    }

    #[rstest]
    #[tokio::test]
    async fn register_stores_hash_not_password(store: Arc<InMemoryDocumentStore>) {
        let accounts = service(store.clone());
        accounts.register(registration()).await.expect("registered");

        let stored = store
            .find_one(Collection::Users, &Filter::eq("email", "ada@example.com"))
            .await
            .expect("find")
            .expect("user stored");
        assert_eq!(stored.get("password"), Some(&json!("hashed:pw")));
        assert_eq!(stored.get("name"), Some(&json!("Ada")));
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_registration_is_rejected(store: Arc<InMemoryDocumentStore>) {
        let accounts = service(store.clone());
        accounts.register(registration()).await.expect("first");
        let err = accounts.register(registration()).await.expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), USER_EXISTS_MESSAGE);

        let users = store.find(Collection::Users, &Filter::All).await.expect("list");
        assert_eq!(users.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn login_issues_token(store: Arc<InMemoryDocumentStore>) {
        let accounts = service(store);
        accounts.register(registration()).await.expect("registered");
        let creds = LoginCredentials::try_from_parts("ada@example.com", "pw").expect("valid");
        let token = accounts.login(&creds).await.expect("login");
        assert_eq!(token.as_ref(), "token-for-ada@example.com");
    }

    #[rstest]
    #[case("ada@example.com", "wrong")]
    #[case("nobody@example.com", "pw")]
    #[tokio::test]
    async fn bad_credentials_are_unauthorised(
        store: Arc<InMemoryDocumentStore>,
        #[case] email: &str,
        #[case] password: &str,
    ) {
        let accounts = service(store);
        accounts.register(registration()).await.expect("registered");
        let creds = LoginCredentials::try_from_parts(email, password).expect("valid");
        let err = accounts.login(&creds).await.expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), INVALID_LOGIN_MESSAGE);
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_stored_hash_fails_login_without_error(store: Arc<InMemoryDocumentStore>) {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_verify()
            .returning(|_, _| Err(PasswordHashError::malformed_hash("not phc")));
        let mut tokens = MockTokenService::new();
        tokens.expect_issue().times(0);
        store.seed(
            Collection::Users,
            match json!({ "_id": "u1", "email": "ada@example.com", "password": "$2b$10$legacy" }) {
                serde_json::Value::Object(map) => map,
                _ => unreachable!(),
            },
        );

        let accounts = AccountServiceImpl::new(store, Arc::new(hasher), Arc::new(tokens));
        let creds = LoginCredentials::try_from_parts("ada@example.com", "pw").expect("valid");
        let err = accounts.login(&creds).await.expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn token_failure_is_internal(store: Arc<InMemoryDocumentStore>) {
        let mut tokens = MockTokenService::new();
        tokens
            .expect_issue()
            .returning(|_| Err(TokenError::issue("no key")));
        let accounts = AccountServiceImpl::new(store, Arc::new(fake_hasher()), Arc::new(tokens));
        accounts.register(registration()).await.expect("registered");
        let creds = LoginCredentials::try_from_parts("ada@example.com", "pw").expect("valid");
        let err = accounts.login(&creds).await.expect_err("issue fails");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[rstest]
    #[tokio::test]
    async fn profile_lookup_omits_password(store: Arc<InMemoryDocumentStore>) {
        let accounts = service(store);
        accounts.register(registration()).await.expect("registered");
        let profile = accounts
            .find_by_email("ada@example.com")
            .await
            .expect("lookup")
            .expect("found");
        assert_eq!(profile.name, "Ada");
        assert!(profile.id.is_some());
        assert!(accounts.find_by_email("x@y.z").await.expect("lookup").is_none());
    }
}
