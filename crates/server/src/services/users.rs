//! User lifecycle service.
//!
//! Orchestrates create/read/list/replace/patch/delete against the record
//! store, enforces the email-uniqueness fast path at creation, and mints the
//! credential a new account walks away with. Holds no durable state of its
//! own; the store owns everything.

use worko_core::UserId;

use crate::db::{RecordStore, StoreError};
use crate::models::{UserRecord, ValidCreateUser, ValidUserDocument};
use crate::services::credential::{Claims, CredentialCodec, CredentialError};

/// Errors from lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// A live record already holds this email.
    #[error("user with this email already exists")]
    Conflict,

    /// No record exists at the given id.
    #[error("user not found")]
    NotFound,

    /// The store reported no effect where one was expected.
    #[error("{0}")]
    NoEffect(&'static str),

    /// Store failure.
    #[error("store error: {0}")]
    Store(StoreError),

    /// Credential signing failure.
    #[error("credential error: {0}")]
    Credential(#[from] CredentialError),
}

impl From<StoreError> for UserServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            // The store's unique index is the real enforcement point for the
            // uniqueness invariant; a violation there is the same conflict
            // the fast-path lookup reports.
            StoreError::Conflict(_) => Self::Conflict,
            other => Self::Store(other),
        }
    }
}

/// Per-request lifecycle service over the shared store and codec.
pub struct UserService<'a> {
    store: &'a dyn RecordStore,
    credentials: &'a CredentialCodec,
}

impl<'a> UserService<'a> {
    /// Create a new lifecycle service.
    #[must_use]
    pub const fn new(store: &'a dyn RecordStore, credentials: &'a CredentialCodec) -> Self {
        Self { store, credentials }
    }

    /// Create a new user and mint its credential.
    ///
    /// The email lookup is a fast-path rejection only; concurrent creates
    /// with the same email race between lookup and insert, and the store's
    /// unique constraint settles them.
    ///
    /// # Errors
    ///
    /// `Conflict` when the email is already taken, `NoEffect` when the store
    /// yields no inserted record, `Credential` when minting fails.
    pub async fn create(
        &self,
        input: ValidCreateUser,
    ) -> Result<(UserRecord, String), UserServiceError> {
        if self.store.find_by_email(&input.email).await?.is_some() {
            return Err(UserServiceError::Conflict);
        }

        let record = self
            .store
            .insert(&input)
            .await?
            .ok_or(UserServiceError::NoEffect("store reported no inserted record"))?;

        let claims = Claims {
            sub: record.id.to_string(),
            name: record.name.clone().unwrap_or_default(),
        };
        let token = self.credentials.issue(&claims)?;

        Ok((record, token))
    }

    /// Fetch a record by id.
    ///
    /// # Errors
    ///
    /// `NotFound` when no record exists at `id`.
    pub async fn read(&self, id: UserId) -> Result<UserRecord, UserServiceError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(UserServiceError::NotFound)
    }

    /// Every record, unfiltered and unpaginated.
    pub async fn list(&self) -> Result<Vec<UserRecord>, UserServiceError> {
        Ok(self.store.list().await?)
    }

    /// Full-overwrite mutation: fields absent from `doc` are reset.
    ///
    /// # Errors
    ///
    /// `NotFound` when no record exists at `id`, `NoEffect` when the store
    /// yields no updated record.
    pub async fn replace(
        &self,
        id: UserId,
        doc: &ValidUserDocument,
    ) -> Result<UserRecord, UserServiceError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(UserServiceError::NotFound)?;

        self.store
            .replace(id, doc)
            .await?
            .ok_or(UserServiceError::NoEffect("store reported no updated record"))
    }

    /// Partial-merge mutation: fields absent from `doc` keep their values.
    ///
    /// # Errors
    ///
    /// `NotFound` when no record exists at `id`, `NoEffect` when the store
    /// yields no updated record.
    pub async fn patch(
        &self,
        id: UserId,
        doc: &ValidUserDocument,
    ) -> Result<UserRecord, UserServiceError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(UserServiceError::NotFound)?;

        self.store
            .merge(id, doc)
            .await?
            .ok_or(UserServiceError::NoEffect("store reported no updated record"))
    }

    /// Delete by id. Succeeds whether or not a record existed.
    ///
    /// # Errors
    ///
    /// Only store-level failures propagate.
    pub async fn delete(&self, id: UserId) -> Result<(), UserServiceError> {
        self.store.delete(id).await?;
        Ok(())
    }
}
