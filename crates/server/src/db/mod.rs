//! Record store boundary and `PostgreSQL` pool setup.
//!
//! The service core only sees the [`RecordStore`] trait: a document store
//! keyed by the user id, supporting lookup-by-field, insert, full-replace,
//! partial-merge, and delete. The `PostgreSQL` implementation lives in
//! [`users`]; tests substitute an in-memory implementation.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p worko-cli -- migrate
//! ```

pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use worko_core::{Email, UserId};

use crate::models::{UserRecord, ValidCreateUser, ValidUserDocument};

pub use users::PgUserStore;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// The store boundary the lifecycle service is written against.
///
/// Each call is a single, independent store interaction; there is no
/// per-operation transaction or locking, and concurrent mutations on the same
/// id are resolved last-writer-wins by the store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Look up a record by its unique email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<UserRecord>, StoreError>;

    /// Look up a record by id.
    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError>;

    /// Every record, unfiltered and unpaginated.
    async fn list(&self) -> Result<Vec<UserRecord>, StoreError>;

    /// Insert a new record, letting the store assign id and timestamps.
    ///
    /// Returns `None` when the store reports no inserted record.
    async fn insert(&self, user: &ValidCreateUser) -> Result<Option<UserRecord>, StoreError>;

    /// Overwrite every schema field from `doc`; fields absent from `doc` are
    /// reset to absent. Returns `None` when no record exists at `id`.
    async fn replace(
        &self,
        id: UserId,
        doc: &ValidUserDocument,
    ) -> Result<Option<UserRecord>, StoreError>;

    /// Merge only the fields present in `doc`; absent fields keep their prior
    /// values. Returns `None` when no record exists at `id`.
    async fn merge(
        &self,
        id: UserId,
        doc: &ValidUserDocument,
    ) -> Result<Option<UserRecord>, StoreError>;

    /// Delete the record at `id`. Succeeds whether or not a record existed.
    async fn delete(&self, id: UserId) -> Result<(), StoreError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
