//! `PostgreSQL` implementation of the record store.
//!
//! Queries are runtime-checked `query_as` calls; rows decode through
//! `Email::parse` so a bad value in the database surfaces as
//! `StoreError::DataCorruption` instead of leaking out as a valid record.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use worko_core::{Email, UserId};

use super::{RecordStore, StoreError};
use crate::models::{UserRecord, ValidCreateUser, ValidUserDocument};

const SELECT_COLUMNS: &str = "id, email, name, age, city, zip_code, created_at, updated_at";

/// Record store backed by the process-wide `PostgreSQL` pool.
pub struct PgUserStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PgUserStore<'a> {
    /// Create a new store over the shared pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

/// Raw row shape; converted into the domain record after decode.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    email: Option<String>,
    name: Option<String>,
    age: Option<i32>,
    city: Option<String>,
    zip_code: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_record(self) -> Result<UserRecord, StoreError> {
        let email = self
            .email
            .map(|e| {
                Email::parse(&e).map_err(|err| {
                    StoreError::DataCorruption(format!("invalid email in database: {err}"))
                })
            })
            .transpose()?;

        Ok(UserRecord {
            id: UserId::new(self.id),
            email,
            name: self.name,
            age: self.age,
            city: self.city,
            zip_code: self.zip_code,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Map a unique-violation to `Conflict`; everything else stays a database error.
fn map_write_err(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return StoreError::Conflict("email already exists".to_owned());
    }
    StoreError::Database(e)
}

#[async_trait]
impl RecordStore for PgUserStore<'_> {
    async fn find_by_email(&self, email: &Email) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_record).transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_record).transpose()
    }

    async fn list(&self) -> Result<Vec<UserRecord>, StoreError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(UserRow::into_record).collect()
    }

    async fn insert(&self, user: &ValidCreateUser) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (email, name, age, city, zip_code) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(user.email.as_str())
        .bind(&user.name)
        .bind(user.age)
        .bind(&user.city)
        .bind(&user.zip_code)
        .fetch_optional(self.pool)
        .await
        .map_err(map_write_err)?;

        row.map(UserRow::into_record).transpose()
    }

    async fn replace(
        &self,
        id: UserId,
        doc: &ValidUserDocument,
    ) -> Result<Option<UserRecord>, StoreError> {
        // Every schema column is written; an absent field binds NULL.
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users \
             SET email = $2, name = $3, age = $4, city = $5, zip_code = $6, updated_at = now() \
             WHERE id = $1 \
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(doc.email.as_ref().map(Email::as_str))
        .bind(doc.name.as_deref())
        .bind(doc.age)
        .bind(doc.city.as_deref())
        .bind(doc.zip_code.as_deref())
        .fetch_optional(self.pool)
        .await
        .map_err(map_write_err)?;

        row.map(UserRow::into_record).transpose()
    }

    async fn merge(
        &self,
        id: UserId,
        doc: &ValidUserDocument,
    ) -> Result<Option<UserRecord>, StoreError> {
        // COALESCE keeps the stored value wherever the document is absent.
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users \
             SET email = COALESCE($2, email), \
                 name = COALESCE($3, name), \
                 age = COALESCE($4, age), \
                 city = COALESCE($5, city), \
                 zip_code = COALESCE($6, zip_code), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(doc.email.as_ref().map(Email::as_str))
        .bind(doc.name.as_deref())
        .bind(doc.age)
        .bind(doc.city.as_deref())
        .bind(doc.zip_code.as_deref())
        .fetch_optional(self.pool)
        .await
        .map_err(map_write_err)?;

        row.map(UserRow::into_record).transpose()
    }

    async fn delete(&self, id: UserId) -> Result<(), StoreError> {
        // Idempotent: a delete of a nonexistent id is a success, so the
        // affected-row count is deliberately ignored.
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
