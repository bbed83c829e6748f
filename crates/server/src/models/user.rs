//! User record types and typed request inputs.
//!
//! Domain types are kept separate from wire types: [`UserRecord`] is what the
//! store hands back, [`PublicUser`] is what goes over HTTP, and the input
//! structs carry their own validation functions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use worko_core::{Email, EmailError, UserId};

/// A stored user record (domain type).
///
/// Schema fields are optional because a full replace resets any field omitted
/// from the request. Creation requires all of them (see [`CreateUser`]).
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Store-assigned identifier.
    pub id: UserId,
    /// Unique key; absent only after a replace that omitted it.
    pub email: Option<Email>,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    /// Store-assigned, set at insertion.
    pub created_at: DateTime<Utc>,
    /// Store-assigned, bumped on every mutation.
    pub updated_at: DateTime<Utc>,
}

/// The public view of a user record, as serialized into response bodies.
///
/// Absent schema fields are omitted from the JSON rather than rendered null.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRecord> for PublicUser {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            name: record.name,
            age: record.age,
            city: record.city,
            zip_code: record.zip_code,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Errors produced by input validation.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// The email field failed to parse.
    #[error("invalid email: {0}")]
    Email(#[from] EmailError),

    /// A required string field is empty or whitespace.
    #[error("{field} cannot be empty")]
    EmptyField {
        /// Wire name of the offending field.
        field: &'static str,
    },

    /// Age is outside the accepted range.
    #[error("age must be between 0 and 150")]
    AgeOutOfRange,
}

/// Creation input. Every schema field is required.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub email: String,
    pub name: String,
    pub age: i32,
    pub city: String,
    pub zip_code: String,
}

/// A [`CreateUser`] that passed validation.
#[derive(Debug, Clone)]
pub struct ValidCreateUser {
    pub email: Email,
    pub name: String,
    pub age: i32,
    pub city: String,
    pub zip_code: String,
}

impl CreateUser {
    /// Validate the creation input.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered, checking fields in
    /// declaration order.
    pub fn validate(self) -> Result<ValidCreateUser, ValidationError> {
        let email = Email::parse(self.email.trim())?;
        let name = require_non_empty(self.name, "name")?;
        let age = validate_age(self.age)?;
        let city = require_non_empty(self.city, "city")?;
        let zip_code = require_non_empty(self.zip_code, "zipCode")?;

        Ok(ValidCreateUser {
            email,
            name,
            age,
            city,
            zip_code,
        })
    }
}

/// Mutation input, shared by replace and patch.
///
/// Every field is optional; the two operations differ in what an *absent*
/// field means. Replace resets it, patch preserves it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    pub email: Option<String>,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
}

/// A [`UserDocument`] that passed validation.
#[derive(Debug, Clone, Default)]
pub struct ValidUserDocument {
    pub email: Option<Email>,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
}

impl UserDocument {
    /// Validate whichever fields are present; absent fields stay absent.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered among the present
    /// fields.
    pub fn validate(self) -> Result<ValidUserDocument, ValidationError> {
        let email = self
            .email
            .map(|e| Email::parse(e.trim()))
            .transpose()?;
        let name = self
            .name
            .map(|n| require_non_empty(n, "name"))
            .transpose()?;
        let age = self.age.map(validate_age).transpose()?;
        let city = self
            .city
            .map(|c| require_non_empty(c, "city"))
            .transpose()?;
        let zip_code = self
            .zip_code
            .map(|z| require_non_empty(z, "zipCode"))
            .transpose()?;

        Ok(ValidUserDocument {
            email,
            name,
            age,
            city,
            zip_code,
        })
    }
}

fn require_non_empty(value: String, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(trimmed.to_owned())
}

fn validate_age(age: i32) -> Result<i32, ValidationError> {
    if (0..=150).contains(&age) {
        Ok(age)
    } else {
        Err(ValidationError::AgeOutOfRange)
    }
}
