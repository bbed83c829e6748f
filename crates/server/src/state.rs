//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::services::{CredentialCodec, CredentialError};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Holds the immutable configuration, the
/// process-wide database pool, and the credential codec built from the
/// configured signing key.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    credentials: CredentialCodec,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured signing key is unusable.
    pub fn new(config: ServerConfig, pool: PgPool) -> Result<Self, CredentialError> {
        let credentials = CredentialCodec::new(config.token_secret.clone())?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                credentials,
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the credential codec.
    #[must_use]
    pub fn credentials(&self) -> &CredentialCodec {
        &self.inner.credentials
    }
}
