//! Credential issuance and verification.
//!
//! A credential is an opaque signed token binding a subject identity:
//! `base64url(claims JSON) "." base64url(HMAC-SHA256 tag)`. The tag is
//! computed over the encoded payload with the process signing key. Tokens
//! carry no expiry or issued-at claim; a credential stays valid for as long
//! as the signing key does.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// The identity a credential asserts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject id: the user id the credential was minted for.
    pub sub: String,
    /// Display name at issuance time.
    pub name: String,
}

/// Errors from issuing or verifying credentials.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// No usable signing key is configured.
    #[error("no usable signing key is configured")]
    InvalidKey,

    /// The token does not have the expected shape.
    #[error("credential is malformed")]
    Malformed,

    /// The signature does not match the current signing key.
    #[error("credential signature does not match")]
    BadSignature,

    /// Claims failed to serialize.
    #[error("failed to encode claims: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Issues and verifies signed credentials with a fixed process-wide key.
pub struct CredentialCodec {
    key: SecretString,
}

impl CredentialCodec {
    /// Create a codec over the configured signing key.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::InvalidKey`] when the key is empty.
    pub fn new(key: SecretString) -> Result<Self, CredentialError> {
        if key.expose_secret().is_empty() {
            return Err(CredentialError::InvalidKey);
        }
        Ok(Self { key })
    }

    fn mac(&self) -> Result<HmacSha256, CredentialError> {
        HmacSha256::new_from_slice(self.key.expose_secret().as_bytes())
            .map_err(|_| CredentialError::InvalidKey)
    }

    /// Issue a credential for the given claims.
    ///
    /// Deterministic in `(claims, key)`: issuing twice yields the same token.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError`] if the claims fail to encode or the key is
    /// unusable.
    pub fn issue(&self, claims: &Claims) -> Result<String, CredentialError> {
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims)?);
        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let tag = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(format!("{payload}.{tag}"))
    }

    /// Verify a credential and return its claims.
    ///
    /// No expiry check is performed.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Malformed`] when the token does not split
    /// into two base64url parts or the payload is not valid claims JSON, and
    /// [`CredentialError::BadSignature`] when the tag does not verify.
    pub fn verify(&self, token: &str) -> Result<Claims, CredentialError> {
        let (payload, tag) = token.split_once('.').ok_or(CredentialError::Malformed)?;
        let tag = URL_SAFE_NO_PAD
            .decode(tag)
            .map_err(|_| CredentialError::Malformed)?;

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        // Constant-time comparison.
        mac.verify_slice(&tag)
            .map_err(|_| CredentialError::BadSignature)?;

        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| CredentialError::Malformed)?;
        serde_json::from_slice(&bytes).map_err(|_| CredentialError::Malformed)
    }
}
