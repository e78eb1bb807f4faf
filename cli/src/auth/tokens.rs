//! Token types exchanged with the authorization server and kept on disk.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response from the device code endpoint.
#[derive(Clone, Deserialize)]
pub struct DeviceAuthorization {
    /// Opaque code the client polls with. Never shown to the user.
    pub device_code: String,
    /// Short code for the user to enter.
    pub user_code: String,
    /// URL for the user to visit.
    pub verification_uri: String,
    /// Seconds until the device code expires.
    pub expires_in: u64,
    /// Suggested seconds between poll requests.
    pub interval: u64,
}

impl fmt::Debug for DeviceAuthorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceAuthorization")
            .field("device_code", &"<redacted>")
            .field("user_code", &self.user_code)
            .field("verification_uri", &self.verification_uri)
            .field("expires_in", &self.expires_in)
            .field("interval", &self.interval)
            .finish()
    }
}

/// Successful response from the token endpoint.
#[derive(Clone, Deserialize)]
pub struct TokenGrant {
    /// The access token.
    pub access_token: String,
    /// Token type (usually "Bearer").
    pub token_type: String,
    /// Lifetime of the token in seconds from grant time.
    pub expires_in: u64,
}

impl fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGrant")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// The credential record persisted in `credentials.json`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredential {
    /// The access token.
    pub access_token: String,
    /// Token type (usually "Bearer").
    pub token_type: String,
    /// When the access token expires.
    pub expires_at: DateTime<Utc>,
    /// When the credential was written.
    pub saved_at: DateTime<Utc>,
}

impl StoredCredential {
    /// Builds the on-disk record for `grant`, fixing its expiry relative to `saved_at`.
    #[must_use]
    pub fn from_grant(grant: &TokenGrant, saved_at: DateTime<Utc>) -> Self {
        Self {
            access_token: grant.access_token.clone(),
            token_type: grant.token_type.clone(),
            expires_at: offset_by_secs(saved_at, grant.expires_in),
            saved_at,
        }
    }

    /// Check if the access token is expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Check if the access token is expired at `now`. No grace period.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

impl fmt::Debug for StoredCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredential")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .field("saved_at", &self.saved_at)
            .finish()
    }
}

/// Adds `secs` seconds to `at`, saturating at the largest representable instant.
pub(crate) fn offset_by_secs(at: DateTime<Utc>, secs: u64) -> DateTime<Utc> {
    i64::try_from(secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .and_then(|delta| at.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
