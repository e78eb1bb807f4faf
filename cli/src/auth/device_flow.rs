//! OAuth device authorization flow (RFC 8628) polling.
//!
//! [`DeviceAuthApi`] is the seam to the authorization server; the HTTP
//! implementation lives in [`crate::client::AuthApiClient`]. This module owns
//! the polling state machine on top of it.

use std::time::Duration;

use async_trait::async_trait;

use crate::auth::clock::Clock;
use crate::auth::tokens::{offset_by_secs, DeviceAuthorization, TokenGrant};
use crate::error::{N8rError, Result};

/// Extra wait added to the poll interval for every `slow_down` response.
pub const SLOW_DOWN_INCREMENT: Duration = Duration::from_secs(5);

/// Outcome of a single request to the token endpoint.
#[derive(Debug)]
pub enum TokenPollResponse {
    /// The user approved the request.
    Granted(TokenGrant),
    /// The user has not acted yet.
    Pending,
    /// The server asks the client to poll less often.
    SlowDown,
    /// The device code is no longer valid.
    Expired,
    /// The user rejected the request.
    Denied,
}

/// The two endpoints of the device authorization grant.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceAuthApi: Send + Sync {
    /// Starts a device authorization.
    ///
    /// # Errors
    ///
    /// Transport failures, non-200 responses, and unparseable bodies.
    async fn request_device_code(&self) -> Result<DeviceAuthorization>;

    /// Asks the token endpoint once whether `device_code` has been approved.
    ///
    /// # Errors
    ///
    /// Transport failures, and responses outside the device flow protocol.
    async fn poll_token(&self, device_code: &str) -> Result<TokenPollResponse>;
}

/// Poll for token completion.
///
/// The deadline is fixed once from `expires_in_secs`; `slow_down` responses
/// grow the interval for the rest of the flow but never move the deadline.
///
/// # Errors
///
/// Returns an error if:
/// - The deadline passes or the server reports the code expired ([`N8rError::DeviceCodeExpired`])
/// - The user denies access ([`N8rError::AccessDenied`])
/// - Any request fails or the server answers outside the protocol
pub async fn poll_for_token<A, C>(
    api: &A,
    clock: &C,
    device_code: &str,
    interval_secs: u64,
    expires_in_secs: u64,
) -> Result<TokenGrant>
where
    A: DeviceAuthApi + ?Sized,
    C: Clock + ?Sized,
{
    let deadline = offset_by_secs(clock.now(), expires_in_secs);
    let mut interval = Duration::from_secs(interval_secs);
    let mut attempts = 0_u32;

    loop {
        if clock.now() > deadline {
            tracing::debug!(attempts, "device code deadline passed");
            return Err(N8rError::DeviceCodeExpired);
        }

        clock.sleep(interval).await;
        attempts += 1;

        match api.poll_token(device_code).await? {
            TokenPollResponse::Granted(grant) => {
                tracing::debug!(attempts, "authorization granted");
                return Ok(grant);
            }
            TokenPollResponse::Pending => {
                tracing::debug!(attempts, "authorization pending");
            }
            TokenPollResponse::SlowDown => {
                interval += SLOW_DOWN_INCREMENT;
                tracing::debug!(attempts, interval_secs = interval.as_secs(), "server asked to slow down");
            }
            TokenPollResponse::Expired => return Err(N8rError::DeviceCodeExpired),
            TokenPollResponse::Denied => return Err(N8rError::AccessDenied),
        }
    }
}
