//! Login orchestration: existing credential check, device flow, persistence.

use crate::auth::clock::Clock;
use crate::auth::credentials::CredentialStore;
use crate::auth::device_flow::{poll_for_token, DeviceAuthApi};
use crate::auth::tokens::{DeviceAuthorization, StoredCredential};
use crate::error::Result;

/// Successful end states of a login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// A valid credential was already stored; the server was not contacted.
    AlreadyAuthenticated(StoredCredential),
    /// The device flow completed and the new credential was saved.
    Authenticated(StoredCredential),
}

/// Drives one login from start to a terminal state.
///
/// Denied, expired and failed logins surface as the corresponding
/// [`N8rError`](crate::error::N8rError). Nothing is written unless the
/// server issued a token.
pub struct LoginFlow<'a, A: ?Sized, C: ?Sized> {
    api: &'a A,
    store: &'a CredentialStore,
    clock: &'a C,
}

impl<'a, A, C> LoginFlow<'a, A, C>
where
    A: DeviceAuthApi + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(api: &'a A, store: &'a CredentialStore, clock: &'a C) -> Self {
        Self { api, store, clock }
    }

    /// Runs the login.
    ///
    /// `on_device_code` is called once the server has issued a device code,
    /// before polling starts, so the caller can show the user where to go.
    ///
    /// # Errors
    ///
    /// Returns an error if the device code request, polling, or saving fails.
    pub async fn run<F>(&self, on_device_code: F) -> Result<LoginOutcome>
    where
        F: FnOnce(&DeviceAuthorization),
    {
        if let Some(existing) = self.existing_credential() {
            tracing::debug!("valid credential already stored, skipping device flow");
            return Ok(LoginOutcome::AlreadyAuthenticated(existing));
        }

        let device = self.api.request_device_code().await?;
        tracing::debug!(?device, "device code issued");
        on_device_code(&device);

        let grant = poll_for_token(
            self.api,
            self.clock,
            &device.device_code,
            device.interval,
            device.expires_in,
        )
        .await
        .map_err(|e| {
            tracing::debug!(
                error = %e,
                transport = e.is_transport(),
                protocol = e.is_protocol(),
                "device flow ended without a token"
            );
            e
        })?;

        let credential = self.store.save_at(&grant, self.clock.now())?;
        Ok(LoginOutcome::Authenticated(credential))
    }

    /// An unreadable credential file counts as absent so login can replace it.
    fn existing_credential(&self) -> Option<StoredCredential> {
        match self.store.load() {
            Ok(Some(credential)) if !credential.is_expired_at(self.clock.now()) => Some(credential),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable credentials");
                None
            }
        }
    }
}
