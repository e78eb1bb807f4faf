//! Authentication command handlers.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::auth::{CredentialStatus, CredentialStore, LoginFlow, LoginOutcome, SystemClock};
use crate::client::AuthApiClient;
use crate::config::{AppPaths, N8rConfig};
use crate::error::{N8rError, Result};

/// Handle the `n8r login` command.
pub async fn handle_login(config: &N8rConfig, paths: &AppPaths, open_browser: bool) -> Result<()> {
    let store = CredentialStore::new(paths)?;
    let api = AuthApiClient::new(&config.api)?;

    let outcome = LoginFlow::new(&api, &store, &SystemClock)
        .run(|device| {
            println!(
                "Visit {} and enter code: {}",
                device.verification_uri, device.user_code
            );
            if open_browser && open::that(&device.verification_uri).is_err() {
                println!("Could not open browser. Please visit the URL manually.");
            }
            println!("Waiting for authorization...");
        })
        .await?;

    match outcome {
        LoginOutcome::AlreadyAuthenticated(credential) => {
            tracing::debug!(expires_at = %credential.expires_at, "reusing stored credential");
            println!("You are already authenticated.");
            println!("Run `n8r logout` first to re-authenticate.");
        }
        LoginOutcome::Authenticated(credential) => {
            tracing::debug!(expires_at = %credential.expires_at, "stored new credential");
            println!("Successfully authenticated!");
        }
    }

    Ok(())
}

/// Handle the `n8r logout` command.
pub fn handle_logout(paths: &AppPaths) -> Result<()> {
    let store = CredentialStore::new(paths)?;

    if store.delete()? {
        println!("Logged out. Credentials removed.");
    } else {
        println!("Not currently logged in.");
    }

    Ok(())
}

/// Handle the `n8r status` command.
pub fn handle_status(paths: &AppPaths) -> Result<()> {
    let store = CredentialStore::new(paths)?;
    print!("{}", status_report(&store.status()?));
    Ok(())
}

/// Handle any command n8r does not define.
///
/// Without a valid credential the user is told to log in; only then is the
/// command reported as unknown.
pub fn handle_external(paths: &AppPaths, args: &[String]) -> Result<()> {
    let authenticated = CredentialStore::new(paths)
        .and_then(|store| store.status())
        .is_ok_and(|status| matches!(status, CredentialStatus::Active(_)));

    if !authenticated {
        return Err(N8rError::NotAuthenticated);
    }

    Err(N8rError::UnknownCommand(
        args.first().cloned().unwrap_or_default(),
    ))
}

fn status_report(status: &CredentialStatus) -> String {
    match status {
        CredentialStatus::NotAuthenticated => {
            "Not authenticated. Run `n8r login` to get started.\n".to_string()
        }
        CredentialStatus::Expired(credential) => format!(
            "Status: Token expired\nExpired at: {}\nRun `n8r login` to re-authenticate.\n",
            timestamp(credential.expires_at)
        ),
        CredentialStatus::Active(credential) => format!(
            "Status: Authenticated\nToken type: {}\nExpires at: {}\nSaved at:   {}\n",
            credential.token_type,
            timestamp(credential.expires_at),
            timestamp(credential.saved_at)
        ),
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
