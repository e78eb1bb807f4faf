//! Authentication for n8r.
//!
//! This module implements the OAuth device authorization flow against the
//! Injectionator server and the local storage of the resulting credential.

pub mod clock;
pub mod credentials;
pub mod device_flow;
pub mod login;
pub mod tokens;

pub use clock::SystemClock;
pub use credentials::{CredentialStatus, CredentialStore};
pub use login::{LoginFlow, LoginOutcome};
