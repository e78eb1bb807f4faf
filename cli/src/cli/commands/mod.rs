//! Command implementations.

pub mod auth;

pub use auth::{handle_external, handle_login, handle_logout, handle_status};

/// The line printed by `n8r version`.
pub fn version_line() -> String {
    format!("n8r v{}", env!("CARGO_PKG_VERSION"))
}
