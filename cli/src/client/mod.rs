//! HTTP client for the n8r authorization server.

pub mod api;
pub mod middleware;

pub use api::AuthApiClient;
