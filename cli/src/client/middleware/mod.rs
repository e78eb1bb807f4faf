//! HTTP client middleware.

pub mod origin;

pub use origin::OriginMiddleware;
