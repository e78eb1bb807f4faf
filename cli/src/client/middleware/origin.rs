//! Middleware that stamps the `Origin` header on outgoing requests.

use async_trait::async_trait;
use http::header::ORIGIN;
use http::{Extensions, HeaderValue};
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next, Result};
use url::Url;

/// The auth server only accepts requests whose `Origin` matches its own.
pub struct OriginMiddleware {
    origin: HeaderValue,
}

impl OriginMiddleware {
    /// Create a middleware sending the origin of `base_url`.
    #[must_use]
    pub fn new(base_url: &Url) -> Self {
        let origin = HeaderValue::from_str(&base_url.origin().ascii_serialization())
            .unwrap_or_else(|_| HeaderValue::from_static("null"));
        Self { origin }
    }
}

#[async_trait]
impl Middleware for OriginMiddleware {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        req.headers_mut().insert(ORIGIN, self.origin.clone());
        next.run(req, extensions).await
    }
}
