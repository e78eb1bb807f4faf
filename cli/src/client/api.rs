//! Authorization server API client.
//!
//! Translates the raw HTTP/JSON exchanges of the two device flow endpoints
//! into [`DeviceAuthorization`] and [`TokenPollResponse`] values.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use serde::Deserialize;
use url::Url;

use crate::auth::device_flow::{DeviceAuthApi, TokenPollResponse};
use crate::auth::tokens::{DeviceAuthorization, TokenGrant};
use crate::client::middleware::OriginMiddleware;
use crate::config::ApiConfig;
use crate::error::{N8rError, Result};

const DEVICE_CODE_PATH: &str = "/api/auth/device/code";
const TOKEN_PATH: &str = "/api/auth/device/token";

/// Error body returned by the token endpoint while the flow is unresolved.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorCode,
    #[serde(default)]
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ErrorCode {
    AuthorizationPending,
    SlowDown,
    ExpiredToken,
    AccessDenied,
    #[serde(other)]
    Unknown,
}

/// Client for the device code and token endpoints.
pub struct AuthApiClient {
    client: ClientWithMiddleware,
    device_code_url: Url,
    token_url: Url,
}

impl AuthApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the endpoint URLs are invalid.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let inner_client = Client::builder()
            .user_agent(format!("n8r/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let client = ClientBuilder::new(inner_client)
            .with(OriginMiddleware::new(&config.base_url))
            .build();

        Ok(Self {
            client,
            device_code_url: endpoint(&config.base_url, DEVICE_CODE_PATH)?,
            token_url: endpoint(&config.base_url, TOKEN_PATH)?,
        })
    }

    /// POSTs a JSON body and returns the status with the raw response text.
    async fn post_json(&self, url: &Url, body: &serde_json::Value) -> Result<(StatusCode, String)> {
        let response = self
            .client
            .post(url.clone())
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        tracing::debug!(url = %url, status = status.as_u16(), "auth server responded");
        Ok((status, text))
    }
}

/// Appends `path` to `base`, keeping any path prefix the base URL carries.
fn endpoint(base: &Url, path: &str) -> Result<Url> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let prefixed = format!("{}/", base.path());
        base.set_path(&prefixed);
    }
    Ok(base.join(path.trim_start_matches('/'))?)
}

#[async_trait]
impl DeviceAuthApi for AuthApiClient {
    async fn request_device_code(&self) -> Result<DeviceAuthorization> {
        let (status, body) = self
            .post_json(&self.device_code_url, &serde_json::json!({}))
            .await?;

        if status != StatusCode::OK {
            return Err(N8rError::UnexpectedResponse {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| N8rError::MalformedResponse(format!("device code response: {e}")))
    }

    async fn poll_token(&self, device_code: &str) -> Result<TokenPollResponse> {
        let (status, body) = self
            .post_json(
                &self.token_url,
                &serde_json::json!({ "device_code": device_code }),
            )
            .await?;

        if status == StatusCode::OK {
            let grant: TokenGrant = serde_json::from_str(&body)
                .map_err(|e| N8rError::MalformedResponse(format!("token response: {e}")))?;
            return Ok(TokenPollResponse::Granted(grant));
        }

        let Ok(error) = serde_json::from_str::<ErrorBody>(&body) else {
            return Err(N8rError::UnexpectedResponse {
                status: status.as_u16(),
                body,
            });
        };

        tracing::debug!(
            code = ?error.error,
            description = error.error_description.as_deref().unwrap_or_default(),
            "token not issued"
        );

        match error.error {
            ErrorCode::AuthorizationPending => Ok(TokenPollResponse::Pending),
            ErrorCode::SlowDown => Ok(TokenPollResponse::SlowDown),
            ErrorCode::ExpiredToken => Ok(TokenPollResponse::Expired),
            ErrorCode::AccessDenied => Ok(TokenPollResponse::Denied),
            ErrorCode::Unknown => Err(N8rError::UnexpectedResponse {
                status: status.as_u16(),
                body,
            }),
        }
    }
}
