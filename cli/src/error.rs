//! Error types and result aliases for n8r.
//!
//! Every failure mode of the CLI maps onto one [`N8rError`] variant:
//! - transport failures (connection, DNS, timeout) reaching the auth server
//! - protocol failures (unexpected status codes or unparseable bodies)
//! - the expected terminal outcomes of the device flow (expired, denied)
//! - local environment and persistence failures around the credential file

use thiserror::Error;

/// Main error type for n8r operations.
///
/// Use [`is_transport`](Self::is_transport) and [`is_protocol`](Self::is_protocol)
/// to classify failures coming back from the authorization server.
#[derive(Error, Debug)]
pub enum N8rError {
    /// No valid credential is stored.
    #[error("Please run `n8r login` first")]
    NotAuthenticated,

    /// A command that n8r does not know about.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// The device code expired before the user completed authorization.
    #[error("Device code expired. Please run `n8r login` again.")]
    DeviceCodeExpired,

    /// The user denied the authorization request.
    #[error("Authorization was denied.")]
    AccessDenied,

    /// The server answered with a status or error code outside the protocol.
    #[error("Unexpected response (HTTP {status}): {body}")]
    UnexpectedResponse {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The server answered with a body that could not be parsed.
    #[error("Malformed response from authorization server: {0}")]
    MalformedResponse(String),

    /// Request timed out.
    #[error("Request timed out. The server may be slow or unreachable. Try again later.")]
    Timeout,

    /// Could not connect to the authorization server.
    #[error("Authorization server is unreachable. Check your network connection or try again later.")]
    ServerUnreachable,

    /// Any other network error during an HTTP request.
    #[error("Network error: {0}. Check your internet connection.")]
    Network(String),

    /// The local configuration directory cannot be resolved or created.
    #[error("Cannot prepare configuration directory: {0}")]
    Environment(String),

    /// Reading, writing, or deleting the credential file failed.
    #[error("Credential storage error: {0}")]
    Persistence(String),

    /// Failed to read configuration file.
    #[error("Failed to read configuration file: {0}. Check file permissions and format.")]
    ConfigRead(String),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl N8rError {
    /// Checks if this error came from the network layer rather than from the server.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::ServerUnreachable | Self::Network(_)
        )
    }

    /// Checks if the server answered outside the device flow protocol.
    #[must_use]
    pub const fn is_protocol(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedResponse { .. } | Self::MalformedResponse(_)
        )
    }

    /// Command-line misuse is reported as-is, without the generic error prefix.
    #[must_use]
    pub const fn is_cli_misuse(&self) -> bool {
        matches!(self, Self::NotAuthenticated | Self::UnknownCommand(_))
    }

    /// Whether the usage text should follow the error message.
    #[must_use]
    pub const fn shows_usage(&self) -> bool {
        matches!(self, Self::UnknownCommand(_))
    }
}

/// Result type alias using [`N8rError`].
pub type Result<T> = std::result::Result<T, N8rError>;

impl From<reqwest::Error> for N8rError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::ServerUnreachable
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<reqwest_middleware::Error> for N8rError {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(e) => e.into(),
            reqwest_middleware::Error::Middleware(e) => Self::Network(e.to_string()),
        }
    }
}
