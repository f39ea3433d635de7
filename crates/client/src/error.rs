//! Client Error Types

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while talking to the Vault HTTP API.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Connection refused, DNS failure, timeout. Worth retrying.
    #[error("Vault is not reachable: {message}")]
    Unreachable { message: String },

    /// The server answered with an unexpected status code
    #[error("{endpoint} returned HTTP {status}: {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// Response body could not be decoded
    #[error("Failed to parse {endpoint} response: {message}")]
    Parse { endpoint: String, message: String },

    /// The HTTP client could not be built (bad or unreadable CA bundle)
    #[error("Client configuration error: {0}")]
    Config(String),
}

/// Result type alias for client errors
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Map a transport-level reqwest error for the given endpoint.
    pub fn from_transport(endpoint: &str, err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Parse {
                endpoint: endpoint.to_string(),
                message: err.to_string(),
            }
        } else {
            Self::Unreachable {
                message: err.to_string(),
            }
        }
    }

    /// True for failures where the server was never reached.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }

    /// HTTP status for [`ClientError::Status`], if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct VaultErrorBody {
    #[serde(default)]
    errors: Vec<String>,
}

/// Build an error from a non-success response.
///
/// Vault reports failures as `{"errors": ["..."]}`; when the body has that
/// shape the messages are joined, otherwise the raw body is kept.
pub fn parse_http_error(status: u16, body: &str, endpoint: &str) -> ClientError {
    let message = match serde_json::from_str::<VaultErrorBody>(body) {
        Ok(parsed) if !parsed.errors.is_empty() => parsed.errors.join("; "),
        _ if body.trim().is_empty() => "<empty body>".to_string(),
        _ => body.trim().to_string(),
    };
    ClientError::Status {
        endpoint: endpoint.to_string(),
        status,
        message,
    }
}
