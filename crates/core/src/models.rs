//! Vault Wire Models
//!
//! Request and response types for the `sys/health`, `sys/init`,
//! `sys/seal-status` and `sys/unseal` endpoints.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Server state as reported by the status code of `GET /v1/sys/health`.
///
/// The health endpoint encodes its answer in the HTTP status rather than the
/// body, so the classification is done on the code alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// 200: initialized, unsealed and active
    Active,
    /// 429: unsealed standby node
    Standby,
    /// 472: disaster recovery secondary
    DrSecondary,
    /// 473: performance standby
    PerformanceStandby,
    /// 501: not initialized
    Uninitialized,
    /// 503: sealed
    Sealed,
    /// Any other status code
    Unknown(u16),
}

impl HealthStatus {
    /// Classify a `sys/health` response status code.
    pub fn from_status_code(code: u16) -> Self {
        match code {
            200 => Self::Active,
            429 => Self::Standby,
            472 => Self::DrSecondary,
            473 => Self::PerformanceStandby,
            501 => Self::Uninitialized,
            503 => Self::Sealed,
            other => Self::Unknown(other),
        }
    }

    /// Returns true when the node is initialized and unsealed, i.e. there is
    /// nothing left to bootstrap.
    pub fn is_ready(&self) -> bool {
        matches!(
            self,
            Self::Active | Self::Standby | Self::DrSecondary | Self::PerformanceStandby
        )
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Standby => write!(f, "standby"),
            Self::DrSecondary => write!(f, "dr secondary"),
            Self::PerformanceStandby => write!(f, "performance standby"),
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Sealed => write!(f, "sealed"),
            Self::Unknown(code) => write!(f, "unknown (HTTP {})", code),
        }
    }
}

/// Body of `GET /v1/sys/seal-status` and of every `PUT /v1/sys/unseal` reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SealStatus {
    /// A reply without the field is treated as still sealed.
    #[serde(default = "default_sealed")]
    pub sealed: bool,
    /// Number of key shares required to unseal
    #[serde(default)]
    pub t: u32,
    /// Total number of key shares
    #[serde(default)]
    pub n: u32,
    /// Key shares accepted so far in the current unseal attempt
    #[serde(default)]
    pub progress: u32,
    #[serde(default)]
    pub initialized: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

fn default_sealed() -> bool {
    true
}

/// Body of `POST /v1/sys/init`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct InitRequest {
    pub secret_shares: u32,
    pub secret_threshold: u32,
}

impl InitRequest {
    pub fn new(secret_shares: u32, secret_threshold: u32) -> Self {
        Self {
            secret_shares,
            secret_threshold,
        }
    }
}

/// Body returned by a successful `POST /v1/sys/init`.
///
/// Fields the server adds beyond the ones named here are kept in `extra` so
/// the persisted file holds the complete response.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InitResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub keys: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub keys_base64: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub root_token: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl InitResponse {
    /// The key shares to submit for unsealing.
    ///
    /// Prefers `keys_base64`, falling back to the hex `keys` list.
    pub fn unseal_keys(&self) -> &[String] {
        if self.keys_base64.is_empty() {
            &self.keys
        } else {
            &self.keys_base64
        }
    }
}

// Key material must not end up in log lines.
impl fmt::Debug for InitResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitResponse")
            .field("keys", &format_args!("[{} redacted]", self.keys.len()))
            .field(
                "keys_base64",
                &format_args!("[{} redacted]", self.keys_base64.len()),
            )
            .field("root_token", &"<redacted>")
            .field("extra", &self.extra.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `PUT /v1/sys/unseal`.
#[derive(Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum UnsealRequest {
    /// Submit one key share
    Key { key: String },
    /// Discard the shares submitted so far
    Reset { reset: bool },
}

impl UnsealRequest {
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key { key: key.into() }
    }

    pub fn reset() -> Self {
        Self::Reset { reset: true }
    }
}

impl fmt::Debug for UnsealRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key { .. } => f.write_str("UnsealRequest::Key(<redacted>)"),
            Self::Reset { reset } => write!(f, "UnsealRequest::Reset({})", reset),
        }
    }
}
