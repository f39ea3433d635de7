//! Vault API Trait
//!
//! Defines the subset of the Vault `sys` API the bootstrapper relies on.

use async_trait::async_trait;

use crate::error::ClientResult;
use vault_bootstrap_core::models::{
    HealthStatus, InitRequest, InitResponse, SealStatus, UnsealRequest,
};

/// Operations against a single Vault server.
///
/// Implemented over HTTP by [`crate::HttpVaultClient`]; tests substitute
/// scripted fakes.
#[async_trait]
pub trait VaultApi: Send + Sync {
    /// Base address of the server, for log lines.
    fn address(&self) -> &str;

    /// Classify the server from `GET /v1/sys/health`.
    ///
    /// Every HTTP answer is a valid classification; only transport failures
    /// are errors.
    async fn health(&self) -> ClientResult<HealthStatus>;

    /// Initialize the server via `POST /v1/sys/init`.
    async fn init(&self, request: &InitRequest) -> ClientResult<InitResponse>;

    /// Read `GET /v1/sys/seal-status`.
    async fn seal_status(&self) -> ClientResult<SealStatus>;

    /// Submit a key share (or a reset) via `PUT /v1/sys/unseal`.
    async fn unseal(&self, request: &UnsealRequest) -> ClientResult<SealStatus>;
}
