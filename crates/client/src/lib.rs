//! Vault Bootstrap Client
//!
//! Provides a narrow interface to the Vault `sys` endpoints needed to bring a
//! server from uninitialized or sealed to unsealed:
//! - `GET /v1/sys/health`
//! - `POST /v1/sys/init`
//! - `GET /v1/sys/seal-status`
//! - `PUT /v1/sys/unseal`
//!
//! Also includes the HTTP client factory and HTTP error mapping.

pub mod api;
pub mod client;
pub mod error;
pub mod http_client;

// Re-export main types
pub use api::VaultApi;
pub use client::HttpVaultClient;
pub use error::{parse_http_error, ClientError, ClientResult};
pub use http_client::{build_http_client, HttpClientOptions};
