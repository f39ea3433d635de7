//! Vault Bootstrap Core
//!
//! Foundational types for the Vault Bootstrap workspace. This crate has no
//! HTTP or runtime dependencies, so both the client crate and the CLI can share
//! it without pulling in each other.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `models` - Wire types for the `/v1/sys/*` endpoints (`HealthStatus`, `SealStatus`, `InitResponse`, ...)
//! - `retry` - Retry policy used while waiting for the server to come up

pub mod error;
pub mod models;
pub mod retry;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Wire Models ────────────────────────────────────────────────────────
pub use models::{HealthStatus, InitRequest, InitResponse, SealStatus, UnsealRequest};

// ── Retry ──────────────────────────────────────────────────────────────
pub use retry::{Backoff, RetryHandle, RetryPolicy};
