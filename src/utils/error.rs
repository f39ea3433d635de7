//! Error Handling
//!
//! Unified error types for the application.
//! Uses thiserror for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;
use vault_bootstrap_client::ClientError;
use vault_bootstrap_core::models::HealthStatus;
use vault_bootstrap_core::CoreError;

/// Exit status for invalid configuration
pub const EXIT_CONFIG: u8 = 2;
/// Exit status for every other failure
pub const EXIT_FAILURE: u8 = 1;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Errors from the core crate (validation, parsing)
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Errors from the Vault client
    #[error(transparent)]
    Client(#[from] ClientError),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Logging could not be installed
    #[error("Logging error: {0}")]
    Logging(String),

    /// The server never answered within the retry budget
    #[error("Max retries exceeded, Vault service is still unavailable after {attempts} attempts")]
    RetriesExhausted { attempts: usize },

    /// `sys/health` settled on a state the bootstrapper has no action for
    #[error("Unexpected Vault health state: {0}")]
    UnexpectedHealth(HealthStatus),

    /// `sys/init` failed
    #[error("Failed to initialize vault: {0}")]
    InitFailed(#[source] ClientError),

    /// `sys/seal-status` failed
    #[error("Failed to retrieve Vault status: {0}")]
    SealStatusFailed(#[source] ClientError),

    #[error("Unseal file not found at {}. Initialization might have failed.", path.display())]
    UnsealFileMissing { path: PathBuf },

    #[error("No unseal keys found in {}", path.display())]
    NoUnsealKeys { path: PathBuf },

    #[error("Unsealing needs {required} key shares but only {available} are stored")]
    InsufficientKeys { required: usize, available: usize },

    #[error("Vault is still sealed after unseal attempts. Progress: {progress}/{threshold}")]
    StillSealed { progress: u32, threshold: u32 },
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Core(CoreError::Config(_))
            | AppError::Core(CoreError::Validation(_))
            | AppError::Core(CoreError::Parse(_))
            | AppError::Client(ClientError::Config(_)) => EXIT_CONFIG,
            _ => EXIT_FAILURE,
        }
    }
}
