//! Logging setup
//!
//! Installs the global `tracing` subscriber for the binary. The filter comes
//! from `RUST_LOG` and falls back to `info`.

use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::utils::error::{AppError, AppResult};

/// Output format of log lines
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// `2024-01-01T00:00:00Z  INFO message`
    #[default]
    Full,
    Compact,
    /// Multi-line, for local debugging
    Pretty,
    /// One JSON object per line
    Json,
}

/// Build the filter used when `RUST_LOG` is unset or invalid.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize logging. Fails if a global subscriber is already installed.
pub fn init_logging(format: LogFormat) -> AppResult<()> {
    let builder = FmtSubscriber::builder()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_writer(std::io::stderr);

    let result = match format {
        LogFormat::Full => tracing::subscriber::set_global_default(builder.finish()),
        LogFormat::Compact => tracing::subscriber::set_global_default(builder.compact().finish()),
        LogFormat::Pretty => tracing::subscriber::set_global_default(builder.pretty().finish()),
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
    };

    result.map_err(|e| AppError::Logging(format!("Failed to set logger: {}", e)))
}
