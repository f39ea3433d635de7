//! Command-line interface definitions
//!
//! Every flag can also be supplied through the environment variable named in
//! its help text.

use std::path::PathBuf;
use std::time::Duration;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use vault_bootstrap_core::retry::Backoff;

use crate::models::settings::{
    Settings, DEFAULT_MAX_RETRIES, DEFAULT_RECOVERY_SHARES, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_RETRY_DELAY_SECS, DEFAULT_UNSEAL_FILE, DEFAULT_UNSEAL_THRESHOLD,
};
use crate::utils::error::AppResult;
use crate::utils::logging::LogFormat;

/// Vault bootstrap CLI
#[derive(Parser, Debug)]
#[command(name = "vault-bootstrap")]
#[command(about = "Initialize and unseal a Vault server")]
#[command(version)]
pub struct Cli {
    /// Vault URL, e.g. http://vault:8200
    #[arg(long = "vault-url", alias = "vault_url", env = "VAULT_URL")]
    pub vault_url: String,

    /// Key shares required to unseal
    #[arg(
        long = "unseal-threshold",
        alias = "unseal_threshold",
        env = "UNSEAL_THRESHOLD",
        default_value_t = DEFAULT_UNSEAL_THRESHOLD
    )]
    pub unseal_threshold: u32,

    /// Key shares generated at initialization
    #[arg(
        long = "recovery-shares",
        alias = "recovery_shares",
        env = "RECOVERY_SHARES",
        default_value_t = DEFAULT_RECOVERY_SHARES
    )]
    pub recovery_shares: u32,

    /// File the initialization response is written to and read from
    #[arg(long, env = "UNSEAL_FILE", default_value = DEFAULT_UNSEAL_FILE)]
    pub unseal_file: PathBuf,

    /// Health check attempts before giving up
    #[arg(long, env = "VAULT_MAX_RETRIES", default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: usize,

    /// Seconds between health check attempts
    #[arg(long, env = "VAULT_RETRY_DELAY_SECS", default_value_t = DEFAULT_RETRY_DELAY_SECS)]
    pub retry_delay_secs: u64,

    /// Delay growth between attempts (fixed, exponential)
    #[arg(long, env = "VAULT_RETRY_BACKOFF", default_value_t = Backoff::Fixed)]
    pub backoff: Backoff,

    /// Per-request timeout in seconds
    #[arg(
        long,
        env = "VAULT_REQUEST_TIMEOUT_SECS",
        default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS
    )]
    pub request_timeout_secs: u64,

    /// PEM bundle of CA certificates to trust
    #[arg(long, env = "VAULT_CACERT")]
    pub ca_cert: Option<PathBuf>,

    /// Disable TLS certificate verification
    #[arg(
        long,
        env = "VAULT_SKIP_VERIFY",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub skip_verify: bool,

    /// Route requests through the proxy named in HTTP_PROXY/HTTPS_PROXY
    #[arg(
        long,
        env = "VAULT_USE_SYSTEM_PROXY",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub use_system_proxy: bool,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Full)]
    pub log_format: LogFormat,
}

impl Cli {
    /// Resolve the parsed arguments into validated settings.
    pub fn into_settings(self) -> AppResult<Settings> {
        let settings = Settings {
            vault_url: self.vault_url,
            unseal_threshold: self.unseal_threshold,
            recovery_shares: self.recovery_shares,
            unseal_file: self.unseal_file,
            max_retries: self.max_retries,
            retry_delay: Duration::from_secs(self.retry_delay_secs),
            backoff: self.backoff,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ca_cert: self.ca_cert,
            skip_verify: self.skip_verify,
            system_proxy: self.use_system_proxy,
        };
        Ok(settings.normalized()?)
    }
}
