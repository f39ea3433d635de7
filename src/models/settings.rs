//! Settings Models
//!
//! Resolved runtime settings for a bootstrap run.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;
use vault_bootstrap_client::HttpClientOptions;
use vault_bootstrap_core::models::InitRequest;
use vault_bootstrap_core::retry::{Backoff, RetryPolicy};
use vault_bootstrap_core::{CoreError, CoreResult};

pub const DEFAULT_UNSEAL_THRESHOLD: u32 = 3;
pub const DEFAULT_RECOVERY_SHARES: u32 = 7;
pub const DEFAULT_UNSEAL_FILE: &str = "/unseal/.unseal";
pub const DEFAULT_MAX_RETRIES: usize = 10;
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 5;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Largest share count the server accepts
pub const MAX_SHARES: u32 = 255;

/// Settings for one bootstrap run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Base URL of the Vault server, without trailing slash
    pub vault_url: String,
    /// Key shares to submit when unsealing, and the threshold requested at init
    pub unseal_threshold: u32,
    /// Key shares generated at init
    pub recovery_shares: u32,
    /// Where the init response is stored
    pub unseal_file: PathBuf,
    /// Health check attempts before giving up
    pub max_retries: usize,
    pub retry_delay: Duration,
    pub backoff: Backoff,
    pub request_timeout: Duration,
    pub ca_cert: Option<PathBuf>,
    pub skip_verify: bool,
    pub system_proxy: bool,
}

impl Settings {
    /// Settings for `vault_url` with every other field at its default.
    pub fn new(vault_url: impl Into<String>) -> Self {
        Self {
            vault_url: vault_url.into(),
            unseal_threshold: DEFAULT_UNSEAL_THRESHOLD,
            recovery_shares: DEFAULT_RECOVERY_SHARES,
            unseal_file: PathBuf::from(DEFAULT_UNSEAL_FILE),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
            backoff: Backoff::Fixed,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            ca_cert: None,
            skip_verify: false,
            system_proxy: false,
        }
    }

    /// Drop trailing slashes from the URL and validate.
    pub fn normalized(mut self) -> CoreResult<Self> {
        self.vault_url = self.vault_url.trim().trim_end_matches('/').to_string();
        self.validate()?;
        Ok(self)
    }

    /// Validate the settings
    pub fn validate(&self) -> CoreResult<()> {
        let url = Url::parse(&self.vault_url).map_err(|e| {
            CoreError::config(format!("Invalid vault_url '{}': {}", self.vault_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CoreError::config(format!(
                "Invalid vault_url '{}': scheme must be http or https",
                self.vault_url
            )));
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(CoreError::config(format!(
                "Invalid vault_url '{}': missing host",
                self.vault_url
            )));
        }

        if self.unseal_threshold == 0 {
            return Err(CoreError::validation(
                "unseal_threshold must be at least 1",
            ));
        }
        if self.recovery_shares > MAX_SHARES {
            return Err(CoreError::validation(format!(
                "recovery_shares cannot exceed {}",
                MAX_SHARES
            )));
        }
        if self.unseal_threshold > self.recovery_shares {
            return Err(CoreError::validation(format!(
                "unseal_threshold ({}) cannot exceed recovery_shares ({})",
                self.unseal_threshold, self.recovery_shares
            )));
        }
        // Vault refuses a threshold of one when more than one share is generated.
        if self.recovery_shares > 1 && self.unseal_threshold < 2 {
            return Err(CoreError::validation(
                "unseal_threshold must be at least 2 when recovery_shares is greater than 1",
            ));
        }

        if self.max_retries == 0 {
            return Err(CoreError::validation("max_retries must be at least 1"));
        }

        Ok(())
    }

    pub fn init_request(&self) -> InitRequest {
        InitRequest::new(self.recovery_shares, self.unseal_threshold)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.backoff, self.max_retries, self.retry_delay)
    }

    pub fn http_options(&self) -> HttpClientOptions {
        HttpClientOptions {
            timeout: self.request_timeout,
            ca_cert: self.ca_cert.clone(),
            skip_verify: self.skip_verify,
            system_proxy: self.system_proxy,
        }
    }
}
