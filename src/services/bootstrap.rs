//! Bootstrap Service
//!
//! Waits for the server to answer its health check, then dispatches to
//! initialization and/or unsealing depending on the reported state.

use std::sync::Arc;

use vault_bootstrap_client::VaultApi;
use vault_bootstrap_core::models::{HealthStatus, SealStatus};

use super::init::initialize;
use super::unseal::unseal;
use crate::models::settings::Settings;
use crate::storage::KeyFile;
use crate::utils::error::{AppError, AppResult};

/// What a bootstrap run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// Initialized and unsealed already; nothing done
    AlreadyReady(HealthStatus),
    /// Initialized, keys written, then unsealed
    Initialized(SealStatus),
    /// Was sealed, now unsealed
    Unsealed(SealStatus),
}

/// Drives one bootstrap run against a Vault server
pub struct Bootstrapper {
    api: Arc<dyn VaultApi>,
    settings: Settings,
    key_file: KeyFile,
}

impl Bootstrapper {
    pub fn new(api: Arc<dyn VaultApi>, settings: Settings) -> Self {
        let key_file = KeyFile::new(settings.unseal_file.clone());
        Self {
            api,
            settings,
            key_file,
        }
    }

    /// Check health and bring the server to the unsealed state.
    pub async fn run(&self) -> AppResult<BootstrapOutcome> {
        tracing::info!(address = %self.api.address(), "Checking Vault health");
        let health = self.wait_for_health().await?;

        match health {
            HealthStatus::Uninitialized => {
                tracing::info!("Vault is not initialized, starting initialization");
                initialize(self.api.as_ref(), &self.settings, &self.key_file).await?;
                let status = unseal(self.api.as_ref(), &self.settings, &self.key_file).await?;
                Ok(BootstrapOutcome::Initialized(status))
            }
            HealthStatus::Sealed => {
                tracing::info!("Vault is sealed, starting unseal process");
                let status = unseal(self.api.as_ref(), &self.settings, &self.key_file).await?;
                Ok(BootstrapOutcome::Unsealed(status))
            }
            ready if ready.is_ready() => {
                tracing::info!(state = %ready, "Vault is initialized and unsealed");
                Ok(BootstrapOutcome::AlreadyReady(ready))
            }
            other => Err(AppError::UnexpectedHealth(other)),
        }
    }

    /// Poll `sys/health` until it returns a recognised state.
    ///
    /// Transport failures and unrecognised status codes each consume one
    /// attempt of the retry policy.
    pub async fn wait_for_health(&self) -> AppResult<HealthStatus> {
        let mut retry = self.settings.retry_policy().handle();

        loop {
            match self.api.health().await {
                Ok(HealthStatus::Unknown(code)) => {
                    tracing::warn!(status = code, "Unexpected health status from Vault");
                }
                Ok(status) => return Ok(status),
                Err(err) if err.is_unreachable() => {
                    tracing::debug!("Health check failed: {}", err);
                }
                Err(err) => return Err(err.into()),
            }

            match retry.next_delay() {
                Some(delay) => {
                    tracing::warn!(
                        attempt = retry.attempts(),
                        max_attempts = retry.max_attempts(),
                        "Vault is not available, retrying in {} seconds...",
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                }
                None => {
                    tracing::error!("Max retries exceeded, Vault service is still unavailable.");
                    return Err(AppError::RetriesExhausted {
                        attempts: retry.attempts(),
                    });
                }
            }
        }
    }
}
