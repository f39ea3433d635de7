//! Unsealing
//!
//! Submits a random quorum of the stored key shares until the server reports
//! itself unsealed.

use rand::seq::SliceRandom;
use rand::Rng;
use vault_bootstrap_client::VaultApi;
use vault_bootstrap_core::models::{SealStatus, UnsealRequest};

use crate::models::settings::Settings;
use crate::storage::KeyFile;
use crate::utils::error::{AppError, AppResult};

/// Number of shares to submit: the configured threshold, raised to the
/// threshold the server reports when that is higher.
pub fn required_shares(configured: u32, server_threshold: u32) -> usize {
    configured.max(server_threshold) as usize
}

/// Pick `count` distinct keys at random.
pub fn select_keys<R>(keys: &[String], count: usize, rng: &mut R) -> AppResult<Vec<String>>
where
    R: Rng + ?Sized,
{
    if count > keys.len() {
        return Err(AppError::InsufficientKeys {
            required: count,
            available: keys.len(),
        });
    }
    Ok(keys.choose_multiple(rng, count).cloned().collect())
}

/// Unseal the server with keys from `key_file`.
///
/// Returns the final seal status. A server that is already unsealed is left
/// alone.
pub async fn unseal(
    api: &dyn VaultApi,
    settings: &Settings,
    key_file: &KeyFile,
) -> AppResult<SealStatus> {
    let status = api
        .seal_status()
        .await
        .map_err(AppError::SealStatusFailed)?;

    if !status.sealed {
        tracing::info!("Vault is already unsealed");
        return Ok(status);
    }

    let stored = key_file.read()?;
    let keys = stored.unseal_keys();
    if keys.is_empty() {
        return Err(AppError::NoUnsealKeys {
            path: key_file.path().to_path_buf(),
        });
    }

    let required = required_shares(settings.unseal_threshold, status.t);
    if status.t > settings.unseal_threshold {
        tracing::warn!(
            configured = settings.unseal_threshold,
            server = status.t,
            "Configured unseal threshold is below the server threshold, using the server value"
        );
    }
    let selected = select_keys(keys, required, &mut rand::thread_rng())?;

    if status.progress > 0 {
        tracing::warn!(
            progress = status.progress,
            threshold = status.t,
            "Discarding a partial unseal left by an earlier attempt"
        );
        if let Err(err) = api.unseal(&UnsealRequest::reset()).await {
            tracing::warn!("Failed to reset unseal progress: {}", err);
        }
    }

    let mut last = status;
    for key in selected {
        match api.unseal(&UnsealRequest::key(key)).await {
            Ok(reply) if !reply.sealed => {
                tracing::info!("Vault unsealed successfully");
                return Ok(reply);
            }
            Ok(reply) => {
                tracing::debug!(progress = reply.progress, threshold = reply.t, "Key share accepted");
                last = reply;
            }
            Err(err) => {
                tracing::warn!(status = ?err.status(), "Failed to send unseal request: {}", err);
            }
        }
    }

    let threshold = if last.t > 0 { last.t } else { required as u32 };
    Err(AppError::StillSealed {
        progress: last.progress,
        threshold,
    })
}
