//! Initialization
//!
//! Initializes an uninitialized server and stores the generated key shares.

use vault_bootstrap_client::VaultApi;
use vault_bootstrap_core::models::InitResponse;

use crate::models::settings::Settings;
use crate::storage::KeyFile;
use crate::utils::error::{AppError, AppResult};

/// Call `sys/init` with the configured share counts and persist the response.
///
/// The key file is written before returning so that a crash during unsealing
/// never loses the only copy of the key shares.
pub async fn initialize(
    api: &dyn VaultApi,
    settings: &Settings,
    key_file: &KeyFile,
) -> AppResult<InitResponse> {
    let request = settings.init_request();
    let response = api
        .init(&request)
        .await
        .map_err(AppError::InitFailed)?;

    tracing::info!(
        secret_shares = request.secret_shares,
        secret_threshold = request.secret_threshold,
        "Vault initialized successfully"
    );

    key_file.write(&response)?;
    tracing::info!(path = %key_file.path().display(), "Unseal keys written");

    Ok(response)
}
