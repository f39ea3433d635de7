// Vault Bootstrap - command line entry point

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use vault_bootstrap::utils::logging::init_logging;
use vault_bootstrap::{AppResult, BootstrapOutcome, Bootstrapper, Cli};
use vault_bootstrap_client::HttpVaultClient;

async fn run(cli: Cli) -> AppResult<BootstrapOutcome> {
    let settings = cli.into_settings()?;
    tracing::info!(
        vault_url = %settings.vault_url,
        unseal_threshold = settings.unseal_threshold,
        recovery_shares = settings.recovery_shares,
        "Starting Vault bootstrap"
    );

    let client = HttpVaultClient::new(settings.vault_url.clone(), &settings.http_options())?;
    Bootstrapper::new(Arc::new(client), settings).run().await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(cli.log_format) {
        eprintln!("{}", err);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(outcome) => {
            tracing::debug!(?outcome, "Bootstrap finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::from(err.exit_code())
        }
    }
}
