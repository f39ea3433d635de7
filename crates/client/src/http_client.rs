//! HTTP Client Factory
//!
//! Provides a factory function for building reqwest clients with the timeout
//! and TLS settings used to reach the Vault server.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ClientError, ClientResult};

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport options for [`build_http_client`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClientOptions {
    /// Per-request timeout, covering connect and body
    pub timeout: Duration,
    /// PEM bundle of additional CA certificates to trust
    pub ca_cert: Option<PathBuf>,
    /// Accept any server certificate
    pub skip_verify: bool,
    /// Honour `HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY` from the environment
    pub system_proxy: bool,
}

impl Default for HttpClientOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_REQUEST_TIMEOUT,
            ca_cert: None,
            skip_verify: false,
            system_proxy: false,
        }
    }
}

/// Build a `reqwest::Client` from the given options.
///
/// - `ca_cert` -> every certificate in the PEM file is added as a trust root
/// - `skip_verify` -> certificate validation is disabled entirely
/// - `system_proxy == false` -> explicitly disable proxy (`no_proxy`), ignoring env vars
pub fn build_http_client(options: &HttpClientOptions) -> ClientResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder().timeout(options.timeout);
    if !options.system_proxy {
        builder = builder.no_proxy();
    }

    if let Some(path) = &options.ca_cert {
        let pem = std::fs::read(path).map_err(|e| {
            ClientError::config(format!("failed to read CA bundle {}: {}", path.display(), e))
        })?;
        let certs = reqwest::Certificate::from_pem_bundle(&pem).map_err(|e| {
            ClientError::config(format!("invalid CA bundle {}: {}", path.display(), e))
        })?;
        if certs.is_empty() {
            return Err(ClientError::config(format!(
                "CA bundle {} contains no certificates",
                path.display()
            )));
        }
        for cert in certs {
            builder = builder.add_root_certificate(cert);
        }
    }

    if options.skip_verify {
        tracing::warn!("TLS certificate verification is disabled");
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder
        .build()
        .map_err(|e| ClientError::config(format!("failed to build HTTP client: {}", e)))
}
