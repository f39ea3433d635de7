//! HTTP Vault Client
//!
//! Implementation of the VaultApi trait over reqwest.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::api::VaultApi;
use super::error::{parse_http_error, ClientError, ClientResult};
use crate::http_client::{build_http_client, HttpClientOptions};
use vault_bootstrap_core::models::{
    HealthStatus, InitRequest, InitResponse, SealStatus, UnsealRequest,
};

const HEALTH_PATH: &str = "sys/health";
const INIT_PATH: &str = "sys/init";
const SEAL_STATUS_PATH: &str = "sys/seal-status";
const UNSEAL_PATH: &str = "sys/unseal";

/// Vault client speaking HTTP(S)
pub struct HttpVaultClient {
    address: String,
    client: reqwest::Client,
}

impl HttpVaultClient {
    /// Create a client for the server at `address` (e.g. `http://vault:8200`).
    pub fn new(address: impl Into<String>, options: &HttpClientOptions) -> ClientResult<Self> {
        let client = build_http_client(options)?;
        Ok(Self::with_client(address, client))
    }

    /// Create a client reusing an existing reqwest client.
    pub fn with_client(address: impl Into<String>, client: reqwest::Client) -> Self {
        let address = address.into().trim_end_matches('/').to_string();
        Self { address, client }
    }

    /// Full URL of a `/v1/` endpoint
    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.address, path)
    }

    /// Read a response, returning the decoded body on 200 and a status error
    /// otherwise.
    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
        endpoint: &str,
    ) -> ClientResult<T> {
        let status = response.status().as_u16();
        let body_text = response
            .text()
            .await
            .map_err(|e| ClientError::from_transport(endpoint, e))?;

        if status != 200 {
            return Err(parse_http_error(status, &body_text, endpoint));
        }

        serde_json::from_str(&body_text).map_err(|e| ClientError::Parse {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl VaultApi for HttpVaultClient {
    fn address(&self) -> &str {
        &self.address
    }

    async fn health(&self) -> ClientResult<HealthStatus> {
        tracing::debug!(url = %self.url(HEALTH_PATH), "checking health");
        let response = self
            .client
            .get(self.url(HEALTH_PATH))
            .send()
            .await
            .map_err(|e| ClientError::from_transport(HEALTH_PATH, e))?;

        Ok(HealthStatus::from_status_code(response.status().as_u16()))
    }

    async fn init(&self, request: &InitRequest) -> ClientResult<InitResponse> {
        tracing::debug!(
            secret_shares = request.secret_shares,
            secret_threshold = request.secret_threshold,
            "sending init request"
        );
        let response = self
            .client
            .post(self.url(INIT_PATH))
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::from_transport(INIT_PATH, e))?;

        Self::read_json(response, INIT_PATH).await
    }

    async fn seal_status(&self) -> ClientResult<SealStatus> {
        let response = self
            .client
            .get(self.url(SEAL_STATUS_PATH))
            .send()
            .await
            .map_err(|e| ClientError::from_transport(SEAL_STATUS_PATH, e))?;

        Self::read_json(response, SEAL_STATUS_PATH).await
    }

    async fn unseal(&self, request: &UnsealRequest) -> ClientResult<SealStatus> {
        let response = self
            .client
            .put(self.url(UNSEAL_PATH))
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::from_transport(UNSEAL_PATH, e))?;

        Self::read_json(response, UNSEAL_PATH).await
    }
}
