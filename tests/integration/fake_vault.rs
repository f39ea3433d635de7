//! In-memory Vault double
//!
//! Models just enough server state (initialized, sealed, submitted shares) to
//! drive the bootstrap flows without a network.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use vault_bootstrap_client::{parse_http_error, ClientError, ClientResult, VaultApi};
use vault_bootstrap_core::models::{
    HealthStatus, InitRequest, InitResponse, SealStatus, UnsealRequest,
};

#[derive(Default)]
struct State {
    unreachable_for: usize,
    health_codes: VecDeque<u16>,
    initialized: bool,
    sealed: bool,
    threshold: u32,
    shares: u32,
    accepted_keys: Vec<String>,
    rejected_keys: HashSet<String>,
    submitted: Vec<String>,
    init_error: Option<(u16, String)>,
    seal_status_error: Option<u16>,
    calls: Vec<String>,
}

pub struct FakeVault {
    state: Mutex<State>,
}

impl FakeVault {
    fn with_state(state: State) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    /// Fresh server waiting for `sys/init`
    pub fn uninitialized() -> Self {
        Self::with_state(State {
            sealed: true,
            ..Default::default()
        })
    }

    /// Initialized server that accepts `keys` and needs `threshold` of them
    pub fn sealed(keys: &[&str], threshold: u32) -> Self {
        Self::with_state(State {
            initialized: true,
            sealed: true,
            threshold,
            shares: keys.len() as u32,
            accepted_keys: keys.iter().map(|k| k.to_string()).collect(),
            ..Default::default()
        })
    }

    /// Initialized and unsealed server
    pub fn active() -> Self {
        Self::with_state(State {
            initialized: true,
            sealed: false,
            threshold: 3,
            shares: 5,
            ..Default::default()
        })
    }

    /// Fail the next `n` health checks with a transport error.
    pub fn unreachable_for(self, n: usize) -> Self {
        self.state.lock().unwrap().unreachable_for = n;
        self
    }

    /// Answer the next health checks with these raw status codes.
    pub fn with_health_codes(self, codes: &[u16]) -> Self {
        self.state.lock().unwrap().health_codes = codes.iter().copied().collect();
        self
    }

    pub fn with_init_error(self, status: u16, body: &str) -> Self {
        self.state.lock().unwrap().init_error = Some((status, body.to_string()));
        self
    }

    pub fn with_seal_status_error(self, status: u16) -> Self {
        self.state.lock().unwrap().seal_status_error = Some(status);
        self
    }

    /// Shares already submitted by an earlier, interrupted run.
    pub fn with_progress(self, keys: &[&str]) -> Self {
        self.state.lock().unwrap().submitted = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    /// Make the server refuse this key with HTTP 400.
    pub fn reject_key(self, key: &str) -> Self {
        self.state.lock().unwrap().rejected_keys.insert(key.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn is_sealed(&self) -> bool {
        self.state.lock().unwrap().sealed
    }

    pub fn is_initialized(&self) -> bool {
        self.state.lock().unwrap().initialized
    }
}

fn status_of(state: &State) -> SealStatus {
    SealStatus {
        sealed: state.sealed,
        t: state.threshold,
        n: state.shares,
        progress: state.submitted.len() as u32,
        initialized: state.initialized,
        version: Some("1.15.0".to_string()),
    }
}

#[async_trait]
impl VaultApi for FakeVault {
    fn address(&self) -> &str {
        "http://fake-vault:8200"
    }

    async fn health(&self) -> ClientResult<HealthStatus> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("health".to_string());

        if state.unreachable_for > 0 {
            state.unreachable_for -= 1;
            return Err(ClientError::Unreachable {
                message: "connection refused".to_string(),
            });
        }
        if let Some(code) = state.health_codes.pop_front() {
            return Ok(HealthStatus::from_status_code(code));
        }
        Ok(if !state.initialized {
            HealthStatus::Uninitialized
        } else if state.sealed {
            HealthStatus::Sealed
        } else {
            HealthStatus::Active
        })
    }

    async fn init(&self, request: &InitRequest) -> ClientResult<InitResponse> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("init".to_string());

        if let Some((status, body)) = &state.init_error {
            return Err(parse_http_error(*status, body, "sys/init"));
        }
        if state.initialized {
            return Err(parse_http_error(
                400,
                r#"{"errors":["Vault is already initialized"]}"#,
                "sys/init",
            ));
        }

        let keys: Vec<String> = (0..request.secret_shares)
            .map(|i| format!("hex-{}", i))
            .collect();
        let keys_base64: Vec<String> = (0..request.secret_shares)
            .map(|i| format!("b64-{}", i))
            .collect();

        state.initialized = true;
        state.sealed = true;
        state.threshold = request.secret_threshold;
        state.shares = request.secret_shares;
        state.accepted_keys = keys_base64.clone();

        Ok(InitResponse {
            keys,
            keys_base64,
            root_token: "hvs.fake-root".to_string(),
            extra: serde_json::Map::new(),
        })
    }

    async fn seal_status(&self) -> ClientResult<SealStatus> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("seal-status".to_string());

        if let Some(status) = state.seal_status_error {
            return Err(parse_http_error(status, "", "sys/seal-status"));
        }
        Ok(status_of(&state))
    }

    async fn unseal(&self, request: &UnsealRequest) -> ClientResult<SealStatus> {
        let mut state = self.state.lock().unwrap();
        match request {
            UnsealRequest::Reset { .. } => {
                state.calls.push("unseal:reset".to_string());
                state.submitted.clear();
            }
            UnsealRequest::Key { key } => {
                state.calls.push(format!("unseal:{}", key));
                if state.rejected_keys.contains(key) || !state.accepted_keys.contains(key) {
                    return Err(parse_http_error(
                        400,
                        r#"{"errors":["invalid key"]}"#,
                        "sys/unseal",
                    ));
                }
                if !state.submitted.contains(key) {
                    state.submitted.push(key.clone());
                }
                if state.submitted.len() as u32 >= state.threshold {
                    state.sealed = false;
                    state.submitted.clear();
                }
            }
        }
        Ok(status_of(&state))
    }
}
