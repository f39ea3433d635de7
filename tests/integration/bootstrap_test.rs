//! Bootstrap Integration Tests
//!
//! Health dispatch, retry budget, and the initialize-then-unseal path against
//! the in-memory Vault double.

use std::sync::Arc;

use vault_bootstrap::{AppError, BootstrapOutcome, KeyFile};
use vault_bootstrap_core::models::HealthStatus;

use super::fake_vault::FakeVault;
use super::support::{bootstrapper, test_settings, write_keys};

// ============================================================================
// Dispatch
// ============================================================================

#[tokio::test]
async fn test_active_server_is_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(&dir);
    let vault = Arc::new(FakeVault::active());

    let outcome = bootstrapper(&vault, settings.clone()).run().await.unwrap();

    assert_eq!(outcome, BootstrapOutcome::AlreadyReady(HealthStatus::Active));
    assert_eq!(vault.calls(), vec!["health"]);
    assert!(!KeyFile::new(&settings.unseal_file).exists());
}

#[tokio::test]
async fn test_standby_counts_as_ready() {
    let dir = tempfile::tempdir().unwrap();
    let vault = Arc::new(FakeVault::active().with_health_codes(&[429]));

    let outcome = bootstrapper(&vault, test_settings(&dir)).run().await.unwrap();

    assert_eq!(outcome, BootstrapOutcome::AlreadyReady(HealthStatus::Standby));
    assert_eq!(vault.count_calls("unseal"), 0);
}

#[tokio::test]
async fn test_dr_secondary_counts_as_ready() {
    let dir = tempfile::tempdir().unwrap();
    let vault = Arc::new(FakeVault::active().with_health_codes(&[472]));

    let outcome = bootstrapper(&vault, test_settings(&dir)).run().await.unwrap();

    assert_eq!(
        outcome,
        BootstrapOutcome::AlreadyReady(HealthStatus::DrSecondary)
    );
    assert_eq!(vault.calls(), vec!["health"]);
}

#[tokio::test]
async fn test_uninitialized_server_is_initialized_and_unsealed() {
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(&dir);
    let vault = Arc::new(FakeVault::uninitialized());

    let outcome = bootstrapper(&vault, settings.clone()).run().await.unwrap();

    match outcome {
        BootstrapOutcome::Initialized(status) => assert!(!status.sealed),
        other => panic!("expected Initialized, got {:?}", other),
    }
    assert!(vault.is_initialized());
    assert!(!vault.is_sealed());

    let calls = vault.calls();
    assert_eq!(&calls[..3], &["health", "init", "seal-status"]);
    assert_eq!(vault.count_calls("unseal:b64-"), 3);

    // The full init response was persisted.
    let stored = KeyFile::new(&settings.unseal_file).read().unwrap();
    assert_eq!(stored.keys_base64.len(), 7);
    assert_eq!(stored.keys.len(), 7);
    assert_eq!(stored.root_token, "hvs.fake-root");
}

#[tokio::test]
async fn test_init_uses_configured_share_counts() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = test_settings(&dir);
    settings.recovery_shares = 5;
    settings.unseal_threshold = 2;
    let vault = Arc::new(FakeVault::uninitialized());

    bootstrapper(&vault, settings.clone()).run().await.unwrap();

    let stored = KeyFile::new(&settings.unseal_file).read().unwrap();
    assert_eq!(stored.keys_base64.len(), 5);
    assert_eq!(vault.count_calls("unseal:"), 2);
}

#[tokio::test]
async fn test_sealed_server_is_unsealed_from_stored_keys() {
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(&dir);
    let keys = ["k1", "k2", "k3", "k4", "k5"];
    write_keys(&settings, &keys);
    let vault = Arc::new(FakeVault::sealed(&keys, 3));

    let outcome = bootstrapper(&vault, settings).run().await.unwrap();

    assert!(matches!(outcome, BootstrapOutcome::Unsealed(ref s) if !s.sealed));
    assert!(!vault.is_sealed());
    assert_eq!(vault.count_calls("init"), 0);
    assert_eq!(vault.count_calls("unseal:"), 3);
}

// ============================================================================
// Retry budget
// ============================================================================

#[tokio::test]
async fn test_unreachable_server_is_retried() {
    let dir = tempfile::tempdir().unwrap();
    let vault = Arc::new(FakeVault::active().unreachable_for(3));

    let outcome = bootstrapper(&vault, test_settings(&dir)).run().await.unwrap();

    assert_eq!(outcome, BootstrapOutcome::AlreadyReady(HealthStatus::Active));
    assert_eq!(vault.count_calls("health"), 4);
}

#[tokio::test]
async fn test_retries_exhausted() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = test_settings(&dir);
    settings.max_retries = 4;
    let vault = Arc::new(FakeVault::active().unreachable_for(100));

    let err = bootstrapper(&vault, settings).run().await.unwrap_err();

    assert!(matches!(err, AppError::RetriesExhausted { attempts: 4 }));
    assert_eq!(err.exit_code(), 1);
    assert_eq!(vault.count_calls("health"), 4);
}

#[tokio::test]
async fn test_unknown_health_status_consumes_retries() {
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(&dir);
    let keys = ["k1", "k2", "k3"];
    write_keys(&settings, &keys);
    let vault = Arc::new(FakeVault::sealed(&keys, 3).with_health_codes(&[500, 500]));

    let outcome = bootstrapper(&vault, settings).run().await.unwrap();

    assert!(matches!(outcome, BootstrapOutcome::Unsealed(_)));
    assert_eq!(vault.count_calls("health"), 3);
}

#[tokio::test]
async fn test_unknown_health_status_forever_gives_up() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = test_settings(&dir);
    settings.max_retries = 2;
    let vault = Arc::new(FakeVault::active().with_health_codes(&[502, 502, 502]));

    let err = bootstrapper(&vault, settings).run().await.unwrap_err();

    assert!(matches!(err, AppError::RetriesExhausted { .. }));
    assert_eq!(vault.count_calls("health"), 2);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_init_failure_writes_no_key_file() {
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(&dir);
    let vault = Arc::new(
        FakeVault::uninitialized().with_init_error(500, r#"{"errors":["storage unavailable"]}"#),
    );

    let err = bootstrapper(&vault, settings.clone()).run().await.unwrap_err();

    // The single error line printed by the binary carries the server detail.
    assert_eq!(
        err.to_string(),
        "Failed to initialize vault: sys/init returned HTTP 500: storage unavailable"
    );
    match &err {
        AppError::InitFailed(inner) => {
            assert_eq!(inner.status(), Some(500));
            assert!(inner.to_string().contains("storage unavailable"));
        }
        other => panic!("expected InitFailed, got {:?}", other),
    }
    assert!(!KeyFile::new(&settings.unseal_file).exists());
    assert_eq!(vault.count_calls("unseal"), 0);
}

#[tokio::test]
async fn test_sealed_without_key_file() {
    let dir = tempfile::tempdir().unwrap();
    let vault = Arc::new(FakeVault::sealed(&["k1", "k2", "k3"], 3));

    let err = bootstrapper(&vault, test_settings(&dir)).run().await.unwrap_err();

    assert!(matches!(err, AppError::UnsealFileMissing { .. }));
    assert!(err.to_string().contains("Initialization might have failed"));
    assert!(vault.is_sealed());
}
