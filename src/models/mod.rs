//! Data Models
//!
//! Application-side models. Wire types for the Vault API live in
//! `vault_bootstrap_core::models`.

pub mod settings;

pub use settings::*;
