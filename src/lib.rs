//! Vault Bootstrap
//!
//! Brings a Vault server from whatever state it starts in to unsealed:
//! - waits for the health endpoint to answer
//! - initializes an uninitialized server and stores the generated key shares
//! - unseals a sealed server with a random quorum of the stored shares

pub mod cli;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

pub use cli::Cli;
pub use models::settings::Settings;
pub use services::{BootstrapOutcome, Bootstrapper};
pub use storage::KeyFile;
pub use utils::error::{AppError, AppResult};
