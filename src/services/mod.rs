//! Services
//!
//! Business logic of a bootstrap run: health dispatch, initialization and
//! unsealing.

pub mod bootstrap;
pub mod init;
pub mod unseal;

pub use bootstrap::{BootstrapOutcome, Bootstrapper};
pub use init::initialize;
pub use unseal::{required_shares, select_keys, unseal};
