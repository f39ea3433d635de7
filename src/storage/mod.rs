//! Storage Layer
//!
//! Persistence for key material produced by initialization.

pub mod key_file;

pub use key_file::KeyFile;
