//! Unseal Key File
//!
//! Persists the `sys/init` response (unseal keys and root token) as a single
//! JSON document, and reads it back for unsealing.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use vault_bootstrap_core::models::InitResponse;

use crate::utils::error::{AppError, AppResult};

/// File mode for the key file on Unix
#[cfg(unix)]
const KEY_FILE_MODE: u32 = 0o600;

/// The JSON file holding the init response
#[derive(Debug, Clone)]
pub struct KeyFile {
    path: PathBuf,
}

impl KeyFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Write the init response, replacing any previous content.
    ///
    /// The parent directory is created if needed. On Unix the file is readable
    /// by its owner only.
    pub fn write(&self, response: &InitResponse) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string(response)?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(KEY_FILE_MODE);
        }

        let mut file = options.open(&self.path)?;

        // `mode` only applies when the file is created; narrow an existing
        // file before any key material lands in it.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(KEY_FILE_MODE))?;
        }

        file.write_all(content.as_bytes())?;
        file.sync_all()?;

        Ok(())
    }

    /// Read the stored init response.
    pub fn read(&self) -> AppResult<InitResponse> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AppError::UnsealFileMissing {
                    path: self.path.clone(),
                })
            }
            Err(e) => return Err(e.into()),
        };
        let response: InitResponse = serde_json::from_str(&content)?;
        Ok(response)
    }
}
