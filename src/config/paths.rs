//! Path management for bankstore
//!
//! ## Path Resolution Order
//!
//! 1. `BANKSTORE_DATA_DIR` environment variable (if set)
//! 2. The platform config directory (`~/.config/bankstore` on Linux,
//!    `~/Library/Application Support/bankstore` on macOS,
//!    `%APPDATA%\bankstore` on Windows)

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::BankError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "BANKSTORE_DATA_DIR";

/// Manages all paths used by bankstore
#[derive(Debug, Clone)]
pub struct BankPaths {
    /// Base directory for all bankstore data
    base_dir: PathBuf,
}

impl BankPaths {
    /// Create a new BankPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined and the
    /// environment override is not set.
    pub fn new() -> Result<Self, BankError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create BankPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the line-oriented record files
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Side log written by auditable savings accounts
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    pub fn customers_file(&self) -> PathBuf {
        self.data_dir().join("customers.txt")
    }

    pub fn accounts_file(&self) -> PathBuf {
        self.data_dir().join("accounts.txt")
    }

    pub fn auth_file(&self) -> PathBuf {
        self.data_dir().join("auth.txt")
    }

    pub fn counters_file(&self) -> PathBuf {
        self.data_dir().join("counters.txt")
    }

    /// The append-only transaction journal
    pub fn journal_file(&self) -> PathBuf {
        self.data_dir().join("transactions.txt")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), BankError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BankError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| BankError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }
}

fn resolve_default_path() -> Result<PathBuf, BankError> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| BankError::Config("Could not determine home directory".into()))?;
    Ok(dirs.config_dir().join("bankstore"))
}
