//! Store settings
//!
//! Account defaults (interest rate, maintenance fee), the starting values of
//! the id counters for a fresh data directory, and the default log level.

use serde::{Deserialize, Serialize};

use super::paths::BankPaths;
use crate::error::BankError;
use crate::models::{InterestRate, Money};

/// Settings loaded from `config.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Annual rate for new savings accounts, in basis points
    #[serde(default = "default_interest_rate_bps")]
    pub default_interest_rate_bps: u32,

    /// Monthly fee for current accounts, in cents
    #[serde(default = "default_maintenance_fee")]
    pub maintenance_fee: i64,

    /// First customer id handed out by a fresh store
    #[serde(default = "default_first_customer_id")]
    pub first_customer_id: u32,

    /// First account number handed out by a fresh store
    #[serde(default = "default_first_account_number")]
    pub first_account_number: u32,

    /// Default tracing filter when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_interest_rate_bps() -> u32 {
    500
}

fn default_maintenance_fee() -> i64 {
    1000
}

fn default_first_customer_id() -> u32 {
    1000
}

fn default_first_account_number() -> u32 {
    10000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_interest_rate_bps: default_interest_rate_bps(),
            maintenance_fee: default_maintenance_fee(),
            first_customer_id: default_first_customer_id(),
            first_account_number: default_first_account_number(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    pub fn interest_rate(&self) -> InterestRate {
        InterestRate::from_basis_points(self.default_interest_rate_bps)
    }

    pub fn maintenance_fee(&self) -> Money {
        Money::from_cents(self.maintenance_fee)
    }

    /// Reject settings the account model cannot honour
    pub fn validate(&self) -> Result<(), BankError> {
        if self.maintenance_fee < 0 {
            return Err(BankError::Config(
                "Maintenance fee cannot be negative".into(),
            ));
        }
        Ok(())
    }

    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &BankPaths) -> Result<Self, BankError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                BankError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BankError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BankPaths) -> Result<(), BankError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            BankError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            BankError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.interest_rate().basis_points(), 500);
        assert_eq!(settings.maintenance_fee(), Money::from_cents(1000));
        assert_eq!(settings.first_customer_id, 1000);
        assert_eq!(settings.first_account_number, 10000);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BankPaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings {
            default_interest_rate_bps: 250,
            maintenance_fee: 500,
            ..Settings::default()
        };
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.default_interest_rate_bps, 250);
        assert_eq!(loaded.maintenance_fee, 500);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BankPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"log_level": "debug"}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.log_level, "debug");
        assert_eq!(loaded.default_interest_rate_bps, 500);
    }

    #[test]
    fn test_negative_fee_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BankPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"maintenance_fee": -5}"#).unwrap();

        assert!(Settings::load_or_create(&paths).is_err());
    }
}
