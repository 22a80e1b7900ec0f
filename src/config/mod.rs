//! Configuration for bankstore
//!
//! Path resolution for the data directory and user settings.

pub mod paths;
pub mod settings;

pub use paths::BankPaths;
pub use settings::Settings;
