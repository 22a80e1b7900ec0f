//! bankstore - text-file record store for a small banking application
//!
//! This library keeps customers, their accounts, login and account
//! passwords, and a journal of every deposit, withdrawal and transfer in
//! colon-delimited text files, and keeps the in-memory view consistent with
//! those files across restarts.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Data directory resolution and settings
//! - `error`: Custom error types
//! - `models`: Money, ids, accounts, customers and transactions
//! - `audit`: Audit trail for auditable savings accounts
//! - `storage`: The `Store` and its file formats
//! - `services`: Business operations on top of the store
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `bankstore` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use bankstore::config::{BankPaths, Settings};
//! use bankstore::models::{AccountType, Money};
//! use bankstore::services::BankingService;
//! use bankstore::storage::Store;
//!
//! let paths = BankPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut store = Store::open(paths, settings)?;
//!
//! let mut bank = BankingService::new(&mut store);
//! let alice = bank.register_customer("Alice", "555-0100", "alice", "secret")?;
//! let savings = bank.open_account(alice, AccountType::Savings, Money::from_cents(10_000), "pin")?;
//! bank.withdraw(savings, "pin", Money::from_cents(2_500))?;
//!
//! store.close()?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{BankError, BankResult};
