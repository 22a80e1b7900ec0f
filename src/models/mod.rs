//! Core data models for bankstore
//!
//! Customers, their accounts, the transactions that move money between
//! them, and the journal records those transactions leave behind.

pub mod account;
pub mod customer;
pub mod ids;
pub mod money;
pub mod transaction;

pub use account::{Account, AccountKind, AccountType, InterestRate, MonthlyUpdate};
pub use customer::Customer;
pub use ids::{AccountNumber, CustomerId};
pub use money::{Money, MoneyParseError};
pub use transaction::{
    local_now, AccountLedger, Deposit, JournalRecord, Transaction, TransactionType, Transfer,
    Withdrawal, TIMESTAMP_FORMAT,
};
