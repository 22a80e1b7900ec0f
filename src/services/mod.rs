//! Service layer for bankstore
//!
//! Services sequence Store calls into complete business operations and
//! turn rejected credentials into errors; the Store itself stays a record
//! keeper.

pub mod banking;
pub mod statement;

pub use banking::{BankingService, Outcome};
pub use statement::{Statement, StatementLine};
