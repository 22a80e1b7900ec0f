//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod account;
pub mod customer;
pub mod transaction;

pub use account::{handle_account_command, AccountCommands};
pub use customer::{handle_customer_command, CustomerCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use tracing::error;

use crate::error::{BankError, BankResult};
use crate::models::Money;

/// Use the password given on the command line, or prompt for it
pub fn password_or_prompt(given: Option<String>, prompt: &str) -> BankResult<String> {
    match given {
        Some(password) => Ok(password),
        None => rpassword::prompt_password(prompt)
            .map_err(|e| BankError::Io(format!("Failed to read password: {}", e))),
    }
}

/// Parse a user-entered amount such as "100" or "12.50"
pub fn parse_amount(input: &str) -> BankResult<Money> {
    Money::parse(input).map_err(|e| {
        BankError::Validation(format!(
            "Invalid amount: '{}'. Use a format like '100.00' or '100'. Error: {}",
            input, e
        ))
    })
}

/// Combine a command's result with the result of closing the store
///
/// The command's own error wins; a close failure behind it is logged.
pub fn finish(command: BankResult<()>, close: BankResult<()>) -> BankResult<()> {
    match (command, close) {
        (Err(e), Err(close_err)) => {
            error!(error = %close_err, "Failed to close store");
            Err(e)
        }
        (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
        (Ok(()), Ok(())) => Ok(()),
    }
}
