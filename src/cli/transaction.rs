//! Transaction CLI commands
//!
//! Deposits, withdrawals, transfers and statements. Every command is
//! authorized with the password of the account money leaves from (or, for
//! deposits and statements, the account itself).

use clap::Subcommand;

use crate::display::format_statement;
use crate::error::BankResult;
use crate::models::AccountNumber;
use crate::services::{BankingService, Outcome};
use crate::storage::Store;

use super::{parse_amount, password_or_prompt};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Deposit money into an account
    Deposit {
        /// Account number
        number: AccountNumber,
        /// Amount (e.g., "25.00")
        amount: String,
        /// Account password (prompted if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Withdraw money from an account
    Withdraw {
        number: AccountNumber,
        amount: String,
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Transfer money between two accounts
    Transfer {
        /// Source account number
        from: AccountNumber,
        /// Destination account number
        to: AccountNumber,
        amount: String,
        /// Source account password (prompted if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Show an account's statement
    Statement {
        number: AccountNumber,
        #[arg(short, long)]
        password: Option<String>,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(store: &mut Store, cmd: TransactionCommands) -> BankResult<()> {
    let mut service = BankingService::new(store);

    match cmd {
        TransactionCommands::Deposit {
            number,
            amount,
            password,
        } => {
            let amount = parse_amount(&amount)?;
            let password = password_or_prompt(password, "Account password: ")?;
            let outcome = service.deposit(number, &password, amount)?;
            report(&format!("Deposited {} into #{}", amount, number), &outcome);
        }

        TransactionCommands::Withdraw {
            number,
            amount,
            password,
        } => {
            let amount = parse_amount(&amount)?;
            let password = password_or_prompt(password, "Account password: ")?;
            let outcome = service.withdraw(number, &password, amount)?;
            report(&format!("Withdrew {} from #{}", amount, number), &outcome);
        }

        TransactionCommands::Transfer {
            from,
            to,
            amount,
            password,
        } => {
            let amount = parse_amount(&amount)?;
            let password = password_or_prompt(password, "Source account password: ")?;
            let outcome = service.transfer(from, &password, to, amount)?;
            report(
                &format!("Transferred {} from #{} to #{}", amount, from, to),
                &outcome,
            );
        }

        TransactionCommands::Statement { number, password } => {
            let password = password_or_prompt(password, "Account password: ")?;
            let statement = service.statement(number, &password)?;
            print!("{}", format_statement(&statement));
        }
    }

    Ok(())
}

fn report(done: &str, outcome: &Outcome) {
    match outcome {
        Outcome::Completed { balance } => {
            println!("{}", done);
            println!("  New balance: {}", balance);
        }
        Outcome::InsufficientFunds { balance } => {
            println!("Insufficient funds. Nothing was changed.");
            println!("  Balance: {}", balance);
        }
    }
}
