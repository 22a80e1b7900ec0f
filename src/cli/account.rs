//! Account CLI commands
//!
//! Implements CLI commands for account management.

use clap::Subcommand;

use crate::display::{
    format_account_details, format_account_list, format_audit_history, format_monthly_outcomes,
};
use crate::error::{BankError, BankResult};
use crate::models::{AccountNumber, AccountType};
use crate::services::BankingService;
use crate::storage::Store;

use super::{parse_amount, password_or_prompt};

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Open a new account
    Open {
        /// Owner's login name
        #[arg(short, long)]
        username: String,
        /// Owner's login password (prompted if omitted)
        #[arg(short, long)]
        password: Option<String>,
        /// Account type (savings, current, auditable)
        #[arg(short = 't', long = "type", default_value = "savings")]
        account_type: String,
        /// Initial deposit (e.g., "100.00" or "100")
        #[arg(short, long, default_value = "0")]
        deposit: String,
        /// Password protecting the new account (prompted if omitted)
        #[arg(long)]
        account_password: Option<String>,
    },
    /// List a customer's accounts
    List {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Show account details
    Show {
        /// Account number
        number: AccountNumber,
        /// Account password (prompted if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Close an account, paying out its balance
    Close {
        /// Account number
        number: AccountNumber,
        /// Owner's login name
        #[arg(short, long)]
        username: String,
        /// Owner's login password (prompted if omitted)
        #[arg(short, long)]
        password: Option<String>,
        /// Account password (prompted if omitted)
        #[arg(long)]
        account_password: Option<String>,
    },
    /// Credit interest and charge fees on every account
    Monthly,
}

/// Handle an account command
pub fn handle_account_command(store: &mut Store, cmd: AccountCommands) -> BankResult<()> {
    let mut service = BankingService::new(store);

    match cmd {
        AccountCommands::Open {
            username,
            password,
            account_type,
            deposit,
            account_password,
        } => {
            let kind = AccountType::parse(&account_type).ok_or_else(|| {
                BankError::Validation(format!(
                    "Invalid account type: '{}'. Valid types: savings, current, auditable",
                    account_type
                ))
            })?;
            let initial = parse_amount(&deposit)?;

            let password = password_or_prompt(password, "Password: ")?;
            let customer_id = service.login(&username, &password)?;
            let account_password =
                password_or_prompt(account_password, "Choose an account password: ")?;

            let number = service.open_account(customer_id, kind, initial, &account_password)?;
            let account = service.account(number, &account_password)?;

            println!("Opened account #{}", number);
            println!("  Type:    {}", account.account_type());
            println!("  Balance: {}", account.balance());
        }

        AccountCommands::List { username, password } => {
            let password = password_or_prompt(password, "Password: ")?;
            let customer_id = service.login(&username, &password)?;
            print!("{}", format_account_list(service.accounts(customer_id)?));
        }

        AccountCommands::Show { number, password } => {
            let password = password_or_prompt(password, "Account password: ")?;
            let account = service.account(number, &password)?;
            print!("{}", format_account_details(account));

            if account.is_auditable() {
                let history = service.audit_history(number, &password)?;
                println!();
                println!("Audit history:");
                print!("{}", format_audit_history(&history));
            }
        }

        AccountCommands::Close {
            number,
            username,
            password,
            account_password,
        } => {
            let password = password_or_prompt(password, "Password: ")?;
            let customer_id = service.login(&username, &password)?;
            let account_password = password_or_prompt(account_password, "Account password: ")?;

            let paid_out = service.close_account(customer_id, number, &account_password)?;
            println!("Closed account #{}", number);
            println!("  Paid out: {}", paid_out);
        }

        AccountCommands::Monthly => {
            let outcomes = service.apply_monthly_updates()?;
            print!("{}", format_monthly_outcomes(&outcomes));
        }
    }

    Ok(())
}
