//! Customer CLI commands
//!
//! Registration, login and profile management.

use clap::Subcommand;

use crate::display::format_customer_details;
use crate::error::{BankError, BankResult};
use crate::services::BankingService;
use crate::storage::Store;

use super::password_or_prompt;

/// Customer subcommands
#[derive(Subcommand)]
pub enum CustomerCommands {
    /// Register a new customer
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,
        /// Phone number
        #[arg(long)]
        phone: String,
        /// Login name
        #[arg(short, long)]
        username: String,
        /// Login password (prompted if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Check credentials and print the customer id
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Show profile and accounts
    Show {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Change name and/or phone
    Update {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: Option<String>,
        /// New display name
        #[arg(long)]
        name: Option<String>,
        /// New phone number
        #[arg(long)]
        phone: Option<String>,
    },
    /// Change the login password
    Passwd {
        #[arg(short, long)]
        username: String,
        /// Current password (prompted if omitted)
        #[arg(short, long)]
        password: Option<String>,
        /// New password (prompted if omitted)
        #[arg(long)]
        new_password: Option<String>,
    },
    /// Remove the customer and close all of its accounts
    Remove {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: Option<String>,
    },
}

/// Handle a customer command
pub fn handle_customer_command(store: &mut Store, cmd: CustomerCommands) -> BankResult<()> {
    let mut service = BankingService::new(store);

    match cmd {
        CustomerCommands::Register {
            name,
            phone,
            username,
            password,
        } => {
            let password = password_or_prompt(password, "Choose a password: ")?;
            let id = service.register_customer(&name, &phone, &username, &password)?;
            println!("Registered customer: {}", name);
            println!("  ID:       {}", id);
            println!("  Username: {}", username);
        }

        CustomerCommands::Login { username, password } => {
            let password = password_or_prompt(password, "Password: ")?;
            let id = service.login(&username, &password)?;
            println!("Logged in as customer {}", id);
        }

        CustomerCommands::Show { username, password } => {
            let password = password_or_prompt(password, "Password: ")?;
            let id = service.login(&username, &password)?;
            let customer = service.customer(id)?;
            print!("{}", format_customer_details(customer, Some(username.as_str())));
        }

        CustomerCommands::Update {
            username,
            password,
            name,
            phone,
        } => {
            if name.is_none() && phone.is_none() {
                println!("No changes specified. Use --name and/or --phone.");
                return Ok(());
            }

            let password = password_or_prompt(password, "Password: ")?;
            let id = service.login(&username, &password)?;
            let current = service.customer(id)?;
            let name = name.unwrap_or_else(|| current.name().to_string());
            let phone = phone.unwrap_or_else(|| current.phone().to_string());

            service.update_profile(id, &name, &phone)?;
            println!("Updated customer: {} ({})", name, phone);
        }

        CustomerCommands::Passwd {
            username,
            password,
            new_password,
        } => {
            let password = password_or_prompt(password, "Current password: ")?;
            let id = service.login(&username, &password)?;
            let new_password = match new_password {
                Some(p) => p,
                None => {
                    let first = password_or_prompt(None, "New password: ")?;
                    let second = password_or_prompt(None, "Confirm new password: ")?;
                    if first != second {
                        return Err(BankError::Validation("Passwords do not match".into()));
                    }
                    first
                }
            };

            service.change_password(id, &password, &new_password)?;
            println!("Password changed.");
        }

        CustomerCommands::Remove { username, password } => {
            let password = password_or_prompt(password, "Password: ")?;
            let id = service.login(&username, &password)?;
            service.remove_customer(id)?;
            println!("Removed customer {} and all of its accounts.", id);
        }
    }

    Ok(())
}
