//! Account display formatting
//!
//! Formats accounts for terminal output in table and detail views.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

use crate::models::{Account, AccountKind, AccountNumber, Money, MonthlyUpdate};

#[derive(Tabled)]
struct AccountRow {
    #[tabled(rename = "Number")]
    number: AccountNumber,
    #[tabled(rename = "Type")]
    account_type: String,
    #[tabled(rename = "Balance")]
    balance: Money,
}

/// Format a customer's accounts as a table with a total row
pub fn format_account_list(accounts: &[Account]) -> String {
    if accounts.is_empty() {
        return "No accounts found.\n".to_string();
    }

    let rows = accounts.iter().map(|a| AccountRow {
        number: a.number(),
        account_type: a.account_type().to_string(),
        balance: a.balance(),
    });

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .modify(Columns::last(), Alignment::right());

    let total: Money = accounts.iter().map(|a| a.balance()).sum();
    format!("{}\nTotal: {}\n", table, total)
}

/// Format a single account's details
pub fn format_account_details(account: &Account) -> String {
    let mut output = String::new();

    output.push_str(&format!("Account #{}\n", account.number()));
    output.push_str(&format!("  Type:            {}\n", account.account_type()));
    output.push_str(&format!("  Owner:           {}\n", account.owner()));
    output.push_str(&format!("  Balance:         {}\n", account.balance()));

    match account.kind() {
        AccountKind::Savings { interest_rate } => {
            output.push_str(&format!("  Interest rate:   {} per year\n", interest_rate));
            output.push_str(&format!(
                "  Next interest:   {}\n",
                account.calculate_interest()
            ));
        }
        AccountKind::Current { maintenance_fee } => {
            output.push_str(&format!("  Monthly fee:     {}\n", maintenance_fee));
        }
    }

    output
}

/// Format the per-account results of a month-end run
pub fn format_monthly_outcomes(outcomes: &[(AccountNumber, MonthlyUpdate)]) -> String {
    if outcomes.is_empty() {
        return "No accounts to update.\n".to_string();
    }

    let mut output = String::new();
    for (number, outcome) in outcomes {
        let line = match outcome {
            MonthlyUpdate::InterestCredited(amount) => {
                format!("#{}  interest credited  {}", number, amount)
            }
            MonthlyUpdate::FeeCharged(fee) => format!("#{}  fee charged        {}", number, fee),
            MonthlyUpdate::InsufficientFunds { fee, balance } => format!(
                "#{}  fee NOT charged    {} (balance {})",
                number, fee, balance
            ),
        };
        output.push_str(&line);
        output.push('\n');
    }

    output
}
