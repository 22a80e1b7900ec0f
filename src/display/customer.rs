//! Customer display formatting

use crate::models::Customer;

use super::account::format_account_list;

/// Format a customer's profile followed by its accounts
pub fn format_customer_details(customer: &Customer, username: Option<&str>) -> String {
    let mut output = String::new();

    output.push_str(&format!("Customer: {}\n", customer.name()));
    output.push_str(&format!("  ID:        {}\n", customer.id()));
    if let Some(username) = username {
        output.push_str(&format!("  Username:  {}\n", username));
    }
    output.push_str(&format!("  Phone:     {}\n", customer.phone()));
    output.push_str(&format!("  Accounts:  {}\n", customer.accounts().len()));
    output.push('\n');
    output.push_str(&format_account_list(customer.accounts()));

    output
}
