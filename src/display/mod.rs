//! Display formatting for terminal output
//!
//! Tables are rendered with `tabled`; detail views are plain aligned text.

pub mod account;
pub mod customer;
pub mod statement;

pub use account::{format_account_details, format_account_list, format_monthly_outcomes};
pub use customer::format_customer_details;
pub use statement::{format_audit_history, format_statement};
