//! Statement and audit history formatting

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

use crate::audit::AuditEntry;
use crate::services::Statement;

#[derive(Tabled)]
struct StatementRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Counterpart")]
    counterpart: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Balance")]
    balance: String,
}

/// Format a statement as a table with a running balance
pub fn format_statement(statement: &Statement) -> String {
    let mut output = format!("Statement for account #{}\n", statement.account);

    if statement.lines.is_empty() {
        output.push_str("No transactions recorded.\n");
        output.push_str(&format!("Balance: {}\n", statement.closing_balance));
        return output;
    }

    let rows = statement.lines.iter().map(|line| StatementRow {
        date: line.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        kind: line.transaction_type.to_string(),
        counterpart: line
            .counterpart
            .map(|c| format!("#{}", c))
            .unwrap_or_default(),
        amount: line.amount.to_string(),
        balance: line.balance_after.to_string(),
    });

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .modify(Columns::new(3..), Alignment::right());

    output.push_str(&format!("Opening balance: {}\n", statement.opening_balance));
    output.push_str(&table.to_string());
    output.push('\n');
    output.push_str(&format!(
        "In: {}  Out: {}  Closing balance: {}\n",
        statement.total_in(),
        statement.total_out(),
        statement.closing_balance
    ));

    output
}

/// Format audit entries one per line
pub fn format_audit_history(entries: &[AuditEntry]) -> String {
    if entries.is_empty() {
        return "No audit entries.\n".to_string();
    }

    let mut output = String::new();
    for entry in entries {
        output.push_str(&entry.format_human_readable());
        output.push('\n');
    }
    output
}
