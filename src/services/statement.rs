//! Account statements
//!
//! A statement replays an account's journal lines in order. Interest and
//! maintenance fees are not journaled, so the opening balance is whatever
//! makes the replay end on the account's current balance.

use chrono::NaiveDateTime;
use tracing::warn;

use crate::models::{Account, AccountNumber, JournalRecord, Money, TransactionType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementLine {
    pub timestamp: NaiveDateTime,
    pub transaction_type: TransactionType,
    /// Effect on this account's balance
    pub amount: Money,
    pub counterpart: Option<AccountNumber>,
    pub balance_after: Money,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub account: AccountNumber,
    pub opening_balance: Money,
    pub closing_balance: Money,
    pub lines: Vec<StatementLine>,
}

impl Statement {
    /// Build a statement for `account` from its journal records
    ///
    /// Records whose amount would overflow the replay are skipped.
    pub fn build(account: &Account, records: &[JournalRecord]) -> Self {
        let closing_balance = account.balance();

        let mut movement = Money::zero();
        let mut replayed = Vec::with_capacity(records.len());
        for record in records {
            let amount = record.signed_amount();
            match movement.checked_add(amount) {
                Some(total) => {
                    movement = total;
                    replayed.push((record, amount));
                }
                None => warn!(
                    account = %record.account,
                    amount = %amount,
                    "Skipping journal record that overflows the statement"
                ),
            }
        }

        let opening_balance = closing_balance.checked_sub(movement).unwrap_or_else(|| {
            warn!(account = %account.number(), "Journal movement out of range; opening at closing balance");
            closing_balance
        });

        let mut running = opening_balance;
        let lines = replayed
            .into_iter()
            .map(|(record, amount)| {
                running = running.checked_add(amount).unwrap_or(running);
                StatementLine {
                    timestamp: record.timestamp,
                    transaction_type: record.transaction_type,
                    amount,
                    counterpart: record.counterpart,
                    balance_after: running,
                }
            })
            .collect();

        Self {
            account: account.number(),
            opening_balance,
            closing_balance,
            lines,
        }
    }

    pub fn total_in(&self) -> Money {
        self.lines
            .iter()
            .map(|l| l.amount)
            .filter(|a| a.is_positive())
            .fold(Money::zero(), Money::saturating_add)
    }

    pub fn total_out(&self) -> Money {
        self.lines
            .iter()
            .map(|l| l.amount)
            .filter(|a| a.is_negative())
            .fold(Money::zero(), Money::saturating_add)
    }
}
