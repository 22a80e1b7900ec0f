//! Audit entry data structures
//!
//! An audit entry records one balance-affecting action on an auditable
//! account: what was attempted, for how much, the balance afterwards, and
//! whether it went through.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::{local_now, AccountNumber, Money};

/// Actions recorded by the audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    AccountCreated,
    Deposit,
    Withdrawal,
    MonthlyInterest,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditAction::AccountCreated => write!(f, "Account created"),
            AuditAction::Deposit => write!(f, "Deposit"),
            AuditAction::Withdrawal => write!(f, "Withdrawal"),
            AuditAction::MonthlyInterest => write!(f, "Monthly interest"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Local wall-clock time, second resolution
    pub timestamp: NaiveDateTime,

    pub account: AccountNumber,

    pub action: AuditAction,

    /// Amount requested (or credited, for interest)
    pub amount: Money,

    /// Balance after the action was applied or rejected
    pub balance: Money,

    pub succeeded: bool,
}

impl AuditEntry {
    pub fn new(
        account: AccountNumber,
        action: AuditAction,
        amount: Money,
        balance: Money,
        succeeded: bool,
    ) -> Self {
        Self {
            timestamp: local_now(),
            account,
            action,
            amount,
            balance,
            succeeded,
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        format!(
            "[{}] #{} {} of {} {} (balance {})",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.account,
            self.action,
            self.amount,
            if self.succeeded { "succeeded" } else { "failed" },
            self.balance,
        )
    }
}
