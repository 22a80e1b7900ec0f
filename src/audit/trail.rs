//! Per-account audit trail
//!
//! The trail is what turns a savings account into an auditable one: it
//! keeps every recorded entry in memory and mirrors it to the side log.
//! A failed write to the side log never fails the balance operation.

use crate::models::{AccountNumber, Money};

use super::entry::{AuditAction, AuditEntry};
use super::logger::AuditLogger;

#[derive(Debug, Clone, Default)]
pub struct AuditTrail {
    logger: Option<AuditLogger>,
    entries: Vec<AuditEntry>,
}

impl AuditTrail {
    /// A trail that mirrors entries to `logger`
    pub fn new(logger: AuditLogger) -> Self {
        Self {
            logger: Some(logger),
            entries: Vec::new(),
        }
    }

    /// A trail that only keeps entries in memory
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        account: AccountNumber,
        action: AuditAction,
        amount: Money,
        balance: Money,
        succeeded: bool,
    ) {
        let entry = AuditEntry::new(account, action, amount, balance, succeeded);

        if let Some(logger) = &self.logger {
            if let Err(e) = logger.log(&entry) {
                tracing::warn!(account = %account, error = %e, "Failed to write audit entry");
            }
        }

        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }
}
