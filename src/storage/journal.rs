//! Append-only transaction journal (`transactions.txt`)
//!
//! Executed transactions are appended; the file is only rewritten when an
//! account is removed and its lines are purged.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::BankResult;
use crate::models::{AccountNumber, JournalRecord};

use super::file_io::{append_lines, read_lines, write_lines_atomic};

pub struct Journal {
    path: PathBuf,
}

impl Journal {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Append records in order
    pub fn append(&self, records: &[JournalRecord]) -> BankResult<()> {
        if records.is_empty() {
            return Ok(());
        }
        let lines: Vec<String> = records.iter().map(JournalRecord::to_line).collect();
        append_lines(&self.path, &lines)
    }

    /// Every readable record in file order; malformed lines are skipped
    pub fn read_all(&self) -> BankResult<Vec<JournalRecord>> {
        let lines = read_lines(&self.path)?;
        let mut records = Vec::with_capacity(lines.len());

        for line in &lines {
            match JournalRecord::parse(line) {
                Ok(record) => records.push(record),
                Err(e) => warn!(error = %e, "Skipping malformed journal line"),
            }
        }

        Ok(records)
    }

    /// Records whose primary account is `account`, in file order
    pub fn records_for(&self, account: AccountNumber) -> BankResult<Vec<JournalRecord>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|r| r.account == account)
            .collect())
    }

    /// Drop every line whose primary account is one of `accounts`
    ///
    /// Other lines are kept byte-for-byte, including ones that do not parse.
    /// The file is rewritten once. Returns the number of lines removed.
    pub fn purge(&self, accounts: &[AccountNumber]) -> BankResult<usize> {
        if accounts.is_empty() {
            return Ok(0);
        }

        let lines = read_lines(&self.path)?;
        let before = lines.len();

        let kept: Vec<String> = lines
            .into_iter()
            .filter(|line| !primary_account(line).is_some_and(|a| accounts.contains(&a)))
            .collect();

        let removed = before - kept.len();
        if removed > 0 {
            write_lines_atomic(&self.path, &kept)?;
        }

        debug!(accounts = accounts.len(), removed, "Purged journal lines");
        Ok(removed)
    }
}

fn primary_account(line: &str) -> Option<AccountNumber> {
    line.split(':').next()?.parse().ok()
}
