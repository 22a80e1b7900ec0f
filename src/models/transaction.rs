//! Transaction model
//!
//! Deposits, withdrawals and transfers are built from borrowed accounts,
//! validated at construction, and then executed against an
//! [`AccountLedger`]: anything that can hand out `&mut Account` by number.
//! A transaction only remembers account numbers, so it never holds a
//! borrow of the store between construction and execution.
//!
//! Each executed transaction becomes one or two [`JournalRecord`]s, the
//! colon-delimited lines kept in `transactions.txt`:
//!
//! ```text
//! accountNumber:YYYY-MM-DD HH-MM-SS:typeCode:amount[:counterpart]
//! ```

use std::fmt;

use chrono::{Local, NaiveDateTime, Timelike};

use super::account::Account;
use super::customer::Customer;
use super::ids::AccountNumber;
use super::money::Money;
use crate::error::{BankError, BankResult};

/// Timestamp format of journal lines; hyphens keep the colon free for
/// field separation
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H-%M-%S";

/// Current local time truncated to whole seconds
pub fn local_now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Source of mutable accounts for executing transactions
pub trait AccountLedger {
    fn account_mut(&mut self, number: AccountNumber) -> Option<&mut Account>;
}

/// A lone account is a ledger of one; used to fund an account before it is
/// registered with the store
impl AccountLedger for Account {
    fn account_mut(&mut self, number: AccountNumber) -> Option<&mut Account> {
        if self.number() == number {
            Some(self)
        } else {
            None
        }
    }
}

impl AccountLedger for Customer {
    fn account_mut(&mut self, number: AccountNumber) -> Option<&mut Account> {
        self.find_account_mut(number)
    }
}

/// Journal type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Transfer,
}

impl TransactionType {
    pub fn code(&self) -> u8 {
        match self {
            Self::Deposit => 0,
            Self::Withdrawal => 1,
            Self::Transfer => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Deposit),
            1 => Some(Self::Withdrawal),
            2 => Some(Self::Transfer),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit => write!(f, "Deposit"),
            Self::Withdrawal => write!(f, "Withdrawal"),
            Self::Transfer => write!(f, "Transfer"),
        }
    }
}

fn require_positive(amount: Money) -> BankResult<()> {
    if !amount.is_positive() {
        return Err(BankError::Validation(format!(
            "Amount must be positive, got {}",
            amount
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deposit {
    account: AccountNumber,
    amount: Money,
    timestamp: NaiveDateTime,
}

impl Deposit {
    pub fn new(account: &Account, amount: Money) -> BankResult<Self> {
        require_positive(amount)?;
        Ok(Self {
            account: account.number(),
            amount,
            timestamp: local_now(),
        })
    }

    pub fn execute<L: AccountLedger + ?Sized>(&self, ledger: &mut L) -> bool {
        ledger
            .account_mut(self.account)
            .is_some_and(|a| a.deposit(self.amount))
    }

    pub fn undo<L: AccountLedger + ?Sized>(&self, ledger: &mut L) -> bool {
        ledger
            .account_mut(self.account)
            .is_some_and(|a| a.withdraw(self.amount))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Withdrawal {
    account: AccountNumber,
    amount: Money,
    timestamp: NaiveDateTime,
}

impl Withdrawal {
    pub fn new(account: &Account, amount: Money) -> BankResult<Self> {
        require_positive(amount)?;
        Ok(Self {
            account: account.number(),
            amount,
            timestamp: local_now(),
        })
    }

    pub fn execute<L: AccountLedger + ?Sized>(&self, ledger: &mut L) -> bool {
        ledger
            .account_mut(self.account)
            .is_some_and(|a| a.withdraw(self.amount))
    }

    pub fn undo<L: AccountLedger + ?Sized>(&self, ledger: &mut L) -> bool {
        ledger
            .account_mut(self.account)
            .is_some_and(|a| a.deposit(self.amount))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    from: AccountNumber,
    to: AccountNumber,
    amount: Money,
    timestamp: NaiveDateTime,
}

impl Transfer {
    pub fn new(from: &Account, to: &Account, amount: Money) -> BankResult<Self> {
        require_positive(amount)?;
        if from.number() == to.number() {
            return Err(BankError::Validation(
                "Cannot transfer to the same account".into(),
            ));
        }
        Ok(Self {
            from: from.number(),
            to: to.number(),
            amount,
            timestamp: local_now(),
        })
    }

    pub fn from_account(&self) -> AccountNumber {
        self.from
    }

    pub fn to_account(&self) -> AccountNumber {
        self.to
    }

    pub fn execute<L: AccountLedger + ?Sized>(&self, ledger: &mut L) -> bool {
        move_funds(ledger, self.from, self.to, self.amount)
    }

    pub fn undo<L: AccountLedger + ?Sized>(&self, ledger: &mut L) -> bool {
        move_funds(ledger, self.to, self.from, self.amount)
    }
}

/// Withdraw from `source`, then deposit into `target`; re-deposits into
/// `source` if the second leg fails
fn move_funds<L: AccountLedger + ?Sized>(
    ledger: &mut L,
    source: AccountNumber,
    target: AccountNumber,
    amount: Money,
) -> bool {
    let withdrawn = ledger
        .account_mut(source)
        .is_some_and(|a| a.withdraw(amount));
    if !withdrawn {
        return false;
    }

    if ledger
        .account_mut(target)
        .is_some_and(|a| a.deposit(amount))
    {
        return true;
    }

    let restored = ledger
        .account_mut(source)
        .is_some_and(|a| a.deposit(amount));
    if restored {
        tracing::warn!(%source, %target, %amount, "Transfer deposit leg failed; withdrawal reversed");
    } else {
        tracing::error!(%source, %target, %amount, "Transfer compensation failed");
    }
    false
}

/// A balance-affecting operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    Deposit(Deposit),
    Withdrawal(Withdrawal),
    Transfer(Transfer),
}

impl Transaction {
    pub fn deposit(account: &Account, amount: Money) -> BankResult<Self> {
        Deposit::new(account, amount).map(Self::Deposit)
    }

    pub fn withdrawal(account: &Account, amount: Money) -> BankResult<Self> {
        Withdrawal::new(account, amount).map(Self::Withdrawal)
    }

    pub fn transfer(from: &Account, to: &Account, amount: Money) -> BankResult<Self> {
        Transfer::new(from, to, amount).map(Self::Transfer)
    }

    pub fn transaction_type(&self) -> TransactionType {
        match self {
            Self::Deposit(_) => TransactionType::Deposit,
            Self::Withdrawal(_) => TransactionType::Withdrawal,
            Self::Transfer(_) => TransactionType::Transfer,
        }
    }

    pub fn amount(&self) -> Money {
        match self {
            Self::Deposit(d) => d.amount,
            Self::Withdrawal(w) => w.amount,
            Self::Transfer(t) => t.amount,
        }
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        match self {
            Self::Deposit(d) => d.timestamp,
            Self::Withdrawal(w) => w.timestamp,
            Self::Transfer(t) => t.timestamp,
        }
    }

    /// The account the operation was requested on (the source, for transfers)
    pub fn account(&self) -> AccountNumber {
        match self {
            Self::Deposit(d) => d.account,
            Self::Withdrawal(w) => w.account,
            Self::Transfer(t) => t.from,
        }
    }

    /// Every account whose balance this transaction touches
    pub fn accounts(&self) -> Vec<AccountNumber> {
        match self {
            Self::Transfer(t) => vec![t.from, t.to],
            _ => vec![self.account()],
        }
    }

    pub fn execute<L: AccountLedger + ?Sized>(&self, ledger: &mut L) -> bool {
        match self {
            Self::Deposit(d) => d.execute(ledger),
            Self::Withdrawal(w) => w.execute(ledger),
            Self::Transfer(t) => t.execute(ledger),
        }
    }

    pub fn undo<L: AccountLedger + ?Sized>(&self, ledger: &mut L) -> bool {
        match self {
            Self::Deposit(d) => d.undo(ledger),
            Self::Withdrawal(w) => w.undo(ledger),
            Self::Transfer(t) => t.undo(ledger),
        }
    }

    /// Journal lines for this transaction, one per leg
    pub fn journal_records(&self) -> Vec<JournalRecord> {
        let timestamp = self.timestamp();
        match self {
            Self::Deposit(d) => vec![JournalRecord {
                account: d.account,
                timestamp,
                transaction_type: TransactionType::Deposit,
                amount: d.amount,
                counterpart: None,
            }],
            Self::Withdrawal(w) => vec![JournalRecord {
                account: w.account,
                timestamp,
                transaction_type: TransactionType::Withdrawal,
                amount: w.amount,
                counterpart: None,
            }],
            Self::Transfer(t) => vec![
                JournalRecord {
                    account: t.from,
                    timestamp,
                    transaction_type: TransactionType::Transfer,
                    amount: -t.amount,
                    counterpart: Some(t.to),
                },
                JournalRecord {
                    account: t.to,
                    timestamp,
                    transaction_type: TransactionType::Transfer,
                    amount: t.amount,
                    counterpart: Some(t.from),
                },
            ],
        }
    }

    pub fn description(&self) -> String {
        match self {
            Self::Transfer(t) => format!(
                "Transfer of {} from account {} to account {}",
                t.amount, t.from, t.to
            ),
            other => format!("{} of {}", other.transaction_type(), other.amount()),
        }
    }
}

/// One line of the transaction journal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalRecord {
    pub account: AccountNumber,
    pub timestamp: NaiveDateTime,
    pub transaction_type: TransactionType,
    /// As stored: positive for deposits and withdrawals, signed per leg for
    /// transfers
    pub amount: Money,
    pub counterpart: Option<AccountNumber>,
}

impl JournalRecord {
    /// Effect of this line on the account's balance
    pub fn signed_amount(&self) -> Money {
        match self.transaction_type {
            TransactionType::Withdrawal => -self.amount.abs(),
            TransactionType::Deposit | TransactionType::Transfer => self.amount,
        }
    }

    /// Encode without the trailing newline
    pub fn to_line(&self) -> String {
        let mut line = format!(
            "{}:{}:{}:{}",
            self.account,
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.transaction_type.code(),
            self.amount.to_record_string()
        );
        if let Some(counterpart) = self.counterpart {
            line.push(':');
            line.push_str(&counterpart.to_string());
        }
        line
    }

    /// Decode a journal line; an empty fifth field means no counterpart
    pub fn parse(line: &str) -> BankResult<Self> {
        let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split(':').collect();
        if fields.len() != 4 && fields.len() != 5 {
            return Err(BankError::Parse(format!(
                "Journal line has {} fields: {}",
                fields.len(),
                line
            )));
        }

        let account = fields[0]
            .parse()
            .map_err(|_| BankError::Parse(format!("Bad account number in journal: {}", line)))?;
        let timestamp = NaiveDateTime::parse_from_str(fields[1], TIMESTAMP_FORMAT)
            .map_err(|e| BankError::Parse(format!("Bad journal timestamp '{}': {}", fields[1], e)))?;
        let transaction_type = fields[2]
            .parse::<u8>()
            .ok()
            .and_then(TransactionType::from_code)
            .ok_or_else(|| BankError::Parse(format!("Bad transaction type in journal: {}", line)))?;
        let amount = Money::parse(fields[3])
            .map_err(|e| BankError::Parse(format!("Bad journal amount: {}", e)))?;
        let counterpart = match fields.get(4) {
            Some(field) if !field.trim().is_empty() => Some(field.parse().map_err(|_| {
                BankError::Parse(format!("Bad counterpart account in journal: {}", line))
            })?),
            _ => None,
        };

        Ok(Self {
            account,
            timestamp,
            transaction_type,
            amount,
            counterpart,
        })
    }
}
