//! Account model
//!
//! Accounts come in two balance policies, savings and current. An auditable
//! savings account is a savings account wrapped with an [`AuditTrail`]; the
//! trail observes every deposit, withdrawal and monthly update without
//! changing how the balance moves.
//!
//! Every balance change goes through `Account::set_balance`, which refuses
//! a negative result.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::{AccountNumber, CustomerId};
use super::money::Money;
use crate::audit::{AuditAction, AuditEntry, AuditTrail};
use crate::error::{BankError, BankResult};

/// Persisted account type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Savings,
    Current,
    AuditableSavings,
}

impl AccountType {
    /// Integer code used in `accounts.txt`
    pub fn code(&self) -> u8 {
        match self {
            Self::Savings => 0,
            Self::Current => 1,
            Self::AuditableSavings => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Savings),
            1 => Some(Self::Current),
            2 => Some(Self::AuditableSavings),
            _ => None,
        }
    }

    /// Parse account type from user input
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "savings" => Some(Self::Savings),
            "current" | "checking" => Some(Self::Current),
            "auditable" | "auditable_savings" | "auditable-savings" => {
                Some(Self::AuditableSavings)
            }
            _ => None,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Savings => write!(f, "Savings"),
            Self::Current => write!(f, "Current"),
            Self::AuditableSavings => write!(f, "Auditable Savings"),
        }
    }
}

/// Annual interest rate in basis points (500 = 5%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterestRate(u32);

impl InterestRate {
    pub const fn from_basis_points(bps: u32) -> Self {
        Self(bps)
    }

    pub const fn basis_points(&self) -> u32 {
        self.0
    }

    /// One month of interest on `balance`: `balance * rate / 12`, rounded
    /// half away from zero to the cent
    pub fn monthly_interest_on(&self, balance: Money) -> Money {
        const DENOMINATOR: i128 = 12 * 10_000;
        let numerator = balance.cents() as i128 * self.0 as i128;
        let rounded = if numerator >= 0 {
            (numerator + DENOMINATOR / 2) / DENOMINATOR
        } else {
            (numerator - DENOMINATOR / 2) / DENOMINATOR
        };
        Money::from_cents(rounded as i64)
    }
}

impl Default for InterestRate {
    fn default() -> Self {
        Self(500)
    }
}

impl fmt::Display for InterestRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

/// Balance policy of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Savings { interest_rate: InterestRate },
    Current { maintenance_fee: Money },
}

/// Reported result of a monthly update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthlyUpdate {
    InterestCredited(Money),
    FeeCharged(Money),
    /// The fee was not charged; the balance is unchanged
    InsufficientFunds { fee: Money, balance: Money },
}

impl MonthlyUpdate {
    pub fn is_applied(&self) -> bool {
        !matches!(self, Self::InsufficientFunds { .. })
    }
}

/// A bank account
#[derive(Debug, Clone)]
pub struct Account {
    number: AccountNumber,
    owner: CustomerId,
    balance: Money,
    kind: AccountKind,
    audit: Option<AuditTrail>,
}

impl Account {
    fn new(
        number: AccountNumber,
        owner: CustomerId,
        initial_balance: Money,
        kind: AccountKind,
        audit: Option<AuditTrail>,
    ) -> BankResult<Self> {
        if initial_balance.is_negative() {
            return Err(BankError::Validation(
                "Initial balance cannot be negative".into(),
            ));
        }

        Ok(Self {
            number,
            owner,
            balance: initial_balance,
            kind,
            audit,
        })
    }

    pub fn savings(
        number: AccountNumber,
        owner: CustomerId,
        initial_balance: Money,
        interest_rate: InterestRate,
    ) -> BankResult<Self> {
        Self::new(
            number,
            owner,
            initial_balance,
            AccountKind::Savings { interest_rate },
            None,
        )
    }

    pub fn current(
        number: AccountNumber,
        owner: CustomerId,
        initial_balance: Money,
        maintenance_fee: Money,
    ) -> BankResult<Self> {
        if maintenance_fee.is_negative() {
            return Err(BankError::Validation(
                "Maintenance fee cannot be negative".into(),
            ));
        }

        Self::new(
            number,
            owner,
            initial_balance,
            AccountKind::Current { maintenance_fee },
            None,
        )
    }

    /// A savings account whose balance operations are recorded in `trail`
    pub fn auditable_savings(
        number: AccountNumber,
        owner: CustomerId,
        initial_balance: Money,
        interest_rate: InterestRate,
        trail: AuditTrail,
    ) -> BankResult<Self> {
        let mut account = Self::new(
            number,
            owner,
            initial_balance,
            AccountKind::Savings { interest_rate },
            Some(trail),
        )?;
        account.audit(AuditAction::AccountCreated, initial_balance, true);
        Ok(account)
    }

    /// Rebuild an account from its persisted fields
    ///
    /// Unlike [`Account::auditable_savings`] this records nothing in the
    /// trail: the account already exists.
    pub fn restore(
        number: AccountNumber,
        owner: CustomerId,
        balance: Money,
        account_type: AccountType,
        interest_rate: InterestRate,
        maintenance_fee: Money,
        trail: AuditTrail,
    ) -> BankResult<Self> {
        match account_type {
            AccountType::Savings => Self::savings(number, owner, balance, interest_rate),
            AccountType::Current => Self::current(number, owner, balance, maintenance_fee),
            AccountType::AuditableSavings => Self::new(
                number,
                owner,
                balance,
                AccountKind::Savings { interest_rate },
                Some(trail),
            ),
        }
    }

    pub fn number(&self) -> AccountNumber {
        self.number
    }

    pub fn owner(&self) -> CustomerId {
        self.owner
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn kind(&self) -> AccountKind {
        self.kind
    }

    pub fn account_type(&self) -> AccountType {
        match (self.kind, self.audit.is_some()) {
            (AccountKind::Current { .. }, _) => AccountType::Current,
            (AccountKind::Savings { .. }, true) => AccountType::AuditableSavings,
            (AccountKind::Savings { .. }, false) => AccountType::Savings,
        }
    }

    pub fn is_auditable(&self) -> bool {
        self.audit.is_some()
    }

    /// Audit entries recorded since this account was loaded or created
    pub fn audit_entries(&self) -> &[AuditEntry] {
        self.audit.as_ref().map(|t| t.entries()).unwrap_or(&[])
    }

    /// Add `amount` to the balance; false for a non-positive amount
    pub fn deposit(&mut self, amount: Money) -> bool {
        let succeeded = amount.is_positive()
            && self
                .balance
                .checked_add(amount)
                .is_some_and(|new_balance| self.set_balance(new_balance).is_ok());

        self.audit(AuditAction::Deposit, amount, succeeded);
        succeeded
    }

    /// Take `amount` from the balance; false for a non-positive amount or
    /// insufficient funds
    pub fn withdraw(&mut self, amount: Money) -> bool {
        let succeeded = amount.is_positive()
            && amount <= self.balance
            && self.set_balance(self.balance - amount).is_ok();

        self.audit(AuditAction::Withdrawal, amount, succeeded);
        succeeded
    }

    /// Interest for one month at the current balance; zero for current accounts
    pub fn calculate_interest(&self) -> Money {
        match self.kind {
            AccountKind::Savings { interest_rate } => {
                interest_rate.monthly_interest_on(self.balance)
            }
            AccountKind::Current { .. } => Money::zero(),
        }
    }

    /// Credit interest (savings) or charge the maintenance fee (current)
    pub fn apply_monthly_update(&mut self) -> MonthlyUpdate {
        match self.kind {
            AccountKind::Savings { .. } => {
                let interest = self.calculate_interest();
                let succeeded = self
                    .balance
                    .checked_add(interest)
                    .is_some_and(|new_balance| self.set_balance(new_balance).is_ok());

                self.audit(AuditAction::MonthlyInterest, interest, succeeded);
                if succeeded {
                    MonthlyUpdate::InterestCredited(interest)
                } else {
                    MonthlyUpdate::InterestCredited(Money::zero())
                }
            }
            AccountKind::Current { maintenance_fee } => {
                if self.balance < maintenance_fee {
                    return MonthlyUpdate::InsufficientFunds {
                        fee: maintenance_fee,
                        balance: self.balance,
                    };
                }
                match self.set_balance(self.balance - maintenance_fee) {
                    Ok(()) => MonthlyUpdate::FeeCharged(maintenance_fee),
                    Err(_) => MonthlyUpdate::InsufficientFunds {
                        fee: maintenance_fee,
                        balance: self.balance,
                    },
                }
            }
        }
    }

    fn set_balance(&mut self, new_balance: Money) -> BankResult<()> {
        if new_balance.is_negative() {
            return Err(BankError::Validation(format!(
                "Balance of account {} cannot become negative ({})",
                self.number, new_balance
            )));
        }
        self.balance = new_balance;
        Ok(())
    }

    fn audit(&mut self, action: AuditAction, amount: Money, succeeded: bool) {
        let (number, balance) = (self.number, self.balance);
        if let Some(trail) = self.audit.as_mut() {
            trail.record(number, action, amount, balance, succeeded);
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} ({})",
            self.number,
            self.account_type(),
            self.balance
        )
    }
}
