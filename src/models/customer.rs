//! Customer model
//!
//! A customer exclusively owns its accounts. Lookups are linear scans keyed
//! on account number; the store's global counter guarantees numbers never
//! repeat within one customer.

use std::fmt;

use super::account::Account;
use super::ids::{AccountNumber, CustomerId};
use super::money::Money;
use crate::error::{BankError, BankResult};

#[derive(Debug, Clone)]
pub struct Customer {
    id: CustomerId,
    name: String,
    phone: String,
    accounts: Vec<Account>,
}

impl Customer {
    /// Create a customer with no accounts
    pub fn new(id: CustomerId, name: impl Into<String>, phone: impl Into<String>) -> BankResult<Self> {
        let name = name.into();
        let phone = phone.into();
        validate_profile(&name, &phone)?;

        Ok(Self {
            id,
            name,
            phone,
            accounts: Vec::new(),
        })
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Replace name and phone; both must be non-empty
    pub fn update_profile(&mut self, name: impl Into<String>, phone: impl Into<String>) -> BankResult<()> {
        let name = name.into();
        let phone = phone.into();
        validate_profile(&name, &phone)?;
        self.name = name;
        self.phone = phone;
        Ok(())
    }

    pub fn add_account(&mut self, account: Account) {
        self.accounts.push(account);
    }

    /// Remove and return the account with `number`, if present
    pub fn take_account(&mut self, number: AccountNumber) -> Option<Account> {
        let pos = self.accounts.iter().position(|a| a.number() == number)?;
        Some(self.accounts.remove(pos))
    }

    /// Remove the account with `number`; returns whether it was present
    pub fn remove_account(&mut self, number: AccountNumber) -> bool {
        self.take_account(number).is_some()
    }

    pub fn find_account(&self, number: AccountNumber) -> Option<&Account> {
        self.accounts.iter().find(|a| a.number() == number)
    }

    pub fn find_account_mut(&mut self, number: AccountNumber) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.number() == number)
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub(crate) fn accounts_mut(&mut self) -> &mut [Account] {
        &mut self.accounts
    }

    pub fn account_numbers(&self) -> Vec<AccountNumber> {
        self.accounts.iter().map(|a| a.number()).collect()
    }

    pub fn total_balance(&self) -> Money {
        self.accounts.iter().map(|a| a.balance()).sum()
    }
}

fn validate_profile(name: &str, phone: &str) -> BankResult<()> {
    if name.trim().is_empty() {
        return Err(BankError::Validation("Name cannot be empty".into()));
    }
    if phone.trim().is_empty() {
        return Err(BankError::Validation("Phone number cannot be empty".into()));
    }
    Ok(())
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InterestRate;

    fn account(number: u32) -> Account {
        Account::savings(
            AccountNumber::new(number),
            CustomerId::new(1000),
            Money::from_cents(100),
            InterestRate::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_name_or_phone_rejected() {
        assert!(Customer::new(CustomerId::new(1), "", "555").is_err());
        assert!(Customer::new(CustomerId::new(1), "Alice", "  ").is_err());
        assert!(Customer::new(CustomerId::new(1), "Alice", "555").is_ok());
    }

    #[test]
    fn test_add_find_remove() {
        let mut customer = Customer::new(CustomerId::new(1000), "Alice", "555").unwrap();
        customer.add_account(account(10000));
        customer.add_account(account(10001));

        assert!(customer.find_account(AccountNumber::new(10001)).is_some());
        assert!(customer.find_account(AccountNumber::new(10002)).is_none());
        assert_eq!(customer.total_balance(), Money::from_cents(200));

        assert!(customer.remove_account(AccountNumber::new(10000)));
        assert!(!customer.remove_account(AccountNumber::new(10000)));
        assert_eq!(customer.account_numbers(), vec![AccountNumber::new(10001)]);
    }

    #[test]
    fn test_update_profile() {
        let mut customer = Customer::new(CustomerId::new(1000), "Alice", "555").unwrap();
        customer.update_profile("Alice B", "556").unwrap();
        assert_eq!(customer.name(), "Alice B");

        assert!(customer.update_profile("", "556").is_err());
        assert_eq!(customer.name(), "Alice B");
        assert_eq!(customer.phone(), "556");
    }
}
