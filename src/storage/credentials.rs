//! Credential tables and the `auth.txt` codec
//!
//! ```text
//! CUSTOMER:username:password:customerId
//! ACCOUNT:accountNumber:password
//! ```
//!
//! Passwords are stored verbatim. Maps are ordered so the rewritten file is
//! stable between saves.

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::{BankError, BankResult};
use crate::models::{AccountNumber, CustomerId};

const CUSTOMER_TAG: &str = "CUSTOMER";
const ACCOUNT_TAG: &str = "ACCOUNT";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    usernames: BTreeMap<String, CustomerId>,
    customer_passwords: BTreeMap<String, String>,
    account_passwords: BTreeMap<AccountNumber, String>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username_exists(&self, username: &str) -> bool {
        self.usernames.contains_key(username)
    }

    pub fn customer_id(&self, username: &str) -> Option<CustomerId> {
        self.usernames.get(username).copied()
    }

    /// The username bound to a customer, if any
    pub fn username_for(&self, customer_id: CustomerId) -> Option<&str> {
        self.usernames
            .iter()
            .find(|(_, id)| **id == customer_id)
            .map(|(name, _)| name.as_str())
    }

    pub fn bind_customer(&mut self, username: &str, customer_id: CustomerId, password: &str) {
        self.usernames.insert(username.to_string(), customer_id);
        self.customer_passwords
            .insert(username.to_string(), password.to_string());
    }

    pub fn unbind_username(&mut self, username: &str) {
        self.usernames.remove(username);
        self.customer_passwords.remove(username);
    }

    /// Drop every username bound to `customer_id`
    pub fn remove_customer(&mut self, customer_id: CustomerId) {
        let names: Vec<String> = self
            .usernames
            .iter()
            .filter(|(_, id)| **id == customer_id)
            .map(|(name, _)| name.clone())
            .collect();
        for name in names {
            self.unbind_username(&name);
        }
    }

    pub fn authenticate(&self, username: &str, password: &str) -> Option<CustomerId> {
        match self.customer_passwords.get(username) {
            Some(stored) if stored == password => self.customer_id(username),
            _ => None,
        }
    }

    pub fn set_customer_password(&mut self, username: &str, password: &str) {
        self.customer_passwords
            .insert(username.to_string(), password.to_string());
    }

    pub fn set_account_password(&mut self, number: AccountNumber, password: &str) {
        self.account_passwords.insert(number, password.to_string());
    }

    pub fn remove_account(&mut self, number: AccountNumber) -> Option<String> {
        self.account_passwords.remove(&number)
    }

    pub fn verify_account(&self, number: AccountNumber, password: &str) -> bool {
        self.account_passwords
            .get(&number)
            .is_some_and(|stored| stored == password)
    }

    /// Encode as `auth.txt` lines, customers first
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.usernames.len() + self.account_passwords.len());

        for (username, customer_id) in &self.usernames {
            let password = self
                .customer_passwords
                .get(username)
                .map(String::as_str)
                .unwrap_or_default();
            lines.push(format!(
                "{}:{}:{}:{}",
                CUSTOMER_TAG, username, password, customer_id
            ));
        }

        for (number, password) in &self.account_passwords {
            lines.push(format!("{}:{}:{}", ACCOUNT_TAG, number, password));
        }

        lines
    }

    /// Decode `auth.txt` lines; malformed lines are skipped with a warning
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut credentials = Self::new();

        for line in lines {
            let line = line.as_ref();
            if let Err(e) = credentials.apply_line(line) {
                warn!(error = %e, "Skipping malformed auth record");
            }
        }

        credentials
    }

    fn apply_line(&mut self, line: &str) -> BankResult<()> {
        let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split(':').collect();

        match fields.as_slice() {
            [CUSTOMER_TAG, username, password, id] if !username.is_empty() => {
                let customer_id: CustomerId = id
                    .trim()
                    .parse()
                    .map_err(|_| BankError::Parse(format!("Invalid customer id '{}'", id)))?;
                self.bind_customer(username, customer_id, password);
                Ok(())
            }
            [ACCOUNT_TAG, number, password] => {
                let number: AccountNumber = number.trim().parse().map_err(|_| {
                    BankError::Parse(format!("Invalid account number '{}'", number))
                })?;
                self.set_account_password(number, password);
                Ok(())
            }
            _ => Err(BankError::Parse(format!("Unrecognized auth record: {}", line))),
        }
    }
}
