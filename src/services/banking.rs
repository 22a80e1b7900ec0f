//! Banking service
//!
//! Sequences Store calls into whole business operations: verify the
//! password, build and execute the transaction, journal it, persist the
//! new balances.
//!
//! A transaction is journaled only after it executed. If the journal append
//! fails the transaction is undone. If the balance rewrite fails after the
//! journal append, the journal and memory agree but `accounts.txt` lags
//! until the next successful save.

use tracing::{error, info};

use crate::audit::AuditEntry;
use crate::error::{BankError, BankResult};
use crate::models::{
    Account, AccountNumber, AccountType, Customer, CustomerId, Money, MonthlyUpdate, Transaction,
};
use crate::storage::{validate_field, Store};

use super::statement::Statement;

/// Result of a money-moving request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Executed and journaled; carries the new balance of the primary account
    Completed { balance: Money },
    /// Not enough money; nothing changed
    InsufficientFunds { balance: Money },
}

impl Outcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

pub struct BankingService<'a> {
    store: &'a mut Store,
}

impl<'a> BankingService<'a> {
    pub fn new(store: &'a mut Store) -> Self {
        Self { store }
    }

    // ------------------------------------------------------------------
    // Customers
    // ------------------------------------------------------------------

    /// Register a new customer and return its id
    pub fn register_customer(
        &mut self,
        name: &str,
        phone: &str,
        username: &str,
        password: &str,
    ) -> BankResult<CustomerId> {
        validate_field("Name", name)?;
        validate_field("Phone number", phone)?;
        validate_field("Username", username)?;
        validate_field("Password", password)?;

        if self.store.username_exists(username) {
            return Err(BankError::Duplicate {
                entity_type: "Username",
                identifier: username.to_string(),
            });
        }

        let id = self.store.allocate_customer_id()?;
        let customer = Customer::new(id, name, phone)?;
        if !self.store.add_customer(customer, username, password)? {
            return Err(BankError::Duplicate {
                entity_type: "Username",
                identifier: username.to_string(),
            });
        }

        Ok(id)
    }

    /// Resolve a username/password pair to a customer id
    pub fn login(&self, username: &str, password: &str) -> BankResult<CustomerId> {
        self.store
            .authenticate(username, password)
            .ok_or_else(|| BankError::Auth(format!("Invalid credentials for '{}'", username)))
    }

    pub fn customer(&self, id: CustomerId) -> BankResult<&Customer> {
        self.store
            .find_customer(id)
            .ok_or_else(|| BankError::customer_not_found(id.to_string()))
    }

    pub fn update_profile(&mut self, id: CustomerId, name: &str, phone: &str) -> BankResult<()> {
        self.store.update_customer_profile(id, name, phone)
    }

    pub fn change_password(&mut self, id: CustomerId, old: &str, new: &str) -> BankResult<()> {
        if self.store.change_password(id, old, new)? {
            Ok(())
        } else {
            Err(BankError::Auth("Current password is incorrect".into()))
        }
    }

    /// Remove a customer together with all of its accounts
    pub fn remove_customer(&mut self, id: CustomerId) -> BankResult<()> {
        if self.store.remove_customer(id)? {
            Ok(())
        } else {
            Err(BankError::customer_not_found(id.to_string()))
        }
    }

    // ------------------------------------------------------------------
    // Accounts
    // ------------------------------------------------------------------

    /// Open an account funded by an initial deposit
    ///
    /// The account is created empty and the deposit runs as an ordinary
    /// transaction, so a positive initial deposit shows up in the journal
    /// (and in the audit trail of an auditable account).
    pub fn open_account(
        &mut self,
        customer_id: CustomerId,
        account_type: AccountType,
        initial_deposit: Money,
        password: &str,
    ) -> BankResult<AccountNumber> {
        if initial_deposit.is_negative() {
            return Err(BankError::Validation(
                "Initial deposit cannot be negative".into(),
            ));
        }
        validate_field("Account password", password)?;

        let mut account = match account_type {
            AccountType::Savings => self.store.create_savings_account(customer_id, Money::zero())?,
            AccountType::Current => self.store.create_current_account(customer_id, Money::zero())?,
            AccountType::AuditableSavings => self
                .store
                .create_auditable_savings_account(customer_id, Money::zero())?,
        };
        let number = account.number();

        let funding = if initial_deposit.is_positive() {
            let deposit = Transaction::deposit(&account, initial_deposit)?;
            deposit.execute(&mut account);
            Some(deposit)
        } else {
            None
        };

        self.store.add_account(account, password)?;
        if let Some(deposit) = funding {
            // An opening deposit that cannot be journaled takes the account with it
            if let Err(e) = self.store.add_transaction(number, &deposit) {
                if let Err(undo) = self.store.unregister_account(number) {
                    error!(account = %number, error = %undo, "Failed to back out unjournaled account");
                }
                return Err(e);
            }
        }

        info!(account = %number, customer = %customer_id, kind = %account_type, "Opened account");
        Ok(number)
    }

    pub fn accounts(&self, customer_id: CustomerId) -> BankResult<&[Account]> {
        Ok(self.customer(customer_id)?.accounts())
    }

    /// Look up an account after checking its password
    pub fn account(&self, number: AccountNumber, password: &str) -> BankResult<&Account> {
        self.authorize(number, password)?;
        self.store.get_account(number)
    }

    /// Close an account owned by `customer_id`
    ///
    /// Any remaining balance is withdrawn (and journaled) first. Returns the
    /// amount paid out.
    pub fn close_account(
        &mut self,
        customer_id: CustomerId,
        number: AccountNumber,
        password: &str,
    ) -> BankResult<Money> {
        let account = self.account(number, password)?;
        if account.owner() != customer_id {
            return Err(BankError::Auth(format!(
                "Account {} does not belong to customer {}",
                number, customer_id
            )));
        }

        let remaining = account.balance();
        if remaining.is_positive() {
            let withdrawal = Transaction::withdrawal(account, remaining)?;
            self.commit(number, &withdrawal)?;
        }

        self.store.remove_account(number)?;
        info!(account = %number, paid_out = %remaining, "Closed account");
        Ok(remaining)
    }

    // ------------------------------------------------------------------
    // Money movement
    // ------------------------------------------------------------------

    pub fn deposit(
        &mut self,
        number: AccountNumber,
        password: &str,
        amount: Money,
    ) -> BankResult<Outcome> {
        let account = self.account(number, password)?;
        let deposit = Transaction::deposit(account, amount)?;
        self.commit(number, &deposit)
    }

    pub fn withdraw(
        &mut self,
        number: AccountNumber,
        password: &str,
        amount: Money,
    ) -> BankResult<Outcome> {
        let account = self.account(number, password)?;
        let withdrawal = Transaction::withdrawal(account, amount)?;
        self.commit(number, &withdrawal)
    }

    /// Move money between two accounts; only the source password is checked
    pub fn transfer(
        &mut self,
        from: AccountNumber,
        password: &str,
        to: AccountNumber,
        amount: Money,
    ) -> BankResult<Outcome> {
        let source = self.account(from, password)?;
        let target = self.store.get_account(to)?;
        let transfer = Transaction::transfer(source, target, amount)?;
        self.commit(from, &transfer)
    }

    /// Execute, journal and persist one transaction
    fn commit(&mut self, primary: AccountNumber, transaction: &Transaction) -> BankResult<Outcome> {
        if !transaction.execute(&mut *self.store) {
            let balance = self.store.get_account(primary)?.balance();
            info!(
                account = %primary,
                kind = %transaction.transaction_type(),
                amount = %transaction.amount(),
                "Declined: insufficient funds"
            );
            return Ok(Outcome::InsufficientFunds { balance });
        }

        let journaled = match self.store.add_transaction(primary, transaction) {
            Ok(true) => Ok(()),
            Ok(false) => Err(BankError::account_not_found(primary.to_string())),
            Err(e) => Err(e),
        };
        if let Err(e) = journaled {
            if !transaction.undo(&mut *self.store) {
                error!(
                    account = %primary,
                    description = %transaction.description(),
                    "Failed to reverse unjournaled transaction"
                );
            }
            return Err(e);
        }

        if let Err(e) = self.store.save_accounts() {
            error!(account = %primary, error = %e, "Journaled transaction but failed to save balances");
            return Err(e);
        }

        let balance = self.store.get_account(primary)?.balance();
        info!(
            account = %primary,
            description = %transaction.description(),
            balance = %balance,
            "Transaction completed"
        );
        Ok(Outcome::Completed { balance })
    }

    // ------------------------------------------------------------------
    // Reporting and month end
    // ------------------------------------------------------------------

    pub fn statement(&self, number: AccountNumber, password: &str) -> BankResult<Statement> {
        let account = self.account(number, password)?;
        let records = self.store.statement(number)?;
        Ok(Statement::build(account, &records))
    }

    pub fn audit_history(&self, number: AccountNumber, password: &str) -> BankResult<Vec<AuditEntry>> {
        self.authorize(number, password)?;
        self.store.audit_history(number)
    }

    pub fn apply_monthly_updates(&mut self) -> BankResult<Vec<(AccountNumber, MonthlyUpdate)>> {
        self.store.apply_monthly_updates()
    }

    fn authorize(&self, number: AccountNumber, password: &str) -> BankResult<()> {
        self.store.get_account(number)?;
        if self.store.verify_password(number, password) {
            Ok(())
        } else {
            Err(BankError::Auth(format!(
                "Incorrect password for account {}",
                number
            )))
        }
    }
}
