//! Storage layer for bankstore
//!
//! [`Store`] owns every customer (and through them every account), the
//! credential tables, the id counters and the journal. Each mutating
//! operation updates memory and rewrites the affected files before it
//! returns; if a write fails the in-memory change is rolled back so memory
//! never runs ahead of disk.
//!
//! Files live in the data directory:
//!
//! ```text
//! customers.txt     id:name:phone
//! accounts.txt      accountNumber:ownerCustomerId:balance:accountTypeCode
//! auth.txt          CUSTOMER:username:password:customerId | ACCOUNT:accountNumber:password
//! counters.txt      nextCustomerId:nextAccountNumber
//! transactions.txt  accountNumber:timestamp:typeCode:amount[:counterpart]
//! ```

pub mod credentials;
pub mod file_io;
pub mod journal;
pub mod records;

pub use credentials::Credentials;
pub use file_io::{append_lines, read_lines, write_lines_atomic};
pub use journal::Journal;
pub use records::{validate_field, AccountRecord, Counters};

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, error, info, warn};

use crate::audit::{AuditEntry, AuditLogger, AuditTrail};
use crate::config::paths::BankPaths;
use crate::config::settings::Settings;
use crate::error::{BankError, BankResult};
use crate::models::{
    Account, AccountLedger, AccountNumber, Customer, CustomerId, JournalRecord, Money,
    MonthlyUpdate, Transaction,
};

/// Everything the store holds in memory, swapped in as a unit on load
#[derive(Debug, Clone)]
struct State {
    customers: BTreeMap<CustomerId, Customer>,
    account_index: HashMap<AccountNumber, CustomerId>,
    credentials: Credentials,
    counters: Counters,
}

impl State {
    fn empty(settings: &Settings) -> Self {
        Self {
            customers: BTreeMap::new(),
            account_index: HashMap::new(),
            credentials: Credentials::new(),
            counters: Counters {
                next_customer_id: CustomerId::new(settings.first_customer_id),
                next_account_number: AccountNumber::new(settings.first_account_number),
            },
        }
    }
}

/// The authoritative repository of customers, accounts and credentials
pub struct Store {
    paths: BankPaths,
    settings: Settings,
    audit_logger: AuditLogger,
    journal: Journal,
    state: State,
}

impl Store {
    /// Open the store, loading whatever is on disk
    ///
    /// A failed load is logged and the store starts empty; only failing to
    /// create the data directory is an error.
    pub fn open(paths: BankPaths, settings: Settings) -> BankResult<Self> {
        paths.ensure_directories()?;

        let mut store = Self {
            audit_logger: AuditLogger::new(paths.audit_log()),
            journal: Journal::new(paths.journal_file()),
            state: State::empty(&settings),
            paths,
            settings,
        };

        if let Err(e) = store.load_all() {
            error!(error = %e, "Failed to load data files, starting with an empty store");
            store.state = State::empty(&store.settings);
        }

        Ok(store)
    }

    pub fn paths(&self) -> &BankPaths {
        &self.paths
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Flush everything and release the store
    pub fn close(self) -> BankResult<()> {
        self.save_all()?;
        debug!("Store closed");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Loading and saving
    // ------------------------------------------------------------------

    /// Reload all data files, in order customers, accounts, auth, counters
    ///
    /// Malformed lines are skipped with a warning. The new state replaces
    /// the current one only if every file could be read.
    pub fn load_all(&mut self) -> BankResult<()> {
        let mut state = State::empty(&self.settings);

        for line in read_lines(self.paths.customers_file())? {
            match records::decode_customer(&line) {
                Ok(customer) if state.customers.contains_key(&customer.id()) => {
                    warn!(customer = %customer.id(), "Skipping duplicate customer record");
                }
                Ok(customer) => {
                    state.customers.insert(customer.id(), customer);
                }
                Err(e) => warn!(error = %e, "Skipping malformed customer record"),
            }
        }

        for line in read_lines(self.paths.accounts_file())? {
            let record = match records::decode_account(&line) {
                Ok(record) => record,
                Err(e) => {
                    warn!(error = %e, "Skipping malformed account record");
                    continue;
                }
            };

            if state.account_index.contains_key(&record.number) {
                warn!(account = %record.number, "Skipping duplicate account record");
                continue;
            }

            let Some(owner) = state.customers.get_mut(&record.owner) else {
                warn!(
                    account = %record.number,
                    owner = %record.owner,
                    "Skipping account with unknown owner"
                );
                continue;
            };

            let account = match self.restore_account(record) {
                Ok(account) => account,
                Err(e) => {
                    warn!(account = %record.number, error = %e, "Skipping invalid account record");
                    continue;
                }
            };

            owner.add_account(account);
            state.account_index.insert(record.number, record.owner);
        }

        state.credentials = Credentials::from_lines(&read_lines(self.paths.auth_file())?);

        if let Some(line) = read_lines(self.paths.counters_file())?.first() {
            match Counters::decode(line) {
                Ok(counters) => state.counters = counters,
                Err(e) => warn!(error = %e, "Ignoring malformed counters file"),
            }
        }
        Self::advance_counters_past_existing(&mut state);

        info!(
            customers = state.customers.len(),
            accounts = state.account_index.len(),
            "Loaded store"
        );

        self.state = state;
        Ok(())
    }

    /// Counters never hand out an id that is already on disk, even if the
    /// counters file is stale or missing
    fn advance_counters_past_existing(state: &mut State) {
        if let Some(max_id) = state.customers.keys().next_back() {
            if state.counters.next_customer_id <= *max_id {
                warn!(next = %max_id.next(), "Customer counter behind existing ids, advancing");
                state.counters.next_customer_id = max_id.next();
            }
        }
        if let Some(max_number) = state.account_index.keys().max() {
            if state.counters.next_account_number <= *max_number {
                warn!(next = %max_number.next(), "Account counter behind existing numbers, advancing");
                state.counters.next_account_number = max_number.next();
            }
        }
    }

    fn restore_account(&self, record: AccountRecord) -> BankResult<Account> {
        Account::restore(
            record.number,
            record.owner,
            record.balance,
            record.account_type,
            self.settings.interest_rate(),
            self.settings.maintenance_fee(),
            AuditTrail::new(self.audit_logger.clone()),
        )
    }

    /// Rewrite customers, accounts, auth and counters from memory
    pub fn save_all(&self) -> BankResult<()> {
        self.save_customers()?;
        self.save_accounts()?;
        self.save_auth()?;
        self.save_counters()?;
        Ok(())
    }

    fn save_customers(&self) -> BankResult<()> {
        let lines: Vec<String> = self
            .state
            .customers
            .values()
            .map(records::encode_customer)
            .collect();
        write_lines_atomic(self.paths.customers_file(), &lines)
    }

    /// Rewrite `accounts.txt`; balances changed by transactions reach disk
    /// through this
    pub fn save_accounts(&self) -> BankResult<()> {
        let mut accounts: Vec<&Account> = self
            .state
            .customers
            .values()
            .flat_map(|c| c.accounts())
            .collect();
        accounts.sort_by_key(|a| a.number());

        let lines: Vec<String> = accounts.into_iter().map(records::encode_account).collect();
        write_lines_atomic(self.paths.accounts_file(), &lines)
    }

    fn save_auth(&self) -> BankResult<()> {
        write_lines_atomic(self.paths.auth_file(), &self.state.credentials.to_lines())
    }

    fn save_counters(&self) -> BankResult<()> {
        write_lines_atomic(self.paths.counters_file(), &[self.state.counters.encode()])
    }

    /// Put memory back to `snapshot` after a failed write and try to bring
    /// the files back in line with it
    fn restore(&mut self, snapshot: State) {
        self.state = snapshot;
        if let Err(e) = self.save_all() {
            error!(error = %e, "Failed to resync data files after rollback");
        }
    }

    // ------------------------------------------------------------------
    // Counters
    // ------------------------------------------------------------------

    /// Draw the next customer id; the counter is persisted before returning
    pub fn allocate_customer_id(&mut self) -> BankResult<CustomerId> {
        let id = self.state.counters.next_customer_id;
        self.state.counters.next_customer_id = id.next();

        if let Err(e) = self.save_counters() {
            self.state.counters.next_customer_id = id;
            return Err(e);
        }
        Ok(id)
    }

    /// Draw the next account number; the counter is persisted before returning
    pub fn allocate_account_number(&mut self) -> BankResult<AccountNumber> {
        let number = self.state.counters.next_account_number;
        self.state.counters.next_account_number = number.next();

        if let Err(e) = self.save_counters() {
            self.state.counters.next_account_number = number;
            return Err(e);
        }
        Ok(number)
    }

    pub fn counters(&self) -> Counters {
        self.state.counters
    }

    // ------------------------------------------------------------------
    // Customers
    // ------------------------------------------------------------------

    /// Register a customer under a new username
    ///
    /// Returns `Ok(false)` if the username is already taken.
    pub fn add_customer(
        &mut self,
        customer: Customer,
        username: &str,
        password: &str,
    ) -> BankResult<bool> {
        validate_field("Username", username)?;
        validate_field("Password", password)?;
        validate_field("Name", customer.name())?;
        validate_field("Phone number", customer.phone())?;

        if self.state.credentials.username_exists(username) {
            debug!(username, "Username already taken");
            return Ok(false);
        }
        if self.state.customers.contains_key(&customer.id()) {
            return Err(BankError::Duplicate {
                entity_type: "Customer",
                identifier: customer.id().to_string(),
            });
        }

        let id = customer.id();
        let snapshot = self.state.clone();
        self.state.customers.insert(id, customer);
        self.state.credentials.bind_customer(username, id, password);

        if let Err(e) = self.save_customers().and_then(|_| self.save_auth()) {
            self.restore(snapshot);
            return Err(e);
        }

        info!(customer = %id, username, "Registered customer");
        Ok(true)
    }

    pub fn find_customer(&self, id: CustomerId) -> Option<&Customer> {
        self.state.customers.get(&id)
    }

    pub fn customers(&self) -> impl Iterator<Item = &Customer> {
        self.state.customers.values()
    }

    pub fn customer_count(&self) -> usize {
        self.state.customers.len()
    }

    pub fn customer_id_by_username(&self, username: &str) -> Option<CustomerId> {
        self.state.credentials.customer_id(username)
    }

    pub fn username_exists(&self, username: &str) -> bool {
        self.state.credentials.username_exists(username)
    }

    pub fn username_for(&self, id: CustomerId) -> Option<&str> {
        self.state.credentials.username_for(id)
    }

    /// Replace a customer's name and phone
    pub fn update_customer_profile(
        &mut self,
        id: CustomerId,
        name: &str,
        phone: &str,
    ) -> BankResult<()> {
        validate_field("Name", name)?;
        validate_field("Phone number", phone)?;

        let snapshot = self.state.clone();
        let customer = self
            .state
            .customers
            .get_mut(&id)
            .ok_or_else(|| BankError::customer_not_found(id.to_string()))?;
        customer.update_profile(name, phone)?;

        if let Err(e) = self.save_customers() {
            self.restore(snapshot);
            return Err(e);
        }

        info!(customer = %id, "Updated customer profile");
        Ok(())
    }

    /// Remove a customer, every account it owns and its credentials
    ///
    /// Returns `Ok(false)` if no such customer exists.
    ///
    /// The removal is all or nothing: record files are written first and the
    /// journal is purged last, and any failure restores the prior state.
    pub fn remove_customer(&mut self, id: CustomerId) -> BankResult<bool> {
        let Some(customer) = self.state.customers.get(&id) else {
            return Ok(false);
        };
        let numbers = customer.account_numbers();

        let snapshot = self.state.clone();
        for &number in &numbers {
            self.detach_account(number);
        }
        self.state.customers.remove(&id);
        self.state.credentials.remove_customer(id);

        let persisted = self
            .save_customers()
            .and_then(|_| self.save_accounts())
            .and_then(|_| self.save_auth())
            .and_then(|_| self.journal.purge(&numbers).map(|_| ()));

        if let Err(e) = persisted {
            self.restore(snapshot);
            return Err(e);
        }

        info!(customer = %id, accounts = numbers.len(), "Removed customer");
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Accounts
    // ------------------------------------------------------------------

    fn require_customer(&self, id: CustomerId) -> BankResult<()> {
        if self.state.customers.contains_key(&id) {
            Ok(())
        } else {
            Err(BankError::customer_not_found(id.to_string()))
        }
    }

    fn require_non_negative(initial: Money) -> BankResult<()> {
        if initial.is_negative() {
            return Err(BankError::Validation(
                "Initial balance cannot be negative".into(),
            ));
        }
        Ok(())
    }

    /// Build (but do not register) a savings account with a fresh number
    pub fn create_savings_account(
        &mut self,
        customer_id: CustomerId,
        initial: Money,
    ) -> BankResult<Account> {
        self.require_customer(customer_id)?;
        Self::require_non_negative(initial)?;
        let number = self.allocate_account_number()?;
        Account::savings(number, customer_id, initial, self.settings.interest_rate())
    }

    /// Build (but do not register) a current account with a fresh number
    pub fn create_current_account(
        &mut self,
        customer_id: CustomerId,
        initial: Money,
    ) -> BankResult<Account> {
        self.require_customer(customer_id)?;
        Self::require_non_negative(initial)?;
        let number = self.allocate_account_number()?;
        Account::current(number, customer_id, initial, self.settings.maintenance_fee())
    }

    /// Build (but do not register) an audited savings account with a fresh
    /// number; its creation is the first entry in the audit log
    pub fn create_auditable_savings_account(
        &mut self,
        customer_id: CustomerId,
        initial: Money,
    ) -> BankResult<Account> {
        self.require_customer(customer_id)?;
        Self::require_non_negative(initial)?;
        let number = self.allocate_account_number()?;
        Account::auditable_savings(
            number,
            customer_id,
            initial,
            self.settings.interest_rate(),
            AuditTrail::new(self.audit_logger.clone()),
        )
    }

    /// Register an account with its owner and set its password
    pub fn add_account(&mut self, account: Account, password: &str) -> BankResult<()> {
        validate_field("Account password", password)?;

        let number = account.number();
        let owner = account.owner();

        if self.state.account_index.contains_key(&number) {
            return Err(BankError::Duplicate {
                entity_type: "Account",
                identifier: number.to_string(),
            });
        }

        let snapshot = self.state.clone();
        let customer = self
            .state
            .customers
            .get_mut(&owner)
            .ok_or_else(|| BankError::customer_not_found(owner.to_string()))?;
        customer.add_account(account);
        self.state.account_index.insert(number, owner);
        self.state.credentials.set_account_password(number, password);

        if let Err(e) = self.save_accounts().and_then(|_| self.save_auth()) {
            self.restore(snapshot);
            return Err(e);
        }

        info!(account = %number, customer = %owner, "Added account");
        Ok(())
    }

    pub fn find_account(&self, number: AccountNumber) -> Option<&Account> {
        let owner = self.state.account_index.get(&number)?;
        self.state.customers.get(owner)?.find_account(number)
    }

    pub fn find_account_mut(&mut self, number: AccountNumber) -> Option<&mut Account> {
        let owner = *self.state.account_index.get(&number)?;
        self.state.customers.get_mut(&owner)?.find_account_mut(number)
    }

    /// Like [`Store::find_account`] but a missing account is an error
    pub fn get_account(&self, number: AccountNumber) -> BankResult<&Account> {
        self.find_account(number)
            .ok_or_else(|| BankError::account_not_found(number.to_string()))
    }

    pub fn account_count(&self) -> usize {
        self.state.account_index.len()
    }

    /// Remove an account, its password and every journal line it owns
    ///
    /// Returns `Ok(false)` if no such account exists.
    pub fn remove_account(&mut self, number: AccountNumber) -> BankResult<bool> {
        self.drop_account(number, true)
    }

    /// Remove an account and its password but leave the journal untouched
    ///
    /// Used to back out an account whose opening could not be journaled.
    pub fn unregister_account(&mut self, number: AccountNumber) -> BankResult<bool> {
        self.drop_account(number, false)
    }

    fn drop_account(&mut self, number: AccountNumber, purge_journal: bool) -> BankResult<bool> {
        if !self.state.account_index.contains_key(&number) {
            return Ok(false);
        }

        let snapshot = self.state.clone();
        let owner = self.detach_account(number);

        let mut persisted = self.save_accounts().and_then(|_| self.save_auth());
        if purge_journal {
            persisted = persisted.and_then(|_| self.journal.purge(&[number]).map(|_| ()));
        }

        if let Err(e) = persisted {
            self.restore(snapshot);
            return Err(e);
        }

        info!(account = %number, customer = ?owner, "Removed account");
        Ok(true)
    }

    /// Unlink an account from its owner, the index and the credentials
    fn detach_account(&mut self, number: AccountNumber) -> Option<CustomerId> {
        let owner = self.state.account_index.remove(&number)?;
        if let Some(customer) = self.state.customers.get_mut(&owner) {
            customer.remove_account(number);
        }
        self.state.credentials.remove_account(number);
        Some(owner)
    }

    // ------------------------------------------------------------------
    // Credentials
    // ------------------------------------------------------------------

    pub fn authenticate(&self, username: &str, password: &str) -> Option<CustomerId> {
        let result = self.state.credentials.authenticate(username, password);
        if result.is_none() {
            debug!(username, "Authentication failed");
        }
        result
    }

    pub fn verify_password(&self, number: AccountNumber, password: &str) -> bool {
        self.state.credentials.verify_account(number, password)
    }

    /// Change a customer's login password
    ///
    /// Returns `Ok(false)` if the customer has no username or `old` does not
    /// match. The auth file is written before memory is updated.
    pub fn change_password(
        &mut self,
        customer_id: CustomerId,
        old: &str,
        new: &str,
    ) -> BankResult<bool> {
        validate_field("Password", new)?;

        let Some(username) = self.state.credentials.username_for(customer_id) else {
            return Ok(false);
        };
        let username = username.to_string();

        if self.state.credentials.authenticate(&username, old) != Some(customer_id) {
            debug!(customer = %customer_id, "Old password did not match");
            return Ok(false);
        }

        let mut updated = self.state.credentials.clone();
        updated.set_customer_password(&username, new);
        write_lines_atomic(self.paths.auth_file(), &updated.to_lines())?;
        self.state.credentials = updated;

        info!(customer = %customer_id, "Changed password");
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Journal
    // ------------------------------------------------------------------

    /// Append an executed transaction to the journal
    ///
    /// Returns `Ok(false)` if `number` is not a known account.
    pub fn add_transaction(
        &mut self,
        number: AccountNumber,
        transaction: &Transaction,
    ) -> BankResult<bool> {
        if !self.state.account_index.contains_key(&number) {
            debug!(account = %number, "Not journaling transaction for unknown account");
            return Ok(false);
        }

        self.journal.append(&transaction.journal_records())?;
        debug!(account = %number, kind = %transaction.transaction_type(), "Journaled transaction");
        Ok(true)
    }

    /// Journal lines for one account, in the order they were written
    pub fn statement(&self, number: AccountNumber) -> BankResult<Vec<JournalRecord>> {
        self.get_account(number)?;
        self.journal.records_for(number)
    }

    /// Audit entries written by an auditable account, across sessions
    pub fn audit_history(&self, number: AccountNumber) -> BankResult<Vec<AuditEntry>> {
        let account = self.get_account(number)?;
        if !account.is_auditable() {
            return Ok(Vec::new());
        }
        self.audit_logger.read_for_account(number)
    }

    // ------------------------------------------------------------------
    // Month end
    // ------------------------------------------------------------------

    /// Credit interest and charge fees on every account, then persist
    /// balances
    pub fn apply_monthly_updates(&mut self) -> BankResult<Vec<(AccountNumber, MonthlyUpdate)>> {
        let snapshot = self.state.clone();
        let mut outcomes = Vec::with_capacity(self.state.account_index.len());

        for customer in self.state.customers.values_mut() {
            for account in customer.accounts_mut() {
                let outcome = account.apply_monthly_update();
                if let MonthlyUpdate::InsufficientFunds { fee, balance } = outcome {
                    warn!(
                        account = %account.number(),
                        fee = %fee,
                        balance = %balance,
                        "Maintenance fee not charged"
                    );
                }
                outcomes.push((account.number(), outcome));
            }
        }
        outcomes.sort_by_key(|(number, _)| *number);

        if let Err(e) = self.save_accounts() {
            self.restore(snapshot);
            return Err(e);
        }

        info!(accounts = outcomes.len(), "Applied monthly updates");
        Ok(outcomes)
    }
}

impl AccountLedger for Store {
    fn account_mut(&mut self, number: AccountNumber) -> Option<&mut Account> {
        self.find_account_mut(number)
    }
}
