use std::fs;
use std::path::Path;

use tempfile::TempDir;

use bankstore::config::{BankPaths, Settings};
use bankstore::models::{
    Account, AccountNumber, AccountType, Customer, CustomerId, Money, MonthlyUpdate, Transaction,
    TransactionType,
};
use bankstore::services::{BankingService, Outcome};
use bankstore::storage::Store;

fn paths(dir: &Path) -> BankPaths {
    BankPaths::with_base_dir(dir.to_path_buf())
}

fn open(dir: &Path) -> Store {
    Store::open(paths(dir), Settings::default()).expect("Failed to open store")
}

fn journal_lines(dir: &Path) -> Vec<String> {
    let path = paths(dir).journal_file();
    if !path.exists() {
        return Vec::new();
    }
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn register(store: &mut Store, name: &str, username: &str) -> CustomerId {
    let id = store.allocate_customer_id().unwrap();
    let customer = Customer::new(id, name, "555").unwrap();
    assert!(store.add_customer(customer, username, "pw").unwrap());
    id
}

fn add_savings(store: &mut Store, owner: CustomerId, cents: i64) -> AccountNumber {
    let account = store
        .create_savings_account(owner, Money::from_cents(cents))
        .unwrap();
    let number = account.number();
    store.add_account(account, "apw").unwrap();
    number
}

fn run(store: &mut Store, number: AccountNumber, transaction: &Transaction) -> bool {
    if !transaction.execute(store) {
        return false;
    }
    assert!(store.add_transaction(number, transaction).unwrap());
    store.save_accounts().unwrap();
    true
}

#[test]
fn test_scenario_a_deposit_is_journaled() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = open(temp_dir.path());
    let alice = register(&mut store, "Alice", "alice");
    let number = add_savings(&mut store, alice, 0);

    let deposit = Transaction::deposit(store.get_account(number).unwrap(), Money::from_cents(10000)).unwrap();
    assert!(run(&mut store, number, &deposit));

    assert_eq!(store.get_account(number).unwrap().balance(), Money::from_cents(10000));

    let lines = journal_lines(temp_dir.path());
    assert_eq!(lines.len(), 1);
    let fields: Vec<&str> = lines[0].split(':').collect();
    assert_eq!(fields[0], number.to_string());
    assert_eq!(fields[2], "0");
    assert_eq!(fields[3], "100.00");
}

#[test]
fn test_scenario_b_overdraw_changes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = open(temp_dir.path());
    let alice = register(&mut store, "Alice", "alice");
    let number = add_savings(&mut store, alice, 5000);

    let withdrawal =
        Transaction::withdrawal(store.get_account(number).unwrap(), Money::from_cents(10000)).unwrap();
    assert!(!run(&mut store, number, &withdrawal));

    assert_eq!(store.get_account(number).unwrap().balance(), Money::from_cents(5000));
    assert!(journal_lines(temp_dir.path()).is_empty());
}

#[test]
fn test_scenario_c_transfer_writes_two_legs() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = open(temp_dir.path());
    let alice = register(&mut store, "Alice", "alice");
    let x = add_savings(&mut store, alice, 10000);
    let y = add_savings(&mut store, alice, 2000);

    let transfer = Transaction::transfer(
        store.get_account(x).unwrap(),
        store.get_account(y).unwrap(),
        Money::from_cents(3000),
    )
    .unwrap();
    assert!(run(&mut store, x, &transfer));

    assert_eq!(store.get_account(x).unwrap().balance(), Money::from_cents(7000));
    assert_eq!(store.get_account(y).unwrap().balance(), Money::from_cents(5000));

    let lines = journal_lines(temp_dir.path());
    assert_eq!(lines.len(), 2);

    let x_leg: Vec<&str> = lines[0].split(':').collect();
    assert_eq!(x_leg[0], x.to_string());
    assert_eq!(x_leg[2], "2");
    assert_eq!(x_leg[3], "-30.00");
    assert_eq!(x_leg[4], y.to_string());

    let y_leg: Vec<&str> = lines[1].split(':').collect();
    assert_eq!(y_leg[0], y.to_string());
    assert_eq!(y_leg[3], "30.00");
    assert_eq!(y_leg[4], x.to_string());
}

#[test]
fn test_transfer_conserves_total() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = open(temp_dir.path());
    let alice = register(&mut store, "Alice", "alice");
    let x = add_savings(&mut store, alice, 1234);
    let y = add_savings(&mut store, alice, 999);

    for cents in [100, 1000, 5000, 34] {
        let before = store.get_account(x).unwrap().balance() + store.get_account(y).unwrap().balance();
        let transfer = Transaction::transfer(
            store.get_account(x).unwrap(),
            store.get_account(y).unwrap(),
            Money::from_cents(cents),
        )
        .unwrap();
        run(&mut store, x, &transfer);
        let after = store.get_account(x).unwrap().balance() + store.get_account(y).unwrap().balance();

        assert_eq!(before, after);
        assert!(!store.get_account(x).unwrap().balance().is_negative());
    }
}

#[test]
fn test_scenario_d_fee_not_partially_charged() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = open(temp_dir.path());
    let alice = register(&mut store, "Alice", "alice");

    let account = store
        .create_current_account(alice, Money::from_cents(500))
        .unwrap();
    let number = account.number();
    store.add_account(account, "apw").unwrap();

    let outcomes = store.apply_monthly_updates().unwrap();
    assert_eq!(
        outcomes,
        vec![(
            number,
            MonthlyUpdate::InsufficientFunds {
                fee: Money::from_cents(1000),
                balance: Money::from_cents(500),
            }
        )]
    );
    assert_eq!(store.get_account(number).unwrap().balance(), Money::from_cents(500));
}

#[test]
fn test_scenario_e_duplicate_username() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = open(temp_dir.path());
    let alice = register(&mut store, "Alice", "alice");

    let id = store.allocate_customer_id().unwrap();
    let impostor = Customer::new(id, "Mallory", "666").unwrap();
    assert!(!store.add_customer(impostor, "alice", "other").unwrap());

    assert_eq!(store.authenticate("alice", "pw"), Some(alice));
    assert_eq!(store.authenticate("alice", "other"), None);
    assert_eq!(store.find_customer(alice).unwrap().name(), "Alice");
    assert!(store.find_customer(id).is_none());
}

#[test]
fn test_scenario_f_close_purges_journal() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = open(temp_dir.path());
    let alice = register(&mut store, "Alice", "alice");
    let number = add_savings(&mut store, alice, 0);
    let other = add_savings(&mut store, alice, 0);

    for (account, cents) in [(number, 4000), (other, 100)] {
        let deposit = Transaction::deposit(store.get_account(account).unwrap(), Money::from_cents(cents)).unwrap();
        assert!(run(&mut store, account, &deposit));
    }

    // pay out the remaining balance, as closing does
    let payout = Transaction::withdrawal(store.get_account(number).unwrap(), Money::from_cents(4000)).unwrap();
    assert!(run(&mut store, number, &payout));

    let lines = journal_lines(temp_dir.path());
    let last_for_account: Vec<&String> = lines
        .iter()
        .filter(|l| l.starts_with(&format!("{}:", number)))
        .collect();
    assert_eq!(last_for_account.len(), 2);
    assert!(last_for_account[1].ends_with(":1:40.00"));

    assert!(store.remove_account(number).unwrap());

    assert!(store.get_account(number).is_err());
    assert!(store.find_customer(alice).unwrap().find_account(number).is_none());
    let lines = journal_lines(temp_dir.path());
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with(&format!("{}:", other)));
}

#[test]
fn test_close_account_through_service() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = open(temp_dir.path());
    let mut bank = BankingService::new(&mut store);

    let alice = bank.register_customer("Alice", "555", "alice", "pw").unwrap();
    let number = bank
        .open_account(alice, AccountType::Current, Money::from_cents(4000), "apw")
        .unwrap();

    assert_eq!(bank.close_account(alice, number, "apw").unwrap(), Money::from_cents(4000));
    assert!(journal_lines(temp_dir.path()).is_empty());
}

#[test]
fn test_remove_unknown_account_is_noop() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = open(temp_dir.path());
    let alice = register(&mut store, "Alice", "alice");
    let number = add_savings(&mut store, alice, 100);

    let accounts_before = fs::read_to_string(paths(temp_dir.path()).accounts_file()).unwrap();

    assert!(!store.remove_account(AccountNumber::new(99999)).unwrap());

    assert_eq!(store.account_count(), 1);
    assert!(store.verify_password(number, "apw"));
    assert_eq!(
        fs::read_to_string(paths(temp_dir.path()).accounts_file()).unwrap(),
        accounts_before
    );
}

#[test]
fn test_reload_reproduces_state() {
    let temp_dir = TempDir::new().unwrap();
    let (alice, savings, current, audited) = {
        let mut store = open(temp_dir.path());
        let mut bank = BankingService::new(&mut store);
        let alice = bank.register_customer("Alice", "555-0100", "alice", "pw").unwrap();
        let savings = bank
            .open_account(alice, AccountType::Savings, Money::from_cents(12345), "s")
            .unwrap();
        let current = bank
            .open_account(alice, AccountType::Current, Money::from_cents(500), "c")
            .unwrap();
        let audited = bank
            .open_account(alice, AccountType::AuditableSavings, Money::from_cents(100), "a")
            .unwrap();
        store.close().unwrap();
        (alice, savings, current, audited)
    };

    let store = open(temp_dir.path());

    let customer = store.find_customer(alice).unwrap();
    assert_eq!(customer.name(), "Alice");
    assert_eq!(customer.phone(), "555-0100");
    assert_eq!(customer.accounts().len(), 3);

    let expect = |number: AccountNumber, kind: AccountType, cents: i64, password: &str| {
        let account: &Account = store.get_account(number).unwrap();
        assert_eq!(account.account_type(), kind);
        assert_eq!(account.balance(), Money::from_cents(cents));
        assert_eq!(account.owner(), alice);
        assert!(store.verify_password(number, password));
    };
    expect(savings, AccountType::Savings, 12345, "s");
    expect(current, AccountType::Current, 500, "c");
    expect(audited, AccountType::AuditableSavings, 100, "a");

    assert_eq!(store.authenticate("alice", "pw"), Some(alice));
    assert_eq!(store.customer_id_by_username("alice"), Some(alice));
}

#[test]
fn test_counters_survive_restart() {
    let temp_dir = TempDir::new().unwrap();
    {
        let mut store = open(temp_dir.path());
        let alice = register(&mut store, "Alice", "alice");
        add_savings(&mut store, alice, 0);
        // drawn but never used
        store.allocate_account_number().unwrap();
        // no close(): the counter must already be on disk
    }

    let mut store = open(temp_dir.path());
    assert_eq!(store.allocate_customer_id().unwrap(), CustomerId::new(1001));
    assert_eq!(store.allocate_account_number().unwrap(), AccountNumber::new(10002));
}

#[test]
fn test_remove_customer_cascades() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = open(temp_dir.path());
    let alice = register(&mut store, "Alice", "alice");
    let bob = register(&mut store, "Bob", "bob");
    let a1 = add_savings(&mut store, alice, 100);
    let a2 = add_savings(&mut store, alice, 200);
    let b1 = add_savings(&mut store, bob, 300);

    assert!(store.remove_customer(alice).unwrap());
    assert!(!store.remove_customer(alice).unwrap());

    assert!(store.get_account(a1).is_err());
    assert!(store.get_account(a2).is_err());
    assert!(!store.username_exists("alice"));
    assert!(store.get_account(b1).is_ok());

    drop(store);
    let store = open(temp_dir.path());
    assert_eq!(store.customer_count(), 1);
    assert_eq!(store.account_count(), 1);
}

#[test]
fn test_corrupt_files_start_gracefully() {
    let temp_dir = TempDir::new().unwrap();
    let data = paths(temp_dir.path()).data_dir();
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("customers.txt"), "1000:Alice:555\n1001\n").unwrap();
    fs::write(data.join("accounts.txt"), "10000:1000:abc:0\n10001:1000:1.00:1\n").unwrap();
    fs::write(data.join("auth.txt"), "CUSTOMER:alice:pw:1000\nNONSENSE\n").unwrap();
    fs::write(data.join("counters.txt"), "garbage\n").unwrap();

    let store = open(temp_dir.path());

    assert_eq!(store.customer_count(), 1);
    assert_eq!(store.account_count(), 1);
    assert_eq!(
        store.get_account(AccountNumber::new(10001)).unwrap().account_type(),
        AccountType::Current
    );
    assert_eq!(store.authenticate("alice", "pw"), Some(CustomerId::new(1000)));
}

#[test]
fn test_statement_replays_journal() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = open(temp_dir.path());
    let mut bank = BankingService::new(&mut store);

    let alice = bank.register_customer("Alice", "555", "alice", "pw").unwrap();
    let x = bank
        .open_account(alice, AccountType::Savings, Money::from_cents(10000), "x")
        .unwrap();
    let y = bank
        .open_account(alice, AccountType::Savings, Money::zero(), "y")
        .unwrap();

    assert!(bank.transfer(x, "x", y, Money::from_cents(3000)).unwrap().is_completed());
    assert_eq!(
        bank.withdraw(x, "x", Money::from_cents(99999)).unwrap(),
        Outcome::InsufficientFunds { balance: Money::from_cents(7000) }
    );

    let statement = bank.statement(x, "x").unwrap();
    let kinds: Vec<TransactionType> = statement.lines.iter().map(|l| l.transaction_type).collect();
    assert_eq!(kinds, vec![TransactionType::Deposit, TransactionType::Transfer]);
    assert_eq!(statement.lines[1].counterpart, Some(y));
    assert_eq!(statement.closing_balance, Money::from_cents(7000));

    let statement = bank.statement(y, "y").unwrap();
    assert_eq!(statement.lines.len(), 1);
    assert_eq!(statement.lines[0].amount, Money::from_cents(3000));
}
