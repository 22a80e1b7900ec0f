//! Line codecs for the customer, account and counter files
//!
//! ```text
//! customers.txt   id:name:phone
//! accounts.txt    accountNumber:ownerCustomerId:balance:accountTypeCode
//! counters.txt    nextCustomerId:nextAccountNumber
//! ```

use crate::error::{BankError, BankResult};
use crate::models::{Account, AccountNumber, AccountType, Customer, CustomerId, Money};

/// Reject values that would break the colon-delimited format
pub fn validate_field(label: &str, value: &str) -> BankResult<()> {
    if value.trim().is_empty() {
        return Err(BankError::Validation(format!("{} cannot be empty", label)));
    }
    if value.contains(':') || value.contains('\n') || value.contains('\r') {
        return Err(BankError::Validation(format!(
            "{} cannot contain ':' or line breaks",
            label
        )));
    }
    Ok(())
}

fn split_fields(line: &str, expected: usize, file: &str) -> BankResult<Vec<String>> {
    // Field contents are kept as written; passwords and names may carry
    // leading or trailing spaces
    let fields: Vec<String> = line
        .trim_end_matches(['\r', '\n'])
        .split(':')
        .map(str::to_string)
        .collect();
    if fields.len() != expected {
        return Err(BankError::Parse(format!(
            "Expected {} fields in {} record, found {}: {}",
            expected,
            file,
            fields.len(),
            line
        )));
    }
    Ok(fields)
}

fn parse_number<T: std::str::FromStr>(value: &str, what: &str) -> BankResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| BankError::Parse(format!("Invalid {}: '{}'", what, value)))
}

pub fn encode_customer(customer: &Customer) -> String {
    format!("{}:{}:{}", customer.id(), customer.name(), customer.phone())
}

pub fn decode_customer(line: &str) -> BankResult<Customer> {
    let fields = split_fields(line, 3, "customer")?;
    let id: CustomerId = parse_number(&fields[0], "customer id")?;
    Customer::new(id, fields[1].as_str(), fields[2].as_str())
        .map_err(|e| BankError::Parse(format!("Invalid customer record '{}': {}", line, e)))
}

/// Persisted fields of an account, before it is attached to its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountRecord {
    pub number: AccountNumber,
    pub owner: CustomerId,
    pub balance: Money,
    pub account_type: AccountType,
}

pub fn encode_account(account: &Account) -> String {
    format!(
        "{}:{}:{}:{}",
        account.number(),
        account.owner(),
        account.balance().to_record_string(),
        account.account_type().code()
    )
}

pub fn decode_account(line: &str) -> BankResult<AccountRecord> {
    let fields = split_fields(line, 4, "account")?;
    let number = parse_number(&fields[0], "account number")?;
    let owner = parse_number(&fields[1], "owner id")?;
    let balance = Money::parse(&fields[2])
        .map_err(|e| BankError::Parse(format!("Invalid balance: {}", e)))?;
    if balance.is_negative() {
        return Err(BankError::Parse(format!(
            "Negative balance in account record: {}",
            line
        )));
    }
    let code: u8 = parse_number(&fields[3], "account type")?;
    let account_type = AccountType::from_code(code)
        .ok_or_else(|| BankError::Parse(format!("Unknown account type code {}", code)))?;

    Ok(AccountRecord {
        number,
        owner,
        balance,
        account_type,
    })
}

/// The two durable id counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counters {
    pub next_customer_id: CustomerId,
    pub next_account_number: AccountNumber,
}

impl Counters {
    pub fn encode(&self) -> String {
        format!("{}:{}", self.next_customer_id, self.next_account_number)
    }

    pub fn decode(line: &str) -> BankResult<Self> {
        let fields = split_fields(line, 2, "counter")?;
        Ok(Self {
            next_customer_id: parse_number(&fields[0], "next customer id")?,
            next_account_number: parse_number(&fields[1], "next account number")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InterestRate;

    #[test]
    fn test_validate_field() {
        assert!(validate_field("Username", "alice").is_ok());
        assert!(validate_field("Username", "").is_err());
        assert!(validate_field("Password", "pa:ss").is_err());
        assert!(validate_field("Name", "two\nlines").is_err());
    }

    #[test]
    fn test_customer_line() {
        let customer = Customer::new(CustomerId::new(1000), "Alice", "555").unwrap();
        let line = encode_customer(&customer);
        assert_eq!(line, "1000:Alice:555");

        let decoded = decode_customer(&line).unwrap();
        assert_eq!(decoded.id(), CustomerId::new(1000));
        assert_eq!(decoded.name(), "Alice");
        assert_eq!(decoded.phone(), "555");
    }

    #[test]
    fn test_customer_line_keeps_surrounding_spaces() {
        let customer = Customer::new(CustomerId::new(1000), " Alice ", "555 ").unwrap();
        let decoded = decode_customer(&encode_customer(&customer)).unwrap();

        assert_eq!(decoded.name(), " Alice ");
        assert_eq!(decoded.phone(), "555 ");
    }

    #[test]
    fn test_customer_line_rejects_bad_records() {
        assert!(decode_customer("1000:Alice").is_err());
        assert!(decode_customer("abc:Alice:555").is_err());
        assert!(decode_customer("1000::555").is_err());
    }

    #[test]
    fn test_account_line() {
        let account = Account::savings(
            AccountNumber::new(10000),
            CustomerId::new(1000),
            Money::from_cents(10050),
            InterestRate::default(),
        )
        .unwrap();
        let line = encode_account(&account);
        assert_eq!(line, "10000:1000:100.50:0");

        let record = decode_account(&line).unwrap();
        assert_eq!(
            record,
            AccountRecord {
                number: AccountNumber::new(10000),
                owner: CustomerId::new(1000),
                balance: Money::from_cents(10050),
                account_type: AccountType::Savings,
            }
        );
    }

    #[test]
    fn test_account_line_rejects_bad_records() {
        assert!(decode_account("10000:1000:5.00:9").is_err());
        assert!(decode_account("10000:1000:-5.00:0").is_err());
        assert!(decode_account("10000:1000:5.00").is_err());
    }

    #[test]
    fn test_counters_line() {
        let counters = Counters {
            next_customer_id: CustomerId::new(1002),
            next_account_number: AccountNumber::new(10005),
        };
        assert_eq!(counters.encode(), "1002:10005");
        assert_eq!(Counters::decode("1002:10005").unwrap(), counters);
        assert!(Counters::decode("1002").is_err());
    }
}
