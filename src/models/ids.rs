//! Strongly-typed ID wrappers
//!
//! Customer ids and account numbers are both small integers handed out by
//! the store's counters. Newtypes keep them from being mixed up.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Macro to generate integer ID newtype wrappers
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            pub const fn value(&self) -> u32 {
                self.0
            }

            /// The id that follows this one
            pub const fn next(&self) -> Self {
                Self(self.0 + 1)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }
    };
}

define_id!(CustomerId);
define_id!(AccountNumber);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let id: CustomerId = "1000".parse().unwrap();
        assert_eq!(id, CustomerId::new(1000));
        assert_eq!(id.to_string(), "1000");

        let number: AccountNumber = " 10001 ".parse().unwrap();
        assert_eq!(number.value(), 10001);
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!("abc".parse::<AccountNumber>().is_err());
        assert!("-1".parse::<CustomerId>().is_err());
    }

    #[test]
    fn test_next() {
        assert_eq!(AccountNumber::new(10000).next(), AccountNumber::new(10001));
    }
}
