//! # Ether Amount
//!
//! Exact conversion between wei (the chain's base unit) and decimal ether
//! (the display unit).
//!
//! Amounts are held as a 256-bit wei value. Parsing a display string never
//! rounds: an input with more than 18 fractional digits is rejected instead.
//! Formatting trims trailing zeros but always keeps one fractional digit, so
//! `1 ether` renders as `"1.0"` and `1.5 ether` as `"1.5"`.
//!
//! # Examples
//!
//! ```
//! use nft_market_client::domain::value_objects::EtherAmount;
//!
//! let price = EtherAmount::parse("1.5").unwrap();
//! assert_eq!(price.wei().to_string(), "1500000000000000000");
//! assert_eq!(price.to_display(), "1.5");
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use ethers::types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of fractional digits between wei and ether.
pub const ETHER_DECIMALS: u32 = 18;

/// A non-negative amount of ether, stored exactly in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EtherAmount(U256);

impl EtherAmount {
    /// Zero ether.
    #[must_use]
    pub fn zero() -> Self {
        Self(U256::zero())
    }

    /// Creates an amount from a raw wei value.
    #[inline]
    #[must_use]
    pub const fn from_wei(wei: U256) -> Self {
        Self(wei)
    }

    /// Returns the amount in wei.
    #[inline]
    #[must_use]
    pub const fn wei(&self) -> U256 {
        self.0
    }

    /// Returns true if the amount is zero.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Parses a decimal ether string such as `"1"`, `"0.25"` or `".5"`.
    ///
    /// Surrounding whitespace is ignored. Signs, exponents and separators
    /// are not accepted.
    ///
    /// # Errors
    ///
    /// - [`DomainError::InvalidAmount`] if the input is not a plain decimal
    /// - [`DomainError::TooManyDecimals`] if it has more than 18 fractional digits
    /// - [`DomainError::AmountOverflow`] if the wei value exceeds 256 bits
    pub fn parse(input: &str) -> DomainResult<Self> {
        let trimmed = input.trim();
        let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction)
        {
            return Err(DomainError::invalid_amount(input));
        }

        let padding = (ETHER_DECIMALS as usize)
            .checked_sub(fraction.len())
            .ok_or(DomainError::TooManyDecimals {
                max: ETHER_DECIMALS,
            })?;

        let ten = U256::from(10u8);
        let wei = whole
            .bytes()
            .chain(fraction.bytes())
            .chain(std::iter::repeat_n(b'0', padding))
            .try_fold(U256::zero(), |acc, digit| {
                acc.checked_mul(ten)?
                    .checked_add(U256::from(digit - b'0'))
            })
            .ok_or(DomainError::AmountOverflow)?;

        Ok(Self(wei))
    }

    /// Formats the amount as decimal ether.
    #[must_use]
    pub fn to_display(&self) -> String {
        let digits = self.0.to_string();
        let decimals = ETHER_DECIMALS as usize;

        let (whole, fraction) = if digits.len() > decimals {
            let (whole, fraction) = digits.split_at(digits.len() - decimals);
            (whole.to_string(), fraction.to_string())
        } else {
            ("0".to_string(), format!("{digits:0>decimals$}"))
        };

        let fraction = fraction.trim_end_matches('0');
        if fraction.is_empty() {
            format!("{whole}.0")
        } else {
            format!("{whole}.{fraction}")
        }
    }
}

impl fmt::Display for EtherAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display())
    }
}

impl FromStr for EtherAmount {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EtherAmount {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EtherAmount> for String {
    fn from(amount: EtherAmount) -> Self {
        amount.to_display()
    }
}

impl From<U256> for EtherAmount {
    fn from(wei: U256) -> Self {
        Self::from_wei(wei)
    }
}
