//! # Domain Errors
//!
//! Error types for domain validation.
//!
//! These errors are raised when user-entered values cannot be turned into
//! domain values: a malformed ether amount, too many fractional digits, an
//! amount that does not fit in 256 bits, or a listing id of zero.

use thiserror::Error;

/// Domain layer error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The amount string is not a plain non-negative decimal number.
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    /// The amount has more fractional digits than the unit supports.
    #[error("too many decimals: at most {max} allowed")]
    TooManyDecimals {
        /// Maximum number of fractional digits.
        max: u32,
    },

    /// The amount does not fit in 256 bits once scaled to wei.
    #[error("amount overflows 256 bits")]
    AmountOverflow,

    /// Listing identifiers start at 1.
    #[error("invalid listing id: {0}")]
    InvalidListingId(u64),
}

impl DomainError {
    /// Creates an invalid amount error.
    #[must_use]
    pub fn invalid_amount(input: impl Into<String>) -> Self {
        Self::InvalidAmount(input.into())
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
