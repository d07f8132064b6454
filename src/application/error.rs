//! # Application Errors
//!
//! Error types for marketplace operations.
//!
//! # Error Hierarchy
//!
//! ```text
//! MarketError
//! ├── NoWallet                    - no wallet in the environment (user notice)
//! ├── NotConnected                - operation needs a connected account
//! ├── Connection(ChainError)      - wallet or endpoint refused the connection
//! ├── Fetch(ChainError)           - listing read failed, no partial result
//! ├── Transaction(ChainError)     - submission, revert or wallet rejection
//! ├── Validation(String)          - user input could not be used
//! ├── Domain(DomainError)         - value conversion failure
//! └── Configuration(ConfigError)  - bad configuration
//! ```
//!
//! # Examples
//!
//! ```
//! use nft_market_client::application::error::MarketError;
//!
//! let err = MarketError::NoWallet;
//! assert!(err.is_user_notice());
//! assert_eq!(err.to_string(), "no wallet available");
//! ```

use crate::config::ConfigError;
use crate::domain::errors::DomainError;
use crate::infrastructure::blockchain::ChainError;
use thiserror::Error;

/// Error type for marketplace operations.
#[derive(Debug, Error)]
pub enum MarketError {
    /// No wallet provider is present.
    #[error("no wallet available")]
    NoWallet,

    /// The operation needs a connected account.
    #[error("wallet not connected")]
    NotConnected,

    /// The wallet or endpoint refused the connection.
    #[error("connection failed: {0}")]
    Connection(#[source] ChainError),

    /// Reading listings failed.
    #[error("failed to fetch listings: {0}")]
    Fetch(#[source] ChainError),

    /// A transaction was rejected, reverted or could not be confirmed.
    #[error("transaction failed: {0}")]
    Transaction(#[source] ChainError),

    /// User input could not be turned into a contract call.
    #[error("validation error: {0}")]
    Validation(String),

    /// Domain value conversion failed.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Configuration is unusable.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

impl MarketError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Returns true if the error is meant to be shown to the user as a notice.
    ///
    /// Only the missing-wallet case is; every other failure goes to the log
    /// and the caller.
    #[must_use]
    pub fn is_user_notice(&self) -> bool {
        matches!(self, Self::NoWallet)
    }
}

/// Result type for marketplace operations.
pub type MarketResult<T> = Result<T, MarketError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_missing_wallet_is_a_notice() {
        assert!(MarketError::NoWallet.is_user_notice());
        assert!(!MarketError::NotConnected.is_user_notice());
        assert!(!MarketError::Fetch(ChainError::call("boom")).is_user_notice());
        assert!(!MarketError::Transaction(ChainError::reverted("boom")).is_user_notice());
    }

    #[test]
    fn error_display() {
        let err = MarketError::Transaction(ChainError::reverted("incorrect payment"));
        assert_eq!(
            err.to_string(),
            "transaction failed: transaction reverted: incorrect payment"
        );

        let err = MarketError::Fetch(ChainError::call("timeout"));
        assert_eq!(err.to_string(), "failed to fetch listings: call error: timeout");
    }

    #[test]
    fn domain_error_converts() {
        let err: MarketError = DomainError::AmountOverflow.into();
        assert!(matches!(err, MarketError::Domain(DomainError::AmountOverflow)));
    }
}
