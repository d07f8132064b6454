//! # Configuration
//!
//! Contract addresses, network and RPC settings for the marketplace client.
//!
//! Values are layered by [`MarketConfig::load`]:
//!
//! 1. built-in defaults (the Sepolia deployment)
//! 2. an optional TOML file
//! 3. `MARKET_*` environment variables (for example `MARKET_RPC_URL`)
//!
//! The result is validated before it is returned.
//!
//! # Examples
//!
//! ```
//! use nft_market_client::config::MarketConfig;
//! use nft_market_client::infrastructure::blockchain::Network;
//!
//! let config = MarketConfig::default()
//!     .with_rpc_url("http://localhost:8545")
//!     .with_confirmations(2);
//! assert_eq!(config.network(), Network::Sepolia);
//! assert!(config.validate().is_ok());
//! ```

use crate::infrastructure::blockchain::Network;
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default marketplace contract on Sepolia.
pub const DEFAULT_MARKETPLACE_ADDRESS: &str = "0xcb9c9eba0bf4b283989db324b0846bf506f70250";

/// Default NFT contract on Sepolia.
pub const DEFAULT_NFT_ADDRESS: &str = "0xc52bAf20d56c50372e42D192E27272CC44B3b554";

/// Default public Sepolia RPC endpoint.
pub const DEFAULT_RPC_URL: &str = "https://ethereum-sepolia-rpc.publicnode.com";

/// Default environment variable holding the wallet's private key.
pub const DEFAULT_WALLET_KEY_ENV: &str = "MARKET_PRIVATE_KEY";

/// Default number of confirmations to wait for.
const DEFAULT_CONFIRMATIONS: usize = 1;

/// Environment variable prefix for overrides.
const ENV_PREFIX: &str = "MARKET";

/// Error type for configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Sources could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(String),

    /// A field holds an unusable value.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Field name.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl ConfigError {
    /// Creates an invalid field error.
    #[must_use]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        Self::Load(err.to_string())
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Marketplace client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Network the contracts are deployed on.
    network: Network,
    /// JSON-RPC endpoint.
    rpc_url: String,
    /// Marketplace contract.
    marketplace_address: Address,
    /// NFT contract the approval action targets.
    nft_address: Address,
    /// Confirmations to wait for after each transaction.
    confirmations: usize,
    /// Environment variable holding the wallet key.
    wallet_key_env: String,
}

impl MarketConfig {
    /// Loads configuration from defaults, an optional file and the environment.
    ///
    /// # Arguments
    ///
    /// * `path` - Optional TOML file; a missing file is an error only when given
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if a source cannot be parsed and
    /// [`ConfigError::Invalid`] if the merged values fail validation.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut builder = config::Config::builder()
            .set_default("network", Network::default().name())?
            .set_default("rpc_url", DEFAULT_RPC_URL)?
            .set_default("marketplace_address", DEFAULT_MARKETPLACE_ADDRESS)?
            .set_default("nft_address", DEFAULT_NFT_ADDRESS)?
            .set_default("confirmations", DEFAULT_CONFIRMATIONS as u64)?
            .set_default("wallet_key_env", DEFAULT_WALLET_KEY_ENV)?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;

        tracing::debug!(
            network = %config.network,
            rpc_url = %config.rpc_url,
            marketplace = ?config.marketplace_address,
            nft = ?config.nft_address,
            "configuration loaded"
        );

        Ok(config)
    }

    /// Checks that every field is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> ConfigResult<()> {
        let url = self.rpc_url.trim();
        if url.is_empty() {
            return Err(ConfigError::invalid("rpc_url", "must not be empty"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "rpc_url",
                format!("{url} is not an http(s) URL"),
            ));
        }
        if self.marketplace_address.is_zero() {
            return Err(ConfigError::invalid(
                "marketplace_address",
                "must not be the zero address",
            ));
        }
        if self.nft_address.is_zero() {
            return Err(ConfigError::invalid(
                "nft_address",
                "must not be the zero address",
            ));
        }
        if self.confirmations == 0 {
            return Err(ConfigError::invalid("confirmations", "must be at least 1"));
        }
        if self.wallet_key_env.trim().is_empty() {
            return Err(ConfigError::invalid("wallet_key_env", "must not be empty"));
        }
        Ok(())
    }

    /// Sets the network.
    #[must_use]
    pub fn with_network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    /// Sets the RPC endpoint.
    #[must_use]
    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }

    /// Sets the marketplace contract.
    #[must_use]
    pub fn with_marketplace_address(mut self, address: Address) -> Self {
        self.marketplace_address = address;
        self
    }

    /// Sets the NFT contract.
    #[must_use]
    pub fn with_nft_address(mut self, address: Address) -> Self {
        self.nft_address = address;
        self
    }

    /// Sets the confirmation depth.
    #[must_use]
    pub fn with_confirmations(mut self, confirmations: usize) -> Self {
        self.confirmations = confirmations;
        self
    }

    /// Sets the environment variable holding the wallet key.
    #[must_use]
    pub fn with_wallet_key_env(mut self, name: impl Into<String>) -> Self {
        self.wallet_key_env = name.into();
        self
    }

    /// Returns the network.
    #[inline]
    #[must_use]
    pub fn network(&self) -> Network {
        self.network
    }

    /// Returns the RPC endpoint.
    #[inline]
    #[must_use]
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Returns the marketplace contract.
    #[inline]
    #[must_use]
    pub fn marketplace_address(&self) -> Address {
        self.marketplace_address
    }

    /// Returns the NFT contract.
    #[inline]
    #[must_use]
    pub fn nft_address(&self) -> Address {
        self.nft_address
    }

    /// Returns the confirmation depth.
    #[inline]
    #[must_use]
    pub fn confirmations(&self) -> usize {
        self.confirmations
    }

    /// Returns the environment variable holding the wallet key.
    #[inline]
    #[must_use]
    pub fn wallet_key_env(&self) -> &str {
        &self.wallet_key_env
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            marketplace_address: DEFAULT_MARKETPLACE_ADDRESS
                .parse()
                .unwrap_or_default(),
            nft_address: DEFAULT_NFT_ADDRESS.parse().unwrap_or_default(),
            confirmations: DEFAULT_CONFIRMATIONS,
            wallet_key_env: DEFAULT_WALLET_KEY_ENV.to_string(),
        }
    }
}
