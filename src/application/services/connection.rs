//! # Connection Manager
//!
//! Links the client to the environment's wallet provider.
//!
//! The environment may not have a wallet at all; in that case
//! [`ConnectionManager::connect`] fails with [`MarketError::NoWallet`] and
//! nothing else happens.

use crate::application::error::{MarketError, MarketResult};
use crate::infrastructure::blockchain::{WalletProvider, WalletSession};
use std::sync::Arc;

/// Establishes wallet sessions.
#[derive(Debug, Clone, Default)]
pub struct ConnectionManager {
    provider: Option<Arc<dyn WalletProvider>>,
}

impl ConnectionManager {
    /// Creates a manager for whatever wallet the environment offers.
    #[must_use]
    pub fn new(provider: Option<Arc<dyn WalletProvider>>) -> Self {
        Self { provider }
    }

    /// Creates a manager bound to `provider`.
    #[must_use]
    pub fn with_provider(provider: Arc<dyn WalletProvider>) -> Self {
        Self::new(Some(provider))
    }

    /// Creates a manager for an environment without a wallet.
    #[must_use]
    pub fn without_wallet() -> Self {
        Self::new(None)
    }

    /// Returns true if a wallet provider is present.
    #[must_use]
    pub fn has_wallet(&self) -> bool {
        self.provider.is_some()
    }

    /// Requests account access from the wallet.
    ///
    /// The wallet may prompt the user through its own mechanism.
    ///
    /// # Errors
    ///
    /// - [`MarketError::NoWallet`] if no provider is present
    /// - [`MarketError::Connection`] if the provider refuses or the endpoint is unusable
    pub async fn connect(&self) -> MarketResult<WalletSession> {
        let provider = self.provider.as_ref().ok_or(MarketError::NoWallet)?;
        let session = provider.connect().await.map_err(MarketError::Connection)?;
        tracing::info!(account = ?session.account, "account connected");
        Ok(session)
    }
}
