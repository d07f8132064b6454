//! # Key Wallet
//!
//! A [`WalletProvider`] that signs locally with a private key taken from the
//! environment.
//!
//! The key's presence plays the role of an installed wallet: when the
//! configured variable is unset, [`KeyWallet::detect`] returns `None` and the
//! client behaves as if no wallet were available.

use super::client::{ChainError, ChainResult, Network, WalletProvider, WalletSession};
use super::ethereum::{EthereumReader, EthereumSigner};
use crate::config::MarketConfig;
use async_trait::async_trait;
use ethers::providers::Provider;
use ethers::signers::{LocalWallet, Signer};
use ethers::types::Address;
use std::fmt;
use std::sync::Arc;

/// Wallet backed by a hex-encoded secp256k1 private key.
#[derive(Clone)]
pub struct KeyWallet {
    network: Network,
    rpc_url: String,
    marketplace: Address,
    confirmations: usize,
    private_key: String,
}

impl KeyWallet {
    /// Creates a wallet for `config` with an explicit key.
    #[must_use]
    pub fn new(config: &MarketConfig, private_key: impl Into<String>) -> Self {
        Self {
            network: config.network(),
            rpc_url: config.rpc_url().to_string(),
            marketplace: config.marketplace_address(),
            confirmations: config.confirmations(),
            private_key: private_key.into(),
        }
    }

    /// Looks up the key in the variable named by `config.wallet_key_env()`.
    ///
    /// Returns `None` if the variable is unset or blank.
    #[must_use]
    pub fn detect(config: &MarketConfig) -> Option<Self> {
        let key = std::env::var(config.wallet_key_env()).ok()?;
        if key.trim().is_empty() {
            return None;
        }
        Some(Self::new(config, key.trim()))
    }

    /// Parses the key into a signer bound to the configured chain.
    fn signer(&self) -> ChainResult<LocalWallet> {
        let key = self
            .private_key
            .strip_prefix("0x")
            .unwrap_or(&self.private_key);
        let wallet: LocalWallet = key
            .parse()
            .map_err(|_| ChainError::wallet("private key is not a valid secp256k1 key"))?;
        Ok(wallet.with_chain_id(self.network.chain_id()))
    }
}

impl fmt::Debug for KeyWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyWallet")
            .field("network", &self.network)
            .field("rpc_url", &self.rpc_url)
            .field("marketplace", &self.marketplace)
            .field("confirmations", &self.confirmations)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl WalletProvider for KeyWallet {
    async fn connect(&self) -> ChainResult<WalletSession> {
        let wallet = self.signer()?;
        let account = wallet.address();

        let reader = EthereumReader::new(&self.rpc_url, self.marketplace)?;
        reader.ensure_network(self.network).await?;

        let signer = EthereumSigner::new(
            Provider::clone(&reader.provider()),
            wallet,
            self.marketplace,
            self.confirmations,
        );

        tracing::info!(account = ?account, network = %self.network, "wallet connected");

        Ok(WalletSession {
            account,
            reader: Arc::new(reader),
            signer: Arc::new(signer),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // Well-known development key (anvil/hardhat account #0).
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ACCOUNT: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn parses_prefixed_key() {
        let wallet = KeyWallet::new(&MarketConfig::default(), DEV_KEY);
        let signer = wallet.signer().unwrap();
        assert_eq!(signer.address(), DEV_ACCOUNT.parse::<Address>().unwrap());
        assert_eq!(signer.chain_id(), Network::Sepolia.chain_id());
    }

    #[test]
    fn rejects_garbage_key() {
        let wallet = KeyWallet::new(&MarketConfig::default(), "not-a-key");
        assert!(matches!(wallet.signer(), Err(ChainError::Wallet(_))));
    }

    #[test]
    fn debug_redacts_key() {
        let wallet = KeyWallet::new(&MarketConfig::default(), DEV_KEY);
        let debug = format!("{wallet:?}");
        assert!(!debug.contains("ac0974"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn detect_returns_none_when_variable_unset() {
        let config = MarketConfig::default().with_wallet_key_env("NFT_MARKET_TEST_UNSET_KEY");
        assert!(KeyWallet::detect(&config).is_none());
    }

    mod connect {
        use super::*;

        async fn node_on_chain(chain_id: &str) -> MockServer {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(body_partial_json(json!({ "method": "eth_chainId" })))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "result": chain_id,
                })))
                .mount(&server)
                .await;
            server
        }

        #[tokio::test]
        async fn matching_chain_exposes_key_account() {
            let server = node_on_chain("0xaa36a7").await;
            let config = MarketConfig::default().with_rpc_url(server.uri());

            let session = KeyWallet::new(&config, DEV_KEY).connect().await.unwrap();
            let account = DEV_ACCOUNT.parse::<Address>().unwrap();
            assert_eq!(session.account, account);
            assert_eq!(session.signer.account(), account);
        }

        #[tokio::test]
        async fn other_chain_is_refused() {
            let server = node_on_chain("0x1").await;
            let config = MarketConfig::default().with_rpc_url(server.uri());

            let result = KeyWallet::new(&config, DEV_KEY).connect().await;
            assert!(matches!(
                result,
                Err(ChainError::ChainMismatch {
                    expected: 11_155_111,
                    actual: 1
                })
            ));
        }

        #[tokio::test]
        async fn bad_key_fails_before_contacting_node() {
            let server = node_on_chain("0xaa36a7").await;
            let config = MarketConfig::default().with_rpc_url(server.uri());

            let result = KeyWallet::new(&config, "not-a-key").connect().await;
            assert!(matches!(result, Err(ChainError::Wallet(_))));
            assert!(server.received_requests().await.unwrap().is_empty());
        }
    }
}
