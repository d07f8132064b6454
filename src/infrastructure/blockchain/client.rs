//! # Marketplace Contract Ports
//!
//! Port definitions for the marketplace and NFT contracts and for the
//! wallet that signs against them.
//!
//! - [`MarketplaceReader`]: read-only contract calls, no signer needed
//! - [`MarketplaceSigner`]: state-changing calls from the connected account
//! - [`WalletProvider`]: hands out a [`WalletSession`] on connect

use crate::domain::value_objects::ListingId;
use async_trait::async_trait;
use ethers::types::{Address, H256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Supported networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Sepolia public test network (chain ID 11155111).
    #[default]
    Sepolia,
    /// Holesky public test network (chain ID 17000).
    Holesky,
    /// Ethereum mainnet (chain ID 1).
    Mainnet,
}

impl Network {
    /// Returns the numeric chain ID.
    #[must_use]
    pub const fn chain_id(&self) -> u64 {
        match self {
            Self::Sepolia => 11_155_111,
            Self::Holesky => 17_000,
            Self::Mainnet => 1,
        }
    }

    /// Creates a network from a numeric chain ID.
    #[must_use]
    pub const fn from_chain_id(chain_id: u64) -> Option<Self> {
        match chain_id {
            11_155_111 => Some(Self::Sepolia),
            17_000 => Some(Self::Holesky),
            1 => Some(Self::Mainnet),
            _ => None,
        }
    }

    /// Returns the network name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sepolia => "sepolia",
            Self::Holesky => "holesky",
            Self::Mainnet => "mainnet",
        }
    }

    /// Returns the capitalized name used in headings.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Sepolia => "Sepolia",
            Self::Holesky => "Holesky",
            Self::Mainnet => "Mainnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Transaction hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl TxHash {
    /// Creates a new transaction hash.
    #[must_use]
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Returns the hash as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<H256> for TxHash {
    fn from(hash: H256) -> Self {
        Self(format!("{hash:#x}"))
    }
}

/// Receipt of a confirmed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// Transaction hash.
    pub tx_hash: TxHash,
    /// Block number where the transaction was included.
    pub block_number: u64,
    /// Gas used by the transaction.
    pub gas_used: u64,
}

/// Raw listing record as returned by `listings(uint256)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingRecord {
    /// Account that created the listing.
    pub seller: Address,
    /// NFT contract of the listed token.
    pub nft_contract: Address,
    /// Token identifier.
    pub token_id: U256,
    /// Asking price in wei.
    pub price: U256,
    /// Whether the listing is still for sale.
    pub active: bool,
}

/// Error type for contract and wallet operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// RPC connection error.
    #[error("connection error: {0}")]
    Connection(String),

    /// Read-only contract call failed.
    #[error("call error: {0}")]
    Call(String),

    /// Transaction submission or confirmation failed.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// Transaction was mined but reverted.
    #[error("transaction reverted: {0}")]
    Reverted(String),

    /// Contract returned data that does not fit the expected type.
    #[error("decode error: {0}")]
    Decode(String),

    /// The RPC endpoint serves a different chain than configured.
    #[error("chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch {
        /// Configured chain ID.
        expected: u64,
        /// Chain ID reported by the endpoint.
        actual: u64,
    },

    /// Wallet refused or could not produce a signer.
    #[error("wallet error: {0}")]
    Wallet(String),
}

impl ChainError {
    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a call error.
    #[must_use]
    pub fn call(msg: impl Into<String>) -> Self {
        Self::Call(msg.into())
    }

    /// Creates a transaction error.
    #[must_use]
    pub fn transaction(msg: impl Into<String>) -> Self {
        Self::Transaction(msg.into())
    }

    /// Creates a reverted error.
    #[must_use]
    pub fn reverted(msg: impl Into<String>) -> Self {
        Self::Reverted(msg.into())
    }

    /// Creates a decode error.
    #[must_use]
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Creates a wallet error.
    #[must_use]
    pub fn wallet(msg: impl Into<String>) -> Self {
        Self::Wallet(msg.into())
    }
}

/// Result type for contract and wallet operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// Read-only access to the marketplace and NFT contracts.
#[async_trait]
pub trait MarketplaceReader: Send + Sync + fmt::Debug {
    /// Returns the marketplace's `listingCount()`.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the count exceeds `u64`.
    async fn listing_count(&self) -> ChainResult<u64>;

    /// Returns the record stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    async fn listing(&self, id: ListingId) -> ChainResult<ListingRecord>;

    /// Returns `isApprovedForAll(owner, operator)` on the given NFT contract.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    async fn is_approved_for_all(
        &self,
        nft_contract: Address,
        owner: Address,
        operator: Address,
    ) -> ChainResult<bool>;
}

/// State-changing calls signed by the connected account.
///
/// Every method submits one transaction and resolves once it is confirmed.
#[async_trait]
pub trait MarketplaceSigner: Send + Sync + fmt::Debug {
    /// Returns the signing account.
    fn account(&self) -> Address;

    /// Calls `setApprovalForAll(operator, approved)` on `nft_contract`.
    ///
    /// # Errors
    ///
    /// Returns an error if submission fails or the transaction reverts.
    async fn set_approval_for_all(
        &self,
        nft_contract: Address,
        operator: Address,
        approved: bool,
    ) -> ChainResult<TxReceipt>;

    /// Calls the marketplace's `listNFT(nft, tokenId, price)`.
    ///
    /// # Errors
    ///
    /// Returns an error if submission fails or the transaction reverts.
    async fn list_nft(
        &self,
        nft_contract: Address,
        token_id: U256,
        price: U256,
    ) -> ChainResult<TxReceipt>;

    /// Calls the marketplace's payable `buyNFT(listingId)` with `value` wei attached.
    ///
    /// # Errors
    ///
    /// Returns an error if submission fails or the transaction reverts.
    async fn buy_nft(&self, id: ListingId, value: U256) -> ChainResult<TxReceipt>;

    /// Calls the marketplace's `cancelListing(listingId)`.
    ///
    /// # Errors
    ///
    /// Returns an error if submission fails or the transaction reverts.
    async fn cancel_listing(&self, id: ListingId) -> ChainResult<TxReceipt>;
}

/// A connected wallet: the exposed account plus read and signing handles.
#[derive(Debug, Clone)]
pub struct WalletSession {
    /// Account exposed by the wallet.
    pub account: Address,
    /// Read-only contract access.
    pub reader: Arc<dyn MarketplaceReader>,
    /// Signing contract access for `account`.
    pub signer: Arc<dyn MarketplaceSigner>,
}

/// Source of wallet sessions.
#[async_trait]
pub trait WalletProvider: Send + Sync + fmt::Debug {
    /// Requests account access and returns a session for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the wallet refuses or the endpoint is unusable.
    async fn connect(&self) -> ChainResult<WalletSession>;
}
