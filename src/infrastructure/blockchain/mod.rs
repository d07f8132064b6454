//! # Blockchain Clients
//!
//! Contract access for the marketplace and its NFT contract.
//!
//! ## Available Components
//!
//! - [`MarketplaceReader`], [`MarketplaceSigner`], [`WalletProvider`]: ports
//! - [`EthereumReader`], [`EthereumSigner`]: ethers-rs implementations
//! - [`KeyWallet`]: wallet backed by a private key from the environment
//! - [`InMemoryMarketplace`]: simulated contracts for tests and demos
//! - [`Network`]: supported networks

pub mod client;
pub mod ethereum;
pub mod in_memory;
pub mod wallet;

pub use client::{
    ChainError, ChainResult, ListingRecord, MarketplaceReader, MarketplaceSigner, Network,
    TxHash, TxReceipt, WalletProvider, WalletSession,
};
pub use ethereum::{EthereumReader, EthereumSigner};
pub use in_memory::{InMemoryMarketplace, InMemorySigner, InMemoryWallet, SubmittedCall};
pub use wallet::KeyWallet;
