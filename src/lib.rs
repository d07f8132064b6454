//! # NFT Market Client
//!
//! Client for an on-chain NFT marketplace. It connects a wallet, reads the
//! active listings from the marketplace contract and submits the four
//! marketplace transactions: approve, list, buy and cancel.
//!
//! # Architecture
//!
//! ```text
//! api            terminal front end (prompts, notices, numbered buttons)
//!  └─ application
//!      ├─ state      pure (state, event) → (state, commands) transitions
//!      ├─ runtime    executes commands, feeds outcomes back as events
//!      ├─ view       state → view tree
//!      └─ services   connection, listing reader, transaction submitter
//!          └─ infrastructure::blockchain   contract ports and ethers adapters
//! domain         listings, sessions, ether amounts
//! ```
//!
//! # Example
//!
//! ```no_run
//! use nft_market_client::api::TerminalInteraction;
//! use nft_market_client::application::MarketApp;
//! use nft_market_client::application::services::ConnectionManager;
//! use nft_market_client::config::MarketConfig;
//! use nft_market_client::infrastructure::blockchain::{KeyWallet, WalletProvider};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MarketConfig::load(None)?;
//! let wallet = KeyWallet::detect(&config).map(|w| Arc::new(w) as Arc<dyn WalletProvider>);
//! let mut app = MarketApp::new(
//!     &config,
//!     ConnectionManager::new(wallet),
//!     Arc::new(TerminalInteraction::stdio()),
//! )?;
//! app.connect().await?;
//! println!("{}", app.view());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
