//! # Infrastructure Layer
//!
//! Adapters to the outside world: contract clients, wallets and logging.

pub mod blockchain;
pub mod logging;
