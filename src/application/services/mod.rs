//! # Application Services
//!
//! - [`ConnectionManager`]: wallet connection
//! - [`ListingReader`]: active listing scan
//! - [`TransactionSubmitter`]: approve, list, buy and cancel

pub mod connection;
pub mod listing_reader;
pub mod transactions;

pub use connection::ConnectionManager;
pub use listing_reader::ListingReader;
pub use transactions::{ListingDraft, TransactionSubmitter, TxKind, TxRequest};
