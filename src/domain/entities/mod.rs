//! # Domain Entities
//!
//! - [`Listing`]: a marketplace listing snapshot
//! - [`Session`]: the connected account, if any

pub mod listing;
pub mod session;

pub use listing::Listing;
pub use session::Session;
