//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! - [`ListingId`]: 1-based sequential listing identifier
//! - [`EtherAmount`]: exact wei/ether amount with display conversion

pub mod ether_amount;
pub mod ids;

pub use ether_amount::{ETHER_DECIMALS, EtherAmount};
pub use ids::ListingId;
