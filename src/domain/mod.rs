//! # Domain Layer
//!
//! Marketplace types that carry no I/O: listings, the wallet session,
//! listing identifiers and exact ether amounts.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::{Listing, Session};
pub use errors::{DomainError, DomainResult};
pub use value_objects::{EtherAmount, ListingId};
