//! # Identifiers
//!
//! Identifier types for marketplace records.

use crate::domain::errors::{DomainError, DomainResult};
use ethers::types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequential listing identifier assigned by the marketplace contract.
///
/// Identifiers start at 1 and run contiguously up to the contract's
/// `listingCount()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct ListingId(u64);

impl ListingId {
    /// The first identifier the marketplace hands out.
    pub const FIRST: Self = Self(1);

    /// Creates a listing identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidListingId`] for zero.
    pub const fn new(id: u64) -> DomainResult<Self> {
        if id == 0 {
            Err(DomainError::InvalidListingId(id))
        } else {
            Ok(Self(id))
        }
    }

    /// Returns the numeric value.
    #[inline]
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Iterates over `1..=count` in ascending order.
    pub fn range(count: u64) -> impl Iterator<Item = Self> {
        (1..=count).map(Self)
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u64> for ListingId {
    type Error = DomainError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ListingId> for u64 {
    fn from(id: ListingId) -> Self {
        id.0
    }
}

impl From<ListingId> for U256 {
    fn from(id: ListingId) -> Self {
        U256::from(id.0)
    }
}
