//! # Listing Entity
//!
//! A snapshot of one marketplace listing as read from the contract.
//!
//! Listings are created by the contract's `listNFT`, flipped to inactive by
//! `buyNFT` or `cancelListing`, and never deleted. The client only ever
//! holds read snapshots.

use crate::domain::value_objects::{EtherAmount, ListingId};
use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};

/// An item offered for sale on the marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    id: ListingId,
    seller: Address,
    nft_contract: Address,
    token_id: U256,
    price: EtherAmount,
    active: bool,
}

impl Listing {
    /// Creates a listing snapshot.
    #[must_use]
    pub fn new(
        id: ListingId,
        seller: Address,
        nft_contract: Address,
        token_id: U256,
        price: EtherAmount,
        active: bool,
    ) -> Self {
        Self {
            id,
            seller,
            nft_contract,
            token_id,
            price,
            active,
        }
    }

    /// Returns the listing identifier.
    #[inline]
    #[must_use]
    pub fn id(&self) -> ListingId {
        self.id
    }

    /// Returns the seller's account.
    #[inline]
    #[must_use]
    pub fn seller(&self) -> Address {
        self.seller
    }

    /// Returns the NFT contract holding the token.
    #[inline]
    #[must_use]
    pub fn nft_contract(&self) -> Address {
        self.nft_contract
    }

    /// Returns the token identifier within the NFT contract.
    #[inline]
    #[must_use]
    pub fn token_id(&self) -> U256 {
        self.token_id
    }

    /// Returns the asking price.
    #[inline]
    #[must_use]
    pub fn price(&self) -> EtherAmount {
        self.price
    }

    /// Returns whether the listing is still for sale.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns true if `account` is the seller of this listing.
    #[must_use]
    pub fn is_sold_by(&self, account: Address) -> bool {
        self.seller == account
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_listing() -> Listing {
        Listing::new(
            ListingId::new(2).unwrap(),
            Address::from_low_u64_be(0xa11ce),
            Address::from_low_u64_be(0x4f7),
            U256::from(42u64),
            EtherAmount::parse("0.5").unwrap(),
            true,
        )
    }

    #[test]
    fn accessors_return_fields() {
        let listing = test_listing();
        assert_eq!(listing.id().get(), 2);
        assert_eq!(listing.token_id(), U256::from(42u64));
        assert_eq!(listing.price().to_display(), "0.5");
        assert!(listing.is_active());
    }

    #[test]
    fn seller_check_compares_addresses() {
        let listing = test_listing();
        assert!(listing.is_sold_by(Address::from_low_u64_be(0xa11ce)));
        assert!(!listing.is_sold_by(Address::from_low_u64_be(0xb0b)));
    }
}
