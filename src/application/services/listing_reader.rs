//! # Listing Reader
//!
//! Loads the active listings from the marketplace contract.
//!
//! # Algorithm
//!
//! ```text
//! count = listingCount()
//! for id in 1..=count:            (one call at a time, in order)
//!     record = listings(id)
//!     keep record if active
//! ```
//!
//! The count is taken as authoritative. Any failed read aborts the whole
//! load; callers keep whatever listings they held before.

use crate::application::error::{MarketError, MarketResult};
use crate::domain::entities::Listing;
use crate::domain::value_objects::{EtherAmount, ListingId};
use crate::infrastructure::blockchain::{ListingRecord, MarketplaceReader};
use std::sync::Arc;

/// Converts a raw contract record into a listing snapshot.
#[must_use]
pub fn listing_from_record(id: ListingId, record: &ListingRecord) -> Listing {
    Listing::new(
        id,
        record.seller,
        record.nft_contract,
        record.token_id,
        EtherAmount::from_wei(record.price),
        record.active,
    )
}

/// Reads listings through a [`MarketplaceReader`].
#[derive(Debug, Clone)]
pub struct ListingReader {
    reader: Arc<dyn MarketplaceReader>,
}

impl ListingReader {
    /// Creates a listing reader.
    #[must_use]
    pub fn new(reader: Arc<dyn MarketplaceReader>) -> Self {
        Self { reader }
    }

    /// Fetches every active listing, ordered by ascending id.
    ///
    /// Nothing is cached; each call re-reads the count and every record.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Fetch`] if the count or any record cannot be read.
    pub async fn load(&self) -> MarketResult<Vec<Listing>> {
        let count = self
            .reader
            .listing_count()
            .await
            .map_err(MarketError::Fetch)?;
        tracing::debug!(count, "loading listings");

        let mut listings = Vec::new();
        for id in ListingId::range(count) {
            let record = self.reader.listing(id).await.map_err(|e| {
                tracing::warn!(listing_id = %id, error = %e, "listing read failed");
                MarketError::Fetch(e)
            })?;
            if record.active {
                listings.push(listing_from_record(id, &record));
            }
        }

        tracing::info!(count, active = listings.len(), "listings loaded");
        Ok(listings)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::infrastructure::blockchain::InMemoryMarketplace;
    use ethers::types::{Address, U256};
    use proptest::prelude::*;

    fn record(active: bool, price: u64) -> ListingRecord {
        ListingRecord {
            seller: Address::from_low_u64_be(0xa11ce),
            nft_contract: Address::from_low_u64_be(0x4f7),
            token_id: U256::from(price),
            price: U256::from(price),
            active,
        }
    }

    async fn seeded(flags: &[bool]) -> InMemoryMarketplace {
        let market = InMemoryMarketplace::new(Address::from_low_u64_be(0x3a4b));
        for (i, active) in flags.iter().enumerate() {
            market.seed(record(*active, i as u64 + 1)).await;
        }
        market
    }

    fn reader_for(market: &InMemoryMarketplace) -> ListingReader {
        ListingReader::new(Arc::new(market.clone()))
    }

    #[tokio::test]
    async fn empty_marketplace_reads_no_records() {
        let market = seeded(&[]).await;
        let listings = reader_for(&market).load().await.unwrap();
        assert!(listings.is_empty());
        assert_eq!(market.count_reads(), 1);
        assert_eq!(market.record_reads(), 0);
    }

    #[tokio::test]
    async fn keeps_only_active_listings_in_order() {
        let market = seeded(&[true, false, true, false, true]).await;
        let listings = reader_for(&market).load().await.unwrap();

        let ids: Vec<u64> = listings.iter().map(|l| l.id().get()).collect();
        assert_eq!(ids, vec![1, 3, 5]);
        assert!(listings.iter().all(Listing::is_active));
        assert_eq!(market.record_reads(), 5);
    }

    #[tokio::test]
    async fn converts_price_to_display_units() {
        let market = InMemoryMarketplace::new(Address::from_low_u64_be(0x3a4b));
        let mut rec = record(true, 1);
        rec.price = EtherAmount::parse("1.5").unwrap().wei();
        market.seed(rec).await;

        let listings = reader_for(&market).load().await.unwrap();
        assert_eq!(listings[0].price().to_display(), "1.5");
    }

    #[tokio::test]
    async fn failed_record_read_aborts_load() {
        let market = seeded(&[true, true, true]).await;
        market.fail_reads_of(ListingId::new(2).unwrap()).await;

        let result = reader_for(&market).load().await;
        assert!(matches!(result, Err(MarketError::Fetch(_))));
        assert_eq!(market.record_reads(), 2);
    }

    #[tokio::test]
    async fn repeated_loads_are_identical() {
        let market = seeded(&[false, true, true]).await;
        let reader = reader_for(&market);
        let first = reader.load().await.unwrap();
        let second = reader.load().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(market.count_reads(), 2);
    }

    proptest! {
        #[test]
        fn returns_exactly_the_active_subset(flags in prop::collection::vec(any::<bool>(), 0..40)) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let listings = runtime.block_on(async {
                let market = seeded(&flags).await;
                reader_for(&market).load().await.unwrap()
            });

            let expected: Vec<u64> = flags
                .iter()
                .enumerate()
                .filter(|(_, active)| **active)
                .map(|(i, _)| i as u64 + 1)
                .collect();
            let actual: Vec<u64> = listings.iter().map(|l| l.id().get()).collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
