//! # In-Memory Marketplace
//!
//! A simulated marketplace/NFT contract pair implementing the contract ports
//! without a node.
//!
//! Used by unit tests and by the terminal front end's simulation mode. The
//! simulation follows the marketplace's observable rules: listing requires
//! operator approval, buying requires the exact price as payment, and only
//! the seller can cancel. Every attempted transaction is recorded so tests can
//! assert on what was submitted.
//!
//! ## Thread Safety
//!
//! State lives behind `Arc<RwLock<_>>`; clones share the same ledger.

use super::client::{
    ChainError, ChainResult, ListingRecord, MarketplaceReader, MarketplaceSigner, TxHash,
    TxReceipt, WalletProvider, WalletSession,
};
use crate::domain::value_objects::ListingId;
use async_trait::async_trait;
use ethers::types::{Address, H256, U256};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Gas charged per simulated transaction.
const SIMULATED_GAS: u64 = 50_000;

/// A transaction submitted to the simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmittedCall {
    /// `setApprovalForAll` on an NFT contract.
    SetApprovalForAll {
        /// Sending account.
        from: Address,
        /// NFT contract.
        nft_contract: Address,
        /// Operator being approved.
        operator: Address,
        /// Approval flag.
        approved: bool,
    },
    /// `listNFT` on the marketplace.
    ListNft {
        /// Sending account.
        from: Address,
        /// NFT contract.
        nft_contract: Address,
        /// Token identifier.
        token_id: U256,
        /// Price in wei.
        price: U256,
    },
    /// `buyNFT` on the marketplace.
    BuyNft {
        /// Sending account.
        from: Address,
        /// Listing bought.
        id: ListingId,
        /// Attached value in wei.
        value: U256,
    },
    /// `cancelListing` on the marketplace.
    CancelListing {
        /// Sending account.
        from: Address,
        /// Listing cancelled.
        id: ListingId,
    },
}

#[derive(Debug, Default)]
struct Ledger {
    listings: Vec<ListingRecord>,
    approvals: HashSet<(Address, Address, Address)>,
    submitted: Vec<SubmittedCall>,
    block_number: u64,
    failing_read: Option<ListingId>,
}

impl Ledger {
    fn record_mut(&mut self, id: ListingId) -> ChainResult<&mut ListingRecord> {
        let index = usize::try_from(id.get() - 1)
            .map_err(|_| ChainError::reverted("listing does not exist"))?;
        self.listings
            .get_mut(index)
            .ok_or_else(|| ChainError::reverted("listing does not exist"))
    }

    fn mine(&mut self) -> TxReceipt {
        self.block_number += 1;
        TxReceipt {
            tx_hash: TxHash::from(H256::from_low_u64_be(self.block_number)),
            block_number: self.block_number,
            gas_used: SIMULATED_GAS,
        }
    }
}

/// Simulated marketplace and NFT contracts.
#[derive(Debug, Clone)]
pub struct InMemoryMarketplace {
    address: Address,
    ledger: Arc<RwLock<Ledger>>,
    count_reads: Arc<AtomicUsize>,
    record_reads: Arc<AtomicUsize>,
}

impl InMemoryMarketplace {
    /// Creates an empty marketplace deployed at `address`.
    #[must_use]
    pub fn new(address: Address) -> Self {
        Self {
            address,
            ledger: Arc::new(RwLock::new(Ledger::default())),
            count_reads: Arc::new(AtomicUsize::new(0)),
            record_reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns the marketplace address.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Stores a record directly, bypassing approval checks.
    ///
    /// Returns the identifier the record was stored under.
    pub async fn seed(&self, record: ListingRecord) -> ListingId {
        let mut ledger = self.ledger.write().await;
        ledger.listings.push(record);
        ListingId::new(ledger.listings.len() as u64).unwrap_or(ListingId::FIRST)
    }

    /// Makes every future read of `id` fail.
    pub async fn fail_reads_of(&self, id: ListingId) {
        self.ledger.write().await.failing_read = Some(id);
    }

    /// Returns how many times `listingCount()` was read.
    #[must_use]
    pub fn count_reads(&self) -> usize {
        self.count_reads.load(Ordering::SeqCst)
    }

    /// Returns how many times `listings(id)` was read.
    #[must_use]
    pub fn record_reads(&self) -> usize {
        self.record_reads.load(Ordering::SeqCst)
    }

    /// Returns every transaction submitted so far, reverted ones included.
    pub async fn submitted(&self) -> Vec<SubmittedCall> {
        self.ledger.read().await.submitted.clone()
    }

    /// Returns a signer for `account`.
    #[must_use]
    pub fn signer(&self, account: Address) -> InMemorySigner {
        InMemorySigner {
            marketplace: self.clone(),
            account,
        }
    }

    /// Returns a wallet that connects as `account`.
    #[must_use]
    pub fn wallet(&self, account: Address) -> InMemoryWallet {
        InMemoryWallet {
            marketplace: self.clone(),
            account,
        }
    }
}

#[async_trait]
impl MarketplaceReader for InMemoryMarketplace {
    async fn listing_count(&self) -> ChainResult<u64> {
        self.count_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.ledger.read().await.listings.len() as u64)
    }

    async fn listing(&self, id: ListingId) -> ChainResult<ListingRecord> {
        self.record_reads.fetch_add(1, Ordering::SeqCst);
        let ledger = self.ledger.read().await;
        if ledger.failing_read == Some(id) {
            return Err(ChainError::call(format!("listings({id}): simulated failure")));
        }
        usize::try_from(id.get() - 1)
            .ok()
            .and_then(|index| ledger.listings.get(index))
            .copied()
            .ok_or_else(|| ChainError::call(format!("listings({id}): out of range")))
    }

    async fn is_approved_for_all(
        &self,
        nft_contract: Address,
        owner: Address,
        operator: Address,
    ) -> ChainResult<bool> {
        let ledger = self.ledger.read().await;
        Ok(ledger.approvals.contains(&(nft_contract, owner, operator)))
    }
}

/// Signer acting for one account against an [`InMemoryMarketplace`].
#[derive(Debug, Clone)]
pub struct InMemorySigner {
    marketplace: InMemoryMarketplace,
    account: Address,
}

#[async_trait]
impl MarketplaceSigner for InMemorySigner {
    fn account(&self) -> Address {
        self.account
    }

    async fn set_approval_for_all(
        &self,
        nft_contract: Address,
        operator: Address,
        approved: bool,
    ) -> ChainResult<TxReceipt> {
        let mut ledger = self.marketplace.ledger.write().await;
        ledger.submitted.push(SubmittedCall::SetApprovalForAll {
            from: self.account,
            nft_contract,
            operator,
            approved,
        });

        let key = (nft_contract, self.account, operator);
        if approved {
            ledger.approvals.insert(key);
        } else {
            ledger.approvals.remove(&key);
        }
        Ok(ledger.mine())
    }

    async fn list_nft(
        &self,
        nft_contract: Address,
        token_id: U256,
        price: U256,
    ) -> ChainResult<TxReceipt> {
        let mut ledger = self.marketplace.ledger.write().await;
        ledger.submitted.push(SubmittedCall::ListNft {
            from: self.account,
            nft_contract,
            token_id,
            price,
        });

        if price.is_zero() {
            return Err(ChainError::reverted("price must be positive"));
        }
        let key = (nft_contract, self.account, self.marketplace.address);
        if !ledger.approvals.contains(&key) {
            return Err(ChainError::reverted("marketplace not approved"));
        }

        ledger.listings.push(ListingRecord {
            seller: self.account,
            nft_contract,
            token_id,
            price,
            active: true,
        });
        Ok(ledger.mine())
    }

    async fn buy_nft(&self, id: ListingId, value: U256) -> ChainResult<TxReceipt> {
        let mut ledger = self.marketplace.ledger.write().await;
        ledger.submitted.push(SubmittedCall::BuyNft {
            from: self.account,
            id,
            value,
        });

        let record = ledger.record_mut(id)?;
        if !record.active {
            return Err(ChainError::reverted("listing not active"));
        }
        if record.price != value {
            return Err(ChainError::reverted("incorrect payment"));
        }
        record.active = false;
        Ok(ledger.mine())
    }

    async fn cancel_listing(&self, id: ListingId) -> ChainResult<TxReceipt> {
        let mut ledger = self.marketplace.ledger.write().await;
        ledger.submitted.push(SubmittedCall::CancelListing {
            from: self.account,
            id,
        });

        let account = self.account;
        let record = ledger.record_mut(id)?;
        if !record.active {
            return Err(ChainError::reverted("listing not active"));
        }
        if record.seller != account {
            return Err(ChainError::reverted("not the seller"));
        }
        record.active = false;
        Ok(ledger.mine())
    }
}

/// Wallet that always connects as one account.
#[derive(Debug, Clone)]
pub struct InMemoryWallet {
    marketplace: InMemoryMarketplace,
    account: Address,
}

#[async_trait]
impl WalletProvider for InMemoryWallet {
    async fn connect(&self) -> ChainResult<WalletSession> {
        Ok(WalletSession {
            account: self.account,
            reader: Arc::new(self.marketplace.clone()),
            signer: Arc::new(self.marketplace.signer(self.account)),
        })
    }
}
