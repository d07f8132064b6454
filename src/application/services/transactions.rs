//! # Transaction Submitter
//!
//! The four state-changing marketplace operations.
//!
//! Each operation builds one contract call, submits it through the connected
//! account's [`MarketplaceSigner`] and resolves once the transaction is
//! confirmed. Failures are not retried and not told apart: a rejected
//! signature, a revert and an RPC error all surface as
//! [`MarketError::Transaction`].
//!
//! The purchase sends the price the caller displayed. It does not re-read the
//! on-chain price first, so a listing repriced in between makes the
//! transaction revert.

use crate::application::error::{MarketError, MarketResult};
use crate::domain::value_objects::{EtherAmount, ListingId};
use crate::infrastructure::blockchain::{MarketplaceSigner, TxReceipt};
use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Kind of marketplace transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    /// Operator approval of the marketplace on the NFT contract.
    Approve,
    /// Listing creation.
    List,
    /// Purchase of a listing.
    Buy,
    /// Cancellation of a listing.
    Cancel,
}

impl TxKind {
    /// Returns true if a confirmed transaction of this kind changes listings.
    #[must_use]
    pub const fn changes_listings(&self) -> bool {
        !matches!(self, Self::Approve)
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Approve => write!(f, "approve"),
            Self::List => write!(f, "list"),
            Self::Buy => write!(f, "buy"),
            Self::Cancel => write!(f, "cancel"),
        }
    }
}

/// The three values a user supplies to create a listing, as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingDraft {
    /// NFT contract address.
    pub nft_contract: String,
    /// Token identifier, decimal or `0x`-prefixed hex.
    pub token_id: String,
    /// Price in ether.
    pub price: String,
}

impl ListingDraft {
    /// Creates a draft.
    #[must_use]
    pub fn new(
        nft_contract: impl Into<String>,
        token_id: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            nft_contract: nft_contract.into(),
            token_id: token_id.into(),
            price: price.into(),
        }
    }

    /// Parses the draft into contract arguments.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Validation`] for a malformed address or token
    /// id, and [`MarketError::Domain`] for a malformed price.
    pub fn parse(&self) -> MarketResult<(Address, U256, EtherAmount)> {
        let nft_contract: Address = self.nft_contract.trim().parse().map_err(|_| {
            MarketError::validation(format!("invalid NFT contract address: {}", self.nft_contract))
        })?;

        let token = self.token_id.trim();
        let token_id = match token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
            Some("") => Err(()),
            Some(hex) => U256::from_str_radix(hex, 16).map_err(|_| ()),
            None => U256::from_dec_str(token).map_err(|_| ()),
        }
        .map_err(|_| MarketError::validation(format!("invalid token id: {}", self.token_id)))?;

        let price = EtherAmount::parse(&self.price)?;
        Ok((nft_contract, token_id, price))
    }
}

/// A transaction the submitter can send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxRequest {
    /// Approve the marketplace as operator on the configured NFT contract.
    Approve,
    /// Create a listing from user input.
    List(ListingDraft),
    /// Buy a listing, paying `price`.
    Buy {
        /// Listing to buy.
        id: ListingId,
        /// Payment attached to the call.
        price: EtherAmount,
    },
    /// Cancel a listing.
    Cancel {
        /// Listing to cancel.
        id: ListingId,
    },
}

impl TxRequest {
    /// Returns the transaction kind.
    #[must_use]
    pub const fn kind(&self) -> TxKind {
        match self {
            Self::Approve => TxKind::Approve,
            Self::List(_) => TxKind::List,
            Self::Buy { .. } => TxKind::Buy,
            Self::Cancel { .. } => TxKind::Cancel,
        }
    }
}

/// Submits marketplace transactions for the connected account.
#[derive(Debug, Clone)]
pub struct TransactionSubmitter {
    signer: Arc<dyn MarketplaceSigner>,
    marketplace: Address,
    nft_contract: Address,
}

impl TransactionSubmitter {
    /// Creates a submitter.
    ///
    /// # Arguments
    ///
    /// * `signer` - Signing handle of the connected account
    /// * `marketplace` - Marketplace contract, the operator being approved
    /// * `nft_contract` - NFT contract the approval targets
    #[must_use]
    pub fn new(
        signer: Arc<dyn MarketplaceSigner>,
        marketplace: Address,
        nft_contract: Address,
    ) -> Self {
        Self {
            signer,
            marketplace,
            nft_contract,
        }
    }

    /// Sends `request` and waits for confirmation.
    ///
    /// # Errors
    ///
    /// See the individual operations.
    pub async fn submit(&self, request: &TxRequest) -> MarketResult<TxReceipt> {
        match request {
            TxRequest::Approve => self.approve_marketplace().await,
            TxRequest::List(draft) => self.list_nft(draft).await,
            TxRequest::Buy { id, price } => self.buy_nft(*id, price).await,
            TxRequest::Cancel { id } => self.cancel_listing(*id).await,
        }
    }

    /// Grants the marketplace transfer rights over all of the account's
    /// tokens on the configured NFT contract.
    ///
    /// Always submits, even if the approval already exists.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Transaction`] if the transaction fails.
    pub async fn approve_marketplace(&self) -> MarketResult<TxReceipt> {
        tracing::info!(
            nft = ?self.nft_contract,
            operator = ?self.marketplace,
            "submitting marketplace approval"
        );
        let receipt = self
            .signer
            .set_approval_for_all(self.nft_contract, self.marketplace, true)
            .await
            .map_err(MarketError::Transaction)?;
        log_confirmed(TxKind::Approve, &receipt);
        Ok(receipt)
    }

    /// Creates a listing from user input.
    ///
    /// # Errors
    ///
    /// Returns a validation or domain error if the draft cannot be parsed
    /// (nothing is submitted), or [`MarketError::Transaction`] if the
    /// transaction fails.
    pub async fn list_nft(&self, draft: &ListingDraft) -> MarketResult<TxReceipt> {
        let (nft_contract, token_id, price) = draft.parse()?;
        tracing::info!(nft = ?nft_contract, %token_id, %price, "submitting listing");
        let receipt = self
            .signer
            .list_nft(nft_contract, token_id, price.wei())
            .await
            .map_err(MarketError::Transaction)?;
        log_confirmed(TxKind::List, &receipt);
        Ok(receipt)
    }

    /// Buys listing `id`, attaching `price` as payment.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Transaction`] if the transaction fails,
    /// including when `price` no longer matches the on-chain price.
    pub async fn buy_nft(&self, id: ListingId, price: &EtherAmount) -> MarketResult<TxReceipt> {
        tracing::info!(listing_id = %id, %price, "submitting purchase");
        let receipt = self
            .signer
            .buy_nft(id, price.wei())
            .await
            .map_err(MarketError::Transaction)?;
        log_confirmed(TxKind::Buy, &receipt);
        Ok(receipt)
    }

    /// Cancels listing `id`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Transaction`] if the transaction fails.
    pub async fn cancel_listing(&self, id: ListingId) -> MarketResult<TxReceipt> {
        tracing::info!(listing_id = %id, "submitting cancellation");
        let receipt = self
            .signer
            .cancel_listing(id)
            .await
            .map_err(MarketError::Transaction)?;
        log_confirmed(TxKind::Cancel, &receipt);
        Ok(receipt)
    }
}

fn log_confirmed(kind: TxKind, receipt: &TxReceipt) {
    tracing::info!(
        %kind,
        tx_hash = %receipt.tx_hash,
        block = receipt.block_number,
        gas_used = receipt.gas_used,
        "transaction confirmed"
    );
}
