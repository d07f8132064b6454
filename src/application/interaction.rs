//! # User Interaction
//!
//! The two capabilities the core needs from whatever presents it: asking the
//! user for the fields of a new listing, and telling the user something.

use crate::application::services::ListingDraft;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Messages shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    /// No wallet is available to connect to.
    NoWallet,
    /// The marketplace approval transaction was confirmed.
    MarketplaceApproved,
}

impl Notice {
    /// Returns the text shown to the user.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::NoWallet => "No wallet available. Install a wallet or configure a signing key.",
            Self::MarketplaceApproved => "Marketplace approved for NFT transfers",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Answers to the three listing prompts. `None` means the prompt was dismissed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingInput {
    /// NFT contract address.
    pub nft_contract: Option<String>,
    /// Token identifier.
    pub token_id: Option<String>,
    /// Price in ether.
    pub price: Option<String>,
}

impl ListingInput {
    /// Input with all three answers given.
    #[must_use]
    pub fn new(
        nft_contract: impl Into<String>,
        token_id: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            nft_contract: Some(nft_contract.into()),
            token_id: Some(token_id.into()),
            price: Some(price.into()),
        }
    }

    /// Input where every prompt was dismissed.
    #[must_use]
    pub fn cancelled() -> Self {
        Self::default()
    }

    /// Returns a draft if every answer is present and non-blank.
    #[must_use]
    pub fn into_draft(self) -> Option<ListingDraft> {
        let answer = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        Some(ListingDraft::new(
            answer(self.nft_contract)?,
            answer(self.token_id)?,
            answer(self.price)?,
        ))
    }
}

/// Presentation-layer capabilities used by the runtime.
#[async_trait]
pub trait UserInteraction: Send + Sync {
    /// Asks for the NFT contract address, token id and price of a new listing.
    async fn request_listing(&self) -> ListingInput;

    /// Shows `notice` to the user.
    async fn notify(&self, notice: Notice);
}
