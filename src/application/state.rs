//! # Application State
//!
//! The client's state container and its transition function.
//!
//! State changes only through [`AppState::apply`], a pure function from
//! `(state, event)` to `(state, commands)`. Commands describe the side
//! effects to run next; the runtime executes them and feeds their outcomes
//! back in as events.
//!
//! # Transitions
//!
//! ```text
//! ConnectRequested          → [Connect]
//! Connected                 → session = account, [LoadListings]
//! ConnectFailed (no wallet) → [Notify(NoWallet)]
//! RefreshRequested          → [LoadListings] when connected
//! ListingsLoaded            → listings = result
//! ListingsFailed            → (listings unchanged)
//! ApproveRequested          → [Submit(Approve)]
//! ListRequested             → [PromptListing]
//! ListingInputReceived      → [Submit(List)] if every answer is present
//! BuyRequested              → [Submit(Buy)]
//! CancelRequested           → [Submit(Cancel)]
//! TransactionConfirmed      → [Notify(MarketplaceApproved)] for approvals,
//!                             [LoadListings] otherwise
//! TransactionFailed         → (nothing)
//! ```

use crate::application::interaction::{ListingInput, Notice};
use crate::application::services::{TxKind, TxRequest};
use crate::domain::entities::{Listing, Session};
use crate::domain::value_objects::{EtherAmount, ListingId};
use crate::infrastructure::blockchain::{Network, TxReceipt};
use ethers::types::Address;

/// Something that happened: a user action or an operation outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The user asked to connect a wallet.
    ConnectRequested,
    /// The wallet exposed `account`.
    Connected {
        /// Connected account.
        account: Address,
    },
    /// Connecting failed.
    ConnectFailed {
        /// True when no wallet exists at all.
        wallet_missing: bool,
    },
    /// The user asked to re-read listings.
    RefreshRequested,
    /// A listing load finished.
    ListingsLoaded(Vec<Listing>),
    /// A listing load failed.
    ListingsFailed,
    /// The user asked to approve the marketplace.
    ApproveRequested,
    /// The user asked to create a listing.
    ListRequested,
    /// The user answered the listing prompts.
    ListingInputReceived(ListingInput),
    /// The user asked to buy a listing at its displayed price.
    BuyRequested {
        /// Listing to buy.
        id: ListingId,
        /// Displayed price.
        price: EtherAmount,
    },
    /// The user asked to cancel a listing.
    CancelRequested {
        /// Listing to cancel.
        id: ListingId,
    },
    /// A transaction was confirmed.
    TransactionConfirmed {
        /// Kind of transaction.
        kind: TxKind,
        /// Confirmation receipt.
        receipt: TxReceipt,
    },
    /// A transaction failed.
    TransactionFailed {
        /// Kind of transaction.
        kind: TxKind,
    },
}

impl Event {
    /// Returns a short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ConnectRequested => "connect_requested",
            Self::Connected { .. } => "connected",
            Self::ConnectFailed { .. } => "connect_failed",
            Self::RefreshRequested => "refresh_requested",
            Self::ListingsLoaded(_) => "listings_loaded",
            Self::ListingsFailed => "listings_failed",
            Self::ApproveRequested => "approve_requested",
            Self::ListRequested => "list_requested",
            Self::ListingInputReceived(_) => "listing_input_received",
            Self::BuyRequested { .. } => "buy_requested",
            Self::CancelRequested { .. } => "cancel_requested",
            Self::TransactionConfirmed { .. } => "transaction_confirmed",
            Self::TransactionFailed { .. } => "transaction_failed",
        }
    }
}

/// A side effect for the runtime to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Connect to the wallet.
    Connect,
    /// Read all active listings.
    LoadListings,
    /// Ask the user for listing fields.
    PromptListing,
    /// Send a transaction and wait for it.
    Submit(TxRequest),
    /// Show a notice.
    Notify(Notice),
}

/// Result of applying an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State after the event.
    pub state: AppState,
    /// Side effects to run, in order.
    pub commands: Vec<Command>,
}

impl Transition {
    fn new(state: AppState, commands: Vec<Command>) -> Self {
        Self { state, commands }
    }
}

/// Connection status and the last successfully loaded listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    network: Network,
    session: Session,
    listings: Vec<Listing>,
}

impl AppState {
    /// Creates a disconnected state for `network`.
    #[must_use]
    pub fn new(network: Network) -> Self {
        Self {
            network,
            session: Session::disconnected(),
            listings: Vec::new(),
        }
    }

    /// Returns the network.
    #[inline]
    #[must_use]
    pub fn network(&self) -> Network {
        self.network
    }

    /// Returns the session.
    #[inline]
    #[must_use]
    pub fn session(&self) -> Session {
        self.session
    }

    /// Returns the connected account.
    #[inline]
    #[must_use]
    pub fn account(&self) -> Option<Address> {
        self.session.account()
    }

    /// Returns the current listings.
    #[inline]
    #[must_use]
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    /// Applies `event`, returning the new state and the commands to run.
    #[must_use]
    pub fn apply(self, event: Event) -> Transition {
        match event {
            Event::ConnectRequested => Transition::new(self, vec![Command::Connect]),
            Event::Connected { account } => Transition::new(
                Self {
                    session: Session::connected(account),
                    ..self
                },
                vec![Command::LoadListings],
            ),
            Event::ConnectFailed { wallet_missing } => {
                let commands = if wallet_missing {
                    vec![Command::Notify(Notice::NoWallet)]
                } else {
                    Vec::new()
                };
                Transition::new(self, commands)
            }
            Event::RefreshRequested => {
                let commands = if self.session.is_connected() {
                    vec![Command::LoadListings]
                } else {
                    Vec::new()
                };
                Transition::new(self, commands)
            }
            Event::ListingsLoaded(listings) => {
                Transition::new(Self { listings, ..self }, Vec::new())
            }
            Event::ListingsFailed => Transition::new(self, Vec::new()),
            Event::ApproveRequested => {
                Transition::new(self, vec![Command::Submit(TxRequest::Approve)])
            }
            Event::ListRequested => Transition::new(self, vec![Command::PromptListing]),
            Event::ListingInputReceived(input) => {
                let commands = input
                    .into_draft()
                    .map(|draft| vec![Command::Submit(TxRequest::List(draft))])
                    .unwrap_or_default();
                Transition::new(self, commands)
            }
            Event::BuyRequested { id, price } => {
                Transition::new(self, vec![Command::Submit(TxRequest::Buy { id, price })])
            }
            Event::CancelRequested { id } => {
                Transition::new(self, vec![Command::Submit(TxRequest::Cancel { id })])
            }
            Event::TransactionConfirmed { kind, .. } => {
                let command = if kind.changes_listings() {
                    Command::LoadListings
                } else {
                    Command::Notify(Notice::MarketplaceApproved)
                };
                Transition::new(self, vec![command])
            }
            Event::TransactionFailed { .. } => Transition::new(self, Vec::new()),
        }
    }
}
