//! # Runtime
//!
//! Drives [`AppState`] by executing the commands its transitions emit.
//!
//! Events are processed one at a time from a queue. For each event the pure
//! transition runs first, then its commands execute in order; each command's
//! outcome becomes the next queued event. A failed command still produces an
//! event (`ListingsFailed`, `TransactionFailed`, `ConnectFailed`) so the state
//! machine sees every outcome, and the first error is returned to the caller.

use crate::application::error::{MarketError, MarketResult};
use crate::application::interaction::UserInteraction;
use crate::application::services::{
    ConnectionManager, ListingReader, TransactionSubmitter, TxRequest,
};
use crate::application::state::{AppState, Command, Event, Transition};
use crate::application::view::{View, render};
use crate::config::MarketConfig;
use crate::domain::value_objects::{EtherAmount, ListingId};
use crate::infrastructure::blockchain::{MarketplaceReader, WalletSession};
use ethers::types::Address;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// Handles held for the connected account.
#[derive(Debug)]
struct ActiveSession {
    account: Address,
    reader: Arc<dyn MarketplaceReader>,
    listings: ListingReader,
    submitter: TransactionSubmitter,
}

/// A command that failed, with the event reporting the failure.
struct Failure {
    event: Event,
    error: MarketError,
}

impl Failure {
    fn new(event: Event, error: MarketError) -> Self {
        Self { event, error }
    }
}

/// The marketplace client.
pub struct MarketApp {
    state: AppState,
    connection: ConnectionManager,
    session: Option<ActiveSession>,
    interaction: Arc<dyn UserInteraction>,
    marketplace: Address,
    nft_contract: Address,
}

impl fmt::Debug for MarketApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarketApp")
            .field("state", &self.state)
            .field("connection", &self.connection)
            .field("session", &self.session)
            .field("marketplace", &self.marketplace)
            .field("nft_contract", &self.nft_contract)
            .finish_non_exhaustive()
    }
}

impl MarketApp {
    /// Creates a disconnected client for a validated `config`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Configuration`] if `config` fails validation.
    pub fn new(
        config: &MarketConfig,
        connection: ConnectionManager,
        interaction: Arc<dyn UserInteraction>,
    ) -> MarketResult<Self> {
        config.validate()?;
        Ok(Self {
            state: AppState::new(config.network()),
            connection,
            session: None,
            interaction,
            marketplace: config.marketplace_address(),
            nft_contract: config.nft_address(),
        })
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Renders the current state.
    #[must_use]
    pub fn view(&self) -> View {
        render(&self.state)
    }

    /// Connects the wallet, then loads listings.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::NoWallet`] when no wallet exists, or the
    /// connection or fetch error otherwise.
    pub async fn connect(&mut self) -> MarketResult<()> {
        self.dispatch(Event::ConnectRequested).await
    }

    /// Re-reads all listings. Does nothing while disconnected.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Fetch`] if the load fails.
    pub async fn load_listings(&mut self) -> MarketResult<()> {
        self.dispatch(Event::RefreshRequested).await
    }

    /// Approves the marketplace as operator on the configured NFT contract.
    ///
    /// # Errors
    ///
    /// Returns an error if not connected or the transaction fails.
    pub async fn approve_marketplace(&mut self) -> MarketResult<()> {
        self.dispatch(Event::ApproveRequested).await
    }

    /// Prompts for listing fields and lists the NFT.
    ///
    /// # Errors
    ///
    /// Returns an error if not connected, the input is unusable, or the
    /// transaction fails.
    pub async fn list_nft(&mut self) -> MarketResult<()> {
        self.dispatch(Event::ListRequested).await
    }

    /// Buys listing `id`, paying `price`.
    ///
    /// # Errors
    ///
    /// Returns an error if not connected or the transaction fails.
    pub async fn buy_nft(&mut self, id: ListingId, price: EtherAmount) -> MarketResult<()> {
        self.dispatch(Event::BuyRequested { id, price }).await
    }

    /// Cancels listing `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if not connected or the transaction fails.
    pub async fn cancel_listing(&mut self, id: ListingId) -> MarketResult<()> {
        self.dispatch(Event::CancelRequested { id }).await
    }

    /// Reads whether the connected account has approved the marketplace.
    ///
    /// Returns `None` while disconnected.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Fetch`] if the call fails.
    pub async fn approval_status(&self) -> MarketResult<Option<bool>> {
        let Some(session) = &self.session else {
            return Ok(None);
        };
        let approved = session
            .reader
            .is_approved_for_all(self.nft_contract, session.account, self.marketplace)
            .await
            .map_err(MarketError::Fetch)?;
        Ok(Some(approved))
    }

    /// Processes `event` and every event that follows from it.
    ///
    /// # Errors
    ///
    /// Returns the first command failure. Later commands still run.
    pub async fn dispatch(&mut self, event: Event) -> MarketResult<()> {
        let mut queue = VecDeque::from([event]);
        let mut first_error = None;

        while let Some(event) = queue.pop_front() {
            tracing::debug!(event = event.name(), "applying event");
            let Transition { state, commands } = std::mem::take(&mut self.state).apply(event);
            self.state = state;

            for command in commands {
                match self.execute(command).await {
                    Ok(Some(next)) => queue.push_back(next),
                    Ok(None) => {}
                    Err(failure) => {
                        if failure.error.is_user_notice() {
                            tracing::info!(error = %failure.error, "user notice");
                        } else {
                            tracing::error!(
                                event = failure.event.name(),
                                error = %failure.error,
                                "command failed"
                            );
                        }
                        queue.push_back(failure.event);
                        first_error.get_or_insert(failure.error);
                    }
                }
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    async fn execute(&mut self, command: Command) -> Result<Option<Event>, Failure> {
        match command {
            Command::Connect => match self.connection.connect().await {
                Ok(session) => {
                    let account = session.account;
                    self.session = Some(self.activate(session));
                    Ok(Some(Event::Connected { account }))
                }
                Err(error) => {
                    let wallet_missing = matches!(error, MarketError::NoWallet);
                    Err(Failure::new(Event::ConnectFailed { wallet_missing }, error))
                }
            },
            Command::LoadListings => {
                let session = self
                    .session
                    .as_ref()
                    .ok_or_else(|| Failure::new(Event::ListingsFailed, MarketError::NotConnected))?;
                session
                    .listings
                    .load()
                    .await
                    .map(|listings| Some(Event::ListingsLoaded(listings)))
                    .map_err(|error| Failure::new(Event::ListingsFailed, error))
            }
            Command::PromptListing => {
                let input = self.interaction.request_listing().await;
                Ok(Some(Event::ListingInputReceived(input)))
            }
            Command::Submit(request) => self.submit(&request).await.map(Some),
            Command::Notify(notice) => {
                self.interaction.notify(notice).await;
                Ok(None)
            }
        }
    }

    async fn submit(&self, request: &TxRequest) -> Result<Event, Failure> {
        let kind = request.kind();
        let failed = |error| Failure::new(Event::TransactionFailed { kind }, error);
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| failed(MarketError::NotConnected))?;
        let receipt = session.submitter.submit(request).await.map_err(failed)?;
        Ok(Event::TransactionConfirmed { kind, receipt })
    }

    fn activate(&self, session: WalletSession) -> ActiveSession {
        ActiveSession {
            account: session.account,
            listings: ListingReader::new(Arc::clone(&session.reader)),
            submitter: TransactionSubmitter::new(
                session.signer,
                self.marketplace,
                self.nft_contract,
            ),
            reader: session.reader,
        }
    }
}
