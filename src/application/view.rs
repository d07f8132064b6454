//! # View Renderer
//!
//! Pure rendering of [`AppState`] into a presentation-neutral view tree.
//! Every button carries the [`Event`] it triggers, so a front end only has to
//! draw labels and dispatch whichever event the user picks.

use crate::application::state::{AppState, Event};
use crate::domain::entities::Listing;
use ethers::types::Address;
use ethers::utils::to_checksum;
use std::fmt;

/// A clickable action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Text shown on the button.
    pub label: String,
    /// Event dispatched when the button is pressed.
    pub event: Event,
}

impl Button {
    fn new(label: impl Into<String>, event: Event) -> Self {
        Self {
            label: label.into(),
            event,
        }
    }
}

/// Connection indicator. When disconnected it doubles as the connect button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionView {
    /// No account; pressing connects.
    Disconnected(Button),
    /// Label showing the connected account.
    Connected(String),
}

/// One rendered listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingCard {
    /// Detail lines: id, NFT contract, token id, price.
    pub lines: Vec<String>,
    /// Buy for other sellers' listings, Cancel for the account's own.
    pub action: Button,
}

/// The rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// Heading including the network name.
    pub title: String,
    /// Connection status.
    pub connection: ConnectionView,
    /// Approve and list buttons.
    pub actions: Vec<Button>,
    /// Active listings in id order.
    pub listings: Vec<ListingCard>,
}

impl View {
    /// Returns every button in display order.
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        let connect = match &self.connection {
            ConnectionView::Disconnected(button) => Some(button),
            ConnectionView::Connected(_) => None,
        };
        connect
            .into_iter()
            .chain(self.actions.iter())
            .chain(self.listings.iter().map(|card| &card.action))
    }
}

/// Renders `state`.
#[must_use]
pub fn render(state: &AppState) -> View {
    let account = state.account();
    let connection = match account {
        None => ConnectionView::Disconnected(Button::new(
            "Connect Wallet",
            Event::ConnectRequested,
        )),
        Some(account) => ConnectionView::Connected(format!(
            "Connected: {}",
            to_checksum(&account, None)
        )),
    };

    View {
        title: format!("NFT Mini Marketplace ({})", state.network().display_name()),
        connection,
        actions: vec![
            Button::new("Approve Marketplace", Event::ApproveRequested),
            Button::new("List NFT", Event::ListRequested),
        ],
        listings: state
            .listings()
            .iter()
            .map(|listing| card(listing, account))
            .collect(),
    }
}

fn card(listing: &Listing, account: Option<Address>) -> ListingCard {
    let own = account.is_some_and(|account| listing.is_sold_by(account));
    let action = if own {
        Button::new("Cancel", Event::CancelRequested { id: listing.id() })
    } else {
        Button::new(
            "Buy",
            Event::BuyRequested {
                id: listing.id(),
                price: listing.price(),
            },
        )
    };

    ListingCard {
        lines: vec![
            format!("ID: {}", listing.id()),
            format!("NFT: {}", to_checksum(&listing.nft_contract(), None)),
            format!("Token ID: {}", listing.token_id()),
            format!("Price: {} ETH", listing.price()),
        ],
        action,
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.title)?;
        let mut number = 1;
        match &self.connection {
            ConnectionView::Disconnected(button) => {
                writeln!(f, "[{number}] {}", button.label)?;
                number += 1;
            }
            ConnectionView::Connected(label) => writeln!(f, "{label}")?,
        }
        for button in &self.actions {
            writeln!(f, "[{number}] {}", button.label)?;
            number += 1;
        }

        writeln!(f)?;
        writeln!(f, "Listings")?;
        if self.listings.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for card in &self.listings {
            for line in &card.lines {
                writeln!(f, "  {line}")?;
            }
            writeln!(f, "  [{number}] {}", card.action.label)?;
            writeln!(f)?;
            number += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{EtherAmount, ListingId};
    use crate::infrastructure::blockchain::Network;
    use ethers::types::U256;

    fn alice() -> Address {
        Address::from_low_u64_be(0xa11ce)
    }

    fn bob() -> Address {
        Address::from_low_u64_be(0xb0b)
    }

    fn listing(id: u64, seller: Address, price: &str) -> Listing {
        Listing::new(
            ListingId::new(id).unwrap(),
            seller,
            Address::from_low_u64_be(0x4f7),
            U256::from(42),
            EtherAmount::parse(price).unwrap(),
            true,
        )
    }

    fn state(account: Option<Address>, listings: Vec<Listing>) -> AppState {
        let mut state = AppState::new(Network::Sepolia);
        if let Some(account) = account {
            state = state.apply(Event::Connected { account }).state;
        }
        state.apply(Event::ListingsLoaded(listings)).state
    }

    mod connection {
        use super::*;

        #[test]
        fn disconnected_offers_connect() {
            let view = render(&AppState::default());
            assert_eq!(
                view.connection,
                ConnectionView::Disconnected(Button::new("Connect Wallet", Event::ConnectRequested))
            );
        }

        #[test]
        fn connected_shows_checksummed_account() {
            let view = render(&state(Some(alice()), vec![]));
            assert_eq!(
                view.connection,
                ConnectionView::Connected(format!("Connected: {}", to_checksum(&alice(), None)))
            );
        }

        #[test]
        fn approve_and_list_always_present() {
            for s in [AppState::default(), state(Some(alice()), vec![])] {
                let view = render(&s);
                let labels: Vec<&str> = view.actions.iter().map(|b| b.label.as_str()).collect();
                assert_eq!(labels, vec!["Approve Marketplace", "List NFT"]);
            }
        }
    }

    mod listings {
        use super::*;

        #[test]
        fn own_listing_offers_cancel() {
            let view = render(&state(Some(alice()), vec![listing(1, alice(), "1")]));
            let action = &view.listings[0].action;
            assert_eq!(action.label, "Cancel");
            assert_eq!(
                action.event,
                Event::CancelRequested {
                    id: ListingId::new(1).unwrap()
                }
            );
        }

        #[test]
        fn foreign_listing_offers_buy_at_displayed_price() {
            let view = render(&state(Some(alice()), vec![listing(3, bob(), "1.5")]));
            let action = &view.listings[0].action;
            assert_eq!(action.label, "Buy");
            assert_eq!(
                action.event,
                Event::BuyRequested {
                    id: ListingId::new(3).unwrap(),
                    price: EtherAmount::parse("1.5").unwrap(),
                }
            );
        }

        #[test]
        fn disconnected_always_offers_buy() {
            let view = render(&state(None, vec![listing(1, alice(), "1")]));
            assert_eq!(view.listings[0].action.label, "Buy");
        }

        #[test]
        fn card_shows_details() {
            let view = render(&state(None, vec![listing(7, bob(), "0.25")]));
            let lines = &view.listings[0].lines;
            assert_eq!(lines[0], "ID: 7");
            assert_eq!(lines[2], "Token ID: 42");
            assert_eq!(lines[3], "Price: 0.25 ETH");
        }
    }

    mod text {
        use super::*;

        #[test]
        fn buttons_are_numbered_in_order() {
            let view = render(&state(
                None,
                vec![listing(1, bob(), "1"), listing(2, bob(), "2")],
            ));
            let labels: Vec<&str> = view.buttons().map(|b| b.label.as_str()).collect();
            assert_eq!(labels, vec!["Connect Wallet", "Approve Marketplace", "List NFT", "Buy", "Buy"]);

            let text = view.to_string();
            assert!(text.starts_with("== NFT Mini Marketplace (Sepolia) =="));
            assert!(text.contains("[1] Connect Wallet"));
            assert!(text.contains("[5] Buy"));
        }

        #[test]
        fn empty_listing_set_is_marked() {
            let text = render(&state(Some(alice()), vec![])).to_string();
            assert!(text.contains("(none)"));
            assert!(!text.contains("[3]"));
        }
    }
}
