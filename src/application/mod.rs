//! # Application Layer
//!
//! Services, the client state machine, its runtime and the view renderer.

pub mod error;
pub mod interaction;
pub mod runtime;
pub mod services;
pub mod state;
pub mod view;

pub use error::{MarketError, MarketResult};
pub use interaction::{ListingInput, Notice, UserInteraction};
pub use runtime::MarketApp;
pub use state::{AppState, Command, Event, Transition};
pub use view::{Button, ConnectionView, ListingCard, View, render};
