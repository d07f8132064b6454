//! # Presentation Layer
//!
//! Front ends driving [`MarketApp`](crate::application::MarketApp).

pub mod terminal;

pub use terminal::{Choice, TerminalInteraction, parse_choice};
