//! # Session
//!
//! The connection state visible to the view: which account, if any, the
//! wallet has exposed. The signing handle itself lives in the runtime.

use ethers::types::Address;
use serde::{Deserialize, Serialize};

/// Wallet session as seen by the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Session {
    account: Option<Address>,
}

impl Session {
    /// A session with no connected account.
    #[must_use]
    pub const fn disconnected() -> Self {
        Self { account: None }
    }

    /// A session bound to `account`.
    #[must_use]
    pub const fn connected(account: Address) -> Self {
        Self {
            account: Some(account),
        }
    }

    /// Returns the connected account.
    #[inline]
    #[must_use]
    pub const fn account(&self) -> Option<Address> {
        self.account
    }

    /// Returns true once an account is connected.
    #[inline]
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.account.is_some()
    }
}
