//! Single-select checkout: reset the cart, add one unit, optionally check out.
//!
//! The widget only reports progress through its data callback, so the
//! command is a state machine advanced once per callback:
//!
//! ```text
//!            start
//!   None ────────────▶ AwaitingClear ──cart empty──▶ AwaitingConfirmation ──item present──▶ None
//!          (reset)                     (add 1)                             (checkout?)
//! ```
//!
//! [`PendingCommand::advance`] is pure: it returns the next state and at
//! most one effect for the caller to perform. A command that never sees the
//! callback it waits for stays parked; starting a new one replaces it.

use serde::{Deserialize, Serialize};

use crate::cart::NormalizedCart;

/// The in-flight single-select command, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PendingCommand {
    #[default]
    None,
    /// Reset issued; waiting for an empty cart.
    AwaitingClear { path: String, checkout: bool },
    /// Product pushed; waiting for it to show up in the cart.
    AwaitingConfirmation { path: String, checkout: bool },
}

/// A widget call the controller wants made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    ResetCart,
    AddProduct { path: String },
    Checkout,
}

/// Result of a state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: PendingCommand,
    pub effect: Option<Effect>,
}

impl Transition {
    const fn stay(state: PendingCommand) -> Self {
        Self {
            next: state,
            effect: None,
        }
    }
}

/// What to do when the initial reset of a single-select command fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Push the product, then wait for it to appear before checking out.
    #[default]
    AwaitConfirmation,
    /// Push the product and check out straight away, without confirmation.
    Immediate,
}

impl PendingCommand {
    /// Begin a command: the cart is reset first.
    #[must_use]
    pub fn start(path: impl Into<String>, checkout: bool) -> Transition {
        Transition {
            next: Self::AwaitingClear {
                path: path.into(),
                checkout,
            },
            effect: Some(Effect::ResetCart),
        }
    }

    /// Recover from a failed reset according to `policy`.
    ///
    /// Returns the next state and the effects to perform, in order.
    #[must_use]
    pub fn fallback(path: &str, checkout: bool, policy: FallbackPolicy) -> (Self, Vec<Effect>) {
        let add = Effect::AddProduct {
            path: path.to_string(),
        };
        match policy {
            FallbackPolicy::AwaitConfirmation => (
                Self::AwaitingConfirmation {
                    path: path.to_string(),
                    checkout,
                },
                vec![add],
            ),
            FallbackPolicy::Immediate => {
                let mut effects = vec![add];
                if checkout {
                    effects.push(Effect::Checkout);
                }
                (Self::None, effects)
            }
        }
    }

    /// React to a callback carrying `cart`.
    #[must_use]
    pub fn advance(&self, cart: &NormalizedCart) -> Transition {
        match self {
            Self::None => Transition::stay(Self::None),
            Self::AwaitingClear { path, checkout } => {
                if cart.is_empty() {
                    Transition {
                        next: Self::AwaitingConfirmation {
                            path: path.clone(),
                            checkout: *checkout,
                        },
                        effect: Some(Effect::AddProduct { path: path.clone() }),
                    }
                } else {
                    Transition::stay(self.clone())
                }
            }
            Self::AwaitingConfirmation { path, checkout } => {
                if cart.contains(path) {
                    Transition {
                        next: Self::None,
                        effect: checkout.then_some(Effect::Checkout),
                    }
                } else {
                    Transition::stay(self.clone())
                }
            }
        }
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Path of the product the command is about.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::AwaitingClear { path, .. } | Self::AwaitingConfirmation { path, .. } => Some(path),
        }
    }
}
