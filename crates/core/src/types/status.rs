//! Checkout widget lifecycle status.

use serde::{Deserialize, Serialize};

/// Lifecycle of the external checkout script.
///
/// ```text
/// idle ──attach──▶ loading ──load──▶ ready
///                     │
///                     └──error──▶ error
/// ```
///
/// A new storefront identifier restarts `loading` from either `ready` or
/// `error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WidgetStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

impl WidgetStatus {
    /// Returns `true` once the script has loaded.
    #[must_use]
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl std::fmt::Display for WidgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Loading => write!(f, "loading"),
            Self::Ready => write!(f, "ready"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for WidgetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(Self::Idle),
            "loading" => Ok(Self::Loading),
            "ready" => Ok(Self::Ready),
            "error" => Ok(Self::Error),
            _ => Err(format!("invalid widget status: {s}")),
        }
    }
}
