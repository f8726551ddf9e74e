//! The external checkout widget, as the integration sees it.
//!
//! Every call is fire-and-forget: the widget reports the resulting cart
//! through its data callback, never through a return value. A call can only
//! fail up front, because the widget (or the method) is missing or it threw.

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A product line for [`CheckoutWidget::push`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLine {
    pub path: String,
    pub quantity: u32,
}

impl ProductLine {
    #[must_use]
    pub fn new(path: impl Into<String>, quantity: u32) -> Self {
        Self {
            path: path.into(),
            quantity,
        }
    }
}

/// Widget methods the integration calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetMethod {
    Push,
    Update,
    Reset,
    Checkout,
}

impl fmt::Display for WidgetMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Push => write!(f, "push"),
            Self::Update => write!(f, "update"),
            Self::Reset => write!(f, "reset"),
            Self::Checkout => write!(f, "checkout"),
        }
    }
}

/// Why a widget call did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetError {
    #[error("checkout widget is not available ({method})")]
    Unavailable { method: WidgetMethod },

    #[error("checkout widget {method} failed: {message}")]
    Failed {
        method: WidgetMethod,
        message: String,
    },
}

impl WidgetError {
    #[must_use]
    pub const fn method(&self) -> WidgetMethod {
        match self {
            Self::Unavailable { method } | Self::Failed { method, .. } => *method,
        }
    }
}

/// The widget's cart API.
pub trait CheckoutWidget {
    /// Add product lines to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the widget is missing or the call threw.
    fn push(&mut self, products: &[ProductLine]) -> Result<(), WidgetError>;

    /// Set the quantity of a product already in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the widget is missing or the call threw.
    fn update(&mut self, path: &str, quantity: u32) -> Result<(), WidgetError>;

    /// Empty the cart and re-emit the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the widget is missing or the call threw.
    fn reset(&mut self) -> Result<(), WidgetError>;

    /// Open the checkout popup.
    ///
    /// # Errors
    ///
    /// Returns an error if the widget is missing or the call threw.
    fn checkout(&mut self) -> Result<(), WidgetError>;
}

// =============================================================================
// Recording double
// =============================================================================

/// A widget call, as recorded by [`RecordingWidget`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum WidgetCall {
    Push { products: Vec<ProductLine> },
    Update { path: String, quantity: u32 },
    Reset,
    Checkout,
}

impl WidgetCall {
    #[must_use]
    pub const fn method(&self) -> WidgetMethod {
        match self {
            Self::Push { .. } => WidgetMethod::Push,
            Self::Update { .. } => WidgetMethod::Update,
            Self::Reset => WidgetMethod::Reset,
            Self::Checkout => WidgetMethod::Checkout,
        }
    }
}

/// In-memory widget that records calls instead of making them.
///
/// Used by tests and the scenario runner. Methods can be made to fail to
/// exercise the degraded paths.
#[derive(Debug, Default, Clone)]
pub struct RecordingWidget {
    calls: Vec<WidgetCall>,
    unavailable: bool,
    failing: Vec<WidgetMethod>,
}

impl RecordingWidget {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A widget whose every call fails as "not available".
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Make calls to `method` throw.
    pub fn fail(&mut self, method: WidgetMethod) {
        if !self.failing.contains(&method) {
            self.failing.push(method);
        }
    }

    /// Let calls to `method` succeed again.
    pub fn recover(&mut self, method: WidgetMethod) {
        self.failing.retain(|m| *m != method);
    }

    pub fn set_available(&mut self, available: bool) {
        self.unavailable = !available;
    }

    /// Calls made so far, oldest first. Failed calls are not recorded.
    #[must_use]
    pub fn calls(&self) -> &[WidgetCall] {
        &self.calls
    }

    /// Take the recorded calls, leaving the log empty.
    pub fn take_calls(&mut self) -> Vec<WidgetCall> {
        std::mem::take(&mut self.calls)
    }

    /// Number of recorded calls to `method`.
    #[must_use]
    pub fn count(&self, method: WidgetMethod) -> usize {
        self.calls.iter().filter(|c| c.method() == method).count()
    }

    fn record(&mut self, call: WidgetCall) -> Result<(), WidgetError> {
        let method = call.method();
        if self.unavailable {
            return Err(WidgetError::Unavailable { method });
        }
        if self.failing.contains(&method) {
            return Err(WidgetError::Failed {
                method,
                message: "simulated failure".to_string(),
            });
        }
        self.calls.push(call);
        Ok(())
    }
}

impl CheckoutWidget for RecordingWidget {
    fn push(&mut self, products: &[ProductLine]) -> Result<(), WidgetError> {
        self.record(WidgetCall::Push {
            products: products.to_vec(),
        })
    }

    fn update(&mut self, path: &str, quantity: u32) -> Result<(), WidgetError> {
        self.record(WidgetCall::Update {
            path: path.to_string(),
            quantity,
        })
    }

    fn reset(&mut self) -> Result<(), WidgetError> {
        self.record(WidgetCall::Reset)
    }

    fn checkout(&mut self) -> Result<(), WidgetError> {
        self.record(WidgetCall::Checkout)
    }
}
