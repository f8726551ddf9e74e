//! Cart actions as the page scripts request them.
//!
//! Scripts pass either a product path or a catalog item object, an optional
//! quantity and, for single-select, an optional checkout flag. Omitted
//! arguments take the defaults the facade documents: one unit, and checkout
//! after selecting.

use popup_demo_core::{CheckoutWidget, Integration, IntegrationError, Page, ProductRef};
use serde_json::Value;

/// A cart action with its arguments resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    Add { product: ProductRef, quantity: u32 },
    AddForce { product: ProductRef, quantity: u32 },
    SelectSingle { product: ProductRef, checkout: bool },
}

impl CartAction {
    #[must_use]
    pub fn add(product: &Value, quantity: Option<u32>) -> Self {
        Self::Add {
            product: ProductRef::from_value(product),
            quantity: quantity.unwrap_or(1),
        }
    }

    #[must_use]
    pub fn add_force(product: &Value, quantity: Option<u32>) -> Self {
        Self::AddForce {
            product: ProductRef::from_value(product),
            quantity: quantity.unwrap_or(1),
        }
    }

    #[must_use]
    pub fn select_single(product: &Value, checkout: Option<bool>) -> Self {
        Self::SelectSingle {
            product: ProductRef::from_value(product),
            checkout: checkout.unwrap_or(true),
        }
    }

    /// Run the action on the facade.
    ///
    /// # Errors
    ///
    /// Returns whatever the facade action returns; the user has already been
    /// alerted where that applies.
    pub fn run<W: CheckoutWidget, P: Page>(
        self,
        facade: &mut Integration<W, P>,
    ) -> Result<(), IntegrationError> {
        match self {
            Self::Add { product, quantity } => facade.add_to_cart(product, quantity),
            Self::AddForce { product, quantity } => facade.add_to_cart_force(product, quantity),
            Self::SelectSingle { product, checkout } => {
                facade.select_single_and_checkout(product, checkout)
            }
        }
    }
}
