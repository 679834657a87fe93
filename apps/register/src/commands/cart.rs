//! # Cart Commands
//!
//! Commands for cart manipulation and the tendered amount.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Tendered │────►│ Recorded │       │
//! │  │  Cart    │     │          │     │  Amount  │     │   Sale   │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                              │
//! │                   add_to_cart       set_tendered     checkout           │
//! │                   change_quantity   calculator       (sale.rs)          │
//! │                   remove_from_cart                                      │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────────►                   │
//! │                                                      (back to empty)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart lives only in memory; none of these commands touch the database.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::RegisterState;
use till_core::{CartLine, Money, QuantityChange, RegisterSession};

/// Cart response including lines and totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
}

/// Totals shown under the cart, in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Sum of line totals (the amount receivable)
    pub receivable_cents: i64,
    /// Sum of quantities
    pub total_units: u32,
    pub tendered_cents: i64,
    /// Change for the tendered amount, never below zero
    pub change_due_cents: i64,
}

impl From<&RegisterSession> for CartResponse {
    fn from(session: &RegisterSession) -> Self {
        CartResponse {
            lines: session.cart().lines().to_vec(),
            totals: CartTotals {
                receivable_cents: session.receivable().cents(),
                total_units: session.cart().total_units(),
                tendered_cents: session.tendered().cents(),
                change_due_cents: session.change_due().cents(),
            },
        }
    }
}

/// Gets the current cart contents.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Cart Panel (always visible on the register screen)                    │
/// │                                                                         │
/// │  ┌────────────────────────────────────────────────────────────────┐    │
/// │  │  CART                                              4 items     │    │
/// │  ├────────────────────────────────────────────────────────────────┤    │
/// │  │  Americano               [-] 3 [+]              195.00   [x]   │    │
/// │  │  Hand-made Cookies (Box) [-] 1 [+]              120.00   [x]   │    │
/// │  ├────────────────────────────────────────────────────────────────┤    │
/// │  │  Receivable:                                    315.00         │    │
/// │  │  Tendered:                                      400.00         │    │
/// │  │  Change:                                         85.00         │    │
/// │  └────────────────────────────────────────────────────────────────┘    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn get_cart(register: &RegisterState) -> CartResponse {
    debug!("get_cart command");
    let session = register.lock().await;
    CartResponse::from(&*session)
}

/// Adds one unit of a product to the cart.
///
/// ## Errors
/// - `INSUFFICIENT_STOCK` if the cart already holds all the stock
///
/// Unknown product ids are ignored and the unchanged cart is returned.
pub async fn add_to_cart(
    register: &RegisterState,
    product_id: u64,
) -> Result<CartResponse, ApiError> {
    debug!(product_id = product_id, "add_to_cart command");

    let mut session = register.lock().await;
    session.add_to_cart(product_id)?;

    info!(
        product_id = product_id,
        units = session.cart().total_units(),
        "Added to cart"
    );
    Ok(CartResponse::from(&*session))
}

/// Increments or decrements a cart line. Decrementing the last unit
/// removes the line.
pub async fn change_quantity(
    register: &RegisterState,
    product_id: u64,
    change: QuantityChange,
) -> Result<CartResponse, ApiError> {
    debug!(product_id = product_id, change = ?change, "change_quantity command");

    let mut session = register.lock().await;
    session.change_quantity(product_id, change)?;

    Ok(CartResponse::from(&*session))
}

/// Removes a line from the cart.
pub async fn remove_from_cart(register: &RegisterState, product_id: u64) -> CartResponse {
    debug!(product_id = product_id, "remove_from_cart command");

    let mut session = register.lock().await;
    session.remove_from_cart(product_id);

    CartResponse::from(&*session)
}

/// Clears all lines and the tendered amount.
pub async fn clear_cart(register: &RegisterState) -> CartResponse {
    debug!("clear_cart command");

    let mut session = register.lock().await;
    session.clear_cart();

    info!("Cart cleared");
    CartResponse::from(&*session)
}

/// Sets the cash tendered, as typed into the payment field.
///
/// ## Errors
/// - `VALIDATION_ERROR` for a negative amount
pub async fn set_tendered(
    register: &RegisterState,
    amount_cents: i64,
) -> Result<CartResponse, ApiError> {
    debug!(amount_cents = amount_cents, "set_tendered command");

    if amount_cents < 0 {
        return Err(ApiError::validation("Tendered amount cannot be negative"));
    }

    let mut session = register.lock().await;
    session.set_tendered(Money::from_cents(amount_cents));

    Ok(CartResponse::from(&*session))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::fresh;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_add_and_totals() {
        let (_db, register) = fresh().await;

        for _ in 0..3 {
            add_to_cart(&register, 201).await.unwrap();
        }
        let cart = set_tendered(&register, 25000).await.unwrap();

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 3);
        assert_eq!(cart.totals.receivable_cents, 19500);
        assert_eq!(cart.totals.total_units, 3);
        assert_eq!(cart.totals.tendered_cents, 25000);
        assert_eq!(cart.totals.change_due_cents, 5500);
    }

    #[tokio::test]
    async fn test_change_never_negative() {
        let (_db, register) = fresh().await;
        add_to_cart(&register, 101).await.unwrap();

        let cart = set_tendered(&register, 100).await.unwrap();
        assert_eq!(cart.totals.change_due_cents, 0);
    }

    #[tokio::test]
    async fn test_stock_limit_reported() {
        let (_db, register) = fresh().await;
        {
            let mut session = register.lock().await;
            let product = session.catalog().find(102).cloned().unwrap();
            session
                .upsert_product(
                    Some(102),
                    till_core::ProductDraft {
                        name: product.name,
                        price: product.price,
                        category: product.category,
                        stock: till_core::Stock::Bounded(1),
                    },
                )
                .unwrap();
        }

        add_to_cart(&register, 102).await.unwrap();
        let err = add_to_cart(&register, 102).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        let cart = get_cart(&register).await;
        assert_eq!(cart.lines[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_decrement_last_unit_removes_line() {
        let (_db, register) = fresh().await;
        add_to_cart(&register, 201).await.unwrap();

        let cart = change_quantity(&register, 201, QuantityChange::Decrease)
            .await
            .unwrap();
        assert!(cart.lines.is_empty());
    }

    #[tokio::test]
    async fn test_clear_resets_tendered() {
        let (_db, register) = fresh().await;
        add_to_cart(&register, 201).await.unwrap();
        set_tendered(&register, 1000).await.unwrap();

        let cart = clear_cart(&register).await;
        assert!(cart.lines.is_empty());
        assert_eq!(cart.totals.tendered_cents, 0);
    }

    #[tokio::test]
    async fn test_negative_tendered_rejected() {
        let (_db, register) = fresh().await;
        let err = set_tendered(&register, -1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_remove_unknown_line_is_noop() {
        let (_db, register) = fresh().await;
        add_to_cart(&register, 201).await.unwrap();

        let cart = remove_from_cart(&register, 999).await;
        assert_eq!(cart.lines.len(), 1);
    }
}
