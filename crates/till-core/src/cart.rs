//! # Cart
//!
//! The lines being rung up for the current customer.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Front end action       Operation                 Cart change           │
//! │  ────────────────       ─────────                 ───────────           │
//! │                                                                         │
//! │  Tap product ─────────► add_item() ─────────────► new line (qty 1)     │
//! │                                                   or qty + 1 (≤ stock) │
//! │                                                                         │
//! │  Tap + / − ───────────► change_quantity() ──────► qty ± 1              │
//! │                                                   (line removed at 0)  │
//! │                                                                         │
//! │  Tap remove ──────────► remove_item() ──────────► line dropped         │
//! │                                                                         │
//! │  Tap clear ───────────► clear() ────────────────► no lines             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per product
//! - Every line has quantity ≥ 1
//! - An increment never takes a bounded line past the product's stock
//!
//! The FIRST add of a product is never checked against stock, so a product
//! with zero stock can still get a quantity-1 line. Checkout then saturates
//! the stock at zero.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{self, Money};
use crate::types::Product;

// =============================================================================
// Cart Line
// =============================================================================

/// One product in the cart.
///
/// ## Snapshot Semantics
/// `name` and `unit_price` are copied from the product when the line is
/// created. Editing the product afterwards does not change the line, so the
/// customer pays the price shown when the item was rung up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    #[ts(type = "number")]
    pub product_id: u64,

    pub name: String,

    #[serde(with = "money::major_units")]
    #[ts(type = "number")]
    pub unit_price: Money,

    pub quantity: u32,
}

impl CartLine {
    fn from_product(product: &Product) -> Self {
        CartLine {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.price,
            quantity: 1,
        }
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// Direction of a quantity button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum QuantityChange {
    Increase,
    Decrease,
}

// =============================================================================
// Cart
// =============================================================================

/// The current cart. Lines keep the order in which products were first added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds one unit of a product.
    ///
    /// ## Behavior
    /// - Product not in the catalog: nothing happens
    /// - Product already in the cart: quantity + 1, if stock allows
    /// - Otherwise: a new line with quantity 1 (not checked against stock)
    ///
    /// ## Errors
    /// `CoreError::StockExceeded` when the increment would pass the
    /// product's bounded stock, or a validation error when the cart total
    /// would no longer fit in a [`Money`]. The cart is unchanged.
    pub fn add_item(&mut self, catalog: &Catalog, product_id: u64) -> CoreResult<()> {
        let Some(product) = catalog.find(product_id) else {
            return Ok(());
        };

        match self.lines.iter().position(|l| l.product_id == product_id) {
            Some(index) => self.increment_line(index, product),
            None => {
                self.ensure_total_fits(product.price)?;
                self.lines.push(CartLine::from_product(product));
                Ok(())
            }
        }
    }

    /// Steps a line's quantity up or down by one.
    ///
    /// ## Behavior
    /// - `Increase`: same stock ceiling as [`Cart::add_item`]; nothing
    ///   happens if the line or the product is gone
    /// - `Decrease`: quantity − 1, and the line is removed when it hits 0
    pub fn change_quantity(
        &mut self,
        catalog: &Catalog,
        product_id: u64,
        change: QuantityChange,
    ) -> CoreResult<()> {
        let Some(index) = self.lines.iter().position(|l| l.product_id == product_id) else {
            return Ok(());
        };

        match change {
            QuantityChange::Increase => match catalog.find(product_id) {
                Some(product) => self.increment_line(index, product),
                None => Ok(()),
            },
            QuantityChange::Decrease => {
                let line = &mut self.lines[index];
                line.quantity = line.quantity.saturating_sub(1);
                if line.quantity == 0 {
                    self.lines.remove(index);
                }
                Ok(())
            }
        }
    }

    /// Removes a product's line regardless of quantity.
    pub fn remove_item(&mut self, product_id: u64) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    /// Removes every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Σ unit price × quantity. This is also the amount receivable.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Like [`Cart::subtotal`], but `None` when the sum does not fit.
    pub fn checked_subtotal(&self) -> Option<Money> {
        self.lines.iter().try_fold(Money::zero(), |total, line| {
            total.checked_add(line.unit_price.checked_multiply_quantity(line.quantity)?)
        })
    }

    fn increment_line(&mut self, index: usize, product: &Product) -> CoreResult<()> {
        self.ensure_total_fits(self.lines[index].unit_price)?;
        increment(&mut self.lines[index], product)
    }

    fn ensure_total_fits(&self, extra: Money) -> CoreResult<()> {
        match self.checked_subtotal().and_then(|total| total.checked_add(extra)) {
            Some(_) => Ok(()),
            None => Err(ValidationError::OutOfRange {
                field: "cart total".to_string(),
                min: 0,
                max: i64::MAX,
            }
            .into()),
        }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: u64) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    /// Total units across all lines.
    pub fn total_units(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |units, l| units.saturating_add(l.quantity))
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

fn increment(line: &mut CartLine, product: &Product) -> CoreResult<()> {
    let requested = line.quantity.saturating_add(1);
    if !product.stock.allows(requested) {
        return Err(CoreError::StockExceeded {
            product_id: product.id,
            name: product.name.clone(),
            available: product.stock.available().unwrap_or(0),
            requested,
        });
    }
    line.quantity = requested;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
