//! # Register Session
//!
//! Everything one register knows, in one value.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        RegisterSession                                  │
//! │                                                                         │
//! │   catalog ◄──── read by ──── cart          calculator                   │
//! │      ▲                         │               │ apply                  │
//! │      │ stock                   │ lines         ▼                        │
//! │      └──────── checkout ◄──────┘◄──────── tendered                      │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │                 ledger                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The register layer keeps one session behind a mutex. Because the whole
//! session is `Clone`, a command can run against a copy and only swap it in
//! once the new state has been saved.

use chrono::{DateTime, Utc};

use crate::calculator::{Calculator, Key};
use crate::cart::{Cart, QuantityChange};
use crate::catalog::Catalog;
use crate::checkout;
use crate::error::{CoreResult, ValidationError};
use crate::ledger::{Ledger, Transaction};
use crate::money::Money;
use crate::transfer;
use crate::types::{Product, ProductDraft};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterSession {
    catalog: Catalog,
    cart: Cart,
    ledger: Ledger,
    calculator: Calculator,
    tendered: Money,
}

impl RegisterSession {
    /// A fresh register: default catalog, no sales yet.
    pub fn new() -> Self {
        Self::from_parts(Catalog::with_defaults(), Ledger::new())
    }

    /// A register restored from a saved catalog and ledger.
    pub fn from_parts(catalog: Catalog, ledger: Ledger) -> Self {
        RegisterSession {
            catalog,
            cart: Cart::new(),
            ledger,
            calculator: Calculator::new(),
            tendered: Money::zero(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    pub fn upsert_product(
        &mut self,
        id: Option<u64>,
        draft: ProductDraft,
    ) -> Result<Product, ValidationError> {
        self.catalog.upsert(id, draft)
    }

    /// Deletes a product. Cart lines already holding it are left alone.
    pub fn remove_product(&mut self, id: u64) {
        self.catalog.remove(id);
    }

    /// Replaces the catalog with an import document. Returns the number of
    /// products imported.
    pub fn import_catalog(&mut self, json: &str) -> Result<usize, ValidationError> {
        let products = transfer::parse_import(json)?;
        let count = products.len();
        self.catalog.bulk_replace(products)?;
        Ok(count)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    pub fn add_to_cart(&mut self, product_id: u64) -> CoreResult<()> {
        self.cart.add_item(&self.catalog, product_id)
    }

    pub fn change_quantity(&mut self, product_id: u64, change: QuantityChange) -> CoreResult<()> {
        self.cart.change_quantity(&self.catalog, product_id, change)
    }

    pub fn remove_from_cart(&mut self, product_id: u64) {
        self.cart.remove_item(product_id);
    }

    /// Empties the cart and zeroes the tendered amount.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.tendered = Money::zero();
    }

    // =========================================================================
    // Payment
    // =========================================================================

    pub fn tendered(&self) -> Money {
        self.tendered
    }

    pub fn set_tendered(&mut self, amount: Money) {
        self.tendered = amount;
    }

    /// Amount due for the current cart.
    pub fn receivable(&self) -> Money {
        self.cart.subtotal()
    }

    /// Change owed for the tendered amount, never below zero.
    pub fn change_due(&self) -> Money {
        let change = self.tendered - self.receivable();
        if change.is_negative() {
            Money::zero()
        } else {
            change
        }
    }

    /// Presses a calculator key. `apply` copies the display into the
    /// tendered amount; the new amount is returned.
    pub fn press(&mut self, key: Key) -> Option<Money> {
        let applied = self.calculator.press(key);
        if let Some(amount) = applied {
            self.tendered = amount;
        }
        applied
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Completes the sale with an explicit tendered amount.
    ///
    /// See [`checkout::checkout`] for the rules. On success the tendered
    /// amount is reset to zero.
    pub fn checkout(&mut self, tendered: Money, now: DateTime<Utc>) -> CoreResult<Transaction> {
        let tx = checkout::checkout(
            &mut self.catalog,
            &mut self.cart,
            &mut self.ledger,
            tendered,
            now,
        )?;
        self.tendered = Money::zero();
        Ok(tx)
    }

    /// Completes the sale with the amount already tendered.
    pub fn checkout_tendered(&mut self, now: DateTime<Utc>) -> CoreResult<Transaction> {
        self.checkout(self.tendered, now)
    }
}

impl Default for RegisterSession {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::Operator;
    use crate::error::CoreError;
    use crate::types::Stock;

    #[test]
    fn test_americano_scenario() {
        let mut session = RegisterSession::new();
        for _ in 0..3 {
            session.add_to_cart(201).unwrap();
        }
        assert_eq!(session.receivable().cents(), 19500);

        session.set_tendered(Money::from_cents(20000));
        assert_eq!(session.change_due().cents(), 500);

        let before = session.clone();
        assert!(matches!(
            session.checkout(Money::from_cents(15000), Utc::now()),
            Err(CoreError::InsufficientPayment { .. })
        ));
        assert_eq!(session, before);

        let tx = session
            .checkout(Money::from_cents(25000), Utc::now())
            .unwrap();
        assert_eq!(tx.change.cents(), 5500);
        assert_eq!(tx.total_units, 3);
        assert!(session.cart().is_empty());
        assert!(session.tendered().is_zero());
        assert_eq!(session.ledger().len(), 1);
        assert_eq!(session.catalog().find(201).unwrap().stock, Stock::Unbounded);
    }

    #[test]
    fn test_change_due_never_negative() {
        let mut session = RegisterSession::new();
        session.add_to_cart(101).unwrap();
        session.set_tendered(Money::from_cents(100));
        assert!(session.change_due().is_zero());
    }

    #[test]
    fn test_calculator_apply_sets_tendered() {
        let mut session = RegisterSession::new();
        session.add_to_cart(201).unwrap();

        for key in [
            Key::Digit(5),
            Key::Digit(0),
            Key::Operator(Operator::Add),
            Key::Digit(5),
            Key::Digit(0),
            Key::Equals,
        ] {
            assert_eq!(session.press(key), None);
        }
        assert_eq!(session.press(Key::Apply), Some(Money::from_cents(10000)));
        assert_eq!(session.tendered().cents(), 10000);
        assert_eq!(session.change_due().cents(), 3500);

        let tx = session.checkout_tendered(Utc::now()).unwrap();
        assert_eq!(tx.tendered.cents(), 10000);
    }

    #[test]
    fn test_negative_calculator_result_not_tendered() {
        let mut session = RegisterSession::new();
        session.set_tendered(Money::from_cents(2000));

        for key in [
            Key::Digit(0),
            Key::Operator(Operator::Subtract),
            Key::Digit(5),
            Key::Equals,
        ] {
            session.press(key);
        }
        assert_eq!(session.press(Key::Apply), None);
        assert_eq!(session.tendered().cents(), 2000);
    }

    #[test]
    fn test_clear_cart_resets_tendered() {
        let mut session = RegisterSession::new();
        session.add_to_cart(102).unwrap();
        session.set_tendered(Money::from_cents(50000));

        session.clear_cart();

        assert!(session.cart().is_empty());
        assert!(session.tendered().is_zero());
    }

    #[test]
    fn test_import_replaces_catalog() {
        let mut session = RegisterSession::new();

        let count = session
            .import_catalog(r#"[{"id": 7, "name": "Tea", "price": 40}]"#)
            .unwrap();

        assert_eq!(count, 1);
        assert_eq!(session.catalog().len(), 1);
        assert!(session.catalog().find(101).is_none());
    }

    #[test]
    fn test_imported_unlimited_marker_never_runs_down() {
        let mut session = RegisterSession::new();
        session
            .import_catalog(r#"[{"id": 201, "name": "Americano", "price": 65, "stock": 999}]"#)
            .unwrap();

        for _ in 0..3 {
            session.add_to_cart(201).unwrap();
        }
        session
            .checkout(Money::from_cents(25000), Utc::now())
            .unwrap();

        assert_eq!(session.catalog().find(201).unwrap().stock, Stock::Unbounded);
    }

    #[test]
    fn test_failed_import_keeps_catalog() {
        let mut session = RegisterSession::new();
        assert!(session.import_catalog(r#"[{"id": 7}]"#).is_err());
        assert_eq!(session.catalog().len(), 3);
    }

    #[test]
    fn test_removed_product_stays_in_cart() {
        let mut session = RegisterSession::new();
        session.add_to_cart(102).unwrap();
        session.remove_product(102);

        assert!(session.cart().line(102).is_some());
        let tx = session
            .checkout(Money::from_cents(12000), Utc::now())
            .unwrap();
        assert_eq!(tx.receivable.cents(), 12000);
    }
}
