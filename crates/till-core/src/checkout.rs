//! # Checkout Engine
//!
//! Turns the cart and the cash tendered into a recorded transaction.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         checkout(tendered)                              │
//! │                                                                         │
//! │  1. cart empty?            ──► EmptyCart            (nothing changed)   │
//! │  2. receivable = subtotal                                               │
//! │  3. tendered < receivable? ──► InsufficientPayment  (nothing changed)   │
//! │  ───────────────────────────── no failures below ────────────────────── │
//! │  4. change = tendered − receivable                                      │
//! │  5. build Transaction from the cart snapshot                            │
//! │  6. deduct bounded stock for every line                                 │
//! │  7. prepend to the ledger                                               │
//! │  8. clear the cart                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Persistence is the caller's job. The register stages checkout on a copy
//! of the session and only swaps it in after the store commits.
//!
//! ## Re-entrancy
//! [`CheckoutLatch`] rejects a second checkout while one is running.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult};
use crate::ledger::{Ledger, Transaction, TransactionLine};
use crate::money::Money;
use crate::types::Stock;

// =============================================================================
// Engine
// =============================================================================

/// Completes a sale.
///
/// ## Errors
/// - `CoreError::EmptyCart` if the cart has no lines
/// - `CoreError::InsufficientPayment` if `tendered` is below the subtotal
///
/// On error the catalog, cart and ledger are untouched.
///
/// ## Stock
/// A line whose product has since been deleted is skipped. A deduction
/// larger than the remaining stock leaves it at zero. Both are logged and
/// the sale still completes.
pub fn checkout(
    catalog: &mut Catalog,
    cart: &mut Cart,
    ledger: &mut Ledger,
    tendered: Money,
    now: DateTime<Utc>,
) -> CoreResult<Transaction> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    let receivable = cart.subtotal();
    if tendered < receivable {
        return Err(CoreError::InsufficientPayment {
            receivable,
            tendered,
        });
    }

    let tx = Transaction {
        id: ledger.next_id(now),
        timestamp: now,
        line_items: cart.lines().iter().map(TransactionLine::from).collect(),
        receivable,
        tendered,
        change: tendered - receivable,
        total_units: cart.total_units(),
    };

    for line in cart.lines() {
        deduct_stock(catalog, line.product_id, line.quantity);
    }

    info!(
        id = tx.id,
        receivable = %tx.receivable,
        change = %tx.change,
        units = tx.total_units,
        "Checkout complete"
    );

    ledger.record(tx.clone());
    cart.clear();
    Ok(tx)
}

fn deduct_stock(catalog: &mut Catalog, product_id: u64, quantity: u32) {
    let Some(product) = catalog.find_mut(product_id) else {
        warn!(product_id, "Product no longer in catalog, stock not deducted");
        return;
    };

    if let Stock::Bounded(available) = product.stock {
        if quantity > available {
            warn!(
                product_id,
                available, quantity, "Sold more than stock on hand, clamping to zero"
            );
        }
    }
    product.stock = product.stock.deduct(quantity);
}

// =============================================================================
// Re-entrancy Latch
// =============================================================================

/// Guards a register against overlapping checkouts.
///
/// ## Usage
/// ```rust
/// use till_core::{CheckoutLatch, CoreError};
///
/// let latch = CheckoutLatch::new();
/// let permit = latch.try_acquire().unwrap();
/// assert_eq!(latch.try_acquire().unwrap_err(), CoreError::CheckoutInProgress);
///
/// drop(permit);
/// assert!(latch.try_acquire().is_ok());
/// ```
#[derive(Debug, Default)]
pub struct CheckoutLatch {
    busy: AtomicBool,
}

impl CheckoutLatch {
    pub const fn new() -> Self {
        CheckoutLatch {
            busy: AtomicBool::new(false),
        }
    }

    /// Claims the latch, or fails with `CheckoutInProgress` if already held.
    pub fn try_acquire(&self) -> CoreResult<CheckoutPermit<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map_err(|_| CoreError::CheckoutInProgress)?;
        Ok(CheckoutPermit { latch: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Held for the duration of one checkout; releases the latch on drop.
#[derive(Debug)]
pub struct CheckoutPermit<'a> {
    latch: &'a CheckoutLatch,
}

impl Drop for CheckoutPermit<'_> {
    fn drop(&mut self) {
        self.latch.busy.store(false, Ordering::Release);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
    }

    fn three_americanos() -> (Catalog, Cart, Ledger) {
        let catalog = Catalog::with_defaults();
        let mut cart = Cart::new();
        for _ in 0..3 {
            cart.add_item(&catalog, 201).unwrap();
        }
        (catalog, cart, Ledger::new())
    }

    #[test]
    fn test_checkout_with_change() {
        let (mut catalog, mut cart, mut ledger) = three_americanos();
        assert_eq!(cart.subtotal().cents(), 19500);

        let tx = checkout(
            &mut catalog,
            &mut cart,
            &mut ledger,
            Money::from_cents(25000),
            now(),
        )
        .unwrap();

        assert_eq!(tx.change.cents(), 5500);
        assert_eq!(tx.receivable.cents(), 19500);
        assert_eq!(tx.total_units, 3);
        assert_eq!(tx.line_items.len(), 1);
        assert_eq!(tx.line_items[0].line_total.cents(), 19500);
        assert_eq!(catalog.find(201).unwrap().stock, Stock::Unbounded);
        assert!(cart.is_empty());
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.latest(), Some(&tx));
    }

    #[test]
    fn test_insufficient_payment_changes_nothing() {
        let (mut catalog, mut cart, mut ledger) = three_americanos();
        let before = (catalog.clone(), cart.clone(), ledger.clone());

        let err = checkout(
            &mut catalog,
            &mut cart,
            &mut ledger,
            Money::from_cents(15000),
            now(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            CoreError::InsufficientPayment {
                receivable: Money::from_cents(19500),
                tendered: Money::from_cents(15000),
            }
        );
        assert_eq!((catalog, cart, ledger), before);
    }

    #[test]
    fn test_exact_payment_gives_zero_change() {
        let (mut catalog, mut cart, mut ledger) = three_americanos();
        let tx = checkout(
            &mut catalog,
            &mut cart,
            &mut ledger,
            Money::from_cents(19500),
            now(),
        )
        .unwrap();
        assert!(tx.change.is_zero());
    }

    #[test]
    fn test_empty_cart_rejected() {
        let mut catalog = Catalog::with_defaults();
        let mut cart = Cart::new();
        let mut ledger = Ledger::new();

        let err = checkout(
            &mut catalog,
            &mut cart,
            &mut ledger,
            Money::from_cents(100),
            now(),
        )
        .unwrap_err();

        assert_eq!(err, CoreError::EmptyCart);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_bounded_stock_decrements_by_quantity() {
        let mut catalog = Catalog::with_defaults();
        let mut cart = Cart::new();
        let mut ledger = Ledger::new();
        cart.add_item(&catalog, 101).unwrap();
        cart.add_item(&catalog, 101).unwrap();
        cart.add_item(&catalog, 102).unwrap();

        let tx = checkout(
            &mut catalog,
            &mut cart,
            &mut ledger,
            Money::from_cents(100_000),
            now(),
        )
        .unwrap();

        assert_eq!(catalog.find(101).unwrap().stock, Stock::Bounded(48));
        assert_eq!(catalog.find(102).unwrap().stock, Stock::Bounded(99));
        assert_eq!(
            tx.total_units,
            tx.line_items.iter().map(|l| l.quantity).sum::<u32>()
        );
    }

    #[test]
    fn test_deleted_product_is_skipped() {
        let mut catalog = Catalog::with_defaults();
        let mut cart = Cart::new();
        let mut ledger = Ledger::new();
        cart.add_item(&catalog, 102).unwrap();
        catalog.remove(102);

        let tx = checkout(
            &mut catalog,
            &mut cart,
            &mut ledger,
            Money::from_cents(12000),
            now(),
        )
        .unwrap();

        assert_eq!(tx.line_items[0].name, "Hand-made Cookies (Box)");
        assert!(catalog.find(102).is_none());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_zero_stock_first_add_saturates() {
        let mut products = Catalog::with_defaults().all().to_vec();
        products[1].stock = Stock::Bounded(0);
        let mut catalog = Catalog::from_products(products);
        let mut cart = Cart::new();
        let mut ledger = Ledger::new();
        cart.add_item(&catalog, 102).unwrap();

        checkout(
            &mut catalog,
            &mut cart,
            &mut ledger,
            Money::from_cents(12000),
            now(),
        )
        .unwrap();

        assert_eq!(catalog.find(102).unwrap().stock, Stock::Bounded(0));
    }

    #[test]
    fn test_ledger_grows_newest_first() {
        let mut catalog = Catalog::with_defaults();
        let mut cart = Cart::new();
        let mut ledger = Ledger::new();

        let mut ids = Vec::new();
        for _ in 0..3 {
            cart.add_item(&catalog, 201).unwrap();
            let tx = checkout(
                &mut catalog,
                &mut cart,
                &mut ledger,
                Money::from_cents(6500),
                now(),
            )
            .unwrap();
            ids.push(tx.id);
        }

        ids.reverse();
        let recorded: Vec<u64> = ledger.iter().map(|t| t.id).collect();
        assert_eq!(recorded, ids);
        assert!(recorded.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_latch_releases_on_drop() {
        let latch = CheckoutLatch::new();
        {
            let _permit = latch.try_acquire().unwrap();
            assert!(latch.is_busy());
            assert!(matches!(
                latch.try_acquire(),
                Err(CoreError::CheckoutInProgress)
            ));
        }
        assert!(!latch.is_busy());
    }
}
