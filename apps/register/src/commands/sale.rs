//! # Sale Commands
//!
//! Checkout, transaction history and receipt reprints.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Flow                                        │
//! │                                                                         │
//! │  Cashier presses "Checkout"                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Claim checkout latch ──────────────► busy? CHECKOUT_IN_PROGRESS       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Lock session, run checkout on a copy                                   │
//! │       │   empty cart?      ──► EMPTY_CART                               │
//! │       │   tendered short?  ──► INSUFFICIENT_PAYMENT                     │
//! │       ▼                                                                 │
//! │  Save catalog + ledger in ONE database transaction                      │
//! │       │   failed? ──► DATABASE_ERROR, live session untouched            │
//! │       ▼                                                                 │
//! │  Swap copy in, render receipt, release latch                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{ConfigState, DbState, RegisterState};
use till_core::{receipt, Money, Transaction};

/// Default number of transactions returned by `list_transactions`.
const DEFAULT_HISTORY_LIMIT: usize = 50;

/// A completed sale and its printable receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub transaction: Transaction,
    pub receipt: String,
}

/// Completes the current sale.
///
/// ## Arguments
/// * `tendered_cents` - Cash handed over; `None` uses the amount already
///   set with `set_tendered` or the calculator
///
/// ## Errors
/// - `CHECKOUT_IN_PROGRESS` if another checkout is running
/// - `EMPTY_CART`, `INSUFFICIENT_PAYMENT` from the checkout rules
/// - `DATABASE_ERROR` if the save fails; nothing changes in that case
pub async fn checkout(
    db: &DbState,
    register: &RegisterState,
    config: &ConfigState,
    tendered_cents: Option<i64>,
) -> Result<CheckoutResponse, ApiError> {
    debug!(tendered_cents = ?tendered_cents, "checkout command");

    let _permit = register.latch().try_acquire()?;

    let mut session = register.lock().await;
    let mut staged = session.clone();
    let now = Utc::now();

    let transaction = match tendered_cents {
        Some(cents) if cents < 0 => {
            return Err(ApiError::validation("Tendered amount cannot be negative"))
        }
        Some(cents) => staged.checkout(Money::from_cents(cents), now)?,
        None => staged.checkout_tendered(now)?,
    };

    db.inner()
        .save_checkout(staged.catalog(), staged.ledger())
        .await?;
    *session = staged;

    info!(
        id = transaction.id,
        receivable = %transaction.receivable,
        change = %transaction.change,
        units = transaction.total_units,
        "Sale recorded"
    );

    let receipt = receipt::render(&transaction, &config.receipt_layout());
    Ok(CheckoutResponse {
        transaction,
        receipt,
    })
}

/// Lists recorded sales, newest first.
///
/// ## Arguments
/// * `limit` - Maximum number returned (default: 50)
pub async fn list_transactions(
    register: &RegisterState,
    limit: Option<usize>,
) -> Vec<Transaction> {
    let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    debug!(limit = limit, "list_transactions command");

    let session = register.lock().await;
    session.ledger().iter().take(limit).cloned().collect()
}

/// Gets one recorded sale.
pub async fn get_transaction(register: &RegisterState, id: u64) -> Result<Transaction, ApiError> {
    debug!(id = id, "get_transaction command");

    let session = register.lock().await;
    session
        .ledger()
        .find(id)
        .cloned()
        .ok_or_else(|| ApiError::not_found("Transaction", id))
}

/// Renders the receipt of a recorded sale again.
pub async fn reprint_receipt(
    register: &RegisterState,
    config: &ConfigState,
    id: u64,
) -> Result<String, ApiError> {
    debug!(id = id, "reprint_receipt command");

    let transaction = get_transaction(register, id).await?;
    Ok(receipt::render(&transaction, &config.receipt_layout()))
}
