//! # till-core: Pure Business Logic for Till POS
//!
//! This crate is the **transaction engine** of Till POS. It contains the
//! catalog, cart, checkout, ledger and calculator state machines with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Till POS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Front end (web UI)                           │   │
//! │  │   Product grid ──► Cart panel ──► Calculator ──► Receipt        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    Register commands                            │   │
//! │  │    add_to_cart, press_calculator_key, checkout, import, ...     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ till-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌────────┐ ┌──────────┐ ┌────────┐ ┌──────────┐  │   │
//! │  │   │ catalog │ │  cart  │ │ checkout │ │ ledger │ │calculator│  │   │
//! │  │   └─────────┘ └────────┘ └──────────┘ └────────┘ └──────────┘  │   │
//! │  │          bundled by session::RegisterSession                    │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK READS • PURE STATE            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    till-db (Database Layer)                     │   │
//! │  │          SQLite key/value documents for catalog and ledger      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product and Stock
//! - [`money`] - Money type with integer arithmetic
//! - [`catalog`] - Product table with id allocation
//! - [`cart`] - Cart lines bounded by stock
//! - [`checkout`] - Cart + tendered cash → Transaction, plus the re-entrancy latch
//! - [`ledger`] - Newest-first transaction history
//! - [`calculator`] - Keypad state machine for cash tendered
//! - [`session`] - One register's state in a single value
//! - [`receipt`] - Plain-text receipt rendering
//! - [`transfer`] - Catalog JSON import/export
//! - [`error`] / [`validation`] - Typed errors and business rules
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use till_core::{Money, RegisterSession};
//!
//! let mut session = RegisterSession::new();
//! session.add_to_cart(201).unwrap(); // Americano, 65.00
//! session.add_to_cart(201).unwrap();
//! session.add_to_cart(201).unwrap();
//!
//! let tx = session.checkout(Money::from_cents(25000), Utc::now()).unwrap();
//! assert_eq!(tx.change.cents(), 5500);
//! assert!(session.cart().is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calculator;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod ledger;
pub mod money;
pub mod receipt;
pub mod session;
pub mod transfer;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use till_core::Money` instead of
// `use till_core::money::Money`

pub use calculator::{Calculator, CalculatorPhase, CalculatorView, Key, Operator};
pub use cart::{Cart, CartLine, QuantityChange};
pub use catalog::Catalog;
pub use checkout::{CheckoutLatch, CheckoutPermit};
pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::{Ledger, Transaction, TransactionLine};
pub use money::Money;
pub use receipt::ReceiptLayout;
pub use session::RegisterSession;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Lowest id ever handed to a newly created product.
///
/// The default catalog uses ids 101-201; new products start at 1001 so they
/// never collide with hand-numbered imports in that range.
pub const PRODUCT_ID_FLOOR: u64 = 1000;

/// Maximum characters shown on the calculator display.
pub const CALCULATOR_MAX_DISPLAY_LEN: usize = 15;
