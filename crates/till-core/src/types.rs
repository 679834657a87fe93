//! # Domain Types
//!
//! Catalog types shared by every component of Till POS.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  ProductDraft   │   │     Stock       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (u64)       │   │  name           │   │  Bounded(n)     │       │
//! │  │  name           │   │  price          │   │  Unbounded      │       │
//! │  │  price (Money)  │   │  category       │   │                 │       │
//! │  │  category       │   │  stock          │   │  JSON: n / null │       │
//! │  │  stock (Stock)  │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cart lines live in [`crate::cart`], transactions in [`crate::ledger`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::money::{self, Money};

// =============================================================================
// Stock
// =============================================================================

/// Units of a product available for sale.
///
/// ## Why an enum?
/// The web front end this replaces used the magic number `999` for
/// "unlimited". Here the distinction is a type: made-to-order items such as
/// brewed drinks are `Unbounded` and never block the cart or lose stock on
/// checkout.
///
/// ## JSON
/// `Bounded(n)` is written as `n`, `Unbounded` as `null`. A missing field
/// also reads as `Unbounded`, except on [`ProductDraft`] where it is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stock {
    /// A counted number of units on hand.
    Bounded(u32),
    /// Never runs out.
    #[default]
    Unbounded,
}

/// Stock count the web front end used to mean "unlimited".
pub const LEGACY_UNLIMITED_STOCK: u32 = 999;

impl Stock {
    /// Reads a stock level from a document written by the web front end,
    /// where `999` meant unlimited.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::Stock;
    ///
    /// assert_eq!(Stock::Bounded(999).normalize_legacy(), Stock::Unbounded);
    /// assert_eq!(Stock::Bounded(998).normalize_legacy(), Stock::Bounded(998));
    /// ```
    #[inline]
    pub const fn normalize_legacy(self) -> Stock {
        match self {
            Stock::Bounded(LEGACY_UNLIMITED_STOCK) => Stock::Unbounded,
            other => other,
        }
    }

    /// Returns the counted units, or `None` when unbounded.
    #[inline]
    pub const fn available(&self) -> Option<u32> {
        match self {
            Stock::Bounded(n) => Some(*n),
            Stock::Unbounded => None,
        }
    }

    /// Checks whether `quantity` units fit within this stock level.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::Stock;
    ///
    /// assert!(Stock::Bounded(2).allows(2));
    /// assert!(!Stock::Bounded(2).allows(3));
    /// assert!(Stock::Unbounded.allows(10_000));
    /// ```
    #[inline]
    pub const fn allows(&self, quantity: u32) -> bool {
        match self {
            Stock::Bounded(n) => quantity <= *n,
            Stock::Unbounded => true,
        }
    }

    /// Returns the stock left after selling `quantity` units.
    ///
    /// Bounded stock saturates at zero; unbounded stock is unchanged.
    #[inline]
    pub const fn deduct(&self, quantity: u32) -> Stock {
        match self {
            Stock::Bounded(n) => Stock::Bounded(n.saturating_sub(quantity)),
            Stock::Unbounded => Stock::Unbounded,
        }
    }

    /// Whether at least one unit can be sold.
    #[inline]
    pub const fn is_in_stock(&self) -> bool {
        match self {
            Stock::Bounded(n) => *n > 0,
            Stock::Unbounded => true,
        }
    }
}

impl Serialize for Stock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.available().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Stock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<u32>::deserialize(deserializer)? {
            Some(n) => Stock::Bounded(n),
            None => Stock::Unbounded,
        })
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// ## Ownership
/// Owned exclusively by the [`crate::catalog::Catalog`]. `id` never changes
/// after creation; every other field can be replaced by an upsert, and
/// `stock` is decremented by checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Stable integer identifier (allocated from 1001 upwards).
    #[ts(type = "number")]
    pub id: u64,

    /// Display name shown to the cashier and on the receipt.
    pub name: String,

    /// Unit price.
    #[serde(with = "money::major_units")]
    #[ts(type = "number")]
    pub price: Money,

    /// Category used by the product grid filter.
    #[serde(default)]
    pub category: String,

    /// Units on hand.
    #[serde(default)]
    #[ts(as = "Option<u32>")]
    pub stock: Stock,
}

impl Product {
    /// Builds a product from an id and the editable fields.
    pub fn from_draft(id: u64, draft: ProductDraft) -> Self {
        Product {
            id,
            name: draft.name,
            price: draft.price,
            category: draft.category,
            stock: draft.stock,
        }
    }

    /// Checks if product can be sold (at least one unit, or unbounded).
    #[inline]
    pub fn is_in_stock(&self) -> bool {
        self.stock.is_in_stock()
    }
}

// =============================================================================
// Product Draft
// =============================================================================

/// The editable fields of a product, as submitted by the management form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductDraft {
    pub name: String,

    #[serde(with = "money::major_units")]
    #[ts(type = "number")]
    pub price: Money,

    pub category: String,

    /// Must be present; `null` means unbounded.
    #[serde(deserialize_with = "required_stock")]
    #[ts(as = "Option<u32>")]
    pub stock: Stock,
}

fn required_stock<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Stock, D::Error> {
    Stock::deserialize(deserializer)
}

// =============================================================================
// Unit Tests
// =============================================================================
