//! # Transaction Ledger
//!
//! Append-only history of completed sales, newest first.
//!
//! ## Ledger Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record(tx) ──► push_front                                              │
//! │                                                                         │
//! │   index 0            index 1            index 2                         │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐                │
//! │  │ newest sale  │ → │              │ → │ oldest sale  │                │
//! │  └──────────────┘   └──────────────┘   └──────────────┘                │
//! │                                                                         │
//! │  ids are epoch milliseconds, bumped so each id is greater than the     │
//! │  last one even when two sales land in the same millisecond             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## JSON
//! The ledger persists as a plain array of transactions (camelCase) with
//! RFC 3339 timestamps. Older documents wrote `items`, `received` and
//! `totalItems`, and stored the timestamp as browser locale text such as
//! `3/9/2024, 2:05:33 PM` or `2024/3/9 下午2:05:33`. Both are still accepted
//! when reading; locale times carry no offset and are read as UTC.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartLine;
use crate::money::{self, Money};

// =============================================================================
// Transaction Line
// =============================================================================

/// A line item frozen into a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TransactionLine {
    #[serde(alias = "id")]
    #[ts(type = "number")]
    pub product_id: u64,

    pub name: String,

    #[serde(alias = "price", with = "money::major_units")]
    #[ts(type = "number")]
    pub unit_price: Money,

    pub quantity: u32,

    #[serde(alias = "total", with = "money::major_units")]
    #[ts(type = "number")]
    pub line_total: Money,
}

impl From<&CartLine> for TransactionLine {
    fn from(line: &CartLine) -> Self {
        TransactionLine {
            product_id: line.product_id,
            name: line.name.clone(),
            unit_price: line.unit_price,
            quantity: line.quantity,
            line_total: line.line_total(),
        }
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A completed sale. Never modified after it is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Transaction {
    /// Receipt number (epoch milliseconds, strictly increasing).
    #[ts(type = "number")]
    pub id: u64,

    #[serde(with = "timestamp")]
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,

    #[serde(alias = "items")]
    pub line_items: Vec<TransactionLine>,

    /// Amount due (the cart subtotal).
    #[serde(with = "money::major_units")]
    #[ts(type = "number")]
    pub receivable: Money,

    /// Cash handed over by the customer.
    #[serde(alias = "received", with = "money::major_units")]
    #[ts(type = "number")]
    pub tendered: Money,

    #[serde(with = "money::major_units")]
    #[ts(type = "number")]
    pub change: Money,

    #[serde(alias = "totalItems")]
    pub total_units: u32,
}

// =============================================================================
// Timestamp Format
// =============================================================================

/// Serde adapter for transaction timestamps.
///
/// Writes RFC 3339. Reads RFC 3339 first, then the locale layouts older
/// ledgers were saved with.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    /// Locale layouts, tried in order after RFC 3339.
    const LEGACY_FORMATS: &[&str] = &[
        "%m/%d/%Y, %I:%M:%S %p",
        "%Y/%m/%d %p %I:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
    ];

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("unrecognised timestamp: {raw}")))
    }

    pub(super) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }

        // zh-TW writes the meridiem before the hour
        let normalised = raw.replace("上午", " AM ").replace("下午", " PM ");
        LEGACY_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(normalised.trim(), format).ok())
            .map(|naive| naive.and_utc())
    }
}

// =============================================================================
// Ledger
// =============================================================================

/// Sales history for one register.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    transactions: VecDeque<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger {
            transactions: VecDeque::new(),
        }
    }

    /// Rebuilds a ledger from a persisted newest-first list.
    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        Ledger {
            transactions: transactions.into(),
        }
    }

    /// Prepends a completed transaction.
    pub fn record(&mut self, tx: Transaction) {
        self.transactions.push_front(tx);
    }

    /// Returns the id for a transaction completed at `now`.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::{TimeZone, Utc};
    /// use till_core::Ledger;
    ///
    /// let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
    /// assert_eq!(Ledger::new().next_id(now), 1_700_000_000_000);
    /// ```
    pub fn next_id(&self, now: DateTime<Utc>) -> u64 {
        let now_ms = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        match self.latest() {
            Some(last) => now_ms.max(last.id.saturating_add(1)),
            None => now_ms,
        }
    }

    /// Transactions, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter()
    }

    pub fn latest(&self) -> Option<&Transaction> {
        self.transactions.front()
    }

    pub fn find(&self, id: u64) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.id == id)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
