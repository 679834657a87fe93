//! # Repository Module
//!
//! Document repositories for Till POS.
//!
//! ## Storage Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    kv_store                                             │
//! │                                                                         │
//! │  key                      value (JSON text)            updated_at       │
//! │  ───────────────────────  ───────────────────────────  ──────────────   │
//! │  pos_products_data        [{id, name, price, ...}]     2024-03-09T...   │
//! │  pos_transactions_data    [{id, timestamp, ...}, ...]  2024-03-09T...   │
//! │                                                                         │
//! │  Register command                                                       │
//! │       │  db.catalog().save(&catalog)                                    │
//! │       ▼                                                                 │
//! │  CatalogRepository ──► write_document(CATALOG_KEY, products)            │
//! │  LedgerRepository  ──► write_document(LEDGER_KEY, transactions)         │
//! │                                                                         │
//! │  A missing key means "never saved": the default catalog and an          │
//! │  empty ledger are returned instead.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CatalogRepository`](catalog::CatalogRepository) - Product catalog document
//! - [`LedgerRepository`](ledger::LedgerRepository) - Transaction history document

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqliteExecutor;
use tracing::debug;

use crate::error::{DbError, DbResult};

pub mod catalog;
pub mod ledger;

/// Key of the catalog document.
pub const CATALOG_KEY: &str = "pos_products_data";

/// Key of the ledger document.
pub const LEDGER_KEY: &str = "pos_transactions_data";

/// Reads and decodes a document. `None` if the key was never written.
pub(crate) async fn read_document<'e, E, T>(executor: E, key: &str) -> DbResult<Option<T>>
where
    E: SqliteExecutor<'e>,
    T: DeserializeOwned,
{
    let raw: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?")
        .bind(key)
        .fetch_optional(executor)
        .await?;

    raw.map(|text| serde_json::from_str(&text).map_err(|e| DbError::serialization(key, e)))
        .transpose()
}

/// Encodes and writes a document, replacing any previous value.
pub(crate) async fn write_document<'e, E, T>(executor: E, key: &str, value: &T) -> DbResult<()>
where
    E: SqliteExecutor<'e>,
    T: Serialize + ?Sized,
{
    let text = serde_json::to_string(value).map_err(|e| DbError::serialization(key, e))?;

    debug!(key = %key, bytes = text.len(), "Writing document");

    sqlx::query(
        r#"
        INSERT INTO kv_store (key, value, updated_at)
        VALUES (?, ?, ?)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(key)
    .bind(text)
    .bind(Utc::now().to_rfc3339())
    .execute(executor)
    .await?;

    Ok(())
}
