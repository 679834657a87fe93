//! # Ledger Repository
//!
//! Loads and saves the transaction history document (newest first).
//!
//! The ledger is normally written together with the catalog by
//! [`Database::save_checkout`](crate::Database::save_checkout); `save` on
//! its own is for maintenance tools.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::{read_document, write_document, LEDGER_KEY};
use till_core::Ledger;

/// Repository for the ledger document.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
}

impl LedgerRepository {
    /// Creates a new LedgerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LedgerRepository { pool }
    }

    /// Loads the saved ledger, or an empty one if none was saved.
    pub async fn load(&self) -> DbResult<Ledger> {
        let ledger: Ledger = read_document(&self.pool, LEDGER_KEY)
            .await?
            .unwrap_or_default();

        debug!(count = ledger.len(), "Loaded ledger");
        Ok(ledger)
    }

    /// Saves the whole ledger.
    pub async fn save(&self, ledger: &Ledger) -> DbResult<()> {
        write_document(&self.pool, LEDGER_KEY, ledger).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use till_core::{Money, RegisterSession};

    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_empty_when_never_saved() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.ledger().load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_and_reload_keeps_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut session = RegisterSession::new();
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();

        for product_id in [201, 102] {
            session.add_to_cart(product_id).unwrap();
            session.checkout(Money::from_cents(20000), now).unwrap();
        }

        db.ledger().save(session.ledger()).await.unwrap();
        let reloaded = db.ledger().load().await.unwrap();

        assert_eq!(&reloaded, session.ledger());
        let ids: Vec<u64> = reloaded.iter().map(|tx| tx.id).collect();
        assert_eq!(ids, vec![1_700_000_000_001, 1_700_000_000_000]);
    }
}
