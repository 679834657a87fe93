//! # Catalog Repository
//!
//! Loads and saves the product catalog document.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::{read_document, write_document, CATALOG_KEY};
use till_core::{Catalog, Product};

/// Repository for the catalog document.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.catalog();
///
/// let mut catalog = repo.load().await?;
/// catalog.remove(101);
/// repo.save(&catalog).await?;
/// ```
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Loads the saved catalog, or the default catalog if none was saved.
    pub async fn load(&self) -> DbResult<Catalog> {
        let products: Option<Vec<Product>> = read_document(&self.pool, CATALOG_KEY).await?;

        match products {
            Some(products) => {
                debug!(count = products.len(), "Loaded catalog");
                Ok(Catalog::from_products(products))
            }
            None => {
                debug!("No saved catalog, using defaults");
                Ok(Catalog::with_defaults())
            }
        }
    }

    /// Saves the whole catalog.
    pub async fn save(&self, catalog: &Catalog) -> DbResult<()> {
        write_document(&self.pool, CATALOG_KEY, catalog.all()).await
    }

    /// Whether a catalog has ever been saved.
    pub async fn exists(&self) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kv_store WHERE key = ?")
            .bind(CATALOG_KEY)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::error::DbError;
    use crate::{Database, DbConfig, CATALOG_KEY};
    use till_core::{Money, ProductDraft, Stock};

    async fn database() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_load_defaults_when_never_saved() {
        let db = database().await;

        let catalog = db.catalog().load().await.unwrap();

        assert_eq!(catalog.len(), 3);
        assert!(!db.catalog().exists().await.unwrap());
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let db = database().await;
        let mut catalog = db.catalog().load().await.unwrap();
        catalog.remove(101);
        catalog
            .upsert(
                None,
                ProductDraft {
                    name: "Matcha Latte".to_string(),
                    price: Money::from_cents(9500),
                    category: "Brewed Drinks".to_string(),
                    stock: Stock::Unbounded,
                },
            )
            .unwrap();

        db.catalog().save(&catalog).await.unwrap();
        let reloaded = db.catalog().load().await.unwrap();

        assert_eq!(reloaded, catalog);
        assert!(db.catalog().exists().await.unwrap());
    }

    #[tokio::test]
    async fn test_reload_keeps_id_floor_above_saved_ids() {
        let db = database().await;
        let mut catalog = db.catalog().load().await.unwrap();
        let draft = ProductDraft {
            name: "Scone".to_string(),
            price: Money::from_cents(5500),
            category: "Snacks".to_string(),
            stock: Stock::Bounded(12),
        };
        let first = catalog.upsert(None, draft.clone()).unwrap();
        db.catalog().save(&catalog).await.unwrap();

        let mut reloaded = db.catalog().load().await.unwrap();
        let second = reloaded.upsert(None, draft).unwrap();

        assert_eq!(second.id, first.id + 1);
    }

    #[tokio::test]
    async fn test_malformed_document_is_reported() {
        let db = database().await;
        sqlx::query("INSERT INTO kv_store (key, value) VALUES (?, ?)")
            .bind(CATALOG_KEY)
            .bind("{not json")
            .execute(db.pool())
            .await
            .unwrap();

        let err = db.catalog().load().await.unwrap_err();
        assert!(matches!(err, DbError::Serialization { ref key, .. } if key == CATALOG_KEY));
    }
}
