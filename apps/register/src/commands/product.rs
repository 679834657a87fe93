//! # Product Commands
//!
//! Commands for browsing and managing the catalog.
//!
//! ## Save Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product Save Flow                                    │
//! │                                                                         │
//! │  Management form submitted                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  {"cmd": "save_product", "args": {"id": null, "draft": {...}}}          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────────────────┐                         │
//! │  │  Validate draft on a copy of the session  │──► Invalid? Error,      │
//! │  │  Known id: update in place                │    nothing saved        │
//! │  │  Otherwise: allocate next id (> 1000)     │                         │
//! │  └───────────────────────────────────────────┘                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Save catalog document ──► swap copy in ──► return Product              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Instant;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{DbState, RegisterState};
use till_core::{transfer, Product, ProductDraft};

/// Result of a catalog import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    /// Number of products now in the catalog
    pub imported: usize,
}

/// A catalog export, ready to be offered as a download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    /// Suggested file name, e.g. `pos_products_export_2024-03-09.json`
    pub file_name: String,

    /// Pretty-printed JSON array of products
    pub contents: String,
}

/// Lists products for the product grid.
///
/// ## Arguments
/// * `category` - Only this category; `None` means all products
///
/// ## Returns
/// Products in catalog order.
pub async fn list_products(
    register: &RegisterState,
    category: Option<String>,
) -> Vec<Product> {
    let start = Instant::now();
    debug!(category = ?category, "list_products command");

    let session = register.lock().await;
    let products: Vec<Product> = session
        .catalog()
        .by_category(category.as_deref())
        .cloned()
        .collect();

    debug!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        count = products.len(),
        "list_products complete"
    );
    products
}

/// Gets a single product by id.
pub async fn get_product(register: &RegisterState, id: u64) -> Result<Product, ApiError> {
    debug!(id = id, "get_product command");
    let session = register.lock().await;
    session
        .catalog()
        .find(id)
        .cloned()
        .ok_or_else(|| ApiError::not_found("Product", id))
}

/// Lists the distinct categories, in the order they first appear.
pub async fn list_categories(register: &RegisterState) -> Vec<String> {
    debug!("list_categories command");
    let session = register.lock().await;
    session
        .catalog()
        .categories()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Creates or updates a product.
///
/// ## Arguments
/// * `id` - Existing product to update; `None` (or an unknown id) creates one
/// * `draft` - Name, price, category and stock from the form
///
/// ## Returns
/// The stored product, with its allocated id.
pub async fn save_product(
    db: &DbState,
    register: &RegisterState,
    id: Option<u64>,
    draft: ProductDraft,
) -> Result<Product, ApiError> {
    debug!(id = ?id, name = %draft.name, "save_product command");

    let mut session = register.lock().await;
    let mut staged = session.clone();
    let product = staged.upsert_product(id, draft)?;

    db.inner().catalog().save(staged.catalog()).await?;
    *session = staged;

    info!(id = product.id, name = %product.name, "Product saved");
    Ok(product)
}

/// Deletes a product. Unknown ids are ignored.
///
/// Lines already in the cart keep their snapshot and can still be sold.
pub async fn delete_product(
    db: &DbState,
    register: &RegisterState,
    id: u64,
) -> Result<(), ApiError> {
    debug!(id = id, "delete_product command");

    let mut session = register.lock().await;
    if session.catalog().find(id).is_none() {
        debug!(id = id, "delete_product: no such product");
        return Ok(());
    }

    let mut staged = session.clone();
    staged.remove_product(id);

    db.inner().catalog().save(staged.catalog()).await?;
    *session = staged;

    info!(id = id, "Product deleted");
    Ok(())
}

/// Replaces the whole catalog with an imported JSON document.
///
/// The document is checked in full before anything changes; a single
/// bad product rejects the import.
pub async fn import_products(
    db: &DbState,
    register: &RegisterState,
    json: String,
) -> Result<ImportResponse, ApiError> {
    debug!(bytes = json.len(), "import_products command");

    let mut session = register.lock().await;
    let mut staged = session.clone();
    let imported = staged.import_catalog(&json)?;

    db.inner().catalog().save(staged.catalog()).await?;
    *session = staged;

    info!(count = imported, "Catalog imported");
    Ok(ImportResponse { imported })
}

/// Exports the catalog as JSON with today's date in the file name.
pub async fn export_products(register: &RegisterState) -> Result<ExportResponse, ApiError> {
    debug!("export_products command");

    let session = register.lock().await;
    let contents = transfer::export_catalog(session.catalog())
        .map_err(|e| ApiError::internal(format!("Export failed: {}", e)))?;
    let file_name = transfer::export_file_name(Local::now().date_naive());

    info!(file_name = %file_name, count = session.catalog().len(), "Catalog exported");
    Ok(ExportResponse {
        file_name,
        contents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::fresh;
    use crate::error::ErrorCode;
    use till_core::{Money, Stock};

    fn draft(name: &str, cents: i64) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            price: Money::from_cents(cents),
            category: "Snacks".to_string(),
            stock: Stock::Bounded(5),
        }
    }

    #[tokio::test]
    async fn test_list_and_filter() {
        let (_db, register) = fresh().await;

        assert_eq!(list_products(&register, None).await.len(), 3);

        let snacks = list_products(&register, Some("Snacks".to_string())).await;
        assert_eq!(snacks.len(), 1);
        assert_eq!(snacks[0].id, 102);

        assert_eq!(
            list_categories(&register).await,
            vec!["Coffee Supplies", "Snacks", "Brewed Drinks"]
        );
    }

    #[tokio::test]
    async fn test_get_missing_product() {
        let (_db, register) = fresh().await;
        let err = get_product(&register, 9999).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_save_persists_catalog() {
        let (db, register) = fresh().await;

        let product = save_product(&db, &register, None, draft("Scone", 4500))
            .await
            .unwrap();
        assert_eq!(product.id, 1001);

        let stored = db.inner().catalog().load().await.unwrap();
        assert_eq!(stored.find(1001), Some(&product));
    }

    #[tokio::test]
    async fn test_invalid_save_changes_nothing() {
        let (db, register) = fresh().await;

        let err = save_product(&db, &register, Some(101), draft("", 4500))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let product = get_product(&register, 101).await.unwrap();
        assert_eq!(product.name, "Coffee Beans (Premium)");
        assert!(!db.inner().catalog().exists().await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_product() {
        let (db, register) = fresh().await;

        delete_product(&db, &register, 102).await.unwrap();
        // Idempotent
        delete_product(&db, &register, 102).await.unwrap();

        let stored = db.inner().catalog().load().await.unwrap();
        assert!(stored.find(102).is_none());
        assert_eq!(stored.len(), 2);
    }

    #[tokio::test]
    async fn test_import_replaces_catalog() {
        let (db, register) = fresh().await;
        let json = r#"[
            {"id": 4000, "name": "Tea", "price": 30, "category": "Drinks", "stock": null},
            {"id": 7, "name": "Cake", "price": 80.5, "category": "Snacks", "stock": 3}
        ]"#;

        let response = import_products(&db, &register, json.to_string())
            .await
            .unwrap();
        assert_eq!(response.imported, 2);
        assert_eq!(list_products(&register, None).await.len(), 2);

        // New ids continue above the highest imported id
        let product = save_product(&db, &register, None, draft("Scone", 4500))
            .await
            .unwrap();
        assert_eq!(product.id, 4001);
    }

    #[tokio::test]
    async fn test_bad_import_keeps_catalog() {
        let (db, register) = fresh().await;
        let json = r#"[{"id": 1, "name": "Tea", "price": 0}]"#;

        let err = import_products(&db, &register, json.to_string())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(list_products(&register, None).await.len(), 3);
    }

    #[tokio::test]
    async fn test_export() {
        let (_db, register) = fresh().await;
        let export = export_products(&register).await.unwrap();

        assert!(export.file_name.starts_with("pos_products_export_"));
        assert!(export.file_name.ends_with(".json"));

        let products: Vec<Product> = serde_json::from_str(&export.contents).unwrap();
        assert_eq!(products.len(), 3);
    }
}
