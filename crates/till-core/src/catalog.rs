//! # Catalog Store
//!
//! In-memory table of products; the source of truth for price and stock.
//!
//! ## Id Allocation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  next id = max(largest existing id, floor) + 1                         │
//! │                                                                         │
//! │  floor starts at 1000 and is raised to every id handed out, so a       │
//! │  deleted product's id is never reused within a session.                │
//! │                                                                         │
//! │  [101, 102, 201]        floor 1000  ──► new product gets 1001          │
//! │  [101, 102, 201, 1001]  floor 1001  ──► delete 1001, add ──► 1002      │
//! │  import [5, 4000]       floor 4000  ──► new product gets 4001          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Persistence
//! The catalog itself does no I/O. The register layer saves it after every
//! successful mutation (see `till-db`).

use tracing::debug;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Product, ProductDraft, Stock};
use crate::validation::{validate_catalog, validate_draft};
use crate::PRODUCT_ID_FLOOR;

/// The product table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
    id_floor: u64,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Catalog {
            products: Vec::new(),
            id_floor: PRODUCT_ID_FLOOR,
        }
    }

    /// Creates the catalog a brand-new register starts with.
    ///
    /// ## Default Products
    /// - 101 Coffee Beans (Premium), 350.00, 50 in stock
    /// - 102 Hand-made Cookies (Box), 120.00, 100 in stock
    /// - 201 Americano, 65.00, unbounded (brewed to order)
    pub fn with_defaults() -> Self {
        Catalog::from_products(vec![
            Product {
                id: 101,
                name: "Coffee Beans (Premium)".to_string(),
                price: Money::from_major_minor(350, 0),
                category: "Coffee Supplies".to_string(),
                stock: Stock::Bounded(50),
            },
            Product {
                id: 102,
                name: "Hand-made Cookies (Box)".to_string(),
                price: Money::from_major_minor(120, 0),
                category: "Snacks".to_string(),
                stock: Stock::Bounded(100),
            },
            Product {
                id: 201,
                name: "Americano".to_string(),
                price: Money::from_major_minor(65, 0),
                category: "Brewed Drinks".to_string(),
                stock: Stock::Unbounded,
            },
        ])
    }

    /// Rebuilds a catalog from persisted products, recomputing the id floor.
    ///
    /// No validation: stored documents were validated when written.
    pub fn from_products(products: Vec<Product>) -> Self {
        let id_floor = floor_for(&products);
        Catalog { products, id_floor }
    }

    /// Inserts or edits a product.
    ///
    /// ## Behavior
    /// - `id` given and present: every editable field is replaced in place
    /// - otherwise: a fresh id is allocated and the product is appended
    ///
    /// ## Errors
    /// `ValidationError` if the name or category is empty, or the price is
    /// negative. The catalog is unchanged on error.
    pub fn upsert(&mut self, id: Option<u64>, draft: ProductDraft) -> Result<Product, ValidationError> {
        validate_draft(&draft)?;

        if let Some(existing) = id.and_then(|id| self.products.iter_mut().find(|p| p.id == id)) {
            debug!(id = existing.id, "Updating product");
            *existing = Product::from_draft(existing.id, draft);
            return Ok(existing.clone());
        }

        let new_id = self.next_id();
        debug!(id = new_id, "Inserting product");
        let product = Product::from_draft(new_id, draft);
        self.products.push(product.clone());
        Ok(product)
    }

    /// Deletes a product. Deleting an unknown id does nothing.
    pub fn remove(&mut self, id: u64) {
        self.products.retain(|p| p.id != id);
    }

    /// Looks up a product by id.
    pub fn find(&self, id: u64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub(crate) fn find_mut(&mut self, id: u64) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == id)
    }

    /// All products, in insertion order.
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// Replaces the whole catalog (used by import).
    ///
    /// ## Errors
    /// `ValidationError` if any product lacks an id or a name, has a
    /// negative price, or repeats an id. Nothing is replaced on error.
    pub fn bulk_replace(&mut self, products: Vec<Product>) -> Result<(), ValidationError> {
        validate_catalog(&products)?;
        self.id_floor = floor_for(&products);
        self.products = products;
        Ok(())
    }

    /// Distinct categories, in the order they first appear.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for product in &self.products {
            if !categories.contains(&product.category.as_str()) {
                categories.push(&product.category);
            }
        }
        categories
    }

    /// Products in one category. `None` returns everything.
    pub fn by_category<'a>(&'a self, category: Option<&'a str>) -> impl Iterator<Item = &'a Product> + 'a {
        self.products
            .iter()
            .filter(move |p| category.map_or(true, |c| p.category == c))
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Checks if the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    fn next_id(&mut self) -> u64 {
        let max_id = self.products.iter().map(|p| p.id).max().unwrap_or(0);
        let id = max_id.max(self.id_floor) + 1;
        self.id_floor = id;
        id
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

fn floor_for(products: &[Product]) -> u64 {
    products
        .iter()
        .map(|p| p.id)
        .fold(PRODUCT_ID_FLOOR, u64::max)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, cents: i64) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            price: Money::from_cents(cents),
            category: "Snacks".to_string(),
            stock: Stock::Bounded(10),
        }
    }

    #[test]
    fn test_insert_allocates_above_floor() {
        let mut catalog = Catalog::with_defaults();

        let first = catalog.upsert(None, draft("Muffin", 9000)).unwrap();
        let second = catalog.upsert(None, draft("Scone", 8500)).unwrap();

        assert_eq!(first.id, 1001);
        assert_eq!(second.id, 1002);
        assert_eq!(catalog.len(), 5);
    }

    #[test]
    fn test_deleted_ids_are_not_reused() {
        let mut catalog = Catalog::new();

        let muffin = catalog.upsert(None, draft("Muffin", 9000)).unwrap();
        catalog.remove(muffin.id);
        let scone = catalog.upsert(None, draft("Scone", 8500)).unwrap();

        assert_eq!(muffin.id, 1001);
        assert_eq!(scone.id, 1002);
    }

    #[test]
    fn test_update_replaces_fields_in_place() {
        let mut catalog = Catalog::with_defaults();

        let updated = catalog
            .upsert(Some(102), draft("Cookies (Tin)", 15000))
            .unwrap();

        assert_eq!(updated.id, 102);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.all()[1].name, "Cookies (Tin)");
        assert_eq!(catalog.find(102).unwrap().price.cents(), 15000);
    }

    #[test]
    fn test_upsert_with_unknown_id_inserts() {
        let mut catalog = Catalog::with_defaults();

        let product = catalog.upsert(Some(555), draft("Muffin", 9000)).unwrap();

        assert_eq!(product.id, 1001);
        assert!(catalog.find(555).is_none());
    }

    #[test]
    fn test_upsert_rejects_invalid_draft_without_mutation() {
        let mut catalog = Catalog::with_defaults();
        let before = catalog.clone();

        let mut bad = draft("", 100);
        assert!(catalog.upsert(None, bad.clone()).is_err());

        bad.name = "Tea".to_string();
        bad.category = String::new();
        assert!(catalog.upsert(Some(101), bad).is_err());

        assert!(catalog.upsert(None, draft("Tea", -1)).is_err());
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut catalog = Catalog::with_defaults();
        catalog.remove(101);
        catalog.remove(101);
        catalog.remove(9999);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.find(101).is_none());
    }

    #[test]
    fn test_bulk_replace_recomputes_floor() {
        let mut catalog = Catalog::with_defaults();
        let imported = vec![
            Product::from_draft(5, draft("Tea", 4000)),
            Product::from_draft(4000, draft("Cake", 12000)),
        ];

        catalog.bulk_replace(imported).unwrap();
        let next = catalog.upsert(None, draft("Muffin", 9000)).unwrap();

        assert_eq!(next.id, 4001);
        assert!(catalog.find(101).is_none());
    }

    #[test]
    fn test_bulk_replace_rejects_bad_entries_atomically() {
        let mut catalog = Catalog::with_defaults();
        let before = catalog.clone();

        let imported = vec![
            Product::from_draft(5, draft("Tea", 4000)),
            Product::from_draft(6, draft("", 4000)),
        ];

        assert!(catalog.bulk_replace(imported).is_err());
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_categories_and_filter() {
        let catalog = Catalog::with_defaults();

        assert_eq!(
            catalog.categories(),
            vec!["Coffee Supplies", "Snacks", "Brewed Drinks"]
        );

        let snacks: Vec<u64> = catalog.by_category(Some("Snacks")).map(|p| p.id).collect();
        assert_eq!(snacks, vec![102]);
        assert_eq!(catalog.by_category(None).count(), 3);
    }
}
