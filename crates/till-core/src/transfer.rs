//! # Catalog Import / Export
//!
//! JSON text in, JSON text out. Reading and writing the actual file is the
//! front end's job.
//!
//! ## Import Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  document must be a JSON array                                          │
//! │  every element must have:                                               │
//! │    id     non-zero integer                                              │
//! │    name   non-empty string                                              │
//! │    price  non-zero number (≥ 0 after rounding to cents)                 │
//! │  optional: category (default ""), stock (missing / null = unbounded)    │
//! │  stock 999 is the old "unlimited" marker and reads as unbounded         │
//! │  ids must be unique                                                     │
//! │                                                                         │
//! │  ONE bad element rejects the whole document                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde_json::Value;

use crate::catalog::Catalog;
use crate::error::ValidationError;
use crate::types::Product;
use crate::validation::{validate_catalog, ValidationResult};

/// Parses an import document into products, ready for
/// [`Catalog::bulk_replace`].
///
/// ## Errors
/// `ValidationError::InvalidFormat` naming the first offending element, or
/// the error from [`validate_catalog`].
pub fn parse_import(json: &str) -> ValidationResult<Vec<Product>> {
    let document: Value = serde_json::from_str(json)
        .map_err(|e| ValidationError::invalid_format("import", e.to_string()))?;

    let Value::Array(elements) = document else {
        return Err(ValidationError::invalid_format(
            "import",
            "expected an array of products",
        ));
    };

    let mut products = Vec::with_capacity(elements.len());
    for (index, element) in elements.into_iter().enumerate() {
        check_required_fields(index, &element)?;
        let mut product: Product = serde_json::from_value(element).map_err(|e| {
            ValidationError::invalid_format(format!("products[{index}]"), e.to_string())
        })?;
        product.stock = product.stock.normalize_legacy();
        products.push(product);
    }

    validate_catalog(&products)?;
    Ok(products)
}

fn check_required_fields(index: usize, element: &Value) -> ValidationResult<()> {
    let field = |name: &str| format!("products[{index}].{name}");

    match element.get("id").and_then(Value::as_u64) {
        Some(id) if id != 0 => {}
        _ => return Err(ValidationError::required(field("id"))),
    }

    match element.get("name").and_then(Value::as_str) {
        Some(name) if !name.is_empty() => {}
        _ => return Err(ValidationError::required(field("name"))),
    }

    match element.get("price").and_then(Value::as_f64) {
        Some(price) if price != 0.0 => {}
        _ => return Err(ValidationError::required(field("price"))),
    }

    Ok(())
}

/// Serializes the catalog as a pretty-printed JSON array.
pub fn export_catalog(catalog: &Catalog) -> serde_json::Result<String> {
    serde_json::to_string_pretty(catalog.all())
}

/// File name offered when exporting on `date`.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use till_core::transfer::export_file_name;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
/// assert_eq!(export_file_name(date), "pos_products_export_2024-03-09.json");
/// ```
pub fn export_file_name(date: NaiveDate) -> String {
    format!("pos_products_export_{}.json", date.format("%Y-%m-%d"))
}

// =============================================================================
// Unit Tests
// =============================================================================
