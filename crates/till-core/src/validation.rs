//! # Validation Module
//!
//! Input validation for catalog writes.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front end form                                               │
//! │  └── Basic format checks (empty fields)                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Deserialization                                              │
//! │  └── Type validation (price is a number, stock is a count)            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: THIS MODULE                                                  │
//! │  └── Business rules, run before the catalog is touched                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Product, ProductDraft};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest product name accepted.
pub const MAX_NAME_LEN: usize = 200;

/// Highest unit price accepted, in cents ($10,000,000.00).
pub const MAX_PRICE_CENTS: i64 = 1_000_000_000;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most 200 characters
///
/// ## Example
/// ```rust
/// use till_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Americano").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::OutOfRange {
            field: "name length".to_string(),
            min: 1,
            max: MAX_NAME_LEN as i64,
        });
    }

    Ok(())
}

/// Validates a category label. Must not be empty.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    if category.trim().is_empty() {
        return Err(ValidationError::required("category"));
    }

    Ok(())
}

/// Validates a price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
/// - At most [`MAX_PRICE_CENTS`]
///
/// ## Example
/// ```rust
/// use till_core::money::Money;
/// use till_core::validation::{validate_price, MAX_PRICE_CENTS};
///
/// assert!(validate_price(Money::from_cents(6500)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_cents(-100)).is_err());
/// assert!(validate_price(Money::from_cents(MAX_PRICE_CENTS + 1)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() || price.cents() > MAX_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a product identifier. Zero is reserved for "no id".
pub fn validate_product_id(id: u64) -> ValidationResult<()> {
    if id == 0 {
        return Err(ValidationError::required("id"));
    }

    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates the editable fields submitted for an upsert.
pub fn validate_draft(draft: &ProductDraft) -> ValidationResult<()> {
    validate_product_name(&draft.name)?;
    validate_price(draft.price)?;
    validate_category(&draft.category)?;
    Ok(())
}

/// Validates a full catalog before a wholesale replace.
///
/// ## Rules
/// - Every product has a non-zero id, a name and a non-negative price
/// - Ids are unique
///
/// Category is not required here: imported catalogs may leave it blank.
pub fn validate_catalog(products: &[Product]) -> ValidationResult<()> {
    let mut seen = HashSet::with_capacity(products.len());

    for product in products {
        validate_product_id(product.id)?;
        validate_product_name(&product.name)?;
        validate_price(product.price)?;

        if !seen.insert(product.id) {
            return Err(ValidationError::Duplicate {
                field: "id".to_string(),
                value: product.id.to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Stock;

    fn product(id: u64, name: &str) -> Product {
        Product {
            id,
            name: name.to_string(),
            price: Money::from_cents(100),
            category: String::new(),
            stock: Stock::Unbounded,
        }
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Hand-made Cookies").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_draft() {
        let draft = ProductDraft {
            name: "Latte".to_string(),
            price: Money::from_cents(8000),
            category: "Brewed Drinks".to_string(),
            stock: Stock::Unbounded,
        };
        assert!(validate_draft(&draft).is_ok());

        let no_category = ProductDraft {
            category: " ".to_string(),
            ..draft.clone()
        };
        assert_eq!(
            validate_draft(&no_category),
            Err(ValidationError::required("category"))
        );

        let negative = ProductDraft {
            price: Money::from_cents(-1),
            ..draft
        };
        assert!(validate_draft(&negative).is_err());
    }

    #[test]
    fn test_validate_price_bounds() {
        assert!(validate_price(Money::from_cents(MAX_PRICE_CENTS)).is_ok());
        assert_eq!(
            validate_price(Money::from_cents(MAX_PRICE_CENTS + 1)),
            Err(ValidationError::OutOfRange {
                field: "price".to_string(),
                min: 0,
                max: MAX_PRICE_CENTS,
            })
        );
    }

    #[test]
    fn test_validate_catalog_rejects_duplicates_and_zero_ids() {
        assert!(validate_catalog(&[product(1, "a"), product(2, "b")]).is_ok());
        assert!(matches!(
            validate_catalog(&[product(1, "a"), product(1, "b")]),
            Err(ValidationError::Duplicate { .. })
        ));
        assert_eq!(
            validate_catalog(&[product(0, "a")]),
            Err(ValidationError::required("id"))
        );
    }
}
