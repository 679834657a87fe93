//! # Error Types
//!
//! Domain-specific error types for till-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  till-core errors (this file)                                          │
//! │  ├── CoreError        - Cart / checkout rule violations                │
//! │  └── ValidationError  - Malformed product or import payload            │
//! │                                                                         │
//! │  till-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Register API errors (in app)                                          │
//! │  └── ApiError         - What the front end sees (serialized)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Front end              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Recoverability
//! Every error here is raised BEFORE any state is touched. The caller shows
//! a message and lets the operator retry; Catalog, Cart and Ledger are
//! exactly as they were.

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Attempted to put more units in the cart than the product has.
    ///
    /// ## User Workflow
    /// ```text
    /// Tap "Coffee Beans" (stock: 2, in cart: 2)
    ///      │
    ///      ▼
    /// StockExceeded { product_id: 101, available: 2, requested: 3 }
    ///      │
    ///      ▼
    /// UI shows: "Coffee Beans: only 2 in stock"   (cart unchanged)
    /// ```
    #[error("Insufficient stock for {name} (#{product_id}): available {available}, requested {requested}")]
    StockExceeded {
        product_id: u64,
        name: String,
        available: u32,
        requested: u32,
    },

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty, nothing to check out")]
    EmptyCart,

    /// Cash tendered does not cover the amount receivable.
    #[error("Insufficient payment: receivable {receivable}, tendered {tendered}")]
    InsufficientPayment { receivable: Money, tendered: Money },

    /// A checkout is already running for this register.
    #[error("A checkout is already in progress")]
    CheckoutInProgress,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by product upserts and catalog imports before any mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. not a JSON array, price is a string).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g. two products with the same id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    /// Creates a Required error for the given field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Creates an InvalidFormat error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::StockExceeded {
            product_id: 101,
            name: "Coffee Beans".to_string(),
            available: 2,
            requested: 3,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Coffee Beans (#101): available 2, requested 3"
        );

        let err = CoreError::InsufficientPayment {
            receivable: Money::from_cents(19500),
            tendered: Money::from_cents(15000),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient payment: receivable $195.00, tendered $150.00"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::required("name");
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::Duplicate {
            field: "id".to_string(),
            value: "101".to_string(),
        };
        assert_eq!(err.to_string(), "id '101' already exists");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("category").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
