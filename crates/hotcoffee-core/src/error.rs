//! # Error Types
//!
//! Domain-specific error types for hotcoffee-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  hotcoffee-core errors (this file)                                     │
//! │  ├── CoreError        - Domain invariant violations                    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  hotcoffee-db errors (separate crate)                                  │
//! │  └── DbError          - Database failures, carries CoreError           │
//! │                                                                         │
//! │  HTTP API errors (in app)                                              │
//! │  └── ServiceError     - 400 / 404 / 409 / 503 / 500 taxonomy           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ServiceError → JSON     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::quantity::Quantity;
use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent business rule violations. The service layer maps each
/// variant onto exactly one HTTP status.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// A referenced entity does not exist.
    ///
    /// ## When This Occurs
    /// - Order / menu item / inventory item id doesn't exist
    /// - An order line names a product that is not on the menu
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: i64 },

    /// Applying a ledger delta would drive an ingredient below zero.
    ///
    /// ## User Workflow
    /// ```text
    /// POST /orders (2 × Latte, 200 milk each)
    ///      │
    ///      ▼
    /// milk: available=300, requested=400
    ///      │
    ///      ▼
    /// InsufficientStock { ingredient: "Milk", available: 300, requested: 400 }
    ///      │
    ///      ▼
    /// 409, nothing deducted
    /// ```
    #[error("Insufficient stock for {ingredient} (#{ingredient_id}): available {available}, requested {requested}")]
    InsufficientStock {
        ingredient_id: i64,
        ingredient: String,
        available: Quantity,
        requested: Quantity,
    },

    /// Order is not in a state that allows the requested operation.
    ///
    /// ## When This Occurs
    /// - Closing an order that is already closed
    /// - Updating a closed order
    #[error("Order {order_id} is {current_status}, cannot perform operation")]
    InvalidOrderStatus {
        order_id: i64,
        current_status: OrderStatus,
    },

    /// An operation would leave a dangling reference.
    ///
    /// ## When This Occurs
    /// - Deleting a menu item that an open order still references
    /// - Deleting an ingredient that a menu item still uses
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: i64) -> Self {
        CoreError::NotFound {
            entity: entity.into(),
            id,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when request input doesn't meet requirements.
/// Used for early validation before any transaction is opened.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// The same id appears twice where ids must be unique.
    #[error("{field} '{value}' appears more than once")]
    Duplicate { field: String, value: String },

    /// Arithmetic on the value would overflow.
    #[error("{field} is too large")]
    Overflow { field: String },

    /// An id points at an entity that doesn't exist.
    #[error("{field} references unknown id {id}")]
    UnknownReference { field: String, id: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
