//! # hotcoffee-core: Pure Business Logic for Hot Coffee
//!
//! This crate contains the domain model of the coffee-shop backend as pure
//! types and functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Hot Coffee Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (axum)                              │   │
//! │  │    /orders   /menu   /inventory                                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ hotcoffee-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ fulfillment│  │ validation│  │   │
//! │  │   │ MenuItem  │  │   Money   │  │ Consumption│  │   rules   │  │   │
//! │  │   │  Order    │  │ Quantity  │  │  Reconcile │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 hotcoffee-db (Database Layer)                   │   │
//! │  │        SQLite queries, migrations, transactional engine         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (MenuItem, InventoryItem, Order, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`quantity`] - Fixed-point ingredient quantities
//! - [`fulfillment`] - Ingredient consumption planning and reconciliation
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use hotcoffee_core::money::Money;
//!
//! let latte = Money::from_cents(450); // $4.50
//! let two = latte.multiply_quantity(2);
//! assert_eq!(two.cents(), 900);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod fulfillment;
pub mod money;
pub mod quantity;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use fulfillment::{plan_order, Consumption, LedgerDelta, OrderPlan};
pub use money::Money;
pub use quantity::Quantity;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single order.
///
/// ## Business Reason
/// Keeps a single order transaction small; a cafe ticket never gets close.
pub const MAX_ORDER_LINES: usize = 100;

/// Maximum quantity of a single line in an order.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
pub const MAX_ITEM_QUANTITY: i64 = 999;
