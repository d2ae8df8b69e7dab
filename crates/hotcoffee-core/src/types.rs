//! # Domain Types
//!
//! Core domain types used throughout Hot Coffee.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   MenuItem      │   │     Order       │   │ InventoryItem   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  price_cents    │   │  customer_name  │   │  quantity       │       │
//! │  │  ingredients ───┼──►│  items          │   │  unit           │       │
//! │  └─────────────────┘   │  status         │   └────────▲────────┘       │
//! │          │             └─────────────────┘            │                │
//! │          └──────── IngredientRequirement ─────────────┘                │
//! │                    (ingredient_id, quantity per unit)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! An [`OrderLine`] freezes the menu item's name and unit price at the time
//! the order is placed, so later menu edits never rewrite history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::quantity::Quantity;

// =============================================================================
// Inventory
// =============================================================================

/// An ingredient tracked by the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: i64,
    pub name: String,
    /// Current stock. Never negative.
    pub quantity: Quantity,
    /// Unit the quantity is counted in ("ml", "g", "shots").
    pub unit: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInventoryItem {
    pub name: String,
    pub quantity: Quantity,
    pub unit: String,
}

/// Metadata update for an inventory item. Stock only moves through
/// the ledger's adjust operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryUpdate {
    pub name: String,
    pub unit: String,
}

// =============================================================================
// Menu
// =============================================================================

/// Amount of one ingredient consumed by a single unit of a menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientRequirement {
    pub ingredient_id: i64,
    pub quantity: Quantity,
}

/// A product on the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Price in cents (smallest currency unit).
    pub price_cents: i64,
    /// Recipe, in the order it was entered.
    pub ingredients: Vec<IngredientRequirement>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MenuItem {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Input for creating or replacing a menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMenuItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
    pub ingredients: Vec<IngredientRequirement>,
}

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle state of an order.
///
/// ```text
///   create ──► Open ──close──► Closed (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order placed, stock already deducted, still editable.
    Open,
    /// Order handed over. Read and delete only.
    Closed,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Open => "open",
            OrderStatus::Closed => "closed",
        }
    }

    /// Whether lines and customer name may still change.
    #[inline]
    pub const fn is_mutable(&self) -> bool {
        matches!(self, OrderStatus::Open)
    }

    /// Applies the close transition.
    ///
    /// Closing twice is caller misuse and is reported, not ignored.
    pub fn close(self, order_id: i64) -> CoreResult<OrderStatus> {
        match self {
            OrderStatus::Open => Ok(OrderStatus::Closed),
            OrderStatus::Closed => Err(CoreError::InvalidOrderStatus {
                order_id,
                current_status: self,
            }),
        }
    }

    /// Guards an edit of the order's lines.
    pub fn ensure_mutable(self, order_id: i64) -> CoreResult<()> {
        if self.is_mutable() {
            Ok(())
        } else {
            Err(CoreError::InvalidOrderStatus {
                order_id,
                current_status: self,
            })
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Open
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Orders
// =============================================================================

/// One requested line: which product, how many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineRequest {
    pub product_id: i64,
    pub quantity: i64,
}

/// Body of an order create/replace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub customer_name: String,
    pub items: Vec<OrderLineRequest>,
}

/// A persisted order line with its snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: i64,
    pub quantity: i64,
    /// Menu item name at time of ordering (frozen).
    pub name: String,
    /// Unit price in cents at time of ordering (frozen).
    pub unit_price_cents: i64,
}

impl OrderLine {
    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.unit_price_cents).multiply_quantity(self.quantity)
    }
}

/// A customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub customer_name: String,
    pub items: Vec<OrderLine>,
    pub status: OrderStatus,
    /// Sum of line totals, from the snapshot prices.
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Returns the order total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
