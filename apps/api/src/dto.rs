//! Request bodies that are not domain types.
//!
//! Orders, menu items and new inventory rows deserialize straight into the
//! `hotcoffee_core` input types.

use hotcoffee_core::Quantity;
use serde::Deserialize;

/// Body of `POST /inventory/{id}/adjust`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AdjustStockRequest {
    /// Signed amount; negative removes stock.
    pub delta: Quantity,
}
