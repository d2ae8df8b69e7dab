//! Inventory ledger service.
//!
//! Quantity only moves through [`InventoryService::adjust`] (manual
//! restock or correction) or through the order engine.

use std::sync::Arc;

use hotcoffee_core::{InventoryItem, InventoryUpdate, NewInventoryItem, Quantity};
use tracing::info;

use super::{bounded, found};
use crate::error::ServiceResult;
use crate::state::AppState;

pub struct InventoryService {
    state: Arc<AppState>,
}

impl InventoryService {
    pub fn new(state: Arc<AppState>) -> Self {
        InventoryService { state }
    }

    pub async fn create(&self, item: &NewInventoryItem) -> ServiceResult<InventoryItem> {
        let created = bounded(
            "create inventory item",
            self.state.config.request_timeout(),
            self.state.db.inventory().create(item),
        )
        .await?;

        info!(
            inventory_id = created.id,
            name = %created.name,
            quantity = %created.quantity,
            "inventory item created"
        );
        Ok(created)
    }

    pub async fn list(&self) -> ServiceResult<Vec<InventoryItem>> {
        bounded(
            "list inventory",
            self.state.config.request_timeout(),
            self.state.db.inventory().list(),
        )
        .await
    }

    pub async fn get(&self, id: i64) -> ServiceResult<InventoryItem> {
        let item = bounded(
            "get inventory item",
            self.state.config.request_timeout(),
            self.state.db.inventory().get(id),
        )
        .await?;
        found("Inventory item", id, item)
    }

    pub async fn update(&self, id: i64, update: &InventoryUpdate) -> ServiceResult<InventoryItem> {
        let updated = bounded(
            "update inventory item",
            self.state.config.request_timeout(),
            self.state.db.inventory().update(id, update),
        )
        .await?;

        info!(inventory_id = id, name = %updated.name, "inventory item updated");
        Ok(updated)
    }

    /// Add `delta` (negative to remove) and return the new on-hand quantity.
    pub async fn adjust(&self, id: i64, delta: Quantity) -> ServiceResult<Quantity> {
        let quantity = bounded(
            "adjust inventory",
            self.state.config.request_timeout(),
            self.state.db.inventory().adjust(id, delta),
        )
        .await?;

        info!(inventory_id = id, %delta, %quantity, "inventory adjusted");
        Ok(quantity)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        bounded(
            "delete inventory item",
            self.state.config.request_timeout(),
            self.state.db.inventory().delete(id),
        )
        .await?;

        info!(inventory_id = id, "inventory item deleted");
        Ok(())
    }
}
