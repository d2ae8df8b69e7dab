//! Menu catalog service.

use std::sync::Arc;

use hotcoffee_core::{MenuItem, NewMenuItem};
use tracing::info;

use super::{bounded, found};
use crate::error::ServiceResult;
use crate::state::AppState;

pub struct MenuService {
    state: Arc<AppState>,
}

impl MenuService {
    pub fn new(state: Arc<AppState>) -> Self {
        MenuService { state }
    }

    pub async fn create(&self, item: &NewMenuItem) -> ServiceResult<MenuItem> {
        let created = bounded(
            "create menu item",
            self.state.config.request_timeout(),
            self.state.db.menus().create(item),
        )
        .await?;

        info!(
            menu_id = created.id,
            name = %created.name,
            ingredients = created.ingredients.len(),
            "menu item created"
        );
        Ok(created)
    }

    pub async fn list(&self) -> ServiceResult<Vec<MenuItem>> {
        bounded(
            "list menu",
            self.state.config.request_timeout(),
            self.state.db.menus().list(),
        )
        .await
    }

    pub async fn get(&self, id: i64) -> ServiceResult<MenuItem> {
        let item = bounded(
            "get menu item",
            self.state.config.request_timeout(),
            self.state.db.menus().get(id),
        )
        .await?;
        found("Menu item", id, item)
    }

    pub async fn update(&self, id: i64, item: &NewMenuItem) -> ServiceResult<MenuItem> {
        let updated = bounded(
            "update menu item",
            self.state.config.request_timeout(),
            self.state.db.menus().update(id, item),
        )
        .await?;

        info!(menu_id = id, price = %updated.price(), "menu item updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        bounded(
            "delete menu item",
            self.state.config.request_timeout(),
            self.state.db.menus().delete(id),
        )
        .await?;

        info!(menu_id = id, "menu item deleted");
        Ok(())
    }
}
