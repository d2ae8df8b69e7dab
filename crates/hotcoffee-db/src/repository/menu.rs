//! # Menu Repository
//!
//! The menu catalog: products, prices and recipes.
//!
//! A menu item is one `menus` row plus its ordered `menu_ingredients` rows.
//! Writes replace the whole recipe inside one transaction.
//!
//! Editing or deleting a menu item never touches existing orders: their
//! lines carry a name/price snapshot and the ledger keeps what each order
//! actually consumed.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::DbResult;
use crate::repository::inventory;
use hotcoffee_core::validation::validate_menu_item;
use hotcoffee_core::{
    CoreError, IngredientRequirement, MenuItem, NewMenuItem, Quantity, ValidationError,
};

#[derive(Debug, FromRow)]
struct MenuRow {
    id: i64,
    name: String,
    description: String,
    price_cents: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct IngredientRow {
    menu_id: i64,
    inventory_id: i64,
    quantity_milli: i64,
}

impl MenuRow {
    fn into_item(self, ingredients: Vec<IngredientRequirement>) -> MenuItem {
        MenuItem {
            id: self.id,
            name: self.name,
            description: self.description,
            price_cents: self.price_cents,
            ingredients,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<IngredientRow> for IngredientRequirement {
    fn from(row: IngredientRow) -> Self {
        IngredientRequirement {
            ingredient_id: row.inventory_id,
            quantity: Quantity::from_milli(row.quantity_milli),
        }
    }
}

/// Repository for menu database operations.
#[derive(Debug, Clone)]
pub struct MenuRepository {
    pool: SqlitePool,
}

impl MenuRepository {
    /// Creates a new MenuRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MenuRepository { pool }
    }

    /// Lists every menu item with its recipe, ordered by id.
    pub async fn list(&self) -> DbResult<Vec<MenuItem>> {
        let mut tx = self.pool.begin().await?;

        let rows: Vec<MenuRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, price_cents, created_at, updated_at
            FROM menus
            ORDER BY id
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let ingredient_rows: Vec<IngredientRow> = sqlx::query_as(
            r#"
            SELECT menu_id, inventory_id, quantity_milli
            FROM menu_ingredients
            ORDER BY menu_id, position
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let mut recipes: HashMap<i64, Vec<IngredientRequirement>> = HashMap::new();
        for row in ingredient_rows {
            recipes.entry(row.menu_id).or_default().push(row.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let recipe = recipes.remove(&row.id).unwrap_or_default();
                row.into_item(recipe)
            })
            .collect())
    }

    /// Gets a menu item by ID.
    pub async fn get(&self, id: i64) -> DbResult<Option<MenuItem>> {
        let mut conn = self.pool.acquire().await?;
        get_in(&mut conn, id).await
    }

    /// Creates a menu item.
    ///
    /// ## Errors
    /// - `Validation` for bad fields or an ingredient id with no inventory row
    pub async fn create(&self, item: &NewMenuItem) -> DbResult<MenuItem> {
        validate_menu_item(item)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO menus (name, description, price_cents, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            RETURNING id
            "#,
        )
        .bind(item.name.trim())
        .bind(item.description.trim())
        .bind(item.price_cents)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        write_recipe(&mut tx, id, &item.ingredients).await?;
        let created = get_in(&mut tx, id)
            .await?
            .ok_or_else(|| CoreError::not_found("Menu item", id))?;

        tx.commit().await?;

        info!(id, name = %created.name, "Menu item created");
        Ok(created)
    }

    /// Replaces a menu item's fields and recipe.
    ///
    /// Open orders keep the consumption they were created with.
    pub async fn update(&self, id: i64, item: &NewMenuItem) -> DbResult<MenuItem> {
        validate_menu_item(item)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let touched = sqlx::query(
            r#"
            UPDATE menus SET
                name = ?2,
                description = ?3,
                price_cents = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(item.name.trim())
        .bind(item.description.trim())
        .bind(item.price_cents)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if touched.rows_affected() == 0 {
            return Err(CoreError::not_found("Menu item", id).into());
        }

        sqlx::query("DELETE FROM menu_ingredients WHERE menu_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        write_recipe(&mut tx, id, &item.ingredients).await?;

        let updated = get_in(&mut tx, id)
            .await?
            .ok_or_else(|| CoreError::not_found("Menu item", id))?;

        tx.commit().await?;

        info!(id, name = %updated.name, "Menu item updated");
        Ok(updated)
    }

    /// Deletes a menu item.
    ///
    /// ## Errors
    /// - `NotFound` if the item doesn't exist
    /// - `Conflict` if an open order still references it
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting menu item");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // Write first so concurrent order creation cannot slip in between
        // the check and the delete.
        let touched = sqlx::query("UPDATE menus SET updated_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        if touched.rows_affected() == 0 {
            return Err(CoreError::not_found("Menu item", id).into());
        }

        let open_orders: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(DISTINCT o.id)
            FROM items i
            JOIN orders o ON o.id = i.order_id
            WHERE i.product_id = ?1 AND o.status = 'open'
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if open_orders > 0 {
            return Err(CoreError::Conflict(format!(
                "menu item {id} is referenced by {open_orders} open order(s)"
            ))
            .into());
        }

        sqlx::query("DELETE FROM menus WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(id, "Menu item deleted");
        Ok(())
    }
}

// =============================================================================
// In-transaction helpers
// =============================================================================

pub(crate) async fn get_in(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<MenuItem>> {
    let row: Option<MenuRow> = sqlx::query_as(
        r#"
        SELECT id, name, description, price_cents, created_at, updated_at
        FROM menus
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let ingredients: Vec<IngredientRow> = sqlx::query_as(
        r#"
        SELECT menu_id, inventory_id, quantity_milli
        FROM menu_ingredients
        WHERE menu_id = ?1
        ORDER BY position
        "#,
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(
        row.into_item(ingredients.into_iter().map(Into::into).collect()),
    ))
}

/// Loads the menu items referenced by `product_ids`, keyed by id.
///
/// Unknown ids are left out; order planning reports them as `NotFound`.
pub(crate) async fn load_many_in(
    conn: &mut SqliteConnection,
    product_ids: &[i64],
) -> DbResult<HashMap<i64, MenuItem>> {
    let mut menu = HashMap::new();
    for &id in product_ids {
        if menu.contains_key(&id) {
            continue;
        }
        if let Some(item) = get_in(conn, id).await? {
            menu.insert(id, item);
        }
    }
    Ok(menu)
}

async fn write_recipe(
    conn: &mut SqliteConnection,
    menu_id: i64,
    ingredients: &[IngredientRequirement],
) -> DbResult<()> {
    let ids: Vec<i64> = ingredients.iter().map(|r| r.ingredient_id).collect();
    if let Some(&unknown) = inventory::missing_ids(conn, &ids).await?.first() {
        return Err(ValidationError::UnknownReference {
            field: "ingredient_id".to_string(),
            id: unknown,
        }
        .into());
    }

    for (position, req) in ingredients.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO menu_ingredients (menu_id, inventory_id, quantity_milli, position)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(menu_id)
        .bind(req.ingredient_id)
        .bind(req.quantity.milli())
        .bind(position as i64)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
