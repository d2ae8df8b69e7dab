//! # Inventory Repository
//!
//! The inventory ledger: ingredient rows and the one operation that moves
//! their stock.
//!
//! ## Adjust Is Compare-And-Set
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  ❌ WRONG: read, check, write                                       │
//! │     SELECT quantity ...            (both callers read 200)         │
//! │     UPDATE ... SET quantity = 0    (both write, one update lost)   │
//! │                                                                     │
//! │  ✅ RIGHT: one conditional statement                                │
//! │     UPDATE inventory                                               │
//! │        SET quantity_milli = quantity_milli + :delta                │
//! │      WHERE id = :id                                                │
//! │        AND quantity_milli + :delta BETWEEN 0 AND :max              │
//! │     RETURNING quantity_milli                                       │
//! │                                                                     │
//! │  No row back → the id is unknown, stock is short, or the           │
//! │  result would pass MAX_STOCK.                                      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The order engine calls [`apply_delta`] inside its own transaction, so a
//! short ingredient aborts the whole order.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use hotcoffee_core::validation::{
    stock_out_of_range, validate_inventory_item, validate_name, validate_stock_delta,
    validate_unit, MAX_STOCK,
};
use hotcoffee_core::{
    CoreError, InventoryItem, InventoryUpdate, LedgerDelta, NewInventoryItem, Quantity,
};

#[derive(Debug, FromRow)]
struct InventoryRow {
    id: i64,
    name: String,
    quantity_milli: i64,
    unit: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<InventoryRow> for InventoryItem {
    fn from(row: InventoryRow) -> Self {
        InventoryItem {
            id: row.id,
            name: row.name,
            quantity: Quantity::from_milli(row.quantity_milli),
            unit: row.unit,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_INVENTORY: &str = r#"
    SELECT id, name, quantity_milli, unit, created_at, updated_at
    FROM inventory
"#;

/// Repository for inventory database operations.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Lists all ingredients ordered by id.
    pub async fn list(&self) -> DbResult<Vec<InventoryItem>> {
        let rows: Vec<InventoryRow> = sqlx::query_as(&format!("{SELECT_INVENTORY} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(InventoryItem::from).collect())
    }

    /// Gets an ingredient by ID.
    pub async fn get(&self, id: i64) -> DbResult<Option<InventoryItem>> {
        let row: Option<InventoryRow> =
            sqlx::query_as(&format!("{SELECT_INVENTORY} WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(InventoryItem::from))
    }

    /// Creates an ingredient with its starting stock.
    pub async fn create(&self, item: &NewInventoryItem) -> DbResult<InventoryItem> {
        validate_inventory_item(item)?;

        let now = Utc::now();
        debug!(name = %item.name, quantity = %item.quantity, "Creating inventory item");

        let row: InventoryRow = sqlx::query_as(
            r#"
            INSERT INTO inventory (name, quantity_milli, unit, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            RETURNING id, name, quantity_milli, unit, created_at, updated_at
            "#,
        )
        .bind(item.name.trim())
        .bind(item.quantity.milli())
        .bind(item.unit.trim())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        info!(id = row.id, name = %row.name, "Inventory item created");
        Ok(row.into())
    }

    /// Renames an ingredient or changes its unit. Stock is untouched.
    pub async fn update(&self, id: i64, update: &InventoryUpdate) -> DbResult<InventoryItem> {
        validate_name(&update.name)?;
        validate_unit(&update.unit)?;

        let now = Utc::now();
        debug!(id, name = %update.name, "Updating inventory item");

        let row: Option<InventoryRow> = sqlx::query_as(
            r#"
            UPDATE inventory SET
                name = ?2,
                unit = ?3,
                updated_at = ?4
            WHERE id = ?1
            RETURNING id, name, quantity_milli, unit, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(update.name.trim())
        .bind(update.unit.trim())
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        row.map(InventoryItem::from)
            .ok_or_else(|| CoreError::not_found("Inventory item", id).into())
    }

    /// Applies a signed stock change and returns the new quantity.
    ///
    /// Positive deltas restock, negative deltas consume.
    ///
    /// ## Errors
    /// - `NotFound` if the ingredient doesn't exist
    /// - `InsufficientStock` if the result would be negative
    /// - `Validation(OutOfRange)` if the delta or the result exceeds `MAX_STOCK`
    pub async fn adjust(&self, id: i64, delta: Quantity) -> DbResult<Quantity> {
        validate_stock_delta(delta)?;

        let mut conn = self.pool.acquire().await?;
        let quantity = adjust_in(&mut conn, id, delta, Utc::now()).await?;

        info!(id, %delta, %quantity, "Inventory adjusted");
        Ok(quantity)
    }

    /// Deletes an ingredient.
    ///
    /// Fails with `Conflict` while a menu item's recipe still uses it.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting inventory item");

        let result = sqlx::query("DELETE FROM inventory WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => {
                Err(CoreError::not_found("Inventory item", id).into())
            }
            Ok(_) => {
                info!(id, "Inventory item deleted");
                Ok(())
            }
            Err(err) => match DbError::from(err) {
                DbError::ForeignKeyViolation { .. } => Err(CoreError::Conflict(format!(
                    "inventory item {id} is used by a menu item"
                ))
                .into()),
                other => Err(other),
            },
        }
    }
}

// =============================================================================
// In-transaction helpers
// =============================================================================

/// Compare-and-set stock change on one row, on the caller's connection.
pub(crate) async fn adjust_in(
    conn: &mut SqliteConnection,
    id: i64,
    delta: Quantity,
    now: DateTime<Utc>,
) -> DbResult<Quantity> {
    let updated: Option<i64> = sqlx::query_scalar(
        r#"
        UPDATE inventory SET
            quantity_milli = quantity_milli + ?2,
            updated_at = ?3
        WHERE id = ?1 AND quantity_milli + ?2 BETWEEN 0 AND ?4
        RETURNING quantity_milli
        "#,
    )
    .bind(id)
    .bind(delta.milli())
    .bind(now)
    .bind(MAX_STOCK.milli())
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(milli) = updated {
        return Ok(Quantity::from_milli(milli));
    }

    let current: Option<(String, i64)> =
        sqlx::query_as("SELECT name, quantity_milli FROM inventory WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

    match current {
        None => Err(CoreError::not_found("Inventory item", id).into()),
        Some((name, available))
            if available.checked_add(delta.milli()).is_some_and(|q| q < 0) =>
        {
            Err(CoreError::InsufficientStock {
                ingredient_id: id,
                ingredient: name,
                available: Quantity::from_milli(available),
                requested: Quantity::from_milli(delta.milli().saturating_neg()),
            }
            .into())
        }
        Some(_) => Err(stock_out_of_range("quantity").into()),
    }
}

/// Applies every entry of `delta` in ascending ingredient order.
///
/// Stops at the first failure; the caller's transaction must be dropped.
pub(crate) async fn apply_delta(
    conn: &mut SqliteConnection,
    delta: &LedgerDelta,
    now: DateTime<Utc>,
) -> DbResult<()> {
    if delta.is_empty() {
        debug!("Ledger unchanged");
        return Ok(());
    }
    for (ingredient_id, change) in delta.iter() {
        let quantity = adjust_in(conn, ingredient_id, change, now).await?;
        debug!(ingredient_id, %change, %quantity, "Ledger entry applied");
    }
    Ok(())
}

/// Ids from `ids` that have no inventory row.
pub(crate) async fn missing_ids(conn: &mut SqliteConnection, ids: &[i64]) -> DbResult<Vec<i64>> {
    let mut missing = Vec::new();
    for &id in ids {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM inventory WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        if found.is_none() {
            missing.push(id);
        }
    }
    Ok(missing)
}

// =============================================================================
// Unit Tests
// =============================================================================
