//! # Order Repository
//!
//! The order engine: every order write and its ledger movement commit or
//! roll back together.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │  1. CREATE                                                             │
//! │     └── create() → Order { status: Open }                              │
//! │         ├── lines snapshot name + unit price                           │
//! │         ├── ledger: −consumption                                       │
//! │         └── order_consumption rows record what was taken               │
//! │                                                                         │
//! │  2. (OPTIONAL) EDIT, only while open                                   │
//! │     └── update() → ledger: old consumption − new consumption           │
//! │                                                                         │
//! │  3. CLOSE                                                              │
//! │     └── close() → Order { status: Closed }  (no ledger effect)         │
//! │                                                                         │
//! │  4. (OPTIONAL) DELETE                                                  │
//! │     └── open:   ledger: +consumption, then remove                      │
//! │     └── closed: remove only                                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Transactions
//! Each write opens one transaction whose first statement writes to the
//! `orders` table. SQLite then holds the write lock for the whole unit, so
//! two orders competing for the last unit of an ingredient run one after
//! the other: the first commits, the second sees the reduced stock and
//! fails with `InsufficientStock`. Any error returns before `commit()` and
//! the dropped transaction rolls back.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::{inventory, menu};
use hotcoffee_core::validation::validate_order_request;
use hotcoffee_core::{
    plan_order, Consumption, CoreError, LedgerDelta, Money, Order, OrderLine, OrderRequest,
    OrderStatus, Quantity,
};

#[derive(Debug, FromRow)]
struct OrderRow {
    id: i64,
    customer_name: String,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, FromRow)]
struct LineRow {
    order_id: i64,
    product_id: i64,
    name_snapshot: String,
    unit_price_cents: i64,
    quantity: i64,
}

impl From<LineRow> for OrderLine {
    fn from(row: LineRow) -> Self {
        OrderLine {
            product_id: row.product_id,
            quantity: row.quantity,
            name: row.name_snapshot,
            unit_price_cents: row.unit_price_cents,
        }
    }
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderLine>) -> Order {
        let total: Money = items.iter().map(OrderLine::line_total).sum();
        Order {
            id: self.id,
            customer_name: self.customer_name,
            items,
            status: self.status,
            total_cents: total.cents(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            closed_at: self.closed_at,
        }
    }
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Lists all orders with their lines, oldest first.
    ///
    /// Both queries run in one read transaction so an order and its lines
    /// come from the same snapshot.
    pub async fn list(&self) -> DbResult<Vec<Order>> {
        let mut tx = self.pool.begin().await?;

        let rows: Vec<OrderRow> = sqlx::query_as(
            r#"
            SELECT id, customer_name, status, created_at, updated_at, closed_at
            FROM orders
            ORDER BY id
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let line_rows: Vec<LineRow> = sqlx::query_as(
            r#"
            SELECT order_id, product_id, name_snapshot, unit_price_cents, quantity
            FROM items
            ORDER BY order_id, id
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let mut lines: HashMap<i64, Vec<OrderLine>> = HashMap::new();
        for row in line_rows {
            lines.entry(row.order_id).or_default().push(row.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let items = lines.remove(&row.id).unwrap_or_default();
                row.into_order(items)
            })
            .collect())
    }

    /// Gets an order by ID.
    pub async fn get(&self, id: i64) -> DbResult<Option<Order>> {
        let mut conn = self.pool.acquire().await?;
        get_in(&mut conn, id).await
    }

    /// What the order currently holds out of the ledger.
    pub async fn consumption(&self, id: i64) -> DbResult<Consumption> {
        let mut conn = self.pool.acquire().await?;
        consumption_in(&mut conn, id).await
    }

    /// Places an order and deducts its ingredients.
    ///
    /// ## Errors
    /// - `Validation` for a bad body
    /// - `NotFound` for a product id not on the menu
    /// - `InsufficientStock` if any ingredient would go negative
    ///
    /// On error nothing is written.
    pub async fn create(&self, request: &OrderRequest) -> DbResult<Order> {
        validate_order_request(request)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO orders (customer_name, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?3)
            RETURNING id
            "#,
        )
        .bind(request.customer_name.trim())
        .bind(OrderStatus::Open)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        let product_ids: Vec<i64> = request.items.iter().map(|l| l.product_id).collect();
        let catalog = menu::load_many_in(&mut tx, &product_ids).await?;
        let plan = plan_order(&request.items, &catalog)?;

        inventory::apply_delta(&mut tx, &LedgerDelta::deduct(&plan.consumption), now).await?;
        write_lines(&mut tx, id, &plan.lines).await?;
        write_consumption(&mut tx, id, &plan.consumption).await?;

        let order = get_in(&mut tx, id)
            .await?
            .ok_or_else(|| CoreError::not_found("Order", id))?;

        tx.commit().await?;

        info!(
            id,
            lines = order.items.len(),
            total = %plan.total,
            "Order created"
        );
        Ok(order)
    }

    /// Replaces an open order's customer name and lines.
    ///
    /// The ledger moves by the difference between what the order held and
    /// what the new lines need.
    ///
    /// ## Errors
    /// - `NotFound` if the order doesn't exist
    /// - `InvalidOrderStatus` if it is closed
    /// - as [`create`](Self::create) for the new lines
    pub async fn update(&self, id: i64, request: &OrderRequest) -> DbResult<Order> {
        validate_order_request(request)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let touched = sqlx::query(
            r#"
            UPDATE orders SET
                customer_name = ?2,
                updated_at = ?3
            WHERE id = ?1 AND status = 'open'
            "#,
        )
        .bind(id)
        .bind(request.customer_name.trim())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if touched.rows_affected() == 0 {
            return Err(not_open(&mut tx, id).await);
        }

        let held = consumption_in(&mut tx, id).await?;
        let product_ids: Vec<i64> = request.items.iter().map(|l| l.product_id).collect();
        let catalog = menu::load_many_in(&mut tx, &product_ids).await?;
        let plan = plan_order(&request.items, &catalog)?;

        let delta = LedgerDelta::reconcile(&held, &plan.consumption);
        debug!(id, entries = delta.iter().count(), "Reconciling ledger");
        inventory::apply_delta(&mut tx, &delta, now).await?;

        sqlx::query("DELETE FROM items WHERE order_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM order_consumption WHERE order_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        write_lines(&mut tx, id, &plan.lines).await?;
        write_consumption(&mut tx, id, &plan.consumption).await?;

        let order = get_in(&mut tx, id)
            .await?
            .ok_or_else(|| CoreError::not_found("Order", id))?;

        tx.commit().await?;

        info!(id, lines = order.items.len(), "Order updated");
        Ok(order)
    }

    /// Deletes an order.
    ///
    /// An open order gives its consumption back to the ledger first; a
    /// closed order's stock stays consumed.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let status: Option<OrderStatus> = sqlx::query_scalar(
            "UPDATE orders SET updated_at = ?2 WHERE id = ?1 RETURNING status",
        )
        .bind(id)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(status) = status else {
            return Err(CoreError::not_found("Order", id).into());
        };

        if status == OrderStatus::Open {
            let held = consumption_in(&mut tx, id).await?;
            if !held.is_empty() {
                inventory::apply_delta(&mut tx, &LedgerDelta::restore(&held), now).await?;
                debug!(id, ingredients = held.len(), "Restored order consumption");
            }
        }

        sqlx::query("DELETE FROM orders WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(id, %status, "Order deleted");
        Ok(())
    }

    /// Closes an open order. Stock was already deducted at creation.
    ///
    /// ## Errors
    /// - `NotFound` if the order doesn't exist
    /// - `InvalidOrderStatus` if it is already closed
    pub async fn close(&self, id: i64) -> DbResult<Order> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let touched = sqlx::query(
            r#"
            UPDATE orders SET
                status = ?2,
                closed_at = ?3,
                updated_at = ?3
            WHERE id = ?1 AND status = 'open'
            "#,
        )
        .bind(id)
        .bind(OrderStatus::Closed)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if touched.rows_affected() == 0 {
            return Err(not_open(&mut tx, id).await);
        }

        let order = get_in(&mut tx, id)
            .await?
            .ok_or_else(|| CoreError::not_found("Order", id))?;

        tx.commit().await?;

        info!(id, "Order closed");
        Ok(order)
    }
}

// =============================================================================
// In-transaction helpers
// =============================================================================

async fn get_in(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Order>> {
    let row: Option<OrderRow> = sqlx::query_as(
        r#"
        SELECT id, customer_name, status, created_at, updated_at, closed_at
        FROM orders
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let lines: Vec<LineRow> = sqlx::query_as(
        r#"
        SELECT order_id, product_id, name_snapshot, unit_price_cents, quantity
        FROM items
        WHERE order_id = ?1
        ORDER BY id
        "#,
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(row.into_order(lines.into_iter().map(Into::into).collect())))
}

async fn consumption_in(conn: &mut SqliteConnection, order_id: i64) -> DbResult<Consumption> {
    let rows: Vec<(i64, i64)> = sqlx::query_as(
        "SELECT inventory_id, quantity_milli FROM order_consumption WHERE order_id = ?1",
    )
    .bind(order_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, milli)| (id, Quantity::from_milli(milli)))
        .collect())
}

/// Explains why a status-guarded update matched no row.
async fn not_open(conn: &mut SqliteConnection, id: i64) -> DbError {
    let status: Result<Option<OrderStatus>, sqlx::Error> =
        sqlx::query_scalar("SELECT status FROM orders WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await;

    match status {
        Ok(None) => CoreError::not_found("Order", id).into(),
        Ok(Some(current_status)) => {
            warn!(id, %current_status, "Order is not open");
            CoreError::InvalidOrderStatus {
                order_id: id,
                current_status,
            }
            .into()
        }
        Err(err) => err.into(),
    }
}

async fn write_lines(conn: &mut SqliteConnection, order_id: i64, lines: &[OrderLine]) -> DbResult<()> {
    for line in lines {
        sqlx::query(
            r#"
            INSERT INTO items (order_id, product_id, name_snapshot, unit_price_cents, quantity)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(order_id)
        .bind(line.product_id)
        .bind(&line.name)
        .bind(line.unit_price_cents)
        .bind(line.quantity)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn write_consumption(
    conn: &mut SqliteConnection,
    order_id: i64,
    consumption: &Consumption,
) -> DbResult<()> {
    for (inventory_id, quantity) in consumption.iter() {
        sqlx::query(
            r#"
            INSERT INTO order_consumption (order_id, inventory_id, quantity_milli)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(order_id)
        .bind(inventory_id)
        .bind(quantity.milli())
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
