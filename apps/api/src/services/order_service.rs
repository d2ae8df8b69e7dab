//! Order service.
//!
//! Thin wrapper around [`OrderRepository`](hotcoffee_db::OrderRepository):
//! every state transition and ledger movement happens inside the
//! repository's transaction.

use std::sync::Arc;

use hotcoffee_core::{Order, OrderRequest};
use tracing::info;

use super::{bounded, found};
use crate::error::ServiceResult;
use crate::state::AppState;

pub struct OrderService {
    state: Arc<AppState>,
}

impl OrderService {
    pub fn new(state: Arc<AppState>) -> Self {
        OrderService { state }
    }

    pub async fn create(&self, request: &OrderRequest) -> ServiceResult<Order> {
        let order = bounded(
            "create order",
            self.state.config.request_timeout(),
            self.state.db.orders().create(request),
        )
        .await?;

        info!(
            order_id = order.id,
            lines = order.items.len(),
            total = %order.total(),
            "order created"
        );
        Ok(order)
    }

    pub async fn list(&self) -> ServiceResult<Vec<Order>> {
        bounded(
            "list orders",
            self.state.config.request_timeout(),
            self.state.db.orders().list(),
        )
        .await
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Order> {
        let order = bounded(
            "get order",
            self.state.config.request_timeout(),
            self.state.db.orders().get(id),
        )
        .await?;
        found("Order", id, order)
    }

    pub async fn update(&self, id: i64, request: &OrderRequest) -> ServiceResult<Order> {
        let order = bounded(
            "update order",
            self.state.config.request_timeout(),
            self.state.db.orders().update(id, request),
        )
        .await?;

        info!(order_id = id, lines = order.items.len(), "order updated");
        Ok(order)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        bounded(
            "delete order",
            self.state.config.request_timeout(),
            self.state.db.orders().delete(id),
        )
        .await?;

        info!(order_id = id, "order deleted");
        Ok(())
    }

    pub async fn close(&self, id: i64) -> ServiceResult<Order> {
        let order = bounded(
            "close order",
            self.state.config.request_timeout(),
            self.state.db.orders().close(id),
        )
        .await?;

        info!(order_id = id, "order closed");
        Ok(order)
    }
}
