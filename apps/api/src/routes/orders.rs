use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use hotcoffee_core::OrderRequest;
use serde_json::json;

use crate::error::{ApiJson, IdPath, ServiceResult};
use crate::services::order_service::OrderService;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route(
            "/orders/{id}",
            get(get_order).put(update_order).delete(delete_order),
        )
        .route("/orders/{id}/close", post(close_order))
}

pub async fn create_order(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<OrderRequest>,
) -> ServiceResult<impl IntoResponse> {
    let order = OrderService::new(state).create(&body).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": order.id, "status": "created" })),
    ))
}

pub async fn list_orders(State(state): State<Arc<AppState>>) -> ServiceResult<impl IntoResponse> {
    let orders = OrderService::new(state).list().await?;
    Ok(Json(json!({ "orders": orders })))
}

pub async fn get_order(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> ServiceResult<impl IntoResponse> {
    let order = OrderService::new(state).get(id).await?;
    Ok(Json(json!({ "order": order })))
}

pub async fn update_order(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
    ApiJson(body): ApiJson<OrderRequest>,
) -> ServiceResult<impl IntoResponse> {
    let order = OrderService::new(state).update(id, &body).await?;
    Ok(Json(json!({ "id": id, "order": order })))
}

pub async fn delete_order(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> ServiceResult<StatusCode> {
    OrderService::new(state).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn close_order(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> ServiceResult<impl IntoResponse> {
    let order = OrderService::new(state).close(id).await?;
    Ok(Json(json!({ "id": order.id, "status": order.status })))
}
