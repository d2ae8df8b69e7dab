use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use hotcoffee_core::{InventoryUpdate, NewInventoryItem};
use serde_json::json;

use crate::dto::AdjustStockRequest;
use crate::error::{ApiJson, IdPath, ServiceResult};
use crate::services::inventory_service::InventoryService;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/inventory", get(list_inventory).post(create_inventory_item))
        .route(
            "/inventory/{id}",
            get(get_inventory_item)
                .put(update_inventory_item)
                .delete(delete_inventory_item),
        )
        .route("/inventory/{id}/adjust", post(adjust_stock))
}

pub async fn create_inventory_item(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<NewInventoryItem>,
) -> ServiceResult<impl IntoResponse> {
    let item = InventoryService::new(state).create(&body).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": item.id, "status": "created" })),
    ))
}

pub async fn list_inventory(
    State(state): State<Arc<AppState>>,
) -> ServiceResult<impl IntoResponse> {
    let inventory = InventoryService::new(state).list().await?;
    Ok(Json(json!({ "inventory": inventory })))
}

pub async fn get_inventory_item(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> ServiceResult<impl IntoResponse> {
    let item = InventoryService::new(state).get(id).await?;
    Ok(Json(json!({ "id": id, "inventory": item })))
}

pub async fn update_inventory_item(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
    ApiJson(body): ApiJson<InventoryUpdate>,
) -> ServiceResult<impl IntoResponse> {
    let item = InventoryService::new(state).update(id, &body).await?;
    Ok(Json(json!({ "id": id, "inventory": item })))
}

pub async fn adjust_stock(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
    ApiJson(body): ApiJson<AdjustStockRequest>,
) -> ServiceResult<impl IntoResponse> {
    let quantity = InventoryService::new(state).adjust(id, body.delta).await?;
    Ok(Json(json!({ "id": id, "quantity": quantity })))
}

pub async fn delete_inventory_item(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> ServiceResult<StatusCode> {
    InventoryService::new(state).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
