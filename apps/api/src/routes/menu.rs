use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use hotcoffee_core::NewMenuItem;
use serde_json::json;

use crate::error::{ApiJson, IdPath, ServiceResult};
use crate::services::menu_service::MenuService;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/menu", get(list_menu).post(create_menu_item))
        .route(
            "/menu/{id}",
            get(get_menu_item)
                .put(update_menu_item)
                .delete(delete_menu_item),
        )
}

pub async fn create_menu_item(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<NewMenuItem>,
) -> ServiceResult<impl IntoResponse> {
    let item = MenuService::new(state).create(&body).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": item.id, "status": "created" })),
    ))
}

pub async fn list_menu(State(state): State<Arc<AppState>>) -> ServiceResult<impl IntoResponse> {
    let menu = MenuService::new(state).list().await?;
    Ok(Json(json!({ "menu": menu })))
}

pub async fn get_menu_item(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> ServiceResult<impl IntoResponse> {
    let item = MenuService::new(state).get(id).await?;
    Ok(Json(json!({ "id": id, "menu": item })))
}

pub async fn update_menu_item(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
    ApiJson(body): ApiJson<NewMenuItem>,
) -> ServiceResult<impl IntoResponse> {
    let item = MenuService::new(state).update(id, &body).await?;
    Ok(Json(json!({ "id": id, "menu": item })))
}

pub async fn delete_menu_item(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> ServiceResult<StatusCode> {
    MenuService::new(state).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
