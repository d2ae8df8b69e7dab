//! # HTTP Routes
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            Route Table                                  │
//! │                                                                         │
//! │  /orders                 GET list · POST create                         │
//! │  /orders/{id}            GET · PUT (open only) · DELETE                 │
//! │  /orders/{id}/close      POST                                           │
//! │                                                                         │
//! │  /menu                   GET list · POST create                         │
//! │  /menu/{id}              GET · PUT · DELETE                             │
//! │                                                                         │
//! │  /inventory              GET list · POST create                         │
//! │  /inventory/{id}         GET · PUT (name/unit) · DELETE                 │
//! │  /inventory/{id}/adjust  POST {delta}                                   │
//! │                                                                         │
//! │  /health                 GET                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every request runs inside a `http_request` span carrying a fresh
//! `request_id`.

pub mod inventory;
pub mod menu;
pub mod orders;
pub mod system;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;
use uuid::Uuid;

use crate::error::json_error;
use crate::state::AppState;

/// Assemble the full application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(orders::router())
        .merge(menu::router())
        .merge(inventory::router())
        .merge(system::router())
        .fallback(route_not_found)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4();
                    tracing::info_span!(
                        "http_request",
                        %request_id,
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

async fn route_not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "not_found", "no such route")
}
