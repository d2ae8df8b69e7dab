//! In-process tests for the HTTP surface.
//!
//! Each test builds the router over a fresh in-memory database and drives
//! it with `tower::ServiceExt::oneshot`, so no socket is bound.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use hotcoffee_api::{build_router, ApiConfig, AppState};
use hotcoffee_db::{Database, DbConfig};
use serde_json::{json, Value};
use tower::ServiceExt; // oneshot

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn make_router() -> Router {
    let db = Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database");
    build_router(AppState::new(db, ApiConfig::default()))
}

/// Drive the router with a single request and return (status, json body).
async fn call(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("request");

    let response = router.clone().oneshot(request).await.expect("oneshot failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collect failed")
        .to_bytes();

    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body is not valid JSON")
    };
    (status, json)
}

async fn create_ingredient(router: &Router, name: &str, quantity: i64, unit: &str) -> i64 {
    let (status, body) = call(
        router,
        "POST",
        "/inventory",
        Some(json!({ "name": name, "quantity": quantity, "unit": unit })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().expect("id")
}

async fn create_latte(router: &Router, milk: i64) -> i64 {
    let (status, body) = call(
        router,
        "POST",
        "/menu",
        Some(json!({
            "name": "Latte",
            "description": "Espresso with steamed milk",
            "price_cents": 450,
            "ingredients": [{ "ingredient_id": milk, "quantity": 200 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().expect("id")
}

async fn milk_on_hand(router: &Router, milk: i64) -> Value {
    let (status, body) = call(router, "GET", &format!("/inventory/{milk}"), None).await;
    assert_eq!(status, StatusCode::OK);
    body["inventory"]["quantity"].clone()
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[tokio::test]
async fn latte_order_lifecycle() {
    let router = make_router().await;
    let milk = create_ingredient(&router, "Milk", 500, "ml").await;
    let latte = create_latte(&router, milk).await;

    let (status, body) = call(
        &router,
        "POST",
        "/orders",
        Some(json!({
            "customer_name": "Alice",
            "items": [{ "product_id": latte, "quantity": 2 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "created");
    let order_id = body["id"].as_i64().expect("order id");

    assert_eq!(milk_on_hand(&router, milk).await, json!(100));

    let (status, body) = call(&router, "GET", &format!("/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["status"], "open");
    assert_eq!(body["order"]["customer_name"], "Alice");
    assert_eq!(body["order"]["items"][0]["product_id"], latte);
    assert_eq!(body["order"]["items"][0]["quantity"], 2);
    assert_eq!(body["order"]["total_cents"], 900);

    let (status, body) = call(&router, "POST", &format!("/orders/{order_id}/close"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], order_id);
    assert_eq!(body["status"], "closed");

    let (status, body) = call(&router, "POST", &format!("/orders/{order_id}/close"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    assert_eq!(milk_on_hand(&router, milk).await, json!(100));
}

#[tokio::test]
async fn order_that_overdraws_is_rejected() {
    let router = make_router().await;
    let milk = create_ingredient(&router, "Milk", 300, "ml").await;
    let latte = create_latte(&router, milk).await;

    let (status, body) = call(
        &router,
        "POST",
        "/orders",
        Some(json!({
            "customer_name": "Bob",
            "items": [{ "product_id": latte, "quantity": 2 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "insufficient_stock");
    assert_eq!(milk_on_hand(&router, milk).await, json!(300));

    let (_, body) = call(&router, "GET", "/orders", None).await;
    assert_eq!(body["orders"], json!([]));
}

#[tokio::test]
async fn order_for_unknown_product_is_404() {
    let router = make_router().await;
    let (status, body) = call(
        &router,
        "POST",
        "/orders",
        Some(json!({
            "customer_name": "Carol",
            "items": [{ "product_id": 404, "quantity": 1 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn invalid_order_bodies_are_400() {
    let router = make_router().await;
    let milk = create_ingredient(&router, "Milk", 500, "ml").await;
    let latte = create_latte(&router, milk).await;

    let bad = [
        json!({ "customer_name": "", "items": [{ "product_id": latte, "quantity": 1 }] }),
        json!({ "customer_name": "Dan", "items": [] }),
        json!({ "customer_name": "Dan", "items": [{ "product_id": latte, "quantity": 0 }] }),
        json!({ "customer_name": "Dan" }),
    ];
    for body in bad {
        let (status, resp) = call(&router, "POST", "/orders", Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(resp["error"], "validation_error");
    }

    let (status, body) = call(&router, "GET", "/orders/latest", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn update_then_delete_restores_stock() {
    let router = make_router().await;
    let milk = create_ingredient(&router, "Milk", 1000, "ml").await;
    let latte = create_latte(&router, milk).await;

    let (_, body) = call(
        &router,
        "POST",
        "/orders",
        Some(json!({
            "customer_name": "Erin",
            "items": [{ "product_id": latte, "quantity": 1 }]
        })),
    )
    .await;
    let order_id = body["id"].as_i64().expect("order id");
    assert_eq!(milk_on_hand(&router, milk).await, json!(800));

    let (status, body) = call(
        &router,
        "PUT",
        &format!("/orders/{order_id}"),
        Some(json!({
            "customer_name": "Erin",
            "items": [{ "product_id": latte, "quantity": 3 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], order_id);
    assert_eq!(body["order"]["items"][0]["quantity"], 3);
    assert_eq!(milk_on_hand(&router, milk).await, json!(400));

    let (status, _) = call(&router, "DELETE", &format!("/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(milk_on_hand(&router, milk).await, json!(1000));

    let (status, _) = call(&router, "GET", &format!("/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&router, "DELETE", &format!("/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn closed_order_cannot_be_updated() {
    let router = make_router().await;
    let milk = create_ingredient(&router, "Milk", 1000, "ml").await;
    let latte = create_latte(&router, milk).await;

    let order = json!({
        "customer_name": "Finn",
        "items": [{ "product_id": latte, "quantity": 1 }]
    });
    let (_, body) = call(&router, "POST", "/orders", Some(order.clone())).await;
    let order_id = body["id"].as_i64().expect("order id");
    call(&router, "POST", &format!("/orders/{order_id}/close"), None).await;

    let (status, body) = call(&router, "PUT", &format!("/orders/{order_id}"), Some(order)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

// ---------------------------------------------------------------------------
// Menu
// ---------------------------------------------------------------------------

#[tokio::test]
async fn menu_crud() {
    let router = make_router().await;
    let milk = create_ingredient(&router, "Milk", 500, "ml").await;
    let latte = create_latte(&router, milk).await;

    let (status, body) = call(&router, "GET", "/menu", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["menu"].as_array().map(Vec::len), Some(1));

    let (status, body) = call(
        &router,
        "PUT",
        &format!("/menu/{latte}"),
        Some(json!({
            "name": "Large Latte",
            "price_cents": 500,
            "ingredients": [{ "ingredient_id": milk, "quantity": 300 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], latte);
    assert_eq!(body["menu"]["name"], "Large Latte");
    assert_eq!(body["menu"]["ingredients"][0]["quantity"], 300);

    let (status, _) = call(&router, "DELETE", &format!("/menu/{latte}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&router, "GET", &format!("/menu/{latte}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn menu_item_with_unknown_ingredient_is_400() {
    let router = make_router().await;
    let (status, body) = call(
        &router,
        "POST",
        "/menu",
        Some(json!({
            "name": "Ghost Latte",
            "price_cents": 450,
            "ingredients": [{ "ingredient_id": 77, "quantity": 200 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn menu_item_on_open_order_cannot_be_deleted() {
    let router = make_router().await;
    let milk = create_ingredient(&router, "Milk", 500, "ml").await;
    let latte = create_latte(&router, milk).await;

    let (_, body) = call(
        &router,
        "POST",
        "/orders",
        Some(json!({
            "customer_name": "Gus",
            "items": [{ "product_id": latte, "quantity": 1 }]
        })),
    )
    .await;
    let order_id = body["id"].as_i64().expect("order id");

    let (status, body) = call(&router, "DELETE", &format!("/menu/{latte}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    call(&router, "POST", &format!("/orders/{order_id}/close"), None).await;
    let (status, _) = call(&router, "DELETE", &format!("/menu/{latte}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

#[tokio::test]
async fn inventory_adjust_and_update() {
    let router = make_router().await;
    let beans = create_ingredient(&router, "Beans", 1000, "g").await;

    let (status, body) = call(
        &router,
        "POST",
        &format!("/inventory/{beans}/adjust"),
        Some(json!({ "delta": 250.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], beans);
    assert_eq!(body["quantity"], json!(1250.5));

    let (status, body) = call(
        &router,
        "POST",
        &format!("/inventory/{beans}/adjust"),
        Some(json!({ "delta": -2000 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "insufficient_stock");

    let (status, body) = call(
        &router,
        "PUT",
        &format!("/inventory/{beans}"),
        Some(json!({ "name": "Espresso beans", "unit": "kg" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["inventory"]["name"], "Espresso beans");
    assert_eq!(body["inventory"]["unit"], "kg");
    assert_eq!(body["inventory"]["quantity"], json!(1250.5));

    let (status, _) = call(
        &router,
        "POST",
        "/inventory/999/adjust",
        Some(json!({ "delta": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ingredient_in_recipe_cannot_be_deleted() {
    let router = make_router().await;
    let milk = create_ingredient(&router, "Milk", 500, "ml").await;
    let sugar = create_ingredient(&router, "Sugar", 100, "g").await;
    create_latte(&router, milk).await;

    let (status, body) = call(&router, "DELETE", &format!("/inventory/{milk}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let (status, _) = call(&router, "DELETE", &format!("/inventory/{sugar}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = call(&router, "GET", "/inventory", None).await;
    assert_eq!(body["inventory"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn negative_starting_stock_is_400() {
    let router = make_router().await;
    let (status, body) = call(
        &router,
        "POST",
        "/inventory",
        Some(json!({ "name": "Milk", "quantity": -5, "unit": "ml" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn restock_past_ceiling_is_400() {
    let router = make_router().await;
    let milk = create_ingredient(&router, "Milk", 999_999_000, "ml").await;

    let uri = format!("/inventory/{milk}/adjust");
    let (status, _) = call(&router, "POST", &uri, Some(json!({ "delta": 1000 }))).await;
    assert_eq!(status, StatusCode::OK);

    for _ in 0..3 {
        let (status, body) =
            call(&router, "POST", &uri, Some(json!({ "delta": 1_000_000_000 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }
    assert_eq!(milk_on_hand(&router, milk).await, json!(1_000_000_000));
}

#[tokio::test]
async fn menu_price_out_of_range_is_400() {
    let router = make_router().await;
    let milk = create_ingredient(&router, "Milk", 500, "ml").await;

    let (status, body) = call(
        &router,
        "POST",
        "/menu",
        Some(json!({
            "name": "Gold Leaf Latte",
            "price_cents": 4_611_686_018_427_387_904_i64,
            "ingredients": [{ "ingredient_id": milk, "quantity": 200 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (_, body) = call(&router, "GET", "/menu", None).await;
    assert_eq!(body["menu"], json!([]));
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_database() {
    let router = make_router().await;
    let (status, body) = call(&router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "serving");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let router = make_router().await;
    let (status, body) = call(&router, "GET", "/coffee", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}
