#![cfg(feature = "pg-tests")]
//! HTTP surface tests against a real PostgreSQL database.
//!
//! The router is driven directly with `tower::ServiceExt::oneshot`, no
//! socket involved. Settings come from the `DB_*` environment variables;
//! tests are serialized because they share one database.
//! Run with `cargo test -p web-server --features pg-tests`.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use database::DbRepository;
use serial_test::serial;
use std::sync::Arc;
use tower::ServiceExt;
use web_server::{build_router, AppState};

async fn app() -> Router {
    let settings = configuration::load_database_settings().expect("settings");
    let pool = database::connect(&settings).await.expect("connect");
    database::ensure_schema(&pool).await.expect("bootstrap");
    build_router(Arc::new(AppState {
        db_repo: DbRepository::new(pool),
    }))
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn bare_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

async fn read_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8")
}

#[tokio::test]
#[serial]
async fn loyalty_level_create_get_delete_flow() {
    let app = app().await;

    // Scrub any leftover from an earlier failed run.
    let _ = app
        .clone()
        .oneshot(bare_request("DELETE", "/loyalty_level/sl"))
        .await
        .expect("scrub");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/loyalty_level/",
            serde_json::json!({"level_id": "sl", "description": "Silver", "discount": 10}),
        ))
        .await
        .expect("create");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_json(response).await;
    assert_eq!(created["level_id"], "sl");
    assert_eq!(created["discount"], 10);

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/loyalty_level/sl"))
        .await
        .expect("get");
    assert_eq!(response.status(), StatusCode::OK);
    let listed = read_json(response).await;
    assert_eq!(listed.as_array().expect("list").len(), 1);
    assert_eq!(listed[0]["description"], "Silver");

    let response = app
        .clone()
        .oneshot(bare_request("DELETE", "/loyalty_level/sl"))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::OK);
    let deleted = read_json(response).await;
    assert_eq!(deleted["level_id"], "sl");

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/loyalty_level/sl"))
        .await
        .expect("get after delete");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_text(response).await, "Loyalty level not found");
}

#[tokio::test]
#[serial]
async fn customer_with_invalid_level_is_rejected_and_named() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/customer/",
            serde_json::json!({"firstname": "Nobody", "level_id": "xx"}),
        ))
        .await
        .expect("create");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["error"], "xx is not a valid loyalty level id.");
}

#[tokio::test]
#[serial]
async fn customer_post_then_get_round_trips() {
    let app = app().await;

    // The bootstrap seeds the "gl" level, so it is always available.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/customer/",
            serde_json::json!({
                "firstname": "Grace",
                "lastname": "Hopper",
                "date_of_birth": "1906-12-09",
                "level_id": "gl",
                "signup_date": "2024-03-04"
            }),
        ))
        .await
        .expect("create");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_json(response).await;
    let customer_id = created["customer_id"].as_i64().expect("generated key");

    let response = app
        .clone()
        .oneshot(bare_request("GET", &format!("/customer/{customer_id}")))
        .await
        .expect("get");
    assert_eq!(response.status(), StatusCode::OK);
    let listed = read_json(response).await;
    assert_eq!(listed.as_array().expect("list").len(), 1);
    assert_eq!(listed[0]["firstname"], "Grace");
    assert_eq!(listed[0]["lastname"], "Hopper");
    assert_eq!(listed[0]["date_of_birth"], "1906-12-09");
    assert_eq!(listed[0]["level_id"], "gl");
    assert_eq!(listed[0]["signup_date"], "2024-03-04");

    let response = app
        .clone()
        .oneshot(bare_request("DELETE", &format!("/customer/{customer_id}")))
        .await
        .expect("cleanup");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[serial]
async fn missing_single_rows_return_plain_text_404() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/customer/999999"))
        .await
        .expect("get");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_text(response).await, "Customer not found");

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/purchases/999999"))
        .await
        .expect("get");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_text(response).await, "No purchases found");
}

#[tokio::test]
#[serial]
async fn purchase_with_dangling_customer_reports_the_parent_key() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/purchases/",
            serde_json::json!({"customer_id": 999999, "purchase_name": "phantom"}),
        ))
        .await
        .expect("create");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(
        body["error"],
        "Integrity constraint violated: parent key (customer_id=999999) not found"
    );
}

#[tokio::test]
#[serial]
async fn updating_a_missing_loyalty_level_is_not_found() {
    let app = app().await;

    let _ = app
        .clone()
        .oneshot(bare_request("DELETE", "/loyalty_level/nx"))
        .await
        .expect("scrub");

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/loyalty_level/",
            serde_json::json!({"level_id": "nx", "description": "Ghost", "discount": 1}),
        ))
        .await
        .expect("update");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(
        body["error"],
        "Could not find a loyalty level with key (level_id=nx)"
    );

    // A failed update must not create the row.
    let response = app
        .clone()
        .oneshot(bare_request("GET", "/loyalty_level/nx"))
        .await
        .expect("get");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
