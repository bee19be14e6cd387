// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the complete Waitline pipeline.
//!
//! Each test builds the real gateway router over a real SQLite store in a
//! temp directory. Tests are independent and order-insensitive.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tempfile::TempDir;
use tower::ServiceExt;

use waitline_config::model::{QueueConfig, StorageConfig};
use waitline_core::{TicketStore, WaitlineError};
use waitline_gateway::{GatewayState, router};
use waitline_storage::SqliteTicketStore;

struct Harness {
    app: Router,
    store: Arc<SqliteTicketStore>,
    dir: TempDir,
}

async fn harness() -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let storage = StorageConfig {
        database_path: dir.path().join("e2e.db").to_str().unwrap().to_string(),
        wal_mode: true,
    };
    let store = Arc::new(SqliteTicketStore::new(storage, QueueConfig::default()));
    store.initialize().await.unwrap();
    let app = router(GatewayState::new(store.clone() as Arc<dyn TicketStore>));
    Harness { app, store, dir }
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create(app: &Router, name: &str) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/queue",
            &format!(r#"{{"name": "{name}"}}"#),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

async fn set_status(app: &Router, id: &str, status: &str) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/queue",
            &format!(r#"{{"id": "{id}", "status": "{status}"}}"#),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

#[tokio::test]
async fn walk_in_morning_flows_through_the_whole_pipeline() {
    let h = harness().await;

    // Three customers join: dense numbers starting at 1.
    let alice = create(&h.app, "Alice").await;
    let bob = create(&h.app, "Bob").await;
    let carol = create(&h.app, "Carol").await;
    assert_eq!(alice["number"], 1);
    assert_eq!(bob["number"], 2);
    assert_eq!(carol["number"], 3);

    // Staff calls Alice up.
    set_status(&h.app, alice["id"].as_str().unwrap(), "Processed").await;

    let response = h.app.clone().oneshot(get_request("/status-customer")).await.unwrap();
    let status = body_json(response).await;
    assert_eq!(status["currentNumber"], 1);
    assert_eq!(status["queueCount"], 2);

    // Alice finishes, Bob is up.
    set_status(&h.app, alice["id"].as_str().unwrap(), "Finished").await;
    set_status(&h.app, bob["id"].as_str().unwrap(), "Processed").await;

    let response = h.app.clone().oneshot(get_request("/status-customer")).await.unwrap();
    let status = body_json(response).await;
    assert_eq!(status["currentNumber"], 2);
    assert_eq!(status["queueCount"], 1);

    // Admin sees consistent counts.
    let response = h.app.clone().oneshot(get_request("/status-admin")).await.unwrap();
    let stats = body_json(response).await;
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["queuing"], 1);
    assert_eq!(stats["processed"], 1);
    assert_eq!(stats["finished"], 1);

    // Listing is descending by number and carries current statuses.
    let response = h.app.clone().oneshot(get_request("/queue")).await.unwrap();
    let listed = body_json(response).await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 3);
    assert_eq!(listed[0]["number"], 3);
    assert_eq!(listed[0]["status"], "Queuing");
    assert_eq!(listed[2]["number"], 1);
    assert_eq!(listed[2]["status"], "Finished");

    h.store.close().await.unwrap();
}

#[tokio::test]
async fn invalid_inputs_map_to_the_documented_statuses() {
    let h = harness().await;

    // Whitespace-only name: 400, nothing persisted.
    let response = h
        .app
        .clone()
        .oneshot(json_request("POST", "/queue", r#"{"name": "  "}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let err = body_json(response).await;
    assert!(err["error"].is_string());

    // Unknown status value: 400.
    let response = h
        .app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/queue",
            r#"{"id": "t-1", "status": "Paused"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown ticket id: 404.
    let response = h
        .app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/queue",
            r#"{"id": "no-such-id", "status": "Finished"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The failed create left no orphan row.
    let response = h.app.clone().oneshot(get_request("/status-admin")).await.unwrap();
    let stats = body_json(response).await;
    assert_eq!(stats["total"], 0);

    h.store.close().await.unwrap();
}

#[tokio::test]
async fn tickets_survive_a_store_restart() {
    let h = harness().await;

    let alice = create(&h.app, "Alice").await;
    create(&h.app, "Bob").await;
    set_status(&h.app, alice["id"].as_str().unwrap(), "Finished").await;

    h.store.close().await.unwrap();
    let db_path = h.dir.path().join("e2e.db").to_str().unwrap().to_string();
    drop(h.app);

    // Reopen the same database through a fresh store: history is retained
    // and numbering continues where it left off.
    let storage = StorageConfig {
        database_path: db_path,
        wal_mode: true,
    };
    let store = Arc::new(SqliteTicketStore::new(storage, QueueConfig::default()));
    store.initialize().await.unwrap();
    let app = router(GatewayState::new(store.clone() as Arc<dyn TicketStore>));

    let response = app.clone().oneshot(get_request("/queue")).await.unwrap();
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 2);

    let carol = create(&app, "Carol").await;
    assert_eq!(carol["number"], 3);

    store.close().await.unwrap();
}

#[tokio::test]
async fn concurrent_joins_over_http_get_dense_numbers() {
    let h = harness().await;

    let mut handles = Vec::new();
    for i in 0..20 {
        let app = h.app.clone();
        handles.push(tokio::spawn(async move {
            let response = app
                .oneshot(json_request(
                    "POST",
                    "/queue",
                    &format!(r#"{{"name": "customer-{i}"}}"#),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
            body_json(response).await["number"].as_i64().unwrap()
        }));
    }

    let mut numbers = Vec::new();
    for handle in handles {
        numbers.push(handle.await.unwrap());
    }
    numbers.sort_unstable();
    assert_eq!(numbers, (1..=20).collect::<Vec<i64>>());

    h.store.close().await.unwrap();
}

#[tokio::test]
async fn health_endpoint_answers_without_auth() {
    let h = harness().await;

    let response = h.app.clone().oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let health = body_json(response).await;
    assert_eq!(health["status"], "ok");

    h.store.close().await.unwrap();
}

#[tokio::test]
async fn store_error_taxonomy_reaches_the_trait_surface() {
    let h = harness().await;

    // Direct trait-level checks the HTTP layer builds on.
    let err = h.store.create_ticket("   ").await.unwrap_err();
    assert!(matches!(err, WaitlineError::Validation(_)));

    let err = h
        .store
        .update_status("missing", waitline_core::TicketStatus::Finished)
        .await
        .unwrap_err();
    assert!(matches!(err, WaitlineError::NotFound { .. }));

    h.store.close().await.unwrap();
}
