//! Test helpers for the board API integration tests.
//!
//! Provides an in-memory test server and helpers for posting threads and
//! replies through the HTTP API.

#![allow(dead_code)]

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use anonboard::config::Config;
use anonboard::web::create_app;
use anonboard::web::handlers::AppState;
use anonboard::{BoardService, Database};

/// Configuration with cheap hashing so tests stay fast.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.password.memory_kib = 1024;
    config.password.iterations = 1;
    config.password.parallelism = 1;
    config
}

/// Create a test server with the given configuration, keeping a handle to
/// its database.
pub async fn create_test_server_with_db(config: Config) -> (TestServer, Database) {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let service =
        BoardService::from_config(db.clone(), &config).expect("Failed to create board service");
    let app_state = Arc::new(AppState::new(service));
    let router = create_app(app_state, &config.web);
    let server = TestServer::new(router).expect("Failed to create test server");
    (server, db)
}

/// Create a test server with the given configuration.
pub async fn create_test_server_with(config: Config) -> TestServer {
    create_test_server_with_db(config).await.0
}

/// Create a test server with an in-memory database.
pub async fn create_test_server() -> TestServer {
    create_test_server_with(test_config()).await
}

/// Post a thread and return its ID, read back from the board listing.
pub async fn post_thread(server: &TestServer, board: &str, text: &str, password: &str) -> String {
    let response = server
        .post(&format!("/api/threads/{}", board))
        .json(&json!({ "text": text, "delete_password": password }))
        .await;
    response.assert_status(StatusCode::SEE_OTHER);

    let threads = list_threads(server, board).await;
    threads
        .as_array()
        .and_then(|list| list.iter().find(|t| t["text"] == text))
        .and_then(|t| t["_id"].as_str())
        .expect("posted thread is listed")
        .to_string()
}

/// Post a reply and return its ID, read back from the thread view.
pub async fn post_reply(
    server: &TestServer,
    board: &str,
    thread_id: &str,
    text: &str,
    password: &str,
) -> String {
    let response = server
        .post(&format!("/api/replies/{}", board))
        .json(&json!({ "thread_id": thread_id, "text": text, "delete_password": password }))
        .await;
    response.assert_status(StatusCode::SEE_OTHER);

    let thread = get_thread(server, board, thread_id).await;
    thread["replies"]
        .as_array()
        .and_then(|list| list.iter().rev().find(|r| r["text"] == text))
        .and_then(|r| r["_id"].as_str())
        .expect("posted reply is in the thread")
        .to_string()
}

/// GET a board listing.
pub async fn list_threads(server: &TestServer, board: &str) -> Value {
    let response = server.get(&format!("/api/threads/{}", board)).await;
    response.assert_status_ok();
    response.json::<Value>()
}

/// GET a thread with all of its replies.
pub async fn get_thread(server: &TestServer, board: &str, thread_id: &str) -> Value {
    let response = server
        .get(&format!("/api/replies/{}", board))
        .add_query_param("thread_id", thread_id)
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}
