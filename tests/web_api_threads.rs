//! Web API Thread Tests
//!
//! Integration tests for the `/api/threads/:board` endpoints.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{
    create_test_server, create_test_server_with, create_test_server_with_db, list_threads,
    post_reply, post_thread, test_config,
};

#[tokio::test]
async fn test_create_thread_redirects_to_board() {
    let server = create_test_server().await;

    let response = server
        .post("/api/threads/test")
        .json(&json!({ "text": "Test", "delete_password": "1234" }))
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/b/test/");
}

#[tokio::test]
async fn test_create_thread_from_form() {
    let server = create_test_server().await;

    let response = server
        .post("/api/threads/forms")
        .form(&[("text", "From a form"), ("delete_password", "pw")])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);

    let threads = list_threads(&server, "forms").await;
    assert_eq!(threads[0]["text"], "From a form");
}

#[tokio::test]
async fn test_list_threads_hides_private_fields() {
    let server = create_test_server().await;
    post_thread(&server, "test", "Test", "1234").await;

    let threads = list_threads(&server, "test").await;
    let thread = &threads[0];

    assert_eq!(thread["text"], "Test");
    assert_eq!(thread["replycount"], 0);
    assert_eq!(thread["replies"], json!([]));
    assert!(thread["_id"].is_string());
    assert!(thread["created_on"].is_string());
    assert_eq!(thread["created_on"], thread["bumped_on"]);
    assert!(thread.get("reported").is_none());
    assert!(thread.get("delete_password").is_none());
}

#[tokio::test]
async fn test_list_unknown_board_is_empty() {
    let server = create_test_server().await;
    let threads = list_threads(&server, "nobody-posted-here").await;
    assert_eq!(threads, json!([]));
}

#[tokio::test]
async fn test_list_threads_limits() {
    let server = create_test_server().await;

    for i in 0..11 {
        post_thread(&server, "busy", &format!("thread {}", i), "pw").await;
    }
    let bumped = post_thread(&server, "busy", "bumped", "pw").await;
    for i in 0..4 {
        post_reply(&server, "busy", &bumped, &format!("reply {}", i), "pw").await;
    }

    let threads = list_threads(&server, "busy").await;
    let threads = threads.as_array().unwrap();
    assert_eq!(threads.len(), 10);
    assert!(threads
        .iter()
        .all(|t| t["replies"].as_array().unwrap().len() <= 3));

    // The bumped thread is first, its preview newest first
    let first = &threads[0];
    assert_eq!(first["_id"], bumped.as_str());
    assert_eq!(first["replycount"], 4);
    let texts: Vec<&str> = first["replies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["reply 3", "reply 2", "reply 1"]);
    assert!(first["replies"][0].get("delete_password").is_none());
}

#[tokio::test]
async fn test_boards_are_separate() {
    let server = create_test_server().await;
    let id = post_thread(&server, "one", "only on one", "pw").await;

    assert_eq!(list_threads(&server, "two").await, json!([]));

    let response = server
        .put("/api/threads/two")
        .json(&json!({ "thread_id": id }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_report_thread() {
    let server = create_test_server().await;
    let id = post_thread(&server, "test", "Test", "1234").await;

    let response = server
        .put("/api/threads/test")
        .json(&json!({ "thread_id": id }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.text(), "success");
}

#[tokio::test]
async fn test_report_unknown_thread() {
    let server = create_test_server().await;
    post_thread(&server, "test", "Test", "1234").await;

    for thread_id in ["not-a-uuid", "00000000-0000-0000-0000-000000000000"] {
        let response = server
            .put("/api/threads/test")
            .json(&json!({ "thread_id": thread_id }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.text(), "Failed to report");
    }
}

#[tokio::test]
async fn test_delete_thread_scenario() {
    let server = create_test_server().await;
    let id = post_thread(&server, "test", "Test", "1234").await;

    // Listed first
    let threads = list_threads(&server, "test").await;
    assert_eq!(threads[0]["_id"], id.as_str());

    // Report needs no password
    let response = server
        .put("/api/threads/test")
        .json(&json!({ "thread_id": id }))
        .await;
    assert_eq!(response.text(), "success");

    // Wrong password keeps the thread
    let response = server
        .delete("/api/threads/test")
        .json(&json!({ "thread_id": id, "delete_password": "wrong" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.text(), "incorrect password");
    assert_eq!(list_threads(&server, "test").await.as_array().unwrap().len(), 1);

    // Right password removes it
    let response = server
        .delete("/api/threads/test")
        .json(&json!({ "thread_id": id, "delete_password": "1234" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.text(), "success");
    assert_eq!(list_threads(&server, "test").await, json!([]));

    let response = server
        .get("/api/replies/test")
        .add_query_param("thread_id", &id)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "invalid id");
}

#[tokio::test]
async fn test_delete_unknown_thread() {
    let server = create_test_server().await;
    post_thread(&server, "test", "Test", "1234").await;

    let response = server
        .delete("/api/threads/test")
        .json(&json!({
            "thread_id": "00000000-0000-0000-0000-000000000000",
            "delete_password": "1234"
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "unknown thread id");
}

#[tokio::test]
async fn test_create_thread_validation() {
    let server = create_test_server().await;

    let response = server
        .post("/api/threads/test")
        .json(&json!({ "delete_password": "1234" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "text is required");

    let response = server
        .post("/api/threads/test")
        .json(&json!({ "text": "Test" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "delete_password must be 1 to 128 characters");

    let response = server
        .post("/api/threads/test")
        .json(&json!({ "text": "x".repeat(10_001), "delete_password": "1234" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_thread_multibyte_password() {
    let server = create_test_server().await;
    let password = "あ".repeat(50);

    let id = post_thread(&server, "test", "Test", &password).await;

    let response = server
        .delete("/api/threads/test")
        .json(&json!({ "thread_id": id, "delete_password": password }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.text(), "success");
}

#[tokio::test]
async fn test_create_thread_rejects_control_characters() {
    let server = create_test_server().await;

    let response = server
        .post("/api/threads/test")
        .json(&json!({ "text": "bell\u{0007}", "delete_password": "1234" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "text must not contain control characters");
}

#[tokio::test]
async fn test_report_thread_on_invalid_board() {
    let mut config = test_config();
    config.boards.allowed = vec!["general".to_string()];
    let server = create_test_server_with(config).await;
    let id = post_thread(&server, "general", "Test", "1234").await;

    for board in ["bad.name", "random"] {
        let response = server
            .put(&format!("/api/threads/{}", board))
            .json(&json!({ "thread_id": id }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.text(), "Failed to report");
    }
}

#[tokio::test]
async fn test_hash_timeout_is_internal_error() {
    let mut config = test_config();
    config.password.memory_kib = 8192;
    config.password.iterations = 3;
    config.password.hash_timeout_ms = 1;
    let server = create_test_server_with(config).await;

    let response = server
        .post("/api/threads/test")
        .json(&json!({ "text": "Test", "delete_password": "1234" }))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), "internal error");

    assert_eq!(list_threads(&server, "test").await, json!([]));
}

#[tokio::test]
async fn test_store_timeout_is_internal_error() {
    let mut config = test_config();
    config.boards.store_timeout_ms = 200;
    let (server, db) = create_test_server_with_db(config).await;
    post_thread(&server, "test", "Test", "1234").await;

    // The in-memory pool has a single connection; holding it stalls the store
    let held = db.pool().acquire().await.unwrap();

    let response = server.get("/api/threads/test").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), "internal error");

    drop(held);
    assert_eq!(list_threads(&server, "test").await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_board_name() {
    let server = create_test_server().await;

    let response = server
        .post("/api/threads/bad.name")
        .json(&json!({ "text": "Test", "delete_password": "1234" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server.get("/api/threads/bad.name").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_board_allow_list() {
    let mut config = test_config();
    config.boards.allowed = vec!["general".to_string()];
    let server = create_test_server_with(config).await;

    post_thread(&server, "general", "allowed", "pw").await;

    let response = server
        .post("/api/threads/random")
        .json(&json!({ "text": "Test", "delete_password": "1234" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "unknown board: random");
}

#[tokio::test]
async fn test_board_cap() {
    let mut config = test_config();
    config.boards.max_boards = 1;
    let server = create_test_server_with(config).await;

    post_thread(&server, "first", "Test", "pw").await;

    let response = server
        .post("/api/threads/second")
        .json(&json!({ "text": "Test", "delete_password": "pw" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "board limit reached");

    // The existing board still accepts threads
    post_thread(&server, "first", "Another", "pw").await;
}

#[tokio::test]
async fn test_malformed_json_body() {
    let server = create_test_server().await;

    let response = server
        .post("/api/threads/test")
        .text("{not json")
        .content_type("application/json")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().starts_with("Invalid JSON"));
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server().await;
    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "OK");
}
