use serde_json::{Value, json};
use tokio::net::TcpListener;

use super::*;
use crate::config::Config;

// =============================================================================
// Helpers
// =============================================================================

struct TestServer {
    base: String,
    client: reqwest::Client,
    dir: tempfile::TempDir,
}

impl TestServer {
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn save(&self, body: Value) -> reqwest::Response {
        self.client.post(self.url("/api/save-level")).json(&body).send().await.unwrap()
    }

    async fn levels(&self) -> Value {
        self.client.get(self.url("/api/levels")).send().await.unwrap().json().await.unwrap()
    }
}

async fn spawn_server() -> TestServer {
    let dir = tempfile::tempdir().unwrap();
    let public_dir = dir.path().join("public");
    std::fs::create_dir_all(&public_dir).unwrap();
    std::fs::write(public_dir.join("index.html"), "<html>editor</html>").unwrap();

    let config = Config { port: 0, levels_dir: public_dir.join("levels"), public_dir };
    let app = crate::routes::app(AppState::new(config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer { base: format!("http://{addr}"), client: reqwest::Client::new(), dir }
}

fn level_body(name: &str) -> Value {
    json!({
        "name": name,
        "data": {
            "objects": [{
                "id": "o1", "name": "palm", "image": "/assets/trees/palm.png",
                "x": 10.0, "y": 20.0, "width": 64.0, "height": 64.0,
                "originalWidth": 256.0, "originalHeight": 256.0,
                "flipX": false, "flipY": true, "isLocked": false
            }],
            "dimensions": { "width": 800.0, "height": 600.0 }
        }
    })
}

// =============================================================================
// Status mapping
// =============================================================================

#[test]
fn level_error_to_status_maps_invalid_name() {
    let err = LevelError::InvalidName("..".to_owned());
    assert_eq!(level_error_to_status(&err), StatusCode::BAD_REQUEST);
}

#[test]
fn level_error_to_status_maps_io() {
    let err = LevelError::Io(std::io::Error::other("disk"));
    assert_eq!(level_error_to_status(&err), StatusCode::INTERNAL_SERVER_ERROR);
}

// =============================================================================
// GET /api/levels
// =============================================================================

#[tokio::test]
async fn list_without_levels_dir_is_empty_object() {
    let server = spawn_server().await;
    assert_eq!(server.levels().await, json!({}));
}

// =============================================================================
// POST /api/save-level
// =============================================================================

#[tokio::test]
async fn saved_level_is_listed_unchanged() {
    let server = spawn_server().await;
    let body = level_body("island");

    let response = server.save(body.clone()).await;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let message: Value = response.json().await.unwrap();
    assert_eq!(message, json!({ "message": "Level saved successfully" }));

    let levels = server.levels().await;
    assert_eq!(levels["island"], body["data"]);
    assert!(server.dir.path().join("public/levels/island.json").exists());
}

#[tokio::test]
async fn missing_name_or_data_is_bad_request() {
    let server = spawn_server().await;

    let response = server.save(json!({ "data": { "objects": [] } })).await;
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let message: Value = response.json().await.unwrap();
    assert!(message["message"].is_string());

    let response = server.save(json!({ "name": "x" })).await;
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn traversal_names_are_bad_requests() {
    let server = spawn_server().await;
    for name in ["../evil", "a/b", ".hidden", ""] {
        let response = server.save(level_body(name)).await;
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST, "name {name:?}");
    }
    assert_eq!(server.levels().await, json!({}));
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let server = spawn_server().await;
    let response = server
        .client
        .post(server.url("/api/save-level"))
        .header("content-type", "application/json")
        .body("{ nope")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

// =============================================================================
// Health and static files
// =============================================================================

#[tokio::test]
async fn healthz_is_ok() {
    let server = spawn_server().await;
    let response = server.client.get(server.url("/healthz")).send().await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
}

#[tokio::test]
async fn unknown_paths_fall_back_to_public_dir() {
    let server = spawn_server().await;
    let response = server.client.get(server.url("/")).send().await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "<html>editor</html>");

    let response = server.client.get(server.url("/missing.png")).send().await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}
