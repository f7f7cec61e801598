use std::{path::Path, sync::Arc};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use finance_tracker::{
    handlers::{AppState, router},
    repositories::memory::MemoryStore,
};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

fn app_with_import_dir(import_dir: &Path) -> Router {
    router(AppState::from_store(Arc::new(MemoryStore::new()), import_dir))
}

fn app() -> Router {
    app_with_import_dir(Path::new("tmp"))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn health_reports_connected_storage() {
    let app = app();

    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn create_then_list() {
    let app = app();

    let (status, created) = send(
        &app,
        "POST",
        "/transactions",
        Some(json!({
            "title": "Salary",
            "value_cents": 500000,
            "type": "income",
            "category": "Job"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["type"], "income");
    assert_eq!(created["category"]["title"], "Job");

    let (status, overview) = send(&app, "GET", "/transactions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(overview["transactions"].as_array().unwrap().len(), 1);
    assert_eq!(overview["balance"]["total"], 500000);
}

#[tokio::test]
async fn validation_errors_are_bad_requests() {
    let app = app();

    let (status, body) = send(
        &app,
        "POST",
        "/transactions",
        Some(json!({
            "title": "Gift",
            "value_cents": 100,
            "type": "present",
            "category": "Misc"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_transaction_type");
    assert_eq!(body["error"]["message"], "Type should be income or outcome");

    let (status, body) = send(
        &app,
        "POST",
        "/transactions",
        Some(json!({
            "title": "TV",
            "value_cents": 100,
            "type": "outcome",
            "category": "Electronics"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "insufficient_balance");
}

#[tokio::test]
async fn import_endpoint_consumes_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("upload.csv");
    std::fs::write(
        &path,
        "title,type,value,category\nSalary,income,5000,Job\nRent,outcome,1000,Housing\n",
    )
    .unwrap();
    let app = app_with_import_dir(dir.path());

    let (status, body) = send(
        &app,
        "POST",
        "/transactions/import",
        Some(json!({ "file_name": "upload.csv" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert!(!path.exists());
}

#[tokio::test]
async fn import_refuses_files_outside_import_dir() {
    let outer = TempDir::new().unwrap();
    let import_dir = outer.path().join("imports");
    std::fs::create_dir(&import_dir).unwrap();
    let notes = outer.path().join("notes.txt");
    std::fs::write(&notes, "my precious notes\nline two\nline three\n").unwrap();
    let app = app_with_import_dir(&import_dir);

    for file_name in ["../notes.txt".to_string(), notes.display().to_string()] {
        let (status, body) = send(
            &app,
            "POST",
            "/transactions/import",
            Some(json!({ "file_name": file_name })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "invalid_request");
        assert!(notes.exists());
    }
}

#[tokio::test]
async fn import_keeps_files_that_are_not_transaction_csv() {
    let dir = TempDir::new().unwrap();
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, "my precious notes\nline two\nline three\n").unwrap();
    let app = app_with_import_dir(dir.path());

    let (status, _) = send(
        &app,
        "POST",
        "/transactions/import",
        Some(json!({ "file_name": "notes.txt" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(notes.exists());
}

#[tokio::test]
async fn create_rejects_value_overflowing_totals() {
    let app = app();
    let salary = json!({
        "title": "Salary",
        "value_cents": i64::MAX,
        "type": "income",
        "category": "Job"
    });

    let (status, _) = send(&app, "POST", "/transactions", Some(salary.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/transactions", Some(salary)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "balance_overflow");

    let (status, overview) = send(&app, "GET", "/transactions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(overview["transactions"].as_array().unwrap().len(), 1);
    assert_eq!(overview["balance"]["total"], i64::MAX);
}
