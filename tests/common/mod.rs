//! Shared helpers for driving the router in integration tests.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    body::{Body, Bytes, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use document_portal::{
    config::Config, database::init_db, models::Document, routes::create_router, state::AppState,
    storage::LocalStorage,
};
use tower::ServiceExt;

const BOUNDARY: &str = "portal-test-boundary";

pub struct TestApp {
    _dir: tempfile::TempDir,
    pub router: Router,
    pub upload_dir: PathBuf,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("response body should be JSON")
    }

    pub fn error_message(&self) -> String {
        let body: serde_json::Value = self.json();
        body["error"].as_str().expect("error field").to_string()
    }
}

/// An app backed by a fresh SQLite file and upload directory in a temp dir.
pub async fn test_app() -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let upload_dir = dir.path().join("uploads");

    let config = Config {
        database_url: format!("sqlite://{}", dir.path().join("db.sqlite3").display()),
        upload_dir: upload_dir.to_string_lossy().into_owned(),
        ..Config::default()
    };

    let pool = init_db(&config.database_url).await.expect("Failed to open test database");
    let storage = LocalStorage::new(&config.upload_dir)
        .await
        .expect("Failed to create test upload dir");

    let state = AppState {
        pool,
        storage: Arc::new(storage),
        config,
    };

    TestApp {
        _dir: dir,
        router: create_router(state),
        upload_dir,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");

        TestResponse { status, headers, body }
    }

    pub async fn upload(&self, filename: &str, content_type: &str, data: &[u8]) -> TestResponse {
        self.send(upload_request(filename, content_type, data)).await
    }

    /// Upload a PDF and return the created row.
    pub async fn upload_pdf(&self, filename: &str, data: &[u8]) -> Document {
        let response = self.upload(filename, "application/pdf", data).await;
        assert_eq!(response.status, StatusCode::CREATED, "upload of {} failed", filename);
        response.json()
    }

    pub async fn list(&self) -> Vec<Document> {
        let response = self.send(empty_request(Method::GET, "/documents")).await;
        assert_eq!(response.status, StatusCode::OK);
        response.json()
    }

    pub async fn download(&self, id: i64) -> TestResponse {
        self.send(empty_request(Method::GET, &format!("/documents/{}", id))).await
    }

    pub async fn delete(&self, id: i64) -> TestResponse {
        self.send(empty_request(Method::DELETE, &format!("/documents/{}", id))).await
    }

    /// Names of the files currently in the upload directory, sorted.
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.upload_dir)
            .expect("upload dir should exist")
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn upload_request(filename: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    let mut part = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    part.extend_from_slice(data);
    part.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    multipart_request(part)
}

/// A multipart form with a single text field, no file attached.
pub fn text_field_request(name: &str, value: &str) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n--{BOUNDARY}--\r\n"
    );
    multipart_request(body.into_bytes())
}

fn multipart_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/documents/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}
