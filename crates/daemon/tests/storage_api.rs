//! Integration tests for the storage API router
//!
//! These drive the full axum router in-process, without binding a socket.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use gcs_mock_daemon::http_server::api::types::{
    BucketResource, ErrorResponse, ObjectList, ObjectResource,
};
use gcs_mock_daemon::http_server::router;
use gcs_mock_daemon::{ServiceConfig, ServiceState};

fn setup() -> (Router, ServiceState) {
    let state = ServiceState::default();
    (router(state.clone()), state)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: impl Into<Body>,
) -> (StatusCode, Option<String>, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    let request = builder.body(body.into()).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, body.to_vec())
}

async fn create_bucket(app: &Router, name: &str) -> StatusCode {
    let body = serde_json::json!({ "name": name }).to_string();
    send(app, Method::POST, "/storage/v1/b", Some("application/json"), body)
        .await
        .0
}

async fn upload(
    app: &Router,
    bucket: &str,
    name: &str,
    content: &'static [u8],
    content_type: Option<&str>,
) -> (StatusCode, Vec<u8>) {
    let uri = format!(
        "/upload/storage/v1/b/{}/o?uploadType=media&name={}",
        bucket, name
    );
    let (status, _, body) = send(app, Method::POST, &uri, content_type, content).await;
    (status, body)
}

#[tokio::test]
async fn test_health() {
    let (app, _) = setup();
    let (status, content_type, body) =
        send(&app, Method::GET, "/health", None, Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/plain"));
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_create_bucket() {
    let (app, state) = setup();

    let (status, _, body) = send(
        &app,
        Method::POST,
        "/storage/v1/b",
        Some("application/json"),
        r#"{"name": "test-bucket"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let bucket: BucketResource = serde_json::from_slice(&body).unwrap();
    assert_eq!(bucket, BucketResource::new("test-bucket"));
    assert_eq!(bucket.kind, "storage#bucket");
    assert!(state.store().bucket_exists("test-bucket"));
}

#[tokio::test]
async fn test_create_duplicate_bucket() {
    let (app, _) = setup();
    assert_eq!(create_bucket(&app, "dupe-bucket").await, StatusCode::OK);
    assert_eq!(create_bucket(&app, "dupe-bucket").await, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_bucket_bad_body() {
    let (app, state) = setup();

    for body in ["", "not json", r#"{"nom": "x"}"#, r#"{"name": ""}"#] {
        let (status, _, response) = send(
            &app,
            Method::POST,
            "/storage/v1/b",
            Some("application/json"),
            body,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {:?}", body);

        let error: ErrorResponse = serde_json::from_slice(&response).unwrap();
        assert_eq!(error.error.code, 400);
    }

    assert!(state.store().bucket_names().is_empty());
}

#[tokio::test]
async fn test_create_bucket_without_json_content_type() {
    let (app, state) = setup();

    let (status, _, body) = send(
        &app,
        Method::POST,
        "/storage/v1/b",
        None,
        r#"{"name":"plain"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let bucket: BucketResource = serde_json::from_slice(&body).unwrap();
    assert_eq!(bucket.name, "plain");

    // What curl -d sends by default
    let (status, _, _) = send(
        &app,
        Method::POST,
        "/storage/v1/b",
        Some("application/x-www-form-urlencoded"),
        r#"{"name":"form"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(state.store().bucket_names(), vec!["form", "plain"]);
}

#[tokio::test]
async fn test_upload_and_get_object() {
    let (app, _) = setup();
    create_bucket(&app, "my-bucket").await;

    let content: &'static [u8] = br#"{"hello":"world"}"#;
    let (status, body) = upload(
        &app,
        "my-bucket",
        "test.json",
        content,
        Some("application/json"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let object: ObjectResource = serde_json::from_slice(&body).unwrap();
    assert_eq!(object.kind, "storage#object");
    assert_eq!(object.bucket, "my-bucket");
    assert_eq!(object.name, "test.json");
    assert_eq!(object.content_type, "application/json");
    assert_eq!(object.size, content.len() as u64);

    let (status, content_type, body) = send(
        &app,
        Method::GET,
        "/storage/v1/b/my-bucket/o/test.json",
        None,
        Body::empty(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, content);
    assert_eq!(content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn test_upload_overwrites() {
    let (app, _) = setup();
    create_bucket(&app, "b").await;

    upload(&app, "b", "doc", b"first version", Some("text/plain")).await;
    upload(&app, "b", "doc", b"<second/>", Some("application/xml")).await;

    let (status, content_type, body) =
        send(&app, Method::GET, "/storage/v1/b/b/o/doc", None, Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"<second/>");
    assert_eq!(content_type.as_deref(), Some("application/xml"));
}

#[tokio::test]
async fn test_upload_to_missing_bucket() {
    let (app, state) = setup();

    let (status, body) = upload(&app, "no-such-bucket", "test.txt", b"data", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error.code, 404);
    assert!(!state.store().bucket_exists("no-such-bucket"));
}

#[tokio::test]
async fn test_upload_missing_name() {
    let (app, _) = setup();
    create_bucket(&app, "b").await;

    for uri in ["/upload/storage/v1/b/b/o", "/upload/storage/v1/b/b/o?name="] {
        let (status, _, _) = send(&app, Method::POST, uri, None, "data").await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {}", uri);
    }
}

#[tokio::test]
async fn test_default_content_type() {
    let (app, state) = setup();
    create_bucket(&app, "ct-bucket").await;

    let (status, body) = upload(&app, "ct-bucket", "binary.bin", b"binary stuff", None).await;
    assert_eq!(status, StatusCode::OK);

    let object: ObjectResource = serde_json::from_slice(&body).unwrap();
    assert_eq!(object.content_type, "application/octet-stream");

    let stored = state.store().get_object("ct-bucket", "binary.bin").unwrap();
    assert_eq!(stored.content_type(), "application/octet-stream");
}

#[tokio::test]
async fn test_get_missing_object() {
    let (app, _) = setup();
    create_bucket(&app, "empty-bucket").await;

    let (missing_object, _, object_body) = send(
        &app,
        Method::GET,
        "/storage/v1/b/empty-bucket/o/no-such-file.txt",
        None,
        Body::empty(),
    )
    .await;
    let (missing_bucket, _, _) = send(
        &app,
        Method::GET,
        "/storage/v1/b/ghost-bucket/o/no-such-file.txt",
        None,
        Body::empty(),
    )
    .await;

    assert_eq!(missing_object, StatusCode::NOT_FOUND);
    assert_eq!(missing_bucket, StatusCode::NOT_FOUND);

    let error: ErrorResponse = serde_json::from_slice(&object_body).unwrap();
    assert_eq!(error.error.code, 404);
}

#[tokio::test]
async fn test_get_nested_object_name() {
    let (app, _) = setup();
    create_bucket(&app, "nested").await;

    let (status, _) = upload(
        &app,
        "nested",
        "dir%2Fsub%2Ffile.txt",
        b"deep",
        Some("text/plain"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, body) = send(
        &app,
        Method::GET,
        "/storage/v1/b/nested/o/dir/sub/file.txt",
        None,
        Body::empty(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"deep");
}

#[tokio::test]
async fn test_list_objects() {
    let (app, _) = setup();
    create_bucket(&app, "list-bucket").await;
    upload(&app, "list-bucket", "file1.txt", b"content1", Some("text/plain")).await;
    upload(&app, "list-bucket", "file2.txt", b"content2", Some("text/plain")).await;

    let (status, content_type, body) = send(
        &app,
        Method::GET,
        "/storage/v1/b/list-bucket/o",
        None,
        Body::empty(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));

    let list: ObjectList = serde_json::from_slice(&body).unwrap();
    assert_eq!(list.kind, "storage#objects");
    assert_eq!(list.items.len(), 2);

    let mut names: Vec<&str> = list.items.iter().map(|o| o.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["file1.txt", "file2.txt"]);
    assert!(list.items.iter().all(|o| o.kind == "storage#object" && o.size == 8));
}

#[tokio::test]
async fn test_list_empty_bucket() {
    let (app, _) = setup();
    create_bucket(&app, "empty").await;

    let (status, _, body) =
        send(&app, Method::GET, "/storage/v1/b/empty/o", None, Body::empty()).await;
    assert_eq!(status, StatusCode::OK);

    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value, serde_json::json!({"kind": "storage#objects", "items": []}));
}

#[tokio::test]
async fn test_list_missing_bucket() {
    let (app, _) = setup();
    let (status, _, _) =
        send(&app, Method::GET, "/storage/v1/b/ghost-bucket/o", None, Body::empty()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route() {
    let (app, _) = setup();
    let (status, _, body) =
        send(&app, Method::GET, "/storage/v1/nothing-here", None, Body::empty()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error.code, 404);
}

#[tokio::test]
async fn test_concurrent_bucket_creates() {
    let (app, state) = setup();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move { create_bucket(&app, "contended").await })
        })
        .collect();

    let mut ok = 0;
    let mut conflict = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::OK => ok += 1,
            StatusCode::CONFLICT => conflict += 1,
            other => panic!("unexpected status {}", other),
        }
    }

    assert_eq!(ok, 1);
    assert_eq!(conflict, 15);
    assert_eq!(state.store().bucket_names(), vec!["contended"]);
}

#[tokio::test]
async fn test_manifest_preloaded_before_serving() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = dir.path().join("data.json");
    std::fs::write(&data_path, br#"{"test": true}"#).unwrap();
    let manifest_path = dir.path().join("manifest.yml");
    std::fs::write(
        &manifest_path,
        format!(
            "buckets:\n  test-bucket:\n    files:\n      - path: {}\n        content-type: application/json\n",
            data_path.display()
        ),
    )
    .unwrap();

    let config = ServiceConfig {
        manifest_path: Some(manifest_path),
        ..ServiceConfig::default()
    };
    let state = ServiceState::from_config(&config).unwrap();
    let app = router(state);

    let (status, _, body) =
        send(&app, Method::GET, "/storage/v1/b/test-bucket/o", None, Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    let list: ObjectList = serde_json::from_slice(&body).unwrap();
    assert_eq!(list.items.len(), 1);
    assert_eq!(list.items[0].name, "data.json");

    let (status, content_type, body) = send(
        &app,
        Method::GET,
        "/storage/v1/b/test-bucket/o/data.json",
        None,
        Body::empty(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, br#"{"test": true}"#);
    assert_eq!(content_type.as_deref(), Some("application/json"));

    // Preload tolerates the bucket, the runtime API does not
    assert_eq!(create_bucket(&app, "test-bucket").await, StatusCode::CONFLICT);
}
