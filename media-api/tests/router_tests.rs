mod common;

use common::*;

use axum::body::Body;
use http::{Request, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn health_returns_ok() {
    let router = test_router();

    let response = router
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_response_body(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn unknown_routes_return_json_not_found() {
    let router = test_router();

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/unknown")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        parse_response_body(response).await,
        json!({ "error": "Not Found" })
    );
}

#[tokio::test]
async fn presigned_url_requires_both_parameters() {
    for uri in [
        "/api/media/presigned-url",
        "/api/media/presigned-url?file_name=photo.png",
        "/api/media/presigned-url?content_type=image/png",
    ] {
        let router = test_router();
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri: {uri}");

        let body = parse_response_body(response).await;
        assert_eq!(body["error"]["code"], "missing_parameters");
        assert_eq!(body["allowRetry"], false);
    }
}

#[tokio::test]
async fn upload_without_multipart_body_is_rejected() {
    let router = test_router();

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/media/upload")
                .header("content-type", "multipart/form-data; boundary=xyz")
                .body(Body::from("--xyz--\r\n"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = parse_response_body(response).await;
    assert_eq!(body["error"]["code"], "missing_file");
}
