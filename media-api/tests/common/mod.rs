// Not every helper is used in every test, so we allow dead code
#![allow(dead_code)]

use std::sync::Arc;

use aws_sdk_s3::{
    config::{BehaviorVersion, Region},
    Client as S3Client, Config,
};
use axum::body::Body;
use http::Response;
use http_body_util::BodyExt;
use media_api::{routes, state::AppState};
use media_storage::object_store::S3MediaStore;

/// Builds the full router over a store that never sees traffic in these
/// tests; routes that do not reach S3 can be exercised without a backend
pub fn test_router() -> axum::Router {
    let config = Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .build();
    let s3_client = Arc::new(S3Client::from_conf(config));
    let media_store = Arc::new(S3MediaStore::new(s3_client, "test-bucket".to_string(), 60));

    routes::handler().with_state(AppState { media_store })
}

/// Collects a response body into JSON
pub async fn parse_response_body(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is JSON")
}
