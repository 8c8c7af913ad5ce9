//! Media object route handlers
//!
//! Every operation is a pass-through to the object store; origin uploads
//! land under the `uploads/` namespace so the resize worker can pick them up
//! from the bucket's creation notifications.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use media_storage::object_store::{ObjectStore, ObjectSummary};

use crate::{state::AppState, types::AppError};

/// Namespace for uploaded origin objects
const UPLOADS_PREFIX: &str = "uploads/";

/// Default number of keys returned by list operations
const DEFAULT_LIST_MAX_KEYS: i32 = 100;

/// Query parameters for presigned upload URL issuance
#[derive(Debug, Deserialize)]
pub struct PresignedUrlParams {
    /// Name of the file the client intends to upload
    pub file_name: Option<String>,
    /// Content type the client will send
    pub content_type: Option<String>,
}

/// Presigned upload URL and the key it grants access to
#[derive(Debug, Serialize)]
pub struct PresignedUrlResponse {
    /// The presigned PUT URL
    pub url: String,
    /// Object key the upload will land under
    pub key: String,
}

/// Issues a time-limited upload URL for a fresh `uploads/` key
///
/// # Errors
///
/// Returns 400 when `file_name` or `content_type` is missing, or a storage
/// error when URL generation fails.
#[instrument(skip(app_state))]
pub async fn presigned_upload_url(
    State(app_state): State<AppState>,
    Query(params): Query<PresignedUrlParams>,
) -> Result<Json<PresignedUrlResponse>, AppError> {
    let (Some(file_name), Some(content_type)) = (params.file_name, params.content_type) else {
        return Err(AppError::new(
            StatusCode::BAD_REQUEST,
            "missing_parameters",
            "file_name and content_type are required",
            false,
        ));
    };

    let key = upload_key(&file_name);
    let presigned = app_state
        .media_store
        .presigned_put_url(&key, &content_type)
        .await?;

    info!("Issued presigned upload URL for {key}");

    Ok(Json(PresignedUrlResponse {
        url: presigned.url,
        key,
    }))
}

/// Response for direct uploads
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Human-readable confirmation
    pub message: &'static str,
    /// Object key the file was stored under
    pub key: String,
}

/// Accepts a multipart upload and stores it directly
///
/// # Errors
///
/// Returns 400 when the request carries no `file` part, or a storage error
/// when the write fails.
#[instrument(skip(app_state, multipart))]
pub async fn upload(
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(|_| invalid_multipart())? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload.bin").to_string();
        let content_type = field.content_type().map(ToString::to_string);
        let data = field.bytes().await.map_err(|_| invalid_multipart())?;

        let key = upload_key(&file_name);
        info!("Uploading {} bytes to {key}", data.len());

        app_state
            .media_store
            .put_object(&key, data, content_type.as_deref())
            .await?;

        return Ok(Json(UploadResponse {
            message: "File uploaded successfully",
            key,
        }));
    }

    Err(AppError::new(
        StatusCode::BAD_REQUEST,
        "missing_file",
        "No file uploaded",
        false,
    ))
}

/// Presigned download URL for a stored object
#[derive(Debug, Serialize)]
pub struct DownloadUrlResponse {
    /// The presigned GET URL
    pub url: String,
}

/// Issues a time-limited download URL for the given key
///
/// # Errors
///
/// Returns a storage error when URL generation fails.
#[instrument(skip(app_state))]
pub async fn download_url(
    State(app_state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DownloadUrlResponse>, AppError> {
    let presigned = app_state.media_store.presigned_get_url(&key).await?;

    Ok(Json(DownloadUrlResponse { url: presigned.url }))
}

/// Query parameters for list operations
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Key prefix to list under, defaults to `uploads/`
    pub prefix: Option<String>,
    /// Maximum number of keys to return, defaults to 100
    pub max_keys: Option<i32>,
}

/// Objects found under the requested prefix
#[derive(Debug, Serialize)]
pub struct ListResponse {
    /// Object summaries
    pub objects: Vec<ObjectSummary>,
}

/// Lists objects under a key prefix
///
/// # Errors
///
/// Returns a storage error when the list operation fails.
#[instrument(skip(app_state))]
pub async fn list_objects(
    State(app_state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>, AppError> {
    let prefix = params
        .prefix
        .unwrap_or_else(|| UPLOADS_PREFIX.to_string());
    let max_keys = params.max_keys.unwrap_or(DEFAULT_LIST_MAX_KEYS);

    let objects = app_state.media_store.list_objects(&prefix, max_keys).await?;

    Ok(Json(ListResponse { objects }))
}

/// Response for delete operations
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Human-readable confirmation
    pub message: &'static str,
}

/// Deletes the object under the given key
///
/// # Errors
///
/// Returns a storage error when the delete fails.
#[instrument(skip(app_state))]
pub async fn delete_object(
    State(app_state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    app_state.media_store.delete_object(&key).await?;

    info!("Deleted object {key}");

    Ok(Json(DeleteResponse {
        message: "Object deleted successfully",
    }))
}

/// Fresh `uploads/` key for an incoming file
fn upload_key(file_name: &str) -> String {
    format!("{UPLOADS_PREFIX}{}-{file_name}", Utc::now().timestamp_millis())
}

const fn invalid_multipart() -> AppError {
    AppError::new(
        StatusCode::BAD_REQUEST,
        "invalid_multipart",
        "Malformed multipart request",
        false,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_keys_land_in_the_uploads_namespace() {
        let key = upload_key("photo.png");
        assert!(key.starts_with(UPLOADS_PREFIX));
        assert!(key.ends_with("-photo.png"));
    }

    #[test]
    fn upload_keys_embed_a_millisecond_timestamp() {
        let key = upload_key("photo.png");
        let stamp = key
            .trim_start_matches(UPLOADS_PREFIX)
            .trim_end_matches("-photo.png");
        assert!(stamp.parse::<i64>().is_ok());
    }
}
