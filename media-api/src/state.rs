//! Application state management

use std::sync::Arc;

use media_storage::object_store::S3MediaStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// S3-backed media store
    pub media_store: Arc<S3MediaStore>,
}
