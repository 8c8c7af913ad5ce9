// Not every helper is used in every test, so we allow dead code
#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::ops::Deref;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use image::{DynamicImage, ImageFormat, RgbImage};
use media_storage::object_store::{
    ObjectStore, ObjectSummary, StorageError, StorageResult, StoredObject,
};
use resize_worker::types::event::S3Event;
use resize_worker::worker::config::ResizeConfig;

/// A store call observed by the recording store, in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Get {
        key: String,
    },
    Put {
        key: String,
        content_type: Option<String>,
    },
}

/// In-memory object store that records every call it receives
#[derive(Default)]
pub struct RecordingStore {
    objects: Mutex<HashMap<String, StoredObject>>,
    calls: Mutex<Vec<StoreCall>>,
    puts_until_failure: Mutex<Option<usize>>,
}

impl RecordingStore {
    /// Seeds an object into the store without recording a call
    pub fn insert(&self, key: &str, body: Bytes, content_type: Option<&str>) {
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.map(ToString::to_string),
            },
        );
    }

    /// Makes every put after the first `n` fail with an S3 error
    pub fn fail_puts_after(&self, n: usize) {
        *self.puts_until_failure.lock().unwrap() = Some(n);
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn put_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| matches!(call, StoreCall::Put { .. }))
            .count()
    }

    /// Returns the stored object under `key`, if any
    pub fn stored(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }
}

/// Clonable handle over a `RecordingStore`, so tests keep inspecting the
/// store they hand to the generator
#[derive(Clone, Default)]
pub struct SharedStore(Arc<RecordingStore>);

impl SharedStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Deref for SharedStore {
    type Target = RecordingStore;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl ObjectStore for SharedStore {
    async fn get_object(&self, key: &str) -> StorageResult<StoredObject> {
        self.0.calls.lock().unwrap().push(StoreCall::Get {
            key: key.to_string(),
        });

        self.0
            .objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> StorageResult<()> {
        self.0.calls.lock().unwrap().push(StoreCall::Put {
            key: key.to_string(),
            content_type: content_type.map(ToString::to_string),
        });

        let mut remaining = self.0.puts_until_failure.lock().unwrap();
        if let Some(n) = remaining.as_mut() {
            if *n == 0 {
                return Err(StorageError::S3Error("injected put failure".to_string()));
            }
            *n -= 1;
        }
        drop(remaining);

        self.0.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.map(ToString::to_string),
            },
        );

        Ok(())
    }

    async fn delete_object(&self, key: &str) -> StorageResult<()> {
        self.0.objects.lock().unwrap().remove(key);
        Ok(())
    }

    async fn list_objects(
        &self,
        _prefix: &str,
        _max_keys: i32,
    ) -> StorageResult<Vec<ObjectSummary>> {
        Ok(Vec::new())
    }
}

/// Builds a notification batch for the given (already encoded) object keys,
/// going through the same JSON shape the bucket notification delivers
pub fn event_for_keys(keys: &[&str]) -> S3Event {
    let records = keys
        .iter()
        .map(|key| {
            format!(
                r#"{{
                    "eventVersion": "2.0",
                    "eventSource": "aws:s3",
                    "eventName": "ObjectCreated:Put",
                    "s3": {{
                        "s3SchemaVersion": "1.0",
                        "bucket": {{ "name": "test-bucket" }},
                        "object": {{ "key": "{key}", "size": 1024 }}
                    }}
                }}"#
            )
        })
        .collect::<Vec<_>>()
        .join(",");

    serde_json::from_str(&format!(r#"{{"Records":[{records}]}}"#)).expect("valid event payload")
}

/// Encodes a solid PNG of the given dimensions
pub fn png_bytes(width: u32, height: u32) -> Bytes {
    let img = DynamicImage::ImageRgb8(RgbImage::new(width, height));
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, ImageFormat::Png).unwrap();
    Bytes::from(cursor.into_inner())
}

/// Resize configuration with the given raw size specifications
pub fn resize_config(enabled: bool, size_specs: &[&str]) -> ResizeConfig {
    ResizeConfig {
        enabled,
        size_specs: size_specs.iter().map(ToString::to_string).collect(),
    }
}
