//! Object-creation notification payloads
//!
//! Mirrors the event shape the bucket's notification mechanism delivers:
//! a `Records` array where each entry names the bucket and the URL-encoded
//! object key. Delivery is at-least-once and unordered; duplicates must be
//! tolerated by consumers.

use percent_encoding::percent_decode_str;
use serde::Deserialize;

/// A batch of creation events delivered in a single notification
#[derive(Debug, Clone, Deserialize)]
pub struct S3Event {
    /// Creation records, one per created object
    #[serde(rename = "Records")]
    pub records: Vec<S3EventRecord>,
}

/// A single object-creation record
#[derive(Debug, Clone, Deserialize)]
pub struct S3EventRecord {
    /// Event name, e.g. `ObjectCreated:Put`
    #[serde(rename = "eventName", default)]
    pub event_name: String,
    /// Bucket and object details
    pub s3: S3Entity,
}

/// Bucket and object details of a creation record
#[derive(Debug, Clone, Deserialize)]
pub struct S3Entity {
    /// Bucket the object was created in
    pub bucket: S3Bucket,
    /// The created object
    pub object: S3Object,
}

/// Bucket reference within a creation record
#[derive(Debug, Clone, Deserialize)]
pub struct S3Bucket {
    /// Bucket name
    pub name: String,
}

/// Object reference within a creation record
#[derive(Debug, Clone, Deserialize)]
pub struct S3Object {
    /// URL-encoded object key
    pub key: String,
    /// Object size in bytes, when reported
    #[serde(default)]
    pub size: Option<i64>,
}

/// Decodes an object key as delivered in notification payloads
///
/// The store encodes keys with `+` for spaces before percent-encoding the
/// rest, so `+` is restored first and the remainder percent-decoded.
#[must_use]
pub fn decode_key(raw: &str) -> String {
    percent_decode_str(&raw.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}
