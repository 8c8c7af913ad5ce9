use media_storage::object_store::{ObjectStore, StorageError};
use thiserror::Error;
use tracing::{error, info};

use crate::types::event::{decode_key, S3Event, S3EventRecord};

use super::config::{ResizeConfig, SizeSpec};
use super::resize::{self, ResizeError};

/// Key prefix of derived objects; keys under it are never reprocessed
pub const DERIVED_PREFIX: &str = "resized/";

/// Errors that abort a notification batch
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Object fetch or derivative write failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Resampling failed
    #[error(transparent)]
    Resize(#[from] ResizeError),
}

/// `DerivativeGenerator` turns object-creation records into resized derivatives
///
/// Stateless across invocations: all working data is local to a single
/// `process_event` call. Concurrent invocations for the same origin key may
/// race on the same derived keys; last writer wins, which is acceptable
/// because derivatives are regenerated from the origin bytes every time.
pub struct DerivativeGenerator<S> {
    config: ResizeConfig,
    store: S,
}

impl<S: ObjectStore> DerivativeGenerator<S> {
    /// Creates a new `DerivativeGenerator`
    #[must_use]
    pub const fn new(config: ResizeConfig, store: S) -> Self {
        Self { config, store }
    }

    /// Processes one notification batch
    ///
    /// Records are processed strictly in sequence. Qualification checks skip
    /// gracefully; a fetch, resample, or write failure aborts the remaining
    /// batch, and already-written derivatives are not rolled back.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError` on the first store or resample failure.
    pub async fn process_event(&self, event: &S3Event) -> Result<(), GeneratorError> {
        if !self.config.enabled {
            info!("Image resizing is disabled. Skipping processing.");
            return Ok(());
        }

        for record in &event.records {
            self.process_record(record).await?;
        }

        Ok(())
    }

    async fn process_record(&self, record: &S3EventRecord) -> Result<(), GeneratorError> {
        // Step 1: restore the key from its notification encoding
        let key = decode_key(&record.s3.object.key);

        // Step 2: derived objects would notify again and loop forever
        if key.starts_with(DERIVED_PREFIX) {
            info!("Skipping already resized image: {key}");
            return Ok(());
        }

        info!("Processing: {key}");

        // Step 3: fetch bytes and declared content type
        let object = self.store.get_object(&key).await?;

        // Step 4: only the image/ family qualifies
        let content_type = match object.content_type.as_deref() {
            Some(ct) if ct.starts_with("image/") => ct.to_string(),
            other => {
                info!(
                    "Skipping non-image file: {key} ({})",
                    other.unwrap_or("no content type")
                );
                return Ok(());
            }
        };

        // Step 5: one derivative per configured size, in configured order
        for raw_spec in &self.config.size_specs {
            let spec = match SizeSpec::parse(raw_spec) {
                Ok(spec) => spec,
                Err(e) => {
                    error!("{e}");
                    continue;
                }
            };

            info!("Resizing {key} to {spec}");
            let resized = resize::resize_to_fit_blocking(object.body.clone(), spec).await?;

            let derived = derived_key(&key, spec);
            self.store
                .put_object(&derived, resized.into(), Some(&content_type))
                .await?;

            info!("Uploaded resized image to {derived}");
        }

        Ok(())
    }
}

/// Derived keys live under the size-qualified namespace, keyed by the
/// basename of the origin key
fn derived_key(origin: &str, spec: SizeSpec) -> String {
    let basename = origin.rsplit('/').next().unwrap_or(origin);
    format!("{DERIVED_PREFIX}{spec}/{basename}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(width: u32, height: u32) -> SizeSpec {
        SizeSpec { width, height }
    }

    #[test]
    fn derived_key_uses_origin_basename() {
        assert_eq!(
            derived_key("uploads/photo.png", spec(150, 300)),
            "resized/150x300/photo.png"
        );
        assert_eq!(
            derived_key("uploads/2024/01/photo.png", spec(500, 600)),
            "resized/500x600/photo.png"
        );
    }

    #[test]
    fn derived_key_handles_bare_filenames() {
        assert_eq!(derived_key("photo.png", spec(150, 300)), "resized/150x300/photo.png");
    }
}
