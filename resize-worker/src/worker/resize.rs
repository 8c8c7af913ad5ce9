//! Constrained image resampling
//!
//! Derivatives fit inside the requested bounding box, preserve aspect ratio,
//! and are never enlarged beyond the original dimensions. The output is
//! re-encoded in the source format.
//!
//! Uses `spawn_blocking` for the CPU-intensive work to avoid blocking the
//! async runtime.

use std::io::Cursor;

use bytes::Bytes;
use image::{imageops::FilterType, GenericImageView};
use thiserror::Error;
use tracing::debug;

use super::config::SizeSpec;

/// Errors that can occur while producing a derivative
#[derive(Debug, Error)]
pub enum ResizeError {
    /// Input bytes are not a recognized image format
    #[error("Unrecognized image format")]
    UnknownFormat,

    /// Input bytes could not be decoded
    #[error("Failed to decode image: {0}")]
    Decode(image::ImageError),

    /// Output could not be encoded
    #[error("Failed to encode image: {0}")]
    Encode(image::ImageError),

    /// The blocking resize task panicked
    #[error("Resize task panicked: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Largest dimensions that fit inside the bounding box without enlarging
///
/// Returns the original dimensions unchanged when they already fit.
pub(crate) fn fit_within(width: u32, height: u32, spec: SizeSpec) -> (u32, u32) {
    if width <= spec.width && height <= spec.height {
        return (width, height);
    }

    let wratio = f64::from(spec.width) / f64::from(width);
    let hratio = f64::from(spec.height) / f64::from(height);
    let ratio = wratio.min(hratio);

    let new_width = (f64::from(width) * ratio).round() as u32;
    let new_height = (f64::from(height) * ratio).round() as u32;
    (new_width.max(1), new_height.max(1))
}

/// Resamples image bytes to fit inside the given bounding box
///
/// # Errors
///
/// Returns `ResizeError` when the input cannot be decoded or the output
/// cannot be re-encoded.
pub fn resize_to_fit(data: &[u8], spec: SizeSpec) -> Result<Vec<u8>, ResizeError> {
    let format = image::guess_format(data).map_err(|_| ResizeError::UnknownFormat)?;
    let img = image::load_from_memory_with_format(data, format).map_err(ResizeError::Decode)?;

    let (orig_width, orig_height) = img.dimensions();
    let (new_width, new_height) = fit_within(orig_width, orig_height, spec);

    let output = if (new_width, new_height) == (orig_width, orig_height) {
        debug!(
            width = orig_width,
            height = orig_height,
            "image already within bounds, re-encoding as-is"
        );
        img
    } else {
        debug!(
            from_width = orig_width,
            from_height = orig_height,
            to_width = new_width,
            to_height = new_height,
            "resampling image"
        );
        img.resize(spec.width, spec.height, FilterType::Triangle)
    };

    let mut cursor = Cursor::new(Vec::new());
    output
        .write_to(&mut cursor, format)
        .map_err(ResizeError::Encode)?;

    Ok(cursor.into_inner())
}

/// Runs `resize_to_fit` on a blocking thread
///
/// # Errors
///
/// Propagates `resize_to_fit` errors and task panics.
pub async fn resize_to_fit_blocking(data: Bytes, spec: SizeSpec) -> Result<Vec<u8>, ResizeError> {
    tokio::task::spawn_blocking(move || resize_to_fit(&data, spec)).await?
}
