//! Depth frame reader implementation using the `image` library.
//!
//! Decodes single-channel frames (PNG in practice, any grayscale format the
//! `image` crate understands) into 16-bit luma samples and applies the
//! mandatory mounting rotation.

use image::imageops;
use tracing::debug;

use crate::point_pipeline::common::error::{IngestionError, Result};
use crate::point_pipeline::ingestion::reader::DepthImageReader;
use crate::point_pipeline::ingestion::types::DepthImage;

/// Depth frame reader backed by the `image` crate.
pub struct ImageDepthReader;

impl DepthImageReader for ImageDepthReader {
    /// Decodes a depth frame from raw file bytes.
    ///
    /// The sensor is mounted rotated a quarter turn, so every frame is
    /// rotated 270 degrees (90 degrees clockwise) before any other
    /// processing. Skipping this would silently swap the X/Y axes of the
    /// projected cloud.
    fn read_depth(&self, data: &[u8]) -> Result<DepthImage> {
        debug!("Decoding depth frame, {} bytes", data.len());

        let decoded = image::load_from_memory(data)
            .map_err(|e| IngestionError::Decode(e.to_string()))?;

        let luma = decoded.to_luma16();
        let rotated = imageops::rotate90(&luma);
        let (width, height) = rotated.dimensions();

        if width == 0 || height == 0 {
            return Err(IngestionError::EmptyImage { width, height });
        }

        debug!("Decoded depth frame: {}x{} after rotation", width, height);

        Ok(DepthImage {
            width: width as usize,
            height: height as usize,
            data: rotated.into_raw(),
        })
    }
}
