use crate::point_pipeline::common::error::Result;
use crate::point_pipeline::ingestion::types::DepthImage;

/// Seam for decoding raw frame bytes into a [`DepthImage`].
///
/// Production code uses [`ImageDepthReader`](super::ImageDepthReader);
/// tests substitute synthetic frames.
pub trait DepthImageReader {
    fn read_depth(&self, data: &[u8]) -> Result<DepthImage>;
}
