//! Per-sensor processing pipeline and its explicit state machine.

use std::sync::Arc;

use tracing::info;

use crate::point_pipeline::common::cloud::PointCloud;
use crate::point_pipeline::common::error::{IngestionError, Result};
use crate::point_pipeline::ingestion::{
    DepthImage, DepthImageReader, HeightMap, ImageDepthReader, SensorCalibration,
};
use crate::point_pipeline::projection;
use crate::point_pipeline::transform::TransformParameters;
use crate::point_pipeline::worker::{ColormapWorker, FrameSlot, RenderFrame};

/// How far the sensor has progressed since its last frame.
///
/// Transitions are triggered only by the operation that owns them:
/// ingestion moves to `Projected` (new reference cloud cached), a
/// transform apply moves to `Transformed`. Loading and projection are
/// fused in `ingest`, so there is no observable loaded-but-unprojected
/// state; `Empty` covers everything before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Empty,
    Projected,
    Transformed,
}

/// One sensor's pipeline: reader seam, cached state, and colormap worker.
///
/// Owns its height map, reference cloud, and transform parameters
/// exclusively; the two sensors of a rig share no mutable state. The
/// reference cloud is recomputed only on ingestion, never by transform
/// changes.
pub struct SensorPipeline<R: DepthImageReader = ImageDepthReader> {
    name: String,
    reader: R,
    calibration: SensorCalibration,
    params: TransformParameters,
    height_map: Option<HeightMap>,
    reference: Option<PointCloud>,
    stage: Stage,
    slot: Arc<FrameSlot>,
    worker: ColormapWorker,
}

impl SensorPipeline<ImageDepthReader> {
    pub fn new(name: &str, calibration: SensorCalibration) -> Self {
        Self::with_reader(ImageDepthReader, name, calibration)
    }
}

impl<R: DepthImageReader> SensorPipeline<R> {
    pub fn with_reader(reader: R, name: &str, calibration: SensorCalibration) -> Self {
        let slot = Arc::new(FrameSlot::new());
        let worker = ColormapWorker::spawn(name, slot.clone());
        Self {
            name: name.to_string(),
            reader,
            calibration,
            params: TransformParameters::default(),
            height_map: None,
            reference: None,
            stage: Stage::Empty,
            slot,
            worker,
        }
    }

    /// Decodes raw frame bytes without touching pipeline state, so a rig
    /// can decode both sensors' frames before committing either.
    pub fn read_frame(&self, data: &[u8]) -> Result<DepthImage> {
        self.reader.read_depth(data)
    }

    /// Ingests a decoded frame: builds the height map, projects and caches
    /// the reference cloud, then re-applies the standing transform so the
    /// new frame is immediately displayable.
    pub fn ingest(&mut self, image: &DepthImage, saturation: u16) -> Result<PointCloud> {
        let map = HeightMap::from_depth_image(image, saturation, self.calibration)?;
        let reference = projection::project(&map);

        info!(
            "{}: ingested {}x{} frame, {} reference points",
            self.name,
            map.rows(),
            map.cols(),
            reference.len()
        );

        self.height_map = Some(map);
        self.reference = Some(reference);
        self.stage = Stage::Projected;

        self.apply()
    }

    pub fn params(&self) -> TransformParameters {
        self.params
    }

    /// Updates the transform parameters without recomputing anything; the
    /// displayed cloud changes only on the next `apply`.
    pub fn set_params(&mut self, params: TransformParameters) {
        self.params = params;
    }

    /// Resets the transform to identity. Like `set_params`, takes effect
    /// on the next `apply`.
    pub fn reset_params(&mut self) {
        self.params.reset();
    }

    /// Recomputes the displayed cloud from the cached reference and the
    /// current parameters, and queues its colormap under a fresh
    /// generation token. Returns the displayed cloud.
    pub fn apply(&mut self) -> Result<PointCloud> {
        let reference = self.reference.as_ref().ok_or(IngestionError::NoFrame)?;
        let displayed = self.params.apply(reference);
        let generation = self.slot.next_generation();
        self.worker.submit(generation, displayed.clone());
        self.stage = Stage::Transformed;
        Ok(displayed)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn calibration(&self) -> SensorCalibration {
        self.calibration
    }

    /// Cleaned height map of the current frame, for the external 2D
    /// preview.
    pub fn height_map(&self) -> Option<&HeightMap> {
        self.height_map.as_ref()
    }

    /// Cached reference cloud (post-projection, pre-transform).
    pub fn reference_cloud(&self) -> Option<&PointCloud> {
        self.reference.as_ref()
    }

    /// Most recently committed (displayed cloud, color buffer) pair.
    pub fn latest_frame(&self) -> Option<Arc<RenderFrame>> {
        self.slot.latest()
    }

    /// Generation token of the newest apply request.
    pub fn current_generation(&self) -> u64 {
        self.slot.current_generation()
    }
}
