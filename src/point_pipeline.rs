//! Dual-rangefinder point cloud pipeline
//!
//! This module turns paired grayscale depth frames into registered 3D point
//! clouds, with separate modules for frame ingestion, metric projection,
//! rigid alignment, and color derivation.

pub mod colormap;
pub mod common;
pub mod ingestion;
pub mod projection;
pub mod rig;
pub mod sensor;
pub mod transform;
pub mod worker;


pub use common::{
    IngestionError,
    PointCloud,
    Result,
};

pub use ingestion::{
    DepthImage,
    DepthImageReader,
    HeightMap,
    ImageDepthReader,
    SensorCalibration,
};

pub use colormap::{ColorBuffer, Rgba};
pub use rig::SensorRig;
pub use sensor::{SensorPipeline, Stage};
pub use transform::TransformParameters;
pub use worker::{ColormapWorker, FrameSlot, RenderFrame};
