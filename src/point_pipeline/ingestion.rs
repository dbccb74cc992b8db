//! Depth frame ingestion: decoding, dropout repair, metric scaling, denoising

pub mod height_map;
pub mod image_reader;
pub mod reader;
pub mod types;

pub use height_map::HeightMap;
pub use image_reader::ImageDepthReader;
pub use reader::DepthImageReader;
pub use types::{DepthImage, SensorCalibration};
