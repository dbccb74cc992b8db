//! Two-sensor coordinator: shared saturation value and paired ingestion.

use std::path::Path;

use tracing::info;

use crate::point_pipeline::common::error::{IngestionError, Result};
use crate::point_pipeline::ingestion::{ImageDepthReader, SensorCalibration};
use crate::point_pipeline::sensor::SensorPipeline;

/// The two rangefinder pipelines of one scanning rig.
///
/// Sensor 1 is mounted on the opposite side and runs mirrored; otherwise
/// the pipelines are symmetric and fully independent. The only joint
/// computation is the saturation value used for dropout repair, which is
/// the maximum raw sample across both sensors' current frames and is
/// computed here before either pipeline is updated.
pub struct SensorRig {
    sensor1: SensorPipeline<ImageDepthReader>,
    sensor2: SensorPipeline<ImageDepthReader>,
}

impl SensorRig {
    pub fn new() -> Self {
        let mirrored = SensorCalibration {
            mirror: true,
            ..SensorCalibration::default()
        };
        Self {
            sensor1: SensorPipeline::new("sensor1", mirrored),
            sensor2: SensorPipeline::new("sensor2", SensorCalibration::default()),
        }
    }

    /// Ingests a paired capture, one image file per sensor.
    ///
    /// Both files are read and decoded before either pipeline is touched:
    /// if anything fails, neither sensor's displayed state changes and the
    /// caller can prompt for a refreshed file list.
    pub fn ingest_pair<P: AsRef<Path>, Q: AsRef<Path>>(&mut self, first: P, second: Q) -> Result<()> {
        let first = first.as_ref();
        let second = second.as_ref();

        info!(
            "Ingesting paired capture: {} / {}",
            first.display(),
            second.display()
        );

        let first_bytes = std::fs::read(first)
            .map_err(|e| IngestionError::Read(format!("{}: {}", first.display(), e)))?;
        let second_bytes = std::fs::read(second)
            .map_err(|e| IngestionError::Read(format!("{}: {}", second.display(), e)))?;

        let first_image = self.sensor1.read_frame(&first_bytes)?;
        let second_image = self.sensor2.read_frame(&second_bytes)?;

        // Both frames decoded; only now may sensor state change.
        let saturation = first_image.max_value().max(second_image.max_value());
        info!("Shared saturation value for this capture: {}", saturation);

        self.sensor1.ingest(&first_image, saturation)?;
        self.sensor2.ingest(&second_image, saturation)?;

        Ok(())
    }

    pub fn sensor1(&self) -> &SensorPipeline<ImageDepthReader> {
        &self.sensor1
    }

    pub fn sensor1_mut(&mut self) -> &mut SensorPipeline<ImageDepthReader> {
        &mut self.sensor1
    }

    pub fn sensor2(&self) -> &SensorPipeline<ImageDepthReader> {
        &self.sensor2
    }

    pub fn sensor2_mut(&mut self) -> &mut SensorPipeline<ImageDepthReader> {
        &mut self.sensor2
    }
}

impl Default for SensorRig {
    fn default() -> Self {
        Self::new()
    }
}
