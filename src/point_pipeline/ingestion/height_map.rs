//! Metric height map construction from a decoded depth frame.
//!
//! Three cleanup passes run on every new frame, in order: dropout repair
//! (raw 0 means the rangefinder got no return and is pushed to the far
//! extreme), metric scaling by `-z_step`, and a 5x5 median filter that
//! suppresses speckle while keeping step edges.

use tracing::debug;

use crate::point_pipeline::common::error::{IngestionError, Result};
use crate::point_pipeline::ingestion::types::{DepthImage, SensorCalibration};

/// Side length of the median filter window.
const MEDIAN_WINDOW: usize = 5;

/// Cleaned, metric-scaled height grid for one sensor frame.
///
/// Row-major with the column index varying fastest; immutable once built.
/// Rows map to X and columns to Y during projection.
#[derive(Debug, Clone)]
pub struct HeightMap {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
    calibration: SensorCalibration,
}

impl HeightMap {
    /// Builds a height map from a decoded frame.
    ///
    /// `saturation` is the maximum raw sample observed across both sensors'
    /// current frames; dropout pixels (raw value exactly 0) are replaced
    /// with it before scaling so they land at the far depth extreme instead
    /// of the near one.
    ///
    /// Larger raw values mean closer range, so scaling by `-z_step` both
    /// converts to millimeters and re-orients the grid to a consistent
    /// up convention.
    pub fn from_depth_image(
        image: &DepthImage,
        saturation: u16,
        calibration: SensorCalibration,
    ) -> Result<Self> {
        if image.width == 0 || image.height == 0 {
            return Err(IngestionError::EmptyImage {
                width: image.width as u32,
                height: image.height as u32,
            });
        }

        let dropouts = image.data.iter().filter(|&&raw| raw == 0).count();
        if dropouts > 0 {
            debug!("Repairing {} dropout pixels to saturation {}", dropouts, saturation);
        }

        let metric: Vec<f64> = image
            .data
            .iter()
            .map(|&raw| {
                let repaired = if raw == 0 { saturation } else { raw };
                f64::from(repaired) * -calibration.z_step
            })
            .collect();

        let values = median_filter(&metric, image.height, image.width);

        Ok(Self {
            rows: image.height,
            cols: image.width,
            values,
            calibration,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn calibration(&self) -> SensorCalibration {
        self.calibration
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols + col]
    }
}

/// 5x5 median filter with reflected borders.
///
/// Grids smaller than the window pass through unchanged; there is not
/// enough neighborhood for the median to be meaningful there.
fn median_filter(values: &[f64], rows: usize, cols: usize) -> Vec<f64> {
    if rows < MEDIAN_WINDOW || cols < MEDIAN_WINDOW {
        return values.to_vec();
    }

    let radius = (MEDIAN_WINDOW / 2) as i64;
    let mut out = vec![0.0; values.len()];
    let mut window = [0.0f64; MEDIAN_WINDOW * MEDIAN_WINDOW];

    for row in 0..rows {
        for col in 0..cols {
            let mut n = 0;
            for dr in -radius..=radius {
                let r = reflect(row as i64 + dr, rows);
                for dc in -radius..=radius {
                    let c = reflect(col as i64 + dc, cols);
                    window[n] = values[r * cols + c];
                    n += 1;
                }
            }
            window.sort_unstable_by(f64::total_cmp);
            out[row * cols + col] = window[window.len() / 2];
        }
    }

    out
}

/// Reflects an out-of-range index back into `0..n` (edge-duplicating
/// reflection). A single reflection suffices because the window radius is
/// smaller than the guaranteed grid size.
fn reflect(i: i64, n: usize) -> usize {
    let n = n as i64;
    let r = if i < 0 {
        -i - 1
    } else if i >= n {
        2 * n - 1 - i
    } else {
        i
    };
    r as usize
}
