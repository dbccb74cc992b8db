//! Depth frame data types

/// Decoded single-channel depth frame, already rotated to the sensor's
/// mounting orientation.
#[derive(Debug, Clone)]
pub struct DepthImage {
    /// Width of the frame in pixels (columns)
    pub width: usize,
    /// Height of the frame in pixels (rows)
    pub height: usize,
    /// Raw samples, row-major, len = width * height
    pub data: Vec<u16>,
}

impl DepthImage {
    /// Largest raw sample in the frame, fed into the shared saturation
    /// value across both sensors.
    pub fn max_value(&self) -> u16 {
        self.data.iter().copied().max().unwrap_or(0)
    }
}

/// Fixed per-sensor calibration constants.
///
/// `x_step`/`y_step`/`z_step` map pixel indices and raw values to
/// millimeters. `mirror` is set on the sensor mounted on the opposite side
/// so both clouds grow in a common direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorCalibration {
    pub x_step: f64,
    pub y_step: f64,
    pub z_step: f64,
    pub mirror: bool,
}

impl Default for SensorCalibration {
    fn default() -> Self {
        Self {
            x_step: 0.219,
            y_step: 1.0,
            z_step: 0.006,
            mirror: false,
        }
    }
}
