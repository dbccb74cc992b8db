//! Projection of a height map into the sensor-local reference frame.

use nalgebra::Point3;
use tracing::debug;

use crate::point_pipeline::common::cloud::PointCloud;
use crate::point_pipeline::ingestion::HeightMap;

/// Projects a cleaned height map into the cached reference cloud.
///
/// Row index maps to X (`row * x_step`), column index to Y
/// (`col * y_step`), the cleaned height to Z. Points are emitted row-major
/// with Y varying fastest, so the cloud has exactly rows * cols points.
///
/// The raw projection is then normalized, exactly once:
/// - Y is re-expressed as distance from the far reference line: the row of
///   points at maximum Y becomes Y = 0 and Y grows toward the near edge.
/// - Z is shifted so the mean height of that reference line is the Z = 0
///   plane. Membership on the line uses float-exact Y equality; every Y on
///   the line comes from the same `col * y_step` product, so equal columns
///   compare bit-identical and the selection is deterministic.
/// - A mirrored sensor has the maximum X subtracted from every X, flipping
///   its cloud to grow in the same direction as its counterpart.
pub fn project(map: &HeightMap) -> PointCloud {
    let calibration = map.calibration();
    let rows = map.rows();
    let cols = map.cols();

    let mut points = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        let x = row as f64 * calibration.x_step;
        for col in 0..cols {
            let y = col as f64 * calibration.y_step;
            points.push(Point3::new(x, y, map.value(row, col)));
        }
    }

    let y_max = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    let (z_sum, z_count) = points
        .iter()
        .filter(|p| p.y == y_max)
        .fold((0.0, 0usize), |(sum, count), p| (sum + p.z, count + 1));
    let z_ref = z_sum / z_count as f64;

    for p in &mut points {
        p.y = y_max - p.y;
        p.z -= z_ref;
    }

    if calibration.mirror {
        let x_max = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        for p in &mut points {
            p.x -= x_max;
        }
    }

    debug!(
        "Projected {} points ({}x{}), reference line at y={}",
        points.len(),
        rows,
        cols,
        y_max
    );

    PointCloud::new(points)
}
