//! Per-point color derivation for the displayed cloud.
//!
//! Red/green encode height relative to the cloud's maximum Z (near the top
//! is green-dominant, far below is red-dominant), blue encodes normalized
//! distance from the reference line, alpha is fixed translucency. The loop
//! has no cross-point dependencies and runs on rayon.

use rayon::prelude::*;

use crate::point_pipeline::common::cloud::PointCloud;

/// Exponential falloff rate of the green channel below the maximum height.
const DECAY_RATE: f64 = 0.04;

/// Fixed translucency of every rendered point.
const ALPHA: f32 = 0.5;

/// One RGBA color, each channel in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Colors index-aligned with the displayed cloud they were derived from.
pub type ColorBuffer = Vec<Rgba>;

/// Derives an index-aligned color buffer from a displayed cloud.
///
/// `decay = exp(0.04 * (z - max_z))` is 1.0 at the highest point and falls
/// off below it, so color = (1 - decay, decay, y / max_y, 0.5). A cloud
/// with `max_y == 0` would divide by zero; its blue channel is forced to 0
/// instead. Blue is clamped to [0, 1] so a transformed cloud with negative
/// Y degrades gracefully rather than producing out-of-range channels.
pub fn generate(cloud: &PointCloud) -> ColorBuffer {
    if cloud.is_empty() {
        return Vec::new();
    }

    let max_z = cloud.max_z();
    let max_y = cloud.max_y();

    cloud
        .points()
        .par_iter()
        .map(|p| {
            let decay = (DECAY_RATE * (p.z - max_z)).exp();
            let blue = if max_y == 0.0 {
                0.0
            } else {
                (p.y / max_y).clamp(0.0, 1.0)
            };
            Rgba {
                r: (1.0 - decay) as f32,
                g: decay as f32,
                b: blue as f32,
                a: ALPHA,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn cloud() -> PointCloud {
        PointCloud::new(vec![
            Point3::new(0.0, 0.0, -10.0),
            Point3::new(0.0, 2.0, -1.0),
            Point3::new(1.0, 4.0, 3.0),
            Point3::new(1.0, 1.0, -60.0),
        ])
    }

    #[test]
    fn buffer_is_index_aligned() {
        let colors = generate(&cloud());
        assert_eq!(colors.len(), 4);
    }

    #[test]
    fn channels_stay_in_bounds_with_fixed_alpha() {
        for color in generate(&cloud()) {
            assert!((0.0..=1.0).contains(&color.r));
            assert!((0.0..=1.0).contains(&color.g));
            assert!((0.0..=1.0).contains(&color.b));
            assert_eq!(color.a, 0.5);
        }
    }

    #[test]
    fn highest_point_is_pure_green() {
        let colors = generate(&cloud());
        // Index 2 holds max Z: decay is exactly 1 there.
        assert_relative_eq!(colors[2].g, 1.0);
        assert_relative_eq!(colors[2].r, 0.0);
    }

    #[test]
    fn green_decays_with_depth_below_the_maximum() {
        let colors = generate(&cloud());
        // Deeper points are more red-dominant.
        assert!(colors[1].g > colors[0].g);
        assert!(colors[0].g > colors[3].g);
        assert!(colors[3].r > colors[0].r);
    }

    #[test]
    fn blue_encodes_normalized_distance() {
        let colors = generate(&cloud());
        assert_relative_eq!(colors[0].b, 0.0);
        assert_relative_eq!(colors[1].b, 0.5);
        assert_relative_eq!(colors[2].b, 1.0);
    }

    #[test]
    fn negative_y_clamps_blue_to_zero() {
        // A translated cloud can carry points below Y = 0; their blue
        // channel saturates at 0 instead of going out of range.
        let translated = PointCloud::new(vec![
            Point3::new(0.0, -3.0, 1.0),
            Point3::new(0.0, 2.0, 0.0),
            Point3::new(0.0, 4.0, -1.0),
        ]);
        let colors = generate(&translated);
        assert_eq!(colors[0].b, 0.0);
        assert_relative_eq!(colors[1].b, 0.5);
        assert_relative_eq!(colors[2].b, 1.0);
        for color in colors {
            assert!((0.0..=1.0).contains(&color.b));
        }
    }

    #[test]
    fn flat_y_cloud_gets_zero_blue() {
        let flat = PointCloud::new(vec![
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 2.0),
        ]);
        for color in generate(&flat) {
            assert_eq!(color.b, 0.0);
        }
    }

    #[test]
    fn empty_cloud_gives_empty_buffer() {
        assert!(generate(&PointCloud::new(Vec::new())).is_empty());
    }
}
