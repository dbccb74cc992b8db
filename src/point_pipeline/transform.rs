//! Operator-controlled rigid alignment of a reference cloud.

use nalgebra::{Rotation3, Vector3};

use crate::point_pipeline::common::cloud::PointCloud;

/// Six operator-set scalars per sensor: offsets in millimeters, angles in
/// degrees. Default is the identity transform.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransformParameters {
    pub x_offset: f64,
    pub y_offset: f64,
    pub z_offset: f64,
    pub x_angle: f64,
    pub y_angle: f64,
    pub z_angle: f64,
}

impl TransformParameters {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Restores the identity transform (all six scalars to zero).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Produces the displayed cloud from a reference cloud.
    ///
    /// Pure in both inputs: the reference is never mutated and repeated
    /// calls with equal parameters give equal results. Total over all
    /// finite inputs; range enforcement belongs to the caller's UI.
    ///
    /// Order of operations:
    /// 1. X-axis rotation about the coordinate origin. X rotation only
    ///    moves Y/Z, so no pivot is needed.
    /// 2. Combined Y/Z rotation (fixed-axis composition, Rz * Ry) pivoted
    ///    about the cloud's mean X. Without the pivot, small tilt/yaw
    ///    angles would swing the whole cloud around the coordinate origin.
    /// 3. Translation by the offsets.
    pub fn apply(&self, reference: &PointCloud) -> PointCloud {
        let mut points = reference.points().to_vec();

        if self.x_angle != 0.0 {
            let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), self.x_angle.to_radians());
            for p in &mut points {
                *p = rx * *p;
            }
        }

        if self.y_angle != 0.0 || self.z_angle != 0.0 {
            let ryz = Rotation3::from_euler_angles(
                0.0,
                self.y_angle.to_radians(),
                self.z_angle.to_radians(),
            );
            let mean_x = if points.is_empty() {
                0.0
            } else {
                points.iter().map(|p| p.x).sum::<f64>() / points.len() as f64
            };
            for p in &mut points {
                p.x -= mean_x;
                *p = ryz * *p;
                p.x += mean_x;
            }
        }

        let offset = Vector3::new(self.x_offset, self.y_offset, self.z_offset);
        for p in &mut points {
            *p += offset;
        }

        PointCloud::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn reference() -> PointCloud {
        PointCloud::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, -1.0),
            Point3::new(2.0, 1.0, 3.0),
            Point3::new(3.0, 0.5, 0.5),
        ])
    }

    fn assert_clouds_eq(a: &PointCloud, b: &PointCloud, epsilon: f64) {
        assert_eq!(a.len(), b.len());
        for (pa, pb) in a.points().iter().zip(b.points()) {
            assert_relative_eq!(pa.x, pb.x, epsilon = epsilon);
            assert_relative_eq!(pa.y, pb.y, epsilon = epsilon);
            assert_relative_eq!(pa.z, pb.z, epsilon = epsilon);
        }
    }

    #[test]
    fn identity_returns_the_reference_exactly() {
        let cloud = reference();
        let displayed = TransformParameters::default().apply(&cloud);
        assert_eq!(displayed, cloud);
    }

    #[test]
    fn apply_is_idempotent_for_equal_parameters() {
        let cloud = reference();
        let params = TransformParameters {
            x_offset: 3.0,
            y_offset: -1.5,
            z_offset: 0.25,
            x_angle: 12.0,
            y_angle: -7.0,
            z_angle: 33.0,
        };
        let first = params.apply(&cloud);
        let second = params.apply(&cloud);
        assert_eq!(first, second);
    }

    #[test]
    fn reference_cloud_is_never_mutated() {
        let cloud = reference();
        let snapshot = cloud.clone();
        let params = TransformParameters {
            x_angle: 90.0,
            y_angle: 45.0,
            z_angle: -30.0,
            x_offset: 10.0,
            ..Default::default()
        };
        let _ = params.apply(&cloud);
        assert_eq!(cloud, snapshot);
    }

    #[test]
    fn translation_only_shifts_every_point() {
        let cloud = reference();
        let params = TransformParameters {
            x_offset: 1.0,
            y_offset: -2.0,
            z_offset: 3.0,
            ..Default::default()
        };
        let displayed = params.apply(&cloud);
        for (p, q) in cloud.points().iter().zip(displayed.points()) {
            assert_relative_eq!(q.x, p.x + 1.0);
            assert_relative_eq!(q.y, p.y - 2.0);
            assert_relative_eq!(q.z, p.z + 3.0);
        }
    }

    #[test]
    fn x_rotation_maps_y_onto_z() {
        let cloud = PointCloud::new(vec![Point3::new(5.0, 1.0, 0.0)]);
        let params = TransformParameters {
            x_angle: 90.0,
            ..Default::default()
        };
        let displayed = params.apply(&cloud);
        let p = displayed.points()[0];
        // X rotation leaves X alone.
        assert_relative_eq!(p.x, 5.0);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn combined_rotation_pivots_about_mean_x() {
        // Two points symmetric about mean X = 1. A 180 degree Z rotation
        // about that pivot swaps them in X and negates Y.
        let cloud = PointCloud::new(vec![
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, -1.0, 0.0),
        ]);
        let params = TransformParameters {
            z_angle: 180.0,
            ..Default::default()
        };
        let displayed = params.apply(&cloud);
        let expected = PointCloud::new(vec![
            Point3::new(2.0, -1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]);
        assert_clouds_eq(&displayed, &expected, 1e-12);
    }

    #[test]
    fn y_rotation_alone_pivots_about_mean_x() {
        // A single point sits at its own mean X, so a pure Y rotation with
        // the mean-X pivot must leave X untouched when Z is zero.
        let cloud = PointCloud::new(vec![Point3::new(7.0, 3.0, 0.0)]);
        let params = TransformParameters {
            y_angle: 90.0,
            ..Default::default()
        };
        let displayed = params.apply(&cloud);
        let p = displayed.points()[0];
        assert_relative_eq!(p.x, 7.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 3.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn extreme_angles_and_offsets_stay_finite() {
        let cloud = reference();
        let params = TransformParameters {
            x_offset: 1e6,
            y_offset: -1e6,
            z_offset: 1e6,
            x_angle: 720.0,
            y_angle: -540.0,
            z_angle: 1234.5,
        };
        let displayed = params.apply(&cloud);
        assert!(displayed
            .points()
            .iter()
            .all(|p| p.x.is_finite() && p.y.is_finite() && p.z.is_finite()));
    }
}
