use nalgebra::Point3;

/// Ordered point cloud in millimeters, row-major with Y varying fastest.
///
/// Two clouds exist per sensor: the cached reference cloud produced by
/// projection, and the displayed cloud derived from it by the current
/// transform. Both share this representation.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    points: Vec<Point3<f64>>,
}

impl PointCloud {
    pub fn new(points: Vec<Point3<f64>>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point3<f64>> {
        self.points
    }

    /// Maximum X over all points. Meaningless on an empty cloud.
    pub fn max_x(&self) -> f64 {
        self.points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn max_y(&self) -> f64 {
        self.points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn max_z(&self) -> f64 {
        self.points.iter().map(|p| p.z).fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn mean_x(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        self.points.iter().map(|p| p.x).sum::<f64>() / self.points.len() as f64
    }
}

impl FromIterator<Point3<f64>> for PointCloud {
    fn from_iter<I: IntoIterator<Item = Point3<f64>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
