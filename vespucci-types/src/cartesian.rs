//! Cartesian point traits used by the projection and area code.

use nalgebra::{Point2, Point3, Scalar};
use num_traits::{Float, FromPrimitive};

/// A point in a 2-dimensional cartesian coordinate system.
pub trait CartesianPoint2d {
    /// Numeric type used to represent coordinates.
    type Num: Float + Scalar + FromPrimitive;

    /// X coordinate.
    fn x(&self) -> Self::Num;

    /// Y coordinate.
    fn y(&self) -> Self::Num;
}

/// A 2d cartesian point type that can be constructed from coordinates.
pub trait NewCartesianPoint2d<Num = f64>: CartesianPoint2d<Num = Num> {
    /// Creates a new point.
    fn new(x: Num, y: Num) -> Self;
}

/// A point in a 3-dimensional cartesian coordinate system.
pub trait CartesianPoint3d {
    /// Numeric type used to represent coordinates.
    type Num: Float + Scalar + FromPrimitive;

    /// X coordinate.
    fn x(&self) -> Self::Num;

    /// Y coordinate.
    fn y(&self) -> Self::Num;

    /// Z coordinate.
    fn z(&self) -> Self::Num;

    /// Straight-line distance to another point.
    fn distance(&self, other: &impl CartesianPoint3d<Num = Self::Num>) -> Self::Num {
        let dx = self.x() - other.x();
        let dy = self.y() - other.y();
        let dz = self.z() - other.z();
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl CartesianPoint2d for Point2<f64> {
    type Num = f64;

    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }
}

impl NewCartesianPoint2d for Point2<f64> {
    fn new(x: f64, y: f64) -> Self {
        Point2::new(x, y)
    }
}

impl CartesianPoint3d for Point3<f64> {
    type Num = f64;

    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }

    fn z(&self) -> f64 {
        self.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_3d() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(3.0, 4.0, 12.0);
        assert_eq!(a.distance(&b), 13.0);
    }
}
