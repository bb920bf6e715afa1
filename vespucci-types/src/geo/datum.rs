use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::geo::point::{GeoPoint, GroundPoint};

/// Parameters of the reference ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Datum {
    semimajor: f64,
    inv_flattening: f64,
}

impl Datum {
    /// WGS84 ellipsoid.
    pub const WGS84: Self = Datum {
        semimajor: 6_378_137.0,
        inv_flattening: 298.257223563,
    };

    /// Semimajor axis in meters.
    pub fn semimajor(&self) -> f64 {
        self.semimajor
    }

    /// Inverse flattening.
    pub fn inv_flattening(&self) -> f64 {
        self.inv_flattening
    }

    /// Flattening.
    pub fn flattening(&self) -> f64 {
        1.0 / self.inv_flattening
    }

    /// Semiminor axis in meters.
    pub fn semiminor(&self) -> f64 {
        self.semimajor * (1.0 - self.flattening())
    }

    /// Square of the first eccentricity.
    pub fn eccentricity_sq(&self) -> f64 {
        let f = self.flattening();
        f * (2.0 - f)
    }

    /// Converts a geographic position into geocentric (ECEF) coordinates in meters.
    ///
    /// Points without a height are placed on the ellipsoid surface.
    pub fn geographic_to_ecef(&self, point: &GroundPoint) -> Point3<f64> {
        let lat = point.lat().to_radians();
        let lon = point.lon().to_radians();
        let height = point.height().unwrap_or(0.0);

        let e2 = self.eccentricity_sq();
        let prime_vertical = self.semimajor / (1.0 - e2 * lat.sin() * lat.sin()).sqrt();

        Point3::new(
            (prime_vertical + height) * lat.cos() * lon.cos(),
            (prime_vertical + height) * lat.cos() * lon.sin(),
            (prime_vertical * (1.0 - e2) + height) * lat.sin(),
        )
    }
}

impl Default for Datum {
    fn default() -> Self {
        Self::WGS84
    }
}
