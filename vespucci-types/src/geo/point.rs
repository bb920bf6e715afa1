use approx::AbsDiffEq;
use num_traits::Float;
use serde::{Deserialize, Serialize};

/// A point on the surface of a celestial body.
pub trait GeoPoint {
    /// Numeric type used to represent coordinates.
    type Num: Float;

    /// Latitude in degrees.
    fn lat(&self) -> Self::Num;

    /// Longitude in degrees.
    fn lon(&self) -> Self::Num;

    /// Latitude in radians.
    fn lat_rad(&self) -> Self::Num {
        self.lat().to_radians()
    }

    /// Longitude in radians.
    fn lon_rad(&self) -> Self::Num {
        self.lon().to_radians()
    }
}

/// A geographic point type that can be constructed from coordinates.
pub trait NewGeoPoint<N = f64>: GeoPoint<Num = N> + Sized {
    /// Creates a point from latitude and longitude in degrees.
    fn latlon(lat: N, lon: N) -> Self;

    /// Creates a point from longitude and latitude in degrees.
    fn lonlat(lon: N, lat: N) -> Self {
        Self::latlon(lat, lon)
    }
}

/// A ground-anchored position: geographic coordinates plus an optional height above the
/// ellipsoid.
///
/// Ground points are immutable values. Interactions that move a point (dragging) replace it
/// with a new one instead of mutating it in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct GroundPoint {
    lat: f64,
    lon: f64,
    height: Option<f64>,
}

impl GroundPoint {
    /// Creates a new point on the ellipsoid surface.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            height: None,
        }
    }

    /// Creates a new point with the given height above the ellipsoid, in meters.
    pub fn with_height(lat: f64, lon: f64, height: f64) -> Self {
        Self {
            lat,
            lon,
            height: Some(height),
        }
    }

    /// Height above the ellipsoid in meters, if known.
    pub fn height(&self) -> Option<f64> {
        self.height
    }

    /// Creates a new point from any geographic point.
    pub fn from(other: &impl GeoPoint<Num = f64>) -> Self {
        Self {
            lat: other.lat(),
            lon: other.lon(),
            height: None,
        }
    }
}

impl GeoPoint for GroundPoint {
    type Num = f64;

    fn lat(&self) -> f64 {
        self.lat
    }

    fn lon(&self) -> f64 {
        self.lon
    }
}

impl NewGeoPoint<f64> for GroundPoint {
    fn latlon(lat: f64, lon: f64) -> Self {
        Self::new(lat, lon)
    }
}

impl AbsDiffEq for GroundPoint {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.lat.abs_diff_eq(&other.lat, epsilon) && self.lon.abs_diff_eq(&other.lon, epsilon)
    }
}
