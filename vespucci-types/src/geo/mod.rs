//! Geographic points and datum parameters.

mod datum;
mod point;

pub use datum::Datum;
pub use point::{GeoPoint, GroundPoint, NewGeoPoint};
