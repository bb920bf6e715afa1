//! Geodetic primitives and algorithms backing the vespucci drawing and measurement tools.
//!
//! This crate knows nothing about user interaction. It provides:
//!
//! * [`geo`] — the reference ellipsoid ([`geo::Datum`]) and ground-anchored points
//!   ([`geo::GroundPoint`]);
//! * [`proj`] — transverse-Mercator math, the [`proj::Projection`] trait and the
//!   [`proj::ProjectionRegistry`] that converts between geographic degrees and projected
//!   meters and formats the results for display;
//! * [`geodesic`] — ellipsoidal surface distance and tangent-plane ring area;
//! * [`format`] — number and coordinate pretty-printing shared by the display paths.

pub mod cartesian;
pub mod error;
pub mod format;
pub mod geo;
pub mod geodesic;
pub mod proj;

pub use cartesian::{CartesianPoint3d, NewCartesianPoint2d};
pub use error::GeodeticError;
pub use geo::{Datum, GeoPoint, GroundPoint, NewGeoPoint};
