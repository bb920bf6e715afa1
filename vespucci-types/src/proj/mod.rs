//! Coordinate projections and the display-oriented projection registry.

#[cfg(feature = "geodesy")]
mod geodesy;
mod registry;
mod transverse_mercator;

#[cfg(feature = "geodesy")]
pub use geodesy::GeodesyProjection;
pub use registry::{
    DisplayCoords, LatLon, ProjectionDescriptor, ProjectionKind, ProjectionRegistry,
    GAUSS_KRUEGER, GEOGRAPHIC, UTM,
};
pub use transverse_mercator::TransverseMercator;

/// Converts points from one coordinate system into another.
pub trait Projection {
    /// Type of the input points.
    type InPoint;
    /// Type of the output points.
    type OutPoint;

    /// Projects the input point, or returns `None` if the transform cannot produce a finite
    /// result for it.
    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint>;

    /// Inverse of [`project`](Projection::project).
    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint>;
}
