use std::marker::PhantomData;

use geodesy::prelude::*;

use crate::cartesian::{CartesianPoint2d, NewCartesianPoint2d};
use crate::geo::{GeoPoint, NewGeoPoint};
use crate::proj::Projection;

/// Projection backed by a [`geodesy`] operator definition string.
///
/// Used by the registry for user-supplied coordinate systems. A definition the library
/// cannot parse yields `None` from [`GeodesyProjection::new`], and the registry then falls
/// back to plain geographic formatting.
pub struct GeodesyProjection<In, Out> {
    context: Minimal,
    op: OpHandle,
    phantom_in: PhantomData<In>,
    phantom_out: PhantomData<Out>,
}

impl<In, Out> GeodesyProjection<In, Out> {
    /// Creates a projection from a geodesy operator definition, e.g. `"utm zone=32"`.
    pub fn new(definition: &str) -> Option<Self> {
        let mut context = Minimal::new();
        let op = context.op(definition).ok()?;
        Some(Self {
            context,
            op,
            phantom_in: PhantomData,
            phantom_out: PhantomData,
        })
    }
}

impl<In: NewGeoPoint<f64>, Out: NewCartesianPoint2d<f64>> Projection
    for GeodesyProjection<In, Out>
{
    type InPoint = In;
    type OutPoint = Out;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        let mut data = [Coor2D::geo(input.lat(), input.lon())];
        self.context.apply(self.op, Fwd, &mut data).ok()?;

        if !data[0].0[0].is_finite() || !data[0].0[1].is_finite() {
            return None;
        }

        Some(Out::new(data[0].0[0], data[0].0[1]))
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        let mut data = [Coor2D([input.x(), input.y()])];
        self.context.apply(self.op, Inv, &mut data).ok()?;

        Some(In::latlon(
            data[0].0[1].to_degrees(),
            data[0].0[0].to_degrees(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Point2;

    use super::*;
    use crate::geo::GroundPoint;

    #[test]
    fn malformed_definition_is_rejected() {
        assert!(
            GeodesyProjection::<GroundPoint, Point2<f64>>::new("definitely not a projection")
                .is_none()
        );
    }
}
