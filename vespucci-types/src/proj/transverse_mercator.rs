use std::marker::PhantomData;

use crate::cartesian::{CartesianPoint2d, NewCartesianPoint2d};
use crate::geo::Datum;
use crate::geo::{GeoPoint, NewGeoPoint};
use crate::proj::Projection;

/// Transverse Mercator projection based on the Krüger series.
///
/// Parameterized by central meridian, scale factor and false easting/northing, this single
/// implementation powers both UTM and Gauss-Krüger zones.
#[derive(Debug, Copy, Clone)]
pub struct TransverseMercator<In, Out> {
    eccentricity: f64,
    rectifying_radius: f64,
    alpha: [f64; 4],
    beta: [f64; 4],
    delta: [f64; 3],

    central_meridian: f64,
    scale: f64,
    false_easting: f64,
    false_northing: f64,

    phantom_in: PhantomData<In>,
    phantom_out: PhantomData<Out>,
}

impl<In, Out> TransverseMercator<In, Out> {
    /// Creates a projection with the given central meridian (degrees), scale factor at the
    /// central meridian and false easting/northing (meters).
    pub fn new(
        datum: Datum,
        central_meridian: f64,
        scale: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let f = datum.flattening();
        let n = f / (2.0 - f);
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;

        let rectifying_radius = datum.semimajor() / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0);

        let alpha = [
            n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0 + 41.0 * n4 / 180.0,
            13.0 * n2 / 48.0 - 3.0 * n3 / 5.0 + 557.0 * n4 / 1440.0,
            61.0 * n3 / 240.0 - 103.0 * n4 / 140.0,
            49561.0 * n4 / 161280.0,
        ];
        let beta = [
            n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0 - n4 / 360.0,
            n2 / 48.0 + n3 / 15.0 - 437.0 * n4 / 1440.0,
            17.0 * n3 / 480.0 - 37.0 * n4 / 840.0,
            4397.0 * n4 / 161280.0,
        ];
        let delta = [
            2.0 * n - 2.0 * n2 / 3.0 - 2.0 * n3,
            7.0 * n2 / 3.0 - 8.0 * n3 / 5.0,
            56.0 * n3 / 15.0,
        ];

        Self {
            eccentricity: datum.eccentricity_sq().sqrt(),
            rectifying_radius,
            alpha,
            beta,
            delta,
            central_meridian,
            scale,
            false_easting,
            false_northing,
            phantom_in: PhantomData,
            phantom_out: PhantomData,
        }
    }

    /// Creates the projection for the given UTM zone.
    pub fn utm(datum: Datum, zone: u8, southern: bool) -> Self {
        let central_meridian = f64::from(zone) * 6.0 - 183.0;
        let false_northing = if southern { 10_000_000.0 } else { 0.0 };
        Self::new(datum, central_meridian, 0.9996, 500_000.0, false_northing)
    }

    /// Creates the projection for the given Gauss-Krüger zone.
    ///
    /// The false easting embeds the zone number as the leading digit of the easting value
    /// (zone 5 produces eastings starting with `5`).
    pub fn gauss_krueger(datum: Datum, zone: u8) -> Self {
        let central_meridian = f64::from(zone) * 3.0;
        let false_easting = f64::from(zone) * 1_000_000.0 + 500_000.0;
        Self::new(datum, central_meridian, 1.0, false_easting, 0.0)
    }

    /// Central meridian in degrees.
    pub fn central_meridian(&self) -> f64 {
        self.central_meridian
    }
}

impl<In: NewGeoPoint<f64>, Out: NewCartesianPoint2d<f64>> Projection
    for TransverseMercator<In, Out>
{
    type InPoint = In;
    type OutPoint = Out;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        let phi = input.lat_rad();
        let lambda = (input.lon() - self.central_meridian).to_radians();

        let sin_phi = phi.sin();
        let tau = (sin_phi.atanh() - self.eccentricity * (self.eccentricity * sin_phi).atanh())
            .sinh();

        let xi_prime = tau.atan2(lambda.cos());
        let eta_prime = (lambda.sin() / tau.hypot(lambda.cos())).asinh();

        let mut xi = xi_prime;
        let mut eta = eta_prime;
        for (index, coef) in self.alpha.iter().enumerate() {
            let j = (index + 1) as f64 * 2.0;
            xi += coef * (j * xi_prime).sin() * (j * eta_prime).cosh();
            eta += coef * (j * xi_prime).cos() * (j * eta_prime).sinh();
        }

        let east = self.false_easting + self.scale * self.rectifying_radius * eta;
        let north = self.false_northing + self.scale * self.rectifying_radius * xi;

        if east.is_finite() && north.is_finite() {
            Some(Out::new(east, north))
        } else {
            None
        }
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        let xi = (input.y() - self.false_northing) / (self.scale * self.rectifying_radius);
        let eta = (input.x() - self.false_easting) / (self.scale * self.rectifying_radius);

        let mut xi_prime = xi;
        let mut eta_prime = eta;
        for (index, coef) in self.beta.iter().enumerate() {
            let j = (index + 1) as f64 * 2.0;
            xi_prime -= coef * (j * xi).sin() * (j * eta).cosh();
            eta_prime -= coef * (j * xi).cos() * (j * eta).sinh();
        }

        let chi = (xi_prime.sin() / eta_prime.cosh()).asin();
        let mut phi = chi;
        for (index, coef) in self.delta.iter().enumerate() {
            let j = (index + 1) as f64 * 2.0;
            phi += coef * (j * chi).sin();
        }

        let lambda = eta_prime.sinh().atan2(xi_prime.cos());

        let lat = phi.to_degrees();
        let lon = self.central_meridian + lambda.to_degrees();
        if lat.is_finite() && lon.is_finite() {
            Some(In::latlon(lat, lon))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use nalgebra::Point2;

    use super::*;
    use crate::geo::GroundPoint;

    type Tm = TransverseMercator<GroundPoint, Point2<f64>>;

    #[test]
    fn utm_zone_33() {
        let projection = Tm::utm(Datum::WGS84, 33, false);
        let projected = projection
            .project(&GroundPoint::new(45.2344, 14.3534))
            .expect("projection failed");

        assert_abs_diff_eq!(projected.x, 449_246.25, epsilon = 0.01);
        assert_abs_diff_eq!(projected.y, 5_009_193.14, epsilon = 0.01);
    }

    #[test]
    fn utm_southern_hemisphere() {
        let projection = Tm::utm(Datum::WGS84, 55, true);
        let projected = projection
            .project(&GroundPoint::new(-35.31, 149.12))
            .expect("projection failed");

        assert_abs_diff_eq!(projected.x, 692_735.80, epsilon = 0.01);
        assert_abs_diff_eq!(projected.y, 6_090_516.70, epsilon = 0.01);
    }

    #[test]
    fn gauss_krueger_embeds_zone_digit() {
        for (zone, lon, expected_east) in [
            (5u8, 14.3534, 5_449_225.94),
            (6u8, 17.3534, 6_449_225.94),
            (7u8, 20.3534, 7_449_225.94),
        ] {
            let projection = Tm::gauss_krueger(Datum::WGS84, zone);
            let projected = projection
                .project(&GroundPoint::new(45.2344, lon))
                .expect("projection failed");

            assert_abs_diff_eq!(projected.x, expected_east, epsilon = 0.01);
            assert_abs_diff_eq!(projected.y, 5_011_197.62, epsilon = 0.01);
        }
    }

    #[test]
    fn round_trip() {
        let samples = [
            (45.2344, 14.3534),
            (-35.31, 13.0),
            (0.0, 15.0),
            (60.5, 16.25),
        ];
        let projection = Tm::new(Datum::WGS84, 15.0, 0.9996, 500_000.0, 0.0);

        for (lat, lon) in samples {
            let projected = projection
                .project(&GroundPoint::new(lat, lon))
                .expect("projection failed");
            let unprojected = projection.unproject(&projected).expect("inverse failed");

            assert_abs_diff_eq!(unprojected.lat(), lat, epsilon = 1e-4);
            assert_abs_diff_eq!(unprojected.lon(), lon, epsilon = 1e-4);
        }
    }
}
