//! Surface distance and area measurement on the reference ellipsoid.

use nalgebra::{Point3, Vector3};

use crate::cartesian::CartesianPoint3d;
use crate::geo::{Datum, GeoPoint, GroundPoint};

const CONVERGENCE: f64 = 1e-12;
const MAX_ITERATIONS: usize = 100;

/// Measures distances and areas along the surface of the reference ellipsoid.
#[derive(Debug, Clone, Copy, Default)]
pub struct Geodesic {
    datum: Datum,
}

impl Geodesic {
    /// Creates a measurement engine for the given datum.
    pub fn new(datum: Datum) -> Self {
        Self { datum }
    }

    /// Distance in meters between two points along the ellipsoid surface.
    ///
    /// This is the geodesic (Vincenty inverse) solution, not the straight 3d chord: two
    /// points on opposite sides of a mountain ridge are close in space but far apart on the
    /// surface.
    pub fn surface_distance(&self, a: &GroundPoint, b: &GroundPoint) -> f64 {
        let semimajor = self.datum.semimajor();
        let semiminor = self.datum.semiminor();
        let flattening = self.datum.flattening();

        let u1 = ((1.0 - flattening) * a.lat_rad().tan()).atan();
        let u2 = ((1.0 - flattening) * b.lat_rad().tan()).atan();
        let delta_lon = b.lon_rad() - a.lon_rad();

        let (sin_u1, cos_u1) = u1.sin_cos();
        let (sin_u2, cos_u2) = u2.sin_cos();

        let mut lambda = delta_lon;
        let mut sin_sigma = 0.0;
        let mut cos_sigma = 0.0;
        let mut sigma = 0.0;
        let mut cos_sq_alpha = 0.0;
        let mut cos_2sm = 0.0;

        for _ in 0..MAX_ITERATIONS {
            let (sin_lambda, cos_lambda) = lambda.sin_cos();
            sin_sigma = (cos_u2 * sin_lambda).hypot(cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda);
            if sin_sigma == 0.0 {
                // Coincident points.
                return 0.0;
            }

            cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
            sigma = sin_sigma.atan2(cos_sigma);

            let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
            cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
            cos_2sm = if cos_sq_alpha == 0.0 {
                // Both points on the equator.
                0.0
            } else {
                cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
            };

            let c = flattening / 16.0 * cos_sq_alpha * (4.0 + flattening * (4.0 - 3.0 * cos_sq_alpha));
            let prev_lambda = lambda;
            lambda = delta_lon
                + (1.0 - c)
                    * flattening
                    * sin_alpha
                    * (sigma
                        + c * sin_sigma
                            * (cos_2sm + c * cos_sigma * (-1.0 + 2.0 * cos_2sm * cos_2sm)));

            if (lambda - prev_lambda).abs() < CONVERGENCE {
                break;
            }
        }

        let u_sq = cos_sq_alpha * (semimajor * semimajor - semiminor * semiminor)
            / (semiminor * semiminor);
        let a_coef =
            1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
        let b_coef = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));

        let delta_sigma = b_coef
            * sin_sigma
            * (cos_2sm
                + b_coef / 4.0
                    * (cos_sigma * (-1.0 + 2.0 * cos_2sm * cos_2sm)
                        - b_coef / 6.0
                            * cos_2sm
                            * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                            * (-3.0 + 4.0 * cos_2sm * cos_2sm)));

        semiminor * a_coef * (sigma - delta_sigma)
    }

    /// Length in meters of the path through the given points; with `close_loop` the leg
    /// from the last point back to the first is included.
    pub fn path_length(&self, points: &[GroundPoint], close_loop: bool) -> f64 {
        let mut length: f64 = points
            .windows(2)
            .map(|pair| self.surface_distance(&pair[0], &pair[1]))
            .sum();

        if close_loop && points.len() > 2 {
            if let (Some(first), Some(last)) = (points.first(), points.last()) {
                length += self.surface_distance(last, first);
            }
        }

        length
    }

    /// Area in square meters of the ring through the given points.
    ///
    /// The ring is projected onto the tangent plane at its centroid, fan-triangulated, and
    /// the triangle areas are summed with Heron's formula over the embedded vertex
    /// distances. Returns `0` for fewer than 3 points.
    pub fn polygon_area(&self, points: &[GroundPoint]) -> f64 {
        if points.len() < 3 {
            return 0.0;
        }

        let ecef: Vec<Point3<f64>> = points
            .iter()
            .map(|point| self.datum.geographic_to_ecef(point))
            .collect();

        let centroid = ecef
            .iter()
            .fold(Vector3::zeros(), |sum, point| sum + point.coords)
            / ecef.len() as f64;
        let Some(normal) = centroid.try_normalize(f64::EPSILON) else {
            return 0.0;
        };

        let on_plane: Vec<Point3<f64>> = ecef
            .iter()
            .map(|point| {
                let offset = point.coords - centroid;
                point - normal * offset.dot(&normal)
            })
            .collect();

        let mut area = 0.0;
        for index in 1..on_plane.len() - 1 {
            area += triangle_area(
                &on_plane[0],
                &on_plane[index],
                &on_plane[index + 1],
            );
        }

        area
    }
}

/// Heron's formula over the pairwise distances of the triangle vertices.
fn triangle_area(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> f64 {
    let ab = a.distance(b);
    let bc = b.distance(c);
    let ca = c.distance(a);

    let s = (ab + bc + ca) / 2.0;
    let arg = s * (s - ab) * (s - bc) * (s - ca);
    if arg > 0.0 {
        arg.sqrt()
    } else {
        // Degenerate (collinear) triangle, possibly with a tiny negative argument from
        // floating point rounding.
        0.0
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;

    fn geodesic() -> Geodesic {
        Geodesic::new(Datum::WGS84)
    }

    #[test]
    fn distance_matches_published_test_line() {
        // Flinders Peak to Buninyong, the classic Vincenty verification line.
        let flinders = GroundPoint::new(-37.95103341, 144.42486789);
        let buninyong = GroundPoint::new(-37.65282114, 143.92649553);

        assert_abs_diff_eq!(
            geodesic().surface_distance(&flinders, &buninyong),
            54_972.271,
            epsilon = 0.01
        );
    }

    #[test]
    fn one_degree_of_longitude_on_the_equator() {
        let distance = geodesic()
            .surface_distance(&GroundPoint::new(0.0, 0.0), &GroundPoint::new(0.0, 1.0));
        assert_abs_diff_eq!(distance, 111_319.491, epsilon = 0.01);
    }

    #[test]
    fn distance_is_symmetric() {
        let samples = [
            (GroundPoint::new(48.8566, 2.3522), GroundPoint::new(51.5074, -0.1278)),
            (GroundPoint::new(-35.31, 149.12), GroundPoint::new(45.2344, 14.3534)),
            (GroundPoint::new(0.0, 0.0), GroundPoint::new(0.1, 0.1)),
        ];

        for (a, b) in samples {
            let forward = geodesic().surface_distance(&a, &b);
            let reverse = geodesic().surface_distance(&b, &a);
            assert_relative_eq!(forward, reverse, epsilon = 1e-9);
        }
    }

    #[test]
    fn distance_of_coincident_points_is_zero() {
        let point = GroundPoint::new(45.2344, 14.3534);
        assert_eq!(geodesic().surface_distance(&point, &point), 0.0);
    }

    #[test]
    fn path_length_sums_segments() {
        let points = [
            GroundPoint::new(0.0, 0.0),
            GroundPoint::new(0.0, 1.0),
            GroundPoint::new(0.0, 2.0),
        ];
        let open = geodesic().path_length(&points, false);
        assert_abs_diff_eq!(open, 2.0 * 111_319.491, epsilon = 0.1);

        let closed = geodesic().path_length(&points, true);
        assert_abs_diff_eq!(closed, 2.0 * open, epsilon = 0.1);
    }

    #[test]
    fn degenerate_inputs_measure_zero() {
        let g = geodesic();
        let p = GroundPoint::new(45.0, 15.0);
        let q = GroundPoint::new(45.1, 15.1);

        assert_eq!(g.path_length(&[], false), 0.0);
        assert_eq!(g.path_length(&[p], true), 0.0);
        assert_eq!(g.polygon_area(&[]), 0.0);
        assert_eq!(g.polygon_area(&[p]), 0.0);
        assert_eq!(g.polygon_area(&[p, q]), 0.0);
    }

    #[test]
    fn collinear_ring_has_no_area() {
        let points = [
            GroundPoint::new(0.0, 0.0),
            GroundPoint::new(0.0, 0.005),
            GroundPoint::new(0.0, 0.01),
        ];
        assert_abs_diff_eq!(geodesic().polygon_area(&points), 0.0, epsilon = 1.0);
    }

    #[test]
    fn rectangle_area_matches_side_product() {
        // A rectangle-like quadrilateral of roughly 351 m x 430 m near Canberra.
        let lat: f64 = -35.31;
        let lon = 149.12;
        let dlat = 430.0 / 111_132.95;
        let dlon = 351.0 / (111_319.49 * lat.to_radians().cos().abs());

        let ring = [
            GroundPoint::new(lat, lon),
            GroundPoint::new(lat, lon + dlon),
            GroundPoint::new(lat + dlat, lon + dlon),
            GroundPoint::new(lat + dlat, lon),
        ];

        let g = geodesic();
        let width = g.surface_distance(&ring[0], &ring[1]);
        let height = g.surface_distance(&ring[1], &ring[2]);
        let area = g.polygon_area(&ring);

        assert_relative_eq!(area, width * height, max_relative = 0.01);
        assert_relative_eq!(area, 150_848.0, max_relative = 0.01);
    }
}
