//! Distance functions between two locations.
//!
//! Cartesian distance works on plot or grid units directly. The geographic
//! kinds take (lon, lat) in degrees and return meters.

use contour_common::Point;
use num_traits::Float;
use serde::{Deserialize, Serialize};

/// Mean Earth radius (meters)
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// WGS84 semi-major axis (meters)
const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening
const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// How distance between two points is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceKind {
    /// Straight-line distance in the input units.
    #[default]
    Cartesian,
    /// Equirectangular approximation, fine for short steps.
    FlatEarth,
    /// Haversine distance on a sphere.
    GreatCircle,
    /// Vincenty inverse solution on the WGS84 ellipsoid.
    Geodesic,
}

impl DistanceKind {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cartesian" | "c" => Some(Self::Cartesian),
            "flat" | "flat_earth" | "f" => Some(Self::FlatEarth),
            "great_circle" | "gc" | "g" => Some(Self::GreatCircle),
            "geodesic" | "e" => Some(Self::Geodesic),
            _ => None,
        }
    }

    /// Whether inputs are (lon, lat) degrees.
    pub fn is_geographic(&self) -> bool {
        !matches!(self, DistanceKind::Cartesian)
    }
}

/// Units used when reporting geographic distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    Meter,
    #[default]
    Kilometer,
    StatuteMile,
    NauticalMile,
    /// Arc degrees on the mean sphere
    Degree,
}

impl DistanceUnit {
    /// Meters per unit.
    pub fn meters(&self) -> f64 {
        match self {
            DistanceUnit::Meter => 1.0,
            DistanceUnit::Kilometer => 1000.0,
            DistanceUnit::StatuteMile => 1609.344,
            DistanceUnit::NauticalMile => 1852.0,
            DistanceUnit::Degree => EARTH_RADIUS_M * std::f64::consts::PI / 180.0,
        }
    }

    /// Convert a distance in meters to this unit.
    pub fn from_meters(&self, meters: f64) -> f64 {
        meters / self.meters()
    }
}

/// Wrap an angle in degrees into [-180, 180).
pub fn wrap_degrees<T: Float>(value: T) -> T {
    let full = T::from(360.0).unwrap_or_else(T::one);
    let half = T::from(180.0).unwrap_or_else(T::one);
    let mut v = (value + half) % full;
    if v < T::zero() {
        v = v + full;
    }
    v - half
}

/// Distance between `a` and `b` using the given kind.
///
/// Geographic kinds expect x = longitude, y = latitude in degrees.
pub fn distance(kind: DistanceKind, a: Point, b: Point) -> f64 {
    match kind {
        DistanceKind::Cartesian => a.distance(&b),
        DistanceKind::FlatEarth => flat_earth(a, b),
        DistanceKind::GreatCircle => great_circle(a, b),
        DistanceKind::Geodesic => vincenty(a, b).unwrap_or_else(|| great_circle(a, b)),
    }
}

fn flat_earth(a: Point, b: Point) -> f64 {
    let dlon = wrap_degrees(b.x - a.x).to_radians();
    let dlat = (b.y - a.y).to_radians();
    let mean_lat = (0.5 * (a.y + b.y)).to_radians();
    EARTH_RADIUS_M * (dlon * mean_lat.cos()).hypot(dlat)
}

fn great_circle(a: Point, b: Point) -> f64 {
    let lat1 = a.y.to_radians();
    let lat2 = b.y.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.x - a.x).to_radians();
    let h = (0.5 * dlat).sin().powi(2) + lat1.cos() * lat2.cos() * (0.5 * dlon).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Vincenty inverse; None when the iteration fails (nearly antipodal points).
fn vincenty(a: Point, b: Point) -> Option<f64> {
    let f = WGS84_F;
    let semi_minor = (1.0 - f) * WGS84_A;

    let l = wrap_degrees(b.x - a.x).to_radians();
    let u1 = ((1.0 - f) * a.y.to_radians().tan()).atan();
    let u2 = ((1.0 - f) * b.y.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    for _ in 0..200 {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();
        if sin_sigma == 0.0 {
            return Some(0.0);
        }
        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos2_alpha = 1.0 - sin_alpha * sin_alpha;
        let cos_2sigma_m = if cos2_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos2_alpha
        } else {
            0.0
        };
        let c = f / 16.0 * cos2_alpha * (4.0 + f * (4.0 - 3.0 * cos2_alpha));
        let previous = lambda;
        lambda = l
            + (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))));

        if (lambda - previous).abs() < 1.0e-12 {
            let u_sq = cos2_alpha * (WGS84_A.powi(2) - semi_minor.powi(2)) / semi_minor.powi(2);
            let big_a =
                1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
            let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
            let delta_sigma = big_b
                * sin_sigma
                * (cos_2sigma_m
                    + big_b / 4.0
                        * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))
                            - big_b / 6.0
                                * cos_2sigma_m
                                * (-3.0 + 4.0 * sin_sigma.powi(2))
                                * (-3.0 + 4.0 * cos_2sigma_m.powi(2))));
            return Some(semi_minor * big_a * (sigma - delta_sigma));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(190.0), -170.0);
        assert_eq!(wrap_degrees(-190.0), 170.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert_eq!(wrap_degrees(45.0f32), 45.0f32);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let a = Point::new(10.0, 0.0);
        let b = Point::new(10.0, 1.0);
        let expected = EARTH_RADIUS_M.to_radians();
        assert!((distance(DistanceKind::GreatCircle, a, b) - expected).abs() < 1.0);
        assert!((distance(DistanceKind::FlatEarth, a, b) - expected).abs() < 1.0);
        // Ellipsoidal meridian degree at the equator is ~110.57 km
        let geodesic = distance(DistanceKind::Geodesic, a, b);
        assert!((geodesic - 110_574.0).abs() < 5.0, "got {geodesic}");
    }

    #[test]
    fn test_dateline_step_is_short() {
        let a = Point::new(179.5, 0.0);
        let b = Point::new(-179.5, 0.0);
        let gc = distance(DistanceKind::GreatCircle, a, b);
        assert!(gc < 112_000.0);
        assert!(distance(DistanceKind::FlatEarth, a, b) < 112_000.0);
    }

    #[test]
    fn test_cartesian_is_euclidean() {
        let d = distance(DistanceKind::Cartesian, Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        assert_eq!(d, 5.0);
    }

    #[test]
    fn test_units() {
        assert_eq!(DistanceUnit::Kilometer.from_meters(2500.0), 2.5);
        assert_eq!(DistanceUnit::NauticalMile.from_meters(1852.0), 1.0);
        assert_eq!(DistanceKind::from_str("GC"), Some(DistanceKind::GreatCircle));
        assert_eq!(DistanceKind::from_str("bogus"), None);
    }
}
