//! Geographic primitives for donation and user locations.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Mean Earth radius in meters (spherical approximation).
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Meters spanned by one degree of latitude.
pub const METERS_PER_DEGREE: f64 = EARTH_RADIUS_METERS * std::f64::consts::PI / 180.0;

/// A WGS84 coordinate pair. Longitude first, matching GeoJSON order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Point {
    /// Longitude in degrees, [-180, 180]
    #[schema(example = 77.5946)]
    pub longitude: f64,
    /// Latitude in degrees, [-90, 90]
    #[schema(example = 12.9716)]
    pub latitude: f64,
}

/// Rectangle in degrees used to prefilter proximity queries against the
/// store's position index before exact distances are computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_longitude: f64,
    pub max_longitude: f64,
    pub min_latitude: f64,
    pub max_latitude: f64,
}

impl Point {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Whether both coordinates are finite and within WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && (-180.0..=180.0).contains(&self.longitude)
            && (-90.0..=90.0).contains(&self.latitude)
    }

    /// Great-circle distance to `other` in meters, via the haversine formula.
    pub fn distance_meters(&self, other: &Point) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_METERS * c
    }

    /// Bounding box that fully contains the circle of `radius_meters` around
    /// this point. Longitude degrees shrink with latitude, so the box widens
    /// toward the poles; near a pole or across the antimeridian it falls back
    /// to the full longitude range rather than splitting into two boxes.
    pub fn bounding_box(&self, radius_meters: f64) -> BoundingBox {
        let lat_delta = radius_meters / METERS_PER_DEGREE;
        let min_latitude = (self.latitude - lat_delta).max(-90.0);
        let max_latitude = (self.latitude + lat_delta).min(90.0);

        let cos_lat = self.latitude.to_radians().cos();
        let (min_longitude, max_longitude) = if cos_lat <= f64::EPSILON {
            (-180.0, 180.0)
        } else {
            let lon_delta = radius_meters / (METERS_PER_DEGREE * cos_lat);
            let min = self.longitude - lon_delta;
            let max = self.longitude + lon_delta;
            if min < -180.0 || max > 180.0 {
                (-180.0, 180.0)
            } else {
                (min, max)
            }
        };

        BoundingBox {
            min_longitude,
            max_longitude,
            min_latitude,
            max_latitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_self_is_zero() {
        let p = Point::new(77.5946, 12.9716);
        assert_eq!(p.distance_meters(&p), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Point::new(77.5946, 12.9716);
        let b = Point::new(80.2707, 13.0827);
        assert!((a.distance_meters(&b) - b.distance_meters(&a)).abs() < 1e-6);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(0.0, 1.0);
        let d = a.distance_meters(&b);
        assert!((d - 111_195.0).abs() < 100.0, "got {}", d);
    }

    #[test]
    fn bangalore_to_chennai_is_about_290_km() {
        // Bangalore (77.5946, 12.9716) to Chennai (80.2707, 13.0827)
        let a = Point::new(77.5946, 12.9716);
        let b = Point::new(80.2707, 13.0827);
        let d = a.distance_meters(&b);
        assert!((d - 290_000.0).abs() < 5_000.0, "got {}", d);
    }

    #[test]
    fn validity_accepts_boundaries() {
        assert!(Point::new(180.0, 90.0).is_valid());
        assert!(Point::new(-180.0, -90.0).is_valid());
        assert!(Point::new(0.0, 0.0).is_valid());
    }

    #[test]
    fn validity_rejects_out_of_range_and_non_finite() {
        assert!(!Point::new(180.1, 0.0).is_valid());
        assert!(!Point::new(-181.0, 0.0).is_valid());
        assert!(!Point::new(0.0, 90.5).is_valid());
        assert!(!Point::new(0.0, -91.0).is_valid());
        assert!(!Point::new(f64::NAN, 0.0).is_valid());
        assert!(!Point::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn bounding_box_contains_radius() {
        let origin = Point::new(77.0, 12.9);
        let bbox = origin.bounding_box(50_000.0);
        // Points on the circle edge along each axis stay inside the box.
        assert!(bbox.min_latitude < 12.9 - 0.44 && bbox.max_latitude > 12.9 + 0.44);
        assert!(bbox.min_longitude < 77.0 - 0.45 && bbox.max_longitude > 77.0 + 0.45);
    }

    #[test]
    fn bounding_box_widens_to_full_longitude_near_pole() {
        let origin = Point::new(10.0, 89.9);
        let bbox = origin.bounding_box(50_000.0);
        assert_eq!(bbox.min_longitude, -180.0);
        assert_eq!(bbox.max_longitude, 180.0);
        assert_eq!(bbox.max_latitude, 90.0);
    }

    #[test]
    fn bounding_box_widens_to_full_longitude_across_antimeridian() {
        let origin = Point::new(179.9, 0.0);
        let bbox = origin.bounding_box(50_000.0);
        assert_eq!(bbox.min_longitude, -180.0);
        assert_eq!(bbox.max_longitude, 180.0);
    }
}
