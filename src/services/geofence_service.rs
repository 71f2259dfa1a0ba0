//! Geofence checks for report submission.
//!
//! Distances use the spherical Haversine formula with the mean Earth radius.
//! Against the WGS84 ellipsoid the error stays below ~0.5% for terrestrial
//! distances, which is well inside GPS noise at the radii used here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Meters spanned by one degree of latitude on the sphere above.
const METERS_PER_DEGREE: f64 = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeoError {
    #[error("invalid coordinate: lat={latitude}, lon={longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("invalid radius: {0} m (must be > 0)")]
    InvalidRadius(f64),
}

/// WGS84 latitude/longitude in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        let coord = Self {
            latitude,
            longitude,
        };
        coord.validate()?;
        Ok(coord)
    }

    pub fn validate(&self) -> Result<(), GeoError> {
        let lat_ok = self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude);
        let lon_ok = self.longitude.is_finite() && (-180.0..=180.0).contains(&self.longitude);
        if lat_ok && lon_ok {
            Ok(())
        } else {
            Err(GeoError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeofenceResult {
    pub within_radius: bool,
    pub distance_m: f64,
}

/// Lat/lon rectangle enclosing a circle. Used as a cheap SQL prefilter; the
/// exact check is always [`haversine_m`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

pub fn check_within_radius(
    submitter: Coordinate,
    target: Coordinate,
    radius_m: f64,
) -> Result<GeofenceResult, GeoError> {
    submitter.validate()?;
    target.validate()?;
    if !(radius_m.is_finite() && radius_m > 0.0) {
        return Err(GeoError::InvalidRadius(radius_m));
    }

    let distance_m = haversine_m(submitter, target);
    Ok(GeofenceResult {
        within_radius: distance_m <= radius_m,
        distance_m,
    })
}

/// Great-circle distance in meters. Inputs are assumed valid.
pub fn haversine_m(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push h a hair outside [0, 1] for antipodal points.
    let h = h.clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

pub fn bounding_box(center: Coordinate, radius_m: f64) -> BoundingBox {
    let lat_change = radius_m / METERS_PER_DEGREE;
    let min_lat = (center.latitude - lat_change).max(-90.0);
    let max_lat = (center.latitude + lat_change).min(90.0);

    let cos_lat = center.latitude.to_radians().cos().abs();
    let lon_change = if cos_lat < 1e-9 {
        180.0
    } else {
        lat_change / cos_lat
    };

    // Near the poles or across the antimeridian the box would wrap; widen it
    // to the full longitude range instead.
    if lon_change >= 180.0
        || max_lat >= 90.0
        || min_lat <= -90.0
        || center.longitude - lon_change < -180.0
        || center.longitude + lon_change > 180.0
    {
        return BoundingBox {
            min_lat,
            max_lat,
            min_lon: -180.0,
            max_lon: 180.0,
        };
    }

    BoundingBox {
        min_lat,
        max_lat,
        min_lon: center.longitude - lon_change,
        max_lon: center.longitude + lon_change,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn same_point_is_zero_distance_and_inside() {
        let p = coord(21.1594, 79.0494);
        let result = check_within_radius(p, p, 0.001).unwrap();
        assert_eq!(result.distance_m, 0.0);
        assert!(result.within_radius);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = coord(21.1594, 79.0494);
        let b = coord(19.0760, 72.8777);
        assert_eq!(haversine_m(a, b), haversine_m(b, a));
    }

    #[test]
    fn one_degree_of_longitude_at_equator() {
        let d = haversine_m(coord(0.0, 0.0), coord(0.0, 1.0));
        let expected = 111_195.0;
        assert!((d - expected).abs() / expected < 0.01, "got {d}");
    }

    #[test]
    fn exact_boundary_counts_as_inside() {
        let a = coord(0.0, 0.0);
        let b = coord(0.0, 1.0);
        let d = haversine_m(a, b);
        let result = check_within_radius(a, b, d).unwrap();
        assert!(result.within_radius);

        let result = check_within_radius(a, b, d - 0.01).unwrap();
        assert!(!result.within_radius);
    }

    #[test]
    fn latitude_out_of_range_is_rejected() {
        assert!(matches!(
            Coordinate::new(91.0, 0.0),
            Err(GeoError::InvalidCoordinate { .. })
        ));

        let bad = Coordinate {
            latitude: 91.0,
            longitude: 0.0,
        };
        let err = check_within_radius(bad, coord(0.0, 0.0), 50.0).unwrap_err();
        assert!(matches!(err, GeoError::InvalidCoordinate { .. }));
    }

    #[test]
    fn nan_longitude_is_rejected() {
        assert!(Coordinate::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn zero_or_negative_radius_is_rejected() {
        let p = coord(10.0, 10.0);
        assert_eq!(
            check_within_radius(p, p, 0.0).unwrap_err(),
            GeoError::InvalidRadius(0.0)
        );
        assert!(check_within_radius(p, p, -5.0).is_err());
    }

    #[test]
    fn antipodal_points_are_half_circumference() {
        let d = haversine_m(coord(0.0, 0.0), coord(0.0, 180.0));
        let half = std::f64::consts::PI * EARTH_RADIUS_M;
        assert!((d - half).abs() < 1.0);
    }

    #[test]
    fn bounding_box_contains_circle() {
        let center = coord(21.1594, 79.0494);
        let bbox = bounding_box(center, 1_000.0);
        assert!(bbox.min_lat < center.latitude && center.latitude < bbox.max_lat);
        assert!(bbox.min_lon < center.longitude && center.longitude < bbox.max_lon);

        // A point 999 m due east must fall inside the box.
        let east = coord(
            center.latitude,
            center.longitude + 999.0 / (METERS_PER_DEGREE * center.latitude.to_radians().cos()),
        );
        assert!(haversine_m(center, east) < 1_000.0);
        assert!(east.longitude <= bbox.max_lon);
    }

    #[test]
    fn bounding_box_widens_near_pole() {
        let bbox = bounding_box(coord(89.9999, 10.0), 500.0);
        assert_eq!(bbox.min_lon, -180.0);
        assert_eq!(bbox.max_lon, 180.0);
        assert_eq!(bbox.max_lat, 90.0);
    }
}
