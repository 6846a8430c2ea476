//! crates/achameupet_core/src/geo.rs
//!
//! Bounding-box construction and great-circle distance for proximity search.
//!
//! The box is a planar approximation: one degree of latitude is taken as
//! 111.12 km and the longitude delta is widened by `cos(latitude)`. It holds
//! for city-scale radii and degrades toward the poles, where `cos` approaches
//! zero and the longitude delta blows up. That limitation is part of the
//! documented behavior and is not corrected here.

use crate::domain::GeoPoint;

pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const KM_PER_DEGREE: f64 = 111.12;

/// An axis-aligned latitude/longitude rectangle, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: GeoPoint,
    pub max: GeoPoint,
}

/// Approximates a box of edge ~2×radius centered on `center`.
pub fn bounding_box(center: GeoPoint, radius_km: f64) -> BoundingBox {
    let lat_delta = radius_km / KM_PER_DEGREE;
    let lng_delta = radius_km / (KM_PER_DEGREE * center.latitude.to_radians().cos());

    BoundingBox {
        min: GeoPoint {
            latitude: center.latitude - lat_delta,
            longitude: center.longitude - lng_delta,
        },
        max: GeoPoint {
            latitude: center.latitude + lat_delta,
            longitude: center.longitude + lng_delta,
        },
    }
}

/// Great-circle distance in kilometers (haversine, spherical Earth).
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Rounds a distance to one decimal place for reporting.
pub fn round_km(distance: f64) -> f64 {
    (distance * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(latitude: f64, longitude: f64) -> GeoPoint {
        GeoPoint { latitude, longitude }
    }

    #[test]
    fn haversine_one_degree_on_equator() {
        let d = haversine_km(point(0.0, 0.0), point(0.0, 1.0));
        assert!((d - 111.195).abs() < 0.01, "got {d}");

        let d = haversine_km(point(0.0, 0.0), point(1.0, 0.0));
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn haversine_half_circumference() {
        let d = haversine_km(point(0.0, 0.0), point(0.0, 180.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 0.01, "got {d}");
    }

    #[test]
    fn haversine_zero_for_same_point() {
        let p = point(-23.5505, -46.6333);
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn haversine_is_symmetric() {
        let sp = point(-23.5505, -46.6333);
        let rio = point(-22.9068, -43.1729);
        let there = haversine_km(sp, rio);
        let back = haversine_km(rio, sp);
        assert!((there - back).abs() < 1e-9);
        // São Paulo to Rio de Janeiro is roughly 360 km.
        assert!((355.0..=365.0).contains(&there), "got {there}");
    }

    #[test]
    fn bounding_box_is_symmetric_around_center() {
        let center = point(-23.55, -46.63);
        let bbox = bounding_box(center, 5.0);

        assert!((center.latitude - bbox.min.latitude - (bbox.max.latitude - center.latitude)).abs() < 1e-12);
        assert!((center.longitude - bbox.min.longitude - (bbox.max.longitude - center.longitude)).abs() < 1e-12);

        // 5 km of latitude is just under 0.045 degrees.
        let lat_delta = bbox.max.latitude - center.latitude;
        assert!((lat_delta - 5.0 / KM_PER_DEGREE).abs() < 1e-12);

        // Away from the equator the longitude delta must be wider than the
        // latitude delta.
        let lng_delta = bbox.max.longitude - center.longitude;
        assert!(lng_delta > lat_delta);
    }

    #[test]
    fn bounding_box_longitude_widens_toward_poles() {
        let at_60 = bounding_box(point(60.0, 0.0), 10.0);
        let at_0 = bounding_box(point(0.0, 0.0), 10.0);

        let width_60 = at_60.max.longitude - at_60.min.longitude;
        let width_0 = at_0.max.longitude - at_0.min.longitude;

        // cos(60°) = 0.5, so the box is twice as wide in degrees.
        assert!((width_60 / width_0 - 2.0).abs() < 1e-9);
    }

    #[test]
    fn round_km_one_decimal() {
        assert_eq!(round_km(2.14), 2.1);
        assert_eq!(round_km(2.15), 2.2);
        assert_eq!(round_km(0.0), 0.0);
        assert_eq!(round_km(10.04), 10.0);
    }
}
