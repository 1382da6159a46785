//! Coarse candidate boxes for data-access prefilters.
//!
//! Storage queries narrow the candidate set with a lat/lng box before the
//! precise haversine filter runs. The box must never exclude a place the
//! precise filter would keep.

use geo::{Coord, Rect};

use crate::{EARTH_RADIUS_KM, GeoPoint};

/// Boxes (lng = x, lat = y) containing every point within `radius_km` of
/// `origin`. Two boxes are returned when the area crosses the antimeridian.
pub fn candidate_boxes(origin: GeoPoint, radius_km: f64) -> Vec<Rect<f64>> {
    if radius_km.is_nan() || radius_km <= 0.0 {
        return Vec::new();
    }

    let angular = radius_km / EARTH_RADIUS_KM;
    let lat = origin.lat().to_radians();
    let min_lat = (lat - angular).to_degrees();
    let max_lat = (lat + angular).to_degrees();

    // The circle reaches a pole: every longitude is a candidate.
    if min_lat <= -90.0 || max_lat >= 90.0 {
        return vec![Rect::new(
            Coord { x: -180.0, y: min_lat.max(-90.0) },
            Coord { x: 180.0, y: max_lat.min(90.0) },
        )];
    }

    let ratio = angular.sin() / lat.cos();
    if ratio >= 1.0 {
        return vec![Rect::new(
            Coord { x: -180.0, y: min_lat },
            Coord { x: 180.0, y: max_lat },
        )];
    }
    let dlng = ratio.asin().to_degrees();
    let min_lng = origin.lng() - dlng;
    let max_lng = origin.lng() + dlng;

    if min_lng < -180.0 {
        vec![
            Rect::new(Coord { x: min_lng + 360.0, y: min_lat }, Coord { x: 180.0, y: max_lat }),
            Rect::new(Coord { x: -180.0, y: min_lat }, Coord { x: max_lng, y: max_lat }),
        ]
    } else if max_lng > 180.0 {
        vec![
            Rect::new(Coord { x: min_lng, y: min_lat }, Coord { x: 180.0, y: max_lat }),
            Rect::new(Coord { x: -180.0, y: min_lat }, Coord { x: max_lng - 360.0, y: max_lat }),
        ]
    } else {
        vec![Rect::new(
            Coord { x: min_lng, y: min_lat },
            Coord { x: max_lng, y: max_lat },
        )]
    }
}
