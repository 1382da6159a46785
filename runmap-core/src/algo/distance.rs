use crate::{EARTH_RADIUS_KM, GeoPoint};

/// Haversine great-circle distance in kilometres.
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let dlat = (b.lat() - a.lat()).to_radians();
    let dlng = (b.lng() - a.lng()).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlng = (dlng / 2.0).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlng * sin_dlng;
    // rounding can push h a hair above 1 for antipodal points
    2.0 * EARTH_RADIUS_KM * h.min(1.0).sqrt().asin()
}

/// Straight-line walking time at 5 km/h, rounded up to whole minutes.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn walking_minutes(distance_km: f64) -> u32 {
    (distance_km.max(0.0) * crate::WALKING_MINUTES_PER_KM).ceil() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng).unwrap()
    }

    #[test]
    fn zero_for_identical_points() {
        for p in [pt(0.0, 0.0), pt(37.5665, 126.978), pt(-89.9, 179.9)] {
            assert!(distance_km(p, p).abs() < 1e-9);
        }
    }

    #[test]
    fn symmetric() {
        let a = pt(37.5665, 126.978);
        let b = pt(35.1796, 129.0756);
        assert_eq!(distance_km(a, b), distance_km(b, a));
    }

    #[test]
    fn seoul_to_busan() {
        let d = distance_km(pt(37.5665, 126.978), pt(35.1796, 129.0756));
        assert!((d - 325.0).abs() < 5.0, "got {d}");
    }

    #[test]
    fn antipodal_is_half_circumference() {
        let d = distance_km(pt(0.0, 0.0), pt(0.0, 180.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn triangle_inequality() {
        let points = [
            pt(37.5665, 126.978),
            pt(37.5172, 127.0473),
            pt(37.4979, 127.0276),
            pt(35.1796, 129.0756),
            pt(-33.8688, 151.2093),
        ];
        for &a in &points {
            for &b in &points {
                for &c in &points {
                    assert!(distance_km(a, c) <= distance_km(a, b) + distance_km(b, c) + 1e-9);
                }
            }
        }
    }

    #[test]
    fn walking_minutes_round_up() {
        assert_eq!(walking_minutes(0.0), 0);
        assert_eq!(walking_minutes(1.0), 12);
        assert_eq!(walking_minutes(1.01), 13);
    }
}
