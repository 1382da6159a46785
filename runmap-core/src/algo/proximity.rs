//! Radius filtering of place candidates around an origin.

use serde::Serialize;

use super::distance_km;
use crate::{GeoPoint, Place};

/// A place within the search radius, with its distance from the origin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyPlace {
    #[serde(flatten)]
    pub place: Place,
    pub distance_km: f64,
}

/// Places within a radius, nearest first
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProximityResult {
    entries: Vec<NearbyPlace>,
}

impl ProximityResult {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[NearbyPlace] {
        &self.entries
    }

    pub fn places(&self) -> impl Iterator<Item = &Place> {
        self.entries.iter().map(|entry| &entry.place)
    }

    pub fn find(&self, id: &str) -> Option<&NearbyPlace> {
        self.entries.iter().find(|entry| entry.place.id == id)
    }

    pub fn into_entries(self) -> Vec<NearbyPlace> {
        self.entries
    }
}

/// Returns the places within `radius_km` of `origin`, sorted by ascending
/// distance. Equal distances keep their input order.
///
/// A non-positive or NaN radius yields an empty result.
pub fn filter_within_radius(origin: GeoPoint, radius_km: f64, places: &[Place]) -> ProximityResult {
    if radius_km.is_nan() || radius_km <= 0.0 {
        return ProximityResult::default();
    }

    let mut entries: Vec<NearbyPlace> = places
        .iter()
        .filter_map(|place| {
            let distance = distance_km(origin, place.coordinates);
            (distance <= radius_km).then(|| NearbyPlace {
                place: place.clone(),
                distance_km: distance,
            })
        })
        .collect();

    // sort_by is stable
    entries.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

    log::trace!(
        "{} of {} places within {radius_km} km",
        entries.len(),
        places.len()
    );

    ProximityResult { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EARTH_RADIUS_KM, PlaceKind};

    const ORIGIN: (f64, f64) = (37.5665, 126.9780);

    fn origin() -> GeoPoint {
        GeoPoint::new(ORIGIN.0, ORIGIN.1).unwrap()
    }

    /// Point due north of the origin at the given distance
    fn north_of_origin(km: f64) -> GeoPoint {
        let dlat = (km / EARTH_RADIUS_KM).to_degrees();
        GeoPoint::new(ORIGIN.0 + dlat, ORIGIN.1).unwrap()
    }

    fn place(id: &str, at: GeoPoint) -> Place {
        Place::new(id, format!("Place {id}"), at, PlaceKind::Cafe)
    }

    #[test]
    fn keeps_places_inside_radius_in_distance_order() {
        let places = vec![
            place("far", north_of_origin(10.0)),
            place("edge-out", north_of_origin(3.1)),
            place("edge-in", north_of_origin(2.9)),
            place("near", north_of_origin(0.5)),
        ];

        let result = filter_within_radius(origin(), 3.0, &places);
        let ids: Vec<&str> = result.places().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "edge-in"]);
        assert!((result.entries()[0].distance_km - 0.5).abs() < 1e-6);
    }

    #[test]
    fn equal_distances_keep_input_order() {
        let at = north_of_origin(1.0);
        let places = vec![
            place("b", at),
            place("z", north_of_origin(0.2)),
            place("a", at),
            place("c", at),
        ];

        let result = filter_within_radius(origin(), 5.0, &places);
        let ids: Vec<&str> = result.places().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "b", "a", "c"]);
    }

    #[test]
    fn non_positive_radius_is_empty() {
        let places = vec![place("here", origin())];
        assert!(filter_within_radius(origin(), 0.0, &places).is_empty());
        assert!(filter_within_radius(origin(), -1.0, &places).is_empty());
        assert!(filter_within_radius(origin(), f64::NAN, &places).is_empty());
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(filter_within_radius(origin(), 3.0, &[]).is_empty());
    }

    #[test]
    fn every_entry_is_within_radius_and_sorted() {
        let places: Vec<Place> = (0..50)
            .map(|i| place(&i.to_string(), north_of_origin(f64::from(i % 17) * 0.4)))
            .collect();

        let result = filter_within_radius(origin(), 4.0, &places);
        assert!(!result.is_empty());
        assert!(result.entries().iter().all(|e| e.distance_km <= 4.0));
        assert!(
            result
                .entries()
                .windows(2)
                .all(|w| w[0].distance_km <= w[1].distance_km)
        );
    }

    #[test]
    fn serializes_distance_next_to_place_fields() {
        let places = vec![place("near", north_of_origin(0.5))];
        let result = filter_within_radius(origin(), 1.0, &places);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json[0]["id"], "near");
        assert!(json[0]["distance_km"].as_f64().unwrap() > 0.49);
    }
}
