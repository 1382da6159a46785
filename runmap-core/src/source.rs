//! Read boundary for place records.

use async_trait::async_trait;
use hashbrown::HashMap;
use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};

use crate::algo::candidate_boxes;
use crate::{Error, GeoPoint, Place, PlaceId};

/// Where place records come from.
///
/// `list_nearby` may return a coarse candidate set (anything in a bounding
/// box around the radius); callers run the precise radius filter on it.
#[async_trait]
pub trait PlaceDataSource: Send + Sync {
    async fn list_nearby(&self, origin: GeoPoint, radius_km: f64) -> Result<Vec<Place>, Error>;

    async fn get_by_id(&self, id: &str) -> Result<Option<Place>, Error>;
}

type IndexedPlace = GeomWithData<[f64; 2], usize>;

/// Place catalogue held in memory, indexed by an R-tree on lng/lat.
pub struct InMemoryPlaces {
    places: Vec<Place>,
    index: RTree<IndexedPlace>,
    by_id: HashMap<PlaceId, usize>,
}

impl InMemoryPlaces {
    pub fn new(places: Vec<Place>) -> Self {
        let entries = places
            .iter()
            .enumerate()
            .map(|(idx, place)| {
                GeomWithData::new([place.coordinates.lng(), place.coordinates.lat()], idx)
            })
            .collect();

        let mut by_id = HashMap::with_capacity(places.len());
        for (idx, place) in places.iter().enumerate() {
            by_id.entry(place.id.clone()).or_insert(idx);
        }

        Self {
            places,
            index: RTree::bulk_load(entries),
            by_id,
        }
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn all(&self) -> &[Place] {
        &self.places
    }

    pub fn get(&self, id: &str) -> Option<&Place> {
        self.by_id.get(id).map(|&idx| &self.places[idx])
    }

    /// Places inside the candidate boxes of the radius, in catalogue order
    pub fn candidates(&self, origin: GeoPoint, radius_km: f64) -> Vec<&Place> {
        let mut hits: Vec<usize> = candidate_boxes(origin, radius_km)
            .iter()
            .flat_map(|rect| {
                let envelope = AABB::from_corners(
                    [rect.min().x, rect.min().y],
                    [rect.max().x, rect.max().y],
                );
                self.index
                    .locate_in_envelope(&envelope)
                    .map(|entry| entry.data)
                    .collect::<Vec<_>>()
            })
            .collect();
        hits.sort_unstable();
        hits.dedup();
        hits.into_iter().map(|idx| &self.places[idx]).collect()
    }
}

#[async_trait]
impl PlaceDataSource for InMemoryPlaces {
    async fn list_nearby(&self, origin: GeoPoint, radius_km: f64) -> Result<Vec<Place>, Error> {
        Ok(self
            .candidates(origin, radius_km)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Place>, Error> {
        Ok(self.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlaceKind;
    use crate::algo::filter_within_radius;

    fn place(id: &str, lat: f64, lng: f64) -> Place {
        Place::new(id, id, GeoPoint::new(lat, lng).unwrap(), PlaceKind::Cafe)
    }

    fn catalogue() -> InMemoryPlaces {
        InMemoryPlaces::new(vec![
            place("city-hall", 37.5665, 126.9780),
            place("gwanghwamun", 37.5759, 126.9768),
            place("gangnam", 37.4979, 127.0276),
            place("busan", 35.1796, 129.0756),
        ])
    }

    #[test]
    fn candidates_are_a_superset_of_the_radius_result() {
        let places = catalogue();
        let origin = GeoPoint::new(37.5665, 126.9780).unwrap();
        let candidates: Vec<Place> = places.candidates(origin, 3.0).into_iter().cloned().collect();
        let exact = filter_within_radius(origin, 3.0, places.all());

        for nearby in exact.places() {
            assert!(candidates.iter().any(|c| c.id == nearby.id));
        }
        assert!(!candidates.iter().any(|c| c.id == "busan"));
    }

    #[test]
    fn candidates_keep_catalogue_order() {
        let places = catalogue();
        let origin = GeoPoint::new(37.54, 127.0).unwrap();
        let ids: Vec<&str> = places
            .candidates(origin, 20.0)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["city-hall", "gwanghwamun", "gangnam"]);
    }

    #[tokio::test]
    async fn lookup_by_id() {
        let places = catalogue();
        assert_eq!(
            places.get_by_id("gangnam").await.unwrap().map(|p| p.name),
            Some("gangnam".to_string())
        );
        assert!(places.get_by_id("nowhere").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_nearby_without_radius_is_empty() {
        let places = catalogue();
        let origin = GeoPoint::new(37.5665, 126.9780).unwrap();
        assert!(places.list_nearby(origin, 0.0).await.unwrap().is_empty());
    }
}
