#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use geo::Rect;
use runmap::prelude::*;
use tokio::sync::mpsc;

pub const ORIGIN: GeoPoint = DEFAULT_LOCATION;

/// A point `km` kilometres due north of [`ORIGIN`]
pub fn north_of_origin(km: f64) -> GeoPoint {
    let dlat = (km / EARTH_RADIUS_KM).to_degrees();
    GeoPoint::new(ORIGIN.lat() + dlat, ORIGIN.lng()).unwrap()
}

pub fn catalogue() -> Vec<Place> {
    vec![
        Place::new("far", "Far Cafe", north_of_origin(3.1), PlaceKind::Cafe),
        Place::new("hill", "Hill Cafe", north_of_origin(2.9), PlaceKind::Cafe),
        Place::new(
            "river",
            "Riverside Loop",
            north_of_origin(1.2),
            PlaceKind::RunningCourse,
        ),
        Place::new("bean", "Bean Cafe", north_of_origin(0.5), PlaceKind::Cafe),
        Place::new(
            "busan",
            "Busan Cafe",
            GeoPoint::new(35.1796, 129.0756).unwrap(),
            PlaceKind::Cafe,
        ),
    ]
}

#[derive(Default)]
pub struct WidgetState {
    pub ready: bool,
    next_handle: u64,
    pub markers: HashMap<u64, MarkerSpec>,
    pub polylines: usize,
    pub fitted: usize,
    pub center: Option<GeoPoint>,
}

/// Map widget fake that records what the controller asked it to draw
#[derive(Clone, Default)]
pub struct FakeMap(Arc<StdMutex<WidgetState>>);

impl FakeMap {
    pub fn ready() -> Self {
        let map = Self::default();
        map.state().ready = true;
        map
    }

    pub fn state(&self) -> MutexGuard<'_, WidgetState> {
        self.0.lock().unwrap()
    }

    pub fn marker_labeled(&self, label: &str) -> Option<MarkerHandle> {
        self.state()
            .markers
            .iter()
            .find(|(_, spec)| spec.label == label)
            .map(|(handle, _)| MarkerHandle(*handle))
    }

    pub fn self_marker(&self) -> Option<GeoPoint> {
        self.state()
            .markers
            .values()
            .find(|spec| spec.kind == MarkerKind::CurrentLocation)
            .map(|spec| spec.position)
    }
}

impl MapProvider for FakeMap {
    fn is_ready(&self) -> bool {
        self.state().ready
    }

    fn create_marker(&mut self, marker: &MarkerSpec) -> Result<MarkerHandle, Error> {
        let mut state = self.state();
        state.next_handle += 1;
        let handle = state.next_handle;
        state.markers.insert(handle, marker.clone());
        Ok(MarkerHandle(handle))
    }

    fn update_marker(&mut self, handle: MarkerHandle, marker: &MarkerSpec) -> Result<(), Error> {
        self.state().markers.insert(handle.0, marker.clone());
        Ok(())
    }

    fn remove_marker(&mut self, handle: MarkerHandle) -> Result<(), Error> {
        self.state().markers.remove(&handle.0);
        Ok(())
    }

    fn draw_polyline(&mut self, _path: &[GeoPoint]) -> Result<PolylineHandle, Error> {
        let mut state = self.state();
        state.polylines += 1;
        state.next_handle += 1;
        Ok(PolylineHandle(state.next_handle))
    }

    fn clear_polylines(&mut self) -> Result<(), Error> {
        self.state().polylines = 0;
        Ok(())
    }

    fn set_center(&mut self, center: GeoPoint) -> Result<(), Error> {
        self.state().center = Some(center);
        Ok(())
    }

    fn set_zoom(&mut self, _zoom: u8) -> Result<(), Error> {
        Ok(())
    }

    fn set_style(&mut self, _style: MapStyle) -> Result<(), Error> {
        Ok(())
    }

    fn fit_bounds(&mut self, _bounds: Rect<f64>, _padding_px: u32) -> Result<(), Error> {
        self.state().fitted += 1;
        Ok(())
    }
}

/// Location provider with a fixed answer and an optional watch channel
pub struct ScriptedLocation {
    current: Result<GeoPoint, LocationError>,
    watch: StdMutex<Option<mpsc::Receiver<GeoPoint>>>,
}

impl ScriptedLocation {
    pub fn denied() -> Self {
        Self {
            current: Err(LocationError::PermissionDenied),
            watch: StdMutex::new(None),
        }
    }

    pub fn at(point: GeoPoint) -> Self {
        Self {
            current: Ok(point),
            watch: StdMutex::new(None),
        }
    }

    pub fn watching(point: GeoPoint) -> (Self, mpsc::Sender<GeoPoint>) {
        let (tx, rx) = mpsc::channel(8);
        let location = Self {
            current: Ok(point),
            watch: StdMutex::new(Some(rx)),
        };
        (location, tx)
    }
}

#[async_trait]
impl LocationProvider for ScriptedLocation {
    async fn current_position(&self) -> Result<GeoPoint, LocationError> {
        self.current.clone()
    }

    async fn watch_position(&self) -> Result<PositionWatch, LocationError> {
        self.watch
            .lock()
            .unwrap()
            .take()
            .map(PositionWatch::new)
            .ok_or_else(|| LocationError::Unavailable("no watch".to_string()))
    }
}

/// Data source whose backend is down
pub struct BrokenPlaces;

#[async_trait]
impl PlaceDataSource for BrokenPlaces {
    async fn list_nearby(&self, _origin: GeoPoint, _radius_km: f64) -> Result<Vec<Place>, Error> {
        Err(Error::DataSource("connection refused".to_string()))
    }

    async fn get_by_id(&self, _id: &str) -> Result<Option<Place>, Error> {
        Err(Error::DataSource("connection refused".to_string()))
    }
}

/// Directions service that answers with a straight two-point route after
/// the given delay
pub struct SlowDirections(pub Duration);

#[async_trait]
impl DirectionsProvider for SlowDirections {
    async fn route(
        &self,
        start: GeoPoint,
        end: GeoPoint,
        _profile: TravelProfile,
    ) -> Result<DirectionsRoute, Error> {
        tokio::time::sleep(self.0).await;
        Ok(DirectionsRoute {
            points: vec![start, end],
            distance_meters: 500.0,
            duration_seconds: 360.0,
        })
    }
}
