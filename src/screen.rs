use std::sync::Arc;

use log::{debug, info, warn};
use runmap_core::prelude::*;
use tokio::task::JoinHandle;

use crate::config::ScreenConfig;

/// The place-finder screen: map, draggable sheet and place list driven by
/// one runner position.
///
/// The map controller is shared with the position watch task; everything
/// else is owned by the screen.
pub struct MapScreen<M: MapProvider + 'static> {
    map: Arc<MapViewController<M>>,
    sheet: SheetController,
    list: PlaceListPresenter,
    location: Arc<dyn LocationProvider>,
    places: Arc<dyn PlaceDataSource>,
    config: ScreenConfig,
    origin: GeoPoint,
    notice: Option<LocationNotice>,
    nearby: ProximityResult,
    saved: Vec<Place>,
    watch_task: Option<JoinHandle<()>>,
}

impl<M: MapProvider + 'static> MapScreen<M> {
    pub fn new(
        provider: M,
        resolver: RouteResolver,
        location: Arc<dyn LocationProvider>,
        places: Arc<dyn PlaceDataSource>,
        config: ScreenConfig,
    ) -> Self {
        let map = MapViewController::new(provider, resolver, config.map.clone());
        let sheet = SheetController::with_level(config.initial_sheet_level, config.sheet.clone());
        Self {
            map: Arc::new(map),
            sheet,
            list: PlaceListPresenter::default(),
            location,
            places,
            origin: config.default_location,
            notice: None,
            nearby: ProximityResult::default(),
            saved: Vec::new(),
            watch_task: None,
            config,
        }
    }

    /// Opens the screen.
    ///
    /// Locates the runner (falling back to the default coordinate), loads the
    /// places around them, waits for the map and starts following the
    /// device position. Never fails: a broken data source leaves the list
    /// empty and a slow map ends up [`MapStatus::Unavailable`].
    pub async fn enter(&mut self) -> MapStatus {
        let located = locate_or_default(self.location.as_ref(), self.config.default_location).await;
        self.origin = located.point;
        self.notice = located.notice;

        self.map.set_user_location(self.origin).await;
        self.map.center_on(self.origin).await;

        if let Err(e) = self.refresh_places().await {
            warn!("Failed to load nearby places: {e}");
        }

        let status = self.map.wait_until_ready().await;
        if self.config.watch_position {
            self.start_watch().await;
        }
        info!(
            "Map screen open at ({:.5}, {:.5}) with {} nearby places, map {:?}",
            self.origin.lat(),
            self.origin.lng(),
            self.nearby.len(),
            status
        );
        status
    }

    /// Re-reads places around the current origin and hands them to the map.
    ///
    /// # Errors
    ///
    /// Returns the data source error. The previous result is kept in that case.
    pub async fn refresh_places(&mut self) -> Result<usize, Error> {
        let candidates = self
            .places
            .list_nearby(self.origin, self.config.radius_km)
            .await?;
        self.nearby = filter_within_radius(self.origin, self.config.radius_km, &candidates);
        self.map
            .set_places(self.nearby.places().cloned().collect())
            .await;
        debug!(
            "{} of {} candidates within {} km",
            self.nearby.len(),
            candidates.len(),
            self.config.radius_km
        );
        Ok(self.nearby.len())
    }

    /// Moves the search origin and reloads the nearby places.
    ///
    /// # Errors
    ///
    /// Same as [`MapScreen::refresh_places`]
    pub async fn set_origin(&mut self, origin: GeoPoint) -> Result<usize, Error> {
        self.origin = origin;
        self.map.set_user_location(origin).await;
        self.refresh_places().await
    }

    async fn start_watch(&mut self) {
        if self.watch_task.is_some() {
            return;
        }
        match self.location.watch_position().await {
            Ok(mut watch) => {
                let map = Arc::clone(&self.map);
                self.watch_task = Some(tokio::spawn(async move {
                    while let Some(position) = watch.next().await {
                        map.set_user_location(position).await;
                    }
                    debug!("Position watch ended");
                }));
            }
            Err(e) => debug!("Not following the device position: {e}"),
        }
    }

    pub fn origin(&self) -> GeoPoint {
        self.origin
    }

    /// Set when the default coordinate had to be used
    pub fn notice(&self) -> Option<LocationNotice> {
        self.notice
    }

    pub fn nearby(&self) -> &ProximityResult {
        &self.nearby
    }

    pub fn map(&self) -> &Arc<MapViewController<M>> {
        &self.map
    }

    pub fn sheet(&self) -> &SheetController {
        &self.sheet
    }

    pub fn list(&self) -> &PlaceListPresenter {
        &self.list
    }

    pub fn set_saved(&mut self, saved: Vec<Place>) {
        self.saved = saved;
    }

    pub fn set_tab(&mut self, tab: ListTab) {
        self.list.set_tab(tab);
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.list.set_query(query);
    }

    /// Every place matching the current tab and query
    pub fn list_places(&self) -> Vec<&Place> {
        self.list.visible_places(&self.nearby, &self.saved)
    }

    /// The places that fit in the sheet at its current level
    pub fn visible_places(&self, viewport_px: f64, row_px: f64) -> Vec<&Place> {
        let mut places = self.list_places();
        places.truncate(self.sheet.visible_rows(viewport_px, row_px));
        places
    }

    fn find_place(&self, id: &str) -> Option<&Place> {
        self.nearby
            .find(id)
            .map(|entry| &entry.place)
            .or_else(|| self.saved.iter().find(|place| place.id == id))
    }

    /// Selects a listed place and starts drawing the route to it.
    ///
    /// The route is resolved on its own task starting from the latest
    /// watched position, so the sheet stays draggable meanwhile. The handle
    /// yields the outcome. Returns `None` when no nearby or saved place has
    /// `id`.
    pub fn select_place(&self, id: &str) -> Option<JoinHandle<SelectionOutcome>> {
        let Some(place) = self.find_place(id).cloned() else {
            warn!("Selected unknown place {id}");
            return None;
        };
        let ticket = self.map.issue_route_ticket();
        let map = Arc::clone(&self.map);
        let fallback = self.origin;
        Some(tokio::spawn(async move {
            let origin = map.user_location().await.unwrap_or(fallback);
            map.select_place_with_ticket(ticket, &place, origin).await
        }))
    }

    /// Reacts to an event published by the map controller.
    pub fn handle_map_event(&self, event: &MapEvent) -> Option<JoinHandle<SelectionOutcome>> {
        match event {
            MapEvent::PlaceClicked(id) => self.select_place(id),
            _ => None,
        }
    }

    pub async fn clear_route(&self) {
        self.map.clear_route().await;
    }

    pub fn begin_drag(&mut self, pointer_y: f64) {
        self.sheet.begin_drag(pointer_y);
    }

    pub fn drag_to(&mut self, pointer_y: f64) -> Option<SheetLevel> {
        self.sheet.drag_to(pointer_y)
    }

    pub fn end_drag(&mut self) -> SheetLevel {
        self.sheet.end_drag()
    }

    pub fn tap_backdrop(&mut self) -> bool {
        self.sheet.tap_backdrop()
    }

    pub fn set_sheet_level(&mut self, level: SheetLevel) {
        self.sheet.set_level(level);
    }

    /// Closes the screen: stops the position watch and drops any route
    /// still resolving. Can be called more than once.
    pub async fn leave(&mut self) {
        self.stop_watch();
        self.map.abandon_routes();
        info!("Map screen closed");
    }

    fn stop_watch(&mut self) {
        if let Some(task) = self.watch_task.take() {
            task.abort();
        }
    }
}

impl<M: MapProvider + 'static> Drop for MapScreen<M> {
    fn drop(&mut self) {
        self.stop_watch();
        self.map.abandon_routes();
    }
}
