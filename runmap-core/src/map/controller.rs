use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use hashbrown::HashMap;
use log::{debug, info, warn};
use serde::Serialize;
use tokio::sync::{Mutex, broadcast};
use tokio::time::Instant;

use super::provider::{
    MapProvider, MapStyle, MarkerHandle, MarkerKind, MarkerSpec, PolylineHandle, ProviderEvent,
};
use super::reconcile::{self, PlacedMarker};
use crate::routing::RouteResolver;
use crate::{GeoPoint, Place, PlaceId, RoutePath, RouteSource};

#[derive(Debug, Clone)]
pub struct MapViewConfig {
    /// How long to wait for the widget before reporting it unavailable
    pub ready_timeout: Duration,
    pub ready_poll_interval: Duration,
    /// Padding around a route when fitting the viewport to it
    pub fit_padding_px: u32,
    pub min_zoom: u8,
    pub max_zoom: u8,
    /// Zoom used when a route collapses to a single point
    pub route_zoom_fallback: u8,
    pub event_capacity: usize,
}

impl Default for MapViewConfig {
    fn default() -> Self {
        Self {
            ready_timeout: Duration::from_secs(5),
            ready_poll_interval: Duration::from_millis(100),
            fit_padding_px: 48,
            min_zoom: 1,
            max_zoom: 21,
            route_zoom_fallback: 16,
            event_capacity: 64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MapStatus {
    /// Waiting for the widget; calls are buffered
    Loading,
    Ready,
    /// The widget never became ready within the bound
    Unavailable,
}

/// Notifications forwarded to the screen
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    StatusChanged(MapStatus),
    ZoomChanged(u8),
    StyleChanged(MapStyle),
    PlaceClicked(PlaceId),
    RouteDrawn { place_id: PlaceId, source: RouteSource },
    RouteCleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The route is on the map
    Drawn,
    /// The route is kept and drawn once the map becomes ready
    Deferred,
    /// A newer selection or a clear happened while resolving; result dropped
    Superseded,
}

struct MapState<M> {
    provider: M,
    status: MapStatus,
    user_location: Option<GeoPoint>,
    self_marker: Option<MarkerHandle>,
    places: Vec<Place>,
    markers: HashMap<PlaceId, PlacedMarker>,
    selected: Option<Place>,
    current_route: Option<RoutePath>,
    polyline: Option<PolylineHandle>,
    style: MapStyle,
    zoom: Option<u8>,
    pending_zoom: Option<u8>,
    pending_style: Option<MapStyle>,
    pending_center: Option<GeoPoint>,
}

/// Owns the map widget handle and keeps markers and the route polyline in
/// sync with the current places, location and selection.
pub struct MapViewController<M: MapProvider> {
    state: Mutex<MapState<M>>,
    /// Bumped by every selection and clear; a resolved route is only drawn
    /// if the ticket it was issued with is still current.
    route_token: AtomicU64,
    resolver: RouteResolver,
    config: MapViewConfig,
    events: broadcast::Sender<MapEvent>,
}

/// Position of one route request in selection order. See
/// [`MapViewController::issue_route_ticket`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteTicket(u64);

impl<M: MapProvider> MapViewController<M> {
    pub fn new(provider: M, resolver: RouteResolver, config: MapViewConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            state: Mutex::new(MapState {
                provider,
                status: MapStatus::Loading,
                user_location: None,
                self_marker: None,
                places: Vec::new(),
                markers: HashMap::new(),
                selected: None,
                current_route: None,
                polyline: None,
                style: MapStyle::default(),
                zoom: None,
                pending_zoom: None,
                pending_style: None,
                pending_center: None,
            }),
            route_token: AtomicU64::new(0),
            resolver,
            config,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MapEvent> {
        self.events.subscribe()
    }

    pub fn config(&self) -> &MapViewConfig {
        &self.config
    }

    pub async fn status(&self) -> MapStatus {
        self.state.lock().await.status
    }

    pub async fn selected(&self) -> Option<Place> {
        self.state.lock().await.selected.clone()
    }

    pub async fn current_route(&self) -> Option<RoutePath> {
        self.state.lock().await.current_route.clone()
    }

    /// Number of place markers on the map (the self marker excluded)
    pub async fn marker_count(&self) -> usize {
        self.state.lock().await.markers.len()
    }

    /// Last zoom level reported by the widget
    pub async fn zoom(&self) -> Option<u8> {
        self.state.lock().await.zoom
    }

    pub async fn style(&self) -> MapStyle {
        self.state.lock().await.style
    }

    /// Last runner position given to [`Self::set_user_location`]
    pub async fn user_location(&self) -> Option<GeoPoint> {
        self.state.lock().await.user_location
    }

    /// Read access to the widget, for hosts that need to query it directly
    pub async fn with_provider<R>(&self, f: impl FnOnce(&M) -> R) -> R {
        f(&self.state.lock().await.provider)
    }

    /// Moves (or creates) the runner's own marker.
    pub async fn set_user_location(&self, location: GeoPoint) {
        let mut state = self.state.lock().await;
        state.user_location = Some(location);
        if state.status == MapStatus::Ready {
            state.sync_self_marker();
        }
    }

    /// Replaces the set of place markers, touching only what changed.
    pub async fn set_places(&self, places: Vec<Place>) {
        let mut state = self.state.lock().await;
        state.places = places;
        if state.status == MapStatus::Ready {
            state.reconcile_markers();
        }
    }

    /// Selects `place` and draws the walking route to it from `origin`.
    ///
    /// Any previous route is cleared first. If another selection or a clear
    /// happens while the route is resolving, this result is discarded.
    pub async fn select_place(&self, place: &Place, origin: GeoPoint) -> SelectionOutcome {
        let ticket = self.issue_route_ticket();
        self.select_place_with_ticket(ticket, place, origin).await
    }

    /// Takes a place in the selection order without awaiting anything.
    ///
    /// Hosts that run [`Self::select_place_with_ticket`] on a spawned task
    /// take the ticket first, so the order of requests decides which route
    /// wins regardless of how the tasks are scheduled. Every ticket issued
    /// earlier becomes stale.
    pub fn issue_route_ticket(&self) -> RouteTicket {
        RouteTicket(self.route_token.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// [`Self::select_place`] with a ticket taken beforehand. A ticket that
    /// is already stale changes nothing.
    pub async fn select_place_with_ticket(
        &self,
        ticket: RouteTicket,
        place: &Place,
        origin: GeoPoint,
    ) -> SelectionOutcome {
        {
            let mut state = self.state.lock().await;
            if !self.is_current(ticket) {
                debug!("Selection of {} superseded before it started", place.id);
                return SelectionOutcome::Superseded;
            }
            state.selected = Some(place.clone());
            if state.remove_route() {
                self.publish(MapEvent::RouteCleared);
            }
        }

        let path = self
            .resolver
            .resolve_walking_route(origin, place.coordinates)
            .await;

        let mut state = self.state.lock().await;
        if !self.is_current(ticket) {
            debug!("Discarding stale route to {}", place.id);
            return SelectionOutcome::Superseded;
        }

        let source = path.source;
        state.current_route = Some(path);
        if state.status != MapStatus::Ready {
            return SelectionOutcome::Deferred;
        }

        state.draw_route(&self.config);
        self.publish(MapEvent::RouteDrawn {
            place_id: place.id.clone(),
            source,
        });
        SelectionOutcome::Drawn
    }

    /// Removes the route and the selection. Safe to call repeatedly.
    pub async fn clear_route(&self) {
        let mut state = self.state.lock().await;
        self.issue_route_ticket();
        state.selected = None;
        if state.remove_route() {
            self.publish(MapEvent::RouteCleared);
        }
    }

    /// Makes every in-flight route resolution stale without touching what
    /// is drawn. Used when the screen goes away.
    pub fn abandon_routes(&self) {
        self.issue_route_ticket();
    }

    pub async fn set_zoom(&self, zoom: u8) {
        let (min, max) = (self.config.min_zoom, self.config.max_zoom);
        let zoom = zoom.clamp(min.min(max), min.max(max));
        let mut state = self.state.lock().await;
        if state.status == MapStatus::Ready {
            if let Err(e) = state.provider.set_zoom(zoom) {
                warn!("Failed to set zoom {zoom}: {e}");
            }
        } else {
            state.pending_zoom = Some(zoom);
        }
    }

    pub async fn center_on(&self, center: GeoPoint) {
        let mut state = self.state.lock().await;
        if state.status == MapStatus::Ready {
            if let Err(e) = state.provider.set_center(center) {
                warn!("Failed to center map: {e}");
            }
        } else {
            state.pending_center = Some(center);
        }
    }

    /// Switches to the next map style and returns it.
    pub async fn cycle_map_style(&self) -> MapStyle {
        let mut state = self.state.lock().await;
        let next = state.style.next();
        state.style = next;
        if state.status == MapStatus::Ready {
            if let Err(e) = state.provider.set_style(next) {
                warn!("Failed to switch map style to {next:?}: {e}");
            }
        } else {
            state.pending_style = Some(next);
        }
        next
    }

    /// Feeds a widget event into the controller and forwards it outward.
    pub async fn handle_provider_event(&self, event: ProviderEvent) {
        let mut state = self.state.lock().await;
        match event {
            ProviderEvent::Ready => self.mark_ready(&mut state),
            ProviderEvent::ZoomChanged(zoom) => {
                state.zoom = Some(zoom);
                self.publish(MapEvent::ZoomChanged(zoom));
            }
            ProviderEvent::StyleChanged(style) => {
                state.style = style;
                self.publish(MapEvent::StyleChanged(style));
            }
            ProviderEvent::MarkerClicked(handle) => {
                let clicked = state
                    .markers
                    .iter()
                    .find(|(_, marker)| marker.handle == handle)
                    .map(|(id, _)| id.clone());
                match clicked {
                    Some(id) => self.publish(MapEvent::PlaceClicked(id)),
                    None => debug!("Click on unknown marker {handle:?}"),
                }
            }
        }
    }

    /// Polls the widget until it is ready or the bound is exceeded.
    ///
    /// Exceeding the bound sets [`MapStatus::Unavailable`]; nothing is thrown.
    pub async fn wait_until_ready(&self) -> MapStatus {
        let deadline = Instant::now() + self.config.ready_timeout;
        loop {
            {
                let mut state = self.state.lock().await;
                if state.status == MapStatus::Ready {
                    return MapStatus::Ready;
                }
                if state.provider.is_ready() {
                    self.mark_ready(&mut state);
                    return MapStatus::Ready;
                }
            }
            if Instant::now() >= deadline {
                break;
            }
            tokio::time::sleep(self.config.ready_poll_interval).await;
        }

        let mut state = self.state.lock().await;
        if state.status == MapStatus::Ready {
            return MapStatus::Ready;
        }
        warn!(
            "Map provider not ready after {:?} - marking unavailable",
            self.config.ready_timeout
        );
        state.status = MapStatus::Unavailable;
        self.publish(MapEvent::StatusChanged(MapStatus::Unavailable));
        MapStatus::Unavailable
    }

    /// Re-arms the readiness wait after the map was reported unavailable.
    pub async fn retry_ready(&self) -> MapStatus {
        {
            let mut state = self.state.lock().await;
            if state.status == MapStatus::Unavailable {
                state.status = MapStatus::Loading;
                self.publish(MapEvent::StatusChanged(MapStatus::Loading));
            }
        }
        self.wait_until_ready().await
    }

    fn is_current(&self, ticket: RouteTicket) -> bool {
        self.route_token.load(Ordering::SeqCst) == ticket.0
    }

    fn mark_ready(&self, state: &mut MapState<M>) {
        if state.status == MapStatus::Ready {
            return;
        }
        info!("Map provider ready");
        state.status = MapStatus::Ready;
        state.flush_pending();
        state.sync_self_marker();
        state.reconcile_markers();
        if state.current_route.is_some() {
            state.draw_route(&self.config);
        }
        self.publish(MapEvent::StatusChanged(MapStatus::Ready));
    }

    fn publish(&self, event: MapEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }
}

impl<M: MapProvider> MapState<M> {
    fn flush_pending(&mut self) {
        if let Some(style) = self.pending_style.take()
            && let Err(e) = self.provider.set_style(style)
        {
            warn!("Failed to apply buffered map style: {e}");
        }
        if let Some(center) = self.pending_center.take()
            && let Err(e) = self.provider.set_center(center)
        {
            warn!("Failed to apply buffered map center: {e}");
        }
        if let Some(zoom) = self.pending_zoom.take()
            && let Err(e) = self.provider.set_zoom(zoom)
        {
            warn!("Failed to apply buffered zoom: {e}");
        }
    }

    fn sync_self_marker(&mut self) {
        let Some(location) = self.user_location else {
            return;
        };
        let spec = MarkerSpec {
            kind: MarkerKind::CurrentLocation,
            position: location,
            label: String::new(),
        };
        match self.self_marker {
            Some(handle) => {
                if let Err(e) = self.provider.update_marker(handle, &spec) {
                    warn!("Failed to move location marker: {e}");
                }
            }
            None => match self.provider.create_marker(&spec) {
                Ok(handle) => self.self_marker = Some(handle),
                Err(e) => warn!("Failed to create location marker: {e}"),
            },
        }
    }

    fn reconcile_markers(&mut self) {
        let MapState {
            provider,
            markers,
            places,
            ..
        } = self;
        let plan = reconcile::plan(markers, places);

        for id in &plan.remove {
            if let Some(marker) = markers.remove(id)
                && let Err(e) = provider.remove_marker(marker.handle)
            {
                warn!("Failed to remove marker for {id}: {e}");
            }
        }
        for (place, spec) in &plan.update {
            if let Some(marker) = markers.get_mut(&place.id) {
                match provider.update_marker(marker.handle, spec) {
                    Ok(()) => marker.spec = spec.clone(),
                    Err(e) => warn!("Failed to update marker for {}: {e}", place.id),
                }
            }
        }
        for (place, spec) in plan.create {
            match provider.create_marker(&spec) {
                Ok(handle) => {
                    markers.insert(place.id.clone(), PlacedMarker { handle, spec });
                }
                Err(e) => warn!("Failed to create marker for {}: {e}", place.id),
            }
        }

        debug!(
            "Markers reconciled: {} removed, {} updated, {} unchanged, {} total",
            plan.remove.len(),
            plan.update.len(),
            plan.unchanged,
            markers.len()
        );
    }

    /// Drops the route and its polyline. Returns whether there was one.
    fn remove_route(&mut self) -> bool {
        let had_route = self.current_route.take().is_some();
        if self.polyline.take().is_some()
            && let Err(e) = self.provider.clear_polylines()
        {
            warn!("Failed to clear route polyline: {e}");
        }
        had_route
    }

    fn draw_route(&mut self, config: &MapViewConfig) {
        let Some(route) = &self.current_route else {
            return;
        };

        if let Err(e) = self.provider.clear_polylines() {
            warn!("Failed to clear previous polylines: {e}");
        }
        match self.provider.draw_polyline(route.points()) {
            Ok(handle) => self.polyline = Some(handle),
            Err(e) => {
                warn!("Failed to draw route polyline: {e}");
                return;
            }
        }

        let viewport = match route.bounds() {
            Some(bounds) if bounds.width() > 0.0 || bounds.height() > 0.0 => self
                .provider
                .fit_bounds(bounds, config.fit_padding_px),
            _ => self
                .provider
                .set_center(route.start())
                .and_then(|()| self.provider.set_zoom(config.route_zoom_fallback)),
        };
        if let Err(e) = viewport {
            warn!("Failed to move viewport to route: {e}");
        }
    }
}
