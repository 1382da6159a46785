//! Contract with the map widget.

use geo::Rect;
use serde::{Deserialize, Serialize};

use crate::{Error, GeoPoint, PlaceKind};

/// Opaque handle of a marker created by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub u64);

/// Opaque handle of a drawn polyline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PolylineHandle(pub u64);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapStyle {
    #[default]
    Normal,
    Satellite,
    Hybrid,
}

impl MapStyle {
    /// normal → satellite → hybrid → normal
    pub fn next(self) -> Self {
        match self {
            MapStyle::Normal => MapStyle::Satellite,
            MapStyle::Satellite => MapStyle::Hybrid,
            MapStyle::Hybrid => MapStyle::Normal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// The runner's own position
    CurrentLocation,
    Place(PlaceKind),
}

/// Everything the provider needs to render one marker
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub kind: MarkerKind,
    pub position: GeoPoint,
    pub label: String,
}

/// Events raised by the map widget
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderEvent {
    Ready,
    ZoomChanged(u8),
    StyleChanged(MapStyle),
    MarkerClicked(MarkerHandle),
}

/// A third-party map widget.
///
/// Calls are only issued once the widget reports ready; failures are logged
/// by the caller and never abort a screen.
pub trait MapProvider: Send {
    fn is_ready(&self) -> bool;

    fn create_marker(&mut self, marker: &MarkerSpec) -> Result<MarkerHandle, Error>;

    fn update_marker(&mut self, handle: MarkerHandle, marker: &MarkerSpec) -> Result<(), Error>;

    fn remove_marker(&mut self, handle: MarkerHandle) -> Result<(), Error>;

    fn draw_polyline(&mut self, path: &[GeoPoint]) -> Result<PolylineHandle, Error>;

    fn clear_polylines(&mut self) -> Result<(), Error>;

    fn set_center(&mut self, center: GeoPoint) -> Result<(), Error>;

    fn set_zoom(&mut self, zoom: u8) -> Result<(), Error>;

    fn set_style(&mut self, style: MapStyle) -> Result<(), Error>;

    /// `bounds` is in lng (x) / lat (y) degrees
    fn fit_bounds(&mut self, bounds: Rect<f64>, padding_px: u32) -> Result<(), Error>;
}
