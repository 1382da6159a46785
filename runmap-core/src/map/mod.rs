//! Map widget orchestration: markers, the route polyline and viewport
//! requests.

mod controller;
pub mod provider;
mod reconcile;

pub use controller::{
    MapEvent, MapStatus, MapViewConfig, MapViewController, RouteTicket, SelectionOutcome,
};
pub use provider::{
    MapProvider, MapStyle, MarkerHandle, MarkerKind, MarkerSpec, PolylineHandle, ProviderEvent,
};
