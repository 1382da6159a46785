pub use crate::{DEFAULT_LOCATION, EARTH_RADIUS_KM, WALKING_MINUTES_PER_KM};

// Core value types
pub use crate::Error;
pub use crate::PlaceId;
pub use crate::model::{GeoPoint, Place, PlaceKind, RoutePath, RouteSource};

// Proximity search
pub use crate::algo::{
    NearbyPlace, ProximityResult, candidate_boxes, distance_km, filter_within_radius,
};
pub use crate::listing::{ListTab, PlaceListPresenter, visible_places};

// Routing
pub use crate::routing::{
    DirectionsProvider, DirectionsRoute, NoDirections, RouteResolver, RouteResolverConfig,
    TravelProfile, fallback_route,
};

// Map and sheet
pub use crate::map::{
    MapEvent, MapProvider, MapStatus, MapStyle, MapViewConfig, MapViewController, MarkerHandle,
    MarkerKind, MarkerSpec, PolylineHandle, ProviderEvent, RouteTicket, SelectionOutcome,
};
pub use crate::sheet::{SheetConfig, SheetController, SheetLevel};

// Boundaries
pub use crate::location::{
    FixedLocation, Located, LocationError, LocationNotice, LocationProvider, PositionWatch,
    locate_or_default,
};
pub use crate::source::{InMemoryPlaces, PlaceDataSource};
