//! Proximity search and map interaction core.
//!
//! Finds places (cafés, running courses) around a runner, resolves walking
//! routes with a synthetic fallback, keeps a map widget's markers in sync
//! with the current result set, and drives the draggable bottom sheet that
//! lists those places.

pub mod algo;
pub mod error;
pub mod listing;
pub mod loading;
pub mod location;
pub mod map;
pub mod model;
pub mod prelude;
pub mod routing;
pub mod sheet;
pub mod source;

pub use error::Error;
pub use model::{GeoPoint, Place, PlaceKind, RoutePath, RouteSource};

/// Identifier of a place record, as issued by the data boundary
pub type PlaceId = String;

/// Mean Earth radius used by every distance computation
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Assumed walking pace of 5 km/h
pub const WALKING_MINUTES_PER_KM: f64 = 12.0;

/// Substituted when the device location cannot be read (Seoul City Hall)
pub const DEFAULT_LOCATION: GeoPoint = GeoPoint::from_degrees_unchecked(37.5665, 126.9780);
