//! Value types shared by every component: coordinates, places and routes.

mod place;
mod point;
mod route;

pub use place::{Place, PlaceKind};
pub use point::GeoPoint;
pub use route::{RoutePath, RouteSource};
