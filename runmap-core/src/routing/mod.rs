//! Walking route resolution with a guaranteed drawable result.

pub mod directions;
pub mod fallback;
mod resolver;

pub use directions::{DirectionsProvider, DirectionsRoute, NoDirections, TravelProfile};
pub use fallback::{MAX_FALLBACK_SAMPLES, fallback_route};
pub use resolver::{RouteResolver, RouteResolverConfig};
