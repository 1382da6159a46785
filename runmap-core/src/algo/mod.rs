//! Geospatial computations: great-circle distance, radius filtering and
//! prefilter boxes.

pub mod bounds;
mod distance;
pub mod proximity;

pub use bounds::candidate_boxes;
pub use distance::{distance_km, walking_minutes};
pub use proximity::{NearbyPlace, ProximityResult, filter_within_radius};
