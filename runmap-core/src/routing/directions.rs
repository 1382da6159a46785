use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Error, GeoPoint};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelProfile {
    #[default]
    Walking,
    Driving,
}

/// Route as reported by a directions service, before validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectionsRoute {
    pub points: Vec<GeoPoint>,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

/// Network-backed routing capability
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    async fn route(
        &self,
        start: GeoPoint,
        end: GeoPoint,
        profile: TravelProfile,
    ) -> Result<DirectionsRoute, Error>;
}

/// Provider for setups without a directions service; every route ends up
/// as the synthetic fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDirections;

#[async_trait]
impl DirectionsProvider for NoDirections {
    async fn route(
        &self,
        _start: GeoPoint,
        _end: GeoPoint,
        _profile: TravelProfile,
    ) -> Result<DirectionsRoute, Error> {
        Err(Error::Directions(
            "no directions service configured".to_string(),
        ))
    }
}
