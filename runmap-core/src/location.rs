//! Device position boundary and the default-coordinate policy.

use async_trait::async_trait;
use log::warn;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::GeoPoint;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location unavailable: {0}")]
    Unavailable(String),
    #[error("Location request timed out")]
    Timeout,
}

/// Stream of position updates. Dropping it releases the watch.
#[derive(Debug)]
pub struct PositionWatch {
    updates: mpsc::Receiver<GeoPoint>,
}

impl PositionWatch {
    pub fn new(updates: mpsc::Receiver<GeoPoint>) -> Self {
        Self { updates }
    }

    /// Next position, or `None` once the provider stops the watch
    pub async fn next(&mut self) -> Option<GeoPoint> {
        self.updates.recv().await
    }
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<GeoPoint, LocationError>;

    /// Continuous updates. Providers without watch support keep the default.
    async fn watch_position(&self) -> Result<PositionWatch, LocationError> {
        Err(LocationError::Unavailable(
            "position watch not supported".to_string(),
        ))
    }
}

/// Non-blocking notice shown when the default coordinate was substituted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationNotice {
    PermissionDenied,
    Unavailable,
}

impl From<&LocationError> for LocationNotice {
    fn from(error: &LocationError) -> Self {
        match error {
            LocationError::PermissionDenied => LocationNotice::PermissionDenied,
            LocationError::Unavailable(_) | LocationError::Timeout => LocationNotice::Unavailable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Located {
    pub point: GeoPoint,
    pub notice: Option<LocationNotice>,
}

/// Reads the current position, substituting `default` on any failure.
pub async fn locate_or_default(provider: &dyn LocationProvider, default: GeoPoint) -> Located {
    match provider.current_position().await {
        Ok(point) => Located {
            point,
            notice: None,
        },
        Err(e) => {
            warn!("{e} - using default location {default:?}");
            Located {
                point: default,
                notice: Some(LocationNotice::from(&e)),
            }
        }
    }
}

/// Provider that always reports the same position
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub GeoPoint);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_position(&self) -> Result<GeoPoint, LocationError> {
        Ok(self.0)
    }
}
