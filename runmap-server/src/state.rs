use std::sync::Arc;
use std::time::Duration;

use runmap_core::loading::load_catalogues;
use runmap_core::prelude::*;

use crate::config::{SearchSection, ServerConfig};
use crate::directions::OsrmDirections;

/// Shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub places: Arc<dyn PlaceDataSource>,
    pub resolver: Arc<RouteResolver>,
    pub search: SearchSection,
    /// Used for searches that name no origin
    pub default_location: GeoPoint,
}

impl AppState {
    pub fn new(
        places: Arc<dyn PlaceDataSource>,
        resolver: RouteResolver,
        search: SearchSection,
        default_location: GeoPoint,
    ) -> Self {
        Self {
            places,
            resolver: Arc::new(resolver),
            search,
            default_location,
        }
    }

    /// Loads the catalogue and connects the directions service named in
    /// `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if a catalogue file cannot be loaded or the default
    /// location is out of range
    pub fn from_config(config: &ServerConfig) -> Result<Self, Error> {
        let places = InMemoryPlaces::new(load_catalogues(&config.catalogue.path)?);
        tracing::info!(places = places.len(), "catalogue ready");

        let directions: Arc<dyn DirectionsProvider> = match &config.directions.base_url {
            Some(url) => {
                tracing::info!(%url, "using directions service");
                Arc::new(OsrmDirections::new(
                    url.as_str(),
                    Duration::from_millis(config.directions.timeout_ms),
                ))
            }
            None => {
                tracing::warn!("no directions service configured, routes will be approximate");
                Arc::new(NoDirections)
            }
        };

        Ok(Self::new(
            Arc::new(places),
            RouteResolver::new(directions, config.resolver_config()),
            config.search.clone(),
            config.default_location()?,
        ))
    }

    /// Requested radius, defaulted and capped by the search settings.
    pub fn radius_km(&self, requested: Option<f64>) -> Option<f64> {
        let radius = requested.unwrap_or(self.search.default_radius_km);
        (radius.is_finite() && radius > 0.0).then(|| radius.min(self.search.max_radius_km))
    }
}
