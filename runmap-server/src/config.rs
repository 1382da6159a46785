use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use runmap_core::prelude::*;
use serde::Deserialize;

/// Service configuration as read from the TOML file. Every field has a default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub server: ServerSection,
    pub catalogue: CatalogueSection,
    pub directions: DirectionsSection,
    pub search: SearchSection,
    pub location: LocationSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: SocketAddr,
    /// Requests taking longer are answered with 408
    pub request_timeout_ms: u64,
    pub max_concurrent_requests: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            request_timeout_ms: 30_000,
            max_concurrent_requests: 256,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogueSection {
    /// JSON place files, merged in order
    pub path: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DirectionsSection {
    /// OSRM-compatible service root. Without it every route is the fallback.
    pub base_url: Option<String>,
    pub profile: TravelProfile,
    pub timeout_ms: u64,
}

impl Default for DirectionsSection {
    fn default() -> Self {
        Self {
            base_url: None,
            profile: TravelProfile::Walking,
            timeout_ms: 8_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    pub default_radius_km: f64,
    pub max_radius_km: f64,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            default_radius_km: 3.0,
            max_radius_km: 25.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocationSection {
    pub default_lat: f64,
    pub default_lng: f64,
}

impl Default for LocationSection {
    fn default() -> Self {
        Self {
            default_lat: DEFAULT_LOCATION.lat(),
            default_lng: DEFAULT_LOCATION.lng(),
        }
    }
}

impl ServerConfig {
    /// Reads the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML
    /// for this layout
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!("Failed to read config '{}': {}", path.display(), e),
            )
        })?;
        Self::from_toml(&text)
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] when the text does not parse
    pub fn from_toml(text: &str) -> Result<Self, Error> {
        toml::from_str(text).map_err(|e| Error::InvalidData(format!("Invalid config: {e}")))
    }

    /// Checks values serde cannot: coordinate ranges and radius ordering.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found
    pub fn validate(&self) -> Result<(), Error> {
        self.default_location()?;
        let search = &self.search;
        if !(search.default_radius_km > 0.0 && search.default_radius_km <= search.max_radius_km) {
            return Err(Error::InvalidData(format!(
                "search.default_radius_km must be in (0, {}], got {}",
                search.max_radius_km, search.default_radius_km
            )));
        }
        if self.catalogue.path.is_empty() {
            return Err(Error::InvalidData(
                "catalogue.path lists no place files".to_string(),
            ));
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinate`] for an out-of-range default
    pub fn default_location(&self) -> Result<GeoPoint, Error> {
        GeoPoint::new(self.location.default_lat, self.location.default_lng)
    }

    pub fn resolver_config(&self) -> RouteResolverConfig {
        RouteResolverConfig {
            profile: self.directions.profile,
            timeout: Duration::from_millis(self.directions.timeout_ms),
            ..RouteResolverConfig::default()
        }
    }
}
