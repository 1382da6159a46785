//! Client for OSRM-compatible directions services.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use runmap_core::prelude::*;
use serde::Deserialize;

pub struct OsrmDirections {
    client: Client,
    base_url: String,
}

impl OsrmDirections {
    /// `timeout` bounds each HTTP request; the resolver applies its own
    /// bound on top.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(5)))
            .build()
            .unwrap_or_else(|_| Client::new());
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn route_url(&self, start: GeoPoint, end: GeoPoint, profile: TravelProfile) -> String {
        let profile = match profile {
            TravelProfile::Walking => "foot",
            TravelProfile::Driving => "driving",
        };
        format!(
            "{}/route/v1/{}/{},{};{},{}?overview=full&geometries=geojson",
            self.base_url,
            profile,
            start.lng(),
            start.lat(),
            end.lng(),
            end.lat()
        )
    }
}

#[async_trait]
impl DirectionsProvider for OsrmDirections {
    async fn route(
        &self,
        start: GeoPoint,
        end: GeoPoint,
        profile: TravelProfile,
    ) -> Result<DirectionsRoute, Error> {
        let url = self.route_url(start, end, profile);
        tracing::debug!(%url, "requesting directions");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Directions(format!("request failed: {e}")))?;
        let status = response.status();
        // OSRM answers errors with a JSON body too, so parse before checking status
        let body: OsrmResponse = response
            .json()
            .await
            .map_err(|e| Error::Directions(format!("unreadable response ({status}): {e}")))?;
        body.into_route()
    }
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
    distance: f64,
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

impl OsrmResponse {
    fn into_route(self) -> Result<DirectionsRoute, Error> {
        if self.code != "Ok" {
            return Err(Error::Directions(format!(
                "{}: {}",
                self.code,
                self.message.unwrap_or_default()
            )));
        }
        let route = self
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| Error::Directions("no route in response".to_string()))?;

        let points = route
            .geometry
            .coordinates
            .iter()
            .map(|[lng, lat]| GeoPoint::new(*lat, *lng))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DirectionsRoute {
            points,
            distance_meters: route.distance,
            duration_seconds: route.duration,
        })
    }
}
