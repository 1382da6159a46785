use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};

use super::directions::{DirectionsProvider, DirectionsRoute, NoDirections, TravelProfile};
use super::fallback::fallback_route;
use crate::algo::{distance_km, walking_minutes};
use crate::{GeoPoint, RoutePath, RouteSource};

#[derive(Debug, Clone)]
pub struct RouteResolverConfig {
    pub profile: TravelProfile,
    /// Upper bound on a single directions request
    pub timeout: Duration,
    /// Number of segments in the fallback path, at most
    /// [`MAX_FALLBACK_SAMPLES`](super::fallback::MAX_FALLBACK_SAMPLES)
    pub fallback_samples: usize,
    /// Peak sideways bend of the fallback path, relative to its span
    pub fallback_bend: f64,
}

impl Default for RouteResolverConfig {
    fn default() -> Self {
        Self {
            profile: TravelProfile::Walking,
            timeout: Duration::from_secs(8),
            fallback_samples: 24,
            fallback_bend: 0.06,
        }
    }
}

/// Resolves walking routes, degrading to a synthetic path whenever the
/// directions service fails, times out or returns no geometry.
#[derive(Clone)]
pub struct RouteResolver {
    directions: Arc<dyn DirectionsProvider>,
    config: RouteResolverConfig,
}

impl RouteResolver {
    pub fn new(directions: Arc<dyn DirectionsProvider>, config: RouteResolverConfig) -> Self {
        Self { directions, config }
    }

    /// Resolver that always produces the fallback path
    pub fn offline() -> Self {
        Self::new(Arc::new(NoDirections), RouteResolverConfig::default())
    }

    pub fn config(&self) -> &RouteResolverConfig {
        &self.config
    }

    /// Always returns a drawable path; errors never reach the caller.
    pub async fn resolve_walking_route(&self, start: GeoPoint, end: GeoPoint) -> RoutePath {
        let request = self.directions.route(start, end, self.config.profile);
        match tokio::time::timeout(self.config.timeout, request).await {
            Ok(Ok(route)) => match into_route_path(route) {
                Some(path) => {
                    debug!(
                        "Directions route with {} points, {} m",
                        path.len(),
                        path.distance_meters
                    );
                    return path;
                }
                None => warn!("Directions returned an empty path - using fallback route"),
            },
            Ok(Err(e)) => warn!("Directions request failed: {e} - using fallback route"),
            Err(_) => warn!(
                "Directions request timed out after {:?} - using fallback route",
                self.config.timeout
            ),
        }

        fallback_route(
            start,
            end,
            self.config.fallback_samples,
            self.config.fallback_bend,
        )
    }
}

/// Validates a provider response. Missing or nonsensical summary numbers are
/// recomputed from the geometry.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn into_route_path(route: DirectionsRoute) -> Option<RoutePath> {
    if route.points.len() < 2 {
        return None;
    }

    let path_km: f64 = route
        .points
        .windows(2)
        .map(|pair| distance_km(pair[0], pair[1]))
        .sum();

    let distance_meters = if route.distance_meters.is_finite() && route.distance_meters >= 0.0 {
        route.distance_meters.round() as u32
    } else {
        (path_km * 1000.0).round() as u32
    };
    let duration_minutes = if route.duration_seconds.is_finite() && route.duration_seconds >= 0.0 {
        (route.duration_seconds / 60.0).ceil() as u32
    } else {
        walking_minutes(path_km)
    };

    RoutePath::new(
        route.points,
        distance_meters,
        duration_minutes,
        RouteSource::Directions,
    )
    .ok()
}
