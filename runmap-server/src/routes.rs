use std::collections::HashSet;
use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{BoxError, Json, Router};
use runmap_core::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower::ServiceBuilder;
use tower::limit::ConcurrencyLimitLayer;
use tower::timeout::TimeoutLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerSection;
use crate::error::ApiError;
use crate::state::AppState;

/// Builds the service with its middleware stack.
pub fn router(state: AppState, server: &ServerSection) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(handle_middleware_error))
        .layer(TimeoutLayer::new(Duration::from_millis(
            server.request_timeout_ms,
        )))
        .layer(ConcurrencyLimitLayer::new(
            server.max_concurrent_requests.max(1),
        ));

    Router::new()
        .route("/health", get(health))
        .route("/places/nearby", get(nearby))
        .route("/places/{id}", get(place_by_id))
        .route("/route", get(route))
        .with_state(state)
        .layer(middleware)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn handle_middleware_error(error: BoxError) -> (StatusCode, Json<serde_json::Value>) {
    if error.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({ "error": "request timed out" })),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": error.to_string() })),
        )
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

#[derive(Debug, Deserialize)]
struct NearbyParams {
    lat: Option<f64>,
    lng: Option<f64>,
    radius_km: Option<f64>,
    #[serde(default)]
    q: String,
}

#[derive(Debug, Serialize)]
struct NearbyResponse {
    origin: GeoPoint,
    radius_km: f64,
    count: usize,
    places: Vec<NearbyPlace>,
}

async fn nearby(
    State(state): State<AppState>,
    query: Result<Query<NearbyParams>, QueryRejection>,
) -> Result<Json<NearbyResponse>, ApiError> {
    let params = query_params(query)?;
    let origin = match (params.lat, params.lng) {
        (Some(lat), Some(lng)) => GeoPoint::new(lat, lng)?,
        (None, None) => state.default_location,
        _ => {
            return Err(ApiError::BadRequest(
                "lat and lng must be given together".to_string(),
            ));
        }
    };
    let radius_km = state.radius_km(params.radius_km).ok_or_else(|| {
        ApiError::BadRequest("radius_km must be a positive number".to_string())
    })?;

    let candidates = state.places.list_nearby(origin, radius_km).await?;
    let result = filter_within_radius(origin, radius_km, &candidates);

    let matching: HashSet<&str> = visible_places(ListTab::Nearby, &params.q, &result, &[])
        .into_iter()
        .map(|place| place.id.as_str())
        .collect();
    let places: Vec<NearbyPlace> = result
        .entries()
        .iter()
        .filter(|entry| matching.contains(entry.place.id.as_str()))
        .cloned()
        .collect();

    tracing::debug!(
        candidates = candidates.len(),
        found = places.len(),
        radius_km,
        "nearby search"
    );
    Ok(Json(NearbyResponse {
        origin,
        radius_km,
        count: places.len(),
        places,
    }))
}

async fn place_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Place>, ApiError> {
    state
        .places
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown place '{id}'")))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RouteFormat {
    #[default]
    Json,
    Geojson,
}

#[derive(Debug, Deserialize)]
struct RouteParams {
    from_lat: f64,
    from_lng: f64,
    to_lat: f64,
    to_lng: f64,
    #[serde(default)]
    format: RouteFormat,
}

async fn route(
    State(state): State<AppState>,
    query: Result<Query<RouteParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let params = query_params(query)?;
    let start = GeoPoint::new(params.from_lat, params.from_lng)?;
    let end = GeoPoint::new(params.to_lat, params.to_lng)?;

    let path = state.resolver.resolve_walking_route(start, end).await;
    tracing::debug!(
        source = path.source.as_str(),
        points = path.len(),
        "route resolved"
    );

    Ok(match params.format {
        RouteFormat::Json => Json(path).into_response(),
        RouteFormat::Geojson => Json(path.to_geojson()?).into_response(),
    })
}
