use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use runmap_core::prelude::*;
use runmap_server::config::{SearchSection, ServerSection};
use runmap_server::{AppState, router};
use serde_json::Value;
use tower::ServiceExt;

fn north_of_origin(km: f64) -> GeoPoint {
    let dlat = (km / EARTH_RADIUS_KM).to_degrees();
    GeoPoint::new(DEFAULT_LOCATION.lat() + dlat, DEFAULT_LOCATION.lng()).unwrap()
}

fn catalogue() -> InMemoryPlaces {
    InMemoryPlaces::new(vec![
        Place::new("far", "Far Cafe", north_of_origin(3.1), PlaceKind::Cafe),
        Place::new("hill", "Hill Cafe", north_of_origin(2.9), PlaceKind::Cafe),
        Place::new(
            "river",
            "Riverside Loop",
            north_of_origin(1.2),
            PlaceKind::RunningCourse,
        ),
        Place::new("bean", "Bean Cafe", north_of_origin(0.5), PlaceKind::Cafe),
    ])
}

/// Directions service that always answers with a three-point route
struct FixedDirections;

#[async_trait]
impl DirectionsProvider for FixedDirections {
    async fn route(
        &self,
        start: GeoPoint,
        end: GeoPoint,
        _profile: TravelProfile,
    ) -> Result<DirectionsRoute, Error> {
        let mid = GeoPoint::new(
            (start.lat() + end.lat()) / 2.0,
            (start.lng() + end.lng()) / 2.0,
        )?;
        Ok(DirectionsRoute {
            points: vec![start, mid, end],
            distance_meters: 1234.0,
            duration_seconds: 900.0,
        })
    }
}

fn app_with(directions: Arc<dyn DirectionsProvider>) -> Router {
    let state = AppState::new(
        Arc::new(catalogue()),
        RouteResolver::new(directions, RouteResolverConfig::default()),
        SearchSection::default(),
        DEFAULT_LOCATION,
    );
    router(state, &ServerSection::default())
}

fn app() -> Router {
    app_with(Arc::new(NoDirections))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn ids(body: &Value) -> Vec<&str> {
    body["places"]
        .as_array()
        .unwrap()
        .iter()
        .map(|place| place["id"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = get(app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn nearby_sorts_by_distance_within_radius() {
    let uri = format!(
        "/places/nearby?lat={}&lng={}&radius_km=3",
        DEFAULT_LOCATION.lat(),
        DEFAULT_LOCATION.lng()
    );
    let (status, body) = get(app(), &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(ids(&body), ["bean", "river", "hill"]);
    let first = body["places"][0]["distance_km"].as_f64().unwrap();
    assert!((first - 0.5).abs() < 1e-6);
    assert_eq!(body["places"][1]["kind"], "running_course");
}

#[tokio::test]
async fn nearby_without_origin_uses_default_location() {
    let (status, body) = get(app(), "/places/nearby").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["radius_km"], 3.0);
    assert_eq!(body["origin"]["lat"], DEFAULT_LOCATION.lat());
    assert_eq!(body["count"], 3);
}

#[tokio::test]
async fn nearby_filters_by_name() {
    let (_, body) = get(app(), "/places/nearby?q=%20LOOP").await;
    assert_eq!(ids(&body), ["river"]);
}

#[tokio::test]
async fn nearby_caps_the_radius() {
    let (status, body) = get(app(), "/places/nearby?radius_km=1000").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["radius_km"], 25.0);
    assert_eq!(body["count"], 4);
}

#[tokio::test]
async fn nearby_rejects_bad_input() {
    for uri in [
        "/places/nearby?lat=37.5",
        "/places/nearby?lat=120&lng=0",
        "/places/nearby?radius_km=-1",
        "/places/nearby?lat=north&lng=0",
    ] {
        let (status, body) = get(app(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["error"].is_string(), "{uri}");
    }
}

#[tokio::test]
async fn place_lookup() {
    let (status, body) = get(app(), "/places/river").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Riverside Loop");

    let (status, body) = get(app(), "/places/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Unknown place 'nope'");
}

#[tokio::test]
async fn route_falls_back_without_directions() {
    let (status, body) = get(
        app(),
        "/route?from_lat=37.5665&from_lng=126.978&to_lat=37.58&to_lng=126.99",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "fallback");
    assert!(body["points"].as_array().unwrap().len() > 2);
    assert!(body["distance_meters"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn route_uses_directions_when_available() {
    let (status, body) = get(
        app_with(Arc::new(FixedDirections)),
        "/route?from_lat=37.5665&from_lng=126.978&to_lat=37.58&to_lng=126.99",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "directions");
    assert_eq!(body["distance_meters"], 1234);
    assert_eq!(body["duration_minutes"], 15);
    assert_eq!(body["points"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn route_as_geojson() {
    let (status, body) = get(
        app(),
        "/route?from_lat=37.5665&from_lng=126.978&to_lat=37.58&to_lng=126.99&format=geojson",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "Feature");
    assert_eq!(body["geometry"]["type"], "LineString");
    assert_eq!(body["properties"]["source"], "fallback");
    // GeoJSON positions are [lng, lat]
    assert_eq!(body["geometry"]["coordinates"][0][0], 126.978);
}

#[tokio::test]
async fn route_requires_both_endpoints() {
    let (status, body) = get(app(), "/route?from_lat=37.5&from_lng=127.0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}
