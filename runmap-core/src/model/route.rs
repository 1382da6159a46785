use geo::{BoundingRect, Coord, LineString, Rect};
use geojson::{Feature, Geometry, Value as GeoJsonValue};
use serde::Serialize;
use serde_json::json;

use super::GeoPoint;
use crate::Error;

/// Where a route's geometry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteSource {
    /// Returned by the directions service
    Directions,
    /// Synthesized locally because the directions service gave nothing usable
    Fallback,
}

impl RouteSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteSource::Directions => "directions",
            RouteSource::Fallback => "fallback",
        }
    }
}

/// Drawable path between two points, at least two points long
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePath {
    points: Vec<GeoPoint>,
    pub distance_meters: u32,
    pub duration_minutes: u32,
    pub source: RouteSource,
}

impl RoutePath {
    /// # Errors
    ///
    /// Returns [`Error::EmptyRoute`] when fewer than two points are given
    pub fn new(
        points: Vec<GeoPoint>,
        distance_meters: u32,
        duration_minutes: u32,
        source: RouteSource,
    ) -> Result<Self, Error> {
        if points.len() < 2 {
            return Err(Error::EmptyRoute);
        }
        Ok(Self {
            points,
            distance_meters,
            duration_minutes,
            source,
        })
    }

    /// Caller guarantees at least two points
    pub(crate) fn from_parts_unchecked(
        points: Vec<GeoPoint>,
        distance_meters: u32,
        duration_minutes: u32,
        source: RouteSource,
    ) -> Self {
        debug_assert!(points.len() >= 2);
        Self {
            points,
            distance_meters,
            duration_minutes,
            source,
        }
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn start(&self) -> GeoPoint {
        self.points[0]
    }

    pub fn end(&self) -> GeoPoint {
        self.points[self.points.len() - 1]
    }

    pub fn is_fallback(&self) -> bool {
        self.source == RouteSource::Fallback
    }

    pub fn to_line_string(&self) -> LineString<f64> {
        self.points.iter().map(|&p| Coord::from(p)).collect()
    }

    /// Bounding box of the path in lng/lat degrees.
    ///
    /// Longitudes are unwrapped along the path, so a route crossing the
    /// antimeridian gets a narrow box with an edge past ±180 instead of one
    /// spanning the whole globe.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        let mut prev = self.points.first()?.lng();
        let mut shift = 0.0;
        let unwrapped: LineString<f64> = self
            .points
            .iter()
            .map(|p| {
                let step = p.lng() - prev;
                if step > 180.0 {
                    shift -= 360.0;
                } else if step < -180.0 {
                    shift += 360.0;
                }
                prev = p.lng();
                Coord {
                    x: p.lng() + shift,
                    y: p.lat(),
                }
            })
            .collect();
        unwrapped.bounding_rect()
    }

    /// Converts the path to a `GeoJSON` LineString feature.
    pub fn to_geojson(&self) -> Result<Feature, Error> {
        let geometry = Geometry::new(GeoJsonValue::from(&self.to_line_string()));

        let value = json!({
            "type": "Feature",
            "geometry": geometry,
            "properties": {
                "distance_meters": self.distance_meters,
                "duration_minutes": self.duration_minutes,
                "source": self.source.as_str(),
            }
        });

        Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}
