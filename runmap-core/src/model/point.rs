use geo::{Coord, Point};
use serde::{Deserialize, Serialize};

use crate::Error;

/// WGS84 coordinate in degrees.
///
/// Always holds a finite latitude in `[-90, 90]` and longitude in
/// `[-180, 180]`; construction through [`GeoPoint::new`] or deserialization
/// rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct RawGeoPoint {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = Error;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        GeoPoint::new(raw.lat, raw.lng)
    }
}

impl GeoPoint {
    /// Creates a point, validating ranges
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinate`] for non-finite or out-of-range values
    pub fn new(lat: f64, lng: f64) -> Result<Self, Error> {
        if lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng)
        {
            Ok(Self { lat, lng })
        } else {
            Err(Error::InvalidCoordinate { lat, lng })
        }
    }

    /// Caller guarantees the range invariant
    pub(crate) const fn from_degrees_unchecked(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Builds a point from arbitrary degrees by clamping latitude and
    /// wrapping longitude back into range.
    pub(crate) fn normalized(lat: f64, lng: f64) -> Self {
        let lat = lat.clamp(-90.0, 90.0);
        let lng = if (-180.0..=180.0).contains(&lng) {
            lng
        } else {
            (lng + 180.0).rem_euclid(360.0) - 180.0
        };
        Self { lat, lng }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }
}

impl From<GeoPoint> for Point<f64> {
    fn from(p: GeoPoint) -> Self {
        Point::new(p.lng, p.lat)
    }
}

impl From<GeoPoint> for Coord<f64> {
    fn from(p: GeoPoint) -> Self {
        Coord { x: p.lng, y: p.lat }
    }
}

impl TryFrom<Point<f64>> for GeoPoint {
    type Error = Error;

    fn try_from(point: Point<f64>) -> Result<Self, Self::Error> {
        GeoPoint::new(point.y(), point.x())
    }
}
