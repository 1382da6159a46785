//! Place records read from the data boundary

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::GeoPoint;
use crate::PlaceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceKind {
    Cafe,
    RunningCourse,
}

/// A café or running course.
///
/// `attributes` is whatever else the data boundary stores for the record;
/// the core never interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
    pub coordinates: GeoPoint,
    pub kind: PlaceKind,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
}

impl Place {
    pub fn new(
        id: impl Into<PlaceId>,
        name: impl Into<String>,
        coordinates: GeoPoint,
        kind: PlaceKind,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coordinates,
            kind,
            attributes: Map::new(),
        }
    }
}
