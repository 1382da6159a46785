use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid coordinate: lat={lat}, lng={lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },
    #[error("Route must contain at least two points")]
    EmptyRoute,
    #[error("Directions error: {0}")]
    Directions(String),
    #[error("Data source error: {0}")]
    DataSource(String),
    #[error("Map provider error: {0}")]
    MapProvider(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
}
