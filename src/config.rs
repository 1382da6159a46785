use runmap_core::prelude::*;

/// Settings of one map screen
#[derive(Debug, Clone)]
pub struct ScreenConfig {
    /// Search radius around the runner
    pub radius_km: f64,
    /// Used when the device position cannot be read
    pub default_location: GeoPoint,
    /// Follow the device position continuously while the screen is open
    pub watch_position: bool,
    pub initial_sheet_level: SheetLevel,
    pub sheet: SheetConfig,
    pub map: MapViewConfig,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            radius_km: 3.0,
            default_location: DEFAULT_LOCATION,
            watch_position: true,
            initial_sheet_level: SheetLevel::Peek,
            sheet: SheetConfig::default(),
            map: MapViewConfig::default(),
        }
    }
}
