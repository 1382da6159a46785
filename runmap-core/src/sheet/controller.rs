use log::debug;

use super::{SheetConfig, SheetLevel, step};

/// Bottom sheet driven by drag gestures in discrete level steps.
///
/// Each time the pointer has travelled more than the threshold since the
/// gesture origin, the sheet moves one level and the origin resets to the
/// pointer, so one long drag can walk through several levels. Releasing
/// keeps whatever level was last reached.
#[derive(Debug, Clone)]
pub struct SheetController {
    level: SheetLevel,
    config: SheetConfig,
    drag_origin: Option<f64>,
}

impl Default for SheetController {
    fn default() -> Self {
        Self::new(SheetConfig::default())
    }
}

impl SheetController {
    pub fn new(config: SheetConfig) -> Self {
        Self::with_level(SheetLevel::Peek, config)
    }

    pub fn with_level(level: SheetLevel, config: SheetConfig) -> Self {
        Self {
            level,
            config,
            drag_origin: None,
        }
    }

    pub fn level(&self) -> SheetLevel {
        self.level
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    /// Jumps straight to `level`, cancelling any gesture in progress.
    pub fn set_level(&mut self, level: SheetLevel) {
        self.drag_origin = None;
        self.level = level;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_origin.is_some()
    }

    pub fn begin_drag(&mut self, pointer_y: f64) {
        self.drag_origin = Some(pointer_y);
    }

    /// Feeds the current pointer position. Returns the new level when a
    /// step happened.
    pub fn drag_to(&mut self, pointer_y: f64) -> Option<SheetLevel> {
        let Some(origin) = self.drag_origin else {
            self.drag_origin = Some(pointer_y);
            return None;
        };

        let outcome = step(self.level, pointer_y - origin, self.config.threshold_px);
        if outcome.consumed != 0.0 {
            self.drag_origin = Some(origin + outcome.consumed);
        }
        if outcome.level == self.level {
            return None;
        }

        debug!("Sheet {:?} -> {:?}", self.level, outcome.level);
        self.level = outcome.level;
        Some(outcome.level)
    }

    pub fn end_drag(&mut self) -> SheetLevel {
        self.drag_origin = None;
        self.level
    }

    /// Tap on the full-screen backdrop: `Full` drops to `Most`, other
    /// levels ignore it. Returns whether the level changed.
    pub fn tap_backdrop(&mut self) -> bool {
        if self.level != SheetLevel::Full {
            return false;
        }
        self.drag_origin = None;
        self.level = SheetLevel::Most;
        true
    }

    /// Whether the backdrop overlay is shown
    pub fn backdrop_visible(&self) -> bool {
        self.level == SheetLevel::Full
    }

    pub fn height_fraction(&self) -> f64 {
        self.config.fraction(self.level)
    }

    pub fn visible_rows(&self, viewport_px: f64, row_px: f64) -> usize {
        self.config.visible_rows(self.level, viewport_px, row_px)
    }
}
