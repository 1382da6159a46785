use super::SheetLevel;

/// Presentation constants of the bottom sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetConfig {
    /// Pointer travel needed for one level step
    pub threshold_px: f64,
    /// Fraction of the viewport height per level, indexed like [`SheetLevel::ALL`]
    pub fractions: [f64; 5],
    /// Height taken by the drag handle and tab bar
    pub header_px: f64,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            threshold_px: 50.0,
            fractions: [0.0, 0.15, 0.60, 0.85, 0.95],
            header_px: 56.0,
        }
    }
}

impl SheetConfig {
    pub fn fraction(&self, level: SheetLevel) -> f64 {
        self.fractions[level as usize]
    }

    /// How many list rows of `row_px` fit in the sheet at `level`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn visible_rows(&self, level: SheetLevel, viewport_px: f64, row_px: f64) -> usize {
        if row_px <= 0.0 || !viewport_px.is_finite() {
            return 0;
        }
        let body = viewport_px * self.fraction(level) - self.header_px;
        (body.max(0.0) / row_px).floor() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractions_follow_level_order() {
        let config = SheetConfig::default();
        assert_eq!(config.fraction(SheetLevel::Closed), 0.0);
        assert_eq!(config.fraction(SheetLevel::Half), 0.60);
        assert_eq!(config.fraction(SheetLevel::Full), 0.95);
    }

    #[test]
    fn rows_grow_with_level() {
        let config = SheetConfig::default();
        assert_eq!(config.visible_rows(SheetLevel::Closed, 800.0, 72.0), 0);
        // 800 * 0.15 - 56 = 64 < 72
        assert_eq!(config.visible_rows(SheetLevel::Peek, 800.0, 72.0), 0);
        // 800 * 0.60 - 56 = 424
        assert_eq!(config.visible_rows(SheetLevel::Half, 800.0, 72.0), 5);
        assert_eq!(config.visible_rows(SheetLevel::Half, 800.0, 0.0), 0);
    }
}
