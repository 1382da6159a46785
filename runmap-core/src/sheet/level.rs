use serde::{Deserialize, Serialize};

/// Discrete heights of the bottom sheet, smallest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetLevel {
    Closed,
    Peek,
    Half,
    Most,
    Full,
}

impl SheetLevel {
    pub const ALL: [SheetLevel; 5] = [
        SheetLevel::Closed,
        SheetLevel::Peek,
        SheetLevel::Half,
        SheetLevel::Most,
        SheetLevel::Full,
    ];

    /// Next level up, if any
    pub fn grow(self) -> Option<Self> {
        match self {
            SheetLevel::Closed => Some(SheetLevel::Peek),
            SheetLevel::Peek => Some(SheetLevel::Half),
            SheetLevel::Half => Some(SheetLevel::Most),
            SheetLevel::Most => Some(SheetLevel::Full),
            SheetLevel::Full => None,
        }
    }

    /// Next level down, if any
    pub fn shrink(self) -> Option<Self> {
        match self {
            SheetLevel::Closed => None,
            SheetLevel::Peek => Some(SheetLevel::Closed),
            SheetLevel::Half => Some(SheetLevel::Peek),
            SheetLevel::Most => Some(SheetLevel::Half),
            SheetLevel::Full => Some(SheetLevel::Most),
        }
    }
}

/// Result of feeding an accumulated drag delta to [`step`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub level: SheetLevel,
    /// Portion of the delta used up; the gesture origin moves by this much
    pub consumed: f64,
}

/// Pure transition function of the sheet.
///
/// `delta` is the vertical pointer travel since the gesture origin, positive
/// downward. Past the threshold exactly one level step is taken (down
/// shrinks, up grows) and the whole delta is consumed. At `Closed` going
/// down or `Full` going up the delta is consumed without a step.
pub fn step(level: SheetLevel, delta: f64, threshold: f64) -> Step {
    if !delta.is_finite() || delta.abs() <= threshold {
        return Step {
            level,
            consumed: 0.0,
        };
    }

    let next = if delta > 0.0 {
        level.shrink()
    } else {
        level.grow()
    };

    Step {
        level: next.unwrap_or(level),
        consumed: delta,
    }
}
