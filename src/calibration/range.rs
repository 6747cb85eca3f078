//! Normalised power bands

use serde::{Deserialize, Serialize};

/// Closed interval of the power bar, in fractions of max impulse.
/// When `valid`, 0 ≤ min ≤ max ≤ 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range01 {
    pub min: f32,
    pub max: f32,
    pub valid: bool,
}

impl Default for Range01 {
    fn default() -> Self {
        Self::INVALID
    }
}

impl Range01 {
    pub const INVALID: Range01 = Range01 {
        min: 1.0,
        max: 0.0,
        valid: false,
    };

    /// Band from two fractions in any order, clamped to [0, 1]. Valid only if it has width.
    pub fn new(a: f32, b: f32) -> Self {
        if !a.is_finite() || !b.is_finite() {
            return Self::INVALID;
        }
        let min = a.min(b).clamp(0.0, 1.0);
        let max = a.max(b).clamp(0.0, 1.0);
        Self {
            min,
            max,
            valid: max > min,
        }
    }

    /// Band from two impulses, normalised by `max_impulse`
    pub fn from_impulses(a: f32, b: f32, max_impulse: f32) -> Self {
        Self::new(a / max_impulse, b / max_impulse)
    }

    pub fn mid(&self) -> f32 {
        0.5 * (self.min + self.max)
    }

    pub fn width(&self) -> f32 {
        (self.max - self.min).max(0.0)
    }

    pub fn contains(&self, fraction: f32) -> bool {
        self.valid && fraction >= self.min && fraction <= self.max
    }

    /// True when `other` lies entirely inside this band
    pub fn encloses(&self, other: &Range01) -> bool {
        self.valid && other.valid && other.min >= self.min && other.max <= self.max
    }

    /// Widen about the midpoint to at least `min_width`, sliding back inside [0, 1]
    pub fn with_min_width(self, min_width: f32) -> Self {
        if !self.valid || self.width() >= min_width {
            return self;
        }
        let width = min_width.min(1.0);
        let mut min = self.mid() - width * 0.5;
        let mut max = self.mid() + width * 0.5;
        if min < 0.0 {
            max -= min;
            min = 0.0;
        }
        if max > 1.0 {
            min -= max - 1.0;
            max = 1.0;
        }
        Self {
            min: min.max(0.0),
            max,
            valid: true,
        }
    }

    /// Smallest band containing both; an invalid side is ignored
    pub fn union(self, other: Range01) -> Self {
        match (self.valid, other.valid) {
            (true, true) => Self {
                min: self.min.min(other.min),
                max: self.max.max(other.max),
                valid: true,
            },
            (true, false) => self,
            (false, _) => other,
        }
    }

    /// Push the band so it starts no lower than `floor`, keeping its width where room allows
    pub fn starting_at_least(self, floor: f32) -> Self {
        if !self.valid || self.min >= floor {
            return self;
        }
        let width = self.width();
        let min = floor.clamp(0.0, 1.0);
        let max = (min + width).min(1.0);
        Self {
            min,
            max,
            valid: max > min,
        }
    }
}
