// progress.rs — Completion ratio of a target.
//
// Stored `actual` is never clamped; only the display math is. A target
// with 12 of 10 done reports 120% but draws a full (not overflowing) bar.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub actual: u32,
    pub goal: u32,
}

impl Progress {
    pub fn new(actual: u32, goal: u32) -> Self {
        Self { actual, goal }
    }

    /// Unclamped ratio `actual / goal`. A zero goal reads as 0.
    pub fn ratio(&self) -> f64 {
        if self.goal == 0 {
            return 0.0;
        }
        f64::from(self.actual) / f64::from(self.goal)
    }

    /// Completion rate in whole percent, rounded, unclamped.
    pub fn percent(&self) -> u32 {
        (self.ratio() * 100.0).round() as u32
    }

    /// Fill fraction for a progress bar, clamped to `0.0..=1.0`.
    pub fn bar_fraction(&self) -> f64 {
        self.ratio().min(1.0)
    }

    pub fn is_met(&self) -> bool {
        self.goal > 0 && self.actual >= self.goal
    }

    /// Render a fixed-width text bar, e.g. `[########--]`.
    pub fn bar(&self, width: usize) -> String {
        let filled = (self.bar_fraction() * width as f64).round() as usize;
        format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} ({}%)", self.actual, self.goal, self.percent())
    }
}
