//! Walk statistics

use std::fmt;

/// Counters describing a (bounded or ongoing) walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Fetch attempts, including failed ones
    pub steps: u64,

    /// Legs that ran to completion
    pub legs_completed: u64,

    /// Legs that ended early with an error
    pub legs_failed: u64,

    /// Times the seed was re-added to the history
    pub reseeds: u64,

    /// Times the fetcher was rebuilt to drop its cookies
    pub cookie_rotations: u64,

    /// History size when the stats were taken
    pub history_size: usize,
}

impl WalkStats {
    /// Total legs attempted
    pub fn legs(&self) -> u64 {
        self.legs_completed + self.legs_failed
    }

    /// Fraction of legs that failed, 0.0 when none ran
    pub fn failure_rate(&self) -> f64 {
        match self.legs() {
            0 => 0.0,
            total => self.legs_failed as f64 / total as f64,
        }
    }
}

impl fmt::Display for WalkStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "steps: {}, history: {}, legs: {} ok / {} failed, reseeds: {}, cookie rotations: {}",
            self.steps,
            self.history_size,
            self.legs_completed,
            self.legs_failed,
            self.reseeds,
            self.cookie_rotations
        )
    }
}
