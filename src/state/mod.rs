//! State module for the random walk
//!
//! # Components
//!
//! - `BoundedHistory`: the fixed-capacity, randomly resampled pool of visited pages
//! - `WalkPhase`: whether the driver is between legs or running one
//! - `WalkStats`: counters reported by bounded runs and progress logging

mod history;
mod stats;
mod walk_phase;

// Re-export main types
pub use history::BoundedHistory;
pub use stats::WalkStats;
pub use walk_phase::WalkPhase;
