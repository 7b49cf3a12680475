//! Driver phase definitions
//!
//! The driver alternates between two phases: waiting between legs and
//! running a leg. There is no terminal phase; the walk only stops when the
//! process is killed.

use std::fmt;

/// Represents what the driver loop is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WalkPhase {
    /// Between legs; periodic maintenance (reseed, cookie rotation) happens here
    #[default]
    Idle,

    /// A leg of consecutive hops is running
    LegInProgress,
}

impl WalkPhase {
    /// Returns true if a leg is currently running
    pub fn is_active(&self) -> bool {
        matches!(self, Self::LegInProgress)
    }

    /// Checks whether moving to `next` is a legal transition
    ///
    /// Idle -> LegInProgress starts a leg, LegInProgress -> Idle ends it
    /// (successfully or not). Staying in the same phase is never valid.
    pub fn can_transition_to(&self, next: WalkPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::LegInProgress) | (Self::LegInProgress, Self::Idle)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::LegInProgress => "leg_in_progress",
        }
    }
}

impl fmt::Display for WalkPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
