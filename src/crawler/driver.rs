//! Driver loop - runs legs forever with periodic maintenance
//!
//! Between legs the driver may re-add the seed to the history and may
//! rebuild the fetcher to drop its cookies. Each leg runs under
//! supervision: a failed leg is logged and the next one starts, so crawl
//! errors never end the walk.

use super::fetcher::{FetcherFactory, HttpFetcherFactory};
use super::walker::RandomWalker;
use crate::config::Config;
use crate::state::{WalkPhase, WalkStats};
use crate::DriftError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::convert::Infallible;
use url::Url;

/// How a supervised leg ended
#[derive(Debug)]
pub enum LegOutcome {
    /// The leg made all of its hops
    Completed {
        /// Last page visited
        last_url: Url,
    },

    /// The leg stopped early; the walk continues with the next leg
    Failed {
        /// What ended the leg
        error: DriftError,
    },
}

impl LegOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Owns the walker and runs it leg after leg
pub struct Driver<F: FetcherFactory> {
    walker: RandomWalker<F>,
    phase: WalkPhase,
    stats: WalkStats,
    rng: StdRng,
}

impl Driver<HttpFetcherFactory> {
    /// Builds a driver with a real HTTP fetcher from the loaded configuration
    pub fn from_config(config: &Config) -> Result<Self, DriftError> {
        let factory = HttpFetcherFactory::new(config.fetcher.clone(), config.user_agent.clone());
        let walker = RandomWalker::new(config.walker.clone(), factory)?;
        Ok(Self::new(walker))
    }
}

impl<F: FetcherFactory> Driver<F> {
    pub fn new(walker: RandomWalker<F>) -> Self {
        Self::with_rng(walker, StdRng::from_entropy())
    }

    /// Creates a driver whose maintenance decisions are reproducible
    pub fn with_seed(walker: RandomWalker<F>, rng_seed: u64) -> Self {
        Self::with_rng(walker, StdRng::seed_from_u64(rng_seed))
    }

    fn with_rng(walker: RandomWalker<F>, rng: StdRng) -> Self {
        Self {
            walker,
            phase: WalkPhase::Idle,
            stats: WalkStats::default(),
            rng,
        }
    }

    pub fn walker(&self) -> &RandomWalker<F> {
        &self.walker
    }

    pub fn phase(&self) -> WalkPhase {
        self.phase
    }

    /// Current counters, with step count and history size filled in
    pub fn stats(&self) -> WalkStats {
        WalkStats {
            steps: self.walker.steps(),
            history_size: self.walker.history().len(),
            ..self.stats
        }
    }

    /// Walks forever
    ///
    /// Only returns if a leg fails with an error classified as fatal by
    /// [`DriftError::is_fatal`]; ordinary crawl errors are logged and
    /// skipped.
    pub async fn run_forever(&mut self) -> Result<Infallible, DriftError> {
        loop {
            self.run_supervised_leg().await?;
        }
    }

    /// Runs `legs` legs and returns the resulting stats
    pub async fn run_legs(&mut self, legs: u64) -> Result<WalkStats, DriftError> {
        for _ in 0..legs {
            self.run_supervised_leg().await?;
        }
        Ok(self.stats())
    }

    /// Performs maintenance and runs one leg under supervision
    ///
    /// # Flow
    ///
    /// 1. With probability `reseed_probability`, re-add the seed to the history
    /// 2. With probability `1 / cookie_rotation_period`, rebuild the fetcher
    /// 3. Run the leg; a non-fatal error becomes [`LegOutcome::Failed`]
    pub async fn run_supervised_leg(&mut self) -> Result<LegOutcome, DriftError> {
        self.maintain();

        let verbose = self.walker.config().verbose;
        progress!(verbose, "{}", ProgressLine(&self.stats()));

        let steps_per_leg = self.walker.config().steps_per_leg;
        self.transition(WalkPhase::LegInProgress)?;
        let result = self.walker.run_leg(steps_per_leg).await;
        self.transition(WalkPhase::Idle)?;

        match result {
            Ok(last_url) => {
                self.stats.legs_completed += 1;
                progress!(verbose, "leg ended at {}", last_url);
                Ok(LegOutcome::Completed { last_url })
            }
            Err(error) if error.is_fatal() => {
                tracing::error!("Fatal error, stopping walk: {}", error);
                Err(error)
            }
            Err(error) => {
                self.stats.legs_failed += 1;
                tracing::error!("Leg failed: {}", error);
                Ok(LegOutcome::Failed { error })
            }
        }
    }

    /// Between-leg maintenance: reseeding and cookie rotation
    fn maintain(&mut self) {
        let config = self.walker.config();
        let reseed_probability = config.reseed_probability;
        let rotation_probability = config.cookie_rotation_probability();

        if chance(&mut self.rng, reseed_probability) {
            self.stats.reseeds += 1;
            if self.walker.reseed() {
                tracing::debug!("Reseeded history with {}", self.walker.seed());
            }
        }

        if chance(&mut self.rng, rotation_probability) {
            match self.walker.rotate_fetcher() {
                Ok(()) => {
                    self.stats.cookie_rotations += 1;
                    tracing::debug!("Rotated fetcher, cookies cleared");
                }
                Err(e) => tracing::warn!("Failed to rotate fetcher, keeping current one: {}", e),
            }
        }
    }

    fn transition(&mut self, next: WalkPhase) -> Result<(), DriftError> {
        if !self.phase.can_transition_to(next) {
            return Err(DriftError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        self.phase = next;
        Ok(())
    }
}

/// True with probability `p`; `p <= 0` or NaN never fires, `p >= 1` always does
fn chance<R: Rng>(rng: &mut R, p: f64) -> bool {
    rng.gen::<f64>() < p
}

/// The `steps: N, history: M` line logged before every leg
struct ProgressLine<'a>(&'a WalkStats);

impl std::fmt::Display for ProgressLine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "steps: {}, history: {}", self.0.steps, self.0.history_size)
    }
}
