//! The random walker
//!
//! A walk is a sequence of legs. Each leg restarts from a page drawn at
//! random from the history and then follows `steps_per_leg` random links.
//! Every successful hop records where it landed:
//!
//! | Hop lands on          | History update                    |
//! |-----------------------|-----------------------------------|
//! | same site as origin   | `replace(origin, landed)`         |
//! | another site          | `add(landed)`                     |
//! | (first page of a leg) | none                              |
//!
//! so a run of same-site hops keeps occupying a single slot while every
//! jump to a new site claims a slot of its own.

use super::fetcher::{Fetcher, FetcherFactory};
use super::parser::{extract_links, LinkSet};
use super::policy::LinkPolicy;
use crate::config::WalkerConfig;
use crate::state::BoundedHistory;
use crate::url::{domain_key, parse_walk_url, strip_fragment};
use crate::DriftError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use url::Url;

/// Walks the link graph with one fetcher and one history
pub struct RandomWalker<F: FetcherFactory> {
    config: WalkerConfig,
    seed: Url,
    policy: LinkPolicy,
    factory: F,
    fetcher: F::Fetcher,
    history: BoundedHistory,
    steps: u64,
    rng: StdRng,
}

impl<F: FetcherFactory> RandomWalker<F> {
    /// Creates a walker whose history holds only the seed URL
    ///
    /// # Returns
    ///
    /// * `Ok(RandomWalker)` - Ready to walk
    /// * `Err(DriftError)` - The seed is not an http(s) URL or the first fetcher could not be built
    pub fn new(config: WalkerConfig, factory: F) -> Result<Self, DriftError> {
        let history = BoundedHistory::new(config.history_size);
        Self::build(config, factory, history, StdRng::from_entropy())
    }

    /// Creates a walker whose random choices are reproducible
    pub fn with_seed(config: WalkerConfig, factory: F, rng_seed: u64) -> Result<Self, DriftError> {
        let history = BoundedHistory::with_seed(config.history_size, rng_seed);
        let rng = StdRng::seed_from_u64(rng_seed.wrapping_add(1));
        Self::build(config, factory, history, rng)
    }

    fn build(
        config: WalkerConfig,
        factory: F,
        mut history: BoundedHistory,
        rng: StdRng,
    ) -> Result<Self, DriftError> {
        let seed = parse_walk_url(&config.seed)?;
        history.add(seed.clone());
        let fetcher = factory.build()?;
        let policy = config.link_policy();

        Ok(Self {
            config,
            seed,
            policy,
            factory,
            fetcher,
            history,
            steps: 0,
            rng,
        })
    }

    pub fn config(&self) -> &WalkerConfig {
        &self.config
    }

    pub fn seed(&self) -> &Url {
        &self.seed
    }

    pub fn history(&self) -> &BoundedHistory {
        &self.history
    }

    /// Number of fetch attempts so far, failed ones included
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Re-adds the seed to the history; returns false if it was already there
    pub fn reseed(&mut self) -> bool {
        if self.history.contains(&self.seed) {
            return false;
        }
        if let Some(evicted) = self.history.add(self.seed.clone()) {
            tracing::trace!("Reseed evicted {}", evicted);
        }
        true
    }

    /// Replaces the fetcher with a fresh one, dropping its cookies
    ///
    /// On failure the current fetcher is kept.
    pub fn rotate_fetcher(&mut self) -> Result<(), DriftError> {
        self.fetcher = self.factory.build()?;
        Ok(())
    }

    /// Visits one page and records it in the history
    ///
    /// The step counter is bumped before fetching, so failed attempts are
    /// counted too. With an `origin`, the landed page (after redirects)
    /// either takes over the origin's history slot when both are on the
    /// same site, or is added as a new entry. Without one, the history is
    /// left alone.
    ///
    /// The returned links exclude the page itself.
    ///
    /// # Errors
    ///
    /// Fetch and parse failures are returned as-is; the history is only
    /// touched after a successful fetch.
    pub async fn step(&mut self, url: &Url, origin: Option<&Url>) -> Result<LinkSet, DriftError> {
        let url = strip_fragment(url);
        let origin = origin.map(strip_fragment);
        let origin_key = domain_key(origin.as_ref().unwrap_or(&url));

        self.steps += 1;
        progress!(self.config.verbose, "visiting {}", url);

        let page = self.fetcher.fetch(&url).await?;
        let final_url = page.final_url;

        let mut links = extract_links(&final_url, &page.body).map_err(|message| DriftError::HtmlParse {
            url: final_url.to_string(),
            message,
        })?;
        links.remove(&url);
        links.remove(&final_url);

        tracing::trace!(
            "{} ({}, {}) has {} outbound links",
            final_url,
            page.status_code,
            page.content_type.as_deref().unwrap_or("no content type"),
            links.len()
        );

        if let Some(origin) = origin {
            if domain_key(&final_url) == origin_key {
                self.history.replace(&origin, final_url);
            } else {
                self.history.add(final_url);
            }
        }

        Ok(links)
    }

    /// Runs one leg of the walk and returns the last page visited
    ///
    /// # Flow
    ///
    /// 1. Draw a starting page from the history
    /// 2. Visit it without an origin
    /// 3. `step_count` times, pick a link with the configured policy and
    ///    visit it with the previous page as origin
    ///
    /// # Errors
    ///
    /// * `EmptyLinkSet` - a page on the way had no usable links
    /// * anything [`Self::step`] returns
    pub async fn run_leg(&mut self, step_count: usize) -> Result<Url, DriftError> {
        let mut url = self
            .history
            .get_random()
            .cloned()
            .ok_or(DriftError::EmptyHistory)?;

        let mut links = self.step(&url, None).await?;

        for _ in 0..step_count {
            let next_url = self
                .policy
                .choose(&url, &links, &mut self.rng)
                .ok_or_else(|| DriftError::EmptyLinkSet {
                    url: url.to_string(),
                })?;
            links = self.step(&next_url, Some(&url)).await?;
            url = next_url;
        }

        Ok(url)
    }
}
