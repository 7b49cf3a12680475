//! Bounded, randomly resampled history of visited pages
//!
//! The history is a fixed-size slot array plus a lookup index from URL to
//! slot. Once full, every new entry overwrites a slot chosen uniformly at
//! random, so old entries decay away at a constant per-insert rate instead
//! of being retained by age.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use url::Url;

/// Fixed-capacity pool of previously visited URLs
#[derive(Debug, Clone)]
pub struct BoundedHistory {
    capacity: usize,
    items: Vec<Url>,
    index: HashMap<Url, usize>,
    rng: StdRng,
}

impl BoundedHistory {
    /// Creates an empty history holding at most `capacity` URLs
    ///
    /// A capacity of zero is raised to one so the seed always fits.
    pub fn new(capacity: usize) -> Self {
        Self::with_rng(capacity, StdRng::from_entropy())
    }

    /// Creates an empty history with a deterministic eviction sequence
    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        Self::with_rng(capacity, StdRng::seed_from_u64(seed))
    }

    fn with_rng(capacity: usize, rng: StdRng) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            items: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            rng,
        }
    }

    /// Maximum number of URLs the history will hold
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current number of live entries
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.index.contains_key(url)
    }

    /// Returns the slot currently holding `url`
    pub fn position(&self, url: &Url) -> Option<usize> {
        self.index.get(url).copied()
    }

    /// Iterates over live entries in slot order
    pub fn iter(&self) -> impl Iterator<Item = &Url> {
        self.items.iter()
    }

    /// Adds a URL to the history
    ///
    /// Does nothing if the URL is already present. Below capacity the URL is
    /// appended. At capacity a slot in `[0, capacity)` is picked uniformly
    /// and its occupant is evicted.
    ///
    /// Returns the evicted URL, if any.
    pub fn add(&mut self, url: Url) -> Option<Url> {
        if self.index.contains_key(&url) {
            return None;
        }

        if self.items.len() < self.capacity {
            self.index.insert(url.clone(), self.items.len());
            self.items.push(url);
            return None;
        }

        let slot = self.rng.gen_range(0..self.capacity);
        let evicted = std::mem::replace(&mut self.items[slot], url.clone());
        self.index.remove(&evicted);
        self.index.insert(url, slot);
        Some(evicted)
    }

    /// Puts `new_url` into the slot held by `old_url`
    ///
    /// If `old_url` is not in the history this is exactly [`Self::add`].
    /// If `new_url` already has a slot of its own, `old_url` is dropped
    /// instead so the history never holds the same URL twice.
    ///
    /// Returns the URL that left the history, if any.
    pub fn replace(&mut self, old_url: &Url, new_url: Url) -> Option<Url> {
        let Some(slot) = self.position(old_url) else {
            return self.add(new_url);
        };

        if old_url == &new_url {
            return None;
        }

        if self.index.contains_key(&new_url) {
            return self.remove_slot(slot);
        }

        let old = std::mem::replace(&mut self.items[slot], new_url.clone());
        self.index.remove(&old);
        self.index.insert(new_url, slot);
        Some(old)
    }

    /// Returns a uniformly chosen live entry, or `None` if empty
    pub fn get_random(&mut self) -> Option<&Url> {
        self.items.choose(&mut self.rng)
    }

    /// Swap-removes a slot, moving the last entry into it
    fn remove_slot(&mut self, slot: usize) -> Option<Url> {
        if slot >= self.items.len() {
            return None;
        }
        let removed = self.items.swap_remove(slot);
        self.index.remove(&removed);
        if let Some(moved) = self.items.get(slot) {
            self.index.insert(moved.clone(), slot);
        }
        Some(removed)
    }

    /// Checks that the index and the slot array describe the same set
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        self.items.len() <= self.capacity
            && self.items.len() == self.index.len()
            && self
                .items
                .iter()
                .enumerate()
                .all(|(slot, url)| self.index.get(url) == Some(&slot))
    }
}
