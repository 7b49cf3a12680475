//! Next-hop selection

use crate::url::domain_key;
use rand::seq::IteratorRandom;
use rand::Rng;
use url::Url;

use super::LinkSet;

/// How the walker picks the next page among the current page's links
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LinkPolicy {
    /// Every link is equally likely, same-site or not
    #[default]
    Uniform,

    /// Same-site links are picked with probability `internal_bias` when the
    /// page has both same-site and cross-site links
    Weighted { internal_bias: f64 },
}

impl LinkPolicy {
    /// Picks the next hop from `links`, or `None` if there are none
    ///
    /// `current` is the page the links were found on; it decides which
    /// links count as same-site under the weighted policy.
    pub fn choose<R: Rng + ?Sized>(&self, current: &Url, links: &LinkSet, rng: &mut R) -> Option<Url> {
        match *self {
            Self::Uniform => links.iter().choose(rng).cloned(),
            Self::Weighted { internal_bias } => {
                let current_key = domain_key(current);
                let (internal, external): (Vec<&Url>, Vec<&Url>) =
                    links.iter().partition(|link| domain_key(link) == current_key);

                let pool = match (internal.is_empty(), external.is_empty()) {
                    (true, true) => return None,
                    (false, true) => internal,
                    (true, false) => external,
                    (false, false) => {
                        if rng.gen::<f64>() < internal_bias {
                            internal
                        } else {
                            external
                        }
                    }
                };
                pool.into_iter().choose(rng).cloned()
            }
        }
    }
}
