//! URL handling module for Sumi-Drift
//!
//! This module provides fragment stripping, scheme filtering and the
//! domain-key heuristic that decides whether two pages belong to the same
//! site.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{domain_key, same_site};
pub use normalize::{is_walkable, parse_walk_url, strip_fragment};
