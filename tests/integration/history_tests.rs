//! History behaviour through the public API

use sumi_drift::state::BoundedHistory;
use sumi_drift::url::{parse_walk_url, same_site};
use url::Url;

fn url(s: &str) -> Url {
    parse_walk_url(s).expect("Failed to parse URL")
}

#[test]
fn test_example_walk_capacity_three() {
    let mut history = BoundedHistory::new(3);
    history.add(url("https://ex.org/"));
    history.add(url("https://ex.org/a"));
    history.add(url("https://ex.org/b"));
    assert_eq!(history.len(), 3);

    history.add(url("https://ex.org/c"));

    assert_eq!(history.len(), 3);
    assert!(history.contains(&url("https://ex.org/c")));
    let evicted = ["https://ex.org/", "https://ex.org/a", "https://ex.org/b"]
        .iter()
        .filter(|u| !history.contains(&url(u)))
        .count();
    assert_eq!(evicted, 1);
}

#[test]
fn test_fragment_variants_are_one_entry() {
    let mut history = BoundedHistory::new(5);
    history.add(url("https://x.com/p#a"));
    history.add(url("https://x.com/p#b"));

    assert_eq!(history.len(), 1);
    assert!(history.contains(&url("https://x.com/p")));
    assert!(same_site(&url("https://x.com/p#a"), &url("https://x.com/p#b")));
}

#[test]
fn test_replace_present_keeps_size_and_slot() {
    let mut history = BoundedHistory::new(4);
    history.add(url("https://ex.org/"));
    history.add(url("https://ex.org/a"));
    let slot = history.position(&url("https://ex.org/a"));

    history.replace(&url("https://ex.org/a"), url("https://ex.org/a2"));

    assert_eq!(history.len(), 2);
    assert_eq!(history.position(&url("https://ex.org/a2")), slot);
}

#[test]
fn test_long_run_stays_bounded() {
    let mut history = BoundedHistory::new(50);
    for i in 0..5000 {
        history.add(url(&format!("https://site{}.org/page", i)));
        if i % 3 == 0 {
            history.replace(
                &url(&format!("https://site{}.org/page", i / 2)),
                url(&format!("https://site{}.org/other", i)),
            );
        }
        assert!(history.len() <= history.capacity());
    }
    assert_eq!(history.len(), 50);

    let distinct: std::collections::HashSet<&Url> = history.iter().collect();
    assert_eq!(distinct.len(), 50);
    for entry in history.iter() {
        let slot = history.position(entry).expect("Entry missing from index");
        assert_eq!(history.iter().nth(slot), Some(entry));
    }
}
