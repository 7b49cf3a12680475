//! HTML link extraction
//!
//! The walker only needs the outbound hyperlinks of a page: every
//! `<a href="...">` is resolved against the page URL, fragments are dropped
//! and anything that is not http(s) is discarded.

use crate::url::{is_walkable, strip_fragment};
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// Deduplicated absolute http/https links of a page
///
/// Ordered so that seeded walks are reproducible.
pub type LinkSet = BTreeSet<Url>;

/// Extracts the outbound links of an HTML document
///
/// # Link Extraction Rules
///
/// - Every `<a>` with an `href` attribute is considered; anchors without one are ignored
/// - Relative references are resolved against `base_url`
/// - Fragments are removed, then duplicates collapse
/// - Only `http` and `https` results are kept (`javascript:`, `mailto:`, `tel:`, `data:` fall out here)
///
/// Bodies that are not valid UTF-8 are decoded lossily; html5ever recovers
/// from any markup, so a malformed document simply yields fewer links.
///
/// # Arguments
///
/// * `base_url` - The URL the document was served from (after redirects)
/// * `body` - Raw response bytes
///
/// # Returns
///
/// * `Ok(LinkSet)` - Links found (possibly empty)
/// * `Err(String)` - The anchor selector could not be built
///
/// # Example
///
/// ```
/// use sumi_drift::crawler::extract_links;
/// use url::Url;
///
/// let html = br#"<html><body><a href="/page#top">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let links = extract_links(&base_url, html).unwrap();
/// assert!(links.contains(&Url::parse("https://example.com/page").unwrap()));
/// ```
pub fn extract_links(base_url: &Url, body: &[u8]) -> Result<LinkSet, String> {
    let html = String::from_utf8_lossy(body);
    let document = Html::parse_document(&html);

    let selector = Selector::parse("a[href]").map_err(|e| format!("Invalid anchor selector: {:?}", e))?;

    let links = document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect();

    Ok(links)
}

/// Resolves a link href to a walkable absolute URL
///
/// Returns None for empty hrefs, unparseable references and non-HTTP(S)
/// results.
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    if !is_walkable(&absolute_url) {
        return None;
    }

    Some(strip_fragment(&absolute_url))
}
