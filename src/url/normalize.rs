use crate::{UrlError, UrlResult};
use url::Url;

/// Schemes the walker is willing to follow
const WALKABLE_SCHEMES: &[&str] = &["http", "https"];

/// Parses a URL string into the form the walker compares and stores
///
/// # Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject anything that is not http:// or https://
/// 3. Remove fragment (everything after #)
///
/// Unlike a crawl-frontier normalizer this keeps the scheme, `www.` prefix,
/// trailing slashes and query untouched: two URLs are the same page only if
/// their fragment-stripped forms are identical.
///
/// # Arguments
///
/// * `url_str` - The URL string to parse
///
/// # Returns
///
/// * `Ok(Url)` - The fragment-free URL
/// * `Err(UrlError)` - Failed to parse or unsupported scheme
///
/// # Examples
///
/// ```
/// use sumi_drift::url::parse_walk_url;
///
/// let url = parse_walk_url("https://example.com/page#intro").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
/// ```
pub fn parse_walk_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if !is_walkable(&url) {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    Ok(strip_fragment(&url))
}

/// Returns a copy of `url` without its fragment
pub fn strip_fragment(url: &Url) -> Url {
    if url.fragment().is_none() {
        return url.clone();
    }
    let mut stripped = url.clone();
    stripped.set_fragment(None);
    stripped
}

/// Returns true if the URL uses a scheme the walker can fetch
pub fn is_walkable(url: &Url) -> bool {
    WALKABLE_SCHEMES.contains(&url.scheme())
}
