use url::{Host, Url};

/// Labels of at most this many characters are treated as suffix labels
/// ("com", "co", "uk") and never end the key on their own.
const SUFFIX_LABEL_MAX_LEN: usize = 3;

/// Computes the coarsened site key for a URL
///
/// Host labels are taken from the right. The top-level label is always
/// kept, then labels are added leftward until one longer than three
/// characters has been added or the host runs out of labels. This
/// approximates the registrable domain without a public-suffix list, so it
/// is a heuristic: `example.co.uk` works, `bbc.co.uk` does not stop at
/// `bbc` and keeps the next label too.
///
/// IP hosts are returned whole and the port is ignored. A URL without a
/// host yields an empty key.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_drift::url::domain_key;
///
/// let url = Url::parse("https://en.wikipedia.org/wiki/Rust").unwrap();
/// assert_eq!(domain_key(&url), "wikipedia.org");
///
/// let url = Url::parse("https://shop.example.co.uk/").unwrap();
/// assert_eq!(domain_key(&url), "example.co.uk");
/// ```
pub fn domain_key(url: &Url) -> String {
    match url.host() {
        Some(Host::Domain(domain)) => coarsen_host(domain),
        Some(Host::Ipv4(addr)) => addr.to_string(),
        Some(Host::Ipv6(addr)) => addr.to_string(),
        None => String::new(),
    }
}

/// Returns true if both URLs share a domain key
pub fn same_site(a: &Url, b: &Url) -> bool {
    domain_key(a) == domain_key(b)
}

fn coarsen_host(host: &str) -> String {
    let host = host.to_lowercase();
    let mut labels = host.rsplit('.').filter(|label| !label.is_empty());

    let mut kept: Vec<&str> = Vec::new();
    if let Some(top) = labels.next() {
        kept.push(top);
    }
    for label in labels {
        kept.push(label);
        if label.len() > SUFFIX_LABEL_MAX_LEN {
            break;
        }
    }

    kept.reverse();
    kept.join(".")
}
