use crate::crawler::LinkPolicy;
use serde::Deserialize;

/// Main configuration structure for Sumi-Drift
///
/// Every section and key is optional; missing values fall back to the
/// defaults of the reference walker.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub walker: WalkerConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// Random-walk behaviour configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WalkerConfig {
    /// URL the history is seeded (and periodically reseeded) with
    #[serde(default = "default_seed")]
    pub seed: String,

    /// Maximum number of URLs kept in the history
    #[serde(default = "default_history_size")]
    pub history_size: usize,

    /// Number of hops per leg, after the leg's starting page
    #[serde(default = "default_steps_per_leg")]
    pub steps_per_leg: usize,

    /// Per-leg probability of re-adding the seed to the history
    #[serde(default = "default_reseed_probability")]
    pub reseed_probability: f64,

    /// Cookies are cleared with probability 1/period before each leg
    #[serde(default = "default_cookie_rotation_period")]
    pub cookie_rotation_period: u64,

    /// How the next hop is chosen among a page's links
    #[serde(default)]
    pub link_policy: LinkPolicyKind,

    /// Probability of preferring a same-site link under the weighted policy
    #[serde(default = "default_internal_link_bias")]
    pub internal_link_bias: f64,

    /// Log every hop and leg at info level instead of debug
    #[serde(default)]
    pub verbose: bool,
}

/// Link selection policy as written in the config file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkPolicyKind {
    #[default]
    Uniform,
    Weighted,
}

impl WalkerConfig {
    /// Resolves the configured link policy
    pub fn link_policy(&self) -> LinkPolicy {
        match self.link_policy {
            LinkPolicyKind::Uniform => LinkPolicy::Uniform,
            LinkPolicyKind::Weighted => LinkPolicy::Weighted {
                internal_bias: self.internal_link_bias,
            },
        }
    }

    /// Per-leg probability of rotating the fetcher's cookies
    pub fn cookie_rotation_probability(&self) -> f64 {
        1.0 / self.cookie_rotation_period.max(1) as f64
    }
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            history_size: default_history_size(),
            steps_per_leg: default_steps_per_leg(),
            reseed_probability: default_reseed_probability(),
            cookie_rotation_period: default_cookie_rotation_period(),
            link_policy: LinkPolicyKind::default(),
            internal_link_bias: default_internal_link_bias(),
            verbose: false,
        }
    }
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FetcherConfig {
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Response bodies are truncated to this many bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Maximum redirect hops followed per request
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_body_bytes: default_max_body_bytes(),
            max_redirects: default_max_redirects(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SumiDrift".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }
}

fn default_seed() -> String {
    "https://en.wikipedia.org/wiki/Main_Page".to_string()
}

fn default_history_size() -> usize {
    10_000
}

fn default_steps_per_leg() -> usize {
    3
}

fn default_reseed_probability() -> f64 {
    0.1
}

fn default_cookie_rotation_period() -> u64 {
    10_000
}

fn default_internal_link_bias() -> f64 {
    0.5
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_body_bytes() -> usize {
    1_000_000
}

fn default_max_redirects() -> usize {
    10
}
