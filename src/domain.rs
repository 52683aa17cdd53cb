/// Domain normalization, validation and blocklist matching for Focusly
use crate::error::{FocusError, FocusResult};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Labels of letters, digits and inner hyphens, at least one dot, and an
/// alphabetic final label of two or more characters.
static DOMAIN_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}$")
        .expect("domain shape pattern is valid")
});

/// Strip a single leading `www.` from a host or site entry
pub fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// Normalize free text typed into the site field
///
/// Algorithm:
/// 1. Trim and lowercase
/// 2. Drop an `http://` or `https://` scheme
/// 3. Drop a leading `www.`
/// 4. Keep everything before the first `/`
///
/// Examples:
/// - "https://www.YouTube.com/watch?v=1" → "youtube.com"
/// - "www.reddit.com" → "reddit.com"
pub fn normalize_site_input(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let without_scheme = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
        .unwrap_or(lowered.as_str());

    strip_www(without_scheme)
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Check the normalized form of `raw` against the domain shape
pub fn is_likely_domain(raw: &str) -> bool {
    DOMAIN_SHAPE.is_match(&normalize_site_input(raw))
}

/// Normalize user input into a site entry, rejecting anything that is not
/// shaped like a domain
pub fn validate_site(raw: &str) -> FocusResult<String> {
    let site = normalize_site_input(raw);
    if DOMAIN_SHAPE.is_match(&site) {
        Ok(site)
    } else {
        Err(FocusError::InvalidDomain(raw.trim().to_string()))
    }
}

/// Extract the host of a navigation URL with any leading `www.` removed
pub fn navigation_domain(url: &str) -> FocusResult<String> {
    let parsed = Url::parse(url).map_err(|source| FocusError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    let host = parsed
        .host_str()
        .ok_or_else(|| FocusError::MissingHost(url.to_string()))?;

    Ok(strip_www(host).to_string())
}

/// Build the runtime blocklist from stored site entries
pub fn blocklist_from_sites(sites: &[String]) -> Vec<String> {
    sites.iter().map(|site| strip_www(site).to_string()).collect()
}

/// A domain matches a listed site when it contains the site as a substring
pub fn matches_any(domain: &str, blocklist: &[String]) -> bool {
    blocklist.iter().any(|site| domain.contains(site.as_str()))
}
