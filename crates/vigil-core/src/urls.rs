//! Stateless URL helpers.
//!
//! Domain extraction and favicon URLs for display purposes. Plain functions;
//! nothing here carries state.

use url::Url;

const FAVICON_SIZE: u32 = 64;
const FAVICON_BASE_URL: &str = "https://www.google.com/s2/favicons";

/// Extract the host from a URL, stripping a leading `www.`.
///
/// Falls back to trimming scheme and path by hand when the input is not a
/// parseable URL, so the result is always usable as a display name.
#[must_use]
pub fn extract_domain(url: &str) -> String {
    match Url::parse(url).ok().and_then(|u| u.host_str().map(String::from)) {
        Some(host) => host.trim_start_matches("www.").to_string(),
        None => url
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_start_matches("www.")
            .split('/')
            .next()
            .unwrap_or(url)
            .to_string(),
    }
}

/// Favicon URL for a domain, served by the Google favicon endpoint.
#[must_use]
pub fn favicon_url(domain: &str) -> String {
    format!("{FAVICON_BASE_URL}?domain={domain}&sz={FAVICON_SIZE}")
}

/// Human-friendly name for a domain: the label before the TLD, capitalized.
#[must_use]
pub fn friendly_name(domain: &str) -> String {
    let base = domain.rsplit_once('.').map_or(domain, |(head, _)| head);
    let mut chars = base.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
