//! Content fingerprinting.
//!
//! A fingerprint is the SHA-256 digest of a page's visible text. Markup
//! noise (attribute churn, reformatting, injected scripts) does not move
//! the signature; any change to the text a visitor reads does.

use crate::error::{HtmlError, Result};
use crate::extract::extract_visible_text;
use sha2::{Digest, Sha256};

/// Reduce raw HTML to a stable content signature.
///
/// # Errors
/// Returns [`HtmlError::NoVisibleContent`] when no visible text can be
/// extracted; callers must treat that like a fetch failure instead of
/// recording a signature for unparseable input.
pub fn fingerprint(raw_html: &str) -> Result<String> {
    let text = extract_visible_text(raw_html);
    if text.is_empty() {
        return Err(HtmlError::NoVisibleContent);
    }

    let digest = Sha256::digest(text.as_bytes());
    Ok(hex::encode(digest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_deterministic() {
        let html = "<html><body><p>stable content</p></body></html>";
        let first = fingerprint(html).expect("fingerprint");
        let second = fingerprint(html).expect("fingerprint");
        assert_eq!(first, second);
    }

    #[test]
    fn test_fingerprint_ignores_markup_noise() {
        let plain = "<html><body><p>same text</p></body></html>";
        let noisy = concat!(
            "<html><body>",
            "<script>analytics.track();</script>",
            "<div><p class=\"shuffled\">same   text</p></div>",
            "</body></html>"
        );

        assert_eq!(
            fingerprint(plain).expect("fingerprint"),
            fingerprint(noisy).expect("fingerprint")
        );
    }

    #[test]
    fn test_fingerprint_differs_for_different_text() {
        let a = fingerprint("<body><p>version one</p></body>").expect("fingerprint");
        let b = fingerprint("<body><p>version two</p></body>").expect("fingerprint");
        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_rejects_empty_input() {
        assert!(matches!(fingerprint(""), Err(HtmlError::NoVisibleContent)));
        assert!(matches!(
            fingerprint("<body><script>only.code()</script></body>"),
            Err(HtmlError::NoVisibleContent)
        ));
    }

    #[test]
    fn test_fingerprint_is_hex_sha256() {
        let sig = fingerprint("<body>x</body>").expect("fingerprint");
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
