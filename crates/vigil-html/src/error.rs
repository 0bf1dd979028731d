//! HTML processing error types.

use thiserror::Error;

/// Errors raised while fingerprinting or diffing HTML.
#[derive(Debug, Error)]
pub enum HtmlError {
    /// The input yielded no visible text at all.
    ///
    /// The HTML front end recovers from arbitrary byte soup, so this is the
    /// working definition of "cannot be parsed": there is nothing to
    /// fingerprint. Callers treat it like a fetch failure rather than
    /// fabricating a signature for garbage input.
    #[error("document contains no visible text")]
    NoVisibleContent,
}

/// Result type alias for HTML operations.
pub type Result<T> = std::result::Result<T, HtmlError>;
