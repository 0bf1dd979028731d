//! Vigil HTML - Pure HTML computation for the Vigil page monitor.
//!
//! Everything in this crate is deterministic and I/O-free: content
//! fingerprinting (visible text reduced to a stable SHA-256 signature),
//! body-line extraction, the line-level diff between two snapshots, and the
//! assembly of a self-contained review document highlighting what changed.
//!
//! # Example
//!
//! ```rust
//! use vigil_html::fingerprint;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let a = fingerprint("<html><body><p>hello</p></body></html>")?;
//! let b = fingerprint("<html><body><script>x()</script><p>hello</p></body></html>")?;
//! assert_eq!(a, b); // markup noise does not affect the signature
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod diff;
pub mod error;
pub mod extract;
pub mod fingerprint;
pub mod review;

// Re-export commonly used types
pub use diff::{changed_latest_indices, group_blocks, ReviewSegment};
pub use error::{HtmlError, Result};
pub use extract::{body_lines, extract_visible_text, head_style_assets};
pub use fingerprint::fingerprint;
pub use review::{build_review, ReviewDocument};
