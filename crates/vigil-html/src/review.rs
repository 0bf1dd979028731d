//! Review document assembly.
//!
//! Turns a baseline/latest snapshot pair into a self-contained HTML document
//! showing only the changed regions, styled with the site's own head assets
//! so fragments render the way they do on the live page. Strictly a
//! rendering aid: nothing here touches site state or snapshot storage.

use crate::diff::{changed_latest_indices, group_blocks, ReviewSegment};
use crate::extract::{body_lines, head_style_assets};
use serde::Serialize;

/// A rendered "what changed" view of a changed site.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewDocument {
    /// Changed blocks and separators, in latest-document order
    pub segments: Vec<ReviewSegment>,
    /// Total count of changed lines across all blocks
    pub changed_lines: usize,
    /// Self-contained HTML document embedding the blocks
    pub html: String,
}

/// Build the review document for a baseline/latest snapshot pair.
///
/// Returns `None` when no latest-side line is inserted or changed. That can
/// happen even though the fingerprints disagree: the fingerprint sees
/// visible text while this diff sees structural body lines, and the two
/// signals are allowed to differ. The caller decides which to trust for
/// display.
#[must_use]
pub fn build_review(baseline_html: &str, latest_html: &str) -> Option<ReviewDocument> {
    let baseline = body_lines(baseline_html);
    let latest = body_lines(latest_html);

    let changed = changed_latest_indices(&baseline, &latest);
    if changed.is_empty() {
        tracing::debug!("snapshots diff clean, no review document produced");
        return None;
    }

    let segments = group_blocks(&latest, &changed);
    let head_assets = head_style_assets(latest_html);
    let html = render_document(&segments, changed.len(), &head_assets);

    Some(ReviewDocument {
        segments,
        changed_lines: changed.len(),
        html,
    })
}

fn render_document(segments: &[ReviewSegment], changed_lines: usize, head_assets: &str) -> String {
    let mut body = String::new();

    let noun = if changed_lines == 1 { "line" } else { "lines" };
    body.push_str(&format!(
        "<div class=\"vigil-banner\">{changed_lines} changed {noun}</div>\n"
    ));

    for segment in segments {
        match segment {
            ReviewSegment::Block { lines } => {
                body.push_str("<section class=\"vigil-block\">\n");
                body.push_str("<div class=\"vigil-block-label\">MODIFIED</div>\n");
                for line in lines {
                    body.push_str(line);
                    body.push('\n');
                }
                body.push_str("</section>\n");
            }
            ReviewSegment::Separator => {
                body.push_str("<div class=\"vigil-separator\">unchanged content</div>\n");
            }
        }
    }

    format!(
        r#"<!DOCTYPE html>
<html><head>
<meta name="viewport" content="width=device-width,initial-scale=1">
{head_assets}
<style>
    * {{ box-sizing: border-box; max-width: 100% !important; }}
    body {{ font-family: -apple-system, sans-serif;
           margin: 0; padding: 12px; background: #fafafa;
           overflow-wrap: anywhere; }}
    .vigil-banner {{ position: sticky; top: 0; padding: 8px 12px;
           background: #1a73e8; color: #fff; font-size: 14px; }}
    .vigil-block {{ border-left: 3px solid #1a73e8;
           padding: 8px; margin: 12px 0; background: #fff; }}
    .vigil-block-label {{ color: #1a73e8; font-size: 11px;
           letter-spacing: 1px; margin-bottom: 6px; }}
    .vigil-separator {{ color: #888; font-size: 12px;
           text-align: center; padding: 4px; }}
</style>
</head><body>
{body}</body></html>
"#
    )
}
