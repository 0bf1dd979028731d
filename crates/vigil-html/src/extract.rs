//! Visible-text and structural extraction from raw HTML.
//!
//! The fingerprint path wants only the text a visitor would read, so
//! non-content subtrees (scripts, styles, embedded SVG, iframes) are skipped
//! entirely; injected trackers and ad scripts must not cause spurious
//! change detections. The diff path, by contrast, wants the structural body
//! markup line by line.

use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

/// Tags whose subtrees carry no visible page content.
const NON_CONTENT_TAGS: [&str; 5] = ["script", "style", "noscript", "svg", "iframe"];

fn body_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("body").expect("valid selector"))
}

fn head_asset_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR
        .get_or_init(|| Selector::parse("head style, head link[rel=stylesheet]").expect("valid selector"))
}

/// Extract the visible text of a document's body.
///
/// Subtrees under non-content tags are skipped and all interior whitespace
/// is collapsed to single spaces, so formatting-only markup changes produce
/// identical output.
#[must_use]
pub fn extract_visible_text(raw_html: &str) -> String {
    let document = Html::parse_document(raw_html);
    let mut collected = String::new();

    for body in document.select(body_selector()) {
        collect_text(body, &mut collected);
    }

    collected.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    if NON_CONTENT_TAGS.contains(&element.value().name()) {
        return;
    }

    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        } else if let Some(child_element) = ElementRef::wrap(child) {
            collect_text(child_element, out);
        }
    }
}

/// Split the body's inner markup into an ordered sequence of lines.
///
/// This is the structural view the diff operates on; unlike
/// [`extract_visible_text`] it keeps tags, attributes, and non-content
/// elements.
#[must_use]
pub fn body_lines(raw_html: &str) -> Vec<String> {
    let document = Html::parse_document(raw_html);

    document
        .select(body_selector())
        .next()
        .map(|body| body.inner_html())
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Collect the head's style assets (`<style>` blocks and stylesheet links).
///
/// The review document re-embeds these so highlighted fragments render with
/// the site's own styling.
#[must_use]
pub fn head_style_assets(raw_html: &str) -> String {
    let document = Html::parse_document(raw_html);

    document
        .select(head_asset_selector())
        .map(|element| element.html())
        .collect::<Vec<_>>()
        .join("\n")
}
