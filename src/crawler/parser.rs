//! HTML parser for extracting outbound links
//!
//! Given page bytes and the page's own URL, returns the absolute http(s)
//! URLs found in anchor elements, with relative hrefs resolved against the
//! page URL.

use scraper::{Html, Selector};
use url::Url;

/// Extracts all followable links from a page body.
///
/// An empty or malformed buffer simply yields no links; the parser is
/// lenient and never fails the pipeline.
///
/// # Link extraction rules
///
/// **Include:** `<a href="...">` anchors, resolved to absolute URLs.
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only hrefs (same-page anchors)
/// - Anything that resolves to a non-http(s) scheme
pub fn extract_links(body: &[u8], base_url: &Url) -> Vec<Url> {
    if body.is_empty() {
        return Vec::new();
    }

    let html = String::from_utf8_lossy(body);
    let document = Html::parse_document(&html);

    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    // Skip empty hrefs
    if href.is_empty() {
        return None;
    }

    // Skip special schemes
    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    // Skip fragment-only links (same page anchors)
    if href.starts_with('#') {
        return None;
    }

    // Try to resolve the URL
    match base_url.join(href) {
        Ok(absolute_url) => {
            // Only accept HTTP and HTTPS URLs
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url)
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
