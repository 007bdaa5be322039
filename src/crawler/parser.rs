//! HTML parser for extracting references
//!
//! Every `href` and `src` attribute of every element counts as a reference:
//! anchors, stylesheets, scripts, images, icons, iframes and so on. The
//! crawler decides afterwards what is a page and what is an asset.

use crate::url::resolve_reference;
use scraper::{Html, Selector};
use url::Url;

/// Attributes that carry references
const REFERENCE_ATTRIBUTES: &[&str] = &["href", "src"];

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// Resolved absolute references, in document order, duplicates included
    pub references: Vec<Url>,
}

/// Parses HTML content and extracts every resolvable reference
///
/// References are resolved against `base_url`. Those that do not resolve to
/// an HTTP(S) URL are dropped (see [`resolve_reference`]).
///
/// # Example
///
/// ```
/// use ripple_mirror::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title><link rel="stylesheet" href="/s.css"></head>
///               <body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.references.len(), 2);
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        references: extract_raw_references(&document)
            .into_iter()
            .filter_map(|href| resolve_reference(&href, base_url))
            .collect(),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Collects the raw `href`/`src` attribute values in document order
fn extract_raw_references(document: &Html) -> Vec<String> {
    let mut references = Vec::new();

    let Ok(selector) = Selector::parse("[href], [src]") else {
        return references;
    };

    for element in document.select(&selector) {
        for attribute in REFERENCE_ATTRIBUTES {
            if let Some(value) = element.value().attr(attribute) {
                references.push(value.to_string());
            }
        }
    }

    references
}
