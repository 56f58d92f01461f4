//! HTML parser for extracting raw references
//!
//! This module parses HTML content and yields, in document order:
//! - `href` values of `<a>` tags (the crawl's links)
//! - `src` values of `<img>` tags (asset mode only)
//! - The page title, for logging
//!
//! Values are returned exactly as written in the document; resolution and
//! classification happen in [`crate::url`].

use lazy_static::lazy_static;
use scraper::{Html, Selector};

lazy_static! {
    static ref ANCHOR_SELECTOR: Selector = Selector::parse("a[href]").expect("valid selector");
    static ref IMAGE_SELECTOR: Selector = Selector::parse("img[src]").expect("valid selector");
    static ref TITLE_SELECTOR: Selector = Selector::parse("title").expect("valid selector");
}

/// A parsed HTML document
///
/// Parsing never fails: malformed markup is repaired by the HTML5 tree
/// builder and whatever anchors survive are yielded.
///
/// # Example
///
/// ```
/// use link_crawler::crawler::Document;
///
/// let html = r#"<html><body><a href="/page">Link</a><a href="">Empty</a></body></html>"#;
/// let document = Document::parse(html);
/// assert_eq!(document.anchors().collect::<Vec<_>>(), vec!["/page"]);
/// ```
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// Yields non-empty `<a href>` values
    pub fn anchors(&self) -> impl Iterator<Item = &str> + '_ {
        self.attribute_values(&ANCHOR_SELECTOR, "href")
    }

    /// Yields non-empty `<img src>` values
    pub fn images(&self) -> impl Iterator<Item = &str> + '_ {
        self.attribute_values(&IMAGE_SELECTOR, "src")
    }

    /// The trimmed `<title>` text, if any
    pub fn title(&self) -> Option<String> {
        self.html
            .select(&TITLE_SELECTOR)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn attribute_values<'a>(
        &'a self,
        selector: &'a Selector,
        attribute: &'static str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.html
            .select(selector)
            .filter_map(move |element| element.value().attr(attribute))
            .filter(|value| !value.trim().is_empty())
    }
}
