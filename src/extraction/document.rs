//! HTML document adapter
//!
//! Thin query layer over `scraper`. Parsing is lenient (html5ever builds a
//! best-effort tree from broken markup, like a browser would) and an
//! unparseable selector yields an empty selection instead of an error.

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// A parsed HTML document
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    /// Parse a full HTML document. Never fails.
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    /// All elements matching `css`, in document order
    pub fn select_all(&self, css: &str) -> Vec<PageElement<'_>> {
        match Selector::parse(css) {
            Ok(selector) => self.html.select(&selector).map(PageElement).collect(),
            Err(e) => {
                warn!(selector = css, error = ?e, "Unparseable selector");
                Vec::new()
            }
        }
    }

    /// First element matching `css`
    pub fn select_first(&self, css: &str) -> Option<PageElement<'_>> {
        match Selector::parse(css) {
            Ok(selector) => self.html.select(&selector).next().map(PageElement),
            Err(e) => {
                warn!(selector = css, error = ?e, "Unparseable selector");
                None
            }
        }
    }

    /// Attribute `attr` of the first element matching `css`
    pub fn first_attr(&self, css: &str, attr: &str) -> Option<String> {
        self.select_first(css)
            .and_then(|el| el.attr(attr))
            .map(str::to_string)
    }

    /// Number of elements matching `css`
    pub fn count(&self, css: &str) -> usize {
        self.select_all(css).len()
    }
}

/// Handle to one element of an [`HtmlDocument`]
#[derive(Debug, Clone, Copy)]
pub struct PageElement<'a>(ElementRef<'a>);

impl<'a> PageElement<'a> {
    /// Concatenated text of all descendant text nodes
    pub fn text(&self) -> String {
        self.0.text().collect()
    }

    /// Attribute value, if present
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.0.value().attr(name)
    }

    /// Serialized children
    pub fn inner_html(&self) -> String {
        self.0.inner_html()
    }

    /// Local tag name
    pub fn tag_name(&self) -> &'a str {
        self.0.value().name()
    }
}
