//! A minimal queryable-tree capability over parsed HTML.
//!
//! The extractor only needs three things from a document: find every element
//! matching a CSS selector, check whether anything matches, and read an
//! element's trimmed text content. [`Queryable`] captures exactly that, so the
//! extraction logic runs against a `scraper` document parsed from a live page
//! or from a fixture string alike.

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// A node (document or element) that can be searched with CSS selectors.
pub trait Queryable {
    /// The element type yielded by a search.
    type Node<'a>: Queryable
    where
        Self: 'a;

    /// All descendants matching `selector`, in document order.
    ///
    /// An unparseable selector matches nothing; the problem is logged rather
    /// than returned.
    fn select_all<'a>(&'a self, selector: &str) -> Vec<Self::Node<'a>>;

    /// Text content of this node with surrounding whitespace removed.
    fn trimmed_text(&self) -> String;

    /// The first descendant matching `selector`, if any.
    fn select_first<'a>(&'a self, selector: &str) -> Option<Self::Node<'a>> {
        self.select_all(selector).into_iter().next()
    }

    fn exists(&self, selector: &str) -> bool {
        self.select_first(selector).is_some()
    }
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(selector, error = ?e, "Invalid CSS selector; treating as no match");
            None
        }
    }
}

impl Queryable for Html {
    type Node<'a> = ElementRef<'a>;

    fn select_all<'a>(&'a self, selector: &str) -> Vec<ElementRef<'a>> {
        match parse_selector(selector) {
            Some(parsed) => self.select(&parsed).collect(),
            None => Vec::new(),
        }
    }

    fn trimmed_text(&self) -> String {
        self.root_element().trimmed_text()
    }
}

impl<'b> Queryable for ElementRef<'b> {
    type Node<'a>
        = ElementRef<'b>
    where
        Self: 'a;

    fn select_all<'a>(&'a self, selector: &str) -> Vec<ElementRef<'b>> {
        match parse_selector(selector) {
            Some(parsed) => self.select(&parsed).collect(),
            None => Vec::new(),
        }
    }

    fn trimmed_text(&self) -> String {
        self.text().collect::<String>().trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_all_document_order() {
        let doc = Html::parse_document(
            r#"<div><p class="b">one</p><p class="a">two</p><p class="b">three</p></div>"#,
        );
        let texts: Vec<String> = doc
            .select_all(".a, .b")
            .iter()
            .map(|el| el.trimmed_text())
            .collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_trimmed_text_concatenates_descendants() {
        let doc = Html::parse_document("<div class=\"x\">\n  Hello <b>world</b>  \n</div>");
        let el = doc.select_first(".x").unwrap();
        assert_eq!(el.trimmed_text(), "Hello world");
    }

    #[test]
    fn test_element_scoped_search() {
        let doc = Html::parse_document(
            r#"<div class="card"><span class="t">inside</span></div><span class="t">outside</span>"#,
        );
        let card = doc.select_first(".card").unwrap();
        let found = card.select_all(".t");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].trimmed_text(), "inside");
    }

    #[test]
    fn test_invalid_selector_matches_nothing() {
        let doc = Html::parse_document("<p>text</p>");
        assert!(doc.select_all("p[[").is_empty());
        assert!(!doc.exists("p[["));
        assert!(doc.exists("p"));
    }
}
