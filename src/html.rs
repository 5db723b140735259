// src/html.rs
//! Thin wrapper over `scraper` elements so extraction sites deal in `Option`s
//! instead of poking at selection results directly.

use scraper::{ElementRef, Selector};

/// One element of a parsed page, scoped for sub-queries.
#[derive(Clone, Copy)]
pub struct PromoElement<'a> {
    inner: ElementRef<'a>,
}

impl<'a> PromoElement<'a> {
    pub fn new(inner: ElementRef<'a>) -> Self {
        Self { inner }
    }

    /// The element's own attribute, trimmed.
    pub fn attr(&self, name: &str) -> Option<String> {
        clean(self.inner.value().attr(name))
    }

    pub fn id(&self) -> Option<String> {
        self.attr("id")
    }

    /// Text content of the first descendant matching `selector`.
    pub fn find_first_text(&self, selector: &Selector) -> Option<String> {
        let el = self.inner.select(selector).next()?;
        let text: String = el.text().collect();
        clean(Some(&text))
    }

    /// Attribute of the first descendant matching `selector`.
    pub fn find_first_attr(&self, selector: &Selector, attr: &str) -> Option<String> {
        let el = self.inner.select(selector).next()?;
        clean(el.value().attr(attr))
    }
}

fn clean(raw: Option<&str>) -> Option<String> {
    let t = raw?.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn sel(s: &str) -> Selector {
        Selector::parse(s).unwrap()
    }

    #[test]
    fn missing_selector_yields_none() {
        let doc = Html::parse_fragment(r#"<article id=" a1 "><span class="x"> hi </span></article>"#);
        let root = doc.select(&sel("article")).next().unwrap();
        let el = PromoElement::new(root);

        assert_eq!(el.id().as_deref(), Some("a1"));
        assert_eq!(el.find_first_text(&sel(".x")).as_deref(), Some("hi"));
        assert_eq!(el.find_first_text(&sel(".nope")), None);
        assert_eq!(el.find_first_attr(&sel(".x"), "href"), None);
    }

    #[test]
    fn blank_values_are_absent() {
        let doc = Html::parse_fragment(r#"<div><a class="l" href="  " title="T"></a></div>"#);
        let root = doc.select(&sel("div")).next().unwrap();
        let el = PromoElement::new(root);

        assert_eq!(el.find_first_attr(&sel(".l"), "href"), None);
        assert_eq!(el.find_first_attr(&sel(".l"), "title").as_deref(), Some("T"));
        assert_eq!(el.find_first_text(&sel(".l")), None);
    }
}
