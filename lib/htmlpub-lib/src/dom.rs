//! Thin helpers over `dom_query` shared by the tree builder and the renderer

pub use dom_query::{Document, NodeRef, Selection};
use dom_query::Matcher;
use log::warn;

pub fn parse(content: &str) -> Document {
    Document::from(content)
}

/// All elements matching `selector` in document order, an invalid selector matches nothing
pub fn select_all<'a>(document: &'a Document, selector: &str) -> Option<Selection<'a>> {
    match Matcher::new(selector) {
        Ok(matcher) => {
            let selection = document.select_matcher(&matcher);
            selection.exists().then_some(selection)
        }
        Err(_) => {
            warn!("Invalid css selector {selector:?}");
            None
        }
    }
}

pub fn select_first<'a>(document: &'a Document, selector: &str) -> Option<Selection<'a>> {
    select_all(document, selector).map(|selection| selection.first())
}

/// Same as [`select_all`] but only looking at descendants of `within`
pub fn select_all_within<'a>(within: &Selection<'a>, selector: &str) -> Option<Selection<'a>> {
    match Matcher::new(selector) {
        Ok(matcher) => {
            let selection = within.select_matcher(&matcher);
            selection.exists().then_some(selection)
        }
        Err(_) => {
            warn!("Invalid css selector {selector:?}");
            None
        }
    }
}

/// Text content with whitespace collapsed
pub fn text(selection: &Selection) -> String {
    selection.text().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text of the first element matching `selector`, `None` when nothing matches or it is empty
pub fn select_text(document: &Document, selector: &str) -> Option<String> {
    let text = text(&select_first(document, selector)?);
    (!text.is_empty()).then_some(text)
}

pub fn attr(node: &NodeRef, name: &str) -> Option<String> {
    Selection::from(*node).attr(name).map(|value| value.to_string())
}

pub fn set_attr(node: &NodeRef, name: &str, value: &str) {
    Selection::from(*node).set_attr(name, value);
}

/// Lowercase tag name
pub fn tag_name(node: &NodeRef) -> Option<String> {
    node.node_name().map(|name| name.to_ascii_lowercase())
}

pub fn outer_html(node: &NodeRef) -> String {
    Selection::from(*node).html().to_string()
}

/// Check if `node` has `container` as (grand)parent
pub fn is_inside(node: &NodeRef, container: &NodeRef) -> bool {
    let mut parent = node.parent();
    while let Some(p) = parent {
        if p.id == container.id {
            return true;
        }
        parent = p.parent();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_text() {
        let document = parse(
            "<html><head><title> My \n Page </title></head><body><h1></h1></body></html>",
        );
        assert_eq!(select_text(&document, "title"), Some("My Page".to_owned()));
        assert_eq!(select_text(&document, "h1"), None);
        assert_eq!(select_text(&document, "h2"), None);
        assert_eq!(select_text(&document, "[[invalid"), None);
    }

    #[test]
    fn test_is_inside() {
        let document = parse(
            r#"<html><body><div id="content"><p><img src="a.png"></p></div><img src="b.png"></body></html>"#,
        );
        let content = select_first(&document, "#content").unwrap();
        let content = content.nodes()[0];
        let images = select_all(&document, "img").unwrap();
        let images = images.nodes();
        assert!(is_inside(&images[0], &content));
        assert!(!is_inside(&images[1], &content));
    }
}
