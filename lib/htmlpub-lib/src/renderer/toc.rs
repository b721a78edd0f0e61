use std::fmt::Write;

use log::warn;

use crate::dom::{self, Selection};

use super::site_template::escape;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Starts at 1 for headings of the configured heading level
    pub level: u8,
    pub title: String,
    /// Anchor of the heading, `None` when neither the heading nor one of its links has an id
    pub id: Option<String>,
}

fn heading_level(tag: &str) -> Option<u8> {
    match tag.as_bytes() {
        [b'h', level @ b'1'..=b'6'] => Some(level - b'0'),
        _ => None,
    }
}

/// Id of the heading itself, else the id of the first link inside it
fn find_id(heading: &Selection) -> Option<String> {
    if let Some(id) = heading.attr("id").filter(|id| !id.is_empty()) {
        return Some(id.to_string());
    }
    let links = dom::select_all_within(heading, "a[id]")?;
    links
        .nodes()
        .iter()
        .filter_map(|link| dom::attr(link, "id"))
        .find(|id| !id.is_empty())
}

/// Headings of `fragment` in document order from level `first_level` down to `levels` levels
/// deeper
pub fn collect(fragment: &Selection, first_level: u8, levels: u8) -> Vec<TocEntry> {
    let min = first_level.max(1);
    let max = first_level.saturating_add(levels).saturating_sub(1).min(6);
    let Some(headings) = dom::select_all_within(fragment, "h1, h2, h3, h4, h5, h6") else {
        return vec![];
    };

    let mut entries = vec![];
    for node in headings.nodes() {
        let Some(level) = dom::tag_name(node).as_deref().and_then(heading_level) else {
            continue;
        };
        if level < min || level > max {
            continue;
        }
        let heading = Selection::from(*node);
        let title = dom::text(&heading);
        let id = find_id(&heading);
        if id.is_none() {
            warn!("No id found for heading h{level} {title:?}");
        }
        entries.push(TocEntry {
            level: level - first_level + 1,
            title,
            id,
        });
    }
    entries
}

/// Table of contents sidebar, `entries` is `None` when the toc is disabled
pub fn render(html: &mut String, entries: Option<&[TocEntry]>, levels: u8) {
    let _ = writeln!(
        html,
        "<aside class=\"toc sidebar\" data-title=\"Contents\" data-levels=\"{levels}\">"
    );
    html.push_str("<div class=\"toc-menu\">");
    if let Some(entries) = entries {
        html.push_str("<h3>Contents</h3>\n<ul>\n");
        for entry in entries {
            let anchor = entry.id.as_deref().unwrap_or("");
            let _ = writeln!(
                html,
                "<li data-level=\"{}\"><a href=\"#{}\">{}</a></li>",
                entry.level,
                escape(anchor),
                escape(&entry.title)
            );
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</div>\n</aside>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(level: u8, title: &str, id: Option<&str>) -> TocEntry {
        TocEntry {
            level,
            title: title.to_owned(),
            id: id.map(str::to_owned),
        }
    }

    #[test]
    fn test_collect() {
        let document = dom::parse(
            r#"<html><body>
<h1 id="title">Title</h1>
<div id="content">
<h2 id="intro">Introduction</h2>
<h3><a id="details"></a>Details</h3>
<h4 id="deep">Deep</h4>
<h5 id="too-deep">Too deep</h5>
<h2>No anchor</h2>
</div>
</body></html>"#,
        );
        let fragment = dom::select_first(&document, "#content").unwrap();
        assert_eq!(
            collect(&fragment, 2, 3),
            vec![
                entry(1, "Introduction", Some("intro")),
                entry(2, "Details", Some("details")),
                entry(3, "Deep", Some("deep")),
                entry(1, "No anchor", None),
            ]
        );
        assert_eq!(
            collect(&fragment, 3, 1),
            vec![entry(1, "Details", Some("details"))]
        );
    }

    #[test]
    fn test_render() {
        let mut html = String::new();
        render(
            &mut html,
            Some([entry(1, "A & B", Some("ab")), entry(2, "Missing", None)].as_slice()),
            3,
        );
        assert_eq!(
            html,
            "<aside class=\"toc sidebar\" data-title=\"Contents\" data-levels=\"3\">\n<div class=\"toc-menu\"><h3>Contents</h3>\n<ul>\n<li data-level=\"1\"><a href=\"#ab\">A &amp; B</a></li>\n<li data-level=\"2\"><a href=\"#\">Missing</a></li>\n</ul>\n</div>\n</aside>\n"
        );

        let mut html = String::new();
        render(&mut html, None, 2);
        assert_eq!(
            html,
            "<aside class=\"toc sidebar\" data-title=\"Contents\" data-levels=\"2\">\n<div class=\"toc-menu\"></div>\n</aside>\n"
        );
    }
}
