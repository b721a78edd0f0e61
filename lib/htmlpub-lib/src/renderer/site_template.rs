//! Page template of the complete site mode.
//!
//! The content fragment of a page is wrapped with a navbar, a side navigation, a toolbar with
//! breadcrumbs, pagination and a table of contents.

use std::fmt::Write;

use crate::{
    dom::{self, Document, NodeRef, Selection},
    sitetree::{PageId, SiteTree},
};

use super::{
    RunContext,
    bundled::{DEFAULT_CSS_NAME, DEFAULT_JS_NAME},
    nav, toc,
};

/// Stylesheets and scripts of the page that are not part of the content fragment
#[derive(Debug, Default)]
struct AdditionalElements {
    head: Vec<String>,
    body: Vec<String>,
}

impl AdditionalElements {
    fn collect(document: &Document, fragment: &NodeRef, elements: &[NodeRef]) -> Self {
        let head = dom::select_first(document, "head").and_then(|h| h.nodes().first().copied());
        let mut additional = AdditionalElements::default();
        for element in elements {
            if element.id == fragment.id || dom::is_inside(element, fragment) {
                continue;
            }
            let html = dom::outer_html(element);
            match &head {
                Some(head) if dom::is_inside(element, head) => additional.head.push(html),
                _ => additional.body.push(html),
            }
        }
        additional
    }
}

/// Content fragment of the page: the first match of the site page selector, else the body
fn fragment<'a>(document: &'a Document, selector: &str) -> Option<Selection<'a>> {
    dom::select_first(document, selector).or_else(|| dom::select_first(document, "body"))
}

/// Render page `id` of `tree` inside the site template. `elements` are the relocated
/// stylesheets and scripts of the page, the ones outside of the content fragment are kept.
pub fn render_site_page(
    tree: &SiteTree,
    ctx: &RunContext,
    id: PageId,
    document: &Document,
    elements: &[NodeRef],
) -> String {
    let node = &tree[id];
    let output = node.output.as_deref().unwrap_or(ctx.output_root.as_path());
    let path_to_root = ctx.path_to_root(output);
    let home = ctx.home_href(tree, output);
    let site_name = ctx
        .identity
        .as_ref()
        .map(|identity| identity.name.as_str())
        .unwrap_or_default();

    let fragment = fragment(document, node.options.site_page_selector());
    let fragment_node = fragment.as_ref().and_then(|f| f.nodes().first().copied());
    let additional = match &fragment_node {
        Some(fragment_node) => AdditionalElements::collect(document, fragment_node, elements),
        None => AdditionalElements::default(),
    };

    let mut html = String::with_capacity(8192);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape(&node.title));
    if ctx.site.include_default_css {
        if let Some(css) = ctx.shared_asset(DEFAULT_CSS_NAME) {
            let _ = writeln!(
                html,
                "<link rel=\"stylesheet\" href=\"{}\">",
                escape(&format!("{path_to_root}{css}"))
            );
        }
    }
    for element in &additional.head {
        html.push_str(element);
        html.push('\n');
    }
    html.push_str("</head>\n<body class=\"article\">\n");

    // navbar
    let _ = writeln!(
        html,
        "<header class=\"header\"><nav class=\"navbar\"><div class=\"navbar-brand\"><a class=\"navbar-item\" href=\"{}\">{}</a></div></nav></header>",
        escape(&home),
        escape(site_name)
    );

    html.push_str("<div class=\"body\">\n");
    html.push_str("<div class=\"nav-container\">\n<aside class=\"nav\">\n<div class=\"panels\">\n");
    html.push_str("<div class=\"nav-panel-menu is-active\" data-panel=\"menu\">\n<nav class=\"nav-menu\">\n");
    html.push_str("<h3 class=\"title\"><a href=\"#\"></a></h3>\n");
    nav::side_menu(&mut html, tree, ctx, id);
    html.push_str("</nav>\n</div>\n</div>\n");
    html.push_str(
        "<div class=\"nav-panel-explore\" data-panel=\"explore\"><div class=\"context\"></div></div>\n",
    );
    html.push_str("</aside>\n</div>\n");

    html.push_str("<main class=\"article\">\n");
    html.push_str("<div class=\"toolbar\" role=\"navigation\">\n<button class=\"nav-toggle\"></button>\n");
    let home_class = if ctx.is_home(id) {
        "home-link is-current"
    } else {
        "home-link"
    };
    let _ = writeln!(html, "<a class=\"{home_class}\" href=\"{}\"></a>", escape(&home));
    nav::breadcrumbs(&mut html, tree, ctx, id);
    html.push_str("</div>\n");

    html.push_str("<div class=\"content\">\n<article class=\"doc\">\n");
    let _ = writeln!(html, "<h1 class=\"page\">{}</h1>", escape(&node.title));
    if let Some(fragment) = &fragment {
        html.push_str(&fragment.inner_html());
        html.push('\n');
    }
    nav::pagination(&mut html, tree, ctx, id);
    html.push_str("</article>\n");

    let entries = match (&fragment, ctx.site.create_toc) {
        (Some(fragment), true) => Some(toc::collect(
            fragment,
            ctx.site.toc_heading_level,
            ctx.site.toc_levels,
        )),
        (None, true) => Some(vec![]),
        (_, false) => None,
    };
    toc::render(&mut html, entries.as_deref(), ctx.site.toc_levels);
    html.push_str("</div>\n</main>\n</div>\n");

    if let Some(footer) = &ctx.site.footer {
        let _ = writeln!(html, "<footer class=\"footer\"><p>{}</p></footer>", escape(footer));
    }
    if ctx.site.include_default_js {
        if let Some(js) = ctx.shared_asset(DEFAULT_JS_NAME) {
            let _ = writeln!(
                html,
                "<script src=\"{}\"></script>",
                escape(&format!("{path_to_root}{js}"))
            );
        }
    }
    for element in &additional.body {
        html.push_str(element);
        html.push('\n');
    }
    html.push_str("</body>\n</html>\n");
    html
}

/// Escape HTML special characters.
pub(super) fn escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
