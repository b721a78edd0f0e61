use std::fmt::Write;

use crate::{
    sitetree::{PageId, SiteTree},
    tree::Tree,
};

use super::{RunContext, links::href_value, site_template::escape};

/// Whether `a` and `b` stand for the same location of the site. Pages compare by output,
/// folders without output by input and synthetic containers by node.
fn same_location(tree: &SiteTree, a: PageId, b: PageId) -> bool {
    let (a_node, b_node) = (&tree[a], &tree[b]);
    match (&a_node.output, &b_node.output) {
        (Some(a_output), Some(b_output)) => a_output == b_output,
        (None, None) => match (&a_node.input, &b_node.input) {
            (Some(a_input), Some(b_input)) => a_input == b_input,
            (None, None) => a == b,
            _ => false,
        },
        _ => false,
    }
}

/// Navigation state class of `page` when rendering `current`
fn state(tree: &SiteTree, page: PageId, current: PageId) -> Option<&'static str> {
    if same_location(tree, page, current) {
        return Some("is-current-page");
    }
    tree.parents(current)
        .into_iter()
        .any(|parent| same_location(tree, page, parent))
        .then_some("is-current-path")
}

fn href(tree: &SiteTree, ctx: &RunContext, from: PageId, to: PageId) -> Option<String> {
    let from = tree[from].output.as_ref()?;
    let to = tree[to].output.as_ref()?;
    Some(href_value(from, to, None, ctx.link_to_index))
}

/// Side navigation mirroring the page hierarchy, a unique root is left out
pub fn side_menu(html: &mut String, tree: &SiteTree, ctx: &RunContext, current: PageId) {
    let roots = tree.roots();
    let pages = match roots {
        [root] => tree[*root].children.as_slice(),
        _ => roots,
    };
    build_menu_tree(html, tree, ctx, pages, current, 0);
}

fn build_menu_tree(
    html: &mut String,
    tree: &SiteTree,
    ctx: &RunContext,
    pages: &[PageId],
    current: PageId,
    depth: usize,
) {
    html.push_str("<ul class=\"nav-list\">\n");
    for page in pages {
        let node = &tree[*page];
        let classes = match state(tree, *page, current) {
            Some(state) => format!("nav-item is-active {state}"),
            None => "nav-item".to_owned(),
        };
        let _ = writeln!(html, "<li class=\"{classes}\" data-depth=\"{depth}\">");
        if !node.children.is_empty() {
            html.push_str("<button class=\"nav-item-toggle\"></button>\n");
        }
        match href(tree, ctx, current, *page) {
            Some(href) => {
                let _ = writeln!(
                    html,
                    "<a class=\"nav-link\" href=\"{}\">{}</a>",
                    escape(&href),
                    escape(&node.title)
                );
            }
            None => {
                let _ = writeln!(html, "<span class=\"nav-text\">{}</span>", escape(&node.title));
            }
        }
        if !node.children.is_empty() {
            build_menu_tree(html, tree, ctx, &node.children, current, depth + 1);
        }
        html.push_str("</li>\n");
    }
    html.push_str("</ul>\n");
}

/// Trail from the top of the tree down to `current`, a unique root is left out
pub fn breadcrumbs(html: &mut String, tree: &SiteTree, ctx: &RunContext, current: PageId) {
    let mut trail = vec![current];
    for parent in tree.parents(current) {
        if tree[parent].parent.is_none() && tree[parent].unique_root {
            break;
        }
        trail.push(parent);
    }

    html.push_str("<nav class=\"breadcrumbs\" aria-label=\"breadcrumbs\">\n<ul>\n");
    for page in trail.into_iter().rev() {
        let node = &tree[page];
        match href(tree, ctx, current, page).filter(|_| node.is_published()) {
            Some(href) => {
                let _ = writeln!(
                    html,
                    "<li><a href=\"{}\">{}</a></li>",
                    escape(&href),
                    escape(&node.title)
                );
            }
            None => {
                let _ = writeln!(html, "<li>{}</li>", escape(&node.title));
            }
        }
    }
    html.push_str("</ul>\n</nav>\n");
}

/// Links to the previous and next published pages
pub fn pagination(html: &mut String, tree: &SiteTree, ctx: &RunContext, current: PageId) {
    html.push_str("<nav class=\"pagination\">\n");
    let node = &tree[current];
    for (class, page) in [("prev", node.previous), ("next", node.next)] {
        let Some(page) = page else {
            continue;
        };
        if let Some(href) = href(tree, ctx, current, page) {
            let _ = writeln!(
                html,
                "<span class=\"{class}\"><a href=\"{}\">{}</a></span>",
                escape(&href),
                escape(&tree[page].title)
            );
        }
    }
    html.push_str("</nav>\n");
}
