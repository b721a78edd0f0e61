use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

use log::debug;
use regex::Regex;

use crate::{
    config::LinkToIndexStrategy,
    dom::{self, Document},
    path_extension::PathExtension,
    sitetree::SiteTree,
};

use super::RunContext;

static ABSOLUTE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[a-z][a-z0-9+.-]*:|//).+").unwrap());

/// Scheme prefixed (`https:`, `mailto:`, ...) or protocol relative (`//host`) reference
pub fn is_absolute_url(url: &str) -> bool {
    ABSOLUTE_URL.is_match(url)
}

/// Split `href` at its last `#`, the fragment keeps the `#`
pub fn split_fragment(href: &str) -> (&str, Option<&str>) {
    match href.rfind('#') {
        Some(i) => (&href[..i], Some(&href[i..])),
        None => (href, None),
    }
}

/// Href from the page written to `from_output` to `target`
pub fn href_value(
    from_output: &Path,
    target: &Path,
    fragment: Option<&str>,
    strategy: LinkToIndexStrategy,
) -> String {
    let parent = from_output.parent().unwrap_or(Path::new(""));
    let mut href = target.relative_from(parent);
    if href.is_empty() {
        href = "./".into();
    } else if target.is_dir() {
        href.push('/');
    }

    match strategy {
        LinkToIndexStrategy::ToParentFolder => {
            if href == "index.html" {
                href = "./".into();
            }
            if href.ends_with("/index.html") {
                href.truncate(href.len() - "index.html".len());
            }
        }
        LinkToIndexStrategy::ToFile => {
            if href == "./" {
                href = "index.html".into();
            }
            if href.ends_with('/') {
                href.push_str("index.html");
            }
        }
    }

    if let Some(fragment) = fragment {
        href.push_str(fragment);
    }
    href
}

/// Output location of `path` referenced from the page read from `input`. Known pages use
/// their own output, anything else keeps its position relative to the roots.
pub fn resolve_target(tree: &SiteTree, ctx: &RunContext, input: &Path, path: &str) -> PathBuf {
    let mut target = input.parent().unwrap_or(Path::new("")).join(path);
    if path.ends_with('/') {
        target.push("index.html");
    }
    let target = target.normalize();
    match tree.output_of(&target) {
        Some(output) => output.to_path_buf(),
        None => ctx
            .output_root
            .join(target.relative_from(&ctx.input_root))
            .normalize(),
    }
}

/// Rewrite every relative `a[href]` of `document` so it is valid from `output`
pub fn rewrite_links(
    document: &Document,
    tree: &SiteTree,
    ctx: &RunContext,
    input: &Path,
    output: &Path,
) {
    let Some(anchors) = dom::select_all(document, "a[href]") else {
        return;
    };
    for anchor in anchors.nodes() {
        let Some(href) = dom::attr(anchor, "href") else {
            continue;
        };
        if href.is_empty() || is_absolute_url(&href) {
            continue;
        }
        let (path, fragment) = split_fragment(&href);
        if path.is_empty() {
            continue;
        }
        let target = resolve_target(tree, ctx, input, path);
        let updated = href_value(output, &target, fragment, ctx.link_to_index);
        debug!("Rewriting link {href:?} to {updated:?}");
        dom::set_attr(anchor, "href", &updated);
    }
}
