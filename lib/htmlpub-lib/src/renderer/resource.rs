use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};
use sha1::{Digest, Sha1};

use crate::{
    PublishError,
    config::RewriteStrategy,
    dom::{self, Document, NodeRef},
};

use super::{RunContext, links::is_absolute_url};

/// Kind of asset referenced by a page, decides the output sub folder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Stylesheet,
    Script,
    Font,
}

impl AssetKind {
    fn selector(&self) -> &'static str {
        match self {
            AssetKind::Image => "img[src]",
            AssetKind::Stylesheet | AssetKind::Font => "link[href]",
            AssetKind::Script => "script[src]",
        }
    }

    fn attribute(&self) -> &'static str {
        match self {
            AssetKind::Image | AssetKind::Script => "src",
            AssetKind::Stylesheet | AssetKind::Font => "href",
        }
    }

    fn matches(&self, node: &NodeRef) -> bool {
        let is = |name: &str, expected: &str| {
            dom::attr(node, name).is_some_and(|value| value.eq_ignore_ascii_case(expected))
        };
        match self {
            AssetKind::Stylesheet => is("rel", "stylesheet"),
            AssetKind::Font => is("rel", "preload") && is("as", "font"),
            AssetKind::Image | AssetKind::Script => true,
        }
    }

    pub fn folder<'c>(&self, ctx: &'c RunContext) -> &'c str {
        match self {
            AssetKind::Image => &ctx.images_folder,
            AssetKind::Stylesheet => &ctx.css_folder,
            AssetKind::Script => &ctx.js_folder,
            AssetKind::Font => &ctx.font_folder,
        }
    }
}

/// Digest used by `strategy` to rename an asset with content `bytes`, `None` when the strategy
/// keeps the original name
pub fn file_digest(strategy: RewriteStrategy, bytes: &[u8]) -> Option<String> {
    let digest = || hex::encode(Sha1::digest(bytes));
    match strategy {
        RewriteStrategy::NoModification => None,
        RewriteStrategy::Sha1Suffix | RewriteStrategy::Sha1SubFolder => Some(digest()),
        RewriteStrategy::ShortSha1Suffix | RewriteStrategy::ShortSha1SubFolder => {
            Some(digest()[..7].to_owned())
        }
    }
}

fn uses_digest(strategy: RewriteStrategy) -> bool {
    strategy != RewriteStrategy::NoModification
}

/// Path relative to the output root of an asset called `file_name` put in `folder`
pub fn relative_asset_path(
    strategy: RewriteStrategy,
    folder: &str,
    file_name: &str,
    digest: Option<&str>,
) -> String {
    let Some(digest) = digest else {
        return format!("{folder}{file_name}");
    };
    match strategy {
        RewriteStrategy::NoModification => format!("{folder}{file_name}"),
        RewriteStrategy::Sha1Suffix | RewriteStrategy::ShortSha1Suffix => {
            match file_name.rfind('.') {
                Some(i) => format!("{folder}{}_{digest}{}", &file_name[..i], &file_name[i..]),
                None => format!("{folder}{file_name}_{digest}"),
            }
        }
        RewriteStrategy::Sha1SubFolder | RewriteStrategy::ShortSha1SubFolder => {
            format!("{folder}{digest}/{file_name}")
        }
    }
}

/// Create the parent folders of `destination`, returns `false` when it already exists
fn prepare_destination(destination: &Path) -> Result<bool, PublishError> {
    if destination.exists() {
        debug!("{destination:?} already exists");
        return Ok(false);
    }
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| PublishError::from(e).with_context(parent.to_string_lossy()))?;
    }
    Ok(true)
}

/// Write `bytes` to `destination` unless something is already there
pub fn write_once(destination: &Path, bytes: &[u8]) -> Result<(), PublishError> {
    if !prepare_destination(destination)? {
        return Ok(());
    }
    info!("Writing {destination:?}");
    fs::write(destination, bytes)
        .map_err(|e| PublishError::from(e).with_context(destination.to_string_lossy()))
}

/// Copy `source` to `destination` unless something is already there
pub fn copy_once(source: &Path, destination: &Path) -> Result<(), PublishError> {
    if !prepare_destination(destination)? {
        return Ok(());
    }
    debug!("Copying {source:?} to {destination:?}");
    fs::copy(source, destination)
        .map(|_| ())
        .map_err(|e| PublishError::from(e).with_context(source.to_string_lossy()))
}

/// Copy every asset of `kind` referenced by `document` to its sub folder in the output root and
/// point the attribute to the copy. A missing asset is only logged, its attribute is still
/// rewritten.
///
/// Returns every element of `kind`, relocated or not.
pub fn relocate<'a>(
    document: &'a Document,
    kind: AssetKind,
    input: &Path,
    output: &Path,
    ctx: &RunContext,
) -> Result<Vec<NodeRef<'a>>, PublishError> {
    let Some(selection) = dom::select_all(document, kind.selector()) else {
        return Ok(vec![]);
    };
    let path_to_root = ctx.path_to_root(output);
    let mut elements = vec![];
    for node in selection.nodes() {
        if !kind.matches(node) {
            continue;
        }
        elements.push(*node);

        let Some(value) = dom::attr(node, kind.attribute()) else {
            continue;
        };
        if value.is_empty() || is_absolute_url(&value) {
            continue;
        }

        let mut source = input.parent().unwrap_or(Path::new("")).join(&value);
        if !source.is_file() {
            source = PathBuf::from(&value);
        }
        let file_name = source
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| value.clone());

        let relative = if source.is_file() {
            let digest = if uses_digest(ctx.rewrite_strategy) {
                let bytes = fs::read(&source)
                    .map_err(|e| PublishError::from(e).with_context(source.to_string_lossy()))?;
                file_digest(ctx.rewrite_strategy, &bytes)
            } else {
                None
            };
            let relative = relative_asset_path(
                ctx.rewrite_strategy,
                kind.folder(ctx),
                &file_name,
                digest.as_deref(),
            );
            copy_once(&source, &ctx.output_root.join(&relative))?;
            relative
        } else {
            warn!("File {source:?} referenced by {input:?} is missing");
            relative_asset_path(ctx.rewrite_strategy, kind.folder(ctx), &file_name, None)
        };
        dom::set_attr(node, kind.attribute(), &format!("{path_to_root}{relative}"));
    }
    Ok(elements)
}
