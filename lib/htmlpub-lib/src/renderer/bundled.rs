use std::{collections::HashMap, path::Path};

use log::debug;

use crate::PublishError;

use super::{
    RunContext,
    resource::{AssetKind, file_digest, relative_asset_path, write_once},
    stylesheet::Stylesheet,
};

pub const DEFAULT_CSS_NAME: &str = "site.css";
pub const DEFAULT_JS_NAME: &str = "site.js";

/// Asset shipped with the library and used by the site template
pub struct BundledAsset {
    pub name: &'static str,
    pub kind: AssetKind,
    bytes: &'static [u8],
}

macro_rules! bundled {
    ($name:literal, $kind:expr) => {
        BundledAsset {
            name: $name,
            kind: $kind,
            bytes: include_bytes!(concat!("../../assets/", $name)),
        }
    };
}

/// Every bundled asset. Fonts are supported as [`AssetKind::Font`] but none are shipped.
pub static BUNDLED_ASSETS: &[BundledAsset] = &[
    bundled!("site.css", AssetKind::Stylesheet),
    bundled!("site.js", AssetKind::Script),
    bundled!("back.svg", AssetKind::Image),
    bundled!("caret.svg", AssetKind::Image),
    bundled!("chevron.svg", AssetKind::Image),
    bundled!("home.svg", AssetKind::Image),
    bundled!("home-o.svg", AssetKind::Image),
    bundled!("menu.svg", AssetKind::Image),
];

fn assets_of(kind: AssetKind) -> impl Iterator<Item = &'static BundledAsset> {
    BUNDLED_ASSETS.iter().filter(move |asset| asset.kind == kind)
}

/// Write the bundled assets needed by the site options into the output root.
///
/// Returns the path relative to the output root of every written asset by name.
pub fn relocate_bundled(ctx: &RunContext) -> Result<HashMap<String, String>, PublishError> {
    let mut relocated = HashMap::new();
    if ctx.site.include_default_js {
        for asset in assets_of(AssetKind::Script) {
            copy(asset, asset.bytes, ctx, &mut relocated)?;
        }
    }
    if ctx.site.include_default_css {
        for asset in assets_of(AssetKind::Image).chain(assets_of(AssetKind::Font)) {
            copy(asset, asset.bytes, ctx, &mut relocated)?;
        }
        for asset in assets_of(AssetKind::Stylesheet) {
            let content = String::from_utf8_lossy(asset.bytes);
            let content = bundled_stylesheet(&content, ctx, &relocated);
            copy(asset, content.as_bytes(), ctx, &mut relocated)?;
        }
    }
    Ok(relocated)
}

fn copy(
    asset: &BundledAsset,
    bytes: &[u8],
    ctx: &RunContext,
    relocated: &mut HashMap<String, String>,
) -> Result<(), PublishError> {
    let digest = file_digest(ctx.rewrite_strategy, bytes);
    let relative = relative_asset_path(
        ctx.rewrite_strategy,
        asset.kind.folder(ctx),
        asset.name,
        digest.as_deref(),
    );
    write_once(&ctx.output_root.join(&relative), bytes)?;
    relocated.insert(asset.name.to_owned(), relative);
    Ok(())
}

/// Point the `url(...)`s of the bundled stylesheet to the relocated bundled assets
fn bundled_stylesheet(
    content: &str,
    ctx: &RunContext,
    relocated: &HashMap<String, String>,
) -> String {
    // sub folder strategies add a folder level, the digest value itself does not matter
    let placeholder = relative_asset_path(
        ctx.rewrite_strategy,
        &ctx.css_folder,
        DEFAULT_CSS_NAME,
        Some("0000000"),
    );
    let depth = Path::new(&placeholder)
        .parent()
        .map(|parent| parent.components().count())
        .unwrap_or(0);
    let to_root = "../".repeat(depth);

    let mut stylesheet = Stylesheet::new(content);
    let updates: Vec<(String, String)> = stylesheet
        .resources()
        .into_iter()
        .filter_map(|(raw, path)| {
            let name = path.rsplit('/').next()?;
            let relative = relocated.get(name)?;
            Some((raw.to_owned(), format!("{to_root}{relative}")))
        })
        .collect();
    for (raw, updated) in updates {
        debug!("Updating {raw} in {DEFAULT_CSS_NAME} to {updated}");
        stylesheet.update_resource(&raw, &updated);
    }
    stylesheet.content().to_owned()
}
