mod bundled;
mod links;
mod nav;
mod render_context;
mod resource;
mod site_template;
mod stylesheet;
mod toc;

pub use bundled::{
    BUNDLED_ASSETS, BundledAsset, DEFAULT_CSS_NAME, DEFAULT_JS_NAME, relocate_bundled,
};
pub use links::{href_value, is_absolute_url, rewrite_links};
pub use render_context::{RunContext, SiteHome, SiteIdentity};
pub use resource::{AssetKind, relocate};
pub use site_template::render_site_page;
pub use stylesheet::Stylesheet;
pub use toc::TocEntry;

use std::{fs, path::Path};

use log::info;

use crate::{
    PublishError,
    sitetree::{PageId, SiteTree},
};

/// Publish a single page of `tree` to its output location.
///
/// Images are always relocated. Stylesheets and scripts are relocated unless the page is
/// wrapped in the site template and the original ones are not wanted.
pub fn publish_page(tree: &SiteTree, ctx: &RunContext, id: PageId) -> Result<(), PublishError> {
    let node = &tree[id];
    let (Some(input), Some(output), Some(document)) =
        (node.input.as_deref(), node.output.as_deref(), node.document.as_ref())
    else {
        return Ok(());
    };
    info!("Publishing {input:?} to {output:?}");

    relocate(document, AssetKind::Image, input, output, ctx)?;
    let mut elements = vec![];
    if !ctx.complete_site() || ctx.include_original_css {
        elements.extend(relocate(document, AssetKind::Stylesheet, input, output, ctx)?);
        relocate(document, AssetKind::Font, input, output, ctx)?;
    }
    if !ctx.complete_site() || ctx.include_original_js {
        elements.extend(relocate(document, AssetKind::Script, input, output, ctx)?);
    }
    rewrite_links(document, tree, ctx, input, output);

    let html = if ctx.complete_site() {
        render_site_page(tree, ctx, id, document, &elements)
    } else {
        document.html().to_string()
    };
    write_page(output, &html)
}

fn write_page(output: &Path, html: &str) -> Result<(), PublishError> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| PublishError::from(e).with_context(parent.to_string_lossy()))?;
    }
    fs::write(output, html).map_err(|e| PublishError::from(e).with_context(output.to_string_lossy()))
}
