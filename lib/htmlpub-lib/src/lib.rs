//! Html publisher
//!
//! Turns a tree of already rendered html documents into a deployable website. Referenced
//! images, stylesheets and scripts are relocated, links are rewritten to stay valid at their
//! new location and pages can be wrapped in a site template with navigation.
//!
//! # Examples on how to use this crate
//! ```rs
//! let config = Configuration::new("./docs", "./build")
//!     .page(PageDeclaration::new("index.html"))
//!     .page(PageDeclaration::new("guide").include_child_folders(true));
//! let report = Publisher::new(config).publish().unwrap();
//! println!("{} pages written", report.pages.len());
//! ```
pub mod catalog;
pub mod config;
pub mod dom;
pub mod legacy;
pub mod renderer;
pub mod sitetree;

mod path_extension;
mod publish_error;
mod tree;

pub use publish_error::{PublishError, PublishErrorKind};

use std::{fs::remove_dir_all, path::PathBuf};

use log::{debug, info};

use crate::{
    config::Configuration,
    path_extension::PathExtension,
    renderer::{RunContext, SiteIdentity, publish_page, relocate_bundled},
    sitetree::{SiteTree, TreeBuilder},
};

/// Outcome of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Written pages in traversal order
    pub pages: Vec<PathBuf>,
    pub catalogs: Vec<PathBuf>,
}

pub struct Publisher {
    config: Configuration,
}

impl Publisher {
    pub fn new(config: Configuration) -> Publisher {
        Publisher { config }
    }

    pub fn publish(&self) -> Result<PublishReport, PublishError> {
        let output_root = self
            .config
            .output_root
            .as_deref()
            .ok_or(PublishError::config("No output root configured"))?
            .absolute_normalized()?;
        let input_root = self
            .config
            .input_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
            .absolute_normalized()?;
        let options = &self.config.options;

        info!("Building page tree from {input_root:?}");
        let mappings = TreeBuilder::new(
            &input_root,
            &output_root,
            self.config.default_page_options.clone(),
            options.pages_base_folder.clone(),
        )
        .build(&self.config.pages)?;
        let tree = SiteTree::from_mappings(mappings)?;
        info!("SiteTree:\n{tree}");

        if options.clear_output && output_root.exists() {
            info!("Removing {output_root:?}");
            remove_dir_all(&output_root)
                .map_err(|e| PublishError::from(e).with_context(output_root.to_string_lossy()))?;
        }

        let mut ctx = RunContext::new(&input_root, &output_root, options);
        if ctx.complete_site() {
            let identity = SiteIdentity::resolve(&ctx.site, &input_root, &tree)?;
            debug!("Site {:?} with home {:?}", identity.name, identity.home);
            ctx.identity = Some(identity);
            ctx.shared_assets = relocate_bundled(&ctx)?;
        }

        let mut report = PublishReport::default();
        for id in tree.published() {
            publish_page(&tree, &ctx, id)?;
            report.pages.extend(tree[id].output.clone());
        }

        for catalog in &self.config.catalogs {
            catalog::write_catalog(catalog, &tree, &output_root)?;
            report.catalogs.extend(catalog.output_file.clone());
        }

        info!("Published {} pages to {output_root:?}", report.pages.len());
        Ok(report)
    }
}
