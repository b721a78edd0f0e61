use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use log::debug;

use crate::{
    PublishError,
    config::{LinkToIndexStrategy, PublishOptions, RewriteStrategy, SiteOptions},
    path_extension::PathExtension,
    sitetree::{PageId, SiteTree},
};

use super::links::{href_value, is_absolute_url};

/// Where the home link of the site points to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteHome {
    /// Absolute url outside of the site
    Remote(String),
    Page(PageId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteIdentity {
    pub name: String,
    pub home: SiteHome,
}

impl SiteIdentity {
    /// Resolve the site name and home page.
    ///
    /// An explicit name always wins. Otherwise a remote home falls back to the name of the
    /// input root folder and a home page to its title. Without a home the first published page
    /// is used and the name is the first title set explicitly or found in a document.
    pub fn resolve(
        site: &SiteOptions,
        input_root: &Path,
        tree: &SiteTree,
    ) -> Result<SiteIdentity, PublishError> {
        if let Some(home) = &site.home {
            if is_absolute_url(home) {
                let name = site
                    .name
                    .clone()
                    .unwrap_or_else(|| input_root.file_name_string());
                return Ok(SiteIdentity {
                    name,
                    home: SiteHome::Remote(home.clone()),
                });
            }
            match tree
                .find_by_input(&input_root.join(home))
                .filter(|id| tree[*id].is_published())
            {
                Some(id) => {
                    let name = site.name.clone().unwrap_or_else(|| tree[id].title.clone());
                    return Ok(SiteIdentity {
                        name,
                        home: SiteHome::Page(id),
                    });
                }
                None => debug!("Home page {home:?} is not published, using the first page"),
            }
        }

        let home = tree.published().first().copied().ok_or(PublishError::config(
            "No home page is configured and there is no page to publish",
        ))?;
        let name = match &site.name {
            Some(name) => name.clone(),
            None => tree
                .flatten()
                .into_iter()
                .find(|id| tree[*id].title_set)
                .map(|id| tree[id].title.clone())
                .ok_or(PublishError::config(
                    "No site name is configured and no page has a title",
                ))?,
        };
        Ok(SiteIdentity {
            name,
            home: SiteHome::Page(home),
        })
    }
}

/// Settings of a single publishing run, read only once the shared assets are relocated
#[derive(Debug, Clone)]
pub struct RunContext {
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    /// Output sub folders, always ending with `/`
    pub images_folder: String,
    pub js_folder: String,
    pub css_folder: String,
    pub font_folder: String,
    pub rewrite_strategy: RewriteStrategy,
    pub link_to_index: LinkToIndexStrategy,
    pub include_original_css: bool,
    pub include_original_js: bool,
    pub site: SiteOptions,
    /// Only resolved in complete site mode
    pub identity: Option<SiteIdentity>,
    /// Bundled asset name to its path relative to the output root
    pub shared_assets: HashMap<String, String>,
}

fn with_trailing_slash(folder: &str) -> String {
    if folder.ends_with('/') {
        folder.to_owned()
    } else {
        format!("{folder}/")
    }
}

impl RunContext {
    pub fn new(input_root: &Path, output_root: &Path, options: &PublishOptions) -> RunContext {
        RunContext {
            input_root: input_root.to_path_buf(),
            output_root: output_root.to_path_buf(),
            images_folder: with_trailing_slash(&options.images_folder),
            js_folder: with_trailing_slash(&options.js_folder),
            css_folder: with_trailing_slash(&options.css_folder),
            font_folder: with_trailing_slash(&options.font_folder),
            rewrite_strategy: options.rewrite_strategy,
            link_to_index: options.link_to_index,
            include_original_css: options.include_original_css,
            include_original_js: options.include_original_js,
            site: options.site.clone(),
            identity: None,
            shared_assets: HashMap::new(),
        }
    }

    pub fn complete_site(&self) -> bool {
        self.site.enabled
    }

    pub fn shared_asset(&self, name: &str) -> Option<&str> {
        self.shared_assets.get(name).map(String::as_str)
    }

    /// Prefix leading from the folder of `output` to the output root, empty or ending with `/`
    pub fn path_to_root(&self, output: &Path) -> String {
        let parent = output.parent().unwrap_or(Path::new(""));
        let path = self.output_root.relative_from(parent);
        if path.is_empty() {
            path
        } else {
            format!("{path}/")
        }
    }

    /// Href of the site home link for a page written to `output`
    pub fn home_href(&self, tree: &SiteTree, output: &Path) -> String {
        match self.identity.as_ref().map(|identity| &identity.home) {
            Some(SiteHome::Remote(url)) => url.clone(),
            Some(SiteHome::Page(id)) => match &tree[*id].output {
                Some(home) => href_value(output, home, None, self.link_to_index),
                None => "#".into(),
            },
            None => "#".into(),
        }
    }

    pub fn is_home(&self, id: PageId) -> bool {
        matches!(
            self.identity.as_ref().map(|identity| &identity.home),
            Some(SiteHome::Page(home)) if *home == id
        )
    }
}
