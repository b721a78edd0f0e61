//! Declared configuration of a publication: where pages come from, where they go and how
//! they are rendered.
//!
//! A configuration is usually read from a toml file:
//! ```toml
//! input_root = "build/html"
//! output_root = "build/site"
//!
//! [default_page_options]
//! index_handling = "USE_PAGE_AS_PARENT"
//!
//! [[pages]]
//! input = "docs"
//! include_child_folders = true
//!
//! [options]
//! rewrite_strategy = "SHORT_SHA1_SUFFIX"
//!
//! [options.site]
//! enabled = true
//! name = "My Docs"
//!
//! [[catalogs]]
//! output_file = "build/catalog.txt"
//! action = "MERGE_SILENTLY"
//! ```
use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::PublishError;

/// How the `index.html` file of a folder participates in the page tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndexHandling {
    /// The index file is ignored
    Skip,
    /// The index only gives its title to the folder, its content is not published
    UseTitleOnly,
    /// The index page becomes the folder node itself
    #[default]
    UsePageAsParent,
    /// The index page is an ordinary sibling of the other pages of the folder
    UsePageInTheList,
}

/// How relocated assets are renamed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RewriteStrategy {
    /// `picture.png` -> `picture.png`
    #[default]
    NoModification,
    /// `picture.png` -> `picture_<sha1>.png`
    Sha1Suffix,
    /// `picture.png` -> `picture_<first 7 chars of sha1>.png`
    ShortSha1Suffix,
    /// `picture.png` -> `<sha1>/picture.png`
    Sha1SubFolder,
    /// `picture.png` -> `<first 7 chars of sha1>/picture.png`
    ShortSha1SubFolder,
}

/// How links pointing to an `index.html` are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkToIndexStrategy {
    /// `sub/index.html` -> `sub/`
    #[default]
    ToParentFolder,
    /// `sub/` -> `sub/index.html`
    ToFile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CatalogStrategy {
    /// Every html file found in the catalog folder
    ScanFolder,
    /// Only the pages published by this run
    #[default]
    PublishOutput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CatalogAction {
    #[default]
    ReplaceExisting,
    MergeSilently,
    /// Merge, then fail if the previous catalog did not list every fresh entry
    MergeAndFailIfAbsent,
}

/// Options that can be set per page, unset values are taken from the default page options
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PageOptions {
    pub index_handling: Option<IndexHandling>,
    /// Css selector of the element holding the page title, `title` when unset
    pub title_selector: Option<String>,
    /// Css selector of the content put in the site template, `body` when unset
    pub site_page_selector: Option<String>,
}

impl PageOptions {
    /// Fill every unset option with the value from `defaults`
    pub fn merged_with(&self, defaults: &PageOptions) -> PageOptions {
        PageOptions {
            index_handling: self.index_handling.or(defaults.index_handling),
            title_selector: self
                .title_selector
                .clone()
                .or_else(|| defaults.title_selector.clone()),
            site_page_selector: self
                .site_page_selector
                .clone()
                .or_else(|| defaults.site_page_selector.clone()),
        }
    }

    pub fn index_handling(&self) -> IndexHandling {
        self.index_handling.unwrap_or_default()
    }

    pub fn title_selector(&self) -> &str {
        self.title_selector.as_deref().unwrap_or("title")
    }

    pub fn site_page_selector(&self) -> &str {
        self.site_page_selector.as_deref().unwrap_or("body")
    }
}

/// A page, a folder of pages or a pure container when `input` is unset
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PageDeclaration {
    /// File or folder relative to the input root
    pub input: Option<String>,
    /// Output relative to the output root. For a file input this is either a `.html` file or a
    /// folder in which the input filename is kept.
    pub output: Option<String>,
    /// Title in the navigation, read from the page when unset
    pub title: Option<String>,
    /// When `input` is a folder also publish its sub folders
    pub include_child_folders: bool,
    #[serde(flatten)]
    pub options: PageOptions,
    pub children: Vec<PageDeclaration>,
}

impl PageDeclaration {
    pub fn new(input: impl Into<String>) -> Self {
        PageDeclaration {
            input: Some(input.into()),
            ..Default::default()
        }
    }

    /// Navigation only node without content
    pub fn container(title: impl Into<String>) -> Self {
        PageDeclaration {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn include_child_folders(mut self, include: bool) -> Self {
        self.include_child_folders = include;
        self
    }

    pub fn index_handling(mut self, index_handling: IndexHandling) -> Self {
        self.options.index_handling = Some(index_handling);
        self
    }

    pub fn site_page_selector(mut self, selector: impl Into<String>) -> Self {
        self.options.site_page_selector = Some(selector.into());
        self
    }

    pub fn child(mut self, child: PageDeclaration) -> Self {
        self.children.push(child);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogDeclaration {
    /// Folder scanned by [`CatalogStrategy::ScanFolder`], the output root when unset
    pub folder: Option<PathBuf>,
    pub strategy: CatalogStrategy,
    pub output_file: Option<PathBuf>,
    pub action: CatalogAction,
}

/// Options of the complete site mode
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteOptions {
    /// Wrap every page in the site template (navigation, breadcrumbs, pagination)
    pub enabled: bool,
    pub include_default_css: bool,
    pub include_default_js: bool,
    /// Generate a table of contents from the headings of the page
    pub create_toc: bool,
    /// Heading level listed at the first toc level
    pub toc_heading_level: u8,
    /// Amount of heading levels listed in the toc
    pub toc_levels: u8,
    /// Site name, defaults to the title of the home page
    pub name: Option<String>,
    /// Absolute url or page relative to the input root, defaults to the first page
    pub home: Option<String>,
    pub footer: Option<String>,
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            include_default_css: true,
            include_default_js: true,
            create_toc: false,
            toc_heading_level: 2,
            toc_levels: 3,
            name: None,
            home: None,
            footer: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PublishOptions {
    /// Remove the output root before publishing
    pub clear_output: bool,
    /// Folder relative to the input root mirroring the input tree that holds the order files
    pub pages_base_folder: Option<String>,
    pub link_to_index: LinkToIndexStrategy,
    pub images_folder: String,
    pub js_folder: String,
    pub css_folder: String,
    pub font_folder: String,
    pub rewrite_strategy: RewriteStrategy,
    /// In complete site mode also relocate and keep the stylesheets of the page
    pub include_original_css: bool,
    /// In complete site mode also relocate and keep the scripts of the page
    pub include_original_js: bool,
    pub site: SiteOptions,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            clear_output: false,
            pages_base_folder: None,
            link_to_index: LinkToIndexStrategy::default(),
            images_folder: "images/".into(),
            js_folder: "js/".into(),
            css_folder: "css/".into(),
            font_folder: "font/".into(),
            rewrite_strategy: RewriteStrategy::default(),
            include_original_css: true,
            include_original_js: true,
            site: SiteOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Configuration {
    pub input_root: Option<PathBuf>,
    pub output_root: Option<PathBuf>,
    /// Declared page tree, when empty the whole input root is published
    pub pages: Vec<PageDeclaration>,
    pub default_page_options: PageOptions,
    pub catalogs: Vec<CatalogDeclaration>,
    pub options: PublishOptions,
}

impl Configuration {
    pub fn new(input_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Configuration {
            input_root: Some(input_root.into()),
            output_root: Some(output_root.into()),
            ..Default::default()
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Configuration, PublishError> {
        Ok(toml::from_str(content)?)
    }

    /// Read a toml configuration, relative paths are resolved against the folder of `path`
    pub fn from_file(path: &Path) -> Result<Configuration, PublishError> {
        let content = fs::read_to_string(path)
            .map_err(|e| PublishError::from(e).with_context(path.to_string_lossy()))?;
        let mut config = Self::from_toml_str(&content)
            .map_err(|e| e.with_context(path.to_string_lossy()))?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let mut paths = vec![self.input_root.as_mut(), self.output_root.as_mut()];
        for catalog in &mut self.catalogs {
            paths.push(catalog.folder.as_mut());
            paths.push(catalog.output_file.as_mut());
        }
        for path in paths.into_iter().flatten() {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    pub fn page(mut self, page: PageDeclaration) -> Self {
        self.pages.push(page);
        self
    }

    pub fn catalog(mut self, catalog: CatalogDeclaration) -> Self {
        self.catalogs.push(catalog);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_toml_str() {
        let config = Configuration::from_toml_str(
            r#"
input_root = "in"
output_root = "out"

[default_page_options]
title_selector = "h1"

[[pages]]
input = "docs"
include_child_folders = true
index_handling = "USE_TITLE_ONLY"

[[pages.children]]
input = "extra.html"
output = "more/"

[options]
link_to_index = "TO_FILE"
rewrite_strategy = "SHORT_SHA1_SUB_FOLDER"

[options.site]
enabled = true
footer = "Footer"

[[catalogs]]
output_file = "catalog.txt"
action = "MERGE_AND_FAIL_IF_ABSENT"
"#,
        )
        .unwrap();

        assert_eq!(config.input_root, Some(PathBuf::from("in")));
        assert_eq!(config.default_page_options.title_selector(), "h1");
        assert_eq!(
            config.pages,
            vec![
                PageDeclaration::new("docs")
                    .include_child_folders(true)
                    .index_handling(IndexHandling::UseTitleOnly)
                    .child(PageDeclaration::new("extra.html").output("more/"))
            ]
        );
        assert_eq!(config.options.link_to_index, LinkToIndexStrategy::ToFile);
        assert_eq!(
            config.options.rewrite_strategy,
            RewriteStrategy::ShortSha1SubFolder
        );
        assert_eq!(config.options.images_folder, "images/");
        assert!(config.options.site.enabled);
        assert!(config.options.site.include_default_css);
        assert_eq!(config.options.site.footer.as_deref(), Some("Footer"));
        assert_eq!(config.catalogs[0].strategy, CatalogStrategy::PublishOutput);
        assert_eq!(
            config.catalogs[0].action,
            CatalogAction::MergeAndFailIfAbsent
        );
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        let result = Configuration::from_toml_str(
            r#"
[[catalogs]]
output_file = "catalog.txt"
strategy = "SOMETHING_ELSE"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_merged_with() {
        let defaults = PageOptions {
            index_handling: Some(IndexHandling::Skip),
            title_selector: Some("h1".into()),
            site_page_selector: None,
        };
        let options = PageOptions {
            index_handling: None,
            title_selector: Some("h2".into()),
            site_page_selector: None,
        }
        .merged_with(&defaults);

        assert_eq!(options.index_handling(), IndexHandling::Skip);
        assert_eq!(options.title_selector(), "h2");
        assert_eq!(options.site_page_selector(), "body");
    }
}
