use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use log::debug;

use crate::{
    PublishError,
    config::{IndexHandling, PageDeclaration, PageOptions},
    dom,
    path_extension::PathExtension,
};

use super::{
    PageMapping,
    page_order::{PageOrder, sort_entries},
};

const INDEX_FILE_NAME: &str = "index.html";

/// Resolves the declared pages plus the content of declared folders into a tree of
/// [`PageMapping`]s
pub struct TreeBuilder {
    input_root: PathBuf,
    output_root: PathBuf,
    default_options: PageOptions,
    /// Folder relative to the input root holding the order files
    pages_base_folder: Option<String>,
    /// Every input named by a declaration, skipped when found in a folder listing
    declared_inputs: HashSet<PathBuf>,
}

impl TreeBuilder {
    pub fn new(
        input_root: &Path,
        output_root: &Path,
        default_options: PageOptions,
        pages_base_folder: Option<String>,
    ) -> TreeBuilder {
        TreeBuilder {
            input_root: input_root.normalize(),
            output_root: output_root.normalize(),
            default_options,
            pages_base_folder,
            declared_inputs: HashSet::new(),
        }
    }

    pub fn build(&mut self, pages: &[PageDeclaration]) -> Result<Vec<PageMapping>, PublishError> {
        if pages.is_empty() {
            debug!("No pages declared, publishing {:?}", self.input_root);
            let root = PageDeclaration::new("").include_child_folders(true);
            let options = self.default_options.clone();
            return Ok(self.mapping(&root, options, vec![])?.into_iter().collect());
        }

        self.declared_inputs.clear();
        let mut queue: Vec<&PageDeclaration> = pages.iter().collect();
        while let Some(page) = queue.pop() {
            if let Some(input) = &page.input {
                self.declared_inputs.insert(self.input_path(input));
            }
            queue.extend(page.children.iter());
        }

        self.mappings(pages)
    }

    fn mappings(&self, pages: &[PageDeclaration]) -> Result<Vec<PageMapping>, PublishError> {
        let mut mappings = vec![];
        for page in pages {
            let options = page.options.merged_with(&self.default_options);
            let children = self.mappings(&page.children)?;
            if let Some(mapping) = self.mapping(page, options, children)? {
                mappings.push(mapping);
            }
        }
        Ok(mappings)
    }

    fn input_path(&self, input: &str) -> PathBuf {
        if input.is_empty() {
            return self.input_root.clone();
        }
        self.input_root.join(input).normalize()
    }

    /// Mapping for a single declaration, `None` when it is a folder without any content
    fn mapping(
        &self,
        page: &PageDeclaration,
        options: PageOptions,
        children: Vec<PageMapping>,
    ) -> Result<Option<PageMapping>, PublishError> {
        let Some(input) = &page.input else {
            return Ok(Some(PageMapping::container(
                None,
                options,
                page.title.clone(),
                children,
            )));
        };

        let input_path = self.input_path(input);
        if input_path.is_dir() {
            self.folder_mapping(page, options, children, input_path)
        } else if input_path.is_file() {
            Ok(Some(self.file_mapping(page, options, children, input_path)))
        } else {
            Err(PublishError::config(format!(
                "Input {input:?} does not exist in input root {:?}",
                self.input_root
            )))
        }
    }

    fn folder_mapping(
        &self,
        page: &PageDeclaration,
        options: PageOptions,
        children_from_config: Vec<PageMapping>,
        input_path: PathBuf,
    ) -> Result<Option<PageMapping>, PublishError> {
        let index_handling = options.index_handling();
        let mut entries = vec![];
        for entry in fs::read_dir(&input_path)
            .map_err(|e| PublishError::from(e).with_context(input_path.to_string_lossy()))?
        {
            let path = entry?.path();
            if self.declared_inputs.contains(&path) {
                debug!("{path:?} is declared, ignoring it in the listing of {input_path:?}");
                continue;
            }
            let include = if path.is_dir() {
                page.include_child_folders
            } else if path.file_name().is_some_and(|n| n == INDEX_FILE_NAME) {
                index_handling == IndexHandling::UsePageInTheList
            } else {
                path.is_file() && path.has_html_extension()
            };
            if include {
                entries.push(path);
            }
        }
        let order = PageOrder::load(&self.order_folder(&input_path));
        sort_entries(&mut entries, order.as_ref());

        let mut children = vec![];
        for path in entries {
            if path.is_dir() {
                let child = PageDeclaration {
                    input: Some(path.relative_from(&self.input_root)),
                    output: page.output.as_ref().map(|output| {
                        format!(
                            "{}/{}",
                            output.trim_end_matches('/'),
                            path.file_name_string()
                        )
                    }),
                    include_child_folders: true,
                    ..Default::default()
                };
                if let Some(mapping) = self.mapping(&child, options.clone(), vec![])? {
                    children.push(mapping);
                }
                continue;
            }
            let output = match &page.output {
                Some(output) => self.output_root.join(output).join(path.file_name_string()),
                None => self.mirrored_output(&path),
            };
            children.push(PageMapping {
                input: Some(path),
                input_exists: true,
                output: Some(output.normalize()),
                options: options.clone(),
                title: None,
                children: vec![],
            });
        }
        children.extend(children_from_config);

        let index = input_path.join(INDEX_FILE_NAME);
        if index.is_file() && !self.declared_inputs.contains(&index) {
            match index_handling {
                IndexHandling::UsePageAsParent => {
                    return Ok(Some(self.file_mapping(page, options, children, index)));
                }
                IndexHandling::UseTitleOnly => {
                    let title = match &page.title {
                        Some(title) => title.clone(),
                        None => read_title(&index, &options)?,
                    };
                    return Ok(Some(PageMapping::container(
                        Some(input_path),
                        options,
                        Some(title),
                        children,
                    )));
                }
                IndexHandling::Skip | IndexHandling::UsePageInTheList => {}
            }
        }

        if children.is_empty() {
            debug!("{input_path:?} has no pages, removing it from the tree");
            return Ok(None);
        }
        Ok(Some(PageMapping::container(
            Some(input_path),
            options,
            page.title.clone(),
            children,
        )))
    }

    fn file_mapping(
        &self,
        page: &PageDeclaration,
        options: PageOptions,
        children: Vec<PageMapping>,
        input_path: PathBuf,
    ) -> PageMapping {
        let output = match &page.output {
            Some(output) if output.ends_with(".html") => self.output_root.join(output),
            Some(output) => self
                .output_root
                .join(output)
                .join(input_path.file_name_string()),
            None => self.mirrored_output(&input_path),
        };
        PageMapping {
            input_exists: input_path.is_file(),
            input: Some(input_path),
            output: Some(output.normalize()),
            options,
            title: page.title.clone(),
            children,
        }
    }

    /// Same location relative to the output root as `input` relative to the input root
    fn mirrored_output(&self, input: &Path) -> PathBuf {
        match input.strip_prefix(&self.input_root) {
            Ok(relative) => self.output_root.join(relative),
            Err(_) => self.output_root.join(input.relative_from(&self.input_root)),
        }
    }

    fn order_folder(&self, folder: &Path) -> PathBuf {
        match &self.pages_base_folder {
            Some(base) => self
                .input_root
                .join(base)
                .join(folder.relative_from(&self.input_root)),
            None => folder.to_path_buf(),
        }
    }
}

/// Title of the page at `path` using the title selector, the file name when not found
pub(crate) fn read_title(path: &Path, options: &PageOptions) -> Result<String, PublishError> {
    let content = fs::read_to_string(path)
        .map_err(|e| PublishError::from(e).with_context(path.to_string_lossy()))?;
    let document = dom::parse(&content);
    Ok(dom::select_text(&document, options.title_selector())
        .unwrap_or_else(|| path.file_name_string()))
}
