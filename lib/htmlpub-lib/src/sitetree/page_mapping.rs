use std::path::PathBuf;

use crate::config::PageOptions;

/// Resolved association between an optional input document and its output location.
/// Built once by the [`TreeBuilder`](super::TreeBuilder) and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMapping {
    /// Absolute input file, or folder for nodes without content
    pub input: Option<PathBuf>,
    /// `input` is an existing file that will be published
    pub input_exists: bool,
    /// Absolute output file, unset for containers
    pub output: Option<PathBuf>,
    /// Options merged with the default page options
    pub options: PageOptions,
    pub title: Option<String>,
    pub children: Vec<PageMapping>,
}

impl PageMapping {
    /// Navigation only node
    pub fn container(
        input: Option<PathBuf>,
        options: PageOptions,
        title: Option<String>,
        children: Vec<PageMapping>,
    ) -> PageMapping {
        PageMapping {
            input,
            input_exists: false,
            output: None,
            options,
            title,
            children,
        }
    }

    pub fn is_published(&self) -> bool {
        self.input_exists && self.output.is_some()
    }
}
