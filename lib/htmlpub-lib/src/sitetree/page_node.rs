use core::fmt;
use std::path::PathBuf;

use crate::{config::PageOptions, dom::Document, tree::Node};

use super::PageId;

/// Runtime element of the [`SiteTree`](super::SiteTree): a page mapping together with its
/// parsed document and its place in the navigation
pub struct PageNode {
    pub input: Option<PathBuf>,
    pub input_exists: bool,
    pub output: Option<PathBuf>,
    pub options: PageOptions,
    /// Explicit title, else the text found by the title selector, else the input file name
    pub title: String,
    /// `title` is explicit or read from the document, not the file name fallback
    pub title_set: bool,
    /// Only set when the input exists
    pub document: Option<Document>,
    pub parent: Option<PageId>,
    pub children: Vec<PageId>,
    /// Previous published page in traversal order
    pub previous: Option<PageId>,
    /// Next published page in traversal order
    pub next: Option<PageId>,
    /// The only top level node of the tree, left out of breadcrumbs and the side navigation
    pub unique_root: bool,
}

impl PageNode {
    /// Has content that gets written to the output
    pub fn is_published(&self) -> bool {
        self.document.is_some() && self.output.is_some()
    }
}

impl Node for PageNode {
    fn children(&self) -> &[usize] {
        &self.children
    }
}

impl fmt::Debug for PageNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageNode")
            .field("input", &self.input)
            .field("input_exists", &self.input_exists)
            .field("output", &self.output)
            .field("title", &self.title)
            .field("title_set", &self.title_set)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("previous", &self.previous)
            .field("next", &self.next)
            .field("unique_root", &self.unique_root)
            .finish_non_exhaustive()
    }
}
