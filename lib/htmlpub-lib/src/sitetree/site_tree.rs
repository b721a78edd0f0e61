use core::fmt;
use std::{
    collections::HashMap,
    fs,
    ops::{Index, IndexMut},
    path::{Path, PathBuf},
};

use log::debug;

use crate::{
    PublishError,
    dom,
    path_extension::PathExtension,
    tree::{DFS, Tree},
};

use super::{PageMapping, PageNode};

pub type PageId = usize;

/// Arena holding every page of a run. Nodes refer to each other (parent, children,
/// previous, next) by their [`PageId`].
#[derive(Debug)]
pub struct SiteTree {
    nodes: Vec<PageNode>,
    roots: Vec<PageId>,
    /// normalized input paths to node ids
    input_to_id: HashMap<PathBuf, PageId>,
}

impl SiteTree {
    /// Read and parse every existing input, resolve titles and link the published pages
    /// together in traversal order.
    ///
    /// Fails when two published pages share the same output location.
    pub fn from_mappings(mappings: Vec<PageMapping>) -> Result<SiteTree, PublishError> {
        let mut tree = SiteTree {
            nodes: vec![],
            roots: vec![],
            input_to_id: HashMap::new(),
        };
        let unique_root = mappings.len() == 1;
        for mapping in mappings {
            let id = tree.add(mapping, None, unique_root)?;
            tree.roots.push(id);
        }
        tree.check_unique_outputs()?;
        tree.link_pages();
        Ok(tree)
    }

    fn add(
        &mut self,
        mapping: PageMapping,
        parent: Option<PageId>,
        unique_root: bool,
    ) -> Result<PageId, PublishError> {
        let document = match (&mapping.input, mapping.input_exists) {
            (Some(input), true) => {
                let content = fs::read_to_string(input)
                    .map_err(|e| PublishError::from(e).with_context(input.to_string_lossy()))?;
                Some(dom::parse(&content))
            }
            _ => None,
        };
        let resolved_title = match (&mapping.title, &document) {
            (Some(title), _) => Some(title.clone()),
            (None, Some(document)) => {
                dom::select_text(document, mapping.options.title_selector())
            }
            (None, None) => None,
        };
        let title_set = resolved_title.is_some();
        let title = resolved_title.unwrap_or_else(|| {
            mapping
                .input
                .as_deref()
                .map(|input| input.file_name_string())
                .unwrap_or_default()
        });

        let id = self.nodes.len();
        debug!("Adding {title:?}({id}) from {:?}", mapping.input);
        if let Some(input) = &mapping.input {
            self.input_to_id.entry(input.normalize()).or_insert(id);
        }
        self.nodes.push(PageNode {
            input: mapping.input,
            input_exists: mapping.input_exists,
            output: mapping.output,
            options: mapping.options,
            title,
            title_set,
            document,
            parent,
            children: vec![],
            previous: None,
            next: None,
            unique_root: parent.is_none() && unique_root,
        });

        for child in mapping.children {
            let child_id = self.add(child, Some(id), false)?;
            self.nodes[id].children.push(child_id);
        }
        Ok(id)
    }

    fn check_unique_outputs(&self) -> Result<(), PublishError> {
        let mut outputs: HashMap<&Path, PageId> = HashMap::new();
        for id in self.published() {
            let Some(output) = &self.nodes[id].output else {
                continue;
            };
            if let Some(other) = outputs.insert(output, id) {
                return Err(PublishError::config(format!(
                    "{:?} and {:?} are both published to {output:?}",
                    self.nodes[other].input, self.nodes[id].input
                )));
            }
        }
        Ok(())
    }

    /// Set previous and next of every published page in traversal order
    fn link_pages(&mut self) {
        let published = self.published();
        for pair in published.windows(2) {
            self.nodes[pair[0]].next = Some(pair[1]);
            self.nodes[pair[1]].previous = Some(pair[0]);
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node ids in traversal order
    pub fn flatten(&self) -> Vec<PageId> {
        DFS::new(self).collect()
    }

    /// Ids of pages that are written to the output, in traversal order
    pub fn published(&self) -> Vec<PageId> {
        DFS::new(self)
            .filter(|id| self.nodes[*id].is_published())
            .collect()
    }

    /// Get all parents from a node, nearest first
    pub fn parents(&self, id: PageId) -> Vec<PageId> {
        let mut parent = self.nodes[id].parent;
        let mut parents = vec![];
        while let Some(p) = parent {
            parents.push(p);
            parent = self.nodes[p].parent;
        }
        parents
    }

    pub fn find_by_input(&self, input: &Path) -> Option<PageId> {
        self.input_to_id.get(&input.normalize()).copied()
    }

    /// Output of the page published from `input`
    pub fn output_of(&self, input: &Path) -> Option<&Path> {
        let id = self.find_by_input(input)?;
        self.nodes[id].output.as_deref()
    }
}

impl Tree for SiteTree {
    type Node = PageNode;

    fn roots(&self) -> &[PageId] {
        &self.roots
    }

    fn get(&self, id: PageId) -> Option<&Self::Node> {
        self.nodes.get(id)
    }
}

impl fmt::Display for SiteTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut queue: Vec<(PageId, usize)> = self.roots.iter().rev().map(|r| (*r, 0)).collect();
        while let Some((id, depth)) = queue.pop() {
            let node = &self.nodes[id];
            queue.extend(node.children.iter().rev().map(|c| (*c, depth + 1)));
            let kind = if node.is_published() {
                "Page"
            } else {
                "Container"
            };
            write!(f, "{}{}({id})({kind})", "  ".repeat(depth), node.title)?;
            if let Some(output) = &node.output {
                write!(f, " -> {}", output.to_slash_string())?;
            }
            if !queue.is_empty() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl Index<PageId> for SiteTree {
    type Output = PageNode;

    fn index(&self, index: PageId) -> &Self::Output {
        &self.nodes[index]
    }
}
impl IndexMut<PageId> for SiteTree {
    fn index_mut(&mut self, index: PageId) -> &mut Self::Output {
        &mut self.nodes[index]
    }
}
