/// Implement this trait to get generic functionality over tree structures
pub trait Node {
    fn children(&self) -> &[usize];
}

/// Implement this trait to get generic functionality over forest structures
pub trait Tree {
    type Node: Node;
    /// Top level nodes in order
    fn roots(&self) -> &[usize];
    fn get(&self, id: usize) -> Option<&Self::Node>;
}

/// Pre-order depth first traversal, visiting siblings in their declared order
pub struct DFS<'n, T: Tree> {
    stack: Vec<usize>,
    tree: &'n T,
}

impl<'n, T: Tree> DFS<'n, T> {
    pub fn new(tree: &'n T) -> Self {
        let stack = tree.roots().iter().rev().copied().collect();
        DFS { stack, tree }
    }
}

impl<'n, T: Tree> Iterator for DFS<'n, T> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        if let Some(node) = self.tree.get(id) {
            self.stack.extend(node.children().iter().rev());
        }
        Some(id)
    }
}
