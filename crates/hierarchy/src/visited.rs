use inspector_protocol::NodeId;
use std::collections::HashSet;

/// Nodes already counted for one open hierarchy.
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    marked: HashSet<NodeId>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.marked.contains(&node)
    }

    pub fn len(&self) -> usize {
        self.marked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marked.is_empty()
    }

    /// Mark every node of `path` not yet seen and return how many were new.
    ///
    /// Walks from the tail toward the root and stops at the first marked
    /// node: a node is only ever reached through its ancestors, so once one
    /// is marked all nodes above it are too.
    pub fn mark_branch(&mut self, path: &[NodeId]) -> usize {
        let mut newly_marked = 0;
        for &node in path.iter().rev() {
            if !self.marked.insert(node) {
                break;
            }
            newly_marked += 1;
        }
        newly_marked
    }
}
