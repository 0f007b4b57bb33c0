//! Hierarchical view of a resolved set
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]. A package
//! reached through two parents appears twice, both nodes sharing one
//! descriptor.

use std::fmt::Write as _;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace};

use crate::package::{DependencyEdge, PackageDescriptor, ResolvedSet, normalize_id};

const INDENT: &str = "    ";

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("No resolved entry for {edge} required by {parent}")]
    MissingResolvedEntry { parent: String, edge: DependencyEdge },

    #[error("Circular dependency detected: {}", .path.join(" → "))]
    CyclicDependency { path: Vec<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    parent: Option<NodeId>,
    descriptor: Arc<PackageDescriptor>,
    incoming_edge: Option<DependencyEdge>,
    children: Vec<NodeId>,
    depth: usize,
}

impl TreeNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn descriptor(&self) -> &Arc<PackageDescriptor> {
        &self.descriptor
    }

    /// Edge declared by the parent that led here; `None` for the root
    pub fn incoming_edge(&self) -> Option<&DependencyEdge> {
        self.incoming_edge.as_ref()
    }

    /// Children in the order the dependencies were declared
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Line this node contributes to [`DependencyTree::render`]
    pub fn line(&self) -> String {
        let identity = self.descriptor.identity();
        match &self.incoming_edge {
            None => format!("{}  {{{}}}", identity, self.descriptor.platform()),
            Some(edge) => format!("{}{}  {}", INDENT.repeat(self.depth), identity, edge.range()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DependencyTree {
    nodes: Vec<TreeNode>,
}

impl DependencyTree {
    pub fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    pub fn root(&self) -> &TreeNode {
        &self.nodes[0]
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a tree has at least its root
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Maximum node depth, 0 for a root without dependencies
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(TreeNode::depth).max().unwrap_or(0)
    }

    /// Parents before children, siblings in declaration order
    pub fn pre_order(&self) -> PreOrder<'_> {
        PreOrder {
            tree: self,
            stack: vec![self.root_id()],
        }
    }

    /// Ids from the root down to `id`
    pub fn path_to(&self, id: NodeId) -> Vec<String> {
        let mut path = Vec::new();
        let mut current = self.get(id);
        while let Some(node) = current {
            path.push(node.descriptor.id().to_string());
            current = node.parent.and_then(|parent| self.get(parent));
        }
        path.reverse();
        path
    }

    /// One line per node, pre-order, each ending in a newline
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (_, node) in self.pre_order() {
            let line = node.line();
            debug!("{}", line);
            // Writing to a String cannot fail
            let _ = writeln!(out, "{}", line);
        }
        out
    }

    fn push(&mut self, node: TreeNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        if let Some(parent) = node.parent {
            self.nodes[parent.0].children.push(id);
        }
        self.nodes.push(node);
        id
    }
}

pub struct PreOrder<'a> {
    tree: &'a DependencyTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.get(id)?;
        self.stack.extend(node.children.iter().rev().copied());
        Some((id, node))
    }
}

/// Expands a resolved set into a [`DependencyTree`] following declared edges
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeBuilder;

impl TreeBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(
        &self,
        root: &Arc<PackageDescriptor>,
        resolved: &ResolvedSet,
    ) -> Result<DependencyTree, TreeError> {
        let mut tree = DependencyTree {
            nodes: vec![TreeNode {
                parent: None,
                descriptor: Arc::clone(root),
                incoming_edge: None,
                children: Vec::new(),
                depth: 0,
            }],
        };

        let mut pending = vec![tree.root_id()];
        while let Some(parent) = pending.pop() {
            let descriptor = Arc::clone(&tree.nodes[parent.0].descriptor);
            let depth = tree.nodes[parent.0].depth + 1;
            let mut added = Vec::with_capacity(descriptor.dependencies().len());

            for edge in descriptor.dependencies() {
                let child = resolved.get(edge.target_id()).ok_or_else(|| {
                    TreeError::MissingResolvedEntry {
                        parent: descriptor.identity().to_string(),
                        edge: edge.clone(),
                    }
                })?;

                if self.on_path(&tree, parent, child.id()) {
                    let mut path = tree.path_to(parent);
                    path.push(child.id().to_string());
                    return Err(TreeError::CyclicDependency { path });
                }

                trace!("{} -> {}", descriptor.identity(), child.identity());
                added.push(tree.push(TreeNode {
                    parent: Some(parent),
                    descriptor: Arc::clone(child),
                    incoming_edge: Some(edge.clone()),
                    children: Vec::new(),
                    depth,
                }));
            }

            pending.extend(added.into_iter().rev());
        }

        debug!("Built tree of {} nodes for {}", tree.len(), root.identity());
        Ok(tree)
    }

    /// Whether `id` already appears between the root and `node`
    fn on_path(&self, tree: &DependencyTree, node: NodeId, id: &str) -> bool {
        let id = normalize_id(id);
        let mut current = tree.get(node);
        while let Some(ancestor) = current {
            if normalize_id(ancestor.descriptor.id()) == id {
                return true;
            }
            current = ancestor.parent.and_then(|parent| tree.get(parent));
        }
        false
    }
}

#[cfg(test)]
mod tests {
    include!("tree.test.rs");
}
