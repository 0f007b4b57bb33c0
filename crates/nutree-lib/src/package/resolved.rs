//! The one-version-per-id outcome of resolution

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, HashMap};
use std::sync::Arc;
use tracing::trace;

use super::{PackageDescriptor, PackageError, normalize_id};

/// Immutable map of package id to the single chosen descriptor
///
/// Lookups are case-insensitive and iteration is ordered by lowercase id.
/// The root package is always present.
#[derive(Debug, Clone)]
pub struct ResolvedSet {
    entries: BTreeMap<String, Arc<PackageDescriptor>>,
    root_id: String,
}

impl ResolvedSet {
    /// Assemble a set from the root and every other chosen descriptor
    ///
    /// Fails if two descriptors share an id.
    pub fn new<I>(root: Arc<PackageDescriptor>, others: I) -> Result<Self, PackageError>
    where
        I: IntoIterator<Item = Arc<PackageDescriptor>>,
    {
        let root_id = normalize_id(root.id());
        let mut entries = BTreeMap::new();
        entries.insert(root_id.clone(), root);

        for descriptor in others {
            let key = normalize_id(descriptor.id());
            if entries.contains_key(&key) {
                return Err(PackageError::DuplicateResolvedEntry {
                    id: descriptor.id().to_string(),
                });
            }
            entries.insert(key, descriptor);
        }

        Ok(Self { entries, root_id })
    }

    pub fn get(&self, id: &str) -> Option<&Arc<PackageDescriptor>> {
        self.entries.get(&normalize_id(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(&normalize_id(id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn root(&self) -> &Arc<PackageDescriptor> {
        // Present by construction
        &self.entries[&self.root_id]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<PackageDescriptor>> {
        self.entries.values()
    }

    /// Edges point from dependency to dependent; undeclared targets are skipped
    fn dependency_graph(&self) -> (DiGraph<&str, ()>, HashMap<&str, NodeIndex>) {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();

        for (key, descriptor) in &self.entries {
            index.insert(key.as_str(), graph.add_node(descriptor.id()));
        }

        for (key, descriptor) in &self.entries {
            let dependent = index[key.as_str()];
            for edge in descriptor.dependencies() {
                let target = normalize_id(edge.target_id());
                if let Some(&dependency) = index.get(target.as_str()) {
                    graph.add_edge(dependency, dependent, ());
                }
            }
        }

        (graph, index)
    }

    /// Ids forming a dependency cycle, if any
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let (graph, _) = self.dependency_graph();
        tarjan_scc(&graph)
            .into_iter()
            .find(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|&node| graph.contains_edge(node, node))
            })
            .map(|component| {
                let mut ids: Vec<String> = component
                    .into_iter()
                    .map(|node| graph[node].to_string())
                    .collect();
                ids.sort_by_key(|id| normalize_id(id));
                ids
            })
    }

    /// Dependencies before dependents
    ///
    /// Among packages whose dependencies are all listed, the lowest id
    /// (case-insensitive) comes first, so the order is stable.
    pub fn install_order(&self) -> Result<Vec<Arc<PackageDescriptor>>, PackageError> {
        let (graph, _) = self.dependency_graph();

        let mut pending: Vec<usize> = graph
            .node_indices()
            .map(|node| {
                graph
                    .neighbors_directed(node, petgraph::Direction::Incoming)
                    .count()
            })
            .collect();

        let mut ready: BinaryHeap<Reverse<(String, NodeIndex)>> = graph
            .node_indices()
            .filter(|node| pending[node.index()] == 0)
            .map(|node| Reverse((normalize_id(graph[node]), node)))
            .collect();

        let mut ordered = Vec::with_capacity(self.entries.len());
        while let Some(Reverse((key, node))) = ready.pop() {
            trace!("Install order: {}", graph[node]);
            ordered.push(Arc::clone(&self.entries[&key]));

            for dependent in graph.neighbors_directed(node, petgraph::Direction::Outgoing) {
                pending[dependent.index()] -= 1;
                if pending[dependent.index()] == 0 {
                    ready.push(Reverse((normalize_id(graph[dependent]), dependent)));
                }
            }
        }

        if ordered.len() < self.entries.len() {
            let cycle = self
                .find_cycle()
                .map(|ids| ids.join(" → "))
                .unwrap_or_else(|| "unknown".to_string());
            return Err(PackageError::CyclicDependency { cycle });
        }

        Ok(ordered)
    }
}

#[cfg(test)]
mod tests {
    include!("resolved.test.rs");
}
