//! Deterministic subgraph handed to formatters.
//!
//! A [`Subgraph`] is a resolved package set plus the import edges between
//! its members. Nodes are ordered by package identifier and each node's
//! imports are ordered the same way, so every formatter sees the same
//! sequence regardless of how the set was computed.

use crate::set::PackageSet;
use crate::universe::{Package, PackageId, Universe};
use std::collections::HashMap;

/// One node of a [`Subgraph`].
#[derive(Debug, Clone, Copy)]
pub struct Node<'g> {
    /// Position in the subgraph, `0..len()`
    pub index: usize,
    /// Identifier in the universe
    pub id: PackageId,
    /// Package metadata
    pub package: &'g Package,
}

/// Resolved set with import edges restricted to its members.
pub struct Subgraph<'u> {
    universe: &'u dyn Universe,
    nodes: Vec<(PackageId, &'u Package)>,
    /// Outgoing edges per node, as sorted node positions
    edges: Vec<Vec<usize>>,
}

impl<'u> Subgraph<'u> {
    /// Order `set` by identifier and keep only edges inside it.
    #[must_use]
    pub fn from_set(universe: &'u dyn Universe, set: &PackageSet) -> Self {
        let nodes: Vec<(PackageId, &'u Package)> = set
            .sorted(universe)
            .into_iter()
            .filter_map(|id| universe.package(id).map(|package| (id, package)))
            .collect();

        let position: HashMap<PackageId, usize> = nodes
            .iter()
            .enumerate()
            .map(|(index, (id, _))| (*id, index))
            .collect();

        let edges = nodes
            .iter()
            .map(|(id, _)| {
                let mut targets: Vec<usize> = universe
                    .imports(*id)
                    .iter()
                    .filter_map(|import| position.get(import).copied())
                    .collect();
                targets.sort_unstable();
                targets.dedup();
                targets
            })
            .collect();

        Self {
            universe,
            nodes,
            edges,
        }
    }

    /// Universe the nodes come from.
    #[must_use]
    pub fn universe(&self) -> &'u dyn Universe {
        self.universe
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the subgraph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node at `index`.
    #[must_use]
    pub fn node(&self, index: usize) -> Option<Node<'u>> {
        self.nodes.get(index).map(|(id, package)| Node {
            index,
            id: *id,
            package: *package,
        })
    }

    /// Nodes in identifier order.
    pub fn nodes(&self) -> impl Iterator<Item = Node<'u>> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, (id, package))| Node {
                index,
                id: *id,
                package: *package,
            })
    }

    /// Positions of the nodes imported by node `index`.
    #[must_use]
    pub fn imports(&self, index: usize) -> &[usize] {
        self.edges.get(index).map_or(&[], Vec::as_slice)
    }

    /// Every edge as `(from, to)` node positions, grouped by source.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .flat_map(|(from, targets)| targets.iter().map(move |to| (from, *to)))
    }

    /// Total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::universe::SnapshotBuilder;

    #[test]
    fn test_nodes_sorted_and_edges_restricted() {
        let snapshot = SnapshotBuilder::new()
            .package("c", &["a", "b", "outside"])
            .package("outside", &[])
            .package("b", &["a"])
            .package("a", &[])
            .build()
            .unwrap();
        let set: PackageSet = ["a", "b", "c"]
            .iter()
            .map(|name| snapshot.by_id(name).unwrap())
            .collect();

        let graph = Subgraph::from_set(&snapshot, &set);
        let names: Vec<_> = graph.nodes().map(|node| node.package.id.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(graph.imports(2), &[0, 1]);
        assert_eq!(graph.edges().collect::<Vec<_>>(), vec![(1, 0), (2, 0), (2, 1)]);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.node(1).unwrap().package.id, "b");
        assert!(graph.node(3).is_none());
    }

    #[test]
    fn test_empty_set() {
        let snapshot = SnapshotBuilder::new().package("a", &[]).build().unwrap();
        let graph = Subgraph::from_set(&snapshot, &PackageSet::new());
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }
}
