// src/graph/simplify.rs

//! Pure simplification passes over [`DependencyGraph`] values.
//!
//! Each pass reads one graph and returns a new one; the input is never
//! mutated. Passes compose in any order, but the order changes the result:
//!
//! - `drop_isolated → merge_parallel_edges → keep_latest_version`
//!   ([`Pipeline::recommended`]) folds every symbol into the merged edges
//!   before superseded versions disappear.
//! - Running `keep_latest_version` before `merge_parallel_edges` discards
//!   edges of superseded versions first, so the diagram carries fewer
//!   annotated symbols.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use tracing::debug;

use crate::execution::Symbol;
use crate::graph::{DepEdge, DepNode, DependencyGraph};
use crate::types::PassKind;

/// Remove nodes with no incident edges (the sentinel included).
pub fn drop_isolated(graph: &Arc<DependencyGraph>) -> Arc<DependencyGraph> {
    let g = graph.inner();
    let filtered = g.filter_map(
        |ix, node| {
            if g.neighbors_undirected(ix).next().is_some() {
                Some(node.clone())
            } else {
                None
            }
        },
        |_, edge| Some(edge.clone()),
    );
    DependencyGraph::derive(graph, filtered, PassKind::DropIsolated.as_str())
}

/// Collapse parallel edges between each ordered pair into one edge whose
/// symbol set is the union of the merged sets.
pub fn merge_parallel_edges(graph: &Arc<DependencyGraph>) -> Arc<DependencyGraph> {
    let g = graph.inner();

    let mut merged: BTreeMap<(NodeIndex, NodeIndex), BTreeSet<Symbol>> = BTreeMap::new();
    for edge in g.edge_references() {
        merged
            .entry((edge.source(), edge.target()))
            .or_default()
            .extend(edge.weight().symbols.iter().cloned());
    }

    // Keeping every node preserves node indices.
    let mut simple = g.filter_map(|_, node| Some(node.clone()), |_, _| None::<DepEdge>);
    for ((source, target), symbols) in merged {
        simple.add_edge(source, target, DepEdge { symbols });
    }

    DependencyGraph::derive(graph, simple, PassKind::MergeParallelEdges.as_str())
}

/// Keep, per unit, only the execution whose version is the latest one in
/// the unit's history. The sentinel node is kept.
pub fn keep_latest_version(graph: &Arc<DependencyGraph>) -> Arc<DependencyGraph> {
    let history = graph.history();
    let filtered = graph.inner().filter_map(
        |_, node| match node {
            DepNode::Sentinel => Some(node.clone()),
            DepNode::Execution(exec) => {
                if history.is_latest(&exec.unit, exec.version) {
                    Some(node.clone())
                } else {
                    debug!(unit = %exec.unit, id = %exec.id, version = exec.version, "dropping superseded version");
                    None
                }
            }
        },
        |_, edge| Some(edge.clone()),
    );
    DependencyGraph::derive(graph, filtered, PassKind::KeepLatestVersion.as_str())
}

/// Ordered list of passes applied to a freshly built graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    passes: Vec<PassKind>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::recommended()
    }
}

impl Pipeline {
    pub fn new(passes: Vec<PassKind>) -> Self {
        Self { passes }
    }

    /// `drop_isolated → merge_parallel_edges → keep_latest_version`.
    pub fn recommended() -> Self {
        Self::new(vec![
            PassKind::DropIsolated,
            PassKind::MergeParallelEdges,
            PassKind::KeepLatestVersion,
        ])
    }

    pub fn passes(&self) -> &[PassKind] {
        &self.passes
    }

    pub fn apply(&self, graph: &Arc<DependencyGraph>) -> Arc<DependencyGraph> {
        let mut current = Arc::clone(graph);
        for pass in &self.passes {
            current = match pass {
                PassKind::DropIsolated => drop_isolated(&current),
                PassKind::MergeParallelEdges => merge_parallel_edges(&current),
                PassKind::KeepLatestVersion => keep_latest_version(&current),
            };
            debug!(
                pass = %pass,
                nodes = current.node_count(),
                edges = current.edge_count(),
                "applied simplification pass"
            );
        }
        current
    }
}
