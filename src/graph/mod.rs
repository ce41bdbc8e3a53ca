// src/graph/mod.rs

//! Version-aware dependency graphs over executions.
//!
//! - [`builder`] turns an ordered execution sequence into the initial
//!   producer → consumer multigraph.
//! - [`simplify`] holds the pure passes (drop isolated nodes, merge
//!   parallel edges, keep latest version) and the [`Pipeline`] that
//!   composes them.
//!
//! A [`DependencyGraph`] is immutable once built. Every pass returns a new
//! value that keeps an `Arc` to the graph it was derived from.

pub mod builder;
pub mod simplify;

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::execution::{ExecutionId, Symbol, UnitName};
use crate::history::UnitHistory;

pub use builder::{BuildOutput, GraphBuilder};
pub use simplify::{Pipeline, drop_isolated, keep_latest_version, merge_parallel_edges};

/// Stable identity of a node across derived graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKey {
    /// The reserved "no known producer" node.
    Sentinel,
    Execution(ExecutionId),
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Sentinel => f.write_str("sentinel"),
            NodeKey::Execution(id) => write!(f, "{id}"),
        }
    }
}

/// Node payload for one execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionNode {
    pub id: ExecutionId,
    pub unit: UnitName,
    pub version: usize,
    /// Effective pre-set used to build incoming edges.
    pub pre: BTreeSet<Symbol>,
    /// Effective post-set used to resolve later readers.
    pub post: BTreeSet<Symbol>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepNode {
    Sentinel,
    Execution(ExecutionNode),
}

impl DepNode {
    pub fn key(&self) -> NodeKey {
        match self {
            DepNode::Sentinel => NodeKey::Sentinel,
            DepNode::Execution(node) => NodeKey::Execution(node.id),
        }
    }

    pub fn as_execution(&self) -> Option<&ExecutionNode> {
        match self {
            DepNode::Execution(node) => Some(node),
            DepNode::Sentinel => None,
        }
    }
}

/// Symbols flowing from producer to consumer.
///
/// Always a set, so parallel edges can be merged by union.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepEdge {
    pub symbols: BTreeSet<Symbol>,
}

impl DepEdge {
    pub fn single(symbol: impl Into<Symbol>) -> Self {
        Self {
            symbols: BTreeSet::from([symbol.into()]),
        }
    }
}

/// Immutable dependency graph value.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    graph: DiGraph<DepNode, DepEdge>,
    history: Arc<UnitHistory>,
    stage: &'static str,
    parent: Option<Arc<DependencyGraph>>,
}

impl DependencyGraph {
    pub(crate) fn new(
        graph: DiGraph<DepNode, DepEdge>,
        history: Arc<UnitHistory>,
        stage: &'static str,
        parent: Option<Arc<DependencyGraph>>,
    ) -> Self {
        Self {
            graph,
            history,
            stage,
            parent,
        }
    }

    /// Derive a new graph from `parent`, sharing its history snapshot.
    pub(crate) fn derive(
        parent: &Arc<DependencyGraph>,
        graph: DiGraph<DepNode, DepEdge>,
        stage: &'static str,
    ) -> Arc<Self> {
        Arc::new(Self::new(
            graph,
            Arc::clone(&parent.history),
            stage,
            Some(Arc::clone(parent)),
        ))
    }

    /// Underlying petgraph value (read-only).
    pub fn inner(&self) -> &DiGraph<DepNode, DepEdge> {
        &self.graph
    }

    /// Unit history snapshot taken when the root graph was built.
    pub fn history(&self) -> &UnitHistory {
        &self.history
    }

    /// Name of the step that produced this graph (`"build"` for the root).
    pub fn stage(&self) -> &'static str {
        self.stage
    }

    pub fn parent(&self) -> Option<&Arc<DependencyGraph>> {
        self.parent.as_ref()
    }

    /// Stage names from the root graph down to this one.
    pub fn lineage(&self) -> Vec<&'static str> {
        let mut stages = vec![self.stage];
        let mut cursor = self.parent.as_deref();
        while let Some(graph) = cursor {
            stages.push(graph.stage);
            cursor = graph.parent.as_deref();
        }
        stages.reverse();
        stages
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node_index(&self, key: NodeKey) -> Option<NodeIndex> {
        self.graph
            .node_indices()
            .find(|&ix| self.graph[ix].key() == key)
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.node_index(key).is_some()
    }

    /// Keys of all nodes, in graph order.
    pub fn node_keys(&self) -> Vec<NodeKey> {
        self.graph.node_weights().map(DepNode::key).collect()
    }

    /// `(producer, consumer, symbols)` for every edge, in graph order.
    pub fn edges(&self) -> Vec<(NodeKey, NodeKey, &BTreeSet<Symbol>)> {
        self.graph
            .edge_references()
            .map(|e| {
                (
                    self.graph[e.source()].key(),
                    self.graph[e.target()].key(),
                    &e.weight().symbols,
                )
            })
            .collect()
    }

    /// Symbol sets of every edge from `producer` to `consumer`.
    pub fn edges_between(&self, producer: NodeKey, consumer: NodeKey) -> Vec<&BTreeSet<Symbol>> {
        self.edges()
            .into_iter()
            .filter(|(from, to, _)| *from == producer && *to == consumer)
            .map(|(_, _, symbols)| symbols)
            .collect()
    }
}
