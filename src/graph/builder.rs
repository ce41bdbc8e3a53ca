// src/graph/builder.rs

//! Initial dependency multigraph from an ordered execution sequence.

use std::collections::HashMap;
use std::sync::Arc;

use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, info};

use crate::diagnostics::Diagnostic;
use crate::errors::{CellgraphError, Result};
use crate::execution::{Execution, Symbol};
use crate::graph::{DepEdge, DepNode, DependencyGraph, ExecutionNode};
use crate::history::UnitHistory;
use crate::types::EdgeSource;

/// Result of [`GraphBuilder::build`].
#[derive(Debug, Clone)]
pub struct BuildOutput {
    /// One edge per producer/symbol/consumer triple, plus the sentinel node.
    pub graph: Arc<DependencyGraph>,
    /// One [`Diagnostic::UnresolvedProducer`] per sentinel edge.
    pub diagnostics: Vec<Diagnostic>,
}

/// Builds the producer → consumer multigraph.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphBuilder {
    source: EdgeSource,
}

impl GraphBuilder {
    pub fn new(source: EdgeSource) -> Self {
        Self { source }
    }

    /// Scan `executions` in id order and link every consumed symbol to its
    /// most recent earlier producer, or to the sentinel node.
    ///
    /// Ids must strictly increase; edges therefore only point from earlier
    /// to later executions and the result is acyclic. Reads are resolved
    /// before the execution's own writes are recorded, so no execution
    /// depends on itself.
    pub fn build(&self, executions: &[Execution]) -> Result<BuildOutput> {
        let mut graph: DiGraph<DepNode, DepEdge> = DiGraph::new();
        let mut history = UnitHistory::new();
        let mut diagnostics = Vec::new();
        let mut last_writer: HashMap<Symbol, NodeIndex> = HashMap::new();

        let sentinel = graph.add_node(DepNode::Sentinel);
        let mut previous = None;

        for execution in executions {
            if let Some(prev) = previous {
                if execution.id <= prev {
                    return Err(CellgraphError::OutOfOrder {
                        previous: prev,
                        current: execution.id,
                    });
                }
            }
            previous = Some(execution.id);

            let unit = execution.unit_name();
            let version = history.append(&unit, execution.id);
            let pre = execution.effective_pre(self.source);
            let post = execution.effective_post(self.source);

            let node = graph.add_node(DepNode::Execution(ExecutionNode {
                id: execution.id,
                unit,
                version,
                pre: pre.clone(),
                post: post.clone(),
            }));

            for symbol in pre {
                match last_writer.get(&symbol) {
                    Some(&writer) => {
                        graph.add_edge(writer, node, DepEdge::single(symbol));
                    }
                    None => {
                        debug!(consumer = %execution.id, symbol = %symbol, "no producer; linking sentinel");
                        diagnostics.push(Diagnostic::UnresolvedProducer {
                            consumer: execution.id,
                            symbol: symbol.clone(),
                        });
                        graph.add_edge(sentinel, node, DepEdge::single(symbol));
                    }
                }
            }

            for symbol in post {
                last_writer.insert(symbol, node);
            }
        }

        info!(
            executions = executions.len(),
            edges = graph.edge_count(),
            unresolved = diagnostics.len(),
            "built dependency multigraph"
        );

        Ok(BuildOutput {
            graph: Arc::new(DependencyGraph::new(
                graph,
                Arc::new(history),
                "build",
                None,
            )),
            diagnostics,
        })
    }
}
