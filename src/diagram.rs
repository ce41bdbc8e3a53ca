// src/diagram.rs

//! Labels and rendering for [`DependencyGraph`]s.

use petgraph::graph::NodeIndex;

use crate::graph::{DepEdge, DepNode, DependencyGraph};
use crate::render::{Label, LayoutChain, RenderOptions, StyleHints, render_svg, topology_of};

/// Text used for the sentinel node.
pub const SENTINEL_LABEL: &str = "(no producer)";

/// `<unit>` on the first line, `v<version> #<id>` on the second.
pub fn execution_label(_ix: NodeIndex, node: &DepNode) -> Label {
    match node {
        DepNode::Sentinel => Label::new(SENTINEL_LABEL).with_style(StyleHints {
            stroke: Some("gray".to_string()),
            dasharray: Some("8 4".to_string()),
            ..StyleHints::default()
        }),
        DepNode::Execution(exec) => {
            Label::new(format!("{}\nv{} #{}", exec.unit, exec.version, exec.id))
        }
    }
}

/// Comma-separated symbols carried by the edge.
pub fn symbols_label(_from: NodeIndex, _to: NodeIndex, edge: &DepEdge) -> Label {
    let text = edge
        .symbols
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    Label::new(text)
}

/// Lay out `graph` with the first usable layout in `layouts` and render it.
pub fn render_dependency_graph(
    graph: &DependencyGraph,
    layouts: &LayoutChain,
    options: &RenderOptions,
) -> String {
    let positions = layouts.positions(&topology_of(graph.inner()));
    render_svg(
        graph.inner(),
        &positions,
        execution_label,
        symbols_label,
        options,
    )
}
