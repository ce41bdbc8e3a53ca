// src/render/mod.rs

//! Graph → SVG rendering from externally supplied positions.
//!
//! - [`geometry`] sizes label boxes, normalizes positions and picks the
//!   face of a box an edge attaches to.
//! - [`layout`] holds the pluggable position strategies and their
//!   fallback chain.
//! - [`svg`] writes the document.
//!
//! [`render_svg`] is a pure function of the graph, the positions and the
//! two label formatters.

pub mod geometry;
pub mod layout;
mod svg;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::debug;

use crate::render::geometry::{
    Point, Size, anchor, center, clip, face_towards, label_rotation, label_size, normalize,
};
use crate::render::svg::SvgWriter;

pub use layout::{
    CircularLayout, FixedLayout, LayeredLayout, Layout, LayoutChain, Positions, Topology,
    topology_of,
};

/// Optional presentation hints attached to a formatted label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleHints {
    pub stroke: Option<String>,
    pub fill: Option<String>,
    pub dasharray: Option<String>,
    pub class: Option<String>,
}

/// Text plus style hints produced by a node or edge formatter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Label {
    pub text: String,
    pub style: StyleHints,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: StyleHints::default(),
        }
    }

    pub fn with_style(mut self, style: StyleHints) -> Self {
        self.style = style;
        self
    }
}

/// Canvas and font metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Document width in pixels.
    pub width: u32,
    /// Document height in pixels.
    pub height: u32,
    /// Size of the internal coordinate system (`viewBox` is `0 0 scale scale`).
    pub scale: f64,
    pub font_size: f64,
    pub line_spacing: f64,
    /// Margin kept free on every side, as a fraction of the drawing.
    pub padding: f64,
    pub line_width: f64,
    pub font_family: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            scale: 1000.0,
            font_size: 20.0,
            line_spacing: 2.0,
            padding: 0.01,
            line_width: 2.0,
            font_family: "monospace".to_string(),
        }
    }
}

/// Default node label: `Node[<index>]`.
pub fn default_node_label<N>(node: NodeIndex, _data: &N) -> Label {
    Label::new(format!("Node[{}]", node.index()))
}

/// Default edge label: `Edge[<from>, <to>]`.
pub fn default_edge_label<E>(from: NodeIndex, to: NodeIndex, _data: &E) -> Label {
    Label::new(format!("Edge[{}, {}]", from.index(), to.index()))
}

/// Render `graph` as a self-contained SVG document.
///
/// Positions may use any finite range; they are normalized per axis, and
/// each box is then clipped to stay inside the padded drawing area. Nodes
/// missing from `positions` (or with non-finite coordinates) are placed in
/// the middle of the drawing.
pub fn render_svg<N, E, NF, EF>(
    graph: &DiGraph<N, E>,
    positions: &Positions,
    node_formatter: NF,
    edge_formatter: EF,
    options: &RenderOptions,
) -> String
where
    NF: Fn(NodeIndex, &N) -> Label,
    EF: Fn(NodeIndex, NodeIndex, &E) -> Label,
{
    let nodes: Vec<NodeIndex> = graph.node_indices().collect();
    let labels: Vec<Label> = nodes.iter().map(|&n| node_formatter(n, &graph[n])).collect();
    let sizes: Vec<Size> = labels.iter().map(|l| label_size(&l.text, options)).collect();

    let placed: Vec<usize> = nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| positions.get(*n).is_some_and(Point::is_finite))
        .map(|(i, _)| i)
        .collect();
    let raw: Vec<Point> = placed.iter().map(|&i| positions[&nodes[i]]).collect();

    let mut corners = vec![Point::new(0.5, 0.5); nodes.len()];
    for (&i, p) in placed.iter().zip(normalize(&raw)) {
        corners[i] = p;
    }
    for (corner, size) in corners.iter_mut().zip(&sizes) {
        *corner = clip(*corner, *size, options.padding);
    }

    debug!(
        nodes = nodes.len(),
        edges = graph.edge_count(),
        unplaced = nodes.len() - placed.len(),
        "rendering svg"
    );

    let mut svg = SvgWriter::new(options);

    for (i, label) in labels.iter().enumerate() {
        svg.node(
            corners[i].scaled(options.scale),
            sizes[i].scaled(options.scale),
            &label.text,
            &label.style,
        );
    }

    for edge in graph.edge_references() {
        let (u, v) = (edge.source().index(), edge.target().index());
        let label = edge_formatter(edge.source(), edge.target(), edge.weight());

        let cu = center(corners[u], sizes[u]);
        let cv = center(corners[v], sizes[v]);
        let from = anchor(corners[u], sizes[u], face_towards(cu, cv)).scaled(options.scale);
        let to = anchor(corners[v], sizes[v], face_towards(cv, cu)).scaled(options.scale);

        svg.edge(from, to, &label.text, label_rotation(from, to), &label.style);
    }

    svg.finish()
}
