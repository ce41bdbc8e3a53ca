// src/render/layout.rs

//! Pluggable position assignment.
//!
//! The renderer never lays anything out itself. A [`Layout`] maps the
//! graph's topology to raw 2D points in any finite range; [`LayoutChain`]
//! tries several layouts in order and always ends with one that cannot
//! fail, so rendering never aborts for lack of layout support.

use std::collections::HashMap;
use std::f64::consts::TAU;

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, warn};

use crate::render::geometry::Point;
use crate::types::LayoutKind;

/// Raw positions keyed by node index.
pub type Positions = HashMap<NodeIndex, Point>;

/// Structure-only view of a graph, shared by every layout.
pub type Topology = DiGraph<(), ()>;

/// Strip node and edge payloads from any graph.
pub fn topology_of<N, E>(graph: &DiGraph<N, E>) -> Topology {
    graph.map(|_, _| (), |_, _| ())
}

/// A position-assignment strategy.
pub trait Layout {
    fn name(&self) -> &str;

    /// Positions for every node, or `None` if this layout cannot handle
    /// the graph.
    fn positions(&self, topology: &Topology) -> Option<Positions>;
}

/// Longest-path layering: x is the layer, y the slot within the layer.
///
/// Only defined for acyclic graphs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayeredLayout;

impl Layout for LayeredLayout {
    fn name(&self) -> &str {
        "layered"
    }

    fn positions(&self, topology: &Topology) -> Option<Positions> {
        let order = toposort(topology, None).ok()?;

        let mut layer: HashMap<NodeIndex, usize> = HashMap::new();
        for &node in &order {
            let depth = topology
                .neighbors_directed(node, Direction::Incoming)
                .filter_map(|pred| layer.get(&pred))
                .map(|d| d + 1)
                .max()
                .unwrap_or(0);
            layer.insert(node, depth);
        }

        let mut slots: HashMap<usize, usize> = HashMap::new();
        let mut positions = Positions::new();
        for node in order {
            let depth = layer[&node];
            let slot = slots.entry(depth).or_insert(0);
            positions.insert(node, Point::new(depth as f64, *slot as f64));
            *slot += 1;
        }
        Some(positions)
    }
}

/// Nodes evenly spaced on a unit circle. Handles every graph.
#[derive(Debug, Clone, Copy, Default)]
pub struct CircularLayout;

impl Layout for CircularLayout {
    fn name(&self) -> &str {
        "circular"
    }

    fn positions(&self, topology: &Topology) -> Option<Positions> {
        let count = topology.node_count().max(1) as f64;
        Some(
            topology
                .node_indices()
                .enumerate()
                .map(|(i, node)| {
                    let angle = TAU * i as f64 / count;
                    (node, Point::new(angle.cos(), angle.sin()))
                })
                .collect(),
        )
    }
}

/// Caller-supplied positions; unusable unless every node has a finite one.
#[derive(Debug, Clone, Default)]
pub struct FixedLayout {
    positions: Positions,
}

impl FixedLayout {
    pub fn new(positions: Positions) -> Self {
        Self { positions }
    }
}

impl Layout for FixedLayout {
    fn name(&self) -> &str {
        "fixed"
    }

    fn positions(&self, topology: &Topology) -> Option<Positions> {
        topology
            .node_indices()
            .map(|node| {
                self.positions
                    .get(&node)
                    .filter(|p| p.is_finite())
                    .map(|&p| (node, p))
            })
            .collect()
    }
}

/// Ordered fallback list of layouts.
pub struct LayoutChain {
    layouts: Vec<Box<dyn Layout>>,
}

impl std::fmt::Debug for LayoutChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.layouts.iter().map(|l| l.name()))
            .finish()
    }
}

impl Default for LayoutChain {
    fn default() -> Self {
        Self::from_kinds(&[LayoutKind::Layered, LayoutKind::Circular])
    }
}

impl LayoutChain {
    pub fn new(layouts: Vec<Box<dyn Layout>>) -> Self {
        Self { layouts }
    }

    pub fn from_kinds(kinds: &[LayoutKind]) -> Self {
        let layouts = kinds
            .iter()
            .map(|kind| -> Box<dyn Layout> {
                match kind {
                    LayoutKind::Layered => Box::new(LayeredLayout),
                    LayoutKind::Circular => Box::new(CircularLayout),
                }
            })
            .collect();
        Self { layouts }
    }

    /// Put `layout` in front of the chain.
    pub fn preferring(mut self, layout: Box<dyn Layout>) -> Self {
        self.layouts.insert(0, layout);
        self
    }

    /// Positions from the first layout that supports the graph, falling
    /// back to [`CircularLayout`] when none does.
    pub fn positions(&self, topology: &Topology) -> Positions {
        for layout in &self.layouts {
            match layout.positions(topology) {
                Some(positions) => {
                    debug!(layout = layout.name(), "layout selected");
                    return positions;
                }
                None => warn!(layout = layout.name(), "layout unavailable; trying next"),
            }
        }
        CircularLayout.positions(topology).unwrap_or_default()
    }
}
