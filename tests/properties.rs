// tests/properties.rs

mod common;

use std::collections::BTreeSet;

use cellgraph::execution::Execution;
use cellgraph::graph::{
    DependencyGraph, GraphBuilder, NodeKey, drop_isolated, keep_latest_version,
    merge_parallel_edges,
};
use cellgraph::namespace::{EffectTracker, Namespace};
use petgraph::algo::is_cyclic_directed;
use proptest::prelude::*;

const SYMBOLS: [&str; 5] = ["a", "b", "c", "d", "e"];

// One step: (unit index, read mask, write mask).
fn history_strategy(max_len: usize) -> impl Strategy<Value = Vec<Execution>> {
    proptest::collection::vec((0..4usize, 0..32u8, 0..32u8), 0..max_len).prop_map(|steps| {
        steps
            .into_iter()
            .enumerate()
            .map(|(i, (unit, reads, writes))| {
                let pick = |mask: u8| -> Vec<&str> {
                    SYMBOLS
                        .iter()
                        .enumerate()
                        .filter(|(bit, _)| mask & (1 << bit) != 0)
                        .map(|(_, s)| *s)
                        .collect()
                };
                let mut execution = Execution::observed(i as u64 + 1, pick(reads), pick(writes));
                execution.name = Some(format!("unit_{unit}"));
                execution
            })
            .collect()
    })
}

fn sorted_edges(graph: &DependencyGraph) -> Vec<(NodeKey, NodeKey, BTreeSet<String>)> {
    let mut edges: Vec<_> = graph
        .edges()
        .into_iter()
        .map(|(from, to, symbols)| (from, to, symbols.clone()))
        .collect();
    edges.sort();
    edges
}

fn node_set(graph: &DependencyGraph) -> BTreeSet<NodeKey> {
    graph.node_keys().into_iter().collect()
}

#[derive(Debug, Clone)]
enum Access {
    Read(usize),
    Write(usize),
    Delete(usize),
}

fn access_strategy() -> impl Strategy<Value = Access> {
    prop_oneof![
        (0..SYMBOLS.len()).prop_map(Access::Read),
        (0..SYMBOLS.len()).prop_map(Access::Write),
        (0..SYMBOLS.len()).prop_map(Access::Delete),
    ]
}

proptest! {
    #[test]
    fn test_version_is_position_in_unit_history(executions in history_strategy(24)) {
        let graph = GraphBuilder::default().build(&executions).unwrap().graph;

        for node in graph.inner().node_weights().filter_map(|n| n.as_execution()) {
            let earlier = executions
                .iter()
                .filter(|e| e.id < node.id && e.unit_name() == node.unit)
                .count();
            prop_assert_eq!(node.version, earlier);

            let seq = graph.history().sequence(&node.unit).unwrap();
            prop_assert_eq!(seq.version_of(node.id), Some(node.version));
        }
    }

    #[test]
    fn test_edges_point_forward_and_graph_is_acyclic(executions in history_strategy(24)) {
        let graph = GraphBuilder::default().build(&executions).unwrap().graph;

        prop_assert!(!is_cyclic_directed(graph.inner()));
        for (from, to, symbols) in graph.edges() {
            prop_assert_eq!(symbols.len(), 1);
            match (from, to) {
                (NodeKey::Execution(a), NodeKey::Execution(b)) => prop_assert!(a < b),
                (NodeKey::Sentinel, NodeKey::Execution(_)) => {}
                (_, NodeKey::Sentinel) => prop_assert!(false, "edge into sentinel"),
            }
        }
    }

    #[test]
    fn test_merge_parallel_edges_is_idempotent(executions in history_strategy(24)) {
        let raw = GraphBuilder::default().build(&executions).unwrap().graph;
        let once = merge_parallel_edges(&raw);
        let twice = merge_parallel_edges(&once);
        prop_assert_eq!(sorted_edges(&once), sorted_edges(&twice));

        // Merging never loses a (producer, consumer, symbol) triple.
        let flatten = |g: &DependencyGraph| -> BTreeSet<(NodeKey, NodeKey, String)> {
            g.edges()
                .into_iter()
                .flat_map(|(f, t, s)| s.iter().map(move |sym| (f, t, sym.clone())))
                .collect()
        };
        prop_assert_eq!(flatten(&raw), flatten(&once));
    }

    #[test]
    fn test_drop_isolated_commutes_with_merge(executions in history_strategy(24)) {
        let raw = GraphBuilder::default().build(&executions).unwrap().graph;
        let drop_then_merge = merge_parallel_edges(&drop_isolated(&raw));
        let merge_then_drop = drop_isolated(&merge_parallel_edges(&raw));
        prop_assert_eq!(node_set(&drop_then_merge), node_set(&merge_then_drop));
    }

    #[test]
    fn test_keep_latest_version_leaves_one_node_per_unit(executions in history_strategy(24)) {
        let raw = GraphBuilder::default().build(&executions).unwrap().graph;
        let latest = keep_latest_version(&raw);

        let mut units = BTreeSet::new();
        for node in latest.inner().node_weights().filter_map(|n| n.as_execution()) {
            prop_assert!(units.insert(node.unit.clone()), "unit {} kept twice", node.unit);
            prop_assert!(latest.history().is_latest(&node.unit, node.version));
        }
        prop_assert!(latest.contains(NodeKey::Sentinel));
    }

    #[test]
    fn test_tracker_pre_is_reads_before_first_write(ops in proptest::collection::vec(access_strategy(), 0..32)) {
        let namespace: Namespace<u32> = [("a", 0), ("b", 1)].into_iter().collect();
        let mut tracker = EffectTracker::new(namespace);

        let mut expected_pre = BTreeSet::new();
        let mut expected_post = BTreeSet::new();

        tracker.enter(None).unwrap();
        for op in &ops {
            match *op {
                Access::Read(i) => {
                    let symbol = SYMBOLS[i];
                    tracker.get(symbol);
                    if !expected_post.contains(symbol) {
                        expected_pre.insert(symbol.to_string());
                    }
                }
                Access::Write(i) => {
                    tracker.set(SYMBOLS[i], 7);
                    expected_post.insert(SYMBOLS[i].to_string());
                }
                Access::Delete(i) => {
                    tracker.remove(SYMBOLS[i]);
                    expected_post.insert(SYMBOLS[i].to_string());
                }
            }
        }
        let report = tracker.leave().unwrap();

        prop_assert_eq!(report.observed_pre, expected_pre);
        prop_assert_eq!(report.observed_post, expected_post);
    }
}
