// tests/builder.rs

mod common;

use cellgraph::diagnostics::Diagnostic;
use cellgraph::errors::CellgraphError;
use cellgraph::execution::{Execution, ExecutionId};
use cellgraph::graph::{GraphBuilder, NodeKey};
use cellgraph::types::EdgeSource;
use cellgraph_test_utils::builders::ExecutionBuilder;
use common::{init_tracing, set};

fn exec(id: u64) -> NodeKey {
    NodeKey::Execution(ExecutionId(id))
}

fn declared_chain() -> Vec<Execution> {
    vec![
        ExecutionBuilder::new(1).post(&["x"]).build(),
        ExecutionBuilder::new(2).pre(&["x"]).post(&["y"]).build(),
        ExecutionBuilder::new(3).pre(&["x"]).build(),
        ExecutionBuilder::new(4).pre(&["z"]).build(),
    ]
}

#[test]
fn test_edges_link_latest_producer_or_sentinel() {
    init_tracing();
    for source in [EdgeSource::Observed, EdgeSource::Declared] {
        let out = GraphBuilder::new(source).build(&declared_chain()).unwrap();
        let graph = &out.graph;

        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.edges_between(exec(1), exec(2)), vec![&set(&["x"])]);
        assert_eq!(graph.edges_between(exec(1), exec(3)), vec![&set(&["x"])]);
        assert_eq!(
            graph.edges_between(NodeKey::Sentinel, exec(4)),
            vec![&set(&["z"])]
        );
        assert!(
            graph
                .edges()
                .iter()
                .all(|(_, to, _)| *to != NodeKey::Sentinel)
        );

        assert_eq!(
            out.diagnostics,
            vec![Diagnostic::UnresolvedProducer {
                consumer: ExecutionId(4),
                symbol: "z".to_string(),
            }]
        );
        assert_eq!(graph.stage(), "build");
        assert!(graph.parent().is_none());
    }
}

#[test]
fn test_most_recent_writer_wins() {
    let executions = vec![
        Execution::observed(1, Vec::<&str>::new(), ["x"]),
        Execution::observed(2, Vec::<&str>::new(), ["x"]),
        Execution::observed(3, ["x"], Vec::<&str>::new()),
    ];
    let graph = GraphBuilder::default().build(&executions).unwrap().graph;

    assert!(graph.edges_between(exec(1), exec(3)).is_empty());
    assert_eq!(graph.edges_between(exec(2), exec(3)), vec![&set(&["x"])]);
}

#[test]
fn test_read_and_write_same_symbol_does_not_self_loop() {
    let executions = vec![
        Execution::observed(1, Vec::<&str>::new(), ["n"]),
        Execution::observed(2, ["n"], ["n"]),
        Execution::observed(3, ["n"], Vec::<&str>::new()),
    ];
    let graph = GraphBuilder::default().build(&executions).unwrap().graph;

    assert!(graph.edges_between(exec(2), exec(2)).is_empty());
    assert_eq!(graph.edges_between(exec(1), exec(2)), vec![&set(&["n"])]);
    assert_eq!(graph.edges_between(exec(2), exec(3)), vec![&set(&["n"])]);
}

#[test]
fn test_one_edge_per_symbol_before_merging() {
    let executions = vec![
        Execution::observed(1, Vec::<&str>::new(), ["a", "b"]),
        Execution::observed(2, ["a", "b"], Vec::<&str>::new()),
    ];
    let graph = GraphBuilder::default().build(&executions).unwrap().graph;
    let between = graph.edges_between(exec(1), exec(2));
    assert_eq!(between.len(), 2);
    assert!(between.contains(&&set(&["a"])));
    assert!(between.contains(&&set(&["b"])));
}

#[test]
fn test_versions_follow_unit_history() {
    let executions = vec![
        ExecutionBuilder::new(5).name("foo").build(),
        ExecutionBuilder::new(7).name("bar").build(),
        ExecutionBuilder::new(9).name("foo").build(),
        ExecutionBuilder::new(14).name("foo").build(),
    ];
    let graph = GraphBuilder::default().build(&executions).unwrap().graph;

    let versions: Vec<(u64, usize)> = graph
        .inner()
        .node_weights()
        .filter_map(|n| n.as_execution())
        .map(|n| (n.id.as_u64(), n.version))
        .collect();
    assert_eq!(versions, vec![(5, 0), (7, 0), (9, 1), (14, 2)]);

    let foo = graph.history().sequence("foo").unwrap();
    assert_eq!(
        foo.ids(),
        &[ExecutionId(5), ExecutionId(9), ExecutionId(14)]
    );
    assert_eq!(foo.latest_version(), Some(2));
    assert!(graph.history().is_latest("foo", 2));
    assert!(!graph.history().is_latest("foo", 1));
}

#[test]
fn test_anonymous_units_are_named_by_id() {
    let executions = vec![Execution::observed(3, Vec::<&str>::new(), ["a"])];
    let graph = GraphBuilder::default().build(&executions).unwrap().graph;
    let node = graph.inner().node_weights().find_map(|n| n.as_execution()).unwrap();
    assert_eq!(node.unit, "3");
    assert_eq!(node.version, 0);
}

#[test]
fn test_pruned_symbols_never_produce_edges() {
    let mut first = Execution::observed(1, Vec::<&str>::new(), ["kept", "dropped"]);
    first.pruned = set(&["dropped"]);
    let executions = vec![
        first,
        Execution::observed(2, ["kept", "dropped"], Vec::<&str>::new()),
    ];
    let graph = GraphBuilder::default().build(&executions).unwrap().graph;

    assert_eq!(graph.edges_between(exec(1), exec(2)), vec![&set(&["kept"])]);
    assert_eq!(
        graph.edges_between(NodeKey::Sentinel, exec(2)),
        vec![&set(&["dropped"])]
    );
}

#[test]
fn test_declared_source_falls_back_to_observed_without_clause() {
    let executions = vec![
        ExecutionBuilder::new(1).writes(&["x"]).declared_post(&["y"]).build(),
        ExecutionBuilder::new(2).reads(&["x"]).build(),
        ExecutionBuilder::new(3).reads(&["x"]).declared_pre(&["y"]).build(),
    ];

    let observed = GraphBuilder::new(EdgeSource::Observed)
        .build(&executions)
        .unwrap()
        .graph;
    assert_eq!(observed.edges_between(exec(1), exec(2)), vec![&set(&["x"])]);
    assert_eq!(observed.edges_between(exec(1), exec(3)), vec![&set(&["x"])]);

    let declared = GraphBuilder::new(EdgeSource::Declared)
        .build(&executions)
        .unwrap()
        .graph;
    assert_eq!(
        declared.edges_between(NodeKey::Sentinel, exec(2)),
        vec![&set(&["x"])]
    );
    assert_eq!(declared.edges_between(exec(1), exec(3)), vec![&set(&["y"])]);
}

#[test]
fn test_out_of_order_ids_are_rejected() {
    let executions = vec![
        Execution::observed(2, Vec::<&str>::new(), ["a"]),
        Execution::observed(2, ["a"], Vec::<&str>::new()),
    ];
    match GraphBuilder::default().build(&executions) {
        Err(CellgraphError::OutOfOrder { previous, current }) => {
            assert_eq!(previous, ExecutionId(2));
            assert_eq!(current, ExecutionId(2));
        }
        Err(e) => panic!("Expected OutOfOrder error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_empty_history_has_only_sentinel() {
    let graph = GraphBuilder::default().build(&[]).unwrap().graph;
    assert_eq!(graph.node_keys(), vec![NodeKey::Sentinel]);
    assert_eq!(graph.edge_count(), 0);
}
