// tests/config_load.rs

mod common;

use std::io::Write;

use cellgraph::config::{ExecutionRecord, SessionFile, load_and_validate};
use cellgraph::diagnostics::Diagnostic;
use cellgraph::execution::ExecutionId;
use cellgraph::graph::{GraphBuilder, NodeKey, Pipeline};
use cellgraph::types::{EdgeSource, IsolationMode, LayoutKind, PassKind};
use cellgraph_test_utils::builders::SessionFileBuilder;
use common::{init_tracing, set};
use tempfile::NamedTempFile;

#[test]
fn test_full_session_file_loads() {
    init_tracing();
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[config]
mode = "strict"
edge_source = "declared"
fail_fast = false
hidden_prefixes = ["__", "_ipy"]
passes = ["keep_latest_version", "drop_isolated"]

[render]
width = 600
layout = ["circular"]

[[execution]]
id = 1
name = "load"
annotation = "post(df)"
observed_post = ["df", "tmp", "_ipy_out"]

[[execution]]
id = 4
annotation = "pre(df) name(plot)"
observed_pre = ["df", "__builtins"]
"#
    )
    .unwrap();

    let session = load_and_validate(file.path()).unwrap();

    assert_eq!(session.config.mode, IsolationMode::Strict);
    assert_eq!(session.config.edge_source, EdgeSource::Declared);
    assert!(!session.config.fail_fast);
    assert_eq!(session.config.hidden_prefixes, vec!["__", "_ipy"]);
    assert_eq!(
        session.config.passes,
        vec![PassKind::KeepLatestVersion, PassKind::DropIsolated]
    );
    assert_eq!(session.render.width, 600);
    assert_eq!(session.render.height, 400);
    assert_eq!(session.render.layout, vec![LayoutKind::Circular]);
    assert_eq!(session.render.options().width, 600);

    let load = &session.executions[0];
    assert_eq!(load.unit_name(), "load");
    assert_eq!(load.declared_post, Some(set(&["df"])));
    assert_eq!(load.observed_post, set(&["df", "tmp"]));
    assert_eq!(load.pruned, set(&["tmp"]));

    let plot = &session.executions[1];
    assert_eq!(plot.unit_name(), "plot");
    assert_eq!(plot.declared_pre, Some(set(&["df"])));
    assert_eq!(plot.declared_post, None);
    assert_eq!(plot.observed_pre, set(&["df"]));

    assert_eq!(
        session.diagnostics,
        vec![Diagnostic::PostconditionViolation {
            execution: ExecutionId(1),
            missing: set(&[]),
            undeclared: set(&["tmp"]),
            pruned: true,
        }]
    );
}

#[test]
fn test_defaults_apply_when_sections_are_missing() {
    let session = SessionFileBuilder::new()
        .with_execution(1, "", &[], &["x"])
        .build();

    assert_eq!(session.config.mode, IsolationMode::Loose);
    assert_eq!(session.config.edge_source, EdgeSource::Observed);
    assert!(!session.config.fail_fast);
    assert_eq!(session.config.hidden_prefixes, vec!["__"]);
    assert_eq!(session.config.passes, Pipeline::recommended().passes());
    assert_eq!(session.render.scale, 1000.0);
    assert_eq!(session.render.font_size, 20.0);
    assert_eq!(session.render.padding, 0.01);
}

#[test]
fn test_explicit_lists_union_with_annotation_and_name_overrides() {
    let session = SessionFileBuilder::new()
        .with_record(ExecutionRecord {
            id: 1,
            name: Some("explicit".to_string()),
            annotation: Some("pre(a) name(from_annotation)".to_string()),
            pre: Some(vec!["b".to_string()]),
            post: Some(Vec::new()),
            ..ExecutionRecord::default()
        })
        .build();

    let execution = &session.executions[0];
    assert_eq!(execution.unit_name(), "explicit");
    assert_eq!(execution.declared_pre, Some(set(&["a", "b"])));
    assert_eq!(execution.declared_post, Some(set(&[])));
}

#[test]
fn test_loose_mode_reports_without_pruning() {
    let session = SessionFileBuilder::new()
        .mode(IsolationMode::Loose)
        .with_execution(1, "pre(a) post(b)", &["a", "c"], &["b"])
        .build();

    assert!(session.executions[0].pruned.is_empty());
    assert_eq!(
        session.diagnostics,
        vec![Diagnostic::PreconditionViolation {
            execution: ExecutionId(1),
            undeclared: set(&["c"]),
        }]
    );
}

#[test]
fn test_malformed_annotation_is_a_diagnostic_not_an_error() {
    let session = SessionFileBuilder::new()
        .mode(IsolationMode::Unprotected)
        .with_execution(1, "post(x", &[], &["x"])
        .build();

    assert_eq!(session.executions[0].declared_post, None);
    assert!(matches!(
        session.diagnostics.as_slice(),
        [Diagnostic::MalformedAnnotation { .. }]
    ));
}

#[test]
fn test_loaded_session_builds_expected_graph() {
    let session: SessionFile = SessionFileBuilder::new()
        .with_execution(1, "name(a)", &[], &["x"])
        .with_execution(2, "name(b)", &["x"], &["y"])
        .with_execution(3, "name(a)", &[], &["x"])
        .with_execution(4, "name(c)", &["x", "y"], &[])
        .build();

    let built = GraphBuilder::new(session.config.edge_source)
        .build(&session.executions)
        .unwrap();
    let graph = Pipeline::new(session.config.passes.clone()).apply(&built.graph);

    let three = NodeKey::Execution(ExecutionId(3));
    let two = NodeKey::Execution(ExecutionId(2));
    let four = NodeKey::Execution(ExecutionId(4));
    assert!(!graph.contains(NodeKey::Execution(ExecutionId(1))));
    assert_eq!(graph.edges_between(three, four), vec![&set(&["x"])]);
    assert_eq!(graph.edges_between(two, four), vec![&set(&["y"])]);
}
