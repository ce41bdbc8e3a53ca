// src/lib.rs

pub mod annotation;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod diagram;
pub mod errors;
pub mod execution;
pub mod graph;
pub mod history;
pub mod logging;
pub mod namespace;
pub mod render;
pub mod session;
pub mod types;

use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::load_from_path;
use crate::config::model::SessionFile;
use crate::diagram::render_dependency_graph;
use crate::graph::{DependencyGraph, GraphBuilder, NodeKey, Pipeline};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - session file loading (clauses parsed, isolation mode applied)
/// - graph building and the configured simplification passes
/// - layout selection and SVG rendering (or a textual dry run)
pub fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config.clone();
    let mut raw = load_from_path(&config_path)
        .with_context(|| format!("loading session file {:?}", config_path))?;
    if let Some(mode) = args.mode {
        debug!(?mode, "isolation mode overridden on the command line");
        raw.config.mode = mode;
    }
    if let Some(source) = args.edge_source {
        debug!(?source, "edge source overridden on the command line");
        raw.config.edge_source = source;
    }
    let session = SessionFile::try_from(raw)
        .with_context(|| format!("validating session file {:?}", config_path))?;

    for diagnostic in &session.diagnostics {
        warn!(%diagnostic, "session diagnostic");
    }

    let built = GraphBuilder::new(session.config.edge_source).build(&session.executions)?;
    for diagnostic in &built.diagnostics {
        debug!(%diagnostic, "unresolved producer");
    }

    let graph = if args.raw {
        built.graph
    } else {
        Pipeline::new(session.config.passes.clone()).apply(&built.graph)
    };
    info!(stages = ?graph.lineage(), nodes = graph.node_count(), "dependency graph ready");

    if args.dry_run {
        print_dry_run(&session, &graph);
        return Ok(());
    }

    let svg = render_dependency_graph(
        &graph,
        &session.render.layouts(),
        &session.render.options(),
    );

    match &args.output {
        Some(path) => {
            fs::write(path, svg).with_context(|| format!("writing diagram to {:?}", path))?;
            info!(path = ?path, "diagram written");
        }
        None => print!("{svg}"),
    }
    Ok(())
}

/// Simple dry-run output: executions, the resulting edges and diagnostics.
fn print_dry_run(session: &SessionFile, graph: &Arc<DependencyGraph>) {
    println!("cellgraph dry-run");
    println!("  config.mode = {:?}", session.config.mode);
    println!("  config.edge_source = {:?}", session.config.edge_source);
    println!("  stages = {}", graph.lineage().join(" -> "));
    println!();

    println!("executions ({}):", session.executions.len());
    for execution in &session.executions {
        let unit = execution.unit_name();
        let version = graph
            .history()
            .sequence(&unit)
            .and_then(|seq| seq.version_of(execution.id));
        match version {
            Some(v) => println!("  - {} ({} v{})", execution.id, unit, v),
            None => println!("  - {} ({})", execution.id, unit),
        }
        if let Some(ref pre) = execution.declared_pre {
            println!("      pre: {:?}", pre);
        }
        if let Some(ref post) = execution.declared_post {
            println!("      post: {:?}", post);
        }
        println!("      observed_pre: {:?}", execution.observed_pre);
        println!("      observed_post: {:?}", execution.observed_post);
        if !execution.pruned.is_empty() {
            println!("      pruned: {:?}", execution.pruned);
        }
        let kept = graph.contains(NodeKey::Execution(execution.id));
        println!("      in graph: {kept}");
    }
    println!();

    println!("edges ({}):", graph.edge_count());
    for (from, to, symbols) in graph.edges() {
        println!("  {from} -> {to} {:?}", symbols);
    }

    if !session.diagnostics.is_empty() {
        println!();
        println!("diagnostics ({}):", session.diagnostics.len());
        for diagnostic in &session.diagnostics {
            println!("  {diagnostic}");
        }
    }

    debug!("dry-run complete (nothing rendered)");
}
