// src/config/validate.rs

use std::collections::BTreeSet;

use crate::annotation::parse_annotation;
use crate::config::model::{
    ConfigSection, ExecutionRecord, RawSessionFile, RenderSection, SessionFile,
};
use crate::diagnostics::Diagnostic;
use crate::errors::{CellgraphError, Result};
use crate::execution::{Execution, ExecutionId, Symbol};
use crate::namespace::is_hidden_symbol;
use crate::session::enforce_on_record;

impl TryFrom<RawSessionFile> for SessionFile {
    type Error = CellgraphError;

    fn try_from(raw: RawSessionFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_session(&raw)?;

        let mut diagnostics = Vec::new();
        let mut executions = Vec::with_capacity(raw.execution.len());
        for record in &raw.execution {
            executions.push(execution_from_record(record, &raw.config, &mut diagnostics)?);
        }

        Ok(SessionFile::new_unchecked(
            raw.config,
            raw.render,
            executions,
            diagnostics,
        ))
    }
}

fn validate_raw_session(cfg: &RawSessionFile) -> Result<()> {
    ensure_has_executions(cfg)?;
    validate_passes(cfg)?;
    validate_render(&cfg.render)?;
    validate_execution_order(cfg)?;
    validate_symbols(cfg)?;
    Ok(())
}

fn ensure_has_executions(cfg: &RawSessionFile) -> Result<()> {
    if cfg.execution.is_empty() {
        return Err(CellgraphError::ConfigError(
            "session must contain at least one [[execution]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_passes(cfg: &RawSessionFile) -> Result<()> {
    if cfg.config.passes.is_empty() {
        return Err(CellgraphError::ConfigError(
            "[config].passes must name at least one pass (use --raw to skip simplification)"
                .to_string(),
        ));
    }
    Ok(())
}

fn validate_render(render: &RenderSection) -> Result<()> {
    if render.layout.is_empty() {
        return Err(CellgraphError::ConfigError(
            "[render].layout must name at least one layout".to_string(),
        ));
    }

    if render.width == 0 || render.height == 0 {
        return Err(CellgraphError::ConfigError(format!(
            "[render] width and height must be >= 1 (got {}x{})",
            render.width, render.height
        )));
    }

    let positive = [
        ("scale", render.scale),
        ("font_size", render.font_size),
        ("line_spacing", render.line_spacing),
        ("line_width", render.line_width),
    ];
    for (field, value) in positive {
        if !(value.is_finite() && value > 0.0) {
            return Err(CellgraphError::ConfigError(format!(
                "[render].{field} must be a positive number (got {value})"
            )));
        }
    }

    if !(0.0..0.5).contains(&render.padding) {
        return Err(CellgraphError::ConfigError(format!(
            "[render].padding must be in [0, 0.5) (got {})",
            render.padding
        )));
    }

    Ok(())
}

fn validate_execution_order(cfg: &RawSessionFile) -> Result<()> {
    let mut previous: Option<u64> = None;
    for record in cfg.execution.iter() {
        if let Some(prev) = previous {
            if record.id <= prev {
                return Err(CellgraphError::OutOfOrder {
                    previous: ExecutionId(prev),
                    current: ExecutionId(record.id),
                });
            }
        }
        previous = Some(record.id);
    }
    Ok(())
}

fn validate_symbols(cfg: &RawSessionFile) -> Result<()> {
    for record in cfg.execution.iter() {
        let lists = [
            ("observed_pre", Some(&record.observed_pre)),
            ("observed_post", Some(&record.observed_post)),
            ("pre", record.pre.as_ref()),
            ("post", record.post.as_ref()),
        ];
        for (field, symbols) in lists {
            for symbol in symbols.into_iter().flatten() {
                if symbol.trim().is_empty() || symbol.chars().any(char::is_whitespace) {
                    return Err(CellgraphError::ConfigError(format!(
                        "execution {} has invalid symbol '{}' in `{}`",
                        record.id, symbol, field
                    )));
                }
            }
        }
    }
    Ok(())
}

/// Build an execution from its record, then apply the isolation mode.
///
/// Recorded effects on hidden symbols are dropped, as the live tracker
/// never logs them.
fn execution_from_record(
    record: &ExecutionRecord,
    config: &ConfigSection,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Execution> {
    let (annotation, malformed) = record
        .annotation
        .as_deref()
        .map(parse_annotation)
        .unwrap_or_default();
    diagnostics.extend(malformed);

    let merge = |parsed: Option<BTreeSet<Symbol>>, explicit: &Option<Vec<String>>| {
        match (parsed, explicit) {
            (None, None) => None,
            (parsed, explicit) => {
                let mut set = parsed.unwrap_or_default();
                set.extend(explicit.iter().flatten().cloned());
                Some(set)
            }
        }
    };

    let mut execution = Execution {
        id: ExecutionId(record.id),
        name: record.name.clone().or(annotation.name),
        declared_pre: merge(annotation.pre, &record.pre),
        declared_post: merge(annotation.post, &record.post),
        observed_pre: visible(&record.observed_pre, &config.hidden_prefixes),
        observed_post: visible(&record.observed_post, &config.hidden_prefixes),
        pruned: BTreeSet::new(),
    };
    diagnostics.extend(enforce_on_record(
        &mut execution,
        config.mode,
        config.fail_fast,
    )?);
    Ok(execution)
}

fn visible(symbols: &[String], hidden_prefixes: &[String]) -> BTreeSet<Symbol> {
    symbols
        .iter()
        .filter(|symbol| !is_hidden_symbol(symbol, hidden_prefixes))
        .cloned()
        .collect()
}
