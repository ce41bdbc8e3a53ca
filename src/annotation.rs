// src/annotation.rs

//! Directive-line parsing for `pre(...)`, `post(...)` and `name(...)`.
//!
//! ```text
//! pre(a, b) post(c) name(load data)
//! ```
//!
//! - `pre` / `post` take comma-separated symbols; tokens are trimmed, empty
//!   tokens are dropped and repeated clauses of the same kind are unioned.
//! - `name` takes free text; the last occurrence wins.
//! - A missing clause means "unconstrained".
//!
//! A clause that fails to parse is reported as
//! [`Diagnostic::MalformedAnnotation`] and treated as absent. An unclosed
//! clause ends where the next clause opens, so later clauses still parse.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::diagnostics::Diagnostic;
use crate::execution::{Symbol, UnitName};

static CLAUSE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(pre|post|name)\(").expect("opener pattern is valid"));

/// Declared metadata extracted from one directive line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    pub pre: Option<BTreeSet<Symbol>>,
    pub post: Option<BTreeSet<Symbol>>,
    pub name: Option<UnitName>,
}

impl Annotation {
    pub fn is_empty(&self) -> bool {
        self.pre.is_none() && self.post.is_none() && self.name.is_none()
    }
}

/// Parse a directive line, returning the annotation and any malformed
/// clauses found along the way.
pub fn parse_annotation(line: &str) -> (Annotation, Vec<Diagnostic>) {
    let mut annotation = Annotation::default();
    let mut diagnostics = Vec::new();

    let openers: Vec<(String, usize, usize)> = CLAUSE_OPEN
        .captures_iter(line)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let kind = caps.get(1)?;
            Some((kind.as_str().to_lowercase(), whole.start(), whole.end()))
        })
        .collect();

    for (i, (kind, _, body_start)) in openers.iter().enumerate() {
        // A clause body never runs into the next clause.
        let body_end = openers.get(i + 1).map_or(line.len(), |next| next.1);
        let body = &line[*body_start..body_end];
        let Some(close) = body.find(')') else {
            diagnostics.push(Diagnostic::MalformedAnnotation {
                clause: kind.clone(),
                reason: "missing closing parenthesis".to_string(),
            });
            continue;
        };
        let contents = &body[..close];

        match kind.as_str() {
            "pre" | "post" => match parse_symbol_list(contents) {
                Ok(symbols) => {
                    let slot = if kind == "pre" {
                        &mut annotation.pre
                    } else {
                        &mut annotation.post
                    };
                    slot.get_or_insert_with(BTreeSet::new).extend(symbols);
                }
                Err(reason) => diagnostics.push(Diagnostic::MalformedAnnotation {
                    clause: kind.clone(),
                    reason,
                }),
            },
            _ => {
                let name = contents.trim();
                if name.is_empty() {
                    diagnostics.push(Diagnostic::MalformedAnnotation {
                        clause: kind.clone(),
                        reason: "empty unit name".to_string(),
                    });
                } else {
                    annotation.name = Some(name.to_string());
                }
            }
        }
    }

    for diagnostic in &diagnostics {
        debug!(%diagnostic, "ignoring malformed annotation clause");
    }

    (annotation, diagnostics)
}

fn parse_symbol_list(contents: &str) -> Result<BTreeSet<Symbol>, String> {
    let mut symbols = BTreeSet::new();
    for token in contents.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if token.chars().any(char::is_whitespace) || token.contains('(') {
            return Err(format!("invalid symbol '{token}'"));
        }
        symbols.insert(token.to_string());
    }
    Ok(symbols)
}
