// src/config/model.rs

use serde::Deserialize;

use crate::diagnostics::Diagnostic;
use crate::execution::Execution;
use crate::namespace::tracker::DEFAULT_HIDDEN_PREFIX;
use crate::render::{LayoutChain, RenderOptions};
use crate::types::{EdgeSource, IsolationMode, LayoutKind, PassKind};

/// Top-level session file as read from TOML.
///
/// ```toml
/// [config]
/// mode = "strict"
/// passes = ["drop_isolated", "merge_parallel_edges", "keep_latest_version"]
///
/// [render]
/// width = 600
/// layout = ["layered", "circular"]
///
/// [[execution]]
/// id = 1
/// name = "load"
/// annotation = "post(df)"
/// observed_post = ["df"]
/// ```
///
/// All sections except `[[execution]]` are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSessionFile {
    #[serde(default)]
    pub config: ConfigSection,

    #[serde(default)]
    pub render: RenderSection,

    /// Recorded executions, in the order they ran.
    #[serde(default)]
    pub execution: Vec<ExecutionRecord>,
}

/// Validated session file. Construct via `TryFrom<RawSessionFile>`.
#[derive(Debug, Clone)]
pub struct SessionFile {
    pub config: ConfigSection,
    pub render: RenderSection,
    /// Executions with clauses parsed and the isolation mode applied.
    pub executions: Vec<Execution>,
    /// Malformed annotations and clause violations found while loading.
    pub diagnostics: Vec<Diagnostic>,
}

impl SessionFile {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        render: RenderSection,
        executions: Vec<Execution>,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        Self {
            config,
            render,
            executions,
            diagnostics,
        }
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// `"unprotected"`, `"loose"` (default) or `"strict"`.
    #[serde(default)]
    pub mode: IsolationMode,

    /// `"observed"` (default) or `"declared"`.
    #[serde(default)]
    pub edge_source: EdgeSource,

    /// In strict mode, stop at the first clause violation.
    #[serde(default)]
    pub fail_fast: bool,

    /// Symbols starting with any of these prefixes are never tracked.
    #[serde(default = "default_hidden_prefixes")]
    pub hidden_prefixes: Vec<String>,

    /// Simplification passes, applied in order.
    #[serde(default = "default_passes")]
    pub passes: Vec<PassKind>,
}

fn default_hidden_prefixes() -> Vec<String> {
    vec![DEFAULT_HIDDEN_PREFIX.to_string()]
}

fn default_passes() -> Vec<PassKind> {
    vec![
        PassKind::DropIsolated,
        PassKind::MergeParallelEdges,
        PassKind::KeepLatestVersion,
    ]
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            mode: IsolationMode::default(),
            edge_source: EdgeSource::default(),
            fail_fast: false,
            hidden_prefixes: default_hidden_prefixes(),
            passes: default_passes(),
        }
    }
}

/// `[render]` section. Defaults match [`RenderOptions::default`].
#[derive(Debug, Clone, Deserialize)]
pub struct RenderSection {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_line_spacing")]
    pub line_spacing: f64,
    #[serde(default = "default_padding")]
    pub padding: f64,
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// Layouts to try, in order. Circular is always the last resort.
    #[serde(default = "default_layout")]
    pub layout: Vec<LayoutKind>,
}

fn default_width() -> u32 {
    400
}

fn default_height() -> u32 {
    400
}

fn default_scale() -> f64 {
    1000.0
}

fn default_font_size() -> f64 {
    20.0
}

fn default_line_spacing() -> f64 {
    2.0
}

fn default_padding() -> f64 {
    0.01
}

fn default_line_width() -> f64 {
    2.0
}

fn default_font_family() -> String {
    "monospace".to_string()
}

fn default_layout() -> Vec<LayoutKind> {
    vec![LayoutKind::Layered, LayoutKind::Circular]
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            scale: default_scale(),
            font_size: default_font_size(),
            line_spacing: default_line_spacing(),
            padding: default_padding(),
            line_width: default_line_width(),
            font_family: default_font_family(),
            layout: default_layout(),
        }
    }
}

impl RenderSection {
    pub fn options(&self) -> RenderOptions {
        RenderOptions {
            width: self.width,
            height: self.height,
            scale: self.scale,
            font_size: self.font_size,
            line_spacing: self.line_spacing,
            padding: self.padding,
            line_width: self.line_width,
            font_family: self.font_family.clone(),
        }
    }

    pub fn layouts(&self) -> LayoutChain {
        LayoutChain::from_kinds(&self.layout)
    }
}

/// One `[[execution]]` entry.
///
/// Declared clauses come from `annotation` (the unit's directive line)
/// and/or the explicit `pre` / `post` lists, which are unioned with it.
/// An explicit `name` overrides a `name(...)` clause.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecutionRecord {
    pub id: u64,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub annotation: Option<String>,

    #[serde(default)]
    pub pre: Option<Vec<String>>,

    #[serde(default)]
    pub post: Option<Vec<String>>,

    #[serde(default)]
    pub observed_pre: Vec<String>,

    #[serde(default)]
    pub observed_post: Vec<String>,
}
