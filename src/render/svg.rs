// src/render/svg.rs

//! Minimal SVG document writer.

use std::fmt::Write;

use crate::render::geometry::{Point, Size};
use crate::render::{RenderOptions, StyleHints};

const ARROWHEAD_ID: &str = "arrowhead";

fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Format a coordinate with at most three decimals, without trailing zeros.
fn num(value: f64) -> String {
    let mut s = format!("{value:.3}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" { "0".to_string() } else { s }
}

fn style_attrs(style: &StyleHints, default_stroke: &str, default_fill: &str) -> String {
    let mut attrs = format!(
        r#" stroke="{}" fill="{}""#,
        escape_xml(style.stroke.as_deref().unwrap_or(default_stroke)),
        escape_xml(style.fill.as_deref().unwrap_or(default_fill)),
    );
    if let Some(dash) = &style.dasharray {
        let _ = write!(attrs, r#" stroke-dasharray="{}""#, escape_xml(dash));
    }
    if let Some(class) = &style.class {
        let _ = write!(attrs, r#" class="{}""#, escape_xml(class));
    }
    attrs
}

/// Accumulates an SVG document in memory.
pub(crate) struct SvgWriter<'a> {
    out: String,
    options: &'a RenderOptions,
}

impl<'a> SvgWriter<'a> {
    /// Document header with explicit size, normalized `viewBox` and the
    /// arrowhead marker definition.
    pub fn new(options: &'a RenderOptions) -> Self {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{}px" height="{}px" viewBox="0 0 {} {}">"#,
            options.width,
            options.height,
            num(options.scale),
            num(options.scale),
        );
        let _ = writeln!(
            out,
            r#"<defs><marker id="{ARROWHEAD_ID}" viewBox="0 0 1 1" refX="1" refY="0.5" markerWidth="20" markerHeight="20" markerUnits="strokeWidth" orient="auto"><polygon points="0,0.2 1,0.5 0,0.8" fill="black" stroke="none"/></marker></defs>"#
        );
        Self { out, options }
    }

    /// Rounded box with a vertically centred, possibly multi-line label.
    pub fn node(&mut self, corner: Point, size: Size, label: &str, style: &StyleHints) {
        let o = self.options;
        let _ = writeln!(
            self.out,
            r#"<g><rect x="{}" y="{}" width="{}" height="{}" rx="{}" ry="{}" stroke-width="{}"{}/>"#,
            num(corner.x),
            num(corner.y),
            num(size.width),
            num(size.height),
            num(o.font_size),
            num(o.font_size),
            num(o.line_width),
            style_attrs(style, "black", "none"),
        );

        let lines: Vec<&str> = label.split('\n').collect();
        let dy = o.line_spacing * o.font_size;
        let cx = corner.x + size.width * 0.5;
        let cy = corner.y + size.height * 0.5;
        let top = cy - 0.5 * dy * (lines.len() as f64 + 1.0);

        let _ = write!(
            self.out,
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}" text-anchor="middle" dominant-baseline="central">"#,
            num(cx),
            num(top),
            escape_xml(&o.font_family),
            num(o.font_size),
        );
        // Empty lines still take vertical space.
        let mut pending = dy;
        for line in lines {
            if line.is_empty() {
                pending += dy;
                continue;
            }
            let _ = write!(
                self.out,
                r#"<tspan x="{}" dy="{}">{}</tspan>"#,
                num(cx),
                num(pending),
                escape_xml(line),
            );
            pending = dy;
        }
        let _ = writeln!(self.out, "</text></g>");
    }

    /// Straight edge with an arrowhead at `to` and a label rotated by
    /// `rotation` degrees around the midpoint.
    pub fn edge(&mut self, from: Point, to: Point, label: &str, rotation: f64, style: &StyleHints) {
        let o = self.options;
        let mid = from.midpoint(&to);
        let _ = write!(
            self.out,
            r#"<g><path d="M {} {} L {} {}" stroke-width="{}" marker-end="url(#{ARROWHEAD_ID})"{}/>"#,
            num(from.x),
            num(from.y),
            num(to.x),
            num(to.y),
            num(o.line_width),
            style_attrs(style, "black", "none"),
        );
        if !label.is_empty() {
            let _ = write!(
                self.out,
                r#"<text x="{}" y="{}" font-family="{}" font-size="{}" text-anchor="middle" transform="rotate({} {} {}) translate(0 {})">{}</text>"#,
                num(mid.x),
                num(mid.y),
                escape_xml(&o.font_family),
                num(o.font_size),
                num(rotation),
                num(mid.x),
                num(mid.y),
                num(-0.5 * o.font_size),
                escape_xml(label),
            );
        }
        let _ = writeln!(self.out, "</g>");
    }

    pub fn finish(mut self) -> String {
        self.out.push_str("</svg>\n");
        self.out
    }
}
