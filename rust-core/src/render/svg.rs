//! Minimal SVG document builder for the vector overlay
//!
//! Axes, stems, traces and labels are emitted as SVG and rasterized by resvg
//! on top of the heatmap pixels

use std::fmt::Write as _;

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(&self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// Accumulates SVG elements into a document string
pub struct SvgDocument {
    width: u32,
    height: u32,
    body: String,
}

impl SvgDocument {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            body: String::new(),
        }
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str, width: f64) {
        let _ = writeln!(
            self.body,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{}"/>"#,
            x1, y1, x2, y2, stroke, width
        );
    }

    /// Open polyline through `points`; no-op for fewer than two points
    pub fn polyline(&mut self, points: &[(f64, f64)], stroke: &str, width: f64) {
        if points.len() < 2 {
            return;
        }
        let mut coords = String::with_capacity(points.len() * 16);
        for (x, y) in points {
            let _ = write!(coords, "{:.2},{:.2} ", x, y);
        }
        let _ = writeln!(
            self.body,
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linejoin="round"/>"#,
            coords.trim_end(),
            stroke,
            width
        );
    }

    /// Unfilled rectangle outline
    pub fn frame(&mut self, x: f64, y: f64, w: f64, h: f64, stroke: &str) {
        let _ = writeln!(
            self.body,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="none" stroke="{}" stroke-width="1"/>"#,
            x, y, w, h, stroke
        );
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: &str) {
        let _ = writeln!(
            self.body,
            r#"<circle cx="{:.2}" cy="{:.2}" r="{}" fill="{}"/>"#,
            cx, cy, r, fill
        );
    }

    pub fn text(&mut self, x: f64, y: f64, size: f64, anchor: Anchor, content: &str) {
        let _ = writeln!(
            self.body,
            r#"<text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="{}" text-anchor="{}" fill="black">{}</text>"#,
            x,
            y,
            size,
            anchor.as_str(),
            escape(content)
        );
    }

    /// Text rotated 90° counter-clockwise around its anchor point
    pub fn vertical_text(&mut self, x: f64, y: f64, size: f64, content: &str) {
        let _ = writeln!(
            self.body,
            r#"<text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="{}" text-anchor="middle" fill="black" transform="rotate(-90 {:.2} {:.2})">{}</text>"#,
            x,
            y,
            size,
            x,
            y,
            escape(content)
        );
    }

    pub fn finish(self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
{body}</svg>"#,
            w = self.width,
            h = self.height,
            body = self.body
        )
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b & c>\"d\""), "a&lt;b &amp; c&gt;&quot;d&quot;");
    }

    #[test]
    fn test_document_structure() {
        let mut doc = SvgDocument::new(100, 50);
        doc.line(0.0, 0.0, 10.0, 10.0, "black", 1.0);
        doc.text(5.0, 5.0, 12.0, Anchor::Middle, "Time [s]");
        let svg = doc.finish();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="100" height="50""#));
        assert!(svg.contains("<line"));
        assert!(svg.contains(r#"text-anchor="middle""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_degenerate_polyline_skipped() {
        let mut doc = SvgDocument::new(10, 10);
        doc.polyline(&[(1.0, 1.0)], "blue", 1.0);
        assert!(!doc.finish().contains("polyline"));
    }
}
