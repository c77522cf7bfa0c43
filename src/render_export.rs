//! Headless SVG rendering.
//!
//! Backs the [`Canvas`] seam with an `svg` document so tracks can render
//! without a GUI, for report pages and for tests that assert on the
//! produced markup.

use std::mem;

use egui::{Color32, FontId, Pos2, Rect, Stroke};
use svg::node::element::{Line, Rectangle, Text};
use svg::Document;

use crate::canvas::Canvas;

fn hex_color(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

/// Rough monospace width; headless rendering has no font engine.
fn estimate_text_width(label: &str) -> f32 {
    (label.chars().count().max(1) as f32) * 6.5
}

pub struct SvgCanvas {
    width: f32,
    doc: Document,
}

impl SvgCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        let doc = Document::new()
            .set("viewBox", (0, 0, width as i64, height as i64))
            .set("width", width)
            .set("height", height)
            .add(
                Rectangle::new()
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", width)
                    .set("height", height)
                    .set("fill", "#ffffff"),
            );
        Self { width, doc }
    }

    fn push(&mut self, node: impl svg::Node) {
        let doc = mem::replace(&mut self.doc, Document::new());
        self.doc = doc.add(node);
    }

    pub fn into_svg_string(self) -> String {
        self.doc.to_string()
    }
}

impl Canvas for SvgCanvas {
    fn width(&self) -> f32 {
        self.width
    }

    fn fill_rect(&mut self, rect: Rect, color: Color32) {
        self.push(
            Rectangle::new()
                .set("x", rect.min.x)
                .set("y", rect.min.y)
                .set("width", rect.width())
                .set("height", rect.height())
                .set("fill", hex_color(color)),
        );
    }

    fn fill_text(&mut self, pos: Pos2, text: &str, font: &FontId, color: Color32) {
        // SVG anchors text on the baseline; approximate the ascent.
        self.push(
            Text::new(text)
                .set("x", pos.x)
                .set("y", pos.y + font.size * 0.8)
                .set("font-family", "monospace")
                .set("font-size", font.size)
                .set("fill", hex_color(color)),
        );
    }

    fn stroke_line(&mut self, from: Pos2, to: Pos2, stroke: Stroke) {
        self.push(
            Line::new()
                .set("x1", from.x)
                .set("y1", from.y)
                .set("x2", to.x)
                .set("y2", to.y)
                .set("stroke", hex_color(stroke.color))
                .set("stroke-width", stroke.width),
        );
    }

    fn measure_text(&self, text: &str, _font: &FontId) -> f32 {
        estimate_text_width(text)
    }
}
