//! Drawing surface seam.
//!
//! The browser shell owns the real surface; tracks draw through this trait
//! so the same code renders to an on-screen painter, an SVG document or a
//! test recorder. Text is anchored at its top-left corner and all
//! coordinates are in surface pixels.

use std::cell::Cell;

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke};

pub trait Canvas {
    /// Surface width in pixels. Features outside it get culled.
    fn width(&self) -> f32;
    fn fill_rect(&mut self, rect: Rect, color: Color32);
    fn fill_text(&mut self, pos: Pos2, text: &str, font: &FontId, color: Color32);
    fn stroke_line(&mut self, from: Pos2, to: Pos2, stroke: Stroke);
    /// Unrounded width of `text` in pixels. Callers cache, see
    /// [`crate::glyph_metrics::GlyphMetrics`].
    fn measure_text(&self, text: &str, font: &FontId) -> f32;
}

/// Live canvas over an `egui::Painter`, offset into `area`.
pub struct PainterCanvas<'p> {
    painter: &'p Painter,
    area: Rect,
}

impl<'p> PainterCanvas<'p> {
    pub fn new(painter: &'p Painter, area: Rect) -> Self {
        Self { painter, area }
    }
}

impl Canvas for PainterCanvas<'_> {
    fn width(&self) -> f32 {
        self.area.width()
    }

    fn fill_rect(&mut self, rect: Rect, color: Color32) {
        self.painter
            .rect_filled(rect.translate(self.area.min.to_vec2()), 0.0, color);
    }

    fn fill_text(&mut self, pos: Pos2, text: &str, font: &FontId, color: Color32) {
        self.painter.text(
            pos + self.area.min.to_vec2(),
            Align2::LEFT_TOP,
            text,
            font.clone(),
            color,
        );
    }

    fn stroke_line(&mut self, from: Pos2, to: Pos2, stroke: Stroke) {
        let offset = self.area.min.to_vec2();
        self.painter.line_segment([from + offset, to + offset], stroke);
    }

    fn measure_text(&self, text: &str, font: &FontId) -> f32 {
        self.painter
            .layout_no_wrap(text.to_string(), font.clone(), Color32::PLACEHOLDER)
            .size()
            .x
    }
}

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCmd {
    Rect { rect: Rect, color: Color32 },
    Text { pos: Pos2, text: String, color: Color32 },
    Line { from: Pos2, to: Pos2, stroke: Stroke },
}

/// Test canvas: records draw calls and answers text measurement with a
/// fixed per-character width.
pub struct RecordingCanvas {
    width: f32,
    char_width: f32,
    commands: Vec<DrawCmd>,
    measure_calls: Cell<usize>,
}

impl RecordingCanvas {
    pub fn new(width: f32) -> Self {
        Self::with_char_width(width, 6.5)
    }

    pub fn with_char_width(width: f32, char_width: f32) -> Self {
        Self {
            width,
            char_width,
            commands: Vec::new(),
            measure_calls: Cell::new(0),
        }
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    /// How many times `measure_text` hit this canvas.
    pub fn measure_calls(&self) -> usize {
        self.measure_calls.get()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCmd::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn rects(&self) -> Vec<(Rect, Color32)> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCmd::Rect { rect, color } => Some((*rect, *color)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> f32 {
        self.width
    }

    fn fill_rect(&mut self, rect: Rect, color: Color32) {
        self.commands.push(DrawCmd::Rect { rect, color });
    }

    fn fill_text(&mut self, pos: Pos2, text: &str, _font: &FontId, color: Color32) {
        self.commands.push(DrawCmd::Text {
            pos,
            text: text.to_string(),
            color,
        });
    }

    fn stroke_line(&mut self, from: Pos2, to: Pos2, stroke: Stroke) {
        self.commands.push(DrawCmd::Line { from, to, stroke });
    }

    fn measure_text(&self, text: &str, _font: &FontId) -> f32 {
        self.measure_calls.set(self.measure_calls.get() + 1);
        self.char_width * text.chars().count() as f32
    }
}
