//! Shared glyph context, view styling and the plain block body.

use egui::{Color32, FontId, Pos2, Rect, Vec2};

use crate::canvas::Canvas;
use crate::feature::Feature;

/// Everything needed to draw one residue cell. Built fresh per glyph per
/// draw call, never stored.
#[derive(Clone, Debug, PartialEq)]
pub struct BaseGlyph {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub box_color: Color32,
    pub text_color: Color32,
    pub labels: bool,
    pub residue: char,
    pub index: i64,
}

/// Font and vertical layout shared by a track's views.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewStyle {
    pub font: FontId,
    pub feature_height: f32,
    /// Inset from box top to glyph top. Empirical, keeps the label
    /// visually centred for the default font.
    pub label_y_offset: f32,
}

impl ViewStyle {
    pub fn new(font_size: f32, feature_height: f32) -> Self {
        Self {
            font: FontId::monospace(font_size),
            feature_height,
            label_y_offset: (feature_height - font_size) / 2.0,
        }
    }
}

impl Default for ViewStyle {
    fn default() -> Self {
        Self::new(12.0, 15.0)
    }
}

/// Plain span box, the body drawing every track shares.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockView {
    pub color: Color32,
    pub height: f32,
}

impl BlockView {
    pub fn new(color: Color32, height: f32) -> Self {
        Self { color, height }
    }

    /// Box width in pixels for a bp span, never below one pixel.
    pub fn span_width(start: u64, end: u64, scale: f64) -> f32 {
        ((end.saturating_sub(start) as f64 * scale) as f32).max(1.0)
    }

    /// Fills the feature span. Features the layout pass has not positioned
    /// at this zoom are skipped.
    pub fn draw(&self, feature: &Feature, canvas: &mut dyn Canvas, scale: f64) {
        let Some(pos) = feature.position(scale) else {
            return;
        };
        let width = Self::span_width(feature.start, feature.end, scale);
        canvas.fill_rect(
            Rect::from_min_size(Pos2::new(pos.x, pos.y), Vec2::new(width, self.height)),
            self.color,
        );
    }
}
