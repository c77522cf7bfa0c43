//! Per-residue sequence rendering.
//!
//! One box per amino acid, three bases of screen each, residue letter
//! centred in the box and its protein index underneath. Everything here
//! degrades instead of failing: labels drop out when they cannot fit,
//! off-screen residues are skipped, unmapped residues fall back to the
//! default box color.

use egui::{Color32, Pos2, Rect, Vec2};

use crate::canvas::Canvas;
use crate::feature::{Feature, Strand};
use crate::glyph_metrics::GlyphMetrics;
use crate::palette;
use crate::view::{BaseGlyph, ViewStyle};

/// Probe label for the does-the-index-fit check. Three digits cover the
/// indices a visible window produces.
const INDEX_PROBE: &str = "999";

#[derive(Clone, Copy, Debug, Default)]
pub struct SequenceView;

impl SequenceView {
    /// One residue cell: box, centred residue char, index underneath.
    pub fn draw_base(
        &self,
        glyph: &BaseGlyph,
        canvas: &mut dyn Canvas,
        metrics: &mut GlyphMetrics,
        style: &ViewStyle,
    ) {
        canvas.fill_rect(
            Rect::from_min_size(
                Pos2::new(glyph.x, glyph.y),
                Vec2::new(glyph.width, glyph.height),
            ),
            glyph.box_color,
        );

        if !glyph.labels {
            return;
        }

        let mut buf = [0u8; 4];
        let residue = glyph.residue.encode_utf8(&mut buf);
        let residue_w = metrics.measure(canvas, &style.font, residue);
        canvas.fill_text(
            Pos2::new(
                glyph.x + (glyph.width - residue_w) / 2.0,
                glyph.y + style.label_y_offset,
            ),
            residue,
            &style.font,
            glyph.text_color,
        );

        // No index when the cell cannot hold three digits.
        if metrics.measure(canvas, &style.font, INDEX_PROBE) > glyph.width {
            return;
        }

        // White residue labels keep the index legible by going green.
        let index_color = if glyph.text_color == Color32::WHITE {
            palette::INDEX_ON_WHITE
        } else {
            glyph.text_color
        };
        let index = glyph.index.to_string();
        let index_w = metrics.measure(canvas, &style.font, &index);
        canvas.fill_text(
            Pos2::new(
                glyph.x + (glyph.width - index_w) / 2.0,
                glyph.y + glyph.height + style.label_y_offset,
            ),
            &index,
            &style.font,
            index_color,
        );
    }

    /// Whole translated region: boundary partial codons, then one box per
    /// residue.
    ///
    /// Minus-strand features keep their sequence 5'→3' but the screen runs
    /// in genomic order, so both the residue picked for a visual slot and
    /// its index run backwards.
    pub fn draw_sequence(
        &self,
        feature: &Feature,
        canvas: &mut dyn Canvas,
        metrics: &mut GlyphMetrics,
        style: &ViewStyle,
        scale: f64,
    ) {
        let Some(attrs) = feature.as_protein() else {
            return;
        };
        let Some(pos) = feature.position(scale) else {
            return;
        };

        // Stable widest-label figure before the track-wide label decision.
        metrics.ensure_alphabet(canvas, &style.font, palette::residue_alphabet());
        let box_width = (scale.ceil() * 3.0) as f32;
        let labels = metrics.labels_fit(box_width);

        let residues: Vec<char> = attrs.sequence.chars().collect();

        if let Some(partial) = attrs.start_base {
            let index = match feature.strand {
                Strand::Reverse => attrs.start_index + attrs.num_amino_acids,
                Strand::Forward => attrs.start_index - 1,
            };
            self.draw_base(
                &BaseGlyph {
                    x: pos.x - (f64::from(partial.len) * scale) as f32,
                    y: pos.y,
                    width: (f64::from(partial.len) * scale) as f32,
                    height: style.feature_height,
                    box_color: palette::PARTIAL_CODON_BOX,
                    text_color: Color32::WHITE,
                    labels,
                    residue: partial.aa,
                    index,
                },
                canvas,
                metrics,
                style,
            );
        }

        if let Some(partial) = attrs.end_base {
            let index = match feature.strand {
                Strand::Reverse => attrs.start_index - 1,
                Strand::Forward => attrs.start_index + attrs.num_amino_acids,
            };
            self.draw_base(
                &BaseGlyph {
                    x: pos.x + (residues.len() as f64 * 3.0 * scale) as f32,
                    y: pos.y,
                    width: (f64::from(partial.len) * scale) as f32,
                    height: style.feature_height,
                    box_color: palette::PARTIAL_CODON_BOX,
                    text_color: Color32::WHITE,
                    labels,
                    residue: partial.aa,
                    index,
                },
                canvas,
                metrics,
                style,
            );
        }

        for slot in 0..residues.len() {
            let x = pos.x + (slot as f64 * 3.0 * scale) as f32;
            if x < -(scale as f32) || x > canvas.width() {
                continue;
            }

            let (picked, index) = match feature.strand {
                Strand::Reverse => (
                    residues.len() - 1 - slot,
                    attrs.start_index + (attrs.num_amino_acids - 1) - slot as i64,
                ),
                Strand::Forward => (slot, attrs.start_index + slot as i64),
            };
            let residue = residues[picked];

            self.draw_base(
                &BaseGlyph {
                    x,
                    y: pos.y,
                    width: box_width,
                    height: style.feature_height,
                    box_color: palette::residue_color(residue),
                    text_color: palette::LABEL_DEFAULT,
                    labels,
                    residue,
                    index,
                },
                canvas,
                metrics,
                style,
            );
        }
    }
}
