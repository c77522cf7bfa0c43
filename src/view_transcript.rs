//! Transcript bodies with CDS direction glyphs, plus paired-guide boxes.

use egui::{Color32, Pos2, Rect, Stroke, Vec2};

use crate::canvas::Canvas;
use crate::feature::Feature;
use crate::glyph_metrics::GlyphMetrics;
use crate::palette;
use crate::view::{BlockView, ViewStyle};

/// Vertical nudge of the direction glyphs relative to the feature top.
/// Empirically tuned against the live browser; a font change needs a
/// visual re-check, not a re-derivation.
pub const ARROW_Y_NUDGE: f32 = -2.0;

/// Annotation sources starting with this use the darker arrow shade.
const MERGED_ANNOTATION_PREFIX: &str = "ensembl_havana";

/// Transcript body plus one direction glyph just inside each end of every
/// CDS segment.
#[derive(Clone, Copy, Debug)]
pub struct TranscriptView {
    pub body: BlockView,
}

impl TranscriptView {
    pub fn new(body: BlockView) -> Self {
        Self { body }
    }

    pub fn draw(
        &self,
        feature: &Feature,
        canvas: &mut dyn Canvas,
        metrics: &mut GlyphMetrics,
        style: &ViewStyle,
        scale: f64,
    ) {
        self.body.draw(feature, canvas, scale);
        self.draw_cds_arrows(feature, canvas, metrics, style, scale);
    }

    /// Direction glyph overlay. Segments too narrow for three arrows stay
    /// bare, and an exact fit counts as too narrow.
    pub fn draw_cds_arrows(
        &self,
        feature: &Feature,
        canvas: &mut dyn Canvas,
        metrics: &mut GlyphMetrics,
        style: &ViewStyle,
        scale: f64,
    ) {
        let Some(attrs) = feature.as_gene() else {
            return;
        };
        if attrs.cds.is_empty() {
            return;
        }
        let Some(pos) = feature.position(scale) else {
            return;
        };

        let mut buf = [0u8; 4];
        let arrow = feature.strand.arrow().encode_utf8(&mut buf);
        let arrow_w = metrics.measure(canvas, &style.font, arrow);
        let merged = attrs
            .logic_name
            .as_deref()
            .is_some_and(|name| name.starts_with(MERGED_ANNOTATION_PREFIX));
        let color = if merged {
            palette::ARROW_MERGED
        } else {
            palette::ARROW_DEFAULT
        };
        let y = pos.y + ARROW_Y_NUDGE;

        for cds in &attrs.cds {
            let cds_start =
                pos.x + (cds.start.saturating_sub(feature.start) as f64 * scale) as f32;
            let span = (cds.end.saturating_sub(cds.start) as f64 * scale) as f32;
            let cds_end = cds_start + span;
            let cds_width = span.max(1.0);

            if cds_width <= 3.0 * (arrow_w + 1.0) {
                continue;
            }

            canvas.fill_text(Pos2::new(cds_start + 1.0, y), arrow, &style.font, color);
            canvas.fill_text(
                Pos2::new(cds_end - arrow_w + 1.0, y),
                arrow,
                &style.font,
                color,
            );
        }
    }
}

/// Paired guides: two borderless boxes joined by a black connector across
/// the spacer gap.
#[derive(Clone, Copy, Debug)]
pub struct PairView {
    pub body: BlockView,
    pub connector: Stroke,
}

impl PairView {
    pub fn new(body: BlockView) -> Self {
        Self {
            body,
            connector: Stroke::new(1.0, Color32::BLACK),
        }
    }

    pub fn draw(&self, feature: &Feature, canvas: &mut dyn Canvas, scale: f64) {
        let Some(attrs) = feature.as_crispr_pair() else {
            return;
        };
        let Some(pos) = feature.position(scale) else {
            return;
        };
        let (Some(left), Some(right)) = (attrs.left, attrs.right) else {
            // Payloads without guide spans render the pair as one box.
            self.body.draw(feature, canvas, scale);
            return;
        };

        for span in [left, right] {
            let x = pos.x + (span.start.saturating_sub(feature.start) as f64 * scale) as f32;
            let width = BlockView::span_width(span.start, span.end, scale);
            canvas.fill_rect(
                Rect::from_min_size(Pos2::new(x, pos.y), Vec2::new(width, self.body.height)),
                self.body.color,
            );
        }

        let gap_start =
            pos.x + (left.end.saturating_sub(feature.start) as f64 * scale) as f32;
        let gap_end =
            pos.x + (right.start.saturating_sub(feature.start) as f64 * scale) as f32;
        let mid = pos.y + self.body.height / 2.0;
        canvas.stroke_line(
            Pos2::new(gap_start, mid),
            Pos2::new(gap_end, mid),
            self.connector,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCmd, RecordingCanvas};
    use crate::feature::{
        CdsSegment, CrisprPairAttrs, FeatureKind, GeneAttrs, GuideSpan, PixelPos, Strand,
    };

    fn transcript(cds: Vec<CdsSegment>, strand: Strand, logic_name: Option<&str>) -> Feature {
        let mut feature = Feature::new(
            "t1",
            100,
            400,
            strand,
            FeatureKind::Gene(GeneAttrs {
                logic_name: logic_name.map(str::to_string),
                cds,
                ..Default::default()
            }),
        );
        feature.set_position(1.0, PixelPos::new(0.0, 20.0));
        feature
    }

    fn arrow_texts(canvas: &RecordingCanvas) -> Vec<(Pos2, String, Color32)> {
        canvas
            .commands()
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCmd::Text { pos, text, color } => Some((*pos, text.clone(), *color)),
                _ => None,
            })
            .collect()
    }

    fn draw(feature: &Feature, canvas: &mut RecordingCanvas) {
        let mut metrics = GlyphMetrics::new();
        TranscriptView::new(BlockView::new(Color32::GRAY, 15.0)).draw(
            feature,
            canvas,
            &mut metrics,
            &ViewStyle::default(),
            1.0,
        );
    }

    #[test]
    fn arrows_sit_inside_both_cds_ends() {
        // Arrow width caches at 8, so segments need more than 27 px.
        let feature = transcript(vec![CdsSegment { start: 150, end: 250 }], Strand::Forward, None);
        let mut canvas = RecordingCanvas::new(800.0);
        draw(&feature, &mut canvas);

        let texts = arrow_texts(&canvas);
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[0].1, "►");
        assert_eq!(texts[0].0, Pos2::new(51.0, 18.0));
        assert_eq!(texts[1].0, Pos2::new(143.0, 18.0));
    }

    #[test]
    fn exact_fit_suppresses_arrows() {
        // 27 px wide: exactly 3 * (8 + 1).
        let feature = transcript(vec![CdsSegment { start: 150, end: 177 }], Strand::Forward, None);
        let mut canvas = RecordingCanvas::new(800.0);
        draw(&feature, &mut canvas);
        assert!(arrow_texts(&canvas).is_empty());

        // One more px and the arrows appear.
        let feature = transcript(vec![CdsSegment { start: 150, end: 178 }], Strand::Forward, None);
        let mut canvas = RecordingCanvas::new(800.0);
        draw(&feature, &mut canvas);
        assert_eq!(arrow_texts(&canvas).len(), 2);
    }

    #[test]
    fn reverse_strand_uses_the_left_arrow() {
        let feature = transcript(vec![CdsSegment { start: 150, end: 250 }], Strand::Reverse, None);
        let mut canvas = RecordingCanvas::new(800.0);
        draw(&feature, &mut canvas);
        assert!(arrow_texts(&canvas).iter().all(|(_, text, _)| text == "◄"));
    }

    #[test]
    fn merged_annotation_darkens_the_arrows() {
        let feature = transcript(
            vec![CdsSegment { start: 150, end: 250 }],
            Strand::Forward,
            Some("ensembl_havana_transcript"),
        );
        let mut canvas = RecordingCanvas::new(800.0);
        draw(&feature, &mut canvas);
        assert!(
            arrow_texts(&canvas)
                .iter()
                .all(|(_, _, color)| *color == palette::ARROW_MERGED)
        );

        let feature = transcript(
            vec![CdsSegment { start: 150, end: 250 }],
            Strand::Forward,
            Some("ensembl"),
        );
        let mut canvas = RecordingCanvas::new(800.0);
        draw(&feature, &mut canvas);
        assert!(
            arrow_texts(&canvas)
                .iter()
                .all(|(_, _, color)| *color == palette::ARROW_DEFAULT)
        );
    }

    #[test]
    fn pair_draws_two_guides_and_a_connector() {
        let mut feature = Feature::new(
            "pair1",
            100,
            150,
            Strand::Forward,
            FeatureKind::CrisprPair(CrisprPairAttrs {
                name: "pair1".to_string(),
                left: Some(GuideSpan { start: 100, end: 120 }),
                right: Some(GuideSpan { start: 130, end: 150 }),
                ..Default::default()
            }),
        );
        feature.set_position(1.0, PixelPos::new(0.0, 0.0));
        let mut canvas = RecordingCanvas::new(800.0);
        PairView::new(BlockView::new(Color32::WHITE, 150.0)).draw(&feature, &mut canvas, 1.0);

        let rects = canvas.rects();
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0].0.min.x, 0.0);
        assert_eq!(rects[1].0.min.x, 30.0);
        assert!(rects.iter().all(|(_, color)| *color == Color32::WHITE));

        let lines: Vec<(Pos2, Pos2)> = canvas
            .commands()
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCmd::Line { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect();
        assert_eq!(lines, vec![(Pos2::new(20.0, 75.0), Pos2::new(30.0, 75.0))]);
    }

    #[test]
    fn pair_without_spans_is_one_box() {
        let mut feature = Feature::new(
            "pair1",
            100,
            150,
            Strand::Forward,
            FeatureKind::CrisprPair(CrisprPairAttrs {
                name: "pair1".to_string(),
                ..Default::default()
            }),
        );
        feature.set_position(1.0, PixelPos::new(0.0, 0.0));
        let mut canvas = RecordingCanvas::new(800.0);
        PairView::new(BlockView::new(Color32::WHITE, 150.0)).draw(&feature, &mut canvas, 1.0);
        assert_eq!(canvas.rects().len(), 1);
        assert!(canvas.commands().iter().all(|cmd| !matches!(cmd, DrawCmd::Line { .. })));
    }
}
