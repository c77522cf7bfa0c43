//! Gene and transcript track.

use serde::Deserialize;
use serde_json::Value;

use crate::error::TrackError;
use crate::feature::{CdsSegment, Feature, FeatureKind, GeneAttrs, Strand};
use crate::model::{parse_rows, TrackModel};
use crate::palette;
use crate::scale::{FeatureGranularity, RenderStrategy, ScaleBucket, ScaleTable};
use crate::track::{Track, TrackKind, TrackSettings};
use crate::view::BlockView;
use crate::view_transcript::TranscriptView;

/// Zoom bands: transcripts with labels up close, whole genes in the mid
/// range, label-less genes beyond two megabases per screen.
pub fn gene_scale_table() -> Result<ScaleTable, TrackError> {
    ScaleTable::new(
        RenderStrategy::default(),
        vec![
            ScaleBucket {
                max_bp_per_screen: Some(100_000),
                labels: Some(true),
                granularity: Some(FeatureGranularity::Transcript),
            },
            ScaleBucket {
                max_bp_per_screen: Some(2_000_000),
                labels: Some(true),
                granularity: Some(FeatureGranularity::Gene),
            },
            ScaleBucket {
                max_bp_per_screen: None,
                labels: Some(false),
                granularity: None,
            },
        ],
    )
}

pub fn genes_track(url: Option<String>) -> Result<Track, TrackError> {
    let feature_height = 10.0;
    let settings = TrackSettings {
        name: "Genes".to_string(),
        info: Some(
            "Ensembl API genes & transcripts, see rest.ensembl.org for more details".to_string(),
        ),
        feature_height,
        ..Default::default()
    };
    let kind = TrackKind::Genes {
        scale_table: gene_scale_table()?,
        view: TranscriptView::new(BlockView::new(palette::TRANSCRIPT_BODY, feature_height)),
    };
    Ok(Track::assemble(settings, kind, TrackModel::new(url, 0)))
}

#[derive(Debug, Deserialize)]
struct GeneRow {
    id: Option<String>,
    external_name: Option<String>,
    description: Option<String>,
    #[serde(rename = "Parent")]
    parent: Option<String>,
    feature_type: Option<String>,
    biotype: Option<String>,
    source: Option<String>,
    logic_name: Option<String>,
    start: u64,
    end: u64,
    #[serde(default)]
    strand: Strand,
    #[serde(default)]
    cds: Vec<CdsSegment>,
}

impl GeneRow {
    fn into_feature(self) -> Feature {
        let id = self
            .id
            .unwrap_or_else(|| format!("{}-{}", self.start, self.end));
        Feature::new(
            id,
            self.start,
            self.end,
            self.strand,
            FeatureKind::Gene(GeneAttrs {
                external_name: self.external_name,
                description: self.description,
                parent: self.parent,
                feature_type: self.feature_type,
                biotype: self.biotype,
                source: self.source,
                logic_name: self.logic_name,
                cds: self.cds,
            }),
        )
    }
}

pub(crate) fn parse(data: &Value) -> Vec<Feature> {
    parse_rows::<GeneRow>(data, "gene")
        .into_iter()
        .map(GeneRow::into_feature)
        .collect()
}

pub(crate) fn menu(feature: &Feature) -> Option<Vec<(String, String)>> {
    let attrs = feature.as_gene()?;
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    Some(vec![
        ("ID".to_string(), feature.id.clone()),
        ("Name".to_string(), text(&attrs.external_name)),
        ("Description".to_string(), text(&attrs.description)),
        ("Parent".to_string(), text(&attrs.parent)),
        ("Start".to_string(), feature.start.to_string()),
        ("End".to_string(), feature.end.to_string()),
        ("Strand".to_string(), feature.strand.wire().to_string()),
        ("Type".to_string(), text(&attrs.feature_type)),
        ("Biotype".to_string(), text(&attrs.biotype)),
        ("Source".to_string(), text(&attrs.source)),
        ("Logic".to_string(), text(&attrs.logic_name)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::notify::CollectedAlerts;
    use crate::track::DrawOutcome;
    use egui::Pos2;
    use serde_json::json;

    #[test]
    fn fetched_transcripts_render_bodies_and_arrows() {
        let mut track = genes_track(None).unwrap();
        let sink = CollectedAlerts::new();
        let payload = json!([{
            "id": "ENST1",
            "start": 1100u64,
            "end": 1400u64,
            "strand": 1,
            "cds": [{"start": 1150u64, "end": 1250u64}]
        }]);
        assert_eq!(track.receive_data(&payload, 1000, 2000, &sink), 1);
        track.layout(1000, 1.0, 20.0);

        let mut canvas = RecordingCanvas::new(800.0);
        let outcome = track.draw(&mut canvas, 1.0, 1000);
        assert_eq!(outcome, DrawOutcome::Drawn { features: 1 });

        let rects = canvas.rects();
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0].0.min, Pos2::new(100.0, 20.0));
        assert_eq!(rects[0].0.width(), 300.0);
        assert_eq!(rects[0].0.height(), 10.0);
        assert_eq!(rects[0].1, palette::TRANSCRIPT_BODY);
        // 100 px of CDS leaves room for the glyph at each end.
        assert_eq!(canvas.texts(), vec!["►", "►"]);
    }

    #[test]
    fn zoom_bands_follow_the_three_tiers() {
        let track = genes_track(None).unwrap();
        let close = track.strategy_for(50_000);
        assert!(close.labels);
        assert_eq!(close.granularity, FeatureGranularity::Transcript);

        for zoom in [100_001, 1_500_000, 2_000_000] {
            let mid = track.strategy_for(zoom);
            assert!(mid.labels, "zoom {zoom}");
            assert_eq!(mid.granularity, FeatureGranularity::Gene, "zoom {zoom}");
        }

        assert!(!track.strategy_for(2_000_001).labels);
        assert!(!track.strategy_for(50_000_000).labels);
    }

    #[test]
    fn parse_keeps_annotation_and_synthesizes_ids() {
        let payload = json!([
            {
                "id": "ENST00000366667",
                "external_name": "RGS7",
                "biotype": "protein_coding",
                "logic_name": "ensembl_havana_transcript",
                "Parent": "ENSG00000182901",
                "start": 240_961_437u64,
                "end": 241_002_313u64,
                "strand": -1,
                "cds": [{"start": 240_961_437u64, "end": 240_962_000u64}]
            },
            {"start": 100u64, "end": 200u64, "strand": 1},
            {"start": "not a number"}
        ]);
        let features = parse(&payload);
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].id, "ENST00000366667");
        assert_eq!(features[0].strand, Strand::Reverse);
        let attrs = features[0].as_gene().unwrap();
        assert_eq!(attrs.parent.as_deref(), Some("ENSG00000182901"));
        assert_eq!(attrs.cds.len(), 1);
        assert_eq!(features[1].id, "100-200");
    }

    #[test]
    fn menu_lists_all_annotation_in_order() {
        let payload = json!([{
            "id": "ENST1",
            "external_name": "GENE1",
            "feature_type": "transcript",
            "start": 100u64,
            "end": 200u64,
            "strand": -1
        }]);
        let feature = &parse(&payload)[0];
        let entries = menu(feature).unwrap();
        let labels: Vec<&str> = entries.iter().map(|(label, _)| label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "ID",
                "Name",
                "Description",
                "Parent",
                "Start",
                "End",
                "Strand",
                "Type",
                "Biotype",
                "Source",
                "Logic"
            ]
        );
        assert_eq!(entries[0].1, "ENST1");
        assert_eq!(entries[1].1, "GENE1");
        // Absent annotation shows as empty, not as an omitted row.
        assert_eq!(entries[2].1, "");
        assert_eq!(entries[6].1, "-1");
    }
}
