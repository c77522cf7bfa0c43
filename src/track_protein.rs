//! Protein translation track.

use serde::Deserialize;
use serde_json::Value;

use crate::feature::{Feature, FeatureKind, PartialCodon, ProteinAttrs, Strand};
use crate::model::{parse_rows, TrackModel};
use crate::track::{Track, TrackKind, TrackSettings};
use crate::view_sequence::SequenceView;

const PROTEIN_THRESHOLD: u64 = 10_000;

pub fn protein_track(url: Option<String>) -> Track {
    let settings = TrackSettings {
        name: "Protein".to_string(),
        threshold: Some(PROTEIN_THRESHOLD),
        threshold_message: Some(
            "Protein not displayed for regions larger than ".to_string(),
        ),
        ..Default::default()
    };
    let kind = TrackKind::Protein { view: SequenceView };
    Track::assemble(settings, kind, TrackModel::new(url, 0))
}

#[derive(Debug, Deserialize)]
struct ProteinRow {
    id: Option<String>,
    start: u64,
    end: u64,
    #[serde(default)]
    strand: Strand,
    sequence: String,
    start_index: i64,
    num_amino_acids: i64,
    start_base: Option<PartialCodon>,
    end_base: Option<PartialCodon>,
}

impl ProteinRow {
    fn into_feature(self) -> Feature {
        let id = self
            .id
            .unwrap_or_else(|| format!("{}-{}", self.start, self.end));
        Feature::new(
            id,
            self.start,
            self.end,
            self.strand,
            FeatureKind::Protein(ProteinAttrs {
                sequence: self.sequence,
                start_index: self.start_index,
                num_amino_acids: self.num_amino_acids,
                start_base: self.start_base,
                end_base: self.end_base,
            }),
        )
    }
}

pub(crate) fn parse(data: &Value) -> Vec<Feature> {
    parse_rows::<ProteinRow>(data, "translation")
        .into_iter()
        .map(ProteinRow::into_feature)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::track::DrawOutcome;
    use serde_json::json;

    #[test]
    fn parse_keeps_partial_codons_and_skips_broken_rows() {
        let payload = json!([
            {
                "id": "ENSP0001",
                "start": 1000u64,
                "end": 1030u64,
                "strand": -1,
                "sequence": "MKLVS",
                "start_index": 100,
                "num_amino_acids": 5,
                "start_base": {"aa": "L", "len": 2}
            },
            {"id": "broken", "start": 1u64, "end": 2u64}
        ]);
        let features = parse(&payload);
        assert_eq!(features.len(), 1);
        let attrs = features[0].as_protein().unwrap();
        assert_eq!(attrs.sequence, "MKLVS");
        assert_eq!(attrs.start_base, Some(PartialCodon { aa: 'L', len: 2 }));
        assert_eq!(attrs.end_base, None);
    }

    #[test]
    fn oversized_regions_surface_the_configured_message() {
        let mut track = protein_track(None);
        let mut canvas = RecordingCanvas::new(800.0);
        let outcome = track.draw(&mut canvas, 0.1, 10_001);
        assert_eq!(
            outcome,
            DrawOutcome::Suppressed {
                message: "Protein not displayed for regions larger than 10000".to_string()
            }
        );
    }

    #[test]
    fn fetch_url_uses_the_region_template() {
        let track = protein_track(Some(
            "https://wge.example/api/translation_for_region?species=human&chr_name=__CHR__&chr_start=__START__&chr_end=__END__"
                .to_string(),
        ));
        let url = track.model().fetch_url("6", 35_000, 36_000).unwrap();
        assert_eq!(
            url,
            "https://wge.example/api/translation_for_region?species=human&chr_name=6&chr_start=35000&chr_end=36000"
        );
    }
}
