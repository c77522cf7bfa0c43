//! CRISPR guide and guide-pair tracks.
//!
//! Both render borderless white boxes on a tall auto-height lane and stop
//! drawing past three kilobases per screen. Menus link through to the
//! per-guide report pages.

use serde::Deserialize;
use serde_json::Value;

use crate::feature::{CrisprAttrs, CrisprPairAttrs, Feature, FeatureKind, GuideSpan, Strand};
use crate::model::{parse_rows, TrackModel};
use crate::track::{Track, TrackKind, TrackSettings};
use crate::view::BlockView;
use crate::view_transcript::PairView;

/// Off-target column value when the backend has not scored a guide yet.
const NOT_COMPUTED: &str = "not computed";

const GUIDE_THRESHOLD: u64 = 3000;

pub fn crisprs_track(url: Option<String>, report_uri: &str) -> Track {
    let feature_height = 10.0;
    let settings = TrackSettings {
        name: "Crisprs".to_string(),
        height: 150.0,
        auto_height: true,
        feature_height,
        labels: false,
        threshold: Some(GUIDE_THRESHOLD),
        threshold_message: Some("Crisprs not displayed for regions larger than ".to_string()),
        ..Default::default()
    };
    let kind = TrackKind::Crisprs {
        view: BlockView::new(egui::Color32::WHITE, feature_height),
        report_uri: report_uri.to_string(),
    };
    Track::assemble(settings, kind, TrackModel::new(url, 0))
}

pub fn crispr_pairs_track(url: Option<String>, report_uri: &str) -> Track {
    let feature_height = 10.0;
    let settings = TrackSettings {
        name: "Crispr pairs".to_string(),
        height: 150.0,
        auto_height: true,
        feature_height,
        labels: false,
        threshold: Some(GUIDE_THRESHOLD),
        threshold_message: Some(
            "Crispr pairs not displayed for regions larger than ".to_string(),
        ),
        ..Default::default()
    };
    let kind = TrackKind::CrisprPairs {
        view: PairView::new(BlockView::new(egui::Color32::WHITE, feature_height)),
        report_uri: report_uri.to_string(),
    };
    Track::assemble(settings, kind, TrackModel::new(url, 0))
}

#[derive(Debug, Deserialize)]
struct CrisprRow {
    id: Option<String>,
    name: Option<String>,
    start: u64,
    end: u64,
    #[serde(default)]
    strand: Strand,
    ot_summary: Option<String>,
}

impl CrisprRow {
    fn into_feature(self) -> Feature {
        let id = self
            .id
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_else(|| format!("{}-{}", self.start, self.end));
        let name = self.name.unwrap_or_else(|| id.clone());
        Feature::new(
            id,
            self.start,
            self.end,
            self.strand,
            FeatureKind::Crispr(CrisprAttrs {
                name,
                ot_summary: self.ot_summary,
            }),
        )
    }
}

#[derive(Debug, Deserialize)]
struct PairRow {
    id: Option<String>,
    name: Option<String>,
    start: u64,
    end: u64,
    #[serde(default)]
    strand: Strand,
    #[serde(default)]
    spacer: i64,
    ot_summary: Option<String>,
    left_ot_summary: Option<String>,
    right_ot_summary: Option<String>,
    left_crispr: Option<GuideSpan>,
    right_crispr: Option<GuideSpan>,
}

impl PairRow {
    fn into_feature(self) -> Feature {
        let id = self
            .id
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_else(|| format!("{}-{}", self.start, self.end));
        let name = self.name.unwrap_or_else(|| id.clone());
        Feature::new(
            id,
            self.start,
            self.end,
            self.strand,
            FeatureKind::CrisprPair(CrisprPairAttrs {
                name,
                spacer: self.spacer,
                ot_summary: self.ot_summary,
                left_ot_summary: self.left_ot_summary,
                right_ot_summary: self.right_ot_summary,
                left: self.left_crispr,
                right: self.right_crispr,
            }),
        )
    }
}

pub(crate) fn parse_crisprs(data: &Value) -> Vec<Feature> {
    parse_rows::<CrisprRow>(data, "crispr")
        .into_iter()
        .map(CrisprRow::into_feature)
        .collect()
}

pub(crate) fn parse_pairs(data: &Value) -> Vec<Feature> {
    parse_rows::<PairRow>(data, "crispr pair")
        .into_iter()
        .map(PairRow::into_feature)
        .collect()
}

pub(crate) fn crispr_menu(feature: &Feature, report_uri: &str) -> Option<Vec<(String, String)>> {
    let attrs = feature.as_crispr()?;
    Some(vec![
        ("Start".to_string(), feature.start.to_string()),
        ("End".to_string(), feature.end.to_string()),
        ("Strand".to_string(), feature.strand.wire().to_string()),
        ("Name".to_string(), attrs.name.clone()),
        ("URL".to_string(), format!("{report_uri}/{}", attrs.name)),
        (
            "Off-Targets".to_string(),
            attrs
                .ot_summary
                .clone()
                .unwrap_or_else(|| NOT_COMPUTED.to_string()),
        ),
    ])
}

pub(crate) fn pair_menu(feature: &Feature, report_uri: &str) -> Option<Vec<(String, String)>> {
    let attrs = feature.as_crispr_pair()?;
    Some(vec![
        ("Start".to_string(), feature.start.to_string()),
        ("End".to_string(), feature.end.to_string()),
        ("Strand".to_string(), feature.strand.wire().to_string()),
        ("Spacer".to_string(), attrs.spacer.to_string()),
        ("Name".to_string(), attrs.name.clone()),
        (
            "URL".to_string(),
            format!("{report_uri}/{}?spacer={}", attrs.name, attrs.spacer),
        ),
        (
            "Off-Targets: Pairs".to_string(),
            attrs
                .ot_summary
                .clone()
                .unwrap_or_else(|| NOT_COMPUTED.to_string()),
        ),
        (
            "Left".to_string(),
            attrs.left_ot_summary.clone().unwrap_or_default(),
        ),
        (
            "Right".to_string(),
            attrs.right_ot_summary.clone().unwrap_or_default(),
        ),
    ])
}
