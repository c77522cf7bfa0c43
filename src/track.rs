//! Track assembly: settings, per-kind strategy dispatch and lifecycle.
//!
//! A [`Track`] ties one [`TrackModel`] to the views, metrics cache and
//! zoom table its kind needs. The kinds share no base type; the
//! [`TrackKind`] enum is the strategy table and every operation dispatches
//! over it.

use serde_json::Value;

use crate::canvas::Canvas;
use crate::feature::Feature;
use crate::glyph_metrics::GlyphMetrics;
use crate::model::TrackModel;
use crate::notify::NotificationSink;
use crate::scale::{FeatureGranularity, RenderStrategy, ScaleTable};
use crate::view::{BlockView, ViewStyle};
use crate::view_sequence::SequenceView;
use crate::view_transcript::{PairView, TranscriptView};
use crate::{track_crisprs, track_genes, track_protein};

/// Host-side image lifecycle hooks, called during [`Track::invalidate`].
pub trait TrackHost {
    fn reset_images(&mut self);
    fn clear_image_containers(&mut self);
    fn make_first_image(&mut self);
}

/// Static per-track configuration.
#[derive(Clone, Debug)]
pub struct TrackSettings {
    pub name: String,
    pub info: Option<String>,
    /// Track viewport height in px; the host may grow it with
    /// `auto_height`.
    pub height: f32,
    pub auto_height: bool,
    /// Height of one feature box, independent of the viewport.
    pub feature_height: f32,
    pub labels: bool,
    /// Regions larger than this many bp render nothing.
    pub threshold: Option<u64>,
    /// Message prefix surfaced when the threshold kicks in; the threshold
    /// value is appended.
    pub threshold_message: Option<String>,
}

impl Default for TrackSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            info: None,
            height: 12.0,
            auto_height: false,
            feature_height: 15.0,
            labels: true,
            threshold: None,
            threshold_message: None,
        }
    }
}

/// Per-kind parse, render and menu behavior.
pub enum TrackKind {
    Genes {
        scale_table: ScaleTable,
        view: TranscriptView,
    },
    Crisprs {
        view: BlockView,
        report_uri: String,
    },
    CrisprPairs {
        view: PairView,
        report_uri: String,
    },
    Protein {
        view: SequenceView,
    },
}

impl TrackKind {
    fn parse(&self, data: &Value) -> Vec<Feature> {
        match self {
            TrackKind::Genes { .. } => track_genes::parse(data),
            TrackKind::Crisprs { .. } => track_crisprs::parse_crisprs(data),
            TrackKind::CrisprPairs { .. } => track_crisprs::parse_pairs(data),
            TrackKind::Protein { .. } => track_protein::parse(data),
        }
    }

    fn menu(&self, feature: &Feature) -> Option<Vec<(String, String)>> {
        match self {
            TrackKind::Genes { .. } => track_genes::menu(feature),
            TrackKind::Crisprs { report_uri, .. } => track_crisprs::crispr_menu(feature, report_uri),
            TrackKind::CrisprPairs { report_uri, .. } => {
                track_crisprs::pair_menu(feature, report_uri)
            }
            // Translated regions have no click-through details.
            TrackKind::Protein { .. } => None,
        }
    }
}

/// Outcome of one draw pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    Drawn { features: usize },
    Suppressed { message: String },
}

pub struct Track {
    settings: TrackSettings,
    kind: TrackKind,
    model: TrackModel,
    metrics: GlyphMetrics,
    style: ViewStyle,
}

impl Track {
    pub(crate) fn assemble(settings: TrackSettings, kind: TrackKind, model: TrackModel) -> Self {
        let style = ViewStyle::new(12.0, settings.feature_height);
        Self {
            settings,
            kind,
            model,
            metrics: GlyphMetrics::new(),
            style,
        }
    }

    #[inline(always)]
    pub fn settings(&self) -> &TrackSettings {
        &self.settings
    }

    #[inline(always)]
    pub fn model(&self) -> &TrackModel {
        &self.model
    }

    #[inline(always)]
    pub fn model_mut(&mut self) -> &mut TrackModel {
        &mut self.model
    }

    #[inline(always)]
    pub fn style(&self) -> &ViewStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut ViewStyle {
        &mut self.style
    }

    /// Effective settings for the current zoom.
    pub fn strategy_for(&self, bp_per_screen: u64) -> RenderStrategy {
        match &self.kind {
            TrackKind::Genes { scale_table, .. } => scale_table.strategy_for(bp_per_screen),
            _ => RenderStrategy {
                labels: self.settings.labels,
                granularity: FeatureGranularity::Gene,
            },
        }
    }

    /// Writes pixel positions for every feature at `scale`, x relative to
    /// `view_start`. Hosts with their own layout pass skip this and write
    /// positions directly.
    pub fn layout(&mut self, view_start: u64, scale: f64, y: f32) {
        for feature in self.model.features_mut() {
            let x = (feature.start.saturating_sub(view_start) as f64 * scale) as f32;
            feature.set_position(scale, crate::feature::PixelPos::new(x, y));
        }
    }

    /// Hands a fetched payload to the track.
    ///
    /// A payload carrying an `error` field goes to the notification sink
    /// and inserts nothing. Otherwise each parsed feature is inserted,
    /// duplicates skipped, and the fetched range recorded. Returns the
    /// number of features actually added.
    pub fn receive_data(
        &mut self,
        data: &Value,
        start: u64,
        end: u64,
        sink: &dyn NotificationSink,
    ) -> usize {
        if let Some(error) = data.get("error").filter(|v| !v.is_null()) {
            let message = error
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            log::warn!("track {}: backend error: {message}", self.settings.name);
            sink.alert(&message);
            return 0;
        }

        let mut inserted = 0;
        for feature in self.kind.parse(data) {
            if self.model.insert_feature(feature) {
                inserted += 1;
            }
        }
        self.model.mark_fetched(start, end);
        log::debug!(
            "track {}: {inserted} new features for {start}..{end}",
            self.settings.name
        );
        inserted
    }

    /// One draw pass over every positioned feature.
    ///
    /// Oversized regions short-circuit into [`DrawOutcome::Suppressed`]
    /// with the configured message; the host shows it instead of an image.
    pub fn draw(&mut self, canvas: &mut dyn Canvas, scale: f64, bp_per_screen: u64) -> DrawOutcome {
        if let Some(threshold) = self.settings.threshold {
            if bp_per_screen > threshold {
                let prefix = self.settings.threshold_message.as_deref().unwrap_or("");
                return DrawOutcome::Suppressed {
                    message: format!("{prefix}{threshold}"),
                };
            }
        }

        let Track {
            kind,
            model,
            metrics,
            style,
            ..
        } = self;
        let mut drawn = 0;
        for feature in model.features() {
            if feature.position(scale).is_none() {
                continue;
            }
            drawn += 1;
            match kind {
                TrackKind::Genes { view, .. } => view.draw(feature, canvas, metrics, style, scale),
                TrackKind::Crisprs { view, .. } => view.draw(feature, canvas, scale),
                TrackKind::CrisprPairs { view, .. } => view.draw(feature, canvas, scale),
                TrackKind::Protein { view } => {
                    view.draw_sequence(feature, canvas, metrics, style, scale)
                }
            }
        }
        DrawOutcome::Drawn { features: drawn }
    }

    /// Ordered details for the feature with this id, re-resolved from the
    /// store so redraw updates are reflected. Unknown ids get `None`.
    pub fn populate_menu(&self, feature_id: &str) -> Option<Vec<(String, String)>> {
        let feature = self.model.feature_by_id(feature_id)?;
        self.kind.menu(feature)
    }

    /// Applies new filter params and rebuilds the track from nothing:
    /// params first, then host images reset, model dropped, containers
    /// emptied and the first image requested. The glyph width cache stays.
    pub fn invalidate(&mut self, params: Vec<(String, String)>, host: &mut dyn TrackHost) {
        self.model.set_params(params);
        host.reset_images();
        self.model.clear();
        host.clear_image_containers();
        host.make_first_image();
        log::debug!("track {} invalidated", self.settings.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::notify::CollectedAlerts;
    use serde_json::json;

    #[derive(Default)]
    struct RecordingHost {
        calls: Vec<&'static str>,
    }

    impl TrackHost for RecordingHost {
        fn reset_images(&mut self) {
            self.calls.push("reset_images");
        }

        fn clear_image_containers(&mut self) {
            self.calls.push("clear_image_containers");
        }

        fn make_first_image(&mut self) {
            self.calls.push("make_first_image");
        }
    }

    fn crispr_payload(names: &[&str]) -> Value {
        Value::Array(
            names
                .iter()
                .map(|name| {
                    json!({
                        "id": name,
                        "name": name,
                        "start": 1000,
                        "end": 1022,
                        "strand": 1
                    })
                })
                .collect(),
        )
    }

    #[test]
    fn threshold_suppression_appends_the_limit() {
        let mut track = track_crisprs::crisprs_track(None, "https://wge.example/crispr");
        let mut canvas = RecordingCanvas::new(800.0);
        let outcome = track.draw(&mut canvas, 1.0, 3001);
        assert_eq!(
            outcome,
            DrawOutcome::Suppressed {
                message: "Crisprs not displayed for regions larger than 3000".to_string()
            }
        );
        assert!(canvas.commands().is_empty());

        // At the threshold itself the track still draws.
        let outcome = track.draw(&mut canvas, 1.0, 3000);
        assert_eq!(outcome, DrawOutcome::Drawn { features: 0 });
    }

    #[test]
    fn error_payloads_alert_and_insert_nothing() {
        let mut track = track_crisprs::crisprs_track(None, "https://wge.example/crispr");
        let sink = CollectedAlerts::new();
        let inserted = track.receive_data(&json!({"error": "region too big"}), 1, 2, &sink);
        assert_eq!(inserted, 0);
        assert!(track.model().is_empty());
        // The failed region stays unfetched, so the host retries it.
        assert!(track.model().needs_fetch(1, 2));
        assert_eq!(sink.messages(), vec!["region too big"]);
    }

    #[test]
    fn receive_data_skips_duplicate_ids() {
        let mut track = track_crisprs::crisprs_track(None, "https://wge.example/crispr");
        let sink = CollectedAlerts::new();
        assert_eq!(
            track.receive_data(&crispr_payload(&["a", "b"]), 1000, 2000, &sink),
            2
        );
        assert_eq!(
            track.receive_data(&crispr_payload(&["b", "c"]), 2000, 3000, &sink),
            1
        );
        assert_eq!(track.model().len(), 3);
        assert!(sink.is_empty());
    }

    #[test]
    fn invalidate_rebuilds_from_nothing_in_order() {
        let mut track = track_crisprs::crisprs_track(None, "https://wge.example/crispr");
        let sink = CollectedAlerts::new();
        track.receive_data(&crispr_payload(&["a"]), 1000, 2000, &sink);
        assert!(track.model().feature_by_id("a").is_some());
        assert!(!track.model().needs_fetch(1000, 2000));

        let mut host = RecordingHost::default();
        track.invalidate(
            vec![("exonic".to_string(), "1".to_string())],
            &mut host,
        );
        assert_eq!(
            host.calls,
            vec!["reset_images", "clear_image_containers", "make_first_image"]
        );
        assert!(track.model().is_empty());
        assert!(track.model().needs_fetch(1000, 2000));
        assert_eq!(track.model().params(), &[("exonic".to_string(), "1".to_string())]);

        // A later fetch only ever sees post-invalidate features.
        track.receive_data(&crispr_payload(&["d"]), 1000, 2000, &sink);
        assert!(track.model().feature_by_id("a").is_none());
        assert!(track.model().feature_by_id("d").is_some());
    }

    #[test]
    fn menus_resolve_by_id_only() {
        let mut track = track_crisprs::crisprs_track(None, "https://wge.example/crispr");
        let sink = CollectedAlerts::new();
        track.receive_data(&crispr_payload(&["a"]), 1000, 2000, &sink);
        assert!(track.populate_menu("a").is_some());
        assert!(track.populate_menu("missing").is_none());
    }
}
