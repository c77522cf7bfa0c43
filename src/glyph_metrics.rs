//! Lazy label width cache.
//!
//! Text measurement goes through the host surface and is far too slow to
//! repeat per glyph per frame. Widths are measured once per key and kept
//! for the whole life of the track; a cache survives
//! [`crate::track::Track::invalidate`] on purpose since font metrics do not
//! change when the data does.

use std::collections::HashMap;

use egui::FontId;

use crate::canvas::Canvas;

/// Cache key. Integer labels of equal digit count render at the same width
/// in the label font, so they share one entry; any other label caches under
/// its own text.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum MetricKey {
    Digits(usize),
    Text(String),
}

impl MetricKey {
    pub fn for_label(label: &str) -> Self {
        if !label.is_empty() && label.bytes().all(|b| b.is_ascii_digit()) {
            MetricKey::Digits(label.len())
        } else {
            MetricKey::Text(label.to_string())
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct GlyphMetrics {
    widths: HashMap<MetricKey, f32>,
    widest_label: f32,
}

impl GlyphMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached width of `label` in pixels.
    ///
    /// The first call per key measures through the canvas, rounds up and
    /// adds one pixel of breathing room; every later call is a map lookup.
    pub fn measure(&mut self, canvas: &dyn Canvas, font: &FontId, label: &str) -> f32 {
        let key = MetricKey::for_label(label);
        if let Some(width) = self.widths.get(&key) {
            return *width;
        }
        let width = canvas.measure_text(label, font).ceil() + 1.0;
        if matches!(key, MetricKey::Text(_)) && width > self.widest_label {
            self.widest_label = width;
        }
        self.widths.insert(key, width);
        width
    }

    /// Widest non-numeric label measured so far.
    #[inline(always)]
    pub fn widest_label_width(&self) -> f32 {
        self.widest_label
    }

    /// Measures every character in `alphabet`, so the widest-label figure
    /// is stable before the first suppression decision.
    pub fn ensure_alphabet<I>(&mut self, canvas: &dyn Canvas, font: &FontId, alphabet: I)
    where
        I: IntoIterator<Item = char>,
    {
        let mut buf = [0u8; 4];
        for ch in alphabet {
            self.measure(canvas, font, ch.encode_utf8(&mut buf));
        }
    }

    /// Track-wide label decision for one draw pass: labels fit unless three
    /// copies of the widest label would overflow one residue cell.
    pub fn labels_fit(&self, per_residue_px: f32) -> bool {
        self.widest_label * 3.0 < per_residue_px
    }
}
