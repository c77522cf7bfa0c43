//! Per-track data state: fetch URL, fetched ranges and the feature store.
//!
//! The host does the actual fetching and tiling; this model answers which
//! URL to hit, remembers what has been fetched and keeps the features in
//! insertion order with a by-id index. A whole-model [`TrackModel::clear`]
//! is the only invalidation there is.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::TrackError;
use crate::feature::Feature;

/// Decodes a JSON array payload row by row. Malformed rows are logged and
/// skipped; a non-array payload yields nothing. Parsers never panic on
/// wire data.
pub(crate) fn parse_rows<T>(data: &Value, what: &str) -> Vec<T>
where
    T: DeserializeOwned,
{
    let Some(rows) = data.as_array() else {
        log::warn!("{what} payload is not an array");
        return Vec::new();
    };
    rows.iter()
        .filter_map(|row| match T::deserialize(row) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                log::warn!("skipping malformed {what} row: {err}");
                None
            }
        })
        .collect()
}

/// Inclusive bp ranges already fetched, kept merged.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RangeList {
    ranges: Vec<(u64, u64)>,
}

impl RangeList {
    pub fn add(&mut self, start: u64, end: u64) {
        self.ranges.push((start.min(end), start.max(end)));
        self.ranges.sort_unstable();
        let mut merged: Vec<(u64, u64)> = Vec::with_capacity(self.ranges.len());
        for &(start, end) in &self.ranges {
            match merged.last_mut() {
                Some((_, last_end)) if start <= last_end.saturating_add(1) => {
                    *last_end = (*last_end).max(end);
                }
                _ => merged.push((start, end)),
            }
        }
        self.ranges = merged;
    }

    pub fn covers(&self, start: u64, end: u64) -> bool {
        self.ranges
            .iter()
            .any(|&(from, to)| from <= start && end <= to)
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn clear(&mut self) {
        self.ranges.clear();
    }
}

#[derive(Clone, Debug, Default)]
pub struct TrackModel {
    url: Option<String>,
    params: Vec<(String, String)>,
    buffer: u64,
    data_ranges: RangeList,
    features: Vec<Feature>,
    features_by_id: HashMap<String, usize>,
}

impl TrackModel {
    pub fn new(url: Option<String>, buffer: u64) -> Self {
        Self {
            url,
            buffer,
            ..Default::default()
        }
    }

    /// Fetch URL for a region: placeholders substituted, buffer applied,
    /// stored query params appended.
    pub fn fetch_url(&self, chr: &str, start: u64, end: u64) -> Result<String, TrackError> {
        let Some(template) = &self.url else {
            return Err(TrackError::String("track has no data URL".to_string()));
        };
        let padded_start = start.saturating_sub(self.buffer).max(1);
        let padded_end = end.saturating_add(self.buffer);
        let mut url = template
            .replace("__CHR__", chr)
            .replace("__START__", &padded_start.to_string())
            .replace("__END__", &padded_end.to_string());
        for (key, value) in &self.params {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(key);
            url.push('=');
            url.push_str(value);
        }
        Ok(url)
    }

    pub fn set_params(&mut self, params: Vec<(String, String)>) {
        self.params = params;
    }

    #[inline(always)]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Adds a feature unless its id is already taken. First insert wins.
    pub fn insert_feature(&mut self, feature: Feature) -> bool {
        if self.features_by_id.contains_key(&feature.id) {
            return false;
        }
        self.features_by_id
            .insert(feature.id.clone(), self.features.len());
        self.features.push(feature);
        true
    }

    pub fn feature_by_id(&self, id: &str) -> Option<&Feature> {
        self.features_by_id.get(id).map(|&i| &self.features[i])
    }

    #[inline(always)]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Mutable view for the layout pass writing pixel positions.
    #[inline(always)]
    pub fn features_mut(&mut self) -> &mut [Feature] {
        &mut self.features
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn mark_fetched(&mut self, start: u64, end: u64) {
        self.data_ranges.add(start, end);
    }

    pub fn needs_fetch(&self, start: u64, end: u64) -> bool {
        !self.data_ranges.covers(start, end)
    }

    /// Drops ranges, features and the id index in one go. The model is
    /// indistinguishable from first load afterwards, URL and params aside.
    pub fn clear(&mut self) {
        self.data_ranges.clear();
        self.features.clear();
        self.features_by_id.clear();
    }
}
