//! Zoom-dependent render strategy selection.
//!
//! Tracks behave differently per zoom band: whole genes vs transcripts,
//! labels on or off. A [`ScaleTable`] holds the bands in ascending order of
//! visible bp per screen and answers which settings apply right now.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::TrackError;

/// What one feature stands for at the current zoom.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureGranularity {
    #[default]
    Gene,
    Transcript,
}

/// Effective per-zoom settings after bucket merge.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderStrategy {
    pub labels: bool,
    pub granularity: FeatureGranularity,
}

impl Default for RenderStrategy {
    fn default() -> Self {
        Self {
            labels: true,
            granularity: FeatureGranularity::Gene,
        }
    }
}

/// One zoom band. `None` fields leave the base strategy untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScaleBucket {
    /// Upper bound in bp per screen, `None` for the open-ended top band.
    pub max_bp_per_screen: Option<u64>,
    pub labels: Option<bool>,
    pub granularity: Option<FeatureGranularity>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleTable {
    base: RenderStrategy,
    buckets: Vec<ScaleBucket>,
}

impl ScaleTable {
    /// Buckets must come in strictly ascending threshold order and only the
    /// last one may be open-ended.
    pub fn new(base: RenderStrategy, buckets: Vec<ScaleBucket>) -> Result<Self, TrackError> {
        if buckets.is_empty() {
            return Err(TrackError::String(
                "scale table needs at least one bucket".to_string(),
            ));
        }
        for (i, bucket) in buckets.iter().enumerate() {
            if bucket.max_bp_per_screen.is_none() && i + 1 != buckets.len() {
                return Err(TrackError::String(
                    "open-ended scale bucket must come last".to_string(),
                ));
            }
        }
        for (a, b) in buckets.iter().tuple_windows() {
            if let (Some(lo), Some(hi)) = (a.max_bp_per_screen, b.max_bp_per_screen) {
                if lo >= hi {
                    return Err(TrackError::String(format!(
                        "scale thresholds must ascend, got {lo} before {hi}"
                    )));
                }
            }
        }
        Ok(Self { base, buckets })
    }

    /// Settings for the current zoom, given as visible bp per screen.
    ///
    /// Walks the buckets in ascending order and merges the first one whose
    /// upper bound covers `bp_per_screen` over the base strategy. A zoom
    /// beyond every bounded bucket falls back to the base alone.
    pub fn strategy_for(&self, bp_per_screen: u64) -> RenderStrategy {
        let mut strategy = self.base;
        for bucket in &self.buckets {
            let covered = match bucket.max_bp_per_screen {
                Some(max) => bp_per_screen <= max,
                None => true,
            };
            if covered {
                if let Some(labels) = bucket.labels {
                    strategy.labels = labels;
                }
                if let Some(granularity) = bucket.granularity {
                    strategy.granularity = granularity;
                }
                break;
            }
        }
        strategy
    }

    #[inline(always)]
    pub fn base(&self) -> RenderStrategy {
        self.base
    }
}
