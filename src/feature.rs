//! Genomic features and their per-zoom pixel state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Feature orientation. `1` and `-1` on the wire; anything else counts as
/// forward.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(from = "i8", into = "i8")]
pub enum Strand {
    #[default]
    Forward,
    Reverse,
}

impl Strand {
    /// Direction glyph drawn inside CDS segments.
    #[inline(always)]
    pub fn arrow(self) -> char {
        match self {
            Strand::Forward => '►',
            Strand::Reverse => '◄',
        }
    }

    #[inline(always)]
    pub fn wire(self) -> i8 {
        i8::from(self)
    }
}

impl From<i8> for Strand {
    fn from(value: i8) -> Self {
        if value == -1 {
            Strand::Reverse
        } else {
            Strand::Forward
        }
    }
}

impl From<Strand> for i8 {
    fn from(strand: Strand) -> Self {
        match strand {
            Strand::Forward => 1,
            Strand::Reverse => -1,
        }
    }
}

/// Hashable key for per-zoom maps, the exact bit pattern of the
/// bp-per-pixel scale.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ScaleKey(u64);

impl ScaleKey {
    pub fn new(scale: f64) -> Self {
        Self(scale.to_bits())
    }

    #[inline(always)]
    pub fn scale(self) -> f64 {
        f64::from_bits(self.0)
    }
}

impl From<f64> for ScaleKey {
    fn from(scale: f64) -> Self {
        Self::new(scale)
    }
}

/// Pixel position of a feature at one zoom level, written by the host's
/// layout pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PixelPos {
    pub x: f32,
    pub y: f32,
}

impl PixelPos {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One coding region of a transcript, in bp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CdsSegment {
    pub start: u64,
    pub end: u64,
}

/// Span of one guide within a pair, in bp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GuideSpan {
    pub start: u64,
    pub end: u64,
}

/// Codon cut off by the region boundary: the residue it belongs to and how
/// many of its bases are inside the region.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartialCodon {
    pub aa: char,
    pub len: u8,
}

/// Annotation carried by gene and transcript features.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneAttrs {
    pub external_name: Option<String>,
    pub description: Option<String>,
    pub parent: Option<String>,
    pub feature_type: Option<String>,
    pub biotype: Option<String>,
    pub source: Option<String>,
    pub logic_name: Option<String>,
    #[serde(default)]
    pub cds: Vec<CdsSegment>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CrisprAttrs {
    pub name: String,
    pub ot_summary: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CrisprPairAttrs {
    pub name: String,
    pub spacer: i64,
    pub ot_summary: Option<String>,
    pub left_ot_summary: Option<String>,
    pub right_ot_summary: Option<String>,
    /// Guide spans; a pair with neither renders as a single box.
    pub left: Option<GuideSpan>,
    pub right: Option<GuideSpan>,
}

/// One translated region: the residue run plus any cut-off boundary codons.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProteinAttrs {
    pub sequence: String,
    pub start_index: i64,
    pub num_amino_acids: i64,
    pub start_base: Option<PartialCodon>,
    pub end_base: Option<PartialCodon>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FeatureKind {
    Gene(GeneAttrs),
    Crispr(CrisprAttrs),
    CrisprPair(CrisprPairAttrs),
    Protein(ProteinAttrs),
}

/// One drawable feature in browser coordinates (1-based bp, inclusive).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: String,
    pub start: u64,
    pub end: u64,
    pub strand: Strand,
    pub kind: FeatureKind,
    /// Pixel position per zoom, written between layout and draw. Not wire
    /// data.
    #[serde(skip)]
    positions: HashMap<ScaleKey, PixelPos>,
}

impl Feature {
    pub fn new(
        id: impl Into<String>,
        start: u64,
        end: u64,
        strand: Strand,
        kind: FeatureKind,
    ) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            strand,
            kind,
            positions: HashMap::new(),
        }
    }

    pub fn set_position(&mut self, scale: f64, pos: PixelPos) {
        self.positions.insert(ScaleKey::new(scale), pos);
    }

    #[inline(always)]
    pub fn position(&self, scale: f64) -> Option<PixelPos> {
        self.positions.get(&ScaleKey::new(scale)).copied()
    }

    /// Span length in bp, both ends included.
    #[inline(always)]
    pub fn length(&self) -> u64 {
        self.end.saturating_sub(self.start) + 1
    }

    #[inline(always)]
    pub fn as_gene(&self) -> Option<&GeneAttrs> {
        match &self.kind {
            FeatureKind::Gene(attrs) => Some(attrs),
            _ => None,
        }
    }

    #[inline(always)]
    pub fn as_crispr(&self) -> Option<&CrisprAttrs> {
        match &self.kind {
            FeatureKind::Crispr(attrs) => Some(attrs),
            _ => None,
        }
    }

    #[inline(always)]
    pub fn as_crispr_pair(&self) -> Option<&CrisprPairAttrs> {
        match &self.kind {
            FeatureKind::CrisprPair(attrs) => Some(attrs),
            _ => None,
        }
    }

    #[inline(always)]
    pub fn as_protein(&self) -> Option<&ProteinAttrs> {
        match &self.kind {
            FeatureKind::Protein(attrs) => Some(attrs),
            _ => None,
        }
    }
}
