//! Fixed color tables shared by the track views.

use std::collections::HashMap;

use egui::Color32;
use lazy_static::lazy_static;

/// Residues without an entry in [`residue_color`].
pub const RESIDUE_DEFAULT: Color32 = Color32::from_rgb(0xcc, 0xcc, 0xcc);

/// Default label color for residue and index text.
pub const LABEL_DEFAULT: Color32 = Color32::from_rgb(0x00, 0x00, 0x00);

/// Index digits drawn over a white-label glyph switch to this so they stay
/// visible against the page background.
pub const INDEX_ON_WHITE: Color32 = Color32::from_rgb(0x55, 0xbb, 0x33);

/// Boundary boxes for codons split across the visible region.
pub const PARTIAL_CODON_BOX: Color32 = Color32::from_rgb(0x66, 0x66, 0x66);

/// CDS direction glyphs on merged-annotation transcripts.
pub const ARROW_MERGED: Color32 = Color32::from_rgb(0x66, 0x66, 0x66);

/// CDS direction glyphs on everything else.
pub const ARROW_DEFAULT: Color32 = Color32::from_rgb(0xcc, 0xcc, 0xcc);

/// Body boxes of gene and transcript features.
pub const TRANSCRIPT_BODY: Color32 = Color32::from_rgb(0xcc, 0xcc, 0xcc);

lazy_static! {
    /// Box color per residue, grouped by side-chain property.
    static ref RESIDUE_COLORS: HashMap<char, Color32> = {
        let groups = [
            ("AG", Color32::from_rgb(0x77, 0xdd, 0x88)),
            ("C", Color32::from_rgb(0x99, 0xee, 0x66)),
            ("DENQ", Color32::from_rgb(0x55, 0xbb, 0x33)),
            ("ILMV", Color32::from_rgb(0x66, 0xbb, 0xff)),
            ("FWY", Color32::from_rgb(0x99, 0x99, 0xff)),
            ("H", Color32::from_rgb(0x55, 0x55, 0xff)),
            ("KR", Color32::from_rgb(0xff, 0xcc, 0x77)),
            ("P", Color32::from_rgb(0xee, 0xaa, 0xaa)),
            ("ST", Color32::from_rgb(0xff, 0x44, 0x55)),
            ("*", Color32::from_rgb(0xff, 0x00, 0x00)),
        ];
        let mut map = HashMap::new();
        for (residues, color) in groups {
            for residue in residues.chars() {
                map.insert(residue, color);
            }
        }
        map
    };
}

/// Box color for one residue, falling back to [`RESIDUE_DEFAULT`].
pub fn residue_color(residue: char) -> Color32 {
    RESIDUE_COLORS
        .get(&residue)
        .copied()
        .unwrap_or(RESIDUE_DEFAULT)
}

/// Every residue with its own box color, stop codon included.
pub fn residue_alphabet() -> Vec<char> {
    RESIDUE_COLORS.keys().copied().collect()
}
