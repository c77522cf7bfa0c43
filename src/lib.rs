pub mod canvas;
pub mod error;
pub mod feature;
pub mod glyph_metrics;
pub mod model;
pub mod notify;
pub mod palette;
pub mod render_export;
pub mod scale;
pub mod track;
pub mod track_crisprs;
pub mod track_genes;
pub mod track_protein;
pub mod view;
pub mod view_sequence;
pub mod view_transcript;
