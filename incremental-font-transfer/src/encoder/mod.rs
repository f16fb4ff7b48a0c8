//! Builds incremental font transfer fonts and patches from a regular font file.
//!
//! This is the write side counterpart to the rest of the crate: given a font and a
//! description of how it should be incrementally extended, [`encode`] produces an initial,
//! patchable font plus the patch files a client fetches as it requests more of the font.
//!
//! The overall approach mirrors the reference encoder this functionality was modeled on:
//! <https://w3c.github.io/IFT/Overview.html#algo-encoding>

mod closure;
mod compat_id;
mod error;
mod glyph_keyed_diff;
mod graph;
mod patch_map_writer;
mod segmentation;
mod subset_definition;
mod table_keyed_diff;
mod woff2;

pub use closure::glyph_closure;
pub use compat_id::new_compat_id;
pub use error::EncodingError;
pub use glyph_keyed_diff::build_glyph_keyed_patch;
pub use graph::{encode, EncoderConfig, EncodingOutput};
pub use segmentation::{segment_glyphs, ActivationCondition, GlyphSegmentation, PatchId};
pub use subset_definition::SubsetDefinition;
pub use table_keyed_diff::build_table_keyed_patch;
