//! Computes the glyph closure of a subset definition against a base font.
//!
//! Before the encoder can decide which glyphs a patch needs to carry, or which glyph-keyed
//! patches are safe to bundle at the same graph node, it has to know the full set of glyphs
//! that a given codepoint/feature/gid request pulls in once composite outlines and layout
//! substitution rules (GSUB) are taken into account. That closure computation is delegated to
//! the subsetter, since it already has to solve exactly this problem in order to cut a subset.

use read_fonts::collections::IntSet;
use read_fonts::types::{GlyphId, NameId, Tag};
use read_fonts::FontRef;
use skera::{subset_font, Plan, SubsetFlags};

use super::error::EncodingError;
use super::subset_definition::SubsetDefinition;

/// Flags the encoder always asks the subsetter to use.
///
/// `SUBSET_FLAGS_RETAIN_GIDS` is load bearing: glyph keyed patches splice new glyph data into
/// the base font's `glyf`/`gvar`/etc. tables keyed by the *original* glyph id, so every subset
/// cut from this font must keep glyph ids stable.
fn encoder_subset_flags() -> SubsetFlags {
    SubsetFlags::SUBSET_FLAGS_RETAIN_GIDS | SubsetFlags::SUBSET_FLAGS_NOTDEF_OUTLINE
}

fn plan_for(font: &FontRef, subset: &SubsetDefinition) -> Plan {
    let layout_features: IntSet<Tag> = subset.feature_tags().into_iter().collect();

    Plan::new(
        &subset.gids_as_glyph_ids(),
        &subset.codepoints,
        font,
        encoder_subset_flags(),
        &IntSet::<Tag>::empty(),
        &IntSet::<Tag>::empty(),
        &layout_features,
        &IntSet::<NameId>::empty(),
        &IntSet::<u16>::empty(),
        &None,
    )
}

/// The full glyph closure (in the base font's original glyph id numbering) that supporting
/// `subset` requires.
pub fn glyph_closure(
    font: &FontRef,
    subset: &SubsetDefinition,
) -> Result<IntSet<GlyphId>, EncodingError> {
    let plan = plan_for(font, subset);
    Ok(plan.retained_glyphs().clone())
}

/// Cuts a standalone font containing exactly the glyph closure of `subset`.
///
/// The resulting font retains the original glyph ids (see [`encoder_subset_flags`]), which is
/// what lets later graph nodes be expressed as diffs against this one.
pub fn cut_subset(font: &FontRef, subset: &SubsetDefinition) -> Result<Vec<u8>, EncodingError> {
    let plan = plan_for(font, subset);
    Ok(subset_font(font, &plan)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata::test_font_for_patching;

    #[test]
    fn closure_retains_requested_gids() {
        let font_bytes = test_font_for_patching();
        let font = FontRef::new(&font_bytes).unwrap();

        let mut subset = SubsetDefinition::default();
        subset.gids.insert(2);

        let closure = glyph_closure(&font, &subset).expect("closure should succeed");

        assert!(closure.contains(GlyphId::new(2)));
    }

    #[test]
    fn cut_subset_produces_a_parseable_font() {
        let font_bytes = test_font_for_patching();
        let font = FontRef::new(&font_bytes).unwrap();

        let mut subset = SubsetDefinition::default();
        subset.gids.insert(2);

        let subset_bytes = cut_subset(&font, &subset).expect("cutting should succeed");

        FontRef::new(&subset_bytes).expect("cut subset should be a valid font");
    }
}
