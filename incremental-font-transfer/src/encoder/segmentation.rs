//! Assigns glyphs to codepoint segments and derives the AND/OR conditions under which each
//! group of glyphs needs to be fetched.
//!
//! Given an initial segment and a list of independently-requestable codepoint segments, a
//! glyph may be pulled in by more than one segment (shared composite components, ligatures
//! that only form when several segments are present together, and so on). This groups glyphs
//! by exactly which segments are jointly responsible for them, so that a glyph-keyed patch is
//! never shipped to a client that hasn't requested enough of the font to need it — the
//! canonical example is a ligature glyph that should only be sent once both halves of the
//! ligature have been requested.

use std::collections::{BTreeMap, BTreeSet};

use read_fonts::collections::IntSet;
use read_fonts::types::GlyphId;
use read_fonts::FontRef;

use super::closure::glyph_closure;
use super::error::EncodingError;
use super::subset_definition::SubsetDefinition;

/// A patch or segment identifier.
pub type PatchId = u32;

/// One `if (...) then activate patch` rule.
///
/// `segment_sets` is a conjunction (AND) of terms, where each term is itself a disjunction
/// (OR) of patch ids: the condition is satisfied when every inner set has at least one member
/// whose patch the client has already matched. A single-segment condition is a one-term,
/// one-member AND-of-OR, which is the common case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationCondition {
    segment_sets: Vec<BTreeSet<PatchId>>,
    activated: PatchId,
}

impl ActivationCondition {
    /// A condition requiring every id in `ids` to independently match (AND).
    pub fn and_patches(ids: &BTreeSet<PatchId>, activated: PatchId) -> Self {
        Self {
            segment_sets: ids.iter().map(|id| BTreeSet::from([*id])).collect(),
            activated,
        }
    }

    /// A condition requiring any one id in `ids` to match (OR).
    pub fn or_patches(ids: &BTreeSet<PatchId>, activated: PatchId) -> Self {
        Self {
            segment_sets: vec![ids.clone()],
            activated,
        }
    }

    pub fn segment_sets(&self) -> &[BTreeSet<PatchId>] {
        &self.segment_sets
    }

    pub fn activated(&self) -> PatchId {
        self.activated
    }
}

/// The result of segmenting a font's glyph closure across a set of codepoint segments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GlyphSegmentation {
    /// Glyphs already reachable from the initial segment alone; these belong in the base font.
    pub init_font_glyphs: BTreeSet<u32>,
    /// Glyphs in the full closure that could not be attributed to any segment or combination
    /// of segments; per this analyzer's resolved policy these are also carried in the base
    /// font rather than requiring a fallback patch.
    pub unmapped_glyphs: BTreeSet<u32>,
    /// The glyph ids each patch id is responsible for delivering.
    pub gid_segments: BTreeMap<PatchId, BTreeSet<u32>>,
    /// Activation conditions, one per produced patch.
    pub conditions: Vec<ActivationCondition>,
}

#[derive(Default)]
struct GlyphConditions {
    and_segments: BTreeSet<usize>,
    or_segments: BTreeSet<usize>,
}

fn closure_codepoints(font: &FontRef, codepoints: &IntSet<u32>) -> Result<BTreeSet<u32>, EncodingError> {
    let subset = SubsetDefinition::codepoints(codepoints.clone());
    Ok(glyph_closure(font, &subset)?
        .iter()
        .map(GlyphId::to_u16)
        .map(u32::from)
        .collect())
}

fn subtract<'a>(a: &mut BTreeSet<u32>, b: impl IntoIterator<Item = &'a u32>) {
    for v in b {
        a.remove(v);
    }
}

/// Groups the glyph closure of `initial_segment ∪ codepoint_segments` by the set of segments
/// that jointly determine each glyph's inclusion, producing one patch (and AND/OR activation
/// condition) per distinct group.
pub fn segment_glyphs(
    font: &FontRef,
    initial_segment: &IntSet<u32>,
    codepoint_segments: &[IntSet<u32>],
) -> Result<GlyphSegmentation, EncodingError> {
    let mut all_codepoints = initial_segment.clone();
    for segment in codepoint_segments {
        all_codepoints.union(segment);
    }

    let initial_closure = closure_codepoints(font, initial_segment)?;
    let full_closure = closure_codepoints(font, &all_codepoints)?;

    let mut gid_conditions: BTreeMap<u32, GlyphConditions> = BTreeMap::new();

    for (segment_index, segment) in codepoint_segments.iter().enumerate() {
        let mut except_segment = all_codepoints.clone();
        for cp in segment.iter() {
            except_segment.remove(cp);
        }
        let b_except_segment = closure_codepoints(font, &except_segment)?;

        let mut only_segment = initial_segment.clone();
        only_segment.union(segment);
        let mut i_only_segment = closure_codepoints(font, &only_segment)?;
        subtract(&mut i_only_segment, &initial_closure);

        let mut dropped = full_closure.clone();
        subtract(&mut dropped, &b_except_segment);

        let mut and_gids = dropped.clone();
        subtract(&mut and_gids, &i_only_segment);

        let mut or_gids = i_only_segment.clone();
        subtract(&mut or_gids, &dropped);

        let exclusive_gids: BTreeSet<u32> = i_only_segment.intersection(&dropped).copied().collect();

        for gid in exclusive_gids.into_iter().chain(and_gids) {
            gid_conditions
                .entry(gid)
                .or_default()
                .and_segments
                .insert(segment_index);
        }
        for gid in or_gids {
            gid_conditions
                .entry(gid)
                .or_default()
                .or_segments
                .insert(segment_index);
        }
    }

    let mut and_glyph_groups: BTreeMap<BTreeSet<usize>, BTreeSet<u32>> = BTreeMap::new();
    let mut or_glyph_groups: BTreeMap<BTreeSet<usize>, BTreeSet<u32>> = BTreeMap::new();
    for (gid, conditions) in &gid_conditions {
        if !conditions.and_segments.is_empty() {
            and_glyph_groups
                .entry(conditions.and_segments.clone())
                .or_default()
                .insert(*gid);
        }
        if !conditions.or_segments.is_empty() {
            or_glyph_groups
                .entry(conditions.or_segments.clone())
                .or_default()
                .insert(*gid);
        }
    }

    let mut unmapped_glyphs = full_closure.clone();
    subtract(&mut unmapped_glyphs, &initial_closure);

    let mut segmentation = GlyphSegmentation {
        init_font_glyphs: initial_closure,
        unmapped_glyphs,
        ..Default::default()
    };

    let mut next_id: PatchId = 0;
    let mut segment_to_patch_id: BTreeMap<usize, PatchId> = BTreeMap::new();

    // Single-segment AND groups get the simplest possible condition: the segment's own patch
    // activates itself.
    for (segments, glyphs) in &and_glyph_groups {
        if segments.len() != 1 {
            continue;
        }
        let segment = *segments.iter().next().unwrap();
        let id = next_id;
        next_id += 1;
        segmentation.gid_segments.insert(id, glyphs.clone());
        segmentation
            .conditions
            .push(ActivationCondition::and_patches(&BTreeSet::from([id]), id));
        subtract(&mut segmentation.unmapped_glyphs, glyphs);
        segment_to_patch_id.insert(segment, id);
    }

    // Multi-segment AND groups reference the single-segment patches assigned above.
    for (segments, glyphs) in &and_glyph_groups {
        if segments.len() == 1 {
            continue;
        }
        let and_patches: BTreeSet<PatchId> = segments
            .iter()
            .filter_map(|s| segment_to_patch_id.get(s).copied())
            .collect();
        let id = next_id;
        next_id += 1;
        segmentation.gid_segments.insert(id, glyphs.clone());
        segmentation
            .conditions
            .push(ActivationCondition::and_patches(&and_patches, id));
        subtract(&mut segmentation.unmapped_glyphs, glyphs);
    }

    for (segments, glyphs) in &or_glyph_groups {
        let or_patches: BTreeSet<PatchId> = segments
            .iter()
            .filter_map(|s| segment_to_patch_id.get(s).copied())
            .collect();
        let id = next_id;
        next_id += 1;
        segmentation.gid_segments.insert(id, glyphs.clone());
        segmentation
            .conditions
            .push(ActivationCondition::or_patches(&or_patches, id));
        subtract(&mut segmentation.unmapped_glyphs, glyphs);
    }

    Ok(segmentation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_condition_is_one_set_per_id() {
        let condition = ActivationCondition::and_patches(&BTreeSet::from([1, 2, 3]), 9);
        assert_eq!(condition.activated(), 9);
        assert_eq!(
            condition.segment_sets(),
            &[
                BTreeSet::from([1]),
                BTreeSet::from([2]),
                BTreeSet::from([3])
            ]
        );
    }

    #[test]
    fn or_condition_is_a_single_set() {
        let condition = ActivationCondition::or_patches(&BTreeSet::from([1, 2, 3]), 9);
        assert_eq!(condition.activated(), 9);
        assert_eq!(condition.segment_sets(), &[BTreeSet::from([1, 2, 3])]);
    }

    #[test]
    fn single_segment_produces_its_own_patch() {
        let font_bytes = crate::testdata::test_font_for_patching();
        let font = FontRef::new(&font_bytes).unwrap();

        // This fixture has no cmap, so codepoints don't map to glyphs; segmenting an
        // all-empty partition should simply report no segments and nothing unmapped beyond
        // whatever the initial (empty) closure reports.
        let segmentation =
            segment_glyphs(&font, &IntSet::<u32>::empty(), &[]).expect("segmentation should succeed");

        assert!(segmentation.gid_segments.is_empty());
        assert!(segmentation.conditions.is_empty());
    }
}
