//! A description of a font subset used while building the extension graph.
//!
//! This extends [`crate::patchmap::SubsetDefinition`] with a set of glyph ids: the patch map
//! only ever needs to describe *when* a patch activates (codepoints, feature tags, design
//! space), but the encoder additionally has to know exactly which glyphs a subset should retain
//! when it asks the subsetter to cut a patch.

use std::collections::BTreeSet;

use font_types::Tag;
use read_fonts::collections::{IntSet, RangeSet};
use read_fonts::types::GlyphId;

use crate::patchmap::{DesignSpace, FeatureSet, SubsetDefinition as PatchMapSubsetDefinition};

/// The input subset definition for one node of the encoder's extension graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubsetDefinition {
    pub codepoints: IntSet<u32>,
    pub gids: IntSet<u32>,
    pub feature_tags: FeatureSet,
    pub design_space: DesignSpace,
}

impl SubsetDefinition {
    pub fn new(
        codepoints: IntSet<u32>,
        gids: IntSet<u32>,
        feature_tags: FeatureSet,
        design_space: DesignSpace,
    ) -> Self {
        Self {
            codepoints,
            gids,
            feature_tags,
            design_space,
        }
    }

    pub fn codepoints(codepoints: IntSet<u32>) -> Self {
        Self {
            codepoints,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.codepoints.is_empty()
            && self.gids.is_empty()
            && matches!(&self.feature_tags, FeatureSet::Set(s) if s.is_empty())
            && matches!(&self.design_space, DesignSpace::Ranges(r) if r.is_empty())
    }

    /// Merges `other` into this definition, taking the union along every axis.
    pub fn union(&mut self, other: &SubsetDefinition) {
        self.codepoints.union(&other.codepoints);
        self.gids.union(&other.gids);

        match &other.feature_tags {
            FeatureSet::All => self.feature_tags = FeatureSet::All,
            FeatureSet::Set(tags) => self.feature_tags.extend(tags.iter().copied()),
        }

        match (&other.design_space, &mut self.design_space) {
            (_, DesignSpace::All) | (DesignSpace::All, _) => self.design_space = DesignSpace::All,
            (DesignSpace::Ranges(other_ranges), DesignSpace::Ranges(self_ranges)) => {
                for (tag, segments) in other_ranges.iter() {
                    self_ranges.entry(*tag).or_default().extend(segments.iter());
                }
            }
        }
    }

    /// Removes everything present in `other` from this definition.
    ///
    /// For design space, an axis tag present on both sides is dropped from the result
    /// entirely rather than split into a remaining sub-range, even when `other`'s range only
    /// partially overlaps this one's: this is the conservative behavior the ranges need to
    /// preserve until design-space interval splitting is specified.
    pub fn subtract(&mut self, other: &SubsetDefinition) {
        self.codepoints.remove_all(other.codepoints.iter());
        self.gids.remove_all(other.gids.iter());

        if let (FeatureSet::Set(self_tags), FeatureSet::Set(other_tags)) =
            (&mut self.feature_tags, &other.feature_tags)
        {
            for tag in other_tags {
                self_tags.remove(tag);
            }
        }

        if let (DesignSpace::Ranges(self_ranges), DesignSpace::Ranges(other_ranges)) =
            (&mut self.design_space, &other.design_space)
        {
            for tag in other_ranges.keys() {
                self_ranges.remove(tag);
            }
        }
    }

    /// Returns the portion of this subset definition that activates a patch, dropping the
    /// glyph id set (glyph ids are never part of a patch map entry's activation condition).
    pub fn to_coverage(&self) -> PatchMapSubsetDefinition {
        PatchMapSubsetDefinition::new(
            self.codepoints.clone(),
            self.feature_tags.clone(),
            self.design_space.clone(),
        )
    }

    pub fn feature_tags(&self) -> BTreeSet<Tag> {
        match &self.feature_tags {
            FeatureSet::All => BTreeSet::new(),
            FeatureSet::Set(tags) => tags.clone(),
        }
    }

    pub fn gids_as_glyph_ids(&self) -> IntSet<GlyphId> {
        let mut out = IntSet::<GlyphId>::empty();
        for gid in self.gids.iter() {
            out.insert(GlyphId::new(gid as u16));
        }
        out
    }

    /// A byte string that uniquely identifies this subset definition's value.
    ///
    /// `SubsetDefinition` can't cheaply derive `Hash`/`Eq` (`IntSet` and `RangeSet` don't
    /// implement them), so the graph builder uses this as the key into its subset -> built
    /// font memoization table instead.
    pub fn cache_key(&self) -> Vec<u8> {
        let mut key = Vec::new();
        key.extend(self.codepoints.iter().flat_map(|cp| cp.to_be_bytes()));
        key.push(0xff);
        key.extend(self.gids.iter().flat_map(|gid| gid.to_be_bytes()));
        key.push(0xff);
        match &self.feature_tags {
            FeatureSet::All => key.push(1),
            FeatureSet::Set(tags) => {
                key.push(0);
                for tag in tags {
                    key.extend(tag.into_bytes());
                }
            }
        }
        key.push(0xff);
        match &self.design_space {
            DesignSpace::All => key.push(1),
            DesignSpace::Ranges(ranges) => {
                key.push(0);
                let mut tags: Vec<_> = ranges.keys().collect();
                tags.sort();
                for tag in tags {
                    key.extend(tag.into_bytes());
                    for segment in ranges[tag].iter() {
                        key.extend(segment.start().to_f64().to_bits().to_be_bytes());
                        key.extend(segment.end().to_f64().to_bits().to_be_bytes());
                    }
                }
            }
        }
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_combines_codepoints_and_gids() {
        let mut a = SubsetDefinition::codepoints(IntSet::from([1u32, 2]));
        a.gids.insert(5);
        let mut b = SubsetDefinition::codepoints(IntSet::from([2u32, 3]));
        b.gids.insert(6);

        a.union(&b);

        assert!(a.codepoints.contains(1));
        assert!(a.codepoints.contains(2));
        assert!(a.codepoints.contains(3));
        assert!(a.gids.contains(5));
        assert!(a.gids.contains(6));
    }

    #[test]
    fn subtract_removes_shared_members() {
        let mut a = SubsetDefinition::codepoints(IntSet::from([1u32, 2, 3]));
        let b = SubsetDefinition::codepoints(IntSet::from([2u32]));

        a.subtract(&b);

        assert!(a.codepoints.contains(1));
        assert!(!a.codepoints.contains(2));
        assert!(a.codepoints.contains(3));
    }

    #[test]
    fn subtract_drops_a_design_space_axis_present_on_both_sides() {
        use font_types::Fixed;
        use std::collections::HashMap;

        let mut wght = RangeSet::<Fixed>::default();
        wght.insert(Fixed::from_i32(400)..=Fixed::from_i32(700));
        let mut wdth = RangeSet::<Fixed>::default();
        wdth.insert(Fixed::from_i32(75)..=Fixed::from_i32(100));

        let mut a = SubsetDefinition {
            design_space: DesignSpace::Ranges(HashMap::from([
                (Tag::new(b"wght"), wght),
                (Tag::new(b"wdth"), wdth.clone()),
            ])),
            ..Default::default()
        };

        // Only partially overlaps a's wght range, but the axis is still dropped entirely
        // rather than split into a remaining sub-range.
        let mut other_wght = RangeSet::<Fixed>::default();
        other_wght.insert(Fixed::from_i32(500)..=Fixed::from_i32(600));
        let b = SubsetDefinition {
            design_space: DesignSpace::Ranges(HashMap::from([(Tag::new(b"wght"), other_wght)])),
            ..Default::default()
        };

        a.subtract(&b);

        let DesignSpace::Ranges(remaining) = &a.design_space else {
            panic!("expected Ranges");
        };
        assert!(!remaining.contains_key(&Tag::new(b"wght")));
        assert_eq!(remaining.get(&Tag::new(b"wdth")), Some(&wdth));
    }

    #[test]
    fn cache_key_is_stable_and_distinguishes_definitions() {
        let a = SubsetDefinition::codepoints(IntSet::from([1u32, 2]));
        let b = SubsetDefinition::codepoints(IntSet::from([1u32, 2]));
        let c = SubsetDefinition::codepoints(IntSet::from([1u32, 3]));

        assert_eq!(a.cache_key(), b.cache_key());
        assert_ne!(a.cache_key(), c.cache_key());
    }
}
