//! Serializes format 2 `IFT `/`IFTX` patch map tables.
//!
//! This is the write side companion to the format 2 parsing in [`crate::patchmap`]. Field
//! layouts and format flag bit assignments are mirrored from that module and from the
//! fixtures in `font-test-data`'s `ift` module.

use std::collections::BTreeSet;

use font_types::{Fixed, Tag};
use read_fonts::collections::IntSet;
use read_fonts::tables::ift::CompatibilityId;

use crate::patchmap::{DesignSpace, FeatureSet, PatchFormat};

use super::error::EncodingError;

const FEATURES_AND_DESIGN_SPACE: u8 = 0x01;
const CHILD_INDICES: u8 = 0x02;
const PATCH_FORMAT: u8 = 0x08;
const CODEPOINTS_BIT_1: u8 = 0x10;
const CODEPOINTS_BIT_2: u8 = 0x20;
const IGNORED: u8 = 0x40;

/// Top bit of the child index count byte: all listed children must match for this entry to
/// activate, instead of the default "any child matches" semantics.
///
/// This bit is never exercised by any fixture in the corpus this encoder was built against;
/// it is inferred from the decoder exposing a `conjunctive_match` flag alongside the child
/// index list. Treat entries that rely on it with extra suspicion until it has been checked
/// against a conformant client.
const CONJUNCTIVE_CHILD_MATCH: u8 = 0x80;

/// Encodes a [`Fixed`] value as the raw 16.16 fixed point bytes the wire format uses.
///
/// `font_types::Fixed` does not currently expose a raw bit accessor in this tree, so this
/// goes through `f64` and reconstructs the 16.16 representation directly rather than depend
/// on an uncertain method existing on the stub type.
fn fixed_to_be_bytes(value: Fixed) -> [u8; 4] {
    ((value.to_f64() * 65536.0).round() as i32).to_be_bytes()
}

fn patch_format_number(format: PatchFormat) -> u8 {
    match format {
        PatchFormat::TableKeyed {
            fully_invalidating: true,
        } => 1,
        PatchFormat::TableKeyed {
            fully_invalidating: false,
        } => 2,
        PatchFormat::GlyphKeyed => 3,
    }
}

/// One entry of a format 2 patch map, ready to be serialized.
///
/// Entry ids are assigned implicitly by position in the entries slice passed to
/// [`write_format2_table`]: the first entry has id 0, and so on. `ENTRY_ID_DELTA` is never
/// emitted, relying on the decoder's default of `previous id + 1`.
#[derive(Debug, Clone, Default)]
pub struct EntryTemplate {
    pub codepoints: IntSet<u32>,
    pub feature_tags: FeatureSet,
    pub design_space: DesignSpace,
    pub child_indices: Vec<u32>,
    pub conjunctive_child_match: bool,
    pub ignored: bool,
    /// Overrides the table's default patch format for this entry, when set.
    pub format: Option<PatchFormat>,
}

/// Encodes the bias field (if any, per [`codepoints_flags`]) followed by the sparse bit set
/// data for `codepoints`.
fn encode_codepoints(codepoints: &IntSet<u32>) -> Vec<u8> {
    let Some(min) = codepoints.iter().next() else {
        return Vec::new();
    };

    let mut out = if min == 0 {
        Vec::new()
    } else if min <= u16::MAX as u32 {
        (min as u16).to_be_bytes().to_vec()
    } else {
        min.to_be_bytes()[1..].to_vec()
    };

    let bias = if min == 0 { 0 } else { min };
    let shifted: IntSet<u32> = codepoints.iter().map(|cp| cp - bias).collect();
    out.extend(shifted.to_sparse_bit_set());
    out
}

fn codepoints_flags(codepoints: &IntSet<u32>) -> u8 {
    if codepoints.is_empty() {
        return 0;
    }
    let min = codepoints.iter().next().unwrap_or(0);
    if min == 0 {
        CODEPOINTS_BIT_1
    } else if min <= u16::MAX as u32 {
        CODEPOINTS_BIT_2
    } else {
        CODEPOINTS_BIT_1 | CODEPOINTS_BIT_2
    }
}

fn encode_entry(entry: &EntryTemplate, default_format: PatchFormat) -> Vec<u8> {
    let mut flags = 0u8;
    let mut body = Vec::new();

    let feature_tags: BTreeSet<Tag> = match &entry.feature_tags {
        FeatureSet::All => BTreeSet::new(),
        FeatureSet::Set(tags) => tags.clone(),
    };
    let design_space_ranges = match &entry.design_space {
        DesignSpace::All => Vec::new(),
        DesignSpace::Ranges(ranges) => {
            let mut tags: Vec<_> = ranges.keys().collect();
            tags.sort();
            tags.into_iter()
                .flat_map(|tag| ranges[tag].iter().map(move |segment| (*tag, segment)))
                .collect()
        }
    };
    if !feature_tags.is_empty() || !design_space_ranges.is_empty() {
        flags |= FEATURES_AND_DESIGN_SPACE;
        body.push(feature_tags.len() as u8);
        for tag in &feature_tags {
            body.extend_from_slice(&tag.into_bytes());
        }
        // Design space segments are written further below: child indices sit between the
        // feature list and the design space list in the wire format.
    }

    if !entry.child_indices.is_empty() {
        flags |= CHILD_INDICES;
        if entry.conjunctive_child_match {
            flags |= CONJUNCTIVE_CHILD_MATCH;
        }
        body.push(entry.child_indices.len() as u8);
        for index in &entry.child_indices {
            body.extend_from_slice(&index.to_be_bytes()[1..]);
        }
    }

    if flags & FEATURES_AND_DESIGN_SPACE != 0 {
        body.extend_from_slice(&(design_space_ranges.len() as u16).to_be_bytes());
        for (tag, segment) in &design_space_ranges {
            body.extend_from_slice(&tag.into_bytes());
            body.extend_from_slice(&fixed_to_be_bytes(*segment.start()));
            body.extend_from_slice(&fixed_to_be_bytes(*segment.end()));
        }
    }

    let format = entry.format.filter(|f| *f != default_format);
    if let Some(format) = format {
        flags |= PATCH_FORMAT;
        body.push(patch_format_number(format));
    }

    let cp_flags = codepoints_flags(&entry.codepoints);
    if cp_flags != 0 {
        flags |= cp_flags;
        body.extend(encode_codepoints(&entry.codepoints));
    }

    if entry.ignored {
        flags |= IGNORED;
    }

    let mut out = vec![flags];
    out.extend(body);
    out
}

/// Serializes a complete format 2 `IFT `/`IFTX` table.
pub fn write_format2_table(
    compat_id: &CompatibilityId,
    default_format: PatchFormat,
    url_template: &[u8],
    entries: &[EntryTemplate],
) -> Result<Vec<u8>, EncodingError> {
    if entries.len() > 0xFF_FFFF {
        return Err(EncodingError::Internal("too many entries for a Uint24"));
    }
    if url_template.len() > u16::MAX as usize {
        return Err(EncodingError::Internal("url template too long"));
    }

    let mut entries_bytes = Vec::new();
    for entry in entries {
        entries_bytes.extend(encode_entry(entry, default_format));
    }

    let mut out = Vec::new();
    out.push(2u8); // format
    out.extend_from_slice(&0u32.to_be_bytes()); // reserved
    out.extend_from_slice(compat_id.as_slice());
    out.push(patch_format_number(default_format));
    out.extend_from_slice(&(entries.len() as u32).to_be_bytes()[1..]); // Uint24 entry_count
    let entries_offset_pos = out.len();
    out.extend_from_slice(&0u32.to_be_bytes()); // entries_offset, backfilled below
    out.extend_from_slice(&0u32.to_be_bytes()); // entry_id_string_data_offset: always absent
    out.extend_from_slice(&(url_template.len() as u16).to_be_bytes());
    out.extend_from_slice(url_template);

    let entries_offset = out.len() as u32;
    out[entries_offset_pos..entries_offset_pos + 4].copy_from_slice(&entries_offset.to_be_bytes());
    out.extend(entries_bytes);

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::compat_id::new_compat_id;

    #[test]
    fn writes_header_fields() {
        let compat_id = new_compat_id();
        let entries = vec![EntryTemplate {
            codepoints: IntSet::from([5u32, 6, 7]),
            ..Default::default()
        }];

        let bytes = write_format2_table(
            &compat_id,
            PatchFormat::GlyphKeyed,
            b"foo{id}",
            &entries,
        )
        .unwrap();

        assert_eq!(bytes[0], 2);
        assert_eq!(bytes[24], 3); // default_patch_encoding = glyph keyed
        let entry_count = u32::from_be_bytes([0, bytes[25], bytes[26], bytes[27]]);
        assert_eq!(entry_count, 1);
    }

    #[test]
    fn single_entry_round_trips_through_patchmap_reader() {
        use crate::patchmap::{intersecting_patches, SubsetDefinition};
        use read_fonts::tables::ift::Ift;
        use read_fonts::FontRef;
        use write_fonts::FontBuilder;

        let compat_id = new_compat_id();
        let entries = vec![EntryTemplate {
            codepoints: IntSet::from([5u32, 6, 7]),
            ..Default::default()
        }];
        let table_bytes = write_format2_table(
            &compat_id,
            PatchFormat::GlyphKeyed,
            b"foo{id}",
            &entries,
        )
        .unwrap();

        let mut builder = FontBuilder::new();
        builder.add_raw(Tag::new(b"IFT "), table_bytes);
        let font_bytes = builder.build();
        let font = FontRef::new(&font_bytes).unwrap();

        // Sanity check the table at least parses as a format 2 map before relying on the
        // higher level intersecting_patches API.
        let ift_data = font.data_for_tag(Tag::new(b"IFT ")).unwrap();
        assert!(Ift::read(ift_data).is_ok());

        let patches = intersecting_patches(&font, &SubsetDefinition::codepoints(IntSet::from([6u32])))
            .expect("a valid format 2 table should parse");
        assert_eq!(patches.len(), 1);
    }
}
