//! Synthetic font construction shared by the glyph keyed and table keyed patch
//! application tests.
//!
//! The base font has 15 glyphs (gids 0-14) in `glyf`/`loca`, plus minimal `head`/`maxp`
//! tables and placeholder `IFT `/`IFTX` application bit vectors. Individual tests
//! override whichever tables they need to exercise via `table_overrides`.

use std::collections::HashMap;

use font_types::Tag;
use read_fonts::tables::ift::{IFTX_TAG, IFT_TAG};
use write_fonts::FontBuilder;

const HEAD_TAG: Tag = Tag::new(b"head");
const MAXP_TAG: Tag = Tag::new(b"maxp");
const GLYF_TAG: Tag = Tag::new(b"glyf");
const LOCA_TAG: Tag = Tag::new(b"loca");

const NUM_GLYPHS: u16 = 15;

// Per glyph byte content for the base font. Only the lengths of the untouched glyphs
// (0, 1, 3-6, 10-12, 14) matter to the glyph keyed patch tests; the remaining glyphs
// (2, 7, 8, 9, 13) are always fully replaced by the patches under test, so their
// original content is arbitrary.
const GLYPHS: [&[u8]; 15] = [
    &[1, 2, 3, 4, 5, 0], // gid 0
    &[6, 7, 8, 0],       // gid 1
    &[0, 0, 0, 0],       // gid 2 (replaced by patches)
    &[],                 // gid 3
    &[],                 // gid 4
    &[],                 // gid 5
    &[],                 // gid 6
    &[0, 0, 0, 0],       // gid 7 (replaced by patches)
    &[],                 // gid 8 (replaced by patches)
    &[],                 // gid 9 (replaced by patches)
    &[],                 // gid 10
    &[],                 // gid 11
    &[],                 // gid 12
    &[0, 0],             // gid 13 (replaced by patches)
    &[],                 // gid 14
];

fn head_bytes(index_to_loc_format: i16) -> Vec<u8> {
    let mut buf = Vec::with_capacity(54);
    buf.extend_from_slice(&1u16.to_be_bytes()); // majorVersion
    buf.extend_from_slice(&0u16.to_be_bytes()); // minorVersion
    buf.extend_from_slice(&0i32.to_be_bytes()); // fontRevision
    buf.extend_from_slice(&0u32.to_be_bytes()); // checksumAdjustment
    buf.extend_from_slice(&0x5F0F3CF5u32.to_be_bytes()); // magicNumber
    buf.extend_from_slice(&0u16.to_be_bytes()); // flags
    buf.extend_from_slice(&1000u16.to_be_bytes()); // unitsPerEm
    buf.extend_from_slice(&0i64.to_be_bytes()); // created
    buf.extend_from_slice(&0i64.to_be_bytes()); // modified
    buf.extend_from_slice(&0i16.to_be_bytes()); // xMin
    buf.extend_from_slice(&0i16.to_be_bytes()); // yMin
    buf.extend_from_slice(&0i16.to_be_bytes()); // xMax
    buf.extend_from_slice(&0i16.to_be_bytes()); // yMax
    buf.extend_from_slice(&0u16.to_be_bytes()); // macStyle
    buf.extend_from_slice(&0u16.to_be_bytes()); // lowestRecPPEM
    buf.extend_from_slice(&2i16.to_be_bytes()); // fontDirectionHint
    buf.extend_from_slice(&index_to_loc_format.to_be_bytes());
    buf.extend_from_slice(&0i16.to_be_bytes()); // glyphDataFormat
    buf
}

fn maxp_bytes(num_glyphs: u16) -> Vec<u8> {
    let mut buf = Vec::with_capacity(6);
    buf.extend_from_slice(&0x0000_5000u32.to_be_bytes()); // version 0.5
    buf.extend_from_slice(&num_glyphs.to_be_bytes());
    buf
}

fn glyf_and_loca(short_loca: bool, loca_mod: impl FnOnce(&mut [u32])) -> (Vec<u8>, Vec<u8>) {
    let mut glyf = Vec::new();
    let mut offsets: Vec<u32> = vec![0];
    for glyph in GLYPHS {
        glyf.extend_from_slice(glyph);
        offsets.push(glyf.len() as u32);
    }

    loca_mod(&mut offsets);

    let loca = if short_loca {
        offsets
            .iter()
            .flat_map(|o| ((*o / 2) as u16).to_be_bytes())
            .collect()
    } else {
        offsets.iter().flat_map(|o| o.to_be_bytes()).collect()
    };

    (glyf, loca)
}

/// Builds the base test font with default (all zero) `IFT `/`IFTX` application bit
/// vectors and a short `loca` table.
pub(crate) fn test_font_for_patching() -> Vec<u8> {
    test_font_for_patching_with_loca_mod(true, |_| {}, HashMap::new())
}

/// Builds the base test font, with control over the `loca` format and the ability to
/// override any table (including adding new ones, such as `gvar`).
///
/// `loca_mod` is given the computed glyph offsets (before they're packed into the
/// `loca` table's short or long representation) and may rearrange them.
pub(crate) fn test_font_for_patching_with_loca_mod(
    short_loca: bool,
    loca_mod: impl FnOnce(&mut [u32]),
    table_overrides: HashMap<Tag, &[u8]>,
) -> Vec<u8> {
    let (glyf, loca) = glyf_and_loca(short_loca, loca_mod);

    let mut tables: HashMap<Tag, Vec<u8>> = HashMap::from([
        (HEAD_TAG, head_bytes(if short_loca { 0 } else { 1 })),
        (MAXP_TAG, maxp_bytes(NUM_GLYPHS)),
        (GLYF_TAG, glyf),
        (LOCA_TAG, loca),
        (IFT_TAG, vec![0, 0, 0, 0]),
        (IFTX_TAG, vec![0, 0, 0, 0]),
    ]);

    for (tag, bytes) in table_overrides {
        tables.insert(tag, bytes.to_vec());
    }

    let mut builder = FontBuilder::new();
    for (tag, bytes) in &tables {
        builder.add_table(*tag, bytes.as_slice());
    }
    builder.build()
}
