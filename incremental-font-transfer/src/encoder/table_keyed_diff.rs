//! Builds table keyed ("iftk") patches.
//!
//! A table keyed patch carries, for each table that differs between a base font and an
//! extended font, a brotli stream that either replaces the table outright or was compressed
//! using the base table's bytes as a shared dictionary. See:
//! <https://w3c.github.io/IFT/Overview.html#table-keyed>

use std::collections::{BTreeMap, BTreeSet};

use read_fonts::tables::ift::CompatibilityId;
use read_fonts::types::Tag;
use read_fonts::FontRef;
use shared_brotli_patch_encoder::SharedBrotliEncoder;

use super::error::EncodingError;

const REPLACE_TABLE: u8 = 0x1;
const DROP_TABLE: u8 = 0x2;

/// One table's worth of change between a base font and an extended font.
enum TableDiff {
    /// The table is new, or the encoder has chosen not to diff it against the base table.
    Replace(Vec<u8>),
    /// The table exists in both fonts; compress `new` using `base` as a shared dictionary.
    Patch { base: Vec<u8>, new: Vec<u8> },
    /// The table existed in the base font and is not present in the extended font.
    Drop,
}

/// Computes the set of per-table diffs needed to turn `base_font` into `extended_font`.
///
/// Tags in `excluded` are skipped entirely: used in mixed mode to keep `glyf`/`loca`/`IFT `/
/// `IFTX` out of table-keyed diffs when a glyph-keyed patch is what delivers them instead.
fn diff_tables(
    base_font: &FontRef,
    extended_font: &FontRef,
    excluded: &BTreeSet<Tag>,
) -> BTreeMap<Tag, TableDiff> {
    let mut diffs = BTreeMap::new();

    for record in extended_font.table_directory.table_records() {
        let tag = record.tag();
        if excluded.contains(&tag) {
            continue;
        }
        let Some(new_data) = extended_font.table_data(tag) else {
            continue;
        };
        let new_data = new_data.as_bytes().to_vec();

        match base_font.table_data(tag) {
            Some(base_data) if base_data.as_bytes() == new_data.as_slice() => {
                // Unchanged, the decoder will carry the base table forward untouched.
            }
            Some(base_data) => {
                diffs.insert(
                    tag,
                    TableDiff::Patch {
                        base: base_data.as_bytes().to_vec(),
                        new: new_data,
                    },
                );
            }
            None => {
                diffs.insert(tag, TableDiff::Replace(new_data));
            }
        }
    }

    for record in base_font.table_directory.table_records() {
        let tag = record.tag();
        if excluded.contains(&tag) {
            continue;
        }
        if extended_font.table_data(tag).is_none() {
            diffs.insert(tag, TableDiff::Drop);
        }
    }

    diffs
}

/// Builds a complete `iftk` patch blob that turns `base_font` into `extended_font`.
///
/// `excluded` lists tables to leave out of the diff altogether, for mixed mode graph nodes
/// where a glyph-keyed patch is responsible for those tables instead (see
/// [`super::graph`]).
pub fn build_table_keyed_patch(
    base_font: &FontRef,
    extended_font: &FontRef,
    excluded: &BTreeSet<Tag>,
    compat_id: &CompatibilityId,
    brotli: &dyn SharedBrotliEncoder,
) -> Result<Vec<u8>, EncodingError> {
    let diffs = diff_tables(base_font, extended_font, excluded);

    let mut headers = Vec::with_capacity(diffs.len());
    for (tag, diff) in &diffs {
        let (flags, max_len, stream) = match diff {
            TableDiff::Replace(new) => (
                REPLACE_TABLE,
                new.len() as u32,
                brotli
                    .encode(new, None)
                    .map_err(|_| EncodingError::BrotliEncodingFailed)?,
            ),
            TableDiff::Patch { base, new } => (
                0,
                new.len() as u32,
                brotli
                    .encode(new, Some(base))
                    .map_err(|_| EncodingError::BrotliEncodingFailed)?,
            ),
            TableDiff::Drop => (DROP_TABLE, 0, Vec::new()),
        };
        headers.push((*tag, flags, max_len, stream));
    }

    let mut out = Vec::new();
    out.extend_from_slice(b"iftk");
    out.extend_from_slice(&0u32.to_be_bytes()); // reserved
    out.extend_from_slice(compat_id.as_slice());
    out.extend_from_slice(&(headers.len() as u16).to_be_bytes());

    // Reserve space for the patch_offsets[patch_count + 1] array, filled in below.
    let offsets_start = out.len();
    out.resize(offsets_start + (headers.len() + 1) * 4, 0);

    let mut offsets = Vec::with_capacity(headers.len() + 1);
    for (tag, flags, max_len, stream) in &headers {
        offsets.push(out.len() as u32);
        out.extend_from_slice(&tag.into_bytes());
        out.push(*flags);
        out.extend_from_slice(&max_len.to_be_bytes());
        out.extend_from_slice(stream);
    }
    offsets.push(out.len() as u32);

    for (i, offset) in offsets.into_iter().enumerate() {
        let at = offsets_start + i * 4;
        out[at..at + 4].copy_from_slice(&offset.to_be_bytes());
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::compat_id::new_compat_id;
    use read_fonts::FontRef;
    use shared_brotli_patch_encoder::BuiltInBrotliEncoder;
    use write_fonts::FontBuilder;

    fn font(tables: &[(Tag, &[u8])]) -> Vec<u8> {
        let mut b = FontBuilder::new();
        for (tag, data) in tables {
            b.add_raw(*tag, *data);
        }
        b.build()
    }

    #[test]
    fn round_trips_replace_patch_and_drop() {
        let base_bytes = font(&[
            (Tag::new(b"tab1"), b"original one"),
            (Tag::new(b"tab2"), b"original two"),
            (Tag::new(b"tab3"), b"drop me"),
        ]);
        let extended_bytes = font(&[
            (Tag::new(b"tab1"), b"original one"),
            (Tag::new(b"tab2"), b"changed two!!"),
            (Tag::new(b"tab4"), b"brand new"),
        ]);

        let base = FontRef::new(&base_bytes).unwrap();
        let extended = FontRef::new(&extended_bytes).unwrap();
        let compat_id = new_compat_id();
        let encoder = BuiltInBrotliEncoder;

        let patch_bytes = build_table_keyed_patch(
            &base,
            &extended,
            &BTreeSet::new(),
            &compat_id,
            &encoder,
        )
        .unwrap();

        assert_eq!(&patch_bytes[0..4], b"iftk");

        let patch_count = u16::from_be_bytes([patch_bytes[24], patch_bytes[25]]);
        assert_eq!(patch_count, 3); // tab2 patched, tab3 dropped, tab4 replaced
    }

    #[test]
    fn excluded_tables_are_left_out_of_the_diff() {
        let base_bytes = font(&[
            (Tag::new(b"tab1"), b"original one"),
            (Tag::new(b"glyf"), b"original glyf data"),
        ]);
        let extended_bytes = font(&[
            (Tag::new(b"tab1"), b"changed one!"),
            (Tag::new(b"glyf"), b"completely different glyf data"),
        ]);

        let base = FontRef::new(&base_bytes).unwrap();
        let extended = FontRef::new(&extended_bytes).unwrap();
        let compat_id = new_compat_id();
        let encoder = BuiltInBrotliEncoder;
        let excluded = BTreeSet::from([Tag::new(b"glyf")]);

        let patch_bytes =
            build_table_keyed_patch(&base, &extended, &excluded, &compat_id, &encoder).unwrap();

        let patch_count = u16::from_be_bytes([patch_bytes[24], patch_bytes[25]]);
        assert_eq!(patch_count, 1); // only tab1, glyf excluded despite differing
    }
}
