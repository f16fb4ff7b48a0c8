//! Builds the IFT extension graph: the base font, the `IFT `/`IFTX` patch map describing how to
//! extend it, and the patches themselves.
//!
//! Mirrors the `Encoder::Encode`/`OutgoingEdges` algorithm from the implementation this crate's
//! patch map reader and patch appliers were themselves built against:
//! <https://w3c.github.io/IFT/Overview.html#algo-encoding>

use std::collections::{BTreeSet, HashMap};

use font_types::Tag;
use log::debug;
use read_fonts::tables::ift::CompatibilityId;
use read_fonts::FontRef;
use shared_brotli_patch_encoder::SharedBrotliEncoder;
use write_fonts::FontBuilder;

use crate::patchmap::PatchFormat;
use crate::patchmap::PatchId;
use crate::table_keyed::copy_unprocessed_tables;
use crate::url_templates::{compile_template, expand_template};

use super::closure::cut_subset;
use super::compat_id::new_compat_id;
use super::error::EncodingError;
use super::glyph_keyed_diff::build_glyph_keyed_patch;
use super::patch_map_writer::{write_format2_table, EntryTemplate};
use super::subset_definition::SubsetDefinition;
use super::table_keyed_diff::build_table_keyed_patch;
use super::woff2;

const IFT_TAG: Tag = Tag::new(b"IFT ");
const IFTX_TAG: Tag = Tag::new(b"IFTX");
const GLYF_TAG: Tag = Tag::new(b"glyf");
const LOCA_TAG: Tag = Tag::new(b"loca");

/// Tables a glyph-keyed patch delivers directly; table-keyed diffs at a node with any
/// glyph-keyed outgoing edge must leave these alone so the two patch kinds don't race to
/// rewrite the same bytes.
fn glyph_keyed_delivered_tables() -> BTreeSet<Tag> {
    BTreeSet::from([GLYF_TAG, LOCA_TAG, IFT_TAG, IFTX_TAG])
}

/// Configuration for one encoding run.
///
/// Mirrors the setter surface of the original implementation's `Encoder` type
/// (`SetUrlTemplate`, `SetJumpAhead`, `SetBaseSubsetFromDef`, `AddExtensionSubset`, `SetId`).
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// URL template new patches are addressed under, in the human readable `{id}`/`{d1}`/...
    /// syntax accepted by [`crate::url_templates::compile_template`].
    pub url_template: String,
    /// How many extension subsets may be combined into a single outgoing edge from any one
    /// graph node. Must be >= 1.
    pub jump_ahead: u32,
    pub base_subset: SubsetDefinition,
    pub extension_subsets: Vec<SubsetDefinition>,
    /// A caller supplied compatibility id. `[0, 0, 0, 0]`, the default, means "generate one
    /// randomly": every encoding run should produce a table a client can tell apart from every
    /// other run's, and a constant id would defeat that unless the caller deliberately wants
    /// reproducible output (e.g. for golden file tests) and sets this explicitly.
    pub id: [u32; 4],
}

impl EncoderConfig {
    /// Sets the URL template new patches are addressed under.
    ///
    /// Mirrors `Encoder::SetUrlTemplate`.
    pub fn with_url_template(mut self, url_template: impl Into<String>) -> Self {
        self.url_template = url_template.into();
        self
    }

    /// Sets how many extension subsets may be combined into a single outgoing edge.
    ///
    /// Mirrors `Encoder::SetJumpAhead`.
    pub fn with_jump_ahead(mut self, jump_ahead: u32) -> Self {
        self.jump_ahead = jump_ahead;
        self
    }

    /// Sets the base subset every graph node is built on top of.
    ///
    /// Mirrors `Encoder::SetBaseSubset`/`SetBaseSubsetFromDef`.
    pub fn with_base_subset(mut self, base_subset: SubsetDefinition) -> Self {
        self.base_subset = base_subset;
        self
    }

    /// Adds one more independently-requestable extension subset.
    ///
    /// Mirrors `Encoder::AddExtensionSubset`.
    pub fn add_extension_subset(mut self, subset: SubsetDefinition) -> Self {
        self.extension_subsets.push(subset);
        self
    }

    /// Sets the compatibility id embedded in the produced font and patches.
    ///
    /// Mirrors `Encoder::SetId`; the all-zero default generates a random id instead.
    pub fn with_id(mut self, id: [u32; 4]) -> Self {
        self.id = id;
        self
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            url_template: "patch{/d1,d2,id}.br".to_string(),
            jump_ahead: 1,
            base_subset: SubsetDefinition::default(),
            extension_subsets: Vec::new(),
            id: [0, 0, 0, 0],
        }
    }
}

/// The result of a completed encoding run.
pub struct EncodingOutput {
    /// The initial, patchable font.
    pub font: Vec<u8>,
    /// Patch data keyed by the fully expanded URL a client would fetch it from.
    pub patches: HashMap<String, Vec<u8>>,
}

/// Runs the full encoding algorithm against `font`.
pub fn encode(
    font: &FontRef,
    config: &EncoderConfig,
    brotli: &dyn SharedBrotliEncoder,
) -> Result<EncodingOutput, EncodingError> {
    if config.jump_ahead < 1 {
        return Err(EncodingError::InvalidJumpAhead);
    }

    let compat_id = if config.id == [0, 0, 0, 0] {
        new_compat_id()
    } else {
        CompatibilityId::from_u32s(config.id)
    };

    let url_template_bytes = compile_template(&config.url_template)
        .map_err(|e| EncodingError::InvalidUrlTemplate(config.url_template.clone(), e))?;

    let mut builder = GraphBuilder {
        font,
        config,
        compat_id,
        url_template_bytes,
        brotli,
        memo: HashMap::new(),
        patches: HashMap::new(),
        next_id: 0,
    };

    let font_bytes = builder.encode_node(&config.base_subset, true)?;

    Ok(EncodingOutput {
        font: font_bytes,
        patches: builder.patches,
    })
}

struct GraphBuilder<'a> {
    font: &'a FontRef<'a>,
    config: &'a EncoderConfig,
    compat_id: CompatibilityId,
    url_template_bytes: Vec<u8>,
    brotli: &'a dyn SharedBrotliEncoder,
    memo: HashMap<Vec<u8>, Vec<u8>>,
    patches: HashMap<String, Vec<u8>>,
    next_id: u32,
}

impl GraphBuilder<'_> {
    fn encode_node(
        &mut self,
        base: &SubsetDefinition,
        is_root: bool,
    ) -> Result<Vec<u8>, EncodingError> {
        let cache_key = base.cache_key();
        if let Some(bytes) = self.memo.get(&cache_key) {
            return Ok(bytes.clone());
        }

        debug!("encoding graph node, {} outgoing candidate(s)", self.config.extension_subsets.len());

        let base_bytes = cut_subset(self.font, base)?;
        let edges = self.outgoing_edges(base);

        if edges.is_empty() {
            self.memo.insert(cache_key, base_bytes.clone());
            return Ok(base_bytes);
        }

        // Mixed mode (SPEC_FULL.md §4.6): an edge whose added glyph ids are non-empty is
        // delivered as a glyph-keyed patch instead of a table-keyed one. Any such edge at this
        // node means table-keyed diffs here must leave glyf/loca/IFT/IFTX alone, since those
        // are what the glyph-keyed patch rewrites.
        let is_glyph_keyed_edge: Vec<bool> = edges
            .iter()
            .map(|edge| {
                let mut added = edge.clone();
                added.subtract(base);
                !added.gids.is_empty()
            })
            .collect();
        let has_glyph_keyed_edge = is_glyph_keyed_edge.iter().any(|b| *b);
        let table_keyed_excluded = if has_glyph_keyed_edge {
            glyph_keyed_delivered_tables()
        } else {
            BTreeSet::new()
        };

        let mut entries = Vec::with_capacity(edges.len());
        let mut edge_ids = Vec::with_capacity(edges.len());
        for (edge, is_glyph_keyed) in edges.iter().zip(is_glyph_keyed_edge.iter()) {
            let id = self.next_id;
            self.next_id += 1;
            edge_ids.push(id);

            let coverage = edge.to_coverage();
            entries.push(EntryTemplate {
                codepoints: coverage.codepoints,
                feature_tags: coverage.feature_tags,
                design_space: coverage.design_space,
                format: is_glyph_keyed.then_some(PatchFormat::GlyphKeyed),
                ..Default::default()
            });
        }

        let table_bytes = write_format2_table(
            &self.compat_id,
            PatchFormat::TableKeyed {
                fully_invalidating: false,
            },
            &self.url_template_bytes,
            &entries,
        )?;

        let base_with_map = splice_table(&base_bytes, IFT_TAG, table_bytes)?;
        let base_with_map = if is_root {
            woff2::round_trip(&base_with_map)?
        } else {
            base_with_map
        };

        self.memo.insert(cache_key, base_with_map.clone());

        let base_with_map_font = FontRef::new(&base_with_map)?;
        for ((edge, id), is_glyph_keyed) in edges.iter().zip(edge_ids.iter()).zip(is_glyph_keyed_edge.iter())
        {
            let mut child = base.clone();
            child.union(edge);

            let child_bytes = self.encode_node(&child, false)?;
            let child_font = FontRef::new(&child_bytes)?;

            let patch_bytes = if *is_glyph_keyed {
                let mut added_gids = child.clone();
                added_gids.subtract(base);
                build_glyph_keyed_patch(
                    &child_font,
                    &added_gids.gids_as_glyph_ids(),
                    &[],
                    &self.compat_id,
                    self.brotli,
                )?
            } else {
                build_table_keyed_patch(
                    &base_with_map_font,
                    &child_font,
                    &table_keyed_excluded,
                    &self.compat_id,
                    self.brotli,
                )?
            };

            let url = expand_template(&self.url_template_bytes, &PatchId::Numeric(*id))
                .map_err(|e| EncodingError::InvalidUrlTemplate(self.config.url_template.clone(), e))?;
            self.patches.insert(url, patch_bytes);
        }

        Ok(base_with_map)
    }

    /// All unions of 1..=jump_ahead distinct extension subsets that are not already included in
    /// `base`, enumerated in lexicographic order over subset indices.
    ///
    /// Candidates are restricted to extension subsets not already wholly covered by `base`
    /// *before* combining: combining over every configured extension and filtering after the
    /// fact would let an already-included subset ride along in a combo with a genuinely new one
    /// (e.g. `{b, d}` from a base that already has `b`), producing a second, redundant edge to
    /// the same child alongside the `{d}`-only edge.
    fn outgoing_edges(&self, base: &SubsetDefinition) -> Vec<SubsetDefinition> {
        let remaining: Vec<usize> = (0..self.config.extension_subsets.len())
            .filter(|&index| {
                let mut added = self.config.extension_subsets[index].clone();
                added.subtract(base);
                !added.is_empty()
            })
            .collect();

        let n = remaining.len();
        let k_max = (self.config.jump_ahead as usize).min(n);

        let mut combos: Vec<Vec<usize>> = Vec::new();
        for k in 1..=k_max {
            combinations(n, k, &mut combos);
        }

        let mut seen = BTreeSet::new();
        let mut edges = Vec::new();
        for combo in combos {
            let mut combined = SubsetDefinition::default();
            for index in &combo {
                combined.union(&self.config.extension_subsets[remaining[*index]]);
            }

            let key = combined.cache_key();
            if seen.insert(key) {
                edges.push(combined);
            }
        }

        edges
    }
}

/// Appends every size-`k` combination of `0..n` (in lexicographic order) to `out`.
fn combinations(n: usize, k: usize, out: &mut Vec<Vec<usize>>) {
    if k == 0 || k > n {
        return;
    }
    let mut indices: Vec<usize> = (0..k).collect();
    loop {
        out.push(indices.clone());

        let mut i = k;
        loop {
            if i == 0 {
                return;
            }
            i -= 1;
            if indices[i] != i + n - k {
                break;
            }
            if i == 0 {
                return;
            }
        }

        indices[i] += 1;
        for j in i + 1..k {
            indices[j] = indices[j - 1] + 1;
        }
    }
}

fn splice_table(font_bytes: &[u8], tag: Tag, data: Vec<u8>) -> Result<Vec<u8>, EncodingError> {
    let font = FontRef::new(font_bytes)?;
    let mut builder = FontBuilder::new();
    builder.add_raw(tag, data);

    let mut processed = BTreeSet::new();
    processed.insert(tag);
    copy_unprocessed_tables(&font, processed, &mut builder);

    Ok(builder.build())
}
