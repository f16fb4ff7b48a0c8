//! IFT Build
//!
//! This command line tool runs the encoder to produce an initial incrementally transferable
//! font plus the patch files needed to extend it, from a regular font file and a description
//! of the extension subsets to support.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;
use font_types::{Fixed, Tag};
use incremental_font_transfer::encoder::{encode, EncoderConfig, SubsetDefinition};
use incremental_font_transfer::patchmap::{DesignSpace, FeatureSet};
use read_fonts::collections::{IntSet, RangeSet};
use read_fonts::FontRef;
use serde::Deserialize;
use shared_brotli_patch_encoder::BuiltInBrotliEncoder;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Builds an incremental font transfer font plus its patches from a regular font file."
)]
struct Args {
    /// The input font file.
    #[arg(short, long)]
    font: PathBuf,

    /// Directory patches and the initial font are written to.
    #[arg(short, long)]
    output_dir: PathBuf,

    /// A JSON segmentation config describing the base subset and extension subsets (codepoints,
    /// feature tags, and design space axes). Takes precedence over `--base-codepoints`/
    /// `--extension` when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Comma separated codepoint ranges (e.g. "41-5a,61-7a") the base subset should cover.
    #[arg(long, value_delimiter = ',', num_args = 0..)]
    base_codepoints: Vec<String>,

    /// One `--extension` per extension subset, each a comma separated list of codepoint
    /// ranges clients may extend the base font with.
    #[arg(long = "extension", value_delimiter = ';', num_args = 0..)]
    extensions: Vec<String>,

    /// URL template new patches are addressed under.
    #[arg(long, default_value = "patch{/d1,d2,id}.br")]
    url_template: String,

    /// How many extension subsets may be combined into a single outgoing edge.
    #[arg(long, default_value_t = 1)]
    jump_ahead: u32,
}

/// One segment of a JSON segmentation config (`SegmentationFile::base` or one entry of
/// `SegmentationFile::extensions`).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SegmentConfig {
    /// Codepoints as hex strings, each either a single value ("41") or an inclusive range
    /// ("41-5a"), matching the syntax already accepted by `--base-codepoints`/`--extension`.
    codepoints: Vec<String>,
    /// OpenType feature tags this segment additionally requires, e.g. "liga".
    feature_tags: Vec<String>,
    /// Variable font axis ranges this segment adds, keyed by axis tag, e.g.
    /// `{"wdth": [75.0, 100.0]}`.
    design_space: BTreeMap<String, [f64; 2]>,
}

/// The top level shape of a `--config` segmentation file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SegmentationFile {
    base: SegmentConfig,
    extensions: Vec<SegmentConfig>,
}

fn parse_codepoints(ranges: &[String]) -> Result<IntSet<u32>, String> {
    let mut codepoints = IntSet::<u32>::empty();
    for range in ranges {
        let range = range.trim();
        if range.is_empty() {
            continue;
        }
        match range.split_once('-') {
            Some((start, end)) => {
                let start = u32::from_str_radix(start, 16)
                    .map_err(|e| format!("bad codepoint range start '{start}': {e}"))?;
                let end = u32::from_str_radix(end, 16)
                    .map_err(|e| format!("bad codepoint range end '{end}': {e}"))?;
                codepoints.insert_range(start..=end);
            }
            None => {
                let cp = u32::from_str_radix(range, 16)
                    .map_err(|e| format!("bad codepoint value '{range}': {e}"))?;
                codepoints.insert(cp);
            }
        }
    }
    Ok(codepoints)
}

fn segment_config_to_subset(segment: &SegmentConfig) -> Result<SubsetDefinition, String> {
    let codepoints = parse_codepoints(&segment.codepoints)?;

    let mut feature_tags = FeatureSet::default();
    for tag in &segment.feature_tags {
        if tag.len() != 4 {
            return Err(format!("feature tag '{tag}' is not 4 characters long"));
        }
        feature_tags.insert(Tag::new(tag.as_bytes()));
    }

    let mut ranges = std::collections::HashMap::new();
    for (tag, [start, end]) in &segment.design_space {
        if tag.len() != 4 {
            return Err(format!("design space axis tag '{tag}' is not 4 characters long"));
        }
        if end < start {
            return Err(format!(
                "design space axis '{tag}' has end ({end}) before start ({start})"
            ));
        }
        let mut range = RangeSet::<Fixed>::default();
        range.insert(Fixed::from_f64(*start)..=Fixed::from_f64(*end));
        ranges.insert(Tag::new(tag.as_bytes()), range);
    }

    Ok(SubsetDefinition::new(
        codepoints,
        IntSet::<u32>::empty(),
        feature_tags,
        DesignSpace::Ranges(ranges),
    ))
}

fn load_subsets_from_config(path: &PathBuf) -> Result<(SubsetDefinition, Vec<SubsetDefinition>), String> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| format!("unable to read config file ({}): {e:?}", path.display()))?;
    let file: SegmentationFile =
        serde_json::from_str(&contents).map_err(|e| format!("invalid config file ({}): {e}", path.display()))?;

    let base = segment_config_to_subset(&file.base)?;
    let extensions = file
        .extensions
        .iter()
        .map(segment_config_to_subset)
        .collect::<Result<Vec<_>, _>>()?;
    Ok((base, extensions))
}

fn run(args: Args) -> Result<(), String> {
    let font_bytes = std::fs::read(&args.font)
        .map_err(|e| format!("unable to read input font file ({}): {e:?}", args.font.display()))?;
    let font = FontRef::new(&font_bytes).map_err(|e| format!("input font parsing failed: {e:?}"))?;

    let (base_subset, extension_subsets) = if let Some(config_path) = &args.config {
        load_subsets_from_config(config_path)?
    } else {
        let base_subset = SubsetDefinition::codepoints(parse_codepoints(&args.base_codepoints)?);
        let extension_subsets = args
            .extensions
            .iter()
            .map(|group| {
                let ranges: Vec<String> = group.split(',').map(str::to_string).collect();
                parse_codepoints(&ranges).map(SubsetDefinition::codepoints)
            })
            .collect::<Result<Vec<_>, _>>()?;
        (base_subset, extension_subsets)
    };

    let config = EncoderConfig::default()
        .with_url_template(args.url_template)
        .with_jump_ahead(args.jump_ahead)
        .with_base_subset(base_subset);
    let config = extension_subsets
        .into_iter()
        .fold(config, |config, subset| config.add_extension_subset(subset));

    let brotli = BuiltInBrotliEncoder;
    let output = encode(&font, &config, &brotli).map_err(|e| format!("encoding failed: {e}"))?;

    std::fs::create_dir_all(&args.output_dir)
        .map_err(|e| format!("failed to create output directory: {e:?}"))?;
    let font_path = args.output_dir.join("font.ift");
    std::fs::write(&font_path, &output.font)
        .map_err(|e| format!("failed to write output font: {e:?}"))?;
    println!("Wrote initial font to {}", font_path.display());

    let mut urls: BTreeMap<String, Vec<u8>> = BTreeMap::new();
    urls.extend(output.patches);
    for (url, data) in &urls {
        let patch_path = args.output_dir.join(url.trim_start_matches('/'));
        if let Some(parent) = patch_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("failed to create patch subdirectory: {e:?}"))?;
        }
        std::fs::write(&patch_path, data).map_err(|e| format!("failed to write patch file: {e:?}"))?;
        println!("Wrote patch to {}", patch_path.display());
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(message) = run(args) {
        log::error!("{message}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_codepoints_and_ranges() {
        let set = parse_codepoints(&["41".to_string(), "61-63".to_string()]).unwrap();
        assert!(set.contains(0x41));
        assert!(set.contains(0x61));
        assert!(set.contains(0x62));
        assert!(set.contains(0x63));
        assert!(!set.contains(0x64));
    }

    #[test]
    fn rejects_bad_codepoint_value() {
        assert!(parse_codepoints(&["zz".to_string()]).is_err());
    }

    #[test]
    fn segment_config_builds_feature_tags_and_design_space() {
        let segment: SegmentConfig = serde_json::from_str(
            r#"{"codepoints": ["41"], "feature_tags": ["liga"], "design_space": {"wdth": [75.0, 100.0]}}"#,
        )
        .unwrap();

        let subset = segment_config_to_subset(&segment).unwrap();
        assert!(subset.codepoints.contains(0x41));
        assert_eq!(subset.feature_tags(), std::collections::BTreeSet::from([Tag::new(b"liga")]));

        let incremental_font_transfer::patchmap::DesignSpace::Ranges(ranges) =
            subset.to_coverage().design_space
        else {
            panic!("expected Ranges");
        };
        assert!(ranges.contains_key(&Tag::new(b"wdth")));
    }

    #[test]
    fn segment_config_rejects_inverted_design_space_range() {
        let segment: SegmentConfig = serde_json::from_str(
            r#"{"design_space": {"wdth": [100.0, 75.0]}}"#,
        )
        .unwrap();

        assert!(segment_config_to_subset(&segment).is_err());
    }

    #[test]
    fn segmentation_file_parses_base_and_extensions() {
        let file: SegmentationFile = serde_json::from_str(
            r#"{"base": {"codepoints": ["61"]}, "extensions": [{"codepoints": ["62"]}]}"#,
        )
        .unwrap();

        assert_eq!(file.extensions.len(), 1);
        let base = segment_config_to_subset(&file.base).unwrap();
        assert!(base.codepoints.contains(0x61));
    }
}
