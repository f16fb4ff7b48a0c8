//! WOFF2 round tripping for the root node of the encoder's graph.
//!
//! The root font is transcoded to WOFF2 and immediately back so that its table order matches
//! what the `woff2` encoder would have produced on its own: subsequent `iftk` patches are diffed
//! against whatever bytes ship as the font's initial state, so that state has to already be
//! WOFF2-stable or the first real extension a client performs would invalidate more than it
//! needs to. See `RoundTripWoff2` in the original encoder for the equivalent step.
//!
//! This wraps the `woff2-patched` crate (already a dev-dependency of this crate upstream, used
//! there only to decode fixtures) rather than reimplementing the transform.

use super::error::EncodingError;

/// Encodes `font` to WOFF2 and immediately decodes it back to an sfnt, normalizing table order
/// and layout the way a real WOFF2 round trip through a font delivery pipeline would.
pub fn round_trip(font: &[u8]) -> Result<Vec<u8>, EncodingError> {
    let compressed = woff2_patched::compress(font, "", 11)
        .ok_or_else(|| EncodingError::Woff2EncodingFailed("compression failed".to_string()))?;

    woff2_patched::decompress(&compressed)
        .ok_or_else(|| EncodingError::Woff2EncodingFailed("decompression failed".to_string()))
}
