#[cfg(feature = "c-brotli")]
mod c_brotli;

pub mod encode_error;

use encode_error::EncodeError;

/// A Shared Brotli Encoder.
///
/// Shared brotli (<https://datatracker.ietf.org/doc/draft-vandevenne-shared-brotli-format/>) is an
/// extension of brotli to allow the compressed stream to reference a shared dictionary,
/// which allows producing small diffs between two related binaries (for example two versions
/// of the same font subset).
pub trait SharedBrotliEncoder {
    /// Encodes `uncompressed` as a shared brotli stream, optionally diffed against `shared_dictionary`.
    ///
    /// The shared dictionary is a raw LZ77 style dictionary, see:
    /// <https://datatracker.ietf.org/doc/html/draft-vandevenne-shared-brotli-format#section-3.2>
    fn encode(
        &self,
        uncompressed: &[u8],
        shared_dictionary: Option<&[u8]>,
    ) -> Result<Vec<u8>, EncodeError>;
}

/// The brotli encoder provided by this crate.
pub struct BuiltInBrotliEncoder;

/// An implementation that just passes through the input data, uncompressed.
///
/// Useful in unit tests where the exact bytes of the compressed stream don't matter.
pub struct NoopBrotliEncoder;

impl SharedBrotliEncoder for Box<dyn SharedBrotliEncoder> {
    fn encode(
        &self,
        uncompressed: &[u8],
        shared_dictionary: Option<&[u8]>,
    ) -> Result<Vec<u8>, EncodeError> {
        self.as_ref().encode(uncompressed, shared_dictionary)
    }
}

impl SharedBrotliEncoder for BuiltInBrotliEncoder {
    fn encode(
        &self,
        uncompressed: &[u8],
        shared_dictionary: Option<&[u8]>,
    ) -> Result<Vec<u8>, EncodeError> {
        cfg_if::cfg_if! {
            if #[cfg(feature = "c-brotli")] {
                c_brotli::shared_brotli_encode_c(uncompressed, shared_dictionary)
            } else {
                compile_error!("The 'c-brotli' feature must be enabled.");
            }
        }
    }
}

impl SharedBrotliEncoder for NoopBrotliEncoder {
    fn encode(
        &self,
        uncompressed: &[u8],
        _shared_dictionary: Option<&[u8]>,
    ) -> Result<Vec<u8>, EncodeError> {
        Ok(uncompressed.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_brotli_patch_decoder::{BuiltInBrotliDecoder, SharedBrotliDecoder};

    #[test]
    fn round_trip_with_shared_dict() {
        let base = b"abcdefghijklmnopqrstuvwxyz\n".to_vec();
        let target = b"hijkabcdeflmnohijkabcdeflmno\n".to_vec();

        let encoded = BuiltInBrotliEncoder
            .encode(&target, Some(&base))
            .expect("encode succeeds");

        let decoded = BuiltInBrotliDecoder
            .decode(&encoded, Some(&base), target.len())
            .expect("decode succeeds");

        assert_eq!(target, decoded);
    }

    #[test]
    fn round_trip_without_shared_dict() {
        let target = b"some data with no dictionary to diff against".to_vec();

        let encoded = BuiltInBrotliEncoder
            .encode(&target, None)
            .expect("encode succeeds");

        let decoded = BuiltInBrotliDecoder
            .decode(&encoded, None, target.len())
            .expect("decode succeeds");

        assert_eq!(target, decoded);
    }

    #[test]
    fn noop_encoder_passes_through() {
        let target = b"raw bytes".to_vec();
        assert_eq!(
            Ok(target.clone()),
            NoopBrotliEncoder.encode(&target, Some(b"ignored"))
        );
    }
}
