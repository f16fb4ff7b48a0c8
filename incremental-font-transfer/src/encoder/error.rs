//! Errors produced while building incremental font transfer patches and mapping tables.

use read_fonts::types::Tag;
use read_fonts::ReadError;
use skera::SubsetError;
use thiserror::Error;

use crate::url_templates::UrlTemplateError;

/// An error that occurred while encoding a set of incremental font transfer patches.
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("no base face was configured on the encoder")]
    MissingFace,

    #[error("failed to parse the input font: {0}")]
    FontParsingFailed(#[from] ReadError),

    #[error("failed to compute a font subset: {0}")]
    SubsetFailed(#[from] SubsetError),

    #[error("brotli compression of a patch failed")]
    BrotliEncodingFailed,

    #[error("woff2 encoding of a patch failed: {0}")]
    Woff2EncodingFailed(String),

    #[error("url template '{0}' is not valid: {1}")]
    InvalidUrlTemplate(String, UrlTemplateError),

    #[error("design space axis '{0}' is not present in the input font")]
    UnknownDesignSpaceAxis(Tag),

    #[error("the extension graph produced two entries with the same patch id")]
    DuplicateEntry,

    #[error("jump ahead must be >= 1")]
    InvalidJumpAhead,

    #[error("internal encoder error: {0}")]
    Internal(&'static str),
}
