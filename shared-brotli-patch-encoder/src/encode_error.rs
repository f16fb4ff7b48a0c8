use std::io;

#[derive(Debug, Clone, PartialEq)]
pub enum EncodeError {
    InitFailure,
    InvalidDictionary,
    EncodingFailed,
    IoError(io::ErrorKind),
}

impl std::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EncodeError::InitFailure => write!(f, "Failed to initialize the brotli encoder."),
            EncodeError::InvalidDictionary => write!(f, "Shared dictionary format is invalid."),
            EncodeError::EncodingFailed => write!(f, "Brotli encoding of the input stream failed."),
            EncodeError::IoError(kind) => write!(f, "Generic IO error: {}", kind),
        }
    }
}

impl std::error::Error for EncodeError {}
