//! Error types for container format parsing and serialization.

use std::fmt;

/// Errors that can occur when reading or writing a container file.
#[derive(Debug)]
pub enum FormatError {
    /// I/O error from the filesystem.
    Io(std::io::Error),
    /// The container signature was not found at the start of the file.
    SignatureNotFound,
    /// The container format version is not supported.
    UnsupportedVersion(u8),
    /// Unexpected end of data.
    UnexpectedEof {
        /// Number of bytes expected.
        expected: usize,
        /// Number of bytes actually available.
        available: usize,
    },
    /// A dataset declares more dimensions than the format allows.
    RankTooLarge(usize),
    /// Unknown element type tag in a dataset record.
    InvalidElementType(u8),
    /// Unknown attribute value tag in an attribute record.
    InvalidAttrType(u8),
    /// Unknown object kind tag in an object record.
    InvalidObjectKind(u8),
    /// A stored name or path is not valid UTF-8.
    InvalidUtf8,
    /// A dataset's value count does not match the product of its dimensions.
    CountMismatch {
        /// Element count implied by the dimensions.
        expected: usize,
        /// Element count actually stored.
        actual: usize,
    },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::Io(e) => write!(f, "I/O error: {e}"),
            FormatError::SignatureNotFound => {
                write!(f, "container signature not found")
            }
            FormatError::UnsupportedVersion(v) => {
                write!(f, "unsupported container format version: {v}")
            }
            FormatError::UnexpectedEof {
                expected,
                available,
            } => {
                write!(f, "unexpected EOF: need {expected} bytes, have {available}")
            }
            FormatError::RankTooLarge(r) => {
                write!(f, "dataset rank {r} exceeds the supported maximum")
            }
            FormatError::InvalidElementType(t) => {
                write!(f, "invalid element type tag: {t:#04x}")
            }
            FormatError::InvalidAttrType(t) => {
                write!(f, "invalid attribute type tag: {t:#04x}")
            }
            FormatError::InvalidObjectKind(k) => {
                write!(f, "invalid object kind tag: {k:#04x}")
            }
            FormatError::InvalidUtf8 => write!(f, "stored name is not valid UTF-8"),
            FormatError::CountMismatch { expected, actual } => {
                write!(
                    f,
                    "value count mismatch: dimensions imply {expected} elements, found {actual}"
                )
            }
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormatError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FormatError {
    fn from(e: std::io::Error) -> Self {
        FormatError::Io(e)
    }
}
