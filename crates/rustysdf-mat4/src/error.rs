//! Error types for Level-4 MAT container parsing.

use std::fmt;

/// Errors that can occur when reading or writing a MAT container.
#[derive(Debug)]
pub enum Mat4Error {
    /// I/O error from the filesystem.
    Io(std::io::Error),
    /// Unexpected end of data.
    UnexpectedEof {
        /// Number of bytes expected.
        expected: usize,
        /// Number of bytes actually available.
        available: usize,
    },
    /// The matrix type code is not one this reader supports
    /// (non-little-endian numbers, sparse storage, unknown precision).
    UnsupportedType(u32),
    /// The named matrix carries an imaginary part.
    ComplexUnsupported(String),
    /// A matrix name is not valid UTF-8.
    InvalidName,
    /// The supplied value count does not match rows x cols.
    CountMismatch {
        /// Element count implied by the dimensions.
        expected: usize,
        /// Element count actually supplied.
        actual: usize,
    },
}

impl fmt::Display for Mat4Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mat4Error::Io(e) => write!(f, "I/O error: {e}"),
            Mat4Error::UnexpectedEof {
                expected,
                available,
            } => {
                write!(f, "unexpected EOF: need {expected} bytes, have {available}")
            }
            Mat4Error::UnsupportedType(t) => {
                write!(f, "unsupported matrix type code: {t}")
            }
            Mat4Error::ComplexUnsupported(name) => {
                write!(f, "matrix '{name}' has an imaginary part, which is not supported")
            }
            Mat4Error::InvalidName => write!(f, "matrix name is not valid UTF-8"),
            Mat4Error::CountMismatch { expected, actual } => {
                write!(
                    f,
                    "value count mismatch: dimensions imply {expected} elements, got {actual}"
                )
            }
        }
    }
}

impl std::error::Error for Mat4Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Mat4Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Mat4Error {
    fn from(e: std::io::Error) -> Self {
        Mat4Error::Io(e)
    }
}
