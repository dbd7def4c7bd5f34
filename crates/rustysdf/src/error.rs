//! Error type for the extraction and validation engine.
//!
//! Every failure is terminal for the current call and carries the context a
//! caller needs to act on it: the file, the object or variable involved, and
//! expected vs actual values where a comparison failed.

use std::fmt;
use std::path::Path;

use rustysdf_format::FormatError;
use rustysdf_mat4::Mat4Error;

/// Errors reported by the extraction engine.
#[derive(Debug)]
pub enum Error {
    /// Container-level failure (open, parse, or save) in the hierarchical format.
    Format {
        file: String,
        source: FormatError,
    },
    /// Container-level failure (open or parse) in the legacy format.
    Mat {
        file: String,
        source: Mat4Error,
    },
    /// No object at the given path.
    ObjectNotFound {
        file: String,
        object: String,
    },
    /// The object at the given path is not a dataset.
    NotADataset {
        file: String,
        object: String,
    },
    /// The object at the given path is not a group.
    NotAGroup {
        file: String,
        object: String,
    },
    /// A required attribute is absent.
    AttributeMissing {
        object: String,
        name: String,
    },
    /// The attribute is not scalar.
    AttributeRank {
        object: String,
        name: String,
    },
    /// The attribute is not a string.
    AttributeType {
        object: String,
        name: String,
    },
    /// The attribute holds a different value than expected.
    AttributeValue {
        object: String,
        name: String,
        expected: String,
        actual: String,
    },
    /// The dataset's rank differs from the requested rank.
    RankMismatch {
        file: String,
        dataset: String,
        expected: usize,
        actual: usize,
    },
    /// A dataset that must be 1-D is not.
    NotOneDimensional {
        file: String,
        dataset: String,
    },
    /// The dataset holds a different number of elements than expected.
    LengthMismatch {
        file: String,
        dataset: String,
        expected: usize,
        actual: usize,
    },
    /// No scale is attached to the given axis of the dataset.
    ScaleMissing {
        file: String,
        dataset: String,
        axis: usize,
    },
    /// The dataset resolves to a different scale than the previous one.
    ScaleMismatch {
        file: String,
        dataset: String,
    },
    /// Adjacent scale values do not strictly increase.
    NotMonotonic {
        file: String,
        scale: String,
    },
    /// The legacy container lacks one of its required matrices.
    UnsupportedStructure {
        file: String,
    },
    /// The legacy container declares an unknown version tag.
    UnsupportedVersion {
        file: String,
    },
    /// The legacy container declares an unknown storage orientation.
    UnsupportedOrientation {
        file: String,
    },
    /// The requested variable does not exist in the legacy container.
    VariableNotFound {
        file: String,
        variable: String,
    },
    /// A variable's decoded unit differs from the requested unit.
    WrongUnit {
        file: String,
        variable: String,
        expected: String,
        actual: String,
    },
    /// The time scale's decoded unit differs from the requested unit.
    WrongTimeUnit {
        file: String,
        expected: String,
        actual: String,
    },
    /// The legacy index entry references neither data block.
    UnexpectedDataBlock {
        file: String,
        variable: String,
        block: i64,
    },
    /// A caller-provided output buffer has the wrong length.
    BufferLength {
        expected: usize,
        actual: usize,
    },
    /// The operation has no meaning for this backend.
    UnsupportedOperation {
        file: String,
        operation: &'static str,
    },
    /// A request parameter is out of range.
    InvalidArgument(&'static str),
}

impl Error {
    pub(crate) fn format(file: &str, source: FormatError) -> Self {
        Error::Format {
            file: file.to_string(),
            source,
        }
    }

    pub(crate) fn mat(file: &str, source: Mat4Error) -> Self {
        Error::Mat {
            file: file.to_string(),
            source,
        }
    }
}

/// Printable form of a file path for error messages.
pub(crate) fn display_path(path: &Path) -> String {
    path.display().to_string()
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Format { file, source } => write!(f, "'{file}': {source}"),
            Error::Mat { file, source } => write!(f, "'{file}': {source}"),
            Error::ObjectNotFound { file, object } => {
                write!(f, "no object '{object}' in '{file}'")
            }
            Error::NotADataset { file, object } => {
                write!(f, "'{object}' in '{file}' is not a dataset")
            }
            Error::NotAGroup { file, object } => {
                write!(f, "'{object}' in '{file}' is not a group")
            }
            Error::AttributeMissing { object, name } => {
                write!(f, "missing required attribute '{name}' in '{object}'")
            }
            Error::AttributeRank { object, name } => {
                write!(f, "attribute '{name}' in '{object}' is not scalar")
            }
            Error::AttributeType { object, name } => {
                write!(f, "attribute '{name}' in '{object}' is not a string")
            }
            Error::AttributeValue {
                object,
                name,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "attribute '{name}' in '{object}' has the wrong value: \
                     expected '{expected}' but was '{actual}'"
                )
            }
            Error::RankMismatch {
                file,
                dataset,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "dataset '{dataset}' in '{file}' has the wrong number of dimensions: \
                     expected {expected} but was {actual}"
                )
            }
            Error::NotOneDimensional { file, dataset } => {
                write!(f, "dataset '{dataset}' in '{file}' is not one-dimensional")
            }
            Error::LengthMismatch {
                file,
                dataset,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "dataset '{dataset}' in '{file}' has the wrong number of elements: \
                     expected {expected} but was {actual}"
                )
            }
            Error::ScaleMissing {
                file,
                dataset,
                axis,
            } => {
                write!(
                    f,
                    "dataset '{dataset}' in '{file}' has no scale for axis {axis}"
                )
            }
            Error::ScaleMismatch { file, dataset } => {
                write!(
                    f,
                    "dataset '{dataset}' in '{file}' must share the same scale \
                     as the previous dataset"
                )
            }
            Error::NotMonotonic { file, scale } => {
                write!(
                    f,
                    "scale '{scale}' in '{file}' is not strictly monotonically increasing"
                )
            }
            Error::UnsupportedStructure { file } => {
                write!(f, "'{file}' has an unsupported file structure")
            }
            Error::UnsupportedVersion { file } => {
                write!(f, "'{file}' has an unsupported version")
            }
            Error::UnsupportedOrientation { file } => {
                write!(f, "'{file}' has an unsupported storage orientation")
            }
            Error::VariableNotFound { file, variable } => {
                write!(f, "variable '{variable}' was not found in '{file}'")
            }
            Error::WrongUnit {
                file,
                variable,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "variable '{variable}' in '{file}' has the wrong unit: \
                     expected '{expected}' but was '{actual}'"
                )
            }
            Error::WrongTimeUnit {
                file,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "the time scale in '{file}' has the wrong unit: \
                     expected '{expected}' but was '{actual}'"
                )
            }
            Error::UnexpectedDataBlock {
                file,
                variable,
                block,
            } => {
                write!(
                    f,
                    "variable '{variable}' in '{file}' references unexpected data block {block}"
                )
            }
            Error::BufferLength { expected, actual } => {
                write!(
                    f,
                    "output buffer has the wrong length: expected {expected} but was {actual}"
                )
            }
            Error::UnsupportedOperation { file, operation } => {
                write!(f, "{operation} is not supported for '{file}'")
            }
            Error::InvalidArgument(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Format { source, .. } => Some(source),
            Error::Mat { source, .. } => Some(source),
            _ => None,
        }
    }
}
