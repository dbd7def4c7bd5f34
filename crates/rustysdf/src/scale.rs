//! Scale resolution and validation.
//!
//! A scale is a 1-D dataset linked to one axis of another dataset. Only one
//! scale per axis is consulted: the first link discovered wins.

use rustysdf_format::Container;

use crate::attrs::{check_string_attribute, UNIT_ATTR};
use crate::error::Error;

/// Path of the first scale attached to `axis` of `dataset`, if any.
pub(crate) fn find_scale(container: &Container, dataset: &str, axis: u32) -> Option<String> {
    let ds = container.dataset(dataset)?;
    ds.scales
        .iter()
        .find(|link| link.axis == axis)
        .map(|link| link.scale.clone())
}

/// Check that `name` is a 1-D dataset of `expected_len` elements carrying
/// the expected unit (empty unit means "skip the unit check").
pub(crate) fn check_dataset_1d(
    container: &Container,
    file: &str,
    name: &str,
    unit: &str,
    expected_len: usize,
) -> Result<(), Error> {
    let Some(ds) = container.dataset(name) else {
        return Err(match container.object(name) {
            Some(_) => Error::NotADataset {
                file: file.to_string(),
                object: name.to_string(),
            },
            None => Error::ObjectNotFound {
                file: file.to_string(),
                object: name.to_string(),
            },
        });
    };
    if ds.rank() != 1 {
        return Err(Error::NotOneDimensional {
            file: file.to_string(),
            dataset: name.to_string(),
        });
    }
    if ds.dims[0] as usize != expected_len {
        return Err(Error::LengthMismatch {
            file: file.to_string(),
            dataset: name.to_string(),
            expected: expected_len,
            actual: ds.dims[0] as usize,
        });
    }
    if !unit.is_empty() {
        check_string_attribute(container, file, name, UNIT_ATTR, unit)?;
    }
    Ok(())
}

/// Reject the scale unless its values strictly increase throughout.
pub(crate) fn ensure_strictly_increasing(
    file: &str,
    scale: &str,
    values: &[f64],
) -> Result<(), Error> {
    for pair in values.windows(2) {
        if pair[0] >= pair[1] {
            return Err(Error::NotMonotonic {
                file: file.to_string(),
                scale: scale.to_string(),
            });
        }
    }
    Ok(())
}
