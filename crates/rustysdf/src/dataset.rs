//! Whole-dataset reads with an optional unit check, and the dimension query.
//!
//! These operate on the hierarchical format only.

use std::path::Path;

use rustysdf_format::{Container, Values};

use crate::attrs::{check_string_attribute, UNIT_ATTR};
use crate::error::{display_path, Error};

fn open_dataset(
    path: &Path,
    dataset: &str,
) -> Result<(Container, String), Error> {
    let file = display_path(path);
    let container = Container::open(path).map_err(|e| Error::format(&file, e))?;
    match container.object(dataset) {
        Some(rustysdf_format::Object::Dataset(_)) => Ok((container, file)),
        Some(_) => Err(Error::NotADataset {
            file,
            object: dataset.to_string(),
        }),
        None => Err(Error::ObjectNotFound {
            file,
            object: dataset.to_string(),
        }),
    }
}

/// Read all values of a dataset as `f64`, integer values widened.
///
/// A non-empty `unit` is checked against the dataset's `UNIT` attribute.
pub fn read_dataset_f64<P: AsRef<Path>>(
    file: P,
    dataset: &str,
    unit: &str,
) -> Result<Vec<f64>, Error> {
    let (container, file) = open_dataset(file.as_ref(), dataset)?;
    if !unit.is_empty() {
        check_string_attribute(&container, &file, dataset, UNIT_ATTR, unit)?;
    }
    Ok(container.dataset(dataset).unwrap().values.to_f64())
}

/// Read all values of a dataset as `i32`, floating-point values truncated.
///
/// A non-empty `unit` is checked against the dataset's `UNIT` attribute.
pub fn read_dataset_i32<P: AsRef<Path>>(
    file: P,
    dataset: &str,
    unit: &str,
) -> Result<Vec<i32>, Error> {
    let (container, file) = open_dataset(file.as_ref(), dataset)?;
    if !unit.is_empty() {
        check_string_attribute(&container, &file, dataset, UNIT_ATTR, unit)?;
    }
    let values = match &container.dataset(dataset).unwrap().values {
        Values::I32(v) => v.clone(),
        Values::F64(v) => v.iter().map(|&x| x as i32).collect(),
    };
    Ok(values)
}

/// The dimensions of a dataset; empty for a scalar.
pub fn dataset_dims<P: AsRef<Path>>(file: P, dataset: &str) -> Result<Vec<u64>, Error> {
    let (container, _) = open_dataset(file.as_ref(), dataset)?;
    Ok(container.dataset(dataset).unwrap().dims.clone())
}
