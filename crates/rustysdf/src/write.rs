//! Write-side operations on the hierarchical format: group creation,
//! delete-then-create dataset writes, and scale attachment.
//!
//! A write that fails after the dataset was created is reported but not
//! rolled back; callers must treat the object's state as unspecified after
//! any error and re-issue the write.

use std::path::Path;

use log::debug;

use rustysdf_format::{AttrValue, Container, Dataset, FormatError, Object, ScaleLink, Values};

use crate::attrs::{
    COMMENT_ATTR, DISPLAY_NAME_ATTR, DISPLAY_UNIT_ATTR, RELATIVE_QUANTITY_ATTR, UNIT_ATTR,
};
use crate::error::{display_path, Error};

/// Descriptive attributes for a dataset write. Empty strings are not stored:
/// an absent attribute and an unspecified one are the same thing.
#[derive(Debug, Clone, Default)]
pub struct DatasetMeta {
    pub comment: String,
    pub display_name: String,
    pub unit: String,
    pub display_unit: String,
    /// Stored as the literal string "TRUE" when set; not stored otherwise.
    pub relative_quantity: bool,
}

fn open_or_create(path: &Path, file: &str) -> Result<Container, Error> {
    match Container::open(path) {
        Ok(container) => Ok(container),
        Err(FormatError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("creating new container '{file}'");
            Ok(Container::new())
        }
        Err(e) => Err(Error::format(file, e)),
    }
}

/// Create a group, opening the container if it exists and creating it
/// otherwise. An already existing group is not an error; a dataset in the
/// way is.
pub fn create_group<P: AsRef<Path>>(file: P, group: &str, comment: &str) -> Result<(), Error> {
    let file = display_path(file.as_ref());
    let mut container = open_or_create(file.as_ref(), &file)?;
    if !container.put_group(group) {
        return Err(Error::NotAGroup {
            file,
            object: group.to_string(),
        });
    }
    if !comment.is_empty() {
        container.set_attr(group, COMMENT_ATTR, AttrValue::String(comment.to_string()));
    }
    container.save(&file).map_err(|e| Error::format(&file, e))
}

fn write_dataset(
    path: &Path,
    name: &str,
    dims: &[u64],
    values: Values,
    meta: &DatasetMeta,
) -> Result<(), Error> {
    let file = display_path(path);
    let mut container = open_or_create(path, &file)?;

    // no in-place resize: whatever occupies the path is deleted first
    container.remove(name);

    let dataset = Dataset::new(dims.to_vec(), values).map_err(|e| Error::format(&file, e))?;
    container.put_dataset(name, dataset);

    let attrs: [(&str, &str); 4] = [
        (COMMENT_ATTR, &meta.comment),
        (DISPLAY_NAME_ATTR, &meta.display_name),
        (UNIT_ATTR, &meta.unit),
        (DISPLAY_UNIT_ATTR, &meta.display_unit),
    ];
    for (attr, value) in attrs {
        if !value.is_empty() {
            container.set_attr(name, attr, AttrValue::String(value.to_string()));
        }
    }
    if meta.relative_quantity {
        container.set_attr(
            name,
            RELATIVE_QUANTITY_ATTR,
            AttrValue::String("TRUE".to_string()),
        );
    }

    container.save(path).map_err(|e| Error::format(&file, e))
}

/// Write a floating-point dataset, replacing any object at `name`.
pub fn write_dataset_f64<P: AsRef<Path>>(
    file: P,
    name: &str,
    dims: &[u64],
    values: &[f64],
    meta: &DatasetMeta,
) -> Result<(), Error> {
    write_dataset(
        file.as_ref(),
        name,
        dims,
        Values::F64(values.to_vec()),
        meta,
    )
}

/// Write an integer dataset, replacing any object at `name`.
pub fn write_dataset_i32<P: AsRef<Path>>(
    file: P,
    name: &str,
    dims: &[u64],
    values: &[i32],
    meta: &DatasetMeta,
) -> Result<(), Error> {
    write_dataset(
        file.as_ref(),
        name,
        dims,
        Values::I32(values.to_vec()),
        meta,
    )
}

/// Attach `scale` as the scale for `axis` of `dataset`, with an optional
/// axis label (empty means unlabeled). Both objects must already exist as
/// datasets.
pub fn attach_scale<P: AsRef<Path>>(
    file: P,
    dataset: &str,
    scale: &str,
    label: &str,
    axis: u32,
) -> Result<(), Error> {
    let file = display_path(file.as_ref());
    let mut container = Container::open(&file).map_err(|e| Error::format(&file, e))?;

    for name in [dataset, scale] {
        match container.object(name) {
            Some(Object::Dataset(_)) => {}
            Some(_) => {
                return Err(Error::NotADataset {
                    file,
                    object: name.to_string(),
                })
            }
            None => {
                return Err(Error::ObjectNotFound {
                    file,
                    object: name.to_string(),
                })
            }
        }
    }

    let link = ScaleLink {
        axis,
        scale: scale.to_string(),
        label: if label.is_empty() {
            None
        } else {
            Some(label.to_string())
        },
    };
    container.dataset_mut(dataset).unwrap().scales.push(link);
    container.save(&file).map_err(|e| Error::format(&file, e))
}
