//! In-memory object model of a container: groups, datasets, attributes,
//! and per-axis scale links, addressed by path.
//!
//! The container follows a load-mutate-save model: [`Container::open`] parses
//! the whole file, mutations happen in memory, and [`Container::save`]
//! rewrites the file. Callers that only read never pay for the write path.

use std::collections::BTreeMap;
use std::path::Path;

use crate::codec;
use crate::error::FormatError;

/// Maximum number of dimensions a dataset may declare.
pub const MAX_RANK: usize = 32;

/// Element type of a dataset's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    F64,
    I32,
}

/// Attribute value attached to a group or dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    F64(f64),
    I64(i64),
    /// Fixed-width producers may pad string values with trailing NULs or
    /// blanks; the value is stored verbatim, padding included.
    String(String),
    F64Array(Vec<f64>),
    I64Array(Vec<i64>),
    StringArray(Vec<String>),
}

/// Associates one axis of a dataset with another dataset acting as its scale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleLink {
    /// Zero-based axis index on the owning dataset.
    pub axis: u32,
    /// Path of the scale dataset.
    pub scale: String,
    /// Optional human-readable axis label.
    pub label: Option<String>,
}

/// Dataset values in their stored element type.
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    F64(Vec<f64>),
    I32(Vec<i32>),
}

impl Values {
    /// Number of stored elements.
    pub fn len(&self) -> usize {
        match self {
            Values::F64(v) => v.len(),
            Values::I32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            Values::F64(_) => ElementType::F64,
            Values::I32(_) => ElementType::I32,
        }
    }

    /// All values widened to `f64`.
    pub fn to_f64(&self) -> Vec<f64> {
        match self {
            Values::F64(v) => v.clone(),
            Values::I32(v) => v.iter().map(|&x| f64::from(x)).collect(),
        }
    }
}

/// An N-dimensional typed array with attributes and scale links.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Axis extents; empty for a scalar.
    pub dims: Vec<u64>,
    pub values: Values,
    /// Scale links in attachment order; the first link on an axis wins.
    pub scales: Vec<ScaleLink>,
    pub attrs: BTreeMap<String, AttrValue>,
}

impl Dataset {
    /// Create a dataset, checking the value count against the dimensions.
    pub fn new(dims: Vec<u64>, values: Values) -> Result<Self, FormatError> {
        if dims.len() > MAX_RANK {
            return Err(FormatError::RankTooLarge(dims.len()));
        }
        let expected: usize = dims.iter().map(|&d| d as usize).product();
        if expected != values.len() {
            return Err(FormatError::CountMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            dims,
            values,
            scales: Vec::new(),
            attrs: BTreeMap::new(),
        })
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn element_count(&self) -> usize {
        self.values.len()
    }
}

/// A named grouping node carrying only attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Group {
    pub attrs: BTreeMap<String, AttrValue>,
}

/// Any object addressable by path.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Group(Group),
    Dataset(Dataset),
}

impl Object {
    pub fn attrs(&self) -> &BTreeMap<String, AttrValue> {
        match self {
            Object::Group(g) => &g.attrs,
            Object::Dataset(d) => &d.attrs,
        }
    }

    pub fn attrs_mut(&mut self) -> &mut BTreeMap<String, AttrValue> {
        match self {
            Object::Group(g) => &mut g.attrs,
            Object::Dataset(d) => &mut d.attrs,
        }
    }
}

/// An open container: a path-addressed table of objects.
///
/// Paths are stored verbatim; no normalization is applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
    objects: BTreeMap<String, Object>,
}

impl Container {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a container file, parsing it fully into memory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FormatError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    /// Parse a container from in-memory bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, FormatError> {
        codec::decode(data)
    }

    /// Serialize the container to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        codec::encode(self)
    }

    /// Serialize and write the container to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), FormatError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path.as_ref(), bytes)?;
        Ok(())
    }

    /// Look up any object by path.
    pub fn object(&self, path: &str) -> Option<&Object> {
        self.objects.get(path)
    }

    pub fn object_mut(&mut self, path: &str) -> Option<&mut Object> {
        self.objects.get_mut(path)
    }

    /// Look up a dataset by path; `None` if absent or a group.
    pub fn dataset(&self, path: &str) -> Option<&Dataset> {
        match self.objects.get(path) {
            Some(Object::Dataset(d)) => Some(d),
            _ => None,
        }
    }

    pub fn dataset_mut(&mut self, path: &str) -> Option<&mut Dataset> {
        match self.objects.get_mut(path) {
            Some(Object::Dataset(d)) => Some(d),
            _ => None,
        }
    }

    /// Insert or replace a dataset at `path`.
    pub fn put_dataset(&mut self, path: &str, dataset: Dataset) {
        self.objects.insert(path.to_string(), Object::Dataset(dataset));
    }

    /// Insert a group at `path` if nothing is there yet.
    ///
    /// Returns `false` when the path is already occupied by a dataset.
    pub fn put_group(&mut self, path: &str) -> bool {
        match self.objects.get(path) {
            Some(Object::Dataset(_)) => false,
            Some(Object::Group(_)) => true,
            None => {
                self.objects
                    .insert(path.to_string(), Object::Group(Group::default()));
                true
            }
        }
    }

    /// Delete the object at `path`. Returns whether anything was removed.
    pub fn remove(&mut self, path: &str) -> bool {
        self.objects.remove(path).is_some()
    }

    /// Read an attribute of the object at `path`.
    pub fn attr(&self, path: &str, name: &str) -> Option<&AttrValue> {
        self.objects.get(path).and_then(|o| o.attrs().get(name))
    }

    /// Set an attribute on the object at `path`.
    ///
    /// Returns `false` when no object exists at the path.
    pub fn set_attr(&mut self, path: &str, name: &str, value: AttrValue) -> bool {
        match self.objects.get_mut(path) {
            Some(obj) => {
                obj.attrs_mut().insert(name.to_string(), value);
                true
            }
            None => false,
        }
    }

    /// Iterate `(path, object)` pairs in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Object)> {
        self.objects.iter().map(|(p, o)| (p.as_str(), o))
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
