//! Self-describing hierarchical container format for simulation data.
//!
//! A container holds a flat, path-addressed table of objects: groups
//! (attribute-only nodes) and datasets (typed N-dimensional arrays with
//! attributes and per-axis scale links). The whole container is parsed on
//! open and rewritten on save.
//!
//! # Example
//!
//! ```
//! use rustysdf_format::{AttrValue, Container, Dataset, Values};
//!
//! let mut c = Container::new();
//! let mut ds = Dataset::new(vec![3], Values::F64(vec![1.0, 2.0, 3.0])).unwrap();
//! ds.attrs.insert("UNIT".into(), AttrValue::String("m".into()));
//! c.put_dataset("/pos", ds);
//!
//! let bytes = c.to_bytes().unwrap();
//! let back = Container::from_bytes(&bytes).unwrap();
//! assert_eq!(back.dataset("/pos").unwrap().element_count(), 3);
//! ```

mod codec;
pub mod error;
pub mod signature;
pub mod store;

pub use error::FormatError;
pub use store::{
    AttrValue, Container, Dataset, ElementType, Group, Object, ScaleLink, Values, MAX_RANK,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_missing_file_is_io_error() {
        let err = Container::open("/nonexistent/no-such-container").unwrap_err();
        assert!(matches!(err, FormatError::Io(_)));
    }

    #[test]
    fn save_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.sdc");

        let mut c = Container::new();
        let ds = Dataset::new(vec![2], Values::I32(vec![7, 8])).unwrap();
        c.put_dataset("/v", ds);
        c.save(&path).unwrap();

        let back = Container::open(&path).unwrap();
        assert_eq!(back.dataset("/v").unwrap().values, Values::I32(vec![7, 8]));
    }
}
