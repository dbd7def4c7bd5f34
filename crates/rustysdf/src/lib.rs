//! Extraction of simulation results from two on-disk representations: the
//! self-describing hierarchical container format and legacy column-oriented
//! trajectory containers (`.mat`).
//!
//! Callers request named variables with an expected physical unit and get
//! back either a flat table serialization (rank, dims, per-axis scales,
//! data) or an interleaved time-series matrix with the shared time scale in
//! column 0. Units are compared as strings after padding and bracket
//! stripping — never converted. The backend is chosen per file from its
//! extension; both backends answer the same four read operations.
//!
//! # Reading a time series
//!
//! ```no_run
//! let names = ["/boxBody1/density", "/boxBody1/frame_a/t[3]"];
//! let units = ["kg/m3", "N.m"];
//!
//! let n = rustysdf::time_series_len("result.mat", &names).unwrap();
//! let mut data = vec![0.0; n * (names.len() + 1)];
//! rustysdf::read_time_series("result.mat", &names, &units, "s", n, &mut data).unwrap();
//! ```
//!
//! # Writing a dataset
//!
//! ```no_run
//! use rustysdf::DatasetMeta;
//!
//! let meta = DatasetMeta {
//!     comment: "Wheel torque".into(),
//!     unit: "N.m".into(),
//!     ..Default::default()
//! };
//! rustysdf::write_dataset_f64("out.sdf", "/torque", &[3], &[1.0, 2.0, 3.0], &meta).unwrap();
//! ```

mod attrs;
mod backend;
mod dataset;
mod dsres;
mod error;
mod scale;
mod table;
mod timeseries;
mod write;

pub use attrs::{set_string_attr, string_attr, string_attr_len};
pub use backend::{read_table, read_time_series, table_size, time_series_len, Backend};
pub use dataset::{dataset_dims, read_dataset_f64, read_dataset_i32};
pub use error::Error;
pub use table::TableSize;
pub use write::{
    attach_scale, create_group, write_dataset_f64, write_dataset_i32, DatasetMeta,
};
