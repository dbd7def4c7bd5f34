//! Backend selection and the four shared read operations.
//!
//! The storage backend is resolved once per call from the file extension
//! (`.mat` means a legacy trajectory container, anything else the
//! hierarchical format) and dispatched through one interface, so format
//! sniffing never leaks into the operations themselves.

use std::path::Path;

use rustysdf_format::Container;

use crate::dsres::TrajectoryFile;
use crate::error::{display_path, Error};
use crate::table::{self, TableSize};
use crate::timeseries;

/// Storage backend serving a request, resolved from the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// The self-describing hierarchical container format.
    Hierarchical,
    /// The legacy column-oriented trajectory format.
    Legacy,
}

impl Backend {
    /// Resolve the backend for a file path.
    pub fn for_path<P: AsRef<Path>>(path: P) -> Backend {
        match path.as_ref().extension() {
            Some(ext) if ext == "mat" => Backend::Legacy,
            _ => Backend::Hierarchical,
        }
    }

    fn reader(self) -> &'static dyn ResultBackend {
        match self {
            Backend::Hierarchical => &HierarchicalBackend,
            Backend::Legacy => &LegacyBackend,
        }
    }
}

/// The operation set both backends expose with identical caller-visible
/// semantics.
trait ResultBackend {
    fn table_size(&self, path: &Path, dataset: &str) -> Result<TableSize, Error>;

    fn read_table(
        &self,
        path: &Path,
        dataset: &str,
        rank: usize,
        scale_units: &[&str],
        out: &mut [f64],
    ) -> Result<(), Error>;

    fn time_series_len(&self, path: &Path, names: &[&str]) -> Result<usize, Error>;

    fn read_time_series(
        &self,
        path: &Path,
        names: &[&str],
        units: &[&str],
        time_unit: &str,
        nsamples: usize,
        out: &mut [f64],
    ) -> Result<(), Error>;
}

struct HierarchicalBackend;

impl HierarchicalBackend {
    fn open(path: &Path) -> Result<(Container, String), Error> {
        let file = display_path(path);
        let container = Container::open(path).map_err(|e| Error::format(&file, e))?;
        Ok((container, file))
    }
}

impl ResultBackend for HierarchicalBackend {
    fn table_size(&self, path: &Path, dataset: &str) -> Result<TableSize, Error> {
        let (container, file) = Self::open(path)?;
        table::table_size_in(&container, &file, dataset)
    }

    fn read_table(
        &self,
        path: &Path,
        dataset: &str,
        rank: usize,
        scale_units: &[&str],
        out: &mut [f64],
    ) -> Result<(), Error> {
        let (container, file) = Self::open(path)?;
        table::read_table_in(&container, &file, dataset, rank, scale_units, out)
    }

    fn time_series_len(&self, path: &Path, names: &[&str]) -> Result<usize, Error> {
        let (container, file) = Self::open(path)?;
        timeseries::time_series_len_in(&container, &file, names)
    }

    fn read_time_series(
        &self,
        path: &Path,
        names: &[&str],
        units: &[&str],
        time_unit: &str,
        nsamples: usize,
        out: &mut [f64],
    ) -> Result<(), Error> {
        let (container, file) = Self::open(path)?;
        timeseries::read_time_series_in(&container, &file, names, units, time_unit, nsamples, out)
    }
}

struct LegacyBackend;

impl ResultBackend for LegacyBackend {
    // Trajectory containers hold no table datasets; the table operations
    // are reported as unsupported rather than mapped onto something else.
    fn table_size(&self, path: &Path, _dataset: &str) -> Result<TableSize, Error> {
        Err(Error::UnsupportedOperation {
            file: display_path(path),
            operation: "table size query",
        })
    }

    fn read_table(
        &self,
        path: &Path,
        _dataset: &str,
        _rank: usize,
        _scale_units: &[&str],
        _out: &mut [f64],
    ) -> Result<(), Error> {
        Err(Error::UnsupportedOperation {
            file: display_path(path),
            operation: "table read",
        })
    }

    fn time_series_len(&self, path: &Path, _names: &[&str]) -> Result<usize, Error> {
        let trajectory = TrajectoryFile::open(path)?;
        Ok(trajectory.sample_count())
    }

    fn read_time_series(
        &self,
        path: &Path,
        names: &[&str],
        units: &[&str],
        time_unit: &str,
        nsamples: usize,
        out: &mut [f64],
    ) -> Result<(), Error> {
        let trajectory = TrajectoryFile::open(path)?;
        trajectory.read_into(names, units, time_unit, nsamples, out)
    }
}

/// Query the shape of a table dataset: rank, per-axis extents, and the
/// length of its flat serialization.
pub fn table_size<P: AsRef<Path>>(file: P, dataset: &str) -> Result<TableSize, Error> {
    let path = file.as_ref();
    Backend::for_path(path).reader().table_size(path, dataset)
}

/// Read a table dataset and its scales into `out` as
/// `[rank, dims…, scale_1…, …, scale_rank…, data…]`.
///
/// `rank` must match the dataset's actual rank and `out` must be exactly
/// [`TableSize::flat_len`] long. `scale_units` are checked per axis; an
/// empty entry skips that axis's unit check. On error the contents of `out`
/// are unspecified.
pub fn read_table<P: AsRef<Path>>(
    file: P,
    dataset: &str,
    rank: usize,
    scale_units: &[&str],
    out: &mut [f64],
) -> Result<(), Error> {
    let path = file.as_ref();
    Backend::for_path(path)
        .reader()
        .read_table(path, dataset, rank, scale_units, out)
}

/// Number of time samples a time-series read for `names` will produce.
pub fn time_series_len<P: AsRef<Path>>(file: P, names: &[&str]) -> Result<usize, Error> {
    let path = file.as_ref();
    Backend::for_path(path).reader().time_series_len(path, names)
}

/// Read an aligned time series for `names` into `out`, a row-major
/// `[sample][1 + variable]` matrix with the shared time scale in column 0
/// and the variables in request order.
///
/// `units` are checked per variable and `time_unit` against the time scale;
/// empty strings skip the corresponding check. `out` must hold exactly
/// `nsamples * (names.len() + 1)` elements.
pub fn read_time_series<P: AsRef<Path>>(
    file: P,
    names: &[&str],
    units: &[&str],
    time_unit: &str,
    nsamples: usize,
    out: &mut [f64],
) -> Result<(), Error> {
    let path = file.as_ref();
    Backend::for_path(path)
        .reader()
        .read_time_series(path, names, units, time_unit, nsamples, out)
}
