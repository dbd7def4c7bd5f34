//! Table extraction: an N-dimensional dataset plus its per-axis scales,
//! flattened into one `[rank, dims…, scale_1…, …, scale_rank…, data…]`
//! buffer.

use rustysdf_format::Container;

use crate::error::Error;
use crate::scale::{check_dataset_1d, ensure_strictly_increasing, find_scale};

/// Size query result for a table read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSize {
    /// Number of dimensions.
    pub rank: usize,
    /// Extent of each axis.
    pub dims: Vec<u64>,
    /// Total element count of the flat serialization:
    /// `1 + rank + sum(dims) + product(dims)`.
    pub flat_len: usize,
}

pub(crate) fn table_size_in(
    container: &Container,
    file: &str,
    dataset: &str,
) -> Result<TableSize, Error> {
    let Some(ds) = container.dataset(dataset) else {
        return Err(Error::ObjectNotFound {
            file: file.to_string(),
            object: dataset.to_string(),
        });
    };
    let dims = ds.dims.clone();
    let rank = dims.len();
    let sum: usize = dims.iter().map(|&d| d as usize).sum();
    let product: usize = dims.iter().map(|&d| d as usize).product();
    Ok(TableSize {
        rank,
        dims,
        flat_len: 1 + rank + sum + product,
    })
}

/// Read a table into `out`, which must be exactly `flat_len` long.
///
/// Each axis scale is validated (1-D, matching length, expected unit,
/// strictly increasing) before its values are appended. On error the buffer
/// contents are unspecified and must be discarded.
pub(crate) fn read_table_in(
    container: &Container,
    file: &str,
    dataset: &str,
    rank: usize,
    scale_units: &[&str],
    out: &mut [f64],
) -> Result<(), Error> {
    let size = table_size_in(container, file, dataset)?;
    if size.rank != rank {
        return Err(Error::RankMismatch {
            file: file.to_string(),
            dataset: dataset.to_string(),
            expected: rank,
            actual: size.rank,
        });
    }
    if out.len() != size.flat_len {
        return Err(Error::BufferLength {
            expected: size.flat_len,
            actual: out.len(),
        });
    }

    out[0] = rank as f64;
    for (i, &d) in size.dims.iter().enumerate() {
        out[1 + i] = d as f64;
    }
    let mut pos = 1 + rank;

    for (axis, &dim) in size.dims.iter().enumerate() {
        let Some(scale_name) = find_scale(container, dataset, axis as u32) else {
            return Err(Error::ScaleMissing {
                file: file.to_string(),
                dataset: dataset.to_string(),
                axis,
            });
        };
        let unit = scale_units.get(axis).copied().unwrap_or("");
        check_dataset_1d(container, file, &scale_name, unit, dim as usize)?;

        // check_dataset_1d guarantees the scale exists and is 1-D
        let values = container.dataset(&scale_name).unwrap().values.to_f64();
        ensure_strictly_increasing(file, &scale_name, &values)?;

        out[pos..pos + values.len()].copy_from_slice(&values);
        pos += values.len();
    }

    let data = container.dataset(dataset).unwrap().values.to_f64();
    out[pos..pos + data.len()].copy_from_slice(&data);
    Ok(())
}
