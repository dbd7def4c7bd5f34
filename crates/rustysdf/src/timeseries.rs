//! Time-series assembly for the hierarchical format: several 1-D datasets
//! sharing one time scale, interleaved into a `[sample][1 + variable]`
//! row-major matrix with time in column 0.

use rustysdf_format::Container;

use crate::error::Error;
use crate::scale::{check_dataset_1d, find_scale};

/// Sample count for a time-series read: the extent of the first requested
/// variable, which must be one-dimensional.
pub(crate) fn time_series_len_in(
    container: &Container,
    file: &str,
    names: &[&str],
) -> Result<usize, Error> {
    let first = *names.first().ok_or(Error::InvalidArgument(
        "at least one variable must be requested",
    ))?;
    let Some(ds) = container.dataset(first) else {
        return Err(Error::ObjectNotFound {
            file: file.to_string(),
            object: first.to_string(),
        });
    };
    if ds.rank() != 1 {
        return Err(Error::NotOneDimensional {
            file: file.to_string(),
            dataset: first.to_string(),
        });
    }
    Ok(ds.dims[0] as usize)
}

/// Assemble the requested variables into `out`.
///
/// The first variable's axis-0 scale is the common time base; every further
/// variable must resolve to the same scale path. Each variable is validated
/// for length and unit before its values are copied into its call-order
/// column.
pub(crate) fn read_time_series_in(
    container: &Container,
    file: &str,
    names: &[&str],
    units: &[&str],
    time_unit: &str,
    nsamples: usize,
    out: &mut [f64],
) -> Result<(), Error> {
    if names.is_empty() {
        return Err(Error::InvalidArgument(
            "at least one variable must be requested",
        ));
    }
    if nsamples == 0 {
        return Err(Error::InvalidArgument("sample count must be positive"));
    }
    let ncols = names.len() + 1;
    if out.len() != nsamples * ncols {
        return Err(Error::BufferLength {
            expected: nsamples * ncols,
            actual: out.len(),
        });
    }

    let mut first_scale = String::new();

    for (i, &name) in names.iter().enumerate() {
        let Some(scale_name) = find_scale(container, name, 0) else {
            return Err(Error::ScaleMissing {
                file: file.to_string(),
                dataset: name.to_string(),
                axis: 0,
            });
        };

        if i == 0 {
            check_dataset_1d(container, file, &scale_name, time_unit, nsamples)?;
            let time = container.dataset(&scale_name).unwrap().values.to_f64();
            for (j, &t) in time.iter().enumerate() {
                out[j * ncols] = t;
            }
            first_scale = scale_name;
        } else if scale_name != first_scale {
            return Err(Error::ScaleMismatch {
                file: file.to_string(),
                dataset: name.to_string(),
            });
        }

        let unit = units.get(i).copied().unwrap_or("");
        check_dataset_1d(container, file, name, unit, nsamples)?;

        let values = container.dataset(name).unwrap().values.to_f64();
        for (j, &v) in values.iter().enumerate() {
            out[j * ncols + 1 + i] = v;
        }
    }

    Ok(())
}
