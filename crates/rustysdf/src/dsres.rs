//! Legacy trajectory container decoder.
//!
//! A trajectory container is a Level-4 MAT file holding six matrices:
//! `Aclass` (format tag), `name` and `description` (fixed-width character
//! matrices, one row per variable), `dataInfo` (per-variable index entries),
//! `data_1` (values constant over the run) and `data_2` (one record per time
//! sample, with the time scale in the first column). Depending on the tag in
//! `Aclass` the character and numeric matrices are stored either row-wise
//! ("binNormal") or transposed ("binTrans").
//!
//! Variable names use dotted component separators on disk and are rewritten
//! to slash paths so callers address both backends the same way.

use std::path::Path;

use log::debug;

use rustysdf_mat4::{Mat4File, Matrix};

use crate::error::{display_path, Error};

const VERSION_TAG: &str = "1.1";
const ORIENTATION_NORMAL: &str = "binNormal";
const ORIENTATION_TRANSPOSED: &str = "binTrans";

/// Which numeric block holds a variable's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DataBlock {
    /// Block 1: one stored value, constant over the whole run.
    Parameter,
    /// Block 2: one value per time sample.
    Trajectory,
}

/// A variable's decoded index entry: block, 0-based column, and the sign to
/// apply to every stored value. Negative signs mark signals stored as the
/// negation of another column.
#[derive(Debug, Clone, Copy)]
struct ColumnRef {
    block: DataBlock,
    column: usize,
    sign: f64,
}

/// An opened and validated trajectory container.
pub(crate) struct TrajectoryFile {
    file: String,
    transposed: bool,
    /// Slash-form variable paths, in storage order.
    paths: Vec<String>,
    descriptions: Vec<String>,
    info: Matrix,
    constants: Matrix,
    samples: Matrix,
}

impl TrajectoryFile {
    /// Open a container and validate its structure, version, and orientation.
    pub(crate) fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = display_path(path.as_ref());
        let mat = Mat4File::open(path.as_ref()).map_err(|e| Error::mat(&file, e))?;

        let aclass = required_text(&mat, &file, "Aclass")?;
        let names = required_text(&mat, &file, "name")?;
        let descriptions = required_text(&mat, &file, "description")?;
        let info = required_numeric(&mat, &file, "dataInfo")?;
        let constants = required_numeric(&mat, &file, "data_1")?;
        let samples = required_numeric(&mat, &file, "data_2")?;

        // Aclass is always stored row-wise, regardless of orientation.
        let format_info = split_string_matrix(aclass, false);
        if format_info.len() < 4 {
            return Err(Error::UnsupportedStructure { file });
        }
        if format_info[1] != VERSION_TAG {
            return Err(Error::UnsupportedVersion { file });
        }
        let transposed = match format_info[3].as_str() {
            ORIENTATION_NORMAL => false,
            ORIENTATION_TRANSPOSED => true,
            _ => return Err(Error::UnsupportedOrientation { file }),
        };

        let names = split_string_matrix(names, transposed);
        let descriptions = split_string_matrix(descriptions, transposed);

        let nvars = names.len();
        if nvars == 0 || descriptions.len() < nvars {
            return Err(Error::UnsupportedStructure { file });
        }
        let (info_vars, info_fields) = if transposed {
            (info.cols, info.rows)
        } else {
            (info.rows, info.cols)
        };
        if info_vars < nvars || info_fields < 2 {
            return Err(Error::UnsupportedStructure { file });
        }
        let time_columns = if transposed { samples.rows } else { samples.cols };
        if time_columns == 0 {
            return Err(Error::UnsupportedStructure { file });
        }

        let paths = names
            .iter()
            .map(|n| format!("/{}", n.replace('.', "/")))
            .collect::<Vec<_>>();

        debug!(
            "opened trajectory container '{file}': {nvars} variables, transposed={transposed}"
        );

        Ok(Self {
            file,
            transposed,
            paths,
            descriptions,
            info: info.clone(),
            constants: constants.clone(),
            samples: samples.clone(),
        })
    }

    /// Number of time samples stored in the trajectory block.
    pub(crate) fn sample_count(&self) -> usize {
        if self.transposed {
            self.samples.cols
        } else {
            self.samples.rows
        }
    }

    /// Assemble the requested variables into the interleaved
    /// `[sample][1 + variable]` matrix, time in column 0.
    pub(crate) fn read_into(
        &self,
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
        if nsamples > self.sample_count() {
            return Err(Error::LengthMismatch {
                file: self.file.clone(),
                dataset: "data_2".to_string(),
                expected: nsamples,
                actual: self.sample_count(),
            });
        }

        // The time scale's unit lives in the first variable's description
        // and is validated once per call.
        if !time_unit.is_empty() {
            let actual = unit_from_description(&self.descriptions[0]);
            if actual != time_unit {
                return Err(Error::WrongTimeUnit {
                    file: self.file.clone(),
                    expected: time_unit.to_string(),
                    actual,
                });
            }
        }
        for j in 0..nsamples {
            out[j * ncols] = self.time_value(j);
        }

        for (i, &name) in names.iter().enumerate() {
            let Some(k) = self.paths.iter().position(|p| p == name) else {
                return Err(Error::VariableNotFound {
                    file: self.file.clone(),
                    variable: name.to_string(),
                });
            };

            let unit = units.get(i).copied().unwrap_or("");
            if !unit.is_empty() {
                let actual = unit_from_description(&self.descriptions[k]);
                if actual != unit {
                    return Err(Error::WrongUnit {
                        file: self.file.clone(),
                        variable: name.to_string(),
                        expected: unit.to_string(),
                        actual,
                    });
                }
            }

            let column = self.column_ref(k, name)?;
            for j in 0..nsamples {
                out[j * ncols + 1 + i] = self.value(&column, j);
            }
        }

        Ok(())
    }

    /// Decode the index entry of storage-order variable `k`.
    fn column_ref(&self, k: usize, variable: &str) -> Result<ColumnRef, Error> {
        let (d, x) = if self.transposed {
            (self.info.numeric_at(0, k), self.info.numeric_at(1, k))
        } else {
            (self.info.numeric_at(k, 0), self.info.numeric_at(k, 1))
        };
        let x = x as i64;

        let block = match d as i64 {
            1 => DataBlock::Parameter,
            2 => DataBlock::Trajectory,
            b => {
                return Err(Error::UnexpectedDataBlock {
                    file: self.file.clone(),
                    variable: variable.to_string(),
                    block: b,
                })
            }
        };
        if x == 0 {
            return Err(Error::UnsupportedStructure {
                file: self.file.clone(),
            });
        }
        let column = x.unsigned_abs() as usize - 1;
        let sign = if x < 0 { -1.0 } else { 1.0 };

        let (available, depth) = match (block, self.transposed) {
            (DataBlock::Parameter, true) => (self.constants.rows, self.constants.cols),
            (DataBlock::Parameter, false) => (self.constants.cols, self.constants.rows),
            (DataBlock::Trajectory, true) => (self.samples.rows, self.samples.cols),
            (DataBlock::Trajectory, false) => (self.samples.cols, self.samples.rows),
        };
        if column >= available || depth == 0 {
            return Err(Error::UnsupportedStructure {
                file: self.file.clone(),
            });
        }

        Ok(ColumnRef {
            block,
            column,
            sign,
        })
    }

    /// Value of sample `j` for a resolved column, sign applied.
    fn value(&self, column: &ColumnRef, j: usize) -> f64 {
        let stored = match (column.block, self.transposed) {
            (DataBlock::Parameter, true) => self.constants.numeric_at(column.column, 0),
            (DataBlock::Parameter, false) => self.constants.numeric_at(0, column.column),
            (DataBlock::Trajectory, true) => self.samples.numeric_at(column.column, j),
            (DataBlock::Trajectory, false) => self.samples.numeric_at(j, column.column),
        };
        stored * column.sign
    }

    fn time_value(&self, j: usize) -> f64 {
        if self.transposed {
            self.samples.numeric_at(0, j)
        } else {
            self.samples.numeric_at(j, 0)
        }
    }
}

fn required_text<'m>(mat: &'m Mat4File, file: &str, name: &str) -> Result<&'m Matrix, Error> {
    match mat.matrix(name) {
        Some(m) if m.text().is_some() => Ok(m),
        _ => Err(Error::UnsupportedStructure {
            file: file.to_string(),
        }),
    }
}

fn required_numeric<'m>(mat: &'m Mat4File, file: &str, name: &str) -> Result<&'m Matrix, Error> {
    match mat.matrix(name) {
        Some(m) if m.numeric().is_some() => Ok(m),
        _ => Err(Error::UnsupportedStructure {
            file: file.to_string(),
        }),
    }
}

/// Split a fixed-width character matrix into one trimmed string per entry.
///
/// Entries run along rows normally and along columns when the container is
/// transposed. Padding is cut at the first NUL, then trailing whitespace is
/// stripped.
fn split_string_matrix(matrix: &Matrix, transposed: bool) -> Vec<String> {
    let text = matrix.text().unwrap_or(&[]);
    let (rows, cols) = (matrix.rows, matrix.cols);
    let mut strings = Vec::new();

    if transposed {
        // each stored column is one entry, contiguous in column-major order
        for i in 0..cols {
            strings.push(trim_padded(&text[i * rows..(i + 1) * rows]));
        }
    } else {
        let mut buf = Vec::with_capacity(cols);
        for i in 0..rows {
            buf.clear();
            for j in 0..cols {
                buf.push(text[j * rows + i]);
            }
            strings.push(trim_padded(&buf));
        }
    }

    strings
}

fn trim_padded(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).trim_end().to_string()
}

/// State of the backward unit scan inside a bracketed description suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnitScan {
    /// Collecting the trailing segment, directly left of the closing `]`.
    Trailing,
    /// The trailing segment was empty (`...|]`); collecting the segment
    /// before the bar instead.
    Fallback,
}

/// Extract the unit from a description of the form `"comment [unit]"` or
/// `"comment [kind|unit]"`, scanning backward from the trailing bracket.
///
/// The unit is the last bar-separated segment inside the brackets; an empty
/// trailing segment falls back to the one before it. A description without a
/// trailing bracket has no unit.
fn unit_from_description(description: &str) -> String {
    if description.len() <= 2 || !description.ends_with(']') {
        return String::new();
    }
    let inner = &description[..description.len() - 1];

    let mut unit: Vec<char> = Vec::new();
    let mut state = UnitScan::Trailing;
    for ch in inner.chars().rev() {
        match (state, ch) {
            (_, '[') => break,
            (UnitScan::Trailing, '|') => {
                if !unit.is_empty() {
                    break;
                }
                state = UnitScan::Fallback;
            }
            (_, c) => unit.push(c),
        }
    }
    unit.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustysdf_mat4::MatrixData;

    #[test]
    fn unit_in_brackets() {
        assert_eq!(unit_from_description("Foo [N.m]"), "N.m");
    }

    #[test]
    fn unit_after_bar() {
        assert_eq!(unit_from_description("Foo [kind|N.m]"), "N.m");
    }

    #[test]
    fn empty_trailing_segment_falls_back() {
        assert_eq!(unit_from_description("Foo [N.m|]"), "N.m");
    }

    #[test]
    fn no_brackets_no_unit() {
        assert_eq!(unit_from_description("Foo"), "");
    }

    #[test]
    fn bracket_not_at_end_no_unit() {
        assert_eq!(unit_from_description("t[3] of frame_a"), "");
    }

    #[test]
    fn short_descriptions_have_no_unit() {
        assert_eq!(unit_from_description(""), "");
        assert_eq!(unit_from_description("]"), "");
        assert_eq!(unit_from_description("[]"), "");
    }

    #[test]
    fn trims_nul_and_blank_padding() {
        assert_eq!(trim_padded(b"abc\0\0\0"), "abc");
        assert_eq!(trim_padded(b"abc   "), "abc");
        assert_eq!(trim_padded(b"abc \0 x"), "abc");
    }

    #[test]
    fn split_normal_reads_rows() {
        // 2x3 text matrix, column-major: rows "ab " and "cde"
        let m = Matrix {
            name: "name".into(),
            rows: 2,
            cols: 3,
            data: MatrixData::Text(vec![b'a', b'c', b'b', b'd', b' ', b'e']),
        };
        assert_eq!(split_string_matrix(&m, false), vec!["ab", "cde"]);
    }

    #[test]
    fn split_transposed_reads_columns() {
        // 3x2 text matrix, column-major: columns "ab " and "cde"
        let m = Matrix {
            name: "name".into(),
            rows: 3,
            cols: 2,
            data: MatrixData::Text(vec![b'a', b'b', b' ', b'c', b'd', b'e']),
        };
        assert_eq!(split_string_matrix(&m, true), vec!["ab", "cde"]);
    }
}
