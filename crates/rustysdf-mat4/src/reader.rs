//! Reading Level-4 MAT containers.
//!
//! A container is a sequence of matrices, each preceded by a 20-byte header:
//! type code, row count, column count, imaginary flag, and name length
//! (including the trailing NUL). The type code encodes byte order, numeric
//! precision, and matrix class as `M*1000 + O*100 + P*10 + T`. Elements are
//! stored column-major.
//!
//! Numeric matrices are widened to `f64` on read regardless of their stored
//! precision; text matrices are kept as raw character codes. Only
//! little-endian containers are handled.

use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};

use crate::error::Mat4Error;

/// Element payload of a parsed matrix.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixData {
    /// Numeric values, widened to `f64`, column-major.
    Numeric(Vec<f64>),
    /// Character codes, column-major.
    Text(Vec<u8>),
}

/// One named matrix from a container.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub name: String,
    pub rows: usize,
    pub cols: usize,
    pub data: MatrixData,
}

impl Matrix {
    /// Numeric payload, if this is a numeric matrix.
    pub fn numeric(&self) -> Option<&[f64]> {
        match &self.data {
            MatrixData::Numeric(v) => Some(v),
            MatrixData::Text(_) => None,
        }
    }

    /// Text payload, if this is a text matrix.
    pub fn text(&self) -> Option<&[u8]> {
        match &self.data {
            MatrixData::Text(v) => Some(v),
            MatrixData::Numeric(_) => None,
        }
    }

    /// Numeric element at `(row, col)`.
    ///
    /// Callers must have validated the indices against `rows`/`cols`;
    /// out-of-range access is a programming error.
    pub fn numeric_at(&self, row: usize, col: usize) -> f64 {
        match &self.data {
            MatrixData::Numeric(v) => v[col * self.rows + row],
            MatrixData::Text(_) => panic!("numeric_at on a text matrix"),
        }
    }

    /// Text element at `(row, col)`.
    pub fn text_at(&self, row: usize, col: usize) -> u8 {
        match &self.data {
            MatrixData::Text(v) => v[col * self.rows + row],
            MatrixData::Numeric(_) => panic!("text_at on a numeric matrix"),
        }
    }
}

/// A fully parsed MAT container.
#[derive(Debug, Clone)]
pub struct Mat4File {
    matrices: Vec<Matrix>,
}

impl Mat4File {
    /// Open and parse a container file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Mat4Error> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    /// Parse a container from in-memory bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, Mat4Error> {
        let mut matrices = Vec::new();
        let mut pos = 0;
        while pos < data.len() {
            let (matrix, next) = parse_matrix(data, pos)?;
            matrices.push(matrix);
            pos = next;
        }
        Ok(Self { matrices })
    }

    /// Look up a matrix by name.
    pub fn matrix(&self, name: &str) -> Option<&Matrix> {
        self.matrices.iter().find(|m| m.name == name)
    }

    /// All matrices in file order.
    pub fn matrices(&self) -> &[Matrix] {
        &self.matrices
    }
}

const HEADER_LEN: usize = 20;

fn take(data: &[u8], pos: usize, n: usize) -> Result<&[u8], Mat4Error> {
    match pos.checked_add(n) {
        Some(end) if end <= data.len() => Ok(&data[pos..end]),
        _ => Err(Mat4Error::UnexpectedEof {
            expected: pos.saturating_add(n),
            available: data.len(),
        }),
    }
}

fn parse_matrix(data: &[u8], start: usize) -> Result<(Matrix, usize), Mat4Error> {
    let header = take(data, start, HEADER_LEN)?;
    let type_code = LittleEndian::read_u32(&header[0..4]);
    let rows = LittleEndian::read_u32(&header[4..8]) as usize;
    let cols = LittleEndian::read_u32(&header[8..12]) as usize;
    let imagf = LittleEndian::read_u32(&header[12..16]);
    let name_len = LittleEndian::read_u32(&header[16..20]) as usize;

    let byte_order = type_code / 1000;
    let precision = (type_code / 10) % 10;
    let class = type_code % 10;
    // byte order other than little-endian, sparse class, or a stray
    // hundreds digit all mean "not our dialect"
    if byte_order != 0 || (type_code / 100) % 10 != 0 || class > 1 {
        return Err(Mat4Error::UnsupportedType(type_code));
    }

    let name_bytes = take(data, start + HEADER_LEN, name_len)?;
    let name_end = name_bytes
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(name_bytes.len());
    let name = std::str::from_utf8(&name_bytes[..name_end])
        .map_err(|_| Mat4Error::InvalidName)?
        .to_string();

    let elem_size = match precision {
        0 => 8, // f64
        1 => 4, // f32
        2 => 4, // i32
        3 => 2, // i16
        4 => 2, // u16
        5 => 1, // u8
        _ => return Err(Mat4Error::UnsupportedType(type_code)),
    };

    let count = rows
        .checked_mul(cols)
        .ok_or(Mat4Error::UnsupportedType(type_code))?;
    let payload_len = count.saturating_mul(elem_size);
    let payload_start = start + HEADER_LEN + name_len;
    let payload = take(data, payload_start, payload_len)?;

    if imagf != 0 {
        return Err(Mat4Error::ComplexUnsupported(name));
    }

    let values = read_elements(payload, precision, count);
    let data_out = if class == 1 {
        MatrixData::Text(values.iter().map(|&v| v as u8).collect())
    } else {
        MatrixData::Numeric(values)
    };

    let matrix = Matrix {
        name,
        rows,
        cols,
        data: data_out,
    };
    Ok((matrix, payload_start + payload_len))
}

fn read_elements(payload: &[u8], precision: u32, count: usize) -> Vec<f64> {
    let mut values = Vec::with_capacity(count);
    match precision {
        0 => {
            for i in 0..count {
                values.push(LittleEndian::read_f64(&payload[i * 8..i * 8 + 8]));
            }
        }
        1 => {
            for i in 0..count {
                values.push(f64::from(LittleEndian::read_f32(&payload[i * 4..i * 4 + 4])));
            }
        }
        2 => {
            for i in 0..count {
                values.push(f64::from(LittleEndian::read_i32(&payload[i * 4..i * 4 + 4])));
            }
        }
        3 => {
            for i in 0..count {
                values.push(f64::from(LittleEndian::read_i16(&payload[i * 2..i * 2 + 2])));
            }
        }
        4 => {
            for i in 0..count {
                values.push(f64::from(LittleEndian::read_u16(&payload[i * 2..i * 2 + 2])));
            }
        }
        5 => {
            for i in 0..count {
                values.push(f64::from(payload[i]));
            }
        }
        _ => unreachable!(), // validated by the caller
    }
    values
}
