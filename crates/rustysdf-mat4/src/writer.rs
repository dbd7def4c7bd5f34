//! Writing Level-4 MAT containers.
//!
//! The write surface exists to synthesize containers — fixtures for tests
//! and tooling — not to round-trip arbitrary MAT files. Numeric matrices are
//! written as little-endian `f64`, text matrices as 8-bit character codes.

use std::path::Path;

use crate::error::Mat4Error;

const TYPE_NUMERIC_F64: u32 = 0; // M=0, O=0, P=0 (f64), T=0 (full)
const TYPE_TEXT_U8: u32 = 51; // M=0, O=0, P=5 (u8), T=1 (text)

/// Builder for a MAT container.
#[derive(Debug, Default)]
pub struct Mat4Writer {
    buf: Vec<u8>,
}

impl Mat4Writer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a numeric `f64` matrix. `values` are column-major.
    pub fn put_numeric(
        &mut self,
        name: &str,
        rows: usize,
        cols: usize,
        values: &[f64],
    ) -> Result<&mut Self, Mat4Error> {
        if rows * cols != values.len() {
            return Err(Mat4Error::CountMismatch {
                expected: rows * cols,
                actual: values.len(),
            });
        }
        self.put_header(TYPE_NUMERIC_F64, rows, cols, name);
        for v in values {
            self.buf.extend_from_slice(&v.to_le_bytes());
        }
        Ok(self)
    }

    /// Append a text matrix with one row per line, blank-padded to the
    /// longest line.
    pub fn put_text(&mut self, name: &str, lines: &[&str]) -> &mut Self {
        let rows = lines.len();
        let cols = lines.iter().map(|l| l.len()).max().unwrap_or(0);
        self.put_header(TYPE_TEXT_U8, rows, cols, name);
        // column-major: all row values for column 0 first
        for j in 0..cols {
            for line in lines {
                let b = line.as_bytes().get(j).copied().unwrap_or(b' ');
                self.buf.push(b);
            }
        }
        self
    }

    fn put_header(&mut self, type_code: u32, rows: usize, cols: usize, name: &str) {
        self.buf.extend_from_slice(&type_code.to_le_bytes());
        self.buf.extend_from_slice(&(rows as u32).to_le_bytes());
        self.buf.extend_from_slice(&(cols as u32).to_le_bytes());
        self.buf.extend_from_slice(&0u32.to_le_bytes()); // no imaginary part
        self.buf
            .extend_from_slice(&((name.len() + 1) as u32).to_le_bytes());
        self.buf.extend_from_slice(name.as_bytes());
        self.buf.push(0);
    }

    /// Finish and return the container bytes.
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    /// Finish and write the container to `path`.
    pub fn write<P: AsRef<Path>>(self, path: P) -> Result<(), Mat4Error> {
        std::fs::write(path.as_ref(), self.buf)?;
        Ok(())
    }
}
