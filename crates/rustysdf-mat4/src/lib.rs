//! Level-4 MAT matrix containers: a reader and a small fixture writer.
//!
//! This crate handles only what the trajectory decoder consumes: enumerate
//! named matrices and hand over their raw numeric or character payloads in
//! column-major order. It is not a general MAT toolkit — later MAT versions,
//! sparse matrices, complex values, and big-endian containers are rejected
//! with typed errors.
//!
//! # Example
//!
//! ```
//! use rustysdf_mat4::{Mat4File, Mat4Writer};
//!
//! let mut w = Mat4Writer::new();
//! w.put_numeric("data_1", 1, 2, &[7700.0, 0.5]).unwrap();
//! let bytes = w.finish();
//!
//! let file = Mat4File::from_bytes(&bytes).unwrap();
//! let m = file.matrix("data_1").unwrap();
//! assert_eq!(m.numeric_at(0, 1), 0.5);
//! ```

pub mod error;
pub mod reader;
pub mod writer;

pub use error::Mat4Error;
pub use reader::{Mat4File, Matrix, MatrixData};
pub use writer::Mat4Writer;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_roundtrip() {
        let mut w = Mat4Writer::new();
        w.put_numeric("m", 2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
            .unwrap();
        let file = Mat4File::from_bytes(&w.finish()).unwrap();

        let m = file.matrix("m").unwrap();
        assert_eq!(m.rows, 2);
        assert_eq!(m.cols, 3);
        // column-major: element (1, 2) is the last stored value
        assert_eq!(m.numeric_at(1, 2), 6.0);
        assert_eq!(m.numeric_at(0, 1), 3.0);
    }

    #[test]
    fn text_matrix_is_column_major() {
        let mut w = Mat4Writer::new();
        w.put_text("Aclass", &["Atrajectory", "1.1", "", "binNormal"]);
        let file = Mat4File::from_bytes(&w.finish()).unwrap();

        let m = file.matrix("Aclass").unwrap();
        assert_eq!(m.rows, 4);
        assert_eq!(m.cols, 11);
        assert_eq!(m.text_at(0, 0), b'A');
        assert_eq!(m.text_at(1, 0), b'1');
        assert_eq!(m.text_at(3, 0), b'b');
        assert_eq!(m.text_at(1, 2), b'1');
        // short rows are blank-padded
        assert_eq!(m.text_at(2, 0), b' ');
    }

    #[test]
    fn several_matrices_enumerate_in_order() {
        let mut w = Mat4Writer::new();
        w.put_numeric("a", 1, 1, &[1.0]).unwrap();
        w.put_numeric("b", 1, 1, &[2.0]).unwrap();
        let file = Mat4File::from_bytes(&w.finish()).unwrap();
        let names: Vec<_> = file.matrices().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(file.matrix("c").is_none());
    }

    #[test]
    fn truncated_payload_is_eof() {
        let mut w = Mat4Writer::new();
        w.put_numeric("m", 2, 2, &[1.0, 2.0, 3.0, 4.0]).unwrap();
        let bytes = w.finish();
        let err = Mat4File::from_bytes(&bytes[..bytes.len() - 8]).unwrap_err();
        assert!(matches!(err, Mat4Error::UnexpectedEof { .. }));
    }

    #[test]
    fn big_endian_type_code_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1000u32.to_le_bytes()); // M=1: big-endian
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(b"x\0");
        let err = Mat4File::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, Mat4Error::UnsupportedType(1000)));
    }

    #[test]
    fn i32_elements_widen_to_f64() {
        // hand-build an i32 matrix: P=2 -> type code 20
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&20u32.to_le_bytes());
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&5u32.to_le_bytes());
        bytes.extend_from_slice(b"info\0");
        bytes.extend_from_slice(&2i32.to_le_bytes());
        bytes.extend_from_slice(&(-3i32).to_le_bytes());
        let file = Mat4File::from_bytes(&bytes).unwrap();
        let m = file.matrix("info").unwrap();
        assert_eq!(m.numeric(), Some(&[2.0, -3.0][..]));
    }
}
