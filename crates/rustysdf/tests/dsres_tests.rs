//! Integration tests for the legacy trajectory backend: containers are
//! synthesized in both storage orientations and must be indistinguishable
//! through the read API.

use tempfile::TempDir;

use rustysdf_mat4::Mat4Writer;

const NSAMPLES: usize = 502;

const NAMES: [&str; 3] = ["Time", "boxBody1.density", "boxBody1.frame_a.t[3]"];
const DESCRIPTIONS: [&str; 3] = ["Time [s]", "Density [kg/m3]", "Cut torque [N.m]"];

// dataInfo rows, one per variable: (data block, signed 1-based column).
// The torque column is stored negated, marked by the negative index.
const DATA_INFO: [[f64; 2]; 3] = [[2.0, 1.0], [1.0, 2.0], [2.0, -3.0]];

const DENSITY: f64 = 7700.0;

fn time_at(j: usize) -> f64 {
    j as f64 * 3.0 / 501.0
}

fn phi_at(j: usize) -> f64 {
    j as f64 * 0.01
}

fn torque_at(j: usize) -> f64 {
    0.001 * j as f64 - 0.3
}

/// Row-major `[sample][column]` view of the trajectory block; column 0 is
/// the time scale, column 2 holds the negated torque.
fn data_2_rows() -> Vec<[f64; 3]> {
    (0..NSAMPLES)
        .map(|j| [time_at(j), phi_at(j), -torque_at(j)])
        .collect()
}

fn transpose_lines(lines: &[&str]) -> Vec<String> {
    let width = lines.iter().map(|l| l.len()).max().unwrap_or(0);
    (0..width)
        .map(|j| {
            lines
                .iter()
                .map(|l| l.as_bytes().get(j).copied().unwrap_or(b' ') as char)
                .collect()
        })
        .collect()
}

fn put_text_transposed(w: &mut Mat4Writer, name: &str, lines: &[&str]) {
    let flipped = transpose_lines(lines);
    let refs: Vec<&str> = flipped.iter().map(|s| s.as_str()).collect();
    w.put_text(name, &refs);
}

/// Column-major serialization of a row-major `[row][col]` table.
fn col_major(rows: usize, cols: usize, at: impl Fn(usize, usize) -> f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(rows * cols);
    for c in 0..cols {
        for r in 0..rows {
            out.push(at(r, c));
        }
    }
    out
}

fn build_trajectory(transposed: bool) -> Vec<u8> {
    let mut w = Mat4Writer::new();
    let orientation = if transposed { "binTrans" } else { "binNormal" };

    // Aclass is stored row-wise in both orientations
    w.put_text("Aclass", &["Atrajectory", "1.1", "", orientation]);

    if transposed {
        put_text_transposed(&mut w, "name", &NAMES);
        put_text_transposed(&mut w, "description", &DESCRIPTIONS);
        // transposed dataInfo: 2 x nvars, one column per variable
        w.put_numeric(
            "dataInfo",
            2,
            3,
            &col_major(2, 3, |r, c| DATA_INFO[c][r]),
        )
        .unwrap();
        // transposed data_1: one row per parameter
        w.put_numeric("data_1", 2, 1, &[1.0, DENSITY]).unwrap();
        let rows = data_2_rows();
        w.put_numeric(
            "data_2",
            3,
            NSAMPLES,
            &col_major(3, NSAMPLES, |r, c| rows[c][r]),
        )
        .unwrap();
    } else {
        w.put_text("name", &NAMES);
        w.put_text("description", &DESCRIPTIONS);
        w.put_numeric(
            "dataInfo",
            3,
            2,
            &col_major(3, 2, |r, c| DATA_INFO[r][c]),
        )
        .unwrap();
        w.put_numeric("data_1", 1, 2, &[1.0, DENSITY]).unwrap();
        let rows = data_2_rows();
        w.put_numeric(
            "data_2",
            NSAMPLES,
            3,
            &col_major(NSAMPLES, 3, |r, c| rows[r][c]),
        )
        .unwrap();
    }

    w.finish()
}

fn write_trajectory(dir: &TempDir, file_name: &str, transposed: bool) -> std::path::PathBuf {
    let path = dir.path().join(file_name);
    std::fs::write(&path, build_trajectory(transposed)).unwrap();
    path
}

#[test]
fn sample_count_in_both_orientations() {
    let dir = tempfile::tempdir().unwrap();
    for (name, transposed) in [("normal.mat", false), ("trans.mat", true)] {
        let path = write_trajectory(&dir, name, transposed);
        let n = rustysdf::time_series_len(&path, &["/boxBody1/density"]).unwrap();
        assert_eq!(n, 502);
    }
}

#[test]
fn reads_time_constant_and_negated_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_trajectory(&dir, "normal.mat", false);

    let names = ["/boxBody1/density", "/boxBody1/frame_a/t[3]"];
    let units = ["kg/m3", "N.m"];
    let n = rustysdf::time_series_len(&path, &names).unwrap();
    let mut data = vec![0.0; n * 3];
    rustysdf::read_time_series(&path, &names, &units, "s", n, &mut data).unwrap();

    assert_eq!(data[0], 0.0);
    assert_eq!(data[501 * 3], 3.0);

    // block-1 parameter: replicated across every sample
    assert_eq!(data[1], DENSITY);
    assert_eq!(data[501 * 3 + 1], DENSITY);

    // block-2 column stored negated: the sign flips back on read
    assert_eq!(data[2], torque_at(0));
    assert_eq!(data[250 * 3 + 2], torque_at(250));
    assert_eq!(data[501 * 3 + 2], torque_at(501));
}

#[test]
fn orientations_yield_bit_identical_output() {
    let dir = tempfile::tempdir().unwrap();
    let normal = write_trajectory(&dir, "normal.mat", false);
    let trans = write_trajectory(&dir, "trans.mat", true);

    let names = ["/boxBody1/density", "/boxBody1/frame_a/t[3]"];
    let units = ["kg/m3", "N.m"];

    let mut outputs = Vec::new();
    for path in [&normal, &trans] {
        let n = rustysdf::time_series_len(path, &names).unwrap();
        assert_eq!(n, 502);
        let mut data = vec![0.0; n * 3];
        rustysdf::read_time_series(path, &names, &units, "s", n, &mut data).unwrap();
        outputs.push(data);
    }
    assert_eq!(outputs[0], outputs[1]);
}

#[test]
fn variables_follow_request_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_trajectory(&dir, "normal.mat", false);

    let names = ["/boxBody1/frame_a/t[3]", "/boxBody1/density"];
    let mut data = vec![0.0; 502 * 3];
    rustysdf::read_time_series(&path, &names, &["", ""], "", 502, &mut data).unwrap();
    assert_eq!(data[1], torque_at(0));
    assert_eq!(data[2], DENSITY);
}

#[test]
fn time_itself_is_addressable() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_trajectory(&dir, "normal.mat", false);

    let mut data = vec![0.0; 502 * 2];
    rustysdf::read_time_series(&path, &["/Time"], &["s"], "s", 502, &mut data).unwrap();
    // column 0 and column 1 both carry the time scale
    assert_eq!(data[501 * 2], 3.0);
    assert_eq!(data[501 * 2 + 1], 3.0);
}

#[test]
fn wrong_time_unit_names_both_units() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_trajectory(&dir, "normal.mat", false);

    let names = ["/boxBody1/density"];
    let n = rustysdf::time_series_len(&path, &names).unwrap();
    assert_eq!(n, 502);

    let mut data = vec![0.0; n * 2];
    let err = rustysdf::read_time_series(&path, &names, &["kg/m3"], "ms", n, &mut data)
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("'ms'"), "{msg}");
    assert!(msg.contains("'s'"), "{msg}");
}

#[test]
fn wrong_variable_unit_names_units_and_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_trajectory(&dir, "normal.mat", false);

    let names = ["/boxBody1/density", "/boxBody1/frame_a/t[3]"];
    let units = ["", "A.s"];

    // the size query issued beforehand is unaffected by the later failure
    let n = rustysdf::time_series_len(&path, &names).unwrap();
    assert_eq!(n, 502);

    let mut data = vec![0.0; n * 3];
    let err =
        rustysdf::read_time_series(&path, &names, &units, "s", n, &mut data).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("'A.s'"), "{msg}");
    assert!(msg.contains("'N.m'"), "{msg}");
    assert!(msg.contains("/boxBody1/frame_a/t[3]"), "{msg}");
}

#[test]
fn unknown_variable_is_reported_with_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_trajectory(&dir, "normal.mat", false);

    let mut data = vec![0.0; 502 * 2];
    let err = rustysdf::read_time_series(&path, &["/no/such/var"], &[""], "", 502, &mut data)
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("/no/such/var"), "{msg}");
    assert!(msg.contains("normal.mat"), "{msg}");
}

#[test]
fn missing_file_is_distinguished_from_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("DoesNotExist.mat");
    let err = rustysdf::time_series_len(&path, &["/x"]).unwrap_err();
    assert!(matches!(err, rustysdf::Error::Mat { .. }));
    assert!(err.to_string().contains("DoesNotExist.mat"));
}

#[test]
fn missing_matrix_is_unsupported_structure() {
    let dir = tempfile::tempdir().unwrap();
    let mut w = Mat4Writer::new();
    w.put_text("Aclass", &["Atrajectory", "1.1", "", "binNormal"]);
    w.put_numeric("data_1", 1, 1, &[1.0]).unwrap();
    let path = dir.path().join("partial.mat");
    w.write(&path).unwrap();

    let err = rustysdf::time_series_len(&path, &["/x"]).unwrap_err();
    assert!(err.to_string().contains("unsupported file structure"));
}

#[test]
fn unknown_version_tag_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut bytes = build_trajectory(false);
    // rebuild with a bumped version row
    let mut w = Mat4Writer::new();
    w.put_text("Aclass", &["Atrajectory", "1.2", "", "binNormal"]);
    let aclass = w.finish();
    // the Aclass matrix is the first record; splice the rest behind the new one
    let original_aclass_len = record_len(&bytes);
    bytes.splice(..original_aclass_len, aclass);

    let path = dir.path().join("version.mat");
    std::fs::write(&path, bytes).unwrap();
    let err = rustysdf::time_series_len(&path, &["/x"]).unwrap_err();
    assert!(err.to_string().contains("unsupported version"), "{err}");
}

#[test]
fn unknown_orientation_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut bytes = build_trajectory(false);
    let mut w = Mat4Writer::new();
    w.put_text("Aclass", &["Atrajectory", "1.1", "", "binBoth__"]);
    let aclass = w.finish();
    let original_aclass_len = record_len(&bytes);
    bytes.splice(..original_aclass_len, aclass);

    let path = dir.path().join("orientation.mat");
    std::fs::write(&path, bytes).unwrap();
    let err = rustysdf::time_series_len(&path, &["/x"]).unwrap_err();
    assert!(
        err.to_string().contains("unsupported storage orientation"),
        "{err}"
    );
}

#[test]
fn table_operations_rejected_on_trajectories() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_trajectory(&dir, "normal.mat", false);
    let err = rustysdf::table_size(&path, "/boxBody1/density").unwrap_err();
    assert!(err.to_string().contains("not supported"));
}

#[test]
fn oversized_sample_request_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_trajectory(&dir, "normal.mat", false);
    let mut data = vec![0.0; 600 * 2];
    let err = rustysdf::read_time_series(&path, &["/boxBody1/density"], &[""], "", 600, &mut data)
        .unwrap_err();
    assert!(matches!(err, rustysdf::Error::LengthMismatch { .. }));
}

/// Byte length of the first matrix record in a container.
fn record_len(bytes: &[u8]) -> usize {
    let rows = u32::from_le_bytes(bytes[4..8].try_into().unwrap()) as usize;
    let cols = u32::from_le_bytes(bytes[8..12].try_into().unwrap()) as usize;
    let name_len = u32::from_le_bytes(bytes[16..20].try_into().unwrap()) as usize;
    // Aclass is a text matrix with 1-byte elements
    20 + name_len + rows * cols
}
