//! Formatting utilities

use glam::Mat4;
use humansize::{DECIMAL, format_size};

/// Format file size in human-readable format
pub fn format_bytes(bytes: u64) -> String {
    format_size(bytes, DECIMAL)
}

/// Format a list of decoded components, e.g. `[1, 0.5, -2]`
pub fn format_components(values: &[f32]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{v}")).collect();
    format!("[{}]", parts.join(", "))
}

/// Format the rows of a row-vector matrix, one row per line
pub fn format_matrix_rows(matrix: &Mat4) -> Vec<String> {
    let rows = matrix.transpose().to_cols_array_2d();
    rows.iter()
        .map(|row| {
            let cells: Vec<String> = row.iter().map(|v| format!("{v:>9.4}")).collect();
            cells.join(" ")
        })
        .collect()
}

/// Describe where a buffer's bytes come from without printing embedded data
pub fn describe_uri(uri: Option<&str>) -> String {
    match uri {
        None => "GLB BIN chunk".to_string(),
        Some(uri) if uri.starts_with("data:") => "data URI".to_string(),
        Some(uri) => uri.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1024), "1.02 kB");
        assert_eq!(format_bytes(1048576), "1.05 MB");
    }

    #[test]
    fn test_format_components() {
        assert_eq!(format_components(&[1.0, 0.5, -2.0]), "[1, 0.5, -2]");
        assert_eq!(format_components(&[]), "[]");
    }

    #[test]
    fn test_format_matrix_rows() {
        // Row-vector translation keeps the offset in the last row
        let translation = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)).transpose();
        let rows = format_matrix_rows(&translation);
        assert_eq!(rows.len(), 4);
        assert!(rows[3].contains("1.0000"));
        assert!(rows[3].contains("2.0000"));
        assert!(rows[3].contains("3.0000"));
        assert!(rows[0].trim_start().starts_with("1.0000"));
    }

    #[test]
    fn test_describe_uri() {
        assert_eq!(describe_uri(None), "GLB BIN chunk");
        assert_eq!(describe_uri(Some("data:application/octet-stream;base64,AAAA")), "data URI");
        assert_eq!(describe_uri(Some("mesh.bin")), "mesh.bin");
    }
}
