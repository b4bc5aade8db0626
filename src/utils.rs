//! Utility functions

use crate::types::Row;
use std::path::PathBuf;

/// Get the log directory path
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Lab Intel Chat")
}

/// Render a JSON cell value for table display
pub fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "NULL".to_string(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Format a backend execution time for the metric chip
pub fn format_duration_ms(ms: f64) -> String {
    if ms >= 1000.0 {
        format!("{:.1}s", ms / 1000.0)
    } else {
        format!("{:.0}ms", ms)
    }
}

fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Serialize result rows to CSV. Column order follows the first row;
/// missing keys in later rows become empty fields.
pub fn rows_to_csv(rows: &[Row]) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };
    let columns: Vec<&String> = first.keys().collect();

    let mut out = String::new();
    out.push_str(
        &columns
            .iter()
            .map(|c| csv_escape(c))
            .collect::<Vec<_>>()
            .join(","),
    );
    out.push('\n');

    for row in rows {
        let line = columns
            .iter()
            .map(|col| {
                row.get(*col)
                    .map(|v| csv_escape(&display_value(v)))
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Default filename for a CSV export
pub fn export_file_name() -> String {
    format!(
        "lab_query_{}.csv",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, serde_json::Value)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn csv_header_follows_column_order() {
        let rows = vec![row(&[
            ("lab_center", serde_json::json!("Lab 12")),
            ("abnormal_count", serde_json::json!(42)),
        ])];
        let csv = rows_to_csv(&rows);
        assert!(csv.starts_with("lab_center,abnormal_count\n"));
        assert!(csv.contains("Lab 12,42\n"));
    }

    #[test]
    fn csv_quotes_commas_and_doubles_quotes() {
        let rows = vec![row(&[
            ("name", serde_json::json!("Smith, \"Jo\"")),
            ("note", serde_json::json!("line1\nline2")),
        ])];
        let csv = rows_to_csv(&rows);
        let body = csv.lines().nth(1).unwrap();
        assert_eq!(body, "\"Smith, \"\"Jo\"\"\",\"line1");
        // the embedded newline keeps the field quoted across lines
        assert!(csv.contains("\"line1\nline2\""));
    }

    #[test]
    fn csv_empty_rows_give_empty_string() {
        assert_eq!(rows_to_csv(&[]), "");
    }

    #[test]
    fn csv_missing_keys_become_empty_fields() {
        let rows = vec![
            row(&[("a", serde_json::json!(1)), ("b", serde_json::json!(2))]),
            row(&[("a", serde_json::json!(3))]),
        ];
        let csv = rows_to_csv(&rows);
        assert!(csv.ends_with("3,\n"));
    }

    #[test]
    fn display_value_covers_scalar_types() {
        assert_eq!(display_value(&serde_json::Value::Null), "NULL");
        assert_eq!(display_value(&serde_json::json!("x")), "x");
        assert_eq!(display_value(&serde_json::json!(1.5)), "1.5");
        assert_eq!(display_value(&serde_json::json!(true)), "true");
    }

    #[test]
    fn duration_switches_to_seconds() {
        assert_eq!(format_duration_ms(152.3), "152ms");
        assert_eq!(format_duration_ms(2300.0), "2.3s");
    }
}
