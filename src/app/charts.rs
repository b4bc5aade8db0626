//! Chart auto-detection for query results
//!
//! Mirrors what an analyst would eyeball in a result set: a date-like column
//! turns into a rows-per-day trend line, low-cardinality text columns turn
//! into value-count bar charts. Detection is pure; painting lives in
//! `crate::ui::charts`.

use crate::constants::{CHART_CATEGORY_CUTOFF, CHART_MAX_BARS, CHART_TOP_VALUES};
use crate::types::Row;
use chrono::NaiveDate;

/// Rows-per-day line chart
pub struct TrendChart {
    pub column: String,
    /// Sorted by date ascending
    pub points: Vec<(NaiveDate, u64)>,
}

/// Value-count bar chart for one categorical column
pub struct BarChart {
    pub column: String,
    /// Most frequent first, at most CHART_TOP_VALUES entries
    pub bars: Vec<(String, u64)>,
}

#[derive(Default)]
pub struct ChartSet {
    pub trend: Option<TrendChart>,
    pub bars: Vec<BarChart>,
}

impl ChartSet {
    pub fn is_empty(&self) -> bool {
        self.trend.is_none() && self.bars.is_empty()
    }
}

/// Build every chart the result set supports.
pub fn detect(rows: &[Row]) -> ChartSet {
    if rows.is_empty() {
        return ChartSet::default();
    }
    let trend = detect_trend(rows);
    // A column already plotted as a trend never doubles as a bar chart
    let bars = detect_bars(rows, trend.as_ref().map(|t| t.column.as_str()));
    ChartSet { trend, bars }
}

/// Pick the date column: `bill_date` wins, otherwise the first column whose
/// name contains "date".
fn date_column(rows: &[Row]) -> Option<String> {
    let first = rows.first()?;
    if first.contains_key("bill_date") {
        return Some("bill_date".to_string());
    }
    first
        .keys()
        .find(|k| k.to_lowercase().contains("date"))
        .cloned()
}

fn parse_date(value: &serde_json::Value) -> Option<NaiveDate> {
    let s = value.as_str()?;
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    None
}

fn detect_trend(rows: &[Row]) -> Option<TrendChart> {
    let column = date_column(rows)?;

    let mut counts: Vec<(NaiveDate, u64)> = Vec::new();
    for row in rows {
        // Any unparseable value disqualifies the whole column
        let date = parse_date(row.get(&column)?)?;
        match counts.iter_mut().find(|(d, _)| *d == date) {
            Some((_, n)) => *n += 1,
            None => counts.push((date, 1)),
        }
    }
    // A single day is a dot, not a trend
    if counts.len() < 2 {
        return None;
    }
    counts.sort_by_key(|(d, _)| *d);
    Some(TrendChart { column, points: counts })
}

fn detect_bars(rows: &[Row], skip: Option<&str>) -> Vec<BarChart> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };

    let mut charts = Vec::new();
    for column in first.keys() {
        if charts.len() >= CHART_MAX_BARS {
            break;
        }
        if skip == Some(column.as_str()) {
            continue;
        }
        if let Some(bars) = categorical_counts(rows, column) {
            charts.push(BarChart {
                column: column.clone(),
                bars,
            });
        }
    }
    charts
}

/// Counts for a column if it qualifies as categorical: every non-null value
/// is a string and the distinct count stays under the cutoff.
fn categorical_counts(rows: &[Row], column: &str) -> Option<Vec<(String, u64)>> {
    let mut counts: Vec<(String, u64)> = Vec::new();
    let mut seen_any = false;

    for row in rows {
        let value = row.get(column)?;
        if value.is_null() {
            continue;
        }
        let s = value.as_str()?;
        seen_any = true;
        match counts.iter_mut().find(|(v, _)| v == s) {
            Some((_, n)) => *n += 1,
            None => {
                counts.push((s.to_string(), 1));
                // Fewer than the cutoff is categorical, reaching it is not
                if counts.len() >= CHART_CATEGORY_CUTOFF {
                    return None;
                }
            }
        }
    }
    if !seen_any {
        return None;
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(CHART_TOP_VALUES);
    Some(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows_from(json: &str) -> Vec<Row> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn trend_groups_rows_per_day() {
        let rows = rows_from(
            r#"[
                {"bill_date": "2024-03-01", "result": "high"},
                {"bill_date": "2024-03-01", "result": "low"},
                {"bill_date": "2024-03-02", "result": "high"}
            ]"#,
        );
        let trend = detect_trend(&rows).unwrap();
        assert_eq!(trend.column, "bill_date");
        assert_eq!(
            trend.points,
            vec![
                (NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 2),
                (NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(), 1),
            ]
        );
    }

    #[test]
    fn trend_finds_any_date_named_column() {
        let rows = rows_from(
            r#"[
                {"report_date": "2024-01-05T10:30:00", "n": 1},
                {"report_date": "2024-01-06T09:00:00", "n": 2}
            ]"#,
        );
        let trend = detect_trend(&rows).unwrap();
        assert_eq!(trend.column, "report_date");
        assert_eq!(trend.points.len(), 2);
    }

    #[test]
    fn single_day_is_not_a_trend() {
        let rows = rows_from(
            r#"[{"date": "2024-03-01"}, {"date": "2024-03-01"}]"#,
        );
        assert!(detect_trend(&rows).is_none());
    }

    #[test]
    fn unparseable_dates_disqualify_the_column() {
        let rows = rows_from(
            r#"[{"date": "2024-03-01"}, {"date": "yesterday"}]"#,
        );
        assert!(detect_trend(&rows).is_none());
    }

    #[test]
    fn bars_count_categories_most_frequent_first() {
        let rows = rows_from(
            r#"[
                {"lab": "Lab 12"}, {"lab": "Lab 3"}, {"lab": "Lab 12"},
                {"lab": "Lab 12"}, {"lab": "Lab 3"}, {"lab": "Lab 7"}
            ]"#,
        );
        let charts = detect_bars(&rows, None);
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].column, "lab");
        assert_eq!(
            charts[0].bars,
            vec![
                ("Lab 12".to_string(), 3),
                ("Lab 3".to_string(), 2),
                ("Lab 7".to_string(), 1),
            ]
        );
    }

    fn distinct_lab_rows(n: usize) -> Vec<Row> {
        (0..n)
            .map(|i| {
                rows_from(&format!(r#"[{{"lab": "Lab {}"}}]"#, i))
                    .pop()
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn exactly_cutoff_distinct_values_are_not_charted() {
        assert!(detect_bars(&distinct_lab_rows(20), None).is_empty());
    }

    #[test]
    fn just_under_cutoff_distinct_values_are_charted() {
        let charts = detect_bars(&distinct_lab_rows(19), None);
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].bars.len(), 10);
    }

    #[test]
    fn high_cardinality_columns_are_skipped() {
        let rows: Vec<Row> = (0..30)
            .map(|i| {
                rows_from(&format!(r#"[{{"patient_id": "P{:03}"}}]"#, i))
                    .pop()
                    .unwrap()
            })
            .collect();
        assert!(detect_bars(&rows, None).is_empty());
    }

    #[test]
    fn numeric_columns_are_not_categorical() {
        let rows = rows_from(r#"[{"count": 1}, {"count": 2}]"#);
        assert!(detect_bars(&rows, None).is_empty());
    }

    #[test]
    fn at_most_two_bar_charts() {
        let rows = rows_from(
            r#"[
                {"a": "x", "b": "y", "c": "z"},
                {"a": "x", "b": "y", "c": "z"}
            ]"#,
        );
        let charts = detect_bars(&rows, None);
        assert_eq!(charts.len(), 2);
        assert_eq!(charts[0].column, "a");
        assert_eq!(charts[1].column, "b");
    }

    #[test]
    fn bars_truncate_to_top_ten() {
        let mut json = String::from("[");
        for i in 0..12 {
            // value i repeated (12 - i) times
            for _ in 0..(12 - i) {
                json.push_str(&format!(r#"{{"grade": "g{}"}},"#, i));
            }
        }
        json.pop();
        json.push(']');
        let charts = detect_bars(&rows_from(&json), None);
        assert_eq!(charts[0].bars.len(), 10);
        assert_eq!(charts[0].bars[0], ("g0".to_string(), 12));
    }

    #[test]
    fn trend_column_never_doubles_as_a_bar_chart() {
        let rows = rows_from(
            r#"[
                {"bill_date": "2024-03-01", "lab": "Lab 12"},
                {"bill_date": "2024-03-02", "lab": "Lab 12"}
            ]"#,
        );
        let set = detect(&rows);
        assert!(set.trend.is_some());
        assert_eq!(set.bars.len(), 1);
        assert_eq!(set.bars[0].column, "lab");
    }

    #[test]
    fn empty_rows_detect_nothing() {
        assert!(detect(&[]).is_empty());
    }
}
