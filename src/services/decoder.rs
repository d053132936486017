//! Raw sheet rows to typed leaderboard entries.
//!
//! Decoding never fails: short rows and blank names are dropped, and any
//! metric cell that does not read as a number counts as zero.

use crate::models::leaderboard::*;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("number pattern compiles")
});

/// Metric columns in sheet order, starting at the layout's metrics offset.
pub const METRIC_COLUMNS: [(Stage, Window); 9] = [
    (Stage::Submitted, Window::Ytd),
    (Stage::Submitted, Window::Mtd),
    (Stage::Submitted, Window::Wtd),
    (Stage::Submitted, Window::Yesterday),
    (Stage::Verified, Window::Ytd),
    (Stage::Verified, Window::Mtd),
    (Stage::Verified, Window::Wtd),
    (Stage::Installed, Window::Ytd),
    (Stage::Installed, Window::Mtd),
];

/// Absolute column index of a metric cell, or `None` for a cell the sheet
/// does not carry.
pub fn metric_column(kind: TableKind, stage: Stage, window: Window) -> Option<usize> {
    METRIC_COLUMNS
        .iter()
        .position(|&(s, w)| s == stage && w == window)
        .map(|pos| kind.metrics_offset() + pos)
}

pub fn decode(table: &[Vec<String>], kind: TableKind) -> Vec<LeaderboardEntry> {
    let mut entries = Vec::new();

    for (index, row) in table.iter().skip(1).enumerate() {
        if row.len() < kind.min_columns() {
            debug!(row = index + 1, columns = row.len(), "skipping row with insufficient columns");
            continue;
        }

        let name = &row[kind.name_column()];
        if name.trim().is_empty() {
            debug!(row = index + 1, "skipping row with empty name");
            continue;
        }
        let group_label = match kind.group_column() {
            Some(col) => row[col].clone(),
            None => name.clone(),
        };

        let mut metrics = MetricMatrix::default();
        for (pos, &(stage, window)) in METRIC_COLUMNS.iter().enumerate() {
            metrics.set(stage, window, parse_metric(&row[kind.metrics_offset() + pos]));
        }

        entries.push(LeaderboardEntry {
            rank: index + 1,
            name: name.clone(),
            group_label,
            metrics,
        });
    }

    entries
}

/// Reads the longest leading decimal number in the cell, the way a
/// formatted sheet value like "12 units" or "3.5k" is usually meant.
/// Anything negative, non-finite or unreadable becomes 0.
pub fn parse_metric(cell: &str) -> f64 {
    LEADING_NUMBER
        .find(cell.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn header() -> Vec<String> {
        row(&["#", "Name", "Team", "S YTD", "S MTD", "S WTD", "Sep 18 Submitted"])
    }

    #[test]
    fn test_primary_layout_maps_columns() {
        let table = vec![
            header(),
            row(&["1", "Alice", "TeamA", "5", "3", "1", "0", "2", "1", "0", "4", "2"]),
        ];
        let entries = decode(&table, TableKind::Primary);
        assert_eq!(entries.len(), 1);
        let alice = &entries[0];
        assert_eq!(alice.name, "Alice");
        assert_eq!(alice.group_label, "TeamA");
        assert_eq!(alice.rank, 1);
        assert_eq!(alice.metrics.get(Stage::Submitted, Window::Ytd), 5.0);
        assert_eq!(alice.metrics.get(Stage::Submitted, Window::Yesterday), 0.0);
        assert_eq!(alice.metrics.get(Stage::Verified, Window::Ytd), 2.0);
        assert_eq!(alice.metrics.get(Stage::Installed, Window::Ytd), 4.0);
        assert_eq!(alice.metrics.get(Stage::Installed, Window::Mtd), 2.0);
    }

    #[test]
    fn test_aggregate_layout_uses_single_identity_column() {
        let table = vec![
            header(),
            row(&["North", "10", "8", "6", "4", "7", "5", "3", "2", "1"]),
        ];
        let entries = decode(&table, TableKind::Aggregate);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "North");
        assert_eq!(entries[0].group_label, "North");
        assert_eq!(entries[0].metrics.get(Stage::Submitted, Window::Ytd), 10.0);
        assert_eq!(entries[0].metrics.get(Stage::Submitted, Window::Yesterday), 4.0);
        assert_eq!(entries[0].metrics.get(Stage::Installed, Window::Mtd), 1.0);
    }

    #[test]
    fn test_short_rows_are_dropped() {
        let table = vec![
            header(),
            row(&["1", "Alice", "TeamA", "5", "3", "1", "0", "2", "1", "0", "4"]),
            row(&["2", "Bob", "TeamB", "5", "3", "1", "0", "2", "1", "0", "4", "2"]),
        ];
        let entries = decode(&table, TableKind::Primary);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Bob");
        // Provisional rank follows the data row index, skipped rows included.
        assert_eq!(entries[0].rank, 2);

        let aggregate = vec![header(), row(&["North", "1", "2", "3", "4", "5", "6", "7", "8"])];
        assert!(decode(&aggregate, TableKind::Aggregate).is_empty());
    }

    #[test]
    fn test_blank_names_are_dropped() {
        let table = vec![
            header(),
            row(&["", "   ", "TeamC", "9", "9", "9", "9", "9", "9", "9", "9", "9"]),
            row(&["", "", "TeamC", "9", "9", "9", "9", "9", "9", "9", "9", "9"]),
        ];
        assert!(decode(&table, TableKind::Primary).is_empty());
    }

    #[test]
    fn test_header_only_and_empty_tables() {
        assert!(decode(&[], TableKind::Primary).is_empty());
        assert!(decode(&[header()], TableKind::Primary).is_empty());
    }

    #[test]
    fn test_parse_metric_defaults() {
        assert_eq!(parse_metric("42"), 42.0);
        assert_eq!(parse_metric(" 3.5"), 3.5);
        assert_eq!(parse_metric("12 units"), 12.0);
        assert_eq!(parse_metric("1,234"), 1.0);
        assert_eq!(parse_metric(".5"), 0.5);
        assert_eq!(parse_metric("2e3"), 2000.0);
        assert_eq!(parse_metric("7e"), 7.0);
        assert_eq!(parse_metric(""), 0.0);
        assert_eq!(parse_metric("n/a"), 0.0);
        assert_eq!(parse_metric("-"), 0.0);
        assert_eq!(parse_metric("-4"), 0.0);
        assert_eq!(parse_metric("1e400"), 0.0);
        assert_eq!(parse_metric("+.5"), 0.5);
        assert_eq!(parse_metric("5."), 5.0);
        assert_eq!(parse_metric("12%"), 12.0);
        assert_eq!(parse_metric("$5"), 0.0);
        assert_eq!(parse_metric("0x10"), 0.0);
        assert_eq!(parse_metric("Infinity"), 0.0);
    }

    #[test]
    fn test_metric_column_positions() {
        assert_eq!(metric_column(TableKind::Primary, Stage::Submitted, Window::Yesterday), Some(6));
        assert_eq!(metric_column(TableKind::Aggregate, Stage::Submitted, Window::Yesterday), Some(4));
        assert_eq!(metric_column(TableKind::Primary, Stage::Installed, Window::Mtd), Some(11));
        assert_eq!(metric_column(TableKind::Primary, Stage::Installed, Window::Wtd), None);
    }
}
