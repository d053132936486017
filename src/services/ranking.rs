//! Filter and rank decoded entries under a (stage, window) selection.

use crate::models::leaderboard::*;

pub fn is_legal(filter: Filter) -> bool {
    filter.stage.valid_windows().contains(&filter.window)
}

/// The value an entry is ranked by. Illegal pairs resolve to zero.
pub fn resolve_metric(entry: &LeaderboardEntry, filter: Filter) -> f64 {
    if is_legal(filter) {
        entry.metrics.get(filter.stage, filter.window)
    } else {
        0.0
    }
}

/// Returns a fresh ranked view: zero-valued entries removed unless
/// `include_zero`, stable descending order, dense 1-based ranks.
pub fn rank(entries: &[LeaderboardEntry], filter: Filter, include_zero: bool) -> Vec<LeaderboardEntry> {
    let mut scored: Vec<(f64, &LeaderboardEntry)> = entries
        .iter()
        .map(|entry| (resolve_metric(entry, filter), entry))
        .filter(|(value, _)| include_zero || *value != 0.0)
        .collect();

    // sort_by is stable, so equal values keep their input order.
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    scored
        .into_iter()
        .enumerate()
        .map(|(pos, (_, entry))| LeaderboardEntry {
            rank: pos + 1,
            ..entry.clone()
        })
        .collect()
}
