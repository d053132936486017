//! Request-level orchestration: fetch a sheet, decode it, rank it.

use crate::colors::team_color;
use crate::config::Config;
use crate::error::AppError;
use crate::models::leaderboard::*;
use crate::services::{decoder, ranking};
use crate::source::TableSource;
use crate::validation;
use chrono::{SecondsFormat, Utc};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{info, warn};

static MONTH_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]{3}\s\d{1,2})").expect("month-day pattern compiles"));

fn spreadsheet_id(config: &Config) -> Result<&str, AppError> {
    config
        .spreadsheet_id
        .as_deref()
        .ok_or_else(|| AppError::Config("Spreadsheet ID not configured".into()))
}

fn load_entries(
    source: &dyn TableSource,
    config: &Config,
    sheet_name: &str,
) -> Result<Vec<LeaderboardEntry>, AppError> {
    let id = spreadsheet_id(config)?;
    let table = source.fetch_table(id, sheet_name).map_err(|e| {
        warn!(sheet = sheet_name, spreadsheet = %config.masked_spreadsheet_id(), error = %e, "sheet fetch failed");
        e
    })?;
    let entries = decoder::decode(&table, TableKind::for_sheet(sheet_name));
    info!(sheet = sheet_name, rows = table.len(), entries = entries.len(), "decoded sheet");
    Ok(entries)
}

fn to_rows(ranked: Vec<LeaderboardEntry>, filter: Filter) -> Vec<RankedRow> {
    ranked
        .into_iter()
        .map(|entry| RankedRow {
            value: ranking::resolve_metric(&entry, filter),
            team_color: team_color(&entry.group_label),
            entry,
        })
        .collect()
}

fn respond(data: Vec<RankedRow>, filter: Filter, sheet_name: String) -> LeaderboardResponse {
    LeaderboardResponse {
        data,
        filter,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        sheet_name,
    }
}

pub fn get_leaderboard(
    source: &dyn TableSource,
    config: &Config,
    query: &LeaderboardQuery,
) -> Result<LeaderboardResponse, AppError> {
    let filter = Filter::new(
        validation::parse_stage(query.top_level.as_deref())?,
        validation::parse_window(query.second_level.as_deref())?,
    );
    let sheet_name = validation::validate_sheet_name(query.sheet_name.as_deref(), &config.default_sheet)?;
    let include_zero = query.include_zero.unwrap_or(false);
    if !ranking::is_legal(filter) {
        info!(stage = filter.stage.as_str(), window = filter.window.as_str(), "window not tracked for stage; every value resolves to zero");
    }

    let entries = load_entries(source, config, &sheet_name)?;
    let ranked = ranking::rank(&entries, filter, include_zero);
    info!(sheet = %sheet_name, ranked = ranked.len(), include_zero, "ranked leaderboard");

    Ok(respond(to_rows(ranked, filter), filter, sheet_name))
}

/// Name search over the zero-inclusive ranking, so people with nothing
/// in the selected window can still be found. A blank term falls back to
/// the regular ranked view.
pub fn search_leaderboard(
    source: &dyn TableSource,
    config: &Config,
    query: &SearchQuery,
) -> Result<LeaderboardResponse, AppError> {
    let filter = Filter::new(
        validation::parse_stage(query.top_level.as_deref())?,
        validation::parse_window(query.second_level.as_deref())?,
    );
    let sheet_name = validation::validate_sheet_name(query.sheet_name.as_deref(), &config.default_sheet)?;
    let term = query.q.as_deref().unwrap_or("").to_lowercase();

    let entries = load_entries(source, config, &sheet_name)?;
    let ranked = if term.trim().is_empty() {
        ranking::rank(&entries, filter, false)
    } else {
        ranking::rank(&entries, filter, true)
            .into_iter()
            .filter(|entry| entry.name.to_lowercase().contains(&term))
            .collect()
    };

    Ok(respond(to_rows(ranked, filter), filter, sheet_name))
}

/// The header text above the SUBMITTED/YESTERDAY column, which names the
/// day it covers. Fetch failures degrade to no label.
pub fn get_header_label(
    source: &dyn TableSource,
    config: &Config,
    query: &HeaderQuery,
) -> Result<HeaderLabel, AppError> {
    let stage = validation::parse_stage(query.top_level.as_deref())?;
    let sheet_name = validation::validate_sheet_name(query.sheet_name.as_deref(), &config.default_sheet)?;
    let id = spreadsheet_id(config)?;

    let raw = match stage {
        Stage::Submitted => {
            let column = decoder::metric_column(TableKind::for_sheet(&sheet_name), Stage::Submitted, Window::Yesterday);
            match source.fetch_header(id, &sheet_name) {
                Ok(header) => column.and_then(|col| header.get(col).cloned()),
                Err(e) => {
                    warn!(sheet = %sheet_name, error = %e, "header fetch failed");
                    None
                }
            }
        }
        Stage::Verified | Stage::Installed => None,
    };
    let label = raw.as_deref().map(trim_to_month_day);

    Ok(HeaderLabel { raw, label, sheet_name })
}

/// "Sep 18 Submitted" -> "Sep 18". Text without a leading date is kept.
pub fn trim_to_month_day(label: &str) -> String {
    MONTH_DAY
        .captures(label)
        .and_then(|caps| caps.get(1))
        .map_or_else(|| label.to_string(), |m| m.as_str().to_string())
}

pub fn filter_options() -> Vec<FilterOption> {
    Stage::ALL
        .into_iter()
        .map(|stage| FilterOption {
            stage,
            windows: stage.valid_windows(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_to_month_day() {
        assert_eq!(trim_to_month_day("Sep 18 Submitted"), "Sep 18");
        assert_eq!(trim_to_month_day("Oct 3"), "Oct 3");
        assert_eq!(trim_to_month_day("Yesterday"), "Yesterday");
        assert_eq!(trim_to_month_day(""), "");
    }

    #[test]
    fn test_filter_options_follow_legality() {
        let options = filter_options();
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].stage, Stage::Submitted);
        assert_eq!(options[0].windows.len(), 4);
        assert_eq!(options[2].windows, &[Window::Mtd, Window::Ytd]);
    }
}
