use crate::error::AppError;
use crate::models::leaderboard::{Stage, Window};

const MAX_SHEET_NAME_LEN: usize = 100;

pub fn parse_stage(value: Option<&str>) -> Result<Stage, AppError> {
    match value.map(str::trim) {
        None | Some("") => Ok(Stage::Submitted),
        Some(s) => Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::BadRequest(format!("Invalid top level filter: {}", s))),
    }
}

pub fn parse_window(value: Option<&str>) -> Result<Window, AppError> {
    match value.map(str::trim) {
        None | Some("") => Ok(Window::Ytd),
        Some(s) => Window::ALL
            .into_iter()
            .find(|window| window.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::BadRequest(format!("Invalid second level filter: {}", s))),
    }
}

/// Sheet names end up inside an A1 range, so anything that could change
/// the range is refused.
pub fn validate_sheet_name(name: Option<&str>, default: &str) -> Result<String, AppError> {
    let trimmed = name.map(str::trim).unwrap_or("");
    if trimmed.is_empty() {
        return Ok(default.to_string());
    }
    if trimmed.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(AppError::BadRequest("Sheet name too long".into()));
    }
    if trimmed.chars().any(|c| c == '!' || c == '\'' || c.is_control()) {
        return Err(AppError::BadRequest(format!("Invalid sheet name: {}", trimmed)));
    }
    Ok(trimmed.to_string())
}
