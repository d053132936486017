//! Data sources that hand the leaderboard a raw sheet grid.
//!
//! A source either returns the whole grid or fails; nothing here retries
//! or partially returns rows.

pub mod sheets;
pub mod sqlite;

use crate::models::leaderboard::Table;
use std::fmt;

pub use sheets::SheetsSource;
pub use sqlite::SqliteSource;

#[derive(Debug)]
pub enum SourceError {
    Http(reqwest::Error),
    Status { status: u16, message: String },
    Payload(String),
    Db(rusqlite::Error),
    SheetNotFound(String),
    Io(std::io::Error),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Http(e) => write!(f, "request failed: {}", e),
            SourceError::Status { status, message } => {
                write!(f, "upstream returned {}: {}", status, message)
            }
            SourceError::Payload(msg) => write!(f, "malformed response: {}", msg),
            SourceError::Db(e) => write!(f, "snapshot database error: {}", e),
            SourceError::SheetNotFound(name) => write!(f, "sheet not found: {}", name),
            SourceError::Io(e) => write!(f, "io error: {}", e),
        }
    }
}

impl std::error::Error for SourceError {}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        SourceError::Http(e)
    }
}

impl From<std::io::Error> for SourceError {
    fn from(e: std::io::Error) -> Self {
        SourceError::Io(e)
    }
}

impl From<rusqlite::Error> for SourceError {
    fn from(e: rusqlite::Error) -> Self {
        SourceError::Db(e)
    }
}

pub trait TableSource: Send + Sync {
    /// The full grid of `sheet_name`, header row first.
    fn fetch_table(&self, spreadsheet_id: &str, sheet_name: &str) -> Result<Table, SourceError>;

    /// Just the header row. Empty when the sheet has no rows.
    fn fetch_header(&self, spreadsheet_id: &str, sheet_name: &str) -> Result<Vec<String>, SourceError> {
        Ok(self
            .fetch_table(spreadsheet_id, sheet_name)?
            .into_iter()
            .next()
            .unwrap_or_default())
    }
}
