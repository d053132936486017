use super::{SourceError, TableSource};
use crate::db::Db;
use crate::models::leaderboard::Table;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Serves sheet snapshots previously stored in the local database.
pub struct SqliteSource {
    db: Arc<Db>,
}

impl SqliteSource {
    pub fn new(db: Arc<Db>) -> Self {
        SqliteSource { db }
    }

    /// Replaces stored snapshots from a JSON object mapping sheet names to
    /// row arrays, e.g. `{"Reps": [["#", "Name", ...], ...]}`. Returns the
    /// number of sheets written.
    pub fn seed_from_json(&self, spreadsheet_id: &str, json: &str) -> Result<usize, SourceError> {
        let sheets: BTreeMap<String, Table> =
            serde_json::from_str(json).map_err(|e| SourceError::Payload(format!("invalid seed file: {}", e)))?;
        for (sheet_name, table) in &sheets {
            self.db.store_table(spreadsheet_id, sheet_name, table)?;
            info!(sheet = %sheet_name, rows = table.len(), "seeded sheet snapshot");
        }
        Ok(sheets.len())
    }

    pub fn seed_from_file(&self, spreadsheet_id: &str, path: impl AsRef<Path>) -> Result<usize, SourceError> {
        let json = std::fs::read_to_string(path)?;
        self.seed_from_json(spreadsheet_id, &json)
    }
}

impl TableSource for SqliteSource {
    fn fetch_table(&self, spreadsheet_id: &str, sheet_name: &str) -> Result<Table, SourceError> {
        let table = self.db.load_table(spreadsheet_id, sheet_name)?;
        if table.is_empty() {
            return Err(SourceError::SheetNotFound(sheet_name.to_string()));
        }
        Ok(table)
    }
}
