use crate::models::leaderboard::Table;
use rusqlite::{params, Connection};
use std::sync::Mutex;

const SCHEMA: &str = include_str!("schema.sql");

/// Sheet snapshots kept in SQLite, one JSON cell array per row.
pub struct Db {
    conn: Mutex<Connection>,
}

impl Db {
    pub fn open(path: &str) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA busy_timeout=5000;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Db {
            conn: Mutex::new(conn),
        })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Db {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T, rusqlite::Error>
    where
        F: FnOnce(&Connection) -> Result<T, rusqlite::Error>,
    {
        // A poisoned lock only means another caller panicked mid-query;
        // the connection itself is still usable.
        let conn = self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&conn)
    }

    /// Rows of a stored sheet in row order. Empty when nothing is stored.
    pub fn load_table(&self, spreadsheet_id: &str, sheet_name: &str) -> Result<Table, rusqlite::Error> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT row_index, cells FROM sheet_rows
                 WHERE spreadsheet_id = ?1 AND sheet_name = ?2
                 ORDER BY row_index",
            )?;
            let rows = stmt.query_map(params![spreadsheet_id, sheet_name], |row| {
                let index: i64 = row.get(0)?;
                let cells: String = row.get(1)?;
                serde_json::from_str::<Vec<String>>(&cells).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        index as usize,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })
            })?;

            let mut table = Vec::new();
            for row in rows {
                table.push(row?);
            }
            Ok(table)
        })
    }

    /// Replaces the stored snapshot of a sheet.
    pub fn store_table(&self, spreadsheet_id: &str, sheet_name: &str, table: &Table) -> Result<(), rusqlite::Error> {
        let mut conn = self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM sheet_rows WHERE spreadsheet_id = ?1 AND sheet_name = ?2",
            params![spreadsheet_id, sheet_name],
        )?;
        for (index, row) in table.iter().enumerate() {
            let cells = serde_json::to_string(row)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
            tx.execute(
                "INSERT INTO sheet_rows (spreadsheet_id, sheet_name, row_index, cells)
                 VALUES (?1, ?2, ?3, ?4)",
                params![spreadsheet_id, sheet_name, index as i64, cells],
            )?;
        }
        tx.commit()
    }
}
