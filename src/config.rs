use crate::error::AppError;
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Sheets,
    Sqlite,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub source: SourceKind,
    pub spreadsheet_id: Option<String>,
    pub sheets_api_key: Option<String>,
    pub sheets_access_token: Option<String>,
    pub sheets_base_url: String,
    pub sheets_timeout_secs: u64,
    pub database_path: String,
    pub default_sheet: String,
    pub seed_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".into(),
            port: 3001,
            source: SourceKind::Sheets,
            spreadsheet_id: None,
            sheets_api_key: None,
            sheets_access_token: None,
            sheets_base_url: "https://sheets.googleapis.com/v4".into(),
            sheets_timeout_secs: 15,
            database_path: "leaderboard.db".into(),
            default_sheet: "Reps".into(),
            seed_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Config::default();

        let source = match get("LEADERBOARD_SOURCE").as_deref() {
            None | Some("sheets") => SourceKind::Sheets,
            Some("sqlite") => SourceKind::Sqlite,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "LEADERBOARD_SOURCE must be \"sheets\" or \"sqlite\", got {:?}",
                    other
                )))
            }
        };

        Ok(Config {
            host: get("HOST").unwrap_or(defaults.host),
            port: get("PORT").and_then(|p| p.parse().ok()).unwrap_or(defaults.port),
            source,
            spreadsheet_id: get("GOOGLE_SHEETS_SPREADSHEET_ID"),
            sheets_api_key: get("GOOGLE_SHEETS_API_KEY"),
            sheets_access_token: get("GOOGLE_SHEETS_ACCESS_TOKEN"),
            sheets_base_url: get("GOOGLE_SHEETS_BASE_URL").unwrap_or(defaults.sheets_base_url),
            sheets_timeout_secs: get("SHEETS_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.sheets_timeout_secs),
            database_path: get("DATABASE_PATH").unwrap_or(defaults.database_path),
            default_sheet: get("DEFAULT_SHEET").unwrap_or(defaults.default_sheet),
            seed_path: get("SEED_PATH"),
        })
    }

    /// Spreadsheet id trimmed for logs.
    pub fn masked_spreadsheet_id(&self) -> String {
        match &self.spreadsheet_id {
            Some(id) => format!("{}...", id.chars().take(10).collect::<String>()),
            None => "NOT SET".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, AppError> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 3001);
        assert_eq!(config.source, SourceKind::Sheets);
        assert_eq!(config.default_sheet, "Reps");
        assert!(config.spreadsheet_id.is_none());
        assert_eq!(config.masked_spreadsheet_id(), "NOT SET");
    }

    #[test]
    fn test_overrides_and_fallbacks() {
        let config = config_from(&[
            ("PORT", "not-a-port"),
            ("SHEETS_TIMEOUT_SECS", "5"),
            ("LEADERBOARD_SOURCE", "sqlite"),
            ("GOOGLE_SHEETS_SPREADSHEET_ID", "1AbCdEfGhIjKlMnOp"),
            ("GOOGLE_SHEETS_API_KEY", "   "),
            ("SEED_PATH", "seed.json"),
        ])
        .unwrap();
        assert_eq!(config.port, 3001);
        assert_eq!(config.sheets_timeout_secs, 5);
        assert_eq!(config.source, SourceKind::Sqlite);
        assert!(config.sheets_api_key.is_none());
        assert_eq!(config.seed_path.as_deref(), Some("seed.json"));
        assert_eq!(config.masked_spreadsheet_id(), "1AbCdEfGhI...");
    }

    #[test]
    fn test_unknown_source_is_rejected() {
        assert!(config_from(&[("LEADERBOARD_SOURCE", "excel")]).is_err());
    }
}
