//! Google Sheets v4 `values.get` client.

use super::{SourceError, TableSource};
use crate::config::Config;
use crate::models::leaderboard::Table;
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Columns A..R hold the name, team and every metric column for both layouts.
const DATA_COLUMNS: &str = "A:R";

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

enum Credential {
    ApiKey(String),
    Bearer(String),
    Anonymous,
}

pub struct SheetsSource {
    client: HttpClient,
    base_url: String,
    credential: Credential,
}

impl SheetsSource {
    pub fn new(config: &Config) -> Result<Self, SourceError> {
        let client = HttpClient::builder()
            .timeout(Duration::from_secs(config.sheets_timeout_secs))
            .build()?;
        let credential = match (&config.sheets_access_token, &config.sheets_api_key) {
            (Some(token), _) => Credential::Bearer(token.clone()),
            (None, Some(key)) => Credential::ApiKey(key.clone()),
            (None, None) => {
                warn!("no Google Sheets credential configured; only public sheets will load");
                Credential::Anonymous
            }
        };
        Ok(SheetsSource {
            client,
            base_url: config.sheets_base_url.trim_end_matches('/').to_string(),
            credential,
        })
    }

    fn values_url(&self, spreadsheet_id: &str, range: &str) -> Result<Url, SourceError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| SourceError::Payload(format!("invalid Sheets base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| SourceError::Payload("Sheets base URL cannot carry a path".into()))?
            .extend(["spreadsheets", spreadsheet_id, "values", range]);
        if let Credential::ApiKey(key) = &self.credential {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }

    fn get_range(&self, spreadsheet_id: &str, range: &str) -> Result<Table, SourceError> {
        let url = self.values_url(spreadsheet_id, range)?;
        debug!(range, "fetching sheet range");

        let mut request = self.client.get(url);
        if let Credential::Bearer(token) = &self.credential {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| SourceError::Payload("access token is not a valid header value".into()))?;
            request = request.header(AUTHORIZATION, value);
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .map(|body| body.error.message)
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(SourceError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: ValueRange = response.json()?;
        Ok(body.values.into_iter().map(|row| row.into_iter().map(cell_text).collect()).collect())
    }
}

/// Formatted values arrive as strings; anything else is rendered as text.
fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl TableSource for SheetsSource {
    fn fetch_table(&self, spreadsheet_id: &str, sheet_name: &str) -> Result<Table, SourceError> {
        self.get_range(spreadsheet_id, &format!("{}!{}", sheet_name, DATA_COLUMNS))
    }

    fn fetch_header(&self, spreadsheet_id: &str, sheet_name: &str) -> Result<Vec<String>, SourceError> {
        let rows = self.get_range(spreadsheet_id, &format!("{}!1:1", sheet_name))?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(api_key: Option<&str>) -> SheetsSource {
        let config = Config {
            sheets_api_key: api_key.map(String::from),
            ..Config::default()
        };
        SheetsSource::new(&config).unwrap()
    }

    #[test]
    fn test_values_url_encodes_range() {
        let url = source(Some("k3y")).values_url("abc123", "Reps!A:R").unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123/values/Reps!A:R?key=k3y"
        );
        let url = source(None).values_url("abc123", "Sales Reps!1:1").unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123/values/Sales%20Reps!1:1"
        );
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(serde_json::json!("Alice")), "Alice");
        assert_eq!(cell_text(serde_json::json!(12)), "12");
        assert_eq!(cell_text(serde_json::json!(2.5)), "2.5");
        assert_eq!(cell_text(serde_json::Value::Null), "");
    }

    #[test]
    fn test_value_range_without_values_is_empty() {
        let body: ValueRange = serde_json::from_str(r#"{"range":"Reps!A1:R1","majorDimension":"ROWS"}"#).unwrap();
        assert!(body.values.is_empty());
    }
}
