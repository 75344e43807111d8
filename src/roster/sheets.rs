//! Google Sheets roster source (reqwest-based).

use super::extract::{extract_roster, RosterMode};
use super::{RosterSource, SourceError};
use crate::profile::Roster;
use crate::utils::USER_AGENT;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";

/// Settings needed to read the roster range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetsConfig {
    pub api_key: String,
    pub spreadsheet_id: String,
    /// A1 notation or named range, e.g. `Form Responses 1!A:C`
    pub range: String,
    pub mode: RosterMode,
}

/// `spreadsheets.values.get` response (subset)
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Reads the roster from a spreadsheet range with an API key.
#[derive(Debug, Clone)]
pub struct SheetsRosterSource {
    base_url: Url,
    config: SheetsConfig,
    http_client: Client,
}

impl SheetsRosterSource {
    pub fn new(config: SheetsConfig, timeout: Duration) -> Result<Self, SourceError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Self::with_http_client(SHEETS_BASE_URL, config, http_client)
    }

    /// Create a source against an arbitrary base URL (for testing).
    pub fn with_http_client(
        base_url: &str,
        config: SheetsConfig,
        http_client: Client,
    ) -> Result<Self, SourceError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| SourceError::InvalidConfig(format!("bad base URL {base_url}: {e}")))?;
        Ok(Self {
            base_url,
            config,
            http_client,
        })
    }

    fn values_url(&self) -> Result<Url, SourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::InvalidConfig("base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.config.spreadsheet_id.as_str(),
                "values",
                self.config.range.as_str(),
            ]);
        url.query_pairs_mut().append_pair("key", &self.config.api_key);
        Ok(url)
    }

    /// Fetch the raw rows of the configured range
    pub async fn fetch_rows(&self) -> Result<Vec<Vec<String>>, SourceError> {
        let url = self.values_url()?;
        debug!(
            spreadsheet_id = %self.config.spreadsheet_id,
            range = %self.config.range,
            "Fetching roster rows"
        );

        let response = self.http_client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: ValueRange = response.json().await?;
        Ok(body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }
}

fn cell_to_string(cell: serde_json::Value) -> String {
    match cell {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl RosterSource for SheetsRosterSource {
    async fn fetch(&self) -> Result<Roster, SourceError> {
        let rows = self.fetch_rows().await?;
        let roster = extract_roster(&rows, self.config.mode);
        debug!(rows = rows.len(), profiles = roster.len(), "Roster extracted");
        Ok(roster)
    }
}
