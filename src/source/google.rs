//! Google Sheets API v4 reader.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::auth::CredentialProvider;
use super::{RawRows, SheetSource};
use crate::error::{Result, SheetError};

/// Sheets API base URL.
const SHEETS_API_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// `values:batchGet` response; only the first value range is used.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchGetResponse {
    #[serde(default)]
    value_ranges: Vec<ValueRange>,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    range: Option<String>,
    /// Absent when the range holds no data at all.
    #[serde(default)]
    values: Vec<Vec<JsonValue>>,
}

/// Reads one spreadsheet through the Sheets REST API with a bearer token.
pub struct GoogleSheetsSource {
    spreadsheet_id: String,
    credentials: Box<dyn CredentialProvider>,
    agent: ureq::Agent,
    base_url: String,
}

impl GoogleSheetsSource {
    pub fn new(
        spreadsheet_id: impl Into<String>,
        credentials: Box<dyn CredentialProvider>,
        timeout: Duration,
    ) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            credentials,
            agent,
            base_url: SHEETS_API_URL.to_string(),
        }
    }

    /// Point at a different API root (e.g. a local emulator).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn batch_get_url(&self) -> String {
        format!("{}/{}/values:batchGet", self.base_url, self.spreadsheet_id)
    }
}

impl SheetSource for GoogleSheetsSource {
    fn fetch(&self, range: &str) -> Result<RawRows> {
        let token = self.credentials.access_token()?;
        log::debug!("fetching {range} from spreadsheet {}", self.spreadsheet_id);

        let response = self
            .agent
            .get(&self.batch_get_url())
            .set("Authorization", &format!("Bearer {token}"))
            .set("Accept", "application/json")
            .query("ranges", range)
            .query("majorDimension", "ROWS")
            .call()
            .map_err(|e| {
                let message = match e {
                    ureq::Error::Status(code, resp) => {
                        let body = resp.into_string().unwrap_or_default();
                        format!("Sheets API returned {code}: {}", api_error_message(&body))
                    }
                    other => format!("Sheets API request failed: {other}"),
                };
                log::warn!("{message}");
                SheetError::SourceUnavailable(message)
            })?;

        let body: BatchGetResponse = response.into_json().map_err(|e| {
            SheetError::SourceUnavailable(format!("malformed Sheets API response: {e}"))
        })?;
        let rows = rows_from_response(body);
        log::info!("fetched {} rows (including header) for {range}", rows.len());
        Ok(rows)
    }

    fn describe(&self) -> String {
        format!("Google Sheets {}", self.spreadsheet_id)
    }
}

fn rows_from_response(body: BatchGetResponse) -> RawRows {
    let Some(value_range) = body.value_ranges.into_iter().next() else {
        return Vec::new();
    };
    if let Some(resolved) = &value_range.range {
        log::debug!("resolved range {resolved}");
    }
    value_range
        .values
        .into_iter()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect()
}

/// Formatted values arrive as strings; anything else is rendered as text.
fn cell_to_string(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

/// Pull `error.message` out of an API error body, falling back to the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<JsonValue>(body)
        .ok()
        .and_then(|v| v.pointer("/error/message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
