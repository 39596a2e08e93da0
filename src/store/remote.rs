//! Google Sheets backed termbase store.
//!
//! Reads use `GET /v4/spreadsheets/{id}/values/{range}`; appends use
//! `POST /v4/spreadsheets/{id}/values/{range}:append`, which adds a single row
//! server-side without rewriting the document. Requests carry an OAuth bearer
//! access token.

use std::fs;
use std::path::Path;

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use super::TermStore;
use super::rows::{RawRow, records_from_rows};
use crate::error::{BackendError, LoadError, PersistError};
use crate::models::TermRecord;
use crate::utils::{ACCESS_TOKEN_ENV, expand_tilde, read_env_token};

/// Sheets API v4 spreadsheets endpoint.
pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

const USER_AGENT: &str = concat!("termbase/", env!("CARGO_PKG_VERSION"));

/// Columns holding source term, target term, and notes.
const TERM_COLUMNS: &str = "A:C";

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

/// Resolve an access token for the Sheets API.
///
/// Checks in order:
/// 1. The configured token file
/// 2. `TERMBASE_ACCESS_TOKEN` environment variable
pub fn resolve_token(token_file: Option<&Path>) -> Option<String> {
    if let Some(path) = token_file {
        match fs::read_to_string(expand_tilde(path)) {
            Ok(token) => {
                let token = token.trim().to_string();
                if !token.is_empty() {
                    return Some(token);
                }
            }
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to read token file"),
        }
    }

    read_env_token(ACCESS_TOKEN_ENV)
}

/// Termbase stored in a Google Sheets spreadsheet.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: Client,
    base_url: String,
    spreadsheet_id: String,
    worksheet: Option<String>,
    token: Option<String>,
}

impl RemoteStore {
    pub fn new(
        spreadsheet_id: impl Into<String>,
        worksheet: Option<String>,
        token: Option<String>,
    ) -> Result<Self, BackendError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            base_url: SHEETS_API_BASE.to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            worksheet: worksheet.filter(|w| !w.trim().is_empty()),
            token,
        })
    }

    /// Point the store at a different API root (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// Browser URL of the spreadsheet.
    pub fn web_url(&self) -> String {
        format!("https://docs.google.com/spreadsheets/d/{}/edit", self.spreadsheet_id)
    }

    /// A1 range covering the term columns, e.g. `'My Terms'!A:C`.
    pub fn range(&self) -> String {
        match &self.worksheet {
            Some(name) => format!("'{}'!{}", name.replace('\'', "''"), TERM_COLUMNS),
            None => TERM_COLUMNS.to_string(),
        }
    }

    /// URL of the values endpoint, with `suffix` appended to the range segment.
    fn values_url(&self, suffix: &str) -> Result<reqwest::Url, BackendError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| BackendError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidUrl(self.base_url.clone()))?
            .push(&self.spreadsheet_id)
            .push("values")
            .push(&format!("{}{}", self.range(), suffix));
        Ok(url)
    }

    fn token(&self) -> Result<&str, BackendError> {
        self.token.as_deref().ok_or_else(|| {
            BackendError::Auth(format!(
                "no access token configured; set {} or `token_file` in the config",
                ACCESS_TOKEN_ENV
            ))
        })
    }

    fn fetch_rows(&self) -> Result<Vec<RawRow>, BackendError> {
        let url = self.values_url("")?;
        debug!(%url, "Fetching termbase rows");

        let response = self
            .client
            .get(url)
            .bearer_auth(self.token()?)
            .query(&[("majorDimension", "ROWS")])
            .send()?;
        let response = check_status(response)?;

        let body: ValueRange = response.json()?;
        Ok(rows_from_values(body.values))
    }

    fn append_row(&self, record: &TermRecord) -> Result<(), BackendError> {
        let url = self.values_url(":append")?;
        let body = json!({ "majorDimension": "ROWS", "values": [record.to_row()] });

        let response = self
            .client
            .post(url)
            .bearer_auth(self.token()?)
            .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
            .json(&body)
            .send()?;
        check_status(response)?;
        Ok(())
    }
}

impl TermStore for RemoteStore {
    fn load(&self) -> Result<Vec<TermRecord>, LoadError> {
        let rows = self.fetch_rows().map_err(|e| LoadError::new(self.describe(), e))?;
        let records = records_from_rows(rows, &self.describe());
        info!(sheet = %self.spreadsheet_id, records = records.len(), "Loaded termbase sheet");
        Ok(records)
    }

    fn append(&mut self, record: &TermRecord) -> Result<(), PersistError> {
        self.append_row(record)
            .map_err(|e| PersistError::new(self.describe(), record.clone(), e))?;
        debug!(sheet = %self.spreadsheet_id, %record, "Appended termbase row");
        Ok(())
    }

    fn describe(&self) -> String {
        match &self.worksheet {
            Some(name) => format!("Google Sheet {} ({})", self.spreadsheet_id, name),
            None => format!("Google Sheet {}", self.spreadsheet_id),
        }
    }

    fn location(&self) -> String {
        self.web_url()
    }
}

/// Map a non-success response to an error, using the API's message when present.
fn check_status(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    Err(api_error(status, &body))
}

fn api_error(status: StatusCode, body: &str) -> BackendError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Auth(message),
        _ => BackendError::Api { status: status.as_u16(), message },
    }
}

/// Convert the API's value grid into raw rows. The service omits trailing empty
/// cells, which therefore come out as missing.
fn rows_from_values(values: Vec<Vec<Value>>) -> Vec<RawRow> {
    values
        .into_iter()
        .map(|row| {
            Ok(row
                .into_iter()
                .map(|value| match value {
                    Value::Null => None,
                    Value::String(s) if s.is_empty() => None,
                    Value::String(s) => Some(s),
                    other => Some(other.to_string()),
                })
                .collect())
        })
        .collect()
}
