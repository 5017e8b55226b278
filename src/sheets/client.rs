//! Google Sheets v4 REST client.
//!
//! Only the four calls the uploader needs are implemented. Requests are sent
//! once; a non-2xx response turns into an error carrying the API's message.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};
use url::Url;

use crate::process::convert::Row;
use crate::sheets::auth::AccessTokenProvider;
use crate::sheets::{quote_sheet, SheetSink};

pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

// ─── wire types ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct WireSpreadsheet {
    #[serde(default)]
    sheets: Vec<WireSheet>,
}

#[derive(Debug, Deserialize)]
struct WireSheet {
    properties: WireSheetProperties,
}

#[derive(Debug, Deserialize)]
struct WireSheetProperties {
    title: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireValueRange<'a> {
    range: &'a str,
    major_dimension: &'static str,
    values: &'a [Row],
}

#[derive(Debug, Deserialize)]
struct WireErrorBody {
    error: WireError,
}

#[derive(Debug, Deserialize)]
struct WireError {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

// ─── client ──────────────────────────────────────────────────────────

/// Sheets API client bound to one spreadsheet.
pub struct SheetsClient<T: AccessTokenProvider> {
    http: Client,
    base: Url,
    spreadsheet_id: String,
    tokens: T,
}

impl<T: AccessTokenProvider> SheetsClient<T> {
    pub fn new(spreadsheet_id: impl Into<String>, tokens: T) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, spreadsheet_id, tokens)
    }

    pub fn with_base_url(
        base: &str,
        spreadsheet_id: impl Into<String>,
        tokens: T,
    ) -> Result<Self> {
        let base = Url::parse(base).with_context(|| format!("invalid Sheets base URL {}", base))?;
        if base.cannot_be_a_base() {
            bail!("Sheets base URL {} cannot carry a path", base);
        }
        Ok(Self {
            http: Client::new(),
            base,
            spreadsheet_id: spreadsheet_id.into(),
            tokens,
        })
    }

    /// Use a preconfigured HTTP client (timeouts, proxy settings).
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    /// `{base}/{spreadsheet_id}` followed by `segments`, each percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| anyhow!("Sheets base URL cannot carry a path"))?;
            path.pop_if_empty();
            path.push(&self.spreadsheet_id);
            for s in segments {
                path.push(s);
            }
        }
        Ok(url)
    }

    fn spreadsheet_url(&self, suffix: &str) -> Result<Url> {
        let mut url = self.url(&[])?;
        if !suffix.is_empty() {
            let path = format!("{}{}", url.path(), suffix);
            url.set_path(&path);
        }
        Ok(url)
    }

    fn values_url(&self, range: &str, action: &str) -> Result<Url> {
        let segment = format!("{}{}", range, action);
        self.url(&["values", segment.as_str()])
    }

    async fn send(&self, what: &str, req: RequestBuilder) -> Result<Response> {
        let token = self.tokens.access_token().await?;
        let resp = req
            .bearer_auth(token)
            .send()
            .await
            .with_context(|| format!("sending {} request", what))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(api_error(what, status.as_u16(), &body))
    }

    async fn sheet_titles(&self) -> Result<Vec<String>> {
        let url = self.spreadsheet_url("")?;
        let req = self
            .http
            .get(url)
            .query(&[("fields", "sheets.properties.title")]);
        let doc: WireSpreadsheet = self
            .send("get spreadsheet", req)
            .await?
            .json()
            .await
            .context("decoding spreadsheet metadata")?;
        Ok(doc.sheets.into_iter().map(|s| s.properties.title).collect())
    }
}

fn api_error(what: &str, status: u16, body: &str) -> anyhow::Error {
    match serde_json::from_str::<WireErrorBody>(body) {
        Ok(WireErrorBody { error }) => anyhow!(
            "{} failed: HTTP {} {}: {}",
            what,
            status,
            error.status.unwrap_or_default(),
            error.message
        ),
        Err(_) => anyhow!("{} failed: HTTP {}: {}", what, status, body.trim()),
    }
}

#[async_trait]
impl<T: AccessTokenProvider> SheetSink for SheetsClient<T> {
    async fn ensure_sheet(&self, title: &str) -> Result<()> {
        let titles = self.sheet_titles().await?;
        if titles.iter().any(|t| t == title) {
            debug!(title, "sheet exists");
            return Ok(());
        }

        let url = self.spreadsheet_url(":batchUpdate")?;
        let body = json!({
            "requests": [{ "addSheet": { "properties": { "title": title } } }]
        });
        self.send("add sheet", self.http.post(url).json(&body)).await?;
        info!(title, "created sheet");
        Ok(())
    }

    async fn clear_range(&self, range: &str) -> Result<()> {
        let url = self.values_url(range, ":clear")?;
        self.send("clear range", self.http.post(url).json(&json!({}))).await?;
        debug!(range, "cleared");
        Ok(())
    }

    async fn update_values(&self, range: &str, values: &[Row]) -> Result<()> {
        let url = self.values_url(range, "")?;
        let body = WireValueRange {
            range,
            major_dimension: "ROWS",
            values,
        };
        let req = self
            .http
            .put(url)
            .query(&[("valueInputOption", "RAW")])
            .json(&body);
        self.send("update values", req).await?;
        debug!(range, rows = values.len(), "updated");
        Ok(())
    }

    async fn append_rows(&self, sheet: &str, rows: &[Row]) -> Result<()> {
        let range = quote_sheet(sheet);
        let url = self.values_url(&range, ":append")?;
        let body = WireValueRange {
            range: &range,
            major_dimension: "ROWS",
            values: rows,
        };
        let req = self
            .http
            .post(url)
            .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
            .json(&body);
        self.send("append rows", req).await?;
        debug!(sheet, rows = rows.len(), "appended");
        Ok(())
    }
}
