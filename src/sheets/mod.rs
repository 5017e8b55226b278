//! Spreadsheet collaborator: the operations the uploader needs from a sheet
//! backend, plus A1 range helpers shared by every implementation.

use anyhow::Result;
use async_trait::async_trait;

use crate::process::convert::Row;

pub mod auth;
pub mod client;
pub mod memory;

pub use client::SheetsClient;
pub use memory::MemorySheets;

/// Destination for sheet writes, addressed by sheet title and A1 ranges.
#[async_trait]
pub trait SheetSink: Send + Sync {
    /// Create the sheet `title` unless it already exists.
    async fn ensure_sheet(&self, title: &str) -> Result<()>;

    /// Clear the values in `range`, keeping formatting.
    async fn clear_range(&self, range: &str) -> Result<()>;

    /// Overwrite `range` with `values`, starting at its top-left cell.
    async fn update_values(&self, range: &str, values: &[Row]) -> Result<()>;

    /// Append `rows` after the last non-empty row of `sheet`.
    async fn append_rows(&self, sheet: &str, rows: &[Row]) -> Result<()>;
}

/// Quote a sheet title for use in an A1 reference when it needs it.
pub fn quote_sheet(title: &str) -> String {
    let plain = !title.is_empty()
        && title.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        title.to_string()
    } else {
        format!("'{}'", title.replace('\'', "''"))
    }
}

/// `Sheet!A1:V1` style reference.
pub fn a1(title: &str, cells: &str) -> String {
    format!("{}!{}", quote_sheet(title), cells)
}
