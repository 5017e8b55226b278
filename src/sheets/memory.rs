use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Mutex, MutexGuard},
};
use tracing::{debug, info};

use crate::process::convert::Row;
use crate::sheets::SheetSink;

/// One recorded backend call. Appends keep only their size.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetCall {
    EnsureSheet(String),
    Clear(String),
    Update { range: String, values: Vec<Row> },
    Append { sheet: String, rows: usize },
}

#[derive(Default)]
struct State {
    sheets: BTreeSet<String>,
    calls: Vec<SheetCall>,
    keep_rows: bool,
    appended: BTreeMap<String, Vec<Row>>,
    append_error: Option<String>,
}

/// In-memory sheet backend used for dry runs and tests.
///
/// `new()` records call sizes only, so a dry run over a full export holds no
/// more than the pipeline's own buffer. `recording()` also keeps every
/// appended row.
#[derive(Default)]
pub struct MemorySheets {
    state: Mutex<State>,
}

impl MemorySheets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recording() -> Self {
        let sheets = Self::default();
        sheets.lock().keep_rows = true;
        sheets
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make every following append fail with `message`.
    pub fn fail_appends(&self, message: &str) {
        self.lock().append_error = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<SheetCall> {
        self.lock().calls.clone()
    }

    pub fn sheet_titles(&self) -> Vec<String> {
        self.lock().sheets.iter().cloned().collect()
    }

    /// Row counts of each append to `sheet`, in call order.
    pub fn append_sizes(&self, sheet: &str) -> Vec<usize> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                SheetCall::Append { sheet: s, rows } if s == sheet => Some(*rows),
                _ => None,
            })
            .collect()
    }

    /// Every row appended to `sheet`. Empty unless built with `recording()`.
    pub fn appended_rows(&self, sheet: &str) -> Vec<Row> {
        self.lock().appended.get(sheet).cloned().unwrap_or_default()
    }

    /// Values of the most recent update to `range`.
    pub fn last_update(&self, range: &str) -> Option<Vec<Row>> {
        self.lock().calls.iter().rev().find_map(|c| match c {
            SheetCall::Update { range: r, values } if r == range => Some(values.clone()),
            _ => None,
        })
    }
}

#[async_trait]
impl SheetSink for MemorySheets {
    async fn ensure_sheet(&self, title: &str) -> Result<()> {
        let mut state = self.lock();
        if state.sheets.insert(title.to_string()) {
            debug!(title, "created sheet");
        }
        state.calls.push(SheetCall::EnsureSheet(title.to_string()));
        Ok(())
    }

    async fn clear_range(&self, range: &str) -> Result<()> {
        self.lock().calls.push(SheetCall::Clear(range.to_string()));
        Ok(())
    }

    async fn update_values(&self, range: &str, values: &[Row]) -> Result<()> {
        self.lock().calls.push(SheetCall::Update {
            range: range.to_string(),
            values: values.to_vec(),
        });
        Ok(())
    }

    async fn append_rows(&self, sheet: &str, rows: &[Row]) -> Result<()> {
        let mut state = self.lock();
        if let Some(msg) = &state.append_error {
            return Err(anyhow!("{}", msg));
        }
        info!(sheet, rows = rows.len(), "dry run: would append rows");
        state.calls.push(SheetCall::Append {
            sheet: sheet.to_string(),
            rows: rows.len(),
        });
        if state.keep_rows {
            state
                .appended
                .entry(sheet.to_string())
                .or_default()
                .extend_from_slice(rows);
        }
        Ok(())
    }
}
