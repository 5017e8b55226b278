use anyhow::{Context, Result};
use tracing::info;

use crate::process::convert::Row;
use crate::sheets::SheetSink;

/// Accumulates converted rows and appends them to the destination sheet
/// once `threshold` rows are buffered.
pub struct BatchBuffer {
    sheet: String,
    threshold: usize,
    rows: Vec<Row>,
    batches: usize,
    uploaded: u64,
}

impl BatchBuffer {
    pub fn new(sheet: impl Into<String>, threshold: usize) -> Self {
        Self {
            sheet: sheet.into(),
            threshold,
            rows: Vec::new(),
            batches: 0,
            uploaded: 0,
        }
    }

    pub fn extend(&mut self, rows: impl IntoIterator<Item = Row>) {
        self.rows.extend(rows);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.rows.len() >= self.threshold
    }

    /// Flush if the threshold has been reached.
    pub async fn flush_if_full<S: SheetSink + ?Sized>(&mut self, sink: &S) -> Result<bool> {
        if !self.is_full() {
            return Ok(false);
        }
        info!(rows = self.rows.len(), "uploading batch");
        self.flush(sink).await?;
        Ok(true)
    }

    /// Flush whatever is left.
    pub async fn finish<S: SheetSink + ?Sized>(&mut self, sink: &S) -> Result<()> {
        if self.rows.is_empty() {
            return Ok(());
        }
        info!(rows = self.rows.len(), "uploading final batch");
        self.flush(sink).await
    }

    async fn flush<S: SheetSink + ?Sized>(&mut self, sink: &S) -> Result<()> {
        let n = self.rows.len();
        sink.append_rows(&self.sheet, &self.rows)
            .await
            .with_context(|| format!("appending {} rows to {}", n, self.sheet))?;
        self.uploaded += n as u64;
        self.batches += 1;
        self.rows.clear();
        Ok(())
    }

    pub fn batches(&self) -> usize {
        self.batches
    }

    pub fn uploaded(&self) -> u64 {
        self.uploaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::convert::Cell;
    use crate::sheets::memory::MemorySheets;

    fn rows(n: usize) -> Vec<Row> {
        (0..n).map(|i| vec![Cell::Int(i as i64)]).collect()
    }

    #[tokio::test]
    async fn flushes_only_at_threshold() -> Result<()> {
        let sink = MemorySheets::new();
        let mut buf = BatchBuffer::new("data", 3);

        buf.extend(rows(2));
        assert!(!buf.flush_if_full(&sink).await?);
        assert_eq!(sink.append_sizes("data"), Vec::<usize>::new());

        buf.extend(rows(2));
        assert!(buf.flush_if_full(&sink).await?);
        assert!(buf.is_empty());
        assert_eq!(sink.append_sizes("data"), vec![4]);
        Ok(())
    }

    #[tokio::test]
    async fn flushes_when_length_equals_threshold() -> Result<()> {
        let sink = MemorySheets::new();
        let mut buf = BatchBuffer::new("data", 2);

        buf.extend(rows(1));
        assert!(!buf.flush_if_full(&sink).await?);
        buf.extend(rows(1));
        assert!(buf.flush_if_full(&sink).await?);
        buf.extend(rows(2));
        assert!(buf.flush_if_full(&sink).await?);
        buf.finish(&sink).await?;

        assert_eq!(sink.append_sizes("data"), vec![2, 2]);
        assert_eq!(buf.uploaded(), 4);
        Ok(())
    }

    #[tokio::test]
    async fn finish_flushes_remainder_once() -> Result<()> {
        let sink = MemorySheets::new();
        let mut buf = BatchBuffer::new("data", 10);
        buf.extend(rows(4));
        buf.finish(&sink).await?;
        buf.finish(&sink).await?;

        assert_eq!(sink.append_sizes("data"), vec![4]);
        assert_eq!(buf.uploaded(), 4);
        assert_eq!(buf.batches(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn failed_append_keeps_rows_unuploaded() {
        let sink = MemorySheets::new();
        sink.fail_appends("quota exceeded");
        let mut buf = BatchBuffer::new("data", 1);
        buf.extend(rows(1));

        let err = buf.flush_if_full(&sink).await.unwrap_err();
        assert!(format!("{:#}", err).contains("quota exceeded"));
        assert_eq!(buf.uploaded(), 0);
    }
}
