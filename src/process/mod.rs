//! Streaming filter-and-transform pipeline: export CSV in, sheet rows out.

use anyhow::Result;
use std::{io::Read, path::Path};
use tracing::{debug, info, warn};

use crate::schema::{BATCH_ROWS, CHUNK_ROWS, SHEET_NAME};
use crate::sheets::SheetSink;

pub mod batch;
pub mod chunk;
pub mod convert;
pub mod filter;
pub mod utils;

use batch::BatchBuffer;
use chunk::ChunkReader;
use convert::convert_record;
use filter::RowFilter;

#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub chunk_rows: usize,
    pub batch_rows: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            chunk_rows: CHUNK_ROWS,
            batch_rows: BATCH_ROWS,
        }
    }
}

/// Counters from one pass over the export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub rows_read: u64,
    pub rows_kept: u64,
    pub chunks: usize,
    pub batches: usize,
    pub rows_uploaded: u64,
}

/// How a failed pass is reported.
#[derive(Debug, PartialEq, Eq)]
pub enum PipelineFailure {
    InputNotFound,
    Processing(String),
}

/// An `io::ErrorKind::NotFound` anywhere in the chain means the input is missing.
pub fn classify_failure(err: &anyhow::Error) -> PipelineFailure {
    let not_found = err.chain().any(|cause| {
        cause
            .downcast_ref::<std::io::Error>()
            .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
    });
    if not_found {
        PipelineFailure::InputNotFound
    } else {
        PipelineFailure::Processing(format!("{:#}", err))
    }
}

/// Stream the export at `path` into the destination sheet.
#[tracing::instrument(level = "info", skip(path, sink), fields(path = %path.display()))]
pub async fn process_csv_and_upload<S: SheetSink + ?Sized>(
    path: &Path,
    sink: &S,
    opts: PipelineOptions,
) -> Result<PipelineReport> {
    info!("starting to process CSV");
    let reader = ChunkReader::open(path, opts.chunk_rows)?;
    run(reader, sink, opts).await
}

/// Same as [`process_csv_and_upload`] over any reader.
pub async fn process_reader<R: Read, S: SheetSink + ?Sized>(
    input: R,
    sink: &S,
    opts: PipelineOptions,
) -> Result<PipelineReport> {
    let reader = ChunkReader::new(input, opts.chunk_rows)?;
    run(reader, sink, opts).await
}

async fn run<R: Read, S: SheetSink + ?Sized>(
    mut reader: ChunkReader<R>,
    sink: &S,
    opts: PipelineOptions,
) -> Result<PipelineReport> {
    let filter = RowFilter::from_headers(reader.headers());
    if !filter.has_all_columns() {
        warn!(headers = ?reader.headers(), "export lacks one or more filter columns");
    }

    let mut buffer = BatchBuffer::new(SHEET_NAME, opts.batch_rows);
    let mut report = PipelineReport::default();

    while let Some(chunk) = reader.next_chunk()? {
        report.chunks += 1;
        report.rows_read += chunk.len() as u64;

        let kept: Vec<_> = chunk
            .iter()
            .filter(|r| filter.keep(r))
            .map(|r| convert_record(r.iter()))
            .collect();
        debug!(chunk = report.chunks, read = chunk.len(), kept = kept.len(), "chunk filtered");
        if kept.is_empty() {
            continue;
        }

        report.rows_kept += kept.len() as u64;
        buffer.extend(kept);
        buffer.flush_if_full(sink).await?;
    }

    buffer.finish(sink).await?;

    report.batches = buffer.batches();
    report.rows_uploaded = buffer.uploaded();
    info!(
        rows_read = report.rows_read,
        rows_uploaded = report.rows_uploaded,
        batches = report.batches,
        "A..V cleared and rewritten with filtered data"
    );
    Ok(report)
}
