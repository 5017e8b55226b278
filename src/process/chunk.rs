use anyhow::{bail, Context, Result};
use csv::{Reader, ReaderBuilder, StringRecord};
use std::{fs::File, io::Read, path::Path};

/// Streams a semicolon-delimited export in fixed-size chunks of records.
///
/// Records shorter than the header are padded with empty fields; longer ones
/// are rejected, since their values cannot be assigned to a column.
pub struct ChunkReader<R: Read> {
    reader: Reader<R>,
    headers: StringRecord,
    chunk_rows: usize,
    record: StringRecord,
    finished: bool,
}

impl ChunkReader<File> {
    pub fn open(path: &Path, chunk_rows: usize) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("opening CSV input {}", path.display()))?;
        Self::new(file, chunk_rows)
    }
}

impl<R: Read> ChunkReader<R> {
    pub fn new(input: R, chunk_rows: usize) -> Result<Self> {
        if chunk_rows == 0 {
            bail!("chunk size must be at least one row");
        }
        let mut reader = ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .flexible(true)
            .from_reader(input);
        let headers = reader.headers().context("reading CSV header")?.clone();
        if headers.is_empty() {
            bail!("no columns to parse from file");
        }

        Ok(Self {
            reader,
            headers,
            chunk_rows,
            record: StringRecord::new(),
            finished: false,
        })
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    /// Read up to `chunk_rows` records. Returns None once the input is exhausted.
    pub fn next_chunk(&mut self) -> Result<Option<Vec<StringRecord>>> {
        if self.finished {
            return Ok(None);
        }

        let width = self.headers.len();
        let mut chunk = Vec::with_capacity(self.chunk_rows.min(4096));
        while chunk.len() < self.chunk_rows {
            let more = self
                .reader
                .read_record(&mut self.record)
                .context("CSV parse error")?;
            if !more {
                self.finished = true;
                break;
            }

            let found = self.record.len();
            if found > width {
                let line = self.record.position().map(|p| p.line()).unwrap_or(0);
                bail!(
                    "error tokenizing data: expected {} fields in line {}, saw {}",
                    width,
                    line,
                    found
                );
            }

            let mut record = self.record.clone();
            for _ in found..width {
                record.push_field("");
            }
            chunk.push(record);
        }

        if chunk.is_empty() {
            Ok(None)
        } else {
            Ok(Some(chunk))
        }
    }
}
