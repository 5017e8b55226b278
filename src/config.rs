use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

use crate::process::PipelineOptions;
use crate::schema::{BATCH_ROWS, CHUNK_ROWS};

/// Command-line args; the three required settings fall back to the environment.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Filter the inventory export and publish it to Google Sheets"
)]
pub struct Args {
    /// Service account JSON key
    #[arg(long, env = "SERVICE_ACCOUNT_FILE")]
    pub service_account_file: Option<PathBuf>,

    /// Target spreadsheet ID
    #[arg(long, env = "SPREADSHEET_ID")]
    pub spreadsheet_id: Option<String>,

    /// Semicolon-delimited inventory export
    #[arg(long, env = "CSV_INPUT_PATH")]
    pub csv_input_path: Option<PathBuf>,

    /// Rows read per chunk
    #[arg(long, default_value_t = CHUNK_ROWS)]
    pub chunk_rows: usize,

    /// Rows per append call
    #[arg(long, default_value_t = BATCH_ROWS)]
    pub batch_rows: usize,

    /// Run against an in-memory sheet instead of the remote spreadsheet
    #[arg(long)]
    pub dry_run: bool,
}

/// Validated settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub service_account_file: PathBuf,
    pub spreadsheet_id: String,
    pub csv_input_path: PathBuf,
    pub pipeline: PipelineOptions,
    pub dry_run: bool,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "Error: Missing one or more required environment variables.\n\
         Please create a .env file (from .env.example) and fill in:\n\
         {}",
        .0.join(", ")
    )]
    Missing(Vec<&'static str>),

    #[error("Error: {0}")]
    Invalid(String),
}

fn non_empty<T: AsRef<std::ffi::OsStr>>(v: Option<T>) -> Option<T> {
    v.filter(|s| !s.as_ref().is_empty())
}

impl Settings {
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let service_account_file = non_empty(args.service_account_file);
        let spreadsheet_id = non_empty(args.spreadsheet_id);
        let csv_input_path = non_empty(args.csv_input_path);

        let mut missing = Vec::new();
        if service_account_file.is_none() {
            missing.push("SERVICE_ACCOUNT_FILE");
        }
        if spreadsheet_id.is_none() {
            missing.push("SPREADSHEET_ID");
        }
        if csv_input_path.is_none() {
            missing.push("CSV_INPUT_PATH");
        }

        match (service_account_file, spreadsheet_id, csv_input_path) {
            (Some(service_account_file), Some(spreadsheet_id), Some(csv_input_path)) => {
                if args.chunk_rows == 0 {
                    return Err(ConfigError::Invalid("--chunk-rows must be positive".into()));
                }
                if args.batch_rows == 0 {
                    return Err(ConfigError::Invalid("--batch-rows must be positive".into()));
                }
                Ok(Self {
                    service_account_file,
                    spreadsheet_id,
                    csv_input_path,
                    pipeline: PipelineOptions {
                        chunk_rows: args.chunk_rows,
                        batch_rows: args.batch_rows,
                    },
                    dry_run: args.dry_run,
                })
            }
            _ => Err(ConfigError::Missing(missing)),
        }
    }
}
