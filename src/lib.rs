pub mod config;
pub mod prepare;
pub mod process;
pub mod schema;
pub mod sheets;
pub mod timestamp;

use anyhow::Result;
use tracing::{error, info};

use config::Settings;
use process::{classify_failure, PipelineFailure, PipelineReport};
use sheets::SheetSink;

/// One full update: reset the destination, stream the export, stamp the run.
///
/// Sheet preparation and the timestamp write propagate their errors. A failed
/// pass over the export is logged and reported as `None`.
pub async fn run_update<S: SheetSink + ?Sized>(
    sink: &S,
    settings: &Settings,
) -> Result<Option<PipelineReport>> {
    prepare::prepare_main_sheet(sink).await?;

    let path = &settings.csv_input_path;
    let report = match process::process_csv_and_upload(path, sink, settings.pipeline).await {
        Ok(report) => {
            info!(total_rows = report.rows_uploaded, "total rows uploaded");
            Some(report)
        }
        Err(err) => {
            match classify_failure(&err) {
                PipelineFailure::InputNotFound => {
                    error!(path = %path.display(), "the CSV file was not found; check CSV_INPUT_PATH")
                }
                PipelineFailure::Processing(msg) => {
                    error!(error = %msg, "an error occurred during CSV processing")
                }
            }
            None
        }
    };

    timestamp::update_timestamp(sink).await?;
    Ok(report)
}
