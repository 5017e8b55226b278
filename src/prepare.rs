use anyhow::{Context, Result};
use tracing::info;

use crate::process::convert::{Cell, Row};
use crate::schema::{output_headers, SHEET_NAME};
use crate::sheets::{a1, SheetSink};

/// Ensure the destination sheet exists, wipe `A:V` and write the header row.
#[tracing::instrument(level = "info", skip(sink))]
pub async fn prepare_main_sheet<S: SheetSink + ?Sized>(sink: &S) -> Result<()> {
    info!(sheet = SHEET_NAME, "preparing main sheet");
    sink.ensure_sheet(SHEET_NAME)
        .await
        .with_context(|| format!("ensuring sheet {}", SHEET_NAME))?;

    let data_range = a1(SHEET_NAME, "A:V");
    sink.clear_range(&data_range)
        .await
        .with_context(|| format!("clearing {}", data_range))?;

    let header: Row = output_headers().iter().map(|&h| Cell::from(h)).collect();
    let header_range = a1(SHEET_NAME, "A1:V1");
    sink.update_values(&header_range, &[header])
        .await
        .with_context(|| format!("writing header to {}", header_range))?;

    info!("main sheet prepared");
    Ok(())
}
