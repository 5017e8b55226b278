use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use tracing::info;

use crate::process::convert::Cell;
use crate::schema::TIMESTAMP_SHEET;
use crate::sheets::{a1, SheetSink};

/// Month without padding, then day, year and 24h time: `3/07/2026 09:05:01`.
pub const TIMESTAMP_FORMAT: &str = "%-m/%d/%Y %H:%M:%S";

pub fn last_run_label<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("Last Run: {}", at.format(TIMESTAMP_FORMAT))
}

/// Write the current local time into `A2` of the timestamp sheet.
#[tracing::instrument(level = "info", skip(sink))]
pub async fn update_timestamp<S: SheetSink + ?Sized>(sink: &S) -> Result<String> {
    info!(sheet = TIMESTAMP_SHEET, "updating timestamp");
    sink.ensure_sheet(TIMESTAMP_SHEET)
        .await
        .with_context(|| format!("ensuring sheet {}", TIMESTAMP_SHEET))?;

    let label = last_run_label(&Local::now());
    let range = a1(TIMESTAMP_SHEET, "A2");
    sink.update_values(&range, &[vec![Cell::Text(label.clone())]])
        .await
        .with_context(|| format!("writing {}", range))?;

    info!(%label, "timestamp updated");
    Ok(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::memory::{MemorySheets, SheetCall};
    use chrono::{NaiveDate, Utc};

    #[test]
    fn label_uses_unpadded_month() {
        let at = NaiveDate::from_ymd_opt(2026, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 1)
            .unwrap()
            .and_utc();
        assert_eq!(last_run_label(&at), "Last Run: 3/07/2026 09:05:01");

        let at = Utc.with_ymd_and_hms(2026, 12, 24, 18, 30, 0).unwrap();
        assert_eq!(last_run_label(&at), "Last Run: 12/24/2026 18:30:00");
    }

    #[tokio::test]
    async fn writes_label_into_a2() -> Result<()> {
        let sink = MemorySheets::new();
        let label = update_timestamp(&sink).await?;

        assert!(label.starts_with("Last Run: "));
        assert_eq!(sink.calls()[0], SheetCall::EnsureSheet("test".into()));
        assert_eq!(
            sink.last_update("test!A2"),
            Some(vec![vec![Cell::Text(label)]])
        );
        Ok(())
    }
}
