//! The report generation job body.
//!
//! The work is simulated by waiting `duration`, split into `steps` ticks.
//! Every tick boundary is a suspension point where cancellation is observed,
//! and the token is checked one last time before the report file is written.

use common::jobs::ReportResult;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Contents of the generated report file.
pub const REPORT_CONTENTS: &str = "This is a sample report.";

#[derive(Debug, Clone)]
pub struct ReportSettings {
    /// Where the report is written. Overwritten by every successful run.
    pub output_path: PathBuf,
    /// Total simulated work time.
    pub duration: Duration,
    /// Number of ticks the work is split into. Progress is published per tick.
    pub steps: u32,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report generation was canceled")]
    Canceled,
    #[error("failed to write report to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Runs one report generation.
///
/// `on_progress` is called after every tick with a percentage in `1..=100`.
/// Returns `ReportError::Canceled` without touching the output file if the
/// token fires before the write starts.
pub(crate) async fn generate_report<F>(
    settings: &ReportSettings,
    cancel: &CancellationToken,
    mut on_progress: F,
) -> Result<ReportResult, ReportError>
where
    F: FnMut(u8),
{
    let steps = settings.steps.max(1);
    let tick = settings.duration / steps;

    for step in 1..=steps {
        if cancel.is_cancelled() {
            return Err(ReportError::Canceled);
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ReportError::Canceled),
            _ = tokio::time::sleep(tick) => {}
        }
        on_progress((u64::from(step) * 100 / u64::from(steps)) as u8);
    }

    if cancel.is_cancelled() {
        return Err(ReportError::Canceled);
    }
    write_report(&settings.output_path).await?;

    Ok(ReportResult {
        message: "Report generated successfully".to_string(),
        path: settings.output_path.display().to_string(),
    })
}

/// Writes the report next to its final location and renames it into place,
/// so readers never observe a partially written file.
async fn write_report(path: &Path) -> Result<(), ReportError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, REPORT_CONTENTS)
        .await
        .map_err(|source| ReportError::Io {
            path: tmp.clone(),
            source,
        })?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })
}
