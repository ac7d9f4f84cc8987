//! Wire types for the report generation job.
//!
//! `ReportState` is the value held in the backend's single job slot. The HTTP
//! layer never serializes it directly; it is flattened into a
//! `ReportStatusResponse` so every status reply has the same
//! `{ status, progress?, detail? }` shape.

use serde::{Deserialize, Serialize};

/// The artifact record produced by a successful report run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportResult {
    /// Human readable completion message.
    pub message: String,
    /// Where the report file was written.
    pub path: String,
}

/// Current value of the report job slot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportState {
    /// No report has been started since the process came up.
    #[default]
    Idle,
    /// A report is being generated. `progress` is a percentage in `0..=100`.
    Running { progress: u8 },
    Completed(ReportResult),
    Canceled,
    /// The run ended with an error. Contains the cause.
    Failed(String),
}

impl ReportState {
    pub fn label(&self) -> &'static str {
        match self {
            ReportState::Idle => "Idle",
            ReportState::Running { .. } => "Running",
            ReportState::Completed(_) => "Completed",
            ReportState::Canceled => "Canceled",
            ReportState::Failed(_) => "Failed",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, ReportState::Running { .. })
    }

    /// `true` once a run has finished, whatever the outcome.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReportState::Completed(_) | ReportState::Canceled | ReportState::Failed(_)
        )
    }
}

/// Reply to a start request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
}

/// Reply to a cancel request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CancelOutcome {
    CancelRequested,
    NothingToCancel,
}

/// Body returned by the start and cancel endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeResponse<T> {
    pub status: T,
}

/// Body returned by the status endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportStatusResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    /// Failure cause or completion message, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl From<&ReportState> for ReportStatusResponse {
    fn from(state: &ReportState) -> Self {
        let (progress, detail) = match state {
            ReportState::Running { progress } => (Some(*progress), None),
            ReportState::Completed(result) => (None, Some(result.message.clone())),
            ReportState::Failed(cause) => (None, Some(cause.clone())),
            ReportState::Idle | ReportState::Canceled => (None, None),
        };
        ReportStatusResponse {
            status: state.label().to_string(),
            progress,
            detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn running_state_reports_progress_only() {
        let body = ReportStatusResponse::from(&ReportState::Running { progress: 40 });
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({ "status": "Running", "progress": 40 })
        );
    }

    #[test]
    fn failed_state_carries_cause() {
        let body = ReportStatusResponse::from(&ReportState::Failed("disk full".into()));
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({ "status": "Failed", "detail": "disk full" })
        );
    }

    #[test]
    fn idle_is_neither_running_nor_terminal() {
        let state = ReportState::default();
        assert_eq!(state.label(), "Idle");
        assert!(!state.is_running());
        assert!(!state.is_terminal());
    }

    #[test]
    fn outcomes_serialize_as_variant_names() {
        let started = OutcomeResponse { status: StartOutcome::AlreadyRunning };
        assert_eq!(
            serde_json::to_value(started).unwrap(),
            json!({ "status": "AlreadyRunning" })
        );
        let canceled = OutcomeResponse { status: CancelOutcome::NothingToCancel };
        assert_eq!(
            serde_json::to_value(canceled).unwrap(),
            json!({ "status": "NothingToCancel" })
        );
    }
}
