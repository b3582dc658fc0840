//! Apify REST API response types.
//!
//! Every Apify v2 response wraps its payload in `{"data": ...}`;
//! [`ApiResponse`] captures that envelope generically.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wrapper for Apify API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Lifecycle status of an actor run.
///
/// Statuses Apify may add later deserialize as [`RunStatus::Unknown`] and are
/// treated as "still running" by the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    #[serde(rename = "READY")]
    Ready,
    #[serde(rename = "RUNNING")]
    Running,
    #[serde(rename = "SUCCEEDED")]
    Succeeded,
    #[serde(rename = "FAILED")]
    Failed,
    #[serde(rename = "ABORTING")]
    Aborting,
    #[serde(rename = "ABORTED")]
    Aborted,
    #[serde(rename = "TIMING-OUT")]
    TimingOut,
    #[serde(rename = "TIMED-OUT")]
    TimedOut,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Ready => "READY",
            RunStatus::Running => "RUNNING",
            RunStatus::Succeeded => "SUCCEEDED",
            RunStatus::Failed => "FAILED",
            RunStatus::Aborting => "ABORTING",
            RunStatus::Aborted => "ABORTED",
            RunStatus::TimingOut => "TIMING-OUT",
            RunStatus::TimedOut => "TIMED-OUT",
            RunStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Apify actor run metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct RunData {
    pub id: String,
    pub status: RunStatus,
    #[serde(rename = "defaultDatasetId", default)]
    pub default_dataset_id: Option<String>,
    #[serde(rename = "startedAt", default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(rename = "finishedAt", default)]
    pub finished_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_data_parses_envelope() {
        let body = serde_json::json!({
            "data": {
                "id": "run-1",
                "status": "TIMED-OUT",
                "defaultDatasetId": "ds-1",
                "startedAt": "2025-03-01T10:00:00.000Z",
                "finishedAt": null
            }
        });
        let parsed: ApiResponse<RunData> = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.data.id, "run-1");
        assert_eq!(parsed.data.status, RunStatus::TimedOut);
        assert_eq!(parsed.data.default_dataset_id.as_deref(), Some("ds-1"));
        assert!(parsed.data.started_at.is_some());
        assert!(parsed.data.finished_at.is_none());
    }

    #[test]
    fn unrecognised_status_is_unknown() {
        let run: RunData =
            serde_json::from_value(serde_json::json!({"id": "r", "status": "PAUSED"})).unwrap();
        assert_eq!(run.status, RunStatus::Unknown);
        assert!(run.default_dataset_id.is_none());
    }

    #[test]
    fn status_display_matches_wire_value() {
        assert_eq!(RunStatus::TimingOut.to_string(), "TIMING-OUT");
        assert_eq!(RunStatus::Succeeded.to_string(), "SUCCEEDED");
    }
}
