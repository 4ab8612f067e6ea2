//! Database models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taxonomy::Priority;

/// Lifecycle status of a complaint. Stored as the display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum Status {
    Submitted,
    #[serde(rename = "In Progress")]
    #[sqlx(rename = "In Progress")]
    InProgress,
    Resolved,
    Escalated,
    Closed,
}

impl Status {
    /// All statuses, in dashboard display order.
    pub const ALL: [Status; 5] = [
        Status::Submitted,
        Status::InProgress,
        Status::Resolved,
        Status::Escalated,
        Status::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Submitted => "Submitted",
            Status::InProgress => "In Progress",
            Status::Resolved => "Resolved",
            Status::Escalated => "Escalated",
            Status::Closed => "Closed",
        }
    }

    /// Whether this status closes out a complaint (sets `resolved_at`).
    pub fn is_completed(&self) -> bool {
        matches!(self, Status::Resolved | Status::Closed)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who authored a communication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum SenderKind {
    User,
    Staff,
    System,
}

/// Structured submission metadata stored alongside a complaint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionMeta {
    /// Keywords that drove automatic categorization.
    pub matched_keywords: Vec<String>,
    /// Confidence reported by the categorizer, if any.
    pub analysis_confidence: Option<f64>,
    /// When the categorization ran.
    pub analysis_timestamp: Option<DateTime<Utc>>,
    /// Whether the department assignment was automatic.
    pub auto_assigned: bool,
    /// Whether the submitter flagged the complaint as urgent.
    pub is_urgent: bool,
    /// Number of files attached at submission time.
    pub files_count: u32,
    /// Whether a PNR was supplied.
    pub has_pnr: bool,
    pub form_version: String,
    pub submission_source: String,
}

impl Default for SubmissionMeta {
    fn default() -> Self {
        Self {
            matched_keywords: Vec::new(),
            analysis_confidence: None,
            analysis_timestamp: None,
            auto_assigned: false,
            is_urgent: false,
            files_count: 0,
            has_pnr: false,
            form_version: "1.0".to_string(),
            submission_source: "web_form".to_string(),
        }
    }
}

/// A stored complaint.
///
/// `id` is the internal UUID used for writes to dependent tables;
/// `complaint_number` is the public reference shown to customers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Complaint {
    /// Internal UUID, never shown to customers.
    pub id: String,
    /// Public complaint number (e.g., "RWC20250720000005"). Immutable.
    pub complaint_number: String,
    pub title: String,
    pub description: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: String,
    pub train_number: Option<String>,
    pub journey_date: Option<NaiveDate>,
    pub pnr_number: Option<String>,
    /// Category chosen by automatic analysis, if any.
    pub detected_category: Option<String>,
    pub detected_subcategory: Option<String>,
    /// Department handling the complaint.
    pub assigned_to: String,
    pub confidence_score: Option<f64>,
    pub priority: Priority,
    pub status: Status,
    #[sqlx(json)]
    pub metadata: SubmissionMeta,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set exactly while the status is Resolved or Closed.
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Payload for inserting a complaint. Identifier, number, status, and
/// timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub title: String,
    pub description: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: String,
    pub train_number: Option<String>,
    pub journey_date: Option<NaiveDate>,
    pub pnr_number: Option<String>,
    pub detected_category: Option<String>,
    pub detected_subcategory: Option<String>,
    pub assigned_to: String,
    pub confidence_score: Option<f64>,
    pub priority: Priority,
    pub metadata: SubmissionMeta,
}

/// A status-history record. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct HistoryEntry {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Internal complaint UUID.
    pub complaint_id: String,
    /// What happened (e.g., "Complaint Submitted").
    pub action: String,
    pub details: String,
    pub remark: Option<String>,
    pub old_status: Option<Status>,
    pub new_status: Option<Status>,
    pub changed_by_name: String,
    /// Whether this step closed out the complaint.
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for appending a history record.
#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub complaint_id: String,
    pub action: String,
    pub details: String,
    pub remark: Option<String>,
    pub old_status: Option<Status>,
    pub new_status: Option<Status>,
    pub changed_by_name: String,
    pub completed: bool,
}

/// A message on a complaint thread. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Communication {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Internal complaint UUID.
    pub complaint_id: String,
    pub sender_type: SenderKind,
    pub sender_name: String,
    pub message: String,
    /// Internal notes are never shown to customers.
    pub is_internal: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for appending a communication.
#[derive(Debug, Clone)]
pub struct NewCommunication {
    pub complaint_id: String,
    pub sender_type: SenderKind,
    pub sender_name: String,
    pub message: String,
    pub is_internal: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!(Status::InProgress.as_str(), "In Progress");
        assert_eq!(
            serde_json::to_string(&Status::InProgress).unwrap(),
            "\"In Progress\""
        );
        let parsed: Status = serde_json::from_str("\"Escalated\"").unwrap();
        assert_eq!(parsed, Status::Escalated);
    }

    #[test]
    fn test_completed_statuses() {
        assert!(Status::Resolved.is_completed());
        assert!(Status::Closed.is_completed());
        assert!(!Status::Submitted.is_completed());
        assert!(!Status::InProgress.is_completed());
        assert!(!Status::Escalated.is_completed());
    }

    #[test]
    fn test_sender_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&SenderKind::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&SenderKind::System).unwrap(),
            "\"system\""
        );
    }

    #[test]
    fn test_submission_meta_defaults() {
        let meta = SubmissionMeta::default();
        assert_eq!(meta.form_version, "1.0");
        assert_eq!(meta.submission_source, "web_form");
        assert!(!meta.auto_assigned);
    }
}
