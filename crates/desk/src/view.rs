//! Viewer-relative presentation of complaints.
//!
//! Customers and staff see the same records with different labels, and
//! customers only ever see the public complaint number and external
//! messages. The tone helpers carry the badge colors the dashboard
//! renders statuses and priorities with.

use chrono::{DateTime, NaiveDate, Utc};
use database::models::{Communication, Complaint, HistoryEntry, SenderKind, Status};
use serde::{Deserialize, Serialize};
use taxonomy::Priority;

/// Who is looking at the complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewer {
    #[default]
    Customer,
    Staff,
}

/// Display label for a message author, relative to the viewer.
pub fn sender_label(sender: SenderKind, viewer: Viewer) -> &'static str {
    match (sender, viewer) {
        (SenderKind::User, Viewer::Customer) => "You",
        (SenderKind::User, Viewer::Staff) => "Customer",
        (SenderKind::Staff, _) => "Support Agent",
        (SenderKind::System, Viewer::Customer) => "RailCare System",
        (SenderKind::System, Viewer::Staff) => "System",
    }
}

/// Badge tone for a status.
pub fn status_tone(status: Status) -> &'static str {
    match status {
        Status::Resolved | Status::Closed => "green",
        Status::InProgress => "yellow",
        Status::Submitted => "blue",
        Status::Escalated => "red",
    }
}

/// Badge tone for a priority.
pub fn priority_tone(priority: Priority) -> &'static str {
    match priority {
        Priority::Urgent => "red",
        Priority::High => "orange",
        Priority::Medium => "yellow",
        Priority::Low => "gray",
    }
}

/// A message as shown to a viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageView {
    pub sender_label: String,
    pub sender_type: SenderKind,
    pub message: String,
    pub is_internal: bool,
    pub sent_at: DateTime<Utc>,
}

/// A history step as shown in the complaint timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryView {
    pub action: String,
    pub details: String,
    pub remark: Option<String>,
    pub old_status: Option<Status>,
    pub new_status: Option<Status>,
    pub changed_by_name: String,
    pub completed: bool,
    pub at: DateTime<Utc>,
}

/// Full single-complaint view. The only identifier exposed is the public
/// complaint number.
#[derive(Debug, Clone, Serialize)]
pub struct ComplaintDetail {
    /// Public complaint number.
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub assigned_to: String,
    pub location: String,
    pub train_number: Option<String>,
    pub journey_date: Option<NaiveDate>,
    pub pnr_number: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    /// Oldest first.
    pub history: Vec<HistoryView>,
    /// Oldest first, external messages only.
    pub messages: Vec<MessageView>,
}

/// Customer-facing complaint list row.
#[derive(Debug, Clone, Serialize)]
pub struct ComplaintSummary {
    /// Public complaint number.
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub category: Option<String>,
    pub assigned_to: String,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Project a message for a viewer.
pub fn message_view(communication: &Communication, viewer: Viewer) -> MessageView {
    MessageView {
        sender_label: sender_label(communication.sender_type, viewer).to_string(),
        sender_type: communication.sender_type,
        message: communication.message.clone(),
        is_internal: communication.is_internal,
        sent_at: communication.created_at,
    }
}

/// Project the complete view of a complaint.
///
/// History comes oldest first; `messages` must already be restricted to
/// external messages for customer viewers.
pub fn complaint_detail(
    complaint: &Complaint,
    history: &[HistoryEntry],
    messages: &[Communication],
    viewer: Viewer,
) -> ComplaintDetail {
    ComplaintDetail {
        id: complaint.complaint_number.clone(),
        title: complaint.title.clone(),
        description: complaint.description.clone(),
        status: complaint.status,
        priority: complaint.priority,
        category: complaint.detected_category.clone(),
        subcategory: complaint.detected_subcategory.clone(),
        assigned_to: complaint.assigned_to.clone(),
        location: complaint.location.clone(),
        train_number: complaint.train_number.clone(),
        journey_date: complaint.journey_date,
        pnr_number: complaint.pnr_number.clone(),
        submitted_at: complaint.created_at,
        updated_at: complaint.updated_at,
        resolved_at: complaint.resolved_at,
        history: history
            .iter()
            .map(|entry| HistoryView {
                action: entry.action.clone(),
                details: entry.details.clone(),
                remark: entry.remark.clone(),
                old_status: entry.old_status,
                new_status: entry.new_status,
                changed_by_name: entry.changed_by_name.clone(),
                completed: entry.completed,
                at: entry.created_at,
            })
            .collect(),
        messages: messages
            .iter()
            .map(|communication| message_view(communication, viewer))
            .collect(),
    }
}

/// Project the customer-facing summary row.
pub fn summarize(complaint: &Complaint) -> ComplaintSummary {
    ComplaintSummary {
        id: complaint.complaint_number.clone(),
        title: complaint.title.clone(),
        description: complaint.description.clone(),
        status: complaint.status,
        priority: complaint.priority,
        category: complaint.detected_category.clone(),
        assigned_to: complaint.assigned_to.clone(),
        submitted_at: complaint.created_at,
        updated_at: complaint.updated_at,
    }
}
