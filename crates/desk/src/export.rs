//! Flat export projection of complaints.

use database::models::Complaint;
use serde::Serialize;

/// Export column headers, in order.
pub const EXPORT_HEADERS: [&str; 10] = [
    "Complaint ID",
    "Title",
    "Status",
    "Priority",
    "Category",
    "Assigned To",
    "Email",
    "Phone",
    "Created Date",
    "Updated Date",
];

/// One exported complaint, flattened to display columns. Missing values
/// become "N/A".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Complaint ID")]
    pub complaint_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Priority")]
    pub priority: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Assigned To")]
    pub assigned_to: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Created Date")]
    pub created_date: String,
    #[serde(rename = "Updated Date")]
    pub updated_date: String,
}

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Flatten a complaint into an export row.
pub fn export_row(complaint: &Complaint) -> ExportRow {
    ExportRow {
        complaint_id: complaint.complaint_number.clone(),
        title: complaint.title.clone(),
        status: complaint.status.to_string(),
        priority: complaint.priority.to_string(),
        category: complaint
            .detected_category
            .clone()
            .unwrap_or_else(|| "N/A".to_string()),
        assigned_to: complaint.assigned_to.clone(),
        email: complaint.email.clone(),
        phone: complaint.phone.clone().unwrap_or_else(|| "N/A".to_string()),
        created_date: complaint.created_at.format(DATE_FORMAT).to_string(),
        updated_date: complaint.updated_at.format(DATE_FORMAT).to_string(),
    }
}
