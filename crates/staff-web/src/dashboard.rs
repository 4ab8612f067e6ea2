//! Dashboard views built from the refresher snapshot.
//!
//! Filtering happens in memory against the latest snapshot rather than per
//! keystroke against the store: the scope comes from the session, search and
//! status narrowing from the query string.

use chrono::{DateTime, Utc};
use desk::{priority_tone, status_tone, Complaint, Priority, Status};
use serde::{Deserialize, Serialize};
use taxonomy::department_structure;

use crate::refresh::Snapshot;
use crate::session::StaffSession;

/// Filters accepted by the dashboard endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardQuery {
    /// Case-insensitive match on complaint number, title, or description.
    pub search: Option<String>,
    /// Status name to keep, or "all".
    pub status: Option<String>,
}

/// One dashboard table row.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardRow {
    /// Public complaint number.
    pub id: String,
    pub title: String,
    pub status: Status,
    pub status_tone: &'static str,
    pub priority: Priority,
    pub priority_tone: &'static str,
    pub category: Option<String>,
    pub assigned_to: String,
    /// External messages on the thread.
    pub message_count: i64,
    /// Latest staff remark, if any.
    pub last_remark: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The dashboard as served to the staff surface.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub department: String,
    pub sub_department: Option<String>,
    pub rows: Vec<DashboardRow>,
    pub total: usize,
    pub total_messages: i64,
    pub new_message_alert: bool,
    pub fetched_at: DateTime<Utc>,
}

/// Build the dashboard for a session's scope from the latest snapshot.
///
/// The session must have a department selected; rows keep the snapshot's
/// newest-first order.
pub fn build(snapshot: &Snapshot, session: &StaffSession, query: &DashboardQuery) -> DashboardView {
    let department = session.department.as_deref().unwrap_or_default();
    let sub_department = session.sub_department.as_deref();
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase);
    let status = query
        .status
        .as_deref()
        .map(str::trim)
        .filter(|wanted| !wanted.is_empty() && !wanted.eq_ignore_ascii_case("all"));

    let rows: Vec<DashboardRow> = snapshot
        .complaints
        .iter()
        .filter(|complaint| in_scope(&complaint.assigned_to, department, sub_department))
        .filter(|complaint| match status {
            Some(wanted) => complaint.status.as_str() == wanted,
            None => true,
        })
        .filter(|complaint| match &search {
            Some(term) => matches_search(complaint, term),
            None => true,
        })
        .map(|complaint| row(complaint, snapshot))
        .collect();

    DashboardView {
        department: department.to_string(),
        sub_department: sub_department.map(str::to_string),
        total: rows.len(),
        rows,
        total_messages: snapshot.total_messages,
        new_message_alert: snapshot.new_message_alert,
        fetched_at: snapshot.fetched_at,
    }
}

/// Whether an assignment falls under the selected scope.
///
/// A sub-department narrows to exact matches. A department group covers its
/// sub-departments from the category table, plus exact matches of the group
/// name itself (which is how the general grievance cell is reached).
fn in_scope(assigned_to: &str, department: &str, sub_department: Option<&str>) -> bool {
    if let Some(sub) = sub_department {
        return assigned_to == sub;
    }
    if assigned_to == department {
        return true;
    }
    department_structure()
        .get(department)
        .map(|subs| subs.iter().any(|sub| *sub == assigned_to))
        .unwrap_or(false)
}

fn matches_search(complaint: &Complaint, term: &str) -> bool {
    complaint.complaint_number.to_lowercase().contains(term)
        || complaint.title.to_lowercase().contains(term)
        || complaint.description.to_lowercase().contains(term)
}

fn row(complaint: &Complaint, snapshot: &Snapshot) -> DashboardRow {
    DashboardRow {
        id: complaint.complaint_number.clone(),
        title: complaint.title.clone(),
        status: complaint.status,
        status_tone: status_tone(complaint.status),
        priority: complaint.priority,
        priority_tone: priority_tone(complaint.priority),
        category: complaint.detected_category.clone(),
        assigned_to: complaint.assigned_to.clone(),
        message_count: snapshot
            .message_counts
            .get(&complaint.id)
            .copied()
            .unwrap_or(0),
        last_remark: snapshot.remarks.get(&complaint.id).cloned(),
        created_at: complaint.created_at,
        updated_at: complaint.updated_at,
    }
}
