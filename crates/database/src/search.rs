//! Filtered complaint search.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use taxonomy::Priority;

use crate::error::Result;
use crate::models::{Complaint, Status};

/// Search criteria. All fields are optional and combine with AND; the
/// keyword matches title, description, or public number as a
/// case-insensitive substring.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchFilter {
    pub keyword: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    /// Exact assigned-department match.
    pub department: Option<String>,
    /// Inclusive lower bound on creation time.
    pub date_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on creation time.
    pub date_to: Option<DateTime<Utc>>,
}

/// Search complaints matching the filter, newest first.
pub async fn search_complaints(
    pool: &SqlitePool,
    filter: &SearchFilter,
) -> Result<Vec<Complaint>> {
    let mut query: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT * FROM complaints WHERE 1 = 1");

    if let Some(keyword) = filter.keyword.as_deref().filter(|kw| !kw.trim().is_empty()) {
        let pattern = format!("%{}%", keyword.trim());
        query.push(" AND (title LIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR description LIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR complaint_number LIKE ");
        query.push_bind(pattern);
        query.push(")");
    }
    if let Some(status) = filter.status {
        query.push(" AND status = ");
        query.push_bind(status);
    }
    if let Some(priority) = filter.priority {
        query.push(" AND priority = ");
        query.push_bind(priority);
    }
    if let Some(department) = filter.department.as_deref() {
        query.push(" AND assigned_to = ");
        query.push_bind(department.to_string());
    }
    if let Some(date_from) = filter.date_from {
        query.push(" AND created_at >= ");
        query.push_bind(date_from);
    }
    if let Some(date_to) = filter.date_to {
        query.push(" AND created_at <= ");
        query.push_bind(date_to);
    }
    query.push(" ORDER BY created_at DESC");

    let complaints = query.build_query_as::<Complaint>().fetch_all(pool).await?;

    Ok(complaints)
}
