//! Status-history records for complaints.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::{HistoryEntry, NewHistoryEntry};

/// Append a history record.
pub async fn append_history(pool: &SqlitePool, entry: &NewHistoryEntry) -> Result<HistoryEntry> {
    let history = sqlx::query_as::<_, HistoryEntry>(
        r#"
        INSERT INTO complaint_history (
            complaint_id, action, details, remark, old_status, new_status,
            changed_by_name, completed, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&entry.complaint_id)
    .bind(&entry.action)
    .bind(&entry.details)
    .bind(&entry.remark)
    .bind(entry.old_status)
    .bind(entry.new_status)
    .bind(&entry.changed_by_name)
    .bind(entry.completed)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(history)
}

/// List a complaint's history, oldest first.
pub async fn list_history(pool: &SqlitePool, complaint_id: &str) -> Result<Vec<HistoryEntry>> {
    let entries = sqlx::query_as::<_, HistoryEntry>(
        r#"
        SELECT * FROM complaint_history
        WHERE complaint_id = ?
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(complaint_id)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

/// The most recent non-empty remark per complaint, across all complaints.
pub async fn latest_remarks(pool: &SqlitePool) -> Result<Vec<(String, String)>> {
    let remarks = sqlx::query_as::<_, (String, String)>(
        r#"
        SELECT complaint_id, remark
        FROM complaint_history
        WHERE id IN (
            SELECT MAX(id) FROM complaint_history
            WHERE remark IS NOT NULL
            GROUP BY complaint_id
        )
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(remarks)
}
