//! Complaint communication threads.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::Result;
use crate::models::{Communication, NewCommunication};

/// Append a message to a complaint's thread.
pub async fn append_communication(
    pool: &SqlitePool,
    new: &NewCommunication,
) -> Result<Communication> {
    let communication = sqlx::query_as::<_, Communication>(
        r#"
        INSERT INTO communications (
            complaint_id, sender_type, sender_name, message, is_internal, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&new.complaint_id)
    .bind(new.sender_type)
    .bind(&new.sender_name)
    .bind(&new.message)
    .bind(new.is_internal)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(communication)
}

/// List a complaint's messages, oldest first.
///
/// Internal notes are excluded unless `include_internal` is set; `since`
/// restricts the result to messages created strictly after it.
pub async fn list_communications(
    pool: &SqlitePool,
    complaint_id: &str,
    since: Option<DateTime<Utc>>,
    include_internal: bool,
) -> Result<Vec<Communication>> {
    let mut query: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT * FROM communications WHERE complaint_id = ");
    query.push_bind(complaint_id);
    if !include_internal {
        query.push(" AND is_internal = 0");
    }
    if let Some(since) = since {
        query.push(" AND created_at > ");
        query.push_bind(since);
    }
    query.push(" ORDER BY created_at ASC, id ASC");

    let communications = query
        .build_query_as::<Communication>()
        .fetch_all(pool)
        .await?;

    Ok(communications)
}

/// List external messages across all complaints created strictly after
/// `since`, oldest first. Used for new-message polling.
pub async fn list_new_external_since(
    pool: &SqlitePool,
    since: DateTime<Utc>,
) -> Result<Vec<Communication>> {
    let communications = sqlx::query_as::<_, Communication>(
        r#"
        SELECT * FROM communications
        WHERE is_internal = 0 AND created_at > ?
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(since)
    .fetch_all(pool)
    .await?;

    Ok(communications)
}

/// Count external messages per complaint.
pub async fn message_counts(pool: &SqlitePool) -> Result<Vec<(String, i64)>> {
    let counts = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT complaint_id, COUNT(*) as count
        FROM communications
        WHERE is_internal = 0
        GROUP BY complaint_id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(counts)
}
