//! Aggregate complaint statistics.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::error::Result;

/// One row of a grouped count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CountRow {
    pub key: String,
    pub count: i64,
}

/// Aggregate complaint counts, computed in the store and returned to
/// callers unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplaintStats {
    pub total: i64,
    /// Complaints not yet Resolved or Closed.
    pub open: i64,
    /// Complaints Resolved or Closed.
    pub resolved: i64,
    pub by_status: Vec<CountRow>,
    pub by_priority: Vec<CountRow>,
    pub by_category: Vec<CountRow>,
}

/// Compute complaint statistics.
pub async fn complaint_stats(pool: &SqlitePool) -> Result<ComplaintStats> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM complaints")
        .fetch_one(pool)
        .await?;
    let open = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM complaints
        WHERE status NOT IN ('Resolved', 'Closed')
        "#,
    )
    .fetch_one(pool)
    .await?;
    let resolved = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM complaints
        WHERE status IN ('Resolved', 'Closed')
        "#,
    )
    .fetch_one(pool)
    .await?;

    let by_status = sqlx::query_as::<_, CountRow>(
        r#"
        SELECT status AS key, COUNT(*) AS count
        FROM complaints
        GROUP BY status
        ORDER BY count DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    let by_priority = sqlx::query_as::<_, CountRow>(
        r#"
        SELECT priority AS key, COUNT(*) AS count
        FROM complaints
        GROUP BY priority
        ORDER BY count DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    let by_category = sqlx::query_as::<_, CountRow>(
        r#"
        SELECT COALESCE(detected_category, 'Uncategorized') AS key, COUNT(*) AS count
        FROM complaints
        GROUP BY detected_category
        ORDER BY count DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(ComplaintStats {
        total,
        open,
        resolved,
        by_status,
        by_priority,
        by_category,
    })
}
