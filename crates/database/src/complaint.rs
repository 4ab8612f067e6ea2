//! Complaint CRUD and query operations.

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::{Complaint, NewComplaint, Status};

/// How to match a complaint's assigned department.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepartmentMatch {
    /// The department must match exactly.
    Exact,
    /// The department name may appear anywhere in the assignment.
    Contains,
}

/// Contact details to look up complaints by.
#[derive(Debug, Clone)]
pub enum ContactFilter {
    Email(String),
    Phone(String),
    /// Matches either field; a complaint matching both appears once.
    Either { email: String, phone: String },
}

/// Insert a complaint, assigning its internal id and public number.
///
/// The public number is allocated from a per-day counter inside the same
/// transaction as the insert, so concurrent submissions never collide.
pub async fn create_complaint(pool: &SqlitePool, new: &NewComplaint) -> Result<Complaint> {
    let mut tx = pool.begin().await?;

    let number = next_complaint_number(&mut tx).await?;
    let id = Uuid::new_v4().to_string();
    let now = Utc::now();

    let complaint = sqlx::query_as::<_, Complaint>(
        r#"
        INSERT INTO complaints (
            id, complaint_number, title, description, email, phone, location,
            train_number, journey_date, pnr_number, detected_category,
            detected_subcategory, assigned_to, confidence_score, priority,
            status, metadata, created_at, updated_at, resolved_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NULL)
        RETURNING *
        "#,
    )
    .bind(&id)
    .bind(&number)
    .bind(&new.title)
    .bind(&new.description)
    .bind(&new.email)
    .bind(&new.phone)
    .bind(&new.location)
    .bind(&new.train_number)
    .bind(new.journey_date)
    .bind(&new.pnr_number)
    .bind(&new.detected_category)
    .bind(&new.detected_subcategory)
    .bind(&new.assigned_to)
    .bind(new.confidence_score)
    .bind(new.priority)
    .bind(Status::Submitted)
    .bind(sqlx::types::Json(&new.metadata))
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(complaint)
}

// Public numbers are "RWC" + day + zero-padded per-day sequence, e.g.
// "RWC20250720000005".
async fn next_complaint_number(tx: &mut Transaction<'_, Sqlite>) -> Result<String> {
    let day = Utc::now().format("%Y%m%d").to_string();
    let seq = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO complaint_counters (day, value)
        VALUES (?, 1)
        ON CONFLICT(day) DO UPDATE SET value = value + 1
        RETURNING value
        "#,
    )
    .bind(&day)
    .fetch_one(&mut **tx)
    .await?;

    Ok(format!("RWC{}{:06}", day, seq))
}

/// Get a complaint by internal id.
pub async fn get_complaint(pool: &SqlitePool, id: &str) -> Result<Complaint> {
    sqlx::query_as::<_, Complaint>(
        r#"
        SELECT * FROM complaints
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Complaint",
        id: id.to_string(),
    })
}

/// Get a complaint by its public number.
pub async fn get_complaint_by_number(pool: &SqlitePool, number: &str) -> Result<Complaint> {
    sqlx::query_as::<_, Complaint>(
        r#"
        SELECT * FROM complaints
        WHERE complaint_number = ?
        "#,
    )
    .bind(number)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Complaint",
        id: number.to_string(),
    })
}

/// List all complaints, newest first.
pub async fn list_complaints(pool: &SqlitePool) -> Result<Vec<Complaint>> {
    let complaints = sqlx::query_as::<_, Complaint>(
        r#"
        SELECT * FROM complaints
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(complaints)
}

/// List complaints matching the given contact details, newest first.
pub async fn list_complaints_by_contact(
    pool: &SqlitePool,
    filter: &ContactFilter,
) -> Result<Vec<Complaint>> {
    let complaints = match filter {
        ContactFilter::Email(email) => {
            sqlx::query_as::<_, Complaint>(
                r#"
                SELECT * FROM complaints
                WHERE email = ?
                ORDER BY created_at DESC
                "#,
            )
            .bind(email)
            .fetch_all(pool)
            .await?
        }
        ContactFilter::Phone(phone) => {
            sqlx::query_as::<_, Complaint>(
                r#"
                SELECT * FROM complaints
                WHERE phone = ?
                ORDER BY created_at DESC
                "#,
            )
            .bind(phone)
            .fetch_all(pool)
            .await?
        }
        ContactFilter::Either { email, phone } => {
            sqlx::query_as::<_, Complaint>(
                r#"
                SELECT * FROM complaints
                WHERE email = ? OR phone = ?
                ORDER BY created_at DESC
                "#,
            )
            .bind(email)
            .bind(phone)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(complaints)
}

/// List complaints assigned to a department, newest first.
pub async fn list_complaints_by_department(
    pool: &SqlitePool,
    department: &str,
    matching: DepartmentMatch,
) -> Result<Vec<Complaint>> {
    let query = match matching {
        DepartmentMatch::Exact => {
            r#"
            SELECT * FROM complaints
            WHERE assigned_to = ?
            ORDER BY created_at DESC
            "#
        }
        DepartmentMatch::Contains => {
            r#"
            SELECT * FROM complaints
            WHERE assigned_to LIKE '%' || ? || '%'
            ORDER BY created_at DESC
            "#
        }
    };

    let complaints = sqlx::query_as::<_, Complaint>(query)
        .bind(department)
        .fetch_all(pool)
        .await?;

    Ok(complaints)
}

/// Set a complaint's status and return the updated row.
///
/// `updated_at` always advances; `resolved_at` is set while the new status
/// is Resolved or Closed and cleared otherwise.
pub async fn update_complaint_status(
    pool: &SqlitePool,
    id: &str,
    status: Status,
) -> Result<Complaint> {
    let now = Utc::now();
    let resolved_at = status.is_completed().then_some(now);

    sqlx::query_as::<_, Complaint>(
        r#"
        UPDATE complaints
        SET status = ?, updated_at = ?, resolved_at = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(status)
    .bind(now)
    .bind(resolved_at)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Complaint",
        id: id.to_string(),
    })
}

/// List complaints updated strictly after `since`, most recently updated
/// first, optionally restricted to one assigned department.
pub async fn list_updated_since(
    pool: &SqlitePool,
    since: DateTime<Utc>,
    department: Option<&str>,
) -> Result<Vec<Complaint>> {
    let complaints = match department {
        Some(dept) => {
            sqlx::query_as::<_, Complaint>(
                r#"
                SELECT * FROM complaints
                WHERE updated_at > ? AND assigned_to = ?
                ORDER BY updated_at DESC
                "#,
            )
            .bind(since)
            .bind(dept)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Complaint>(
                r#"
                SELECT * FROM complaints
                WHERE updated_at > ?
                ORDER BY updated_at DESC
                "#,
            )
            .bind(since)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(complaints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SubmissionMeta;
    use crate::Database;
    use taxonomy::Priority;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    fn sample(email: &str, phone: Option<&str>, assigned_to: &str) -> NewComplaint {
        NewComplaint {
            title: "Dirty coach".to_string(),
            description: "Litter everywhere in S4.".to_string(),
            email: email.to_string(),
            phone: phone.map(str::to_string),
            location: "Coach S4".to_string(),
            train_number: None,
            journey_date: None,
            pnr_number: None,
            detected_category: Some("Cleanliness".to_string()),
            detected_subcategory: Some("Coach Cleanliness".to_string()),
            assigned_to: assigned_to.to_string(),
            confidence_score: Some(0.8),
            priority: Priority::Medium,
            metadata: SubmissionMeta::default(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_number_and_defaults() {
        let db = test_db().await;

        let complaint = create_complaint(db.pool(), &sample("a@example.com", None, "Housekeeping"))
            .await
            .unwrap();

        assert!(complaint.complaint_number.starts_with("RWC"));
        // "RWC" + YYYYMMDD + 6-digit sequence
        assert_eq!(complaint.complaint_number.len(), 17);
        assert_eq!(complaint.status, Status::Submitted);
        assert!(complaint.resolved_at.is_none());
        assert_eq!(complaint.metadata, SubmissionMeta::default());
        assert_eq!(complaint.created_at, complaint.updated_at);
    }

    #[tokio::test]
    async fn test_complaint_numbers_are_sequential_per_day() {
        let db = test_db().await;

        let first = create_complaint(db.pool(), &sample("a@example.com", None, "Housekeeping"))
            .await
            .unwrap();
        let second = create_complaint(db.pool(), &sample("b@example.com", None, "Housekeeping"))
            .await
            .unwrap();

        assert_ne!(first.complaint_number, second.complaint_number);
        let first_seq: u32 = first.complaint_number[11..].parse().unwrap();
        let second_seq: u32 = second.complaint_number[11..].parse().unwrap();
        assert_eq!(second_seq, first_seq + 1);
    }

    #[tokio::test]
    async fn test_get_by_number_and_not_found() {
        let db = test_db().await;

        let complaint = create_complaint(db.pool(), &sample("a@example.com", None, "Housekeeping"))
            .await
            .unwrap();

        let fetched = get_complaint_by_number(db.pool(), &complaint.complaint_number)
            .await
            .unwrap();
        assert_eq!(fetched.id, complaint.id);

        let missing = get_complaint_by_number(db.pool(), "RWC19990101000001").await;
        assert!(matches!(missing, Err(DatabaseError::NotFound { .. })));

        let missing = get_complaint(db.pool(), "no-such-id").await;
        assert!(matches!(missing, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_contact_filters() {
        let db = test_db().await;

        // Matches email and phone, email only, phone only, neither.
        create_complaint(
            db.pool(),
            &sample("asha@example.com", Some("+911111111111"), "Housekeeping"),
        )
        .await
        .unwrap();
        create_complaint(
            db.pool(),
            &sample("asha@example.com", Some("+912222222222"), "Housekeeping"),
        )
        .await
        .unwrap();
        create_complaint(
            db.pool(),
            &sample("vikram@example.com", Some("+911111111111"), "Housekeeping"),
        )
        .await
        .unwrap();
        create_complaint(db.pool(), &sample("other@example.com", None, "Housekeeping"))
            .await
            .unwrap();

        let by_email = list_complaints_by_contact(
            db.pool(),
            &ContactFilter::Email("asha@example.com".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(by_email.len(), 2);

        let by_phone = list_complaints_by_contact(
            db.pool(),
            &ContactFilter::Phone("+911111111111".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(by_phone.len(), 2);

        // Union, with the complaint matching both fields appearing once.
        let by_either = list_complaints_by_contact(
            db.pool(),
            &ContactFilter::Either {
                email: "asha@example.com".to_string(),
                phone: "+911111111111".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(by_either.len(), 3);
    }

    #[tokio::test]
    async fn test_department_matching() {
        let db = test_db().await;

        create_complaint(db.pool(), &sample("a@example.com", None, "Electrical"))
            .await
            .unwrap();
        create_complaint(
            db.pool(),
            &sample("b@example.com", None, "Electrical Maintenance"),
        )
        .await
        .unwrap();

        let exact =
            list_complaints_by_department(db.pool(), "Electrical", DepartmentMatch::Exact)
                .await
                .unwrap();
        assert_eq!(exact.len(), 1);

        let contains =
            list_complaints_by_department(db.pool(), "Electrical", DepartmentMatch::Contains)
                .await
                .unwrap();
        assert_eq!(contains.len(), 2);
    }

    #[tokio::test]
    async fn test_update_status_sets_and_clears_resolved_at() {
        let db = test_db().await;

        let complaint = create_complaint(db.pool(), &sample("a@example.com", None, "Housekeeping"))
            .await
            .unwrap();

        let in_progress =
            update_complaint_status(db.pool(), &complaint.id, Status::InProgress)
                .await
                .unwrap();
        assert_eq!(in_progress.status, Status::InProgress);
        assert!(in_progress.resolved_at.is_none());
        assert!(in_progress.updated_at > complaint.updated_at);

        let resolved = update_complaint_status(db.pool(), &complaint.id, Status::Resolved)
            .await
            .unwrap();
        assert!(resolved.resolved_at.is_some());

        let closed = update_complaint_status(db.pool(), &complaint.id, Status::Closed)
            .await
            .unwrap();
        assert!(closed.resolved_at.is_some());

        // Reopening clears the resolution timestamp.
        let reopened = update_complaint_status(db.pool(), &complaint.id, Status::Escalated)
            .await
            .unwrap();
        assert!(reopened.resolved_at.is_none());
    }

    #[tokio::test]
    async fn test_update_status_missing_complaint() {
        let db = test_db().await;

        let result = update_complaint_status(db.pool(), "no-such-id", Status::Resolved).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_updated_since() {
        let db = test_db().await;

        let before = Utc::now();
        let first = create_complaint(db.pool(), &sample("a@example.com", None, "Electrical"))
            .await
            .unwrap();
        create_complaint(db.pool(), &sample("b@example.com", None, "Housekeeping"))
            .await
            .unwrap();

        let all = list_updated_since(db.pool(), before, None).await.unwrap();
        assert_eq!(all.len(), 2);

        let checkpoint = Utc::now();
        update_complaint_status(db.pool(), &first.id, Status::InProgress)
            .await
            .unwrap();

        let recent = list_updated_since(db.pool(), checkpoint, None).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, first.id);

        let electrical = list_updated_since(db.pool(), before, Some("Electrical"))
            .await
            .unwrap();
        assert_eq!(electrical.len(), 1);
        assert_eq!(electrical[0].id, first.id);

        let none = list_updated_since(db.pool(), Utc::now(), None).await.unwrap();
        assert!(none.is_empty());
    }
}
