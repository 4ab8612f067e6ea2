//! Complaint reference handling.
//!
//! Callers address complaints either by the internal UUID or by the public
//! complaint number. [`ComplaintRef::parse`] classifies a raw reference
//! once, and [`resolve`] turns it into the internal id that dependent
//! tables require.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};

/// A classified complaint reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplaintRef {
    /// Internal UUID primary key.
    Internal(String),
    /// Public complaint number (e.g., "RWC20250720000005").
    Public(String),
}

impl ComplaintRef {
    /// Classify a raw reference. Anything that parses as a UUID is the
    /// internal id; everything else is treated as a public number.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if Uuid::parse_str(trimmed).is_ok() {
            ComplaintRef::Internal(trimmed.to_string())
        } else {
            ComplaintRef::Public(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ComplaintRef::Internal(id) => id,
            ComplaintRef::Public(number) => number,
        }
    }
}

impl std::fmt::Display for ComplaintRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve a reference to the internal complaint id, verifying that the
/// complaint exists.
pub async fn resolve(pool: &SqlitePool, reference: &ComplaintRef) -> Result<String> {
    let id = match reference {
        ComplaintRef::Internal(id) => {
            sqlx::query_scalar::<_, String>(
                r#"
                SELECT id FROM complaints
                WHERE id = ?
                "#,
            )
            .bind(id)
            .fetch_optional(pool)
            .await?
        }
        ComplaintRef::Public(number) => {
            sqlx::query_scalar::<_, String>(
                r#"
                SELECT id FROM complaints
                WHERE complaint_number = ?
                "#,
            )
            .bind(number)
            .fetch_optional(pool)
            .await?
        }
    };

    id.ok_or_else(|| DatabaseError::NotFound {
        entity: "Complaint",
        id: reference.as_str().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewComplaint, SubmissionMeta};
    use crate::{complaint, Database};
    use taxonomy::Priority;

    #[test]
    fn test_parse_classifies_uuids_as_internal() {
        let reference = ComplaintRef::parse("c27fb365-0c84-4cf2-8555-814bb065e448");
        assert!(matches!(reference, ComplaintRef::Internal(_)));

        let reference = ComplaintRef::parse(" RWC20250720000005 ");
        assert_eq!(
            reference,
            ComplaintRef::Public("RWC20250720000005".to_string())
        );
    }

    #[tokio::test]
    async fn test_resolve_both_forms() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();

        let new = NewComplaint {
            title: "Ticket not confirmed".to_string(),
            description: "Waitlisted ticket never moved despite chart preparation.".to_string(),
            email: "meera@example.com".to_string(),
            phone: None,
            location: "Not specified".to_string(),
            train_number: None,
            journey_date: None,
            pnr_number: None,
            detected_category: Some("Ticketing & Reservation".to_string()),
            detected_subcategory: Some("Booking Issues".to_string()),
            assigned_to: "Commercial".to_string(),
            confidence_score: Some(0.75),
            priority: Priority::Medium,
            metadata: SubmissionMeta::default(),
        };
        let complaint = complaint::create_complaint(db.pool(), &new).await.unwrap();

        let by_id = resolve(db.pool(), &ComplaintRef::parse(&complaint.id))
            .await
            .unwrap();
        assert_eq!(by_id, complaint.id);

        let by_number = resolve(db.pool(), &ComplaintRef::parse(&complaint.complaint_number))
            .await
            .unwrap();
        assert_eq!(by_number, complaint.id);

        let missing = resolve(db.pool(), &ComplaintRef::parse("RWC19990101000001")).await;
        assert!(matches!(missing, Err(DatabaseError::NotFound { .. })));
    }
}
