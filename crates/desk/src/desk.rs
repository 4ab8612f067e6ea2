//! The complaint desk: every workflow the customer and staff surfaces use.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use database::models::{
    Communication, Complaint, NewCommunication, NewHistoryEntry, SenderKind, Status,
};
use database::{
    communication, complaint, history, reference, search, stats, ComplaintRef, ComplaintStats,
    Database, SearchFilter,
};
use serde::Serialize;
use taxonomy::Analysis;

use crate::error::Result;
use crate::export::{export_row, ExportRow};
use crate::followup::{run_follow_ups, FollowUp, FollowUpReport};
use crate::submit::{build_new_complaint, ComplaintForm, JourneyDetails};
use crate::validation::{
    validate_email, validate_phone, validate_required, MAX_DESCRIPTION_LENGTH, MAX_MESSAGE_LENGTH,
    MAX_NAME_LENGTH, MAX_TITLE_LENGTH,
};
use crate::view::{self, ComplaintDetail, ComplaintSummary, MessageView, Viewer};
use crate::DeskError;

/// Result of a submission: the stored complaint plus the outcome of the
/// best-effort follow-up writes.
#[derive(Debug, Serialize)]
pub struct Submitted {
    pub complaint: Complaint,
    pub follow_ups: FollowUpReport,
}

/// Result of a status update.
#[derive(Debug, Serialize)]
pub struct Updated {
    pub complaint: Complaint,
    /// The status the complaint held before this update.
    pub old_status: Status,
    pub follow_ups: FollowUpReport,
}

/// Per-complaint outcome of a bulk status update.
#[derive(Debug, Clone, Serialize)]
pub struct BulkItem {
    pub reference: String,
    pub success: bool,
    pub error: Option<String>,
}

/// Outcome of a bulk status update. Items are processed sequentially and a
/// failure does not stop the rest.
#[derive(Debug, Serialize)]
pub struct BulkOutcome {
    pub results: Vec<BulkItem>,
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

impl BulkOutcome {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Complaints updated since a checkpoint.
#[derive(Debug, Serialize)]
pub struct PollResult {
    pub complaints: Vec<Complaint>,
    pub has_updates: bool,
    pub update_count: usize,
}

/// External messages created since a checkpoint, across all complaints.
#[derive(Debug, Serialize)]
pub struct NewMessages {
    pub messages: Vec<Communication>,
    pub count: usize,
}

/// The complaint desk service.
///
/// Validation always runs before any query; records that do not exist
/// surface as [`DeskError::NotFound`]; secondary writes never overturn a
/// primary outcome (see [`crate::followup`]).
#[derive(Debug, Clone)]
pub struct Desk {
    db: Database,
}

impl Desk {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// The underlying store, for health checks.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Submit a complaint.
    ///
    /// The stored record takes its routing from `analysis` when present and
    /// otherwise falls to the general grievance defaults. After the insert,
    /// a system notice and the initial history entries are written
    /// best-effort.
    pub async fn submit(
        &self,
        form: &ComplaintForm,
        analysis: Option<&Analysis>,
        journey: Option<&JourneyDetails>,
    ) -> Result<Submitted> {
        validate_required("title", &form.title, MAX_TITLE_LENGTH)?;
        validate_required("description", &form.description, MAX_DESCRIPTION_LENGTH)?;
        validate_email(&form.email)?;
        if let Some(phone) = form.phone.as_deref() {
            if !phone.trim().is_empty() {
                validate_phone(phone)?;
            }
        }

        let new = build_new_complaint(form, analysis, journey);
        let complaint = complaint::create_complaint(self.db.pool(), &new).await?;

        let mut follow_ups = vec![
            FollowUp::communication(
                "submission notice",
                NewCommunication {
                    complaint_id: complaint.id.clone(),
                    sender_type: SenderKind::System,
                    sender_name: "RailCare System".to_string(),
                    message: format!(
                        "Complaint submitted successfully and assigned to {} for processing.",
                        complaint.assigned_to
                    ),
                    is_internal: false,
                },
            ),
            FollowUp::history(
                "submission record",
                NewHistoryEntry {
                    complaint_id: complaint.id.clone(),
                    action: "Complaint Submitted".to_string(),
                    details: "Complaint received and logged.".to_string(),
                    remark: None,
                    old_status: None,
                    new_status: Some(Status::Submitted),
                    changed_by_name: "System".to_string(),
                    completed: false,
                },
            ),
        ];
        if let Some(category) = complaint.detected_category.as_deref() {
            follow_ups.push(FollowUp::history(
                "categorization record",
                NewHistoryEntry {
                    complaint_id: complaint.id.clone(),
                    action: "Category Assigned".to_string(),
                    details: format!(
                        "Complaint automatically categorized as \"{}\" and assigned to {}.",
                        category, complaint.assigned_to
                    ),
                    remark: None,
                    old_status: None,
                    new_status: None,
                    changed_by_name: "AI System".to_string(),
                    completed: false,
                },
            ));
        }
        let report = run_follow_ups(&self.db, follow_ups).await;

        tracing::info!(
            complaint_number = %complaint.complaint_number,
            assigned_to = %complaint.assigned_to,
            priority = %complaint.priority,
            "Complaint submitted"
        );

        Ok(Submitted {
            complaint,
            follow_ups: report,
        })
    }

    /// Full view of one complaint, addressed by its public number.
    pub async fn complaint_detail(&self, number: &str, viewer: Viewer) -> Result<ComplaintDetail> {
        validate_required("complaint number", number, MAX_NAME_LENGTH)?;

        let complaint = complaint::get_complaint_by_number(self.db.pool(), number.trim()).await?;
        let entries = history::list_history(self.db.pool(), &complaint.id).await?;
        let messages =
            communication::list_communications(self.db.pool(), &complaint.id, None, false).await?;

        Ok(view::complaint_detail(&complaint, &entries, &messages, viewer))
    }

    /// Complaints filed under an email address and/or phone number. With
    /// both given, either match qualifies; a complaint matching both is
    /// returned once.
    pub async fn complaints_by_contact(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Vec<ComplaintSummary>> {
        let email = email.map(str::trim).filter(|value| !value.is_empty());
        let phone = phone.map(str::trim).filter(|value| !value.is_empty());

        let filter = match (email, phone) {
            (Some(email), Some(phone)) => {
                validate_email(email)?;
                validate_phone(phone)?;
                complaint::ContactFilter::Either {
                    email: email.to_lowercase(),
                    phone: phone.to_string(),
                }
            }
            (Some(email), None) => {
                validate_email(email)?;
                complaint::ContactFilter::Email(email.to_lowercase())
            }
            (None, Some(phone)) => {
                validate_phone(phone)?;
                complaint::ContactFilter::Phone(phone.to_string())
            }
            (None, None) => {
                return Err(DeskError::Validation(
                    "Provide an email address or a phone number to look up complaints".to_string(),
                ))
            }
        };

        let complaints = complaint::list_complaints_by_contact(self.db.pool(), &filter).await?;
        Ok(complaints.iter().map(view::summarize).collect())
    }

    /// All complaints, newest first. Staff surface.
    pub async fn all_complaints(&self) -> Result<Vec<Complaint>> {
        Ok(complaint::list_complaints(self.db.pool()).await?)
    }

    /// Complaints assigned to a department. With `include_sub_departments`
    /// the department name may appear anywhere in the assignment; otherwise
    /// the match is exact.
    pub async fn complaints_by_department(
        &self,
        department: &str,
        include_sub_departments: bool,
    ) -> Result<Vec<Complaint>> {
        validate_required("department", department, MAX_NAME_LENGTH)?;

        let matching = if include_sub_departments {
            complaint::DepartmentMatch::Contains
        } else {
            complaint::DepartmentMatch::Exact
        };
        Ok(
            complaint::list_complaints_by_department(self.db.pool(), department.trim(), matching)
                .await?,
        )
    }

    /// Update a complaint's status.
    ///
    /// The reference may be the internal id or the public number. The
    /// history entry records the status the complaint actually held before
    /// the update; the customer-visible notice and the history entry are
    /// written best-effort.
    pub async fn update_status(
        &self,
        reference: &str,
        status: Status,
        remark: Option<&str>,
        staff_name: &str,
    ) -> Result<Updated> {
        validate_required("complaint reference", reference, MAX_NAME_LENGTH)?;
        validate_required("staff name", staff_name, MAX_NAME_LENGTH)?;
        let remark = remark
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        if let Some(remark) = remark.as_deref() {
            validate_required("remark", remark, MAX_MESSAGE_LENGTH)?;
        }

        let id = reference::resolve(self.db.pool(), &ComplaintRef::parse(reference)).await?;
        let before = complaint::get_complaint(self.db.pool(), &id).await?;
        let updated = complaint::update_complaint_status(self.db.pool(), &id, status).await?;

        let notice = match remark.as_deref() {
            Some(remark) => format!("Status updated to \"{}\". Remark: {}", status, remark),
            None => format!("Status updated to \"{}\"", status),
        };
        let follow_ups = vec![
            FollowUp::history(
                "status change record",
                NewHistoryEntry {
                    complaint_id: id.clone(),
                    action: "Investigation & Resolution".to_string(),
                    details: format!("Status updated to \"{}\"", status),
                    remark,
                    old_status: Some(before.status),
                    new_status: Some(status),
                    changed_by_name: staff_name.trim().to_string(),
                    completed: status.is_completed(),
                },
            ),
            FollowUp::communication(
                "status change notice",
                NewCommunication {
                    complaint_id: id,
                    sender_type: SenderKind::Staff,
                    sender_name: "Support Agent".to_string(),
                    message: notice,
                    is_internal: false,
                },
            ),
        ];
        let report = run_follow_ups(&self.db, follow_ups).await;

        tracing::info!(
            complaint_number = %updated.complaint_number,
            from = %before.status,
            to = %status,
            by = %staff_name.trim(),
            "Complaint status updated"
        );

        Ok(Updated {
            complaint: updated,
            old_status: before.status,
            follow_ups: report,
        })
    }

    /// Apply one status update to several complaints, sequentially. A
    /// failing item is recorded and the rest still run.
    pub async fn bulk_update_status(
        &self,
        references: &[String],
        status: Status,
        remark: Option<&str>,
        staff_name: &str,
    ) -> Result<BulkOutcome> {
        validate_required("staff name", staff_name, MAX_NAME_LENGTH)?;

        let mut results = Vec::with_capacity(references.len());
        for reference in references {
            let outcome = self
                .update_status(reference, status, remark, staff_name)
                .await;
            results.push(match outcome {
                Ok(_) => BulkItem {
                    reference: reference.clone(),
                    success: true,
                    error: None,
                },
                Err(err) => BulkItem {
                    reference: reference.clone(),
                    success: false,
                    error: Some(err.to_string()),
                },
            });
        }

        let total = results.len();
        let successful = results.iter().filter(|item| item.success).count();
        Ok(BulkOutcome {
            results,
            total,
            successful,
            failed: total - successful,
        })
    }

    /// Record a customer message on a complaint thread.
    pub async fn send_user_message(&self, reference: &str, message: &str) -> Result<Communication> {
        validate_required("complaint reference", reference, MAX_NAME_LENGTH)?;
        validate_required("message", message, MAX_MESSAGE_LENGTH)?;

        let id = reference::resolve(self.db.pool(), &ComplaintRef::parse(reference)).await?;
        Ok(communication::append_communication(
            self.db.pool(),
            &NewCommunication {
                complaint_id: id,
                sender_type: SenderKind::User,
                sender_name: "Customer".to_string(),
                message: message.trim().to_string(),
                is_internal: false,
            },
        )
        .await?)
    }

    /// Record a staff message on a complaint thread. Internal messages are
    /// never shown to customers.
    pub async fn send_staff_message(
        &self,
        reference: &str,
        message: &str,
        staff_name: &str,
        is_internal: bool,
    ) -> Result<Communication> {
        validate_required("complaint reference", reference, MAX_NAME_LENGTH)?;
        validate_required("message", message, MAX_MESSAGE_LENGTH)?;
        validate_required("staff name", staff_name, MAX_NAME_LENGTH)?;

        let id = reference::resolve(self.db.pool(), &ComplaintRef::parse(reference)).await?;
        Ok(communication::append_communication(
            self.db.pool(),
            &NewCommunication {
                complaint_id: id,
                sender_type: SenderKind::Staff,
                sender_name: staff_name.trim().to_string(),
                message: message.trim().to_string(),
                is_internal,
            },
        )
        .await?)
    }

    /// A complaint's messages for a viewer, oldest first, optionally only
    /// those after `since`. Staff also see internal notes.
    pub async fn recent_messages(
        &self,
        reference: &str,
        since: Option<DateTime<Utc>>,
        viewer: Viewer,
    ) -> Result<Vec<MessageView>> {
        validate_required("complaint reference", reference, MAX_NAME_LENGTH)?;

        let id = reference::resolve(self.db.pool(), &ComplaintRef::parse(reference)).await?;
        let include_internal = viewer == Viewer::Staff;
        let messages =
            communication::list_communications(self.db.pool(), &id, since, include_internal)
                .await?;
        Ok(messages
            .iter()
            .map(|message| view::message_view(message, viewer))
            .collect())
    }

    /// Leave an internal note that a staff member has read the thread.
    pub async fn mark_messages_viewed(&self, reference: &str, staff_name: &str) -> Result<()> {
        validate_required("complaint reference", reference, MAX_NAME_LENGTH)?;
        validate_required("staff name", staff_name, MAX_NAME_LENGTH)?;

        let id = reference::resolve(self.db.pool(), &ComplaintRef::parse(reference)).await?;
        communication::append_communication(
            self.db.pool(),
            &NewCommunication {
                complaint_id: id,
                sender_type: SenderKind::System,
                sender_name: "System".to_string(),
                message: format!("Messages viewed by {}", staff_name.trim()),
                is_internal: true,
            },
        )
        .await?;
        Ok(())
    }

    /// Search complaints. Staff surface.
    pub async fn search(&self, filter: &SearchFilter) -> Result<Vec<Complaint>> {
        Ok(search::search_complaints(self.db.pool(), filter).await?)
    }

    /// Complaints updated since a checkpoint, optionally for one department.
    pub async fn poll_updates(
        &self,
        since: DateTime<Utc>,
        department: Option<&str>,
    ) -> Result<PollResult> {
        let complaints = complaint::list_updated_since(self.db.pool(), since, department).await?;
        Ok(PollResult {
            has_updates: !complaints.is_empty(),
            update_count: complaints.len(),
            complaints,
        })
    }

    /// External messages created since a checkpoint, across all complaints.
    pub async fn check_new_messages(&self, since: DateTime<Utc>) -> Result<NewMessages> {
        let messages = communication::list_new_external_since(self.db.pool(), since).await?;
        Ok(NewMessages {
            count: messages.len(),
            messages,
        })
    }

    /// External message counts per complaint, keyed by internal id.
    pub async fn message_counts(&self) -> Result<HashMap<String, i64>> {
        Ok(communication::message_counts(self.db.pool())
            .await?
            .into_iter()
            .collect())
    }

    /// The most recent staff remark per complaint, keyed by internal id.
    pub async fn latest_remarks(&self) -> Result<HashMap<String, String>> {
        Ok(history::latest_remarks(self.db.pool())
            .await?
            .into_iter()
            .collect())
    }

    /// Flat export of the complaints matching a filter.
    pub async fn export(&self, filter: &SearchFilter) -> Result<Vec<ExportRow>> {
        let complaints = search::search_complaints(self.db.pool(), filter).await?;
        Ok(complaints.iter().map(export_row).collect())
    }

    /// Aggregate statistics, exactly as the store reports them.
    pub async fn stats(&self) -> Result<ComplaintStats> {
        Ok(stats::complaint_stats(self.db.pool()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxonomy::classify;

    async fn test_desk() -> Desk {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        Desk::new(db)
    }

    fn ac_form() -> ComplaintForm {
        ComplaintForm {
            title: "AC not working in coach B2".to_string(),
            description: "The air conditioning stopped an hour ago and the temperature is unbearable.".to_string(),
            email: "asha@example.com".to_string(),
            phone: Some("+91 98765 43210".to_string()),
            location: Some("Coach B2".to_string()),
            is_urgent: false,
            files_count: 0,
        }
    }

    fn plain_form(email: &str) -> ComplaintForm {
        ComplaintForm {
            title: "General grievance".to_string(),
            description: "Something was not right on my trip.".to_string(),
            email: email.to_string(),
            phone: None,
            location: None,
            is_urgent: false,
            files_count: 0,
        }
    }

    #[tokio::test]
    async fn test_submit_with_categorization() {
        let desk = test_desk().await;
        let form = ac_form();
        let analysis = classify(&form.title, &form.description).unwrap();

        let submitted = desk.submit(&form, Some(&analysis), None).await.unwrap();
        let complaint = &submitted.complaint;

        assert_eq!(complaint.status, Status::Submitted);
        assert_eq!(complaint.priority, taxonomy::Priority::High);
        assert_eq!(complaint.assigned_to, "Electrical");
        assert_eq!(complaint.detected_category.as_deref(), Some("Coach Maintenance"));
        assert!(complaint.complaint_number.starts_with("RWC"));
        // Notice + submission record + categorization record.
        assert_eq!(submitted.follow_ups.attempted, 3);
        assert!(submitted.follow_ups.all_succeeded());

        let detail = desk
            .complaint_detail(&complaint.complaint_number, Viewer::Customer)
            .await
            .unwrap();
        assert_eq!(detail.id, complaint.complaint_number);
        assert_eq!(detail.history.len(), 2);
        assert_eq!(detail.history[0].action, "Complaint Submitted");
        assert_eq!(detail.history[1].action, "Category Assigned");
        assert_eq!(detail.messages.len(), 1);
        assert_eq!(detail.messages[0].sender_label, "RailCare System");
        assert!(detail.messages[0].message.contains("assigned to Electrical"));
    }

    #[tokio::test]
    async fn test_submit_without_analysis_uses_defaults() {
        let desk = test_desk().await;

        let submitted = desk
            .submit(&plain_form("vikram@example.com"), None, None)
            .await
            .unwrap();
        let complaint = &submitted.complaint;

        assert_eq!(complaint.assigned_to, "General Grievance Cell");
        assert_eq!(complaint.priority, taxonomy::Priority::Medium);
        assert_eq!(complaint.location, "Not specified");
        assert!(!complaint.metadata.auto_assigned);
        // No categorization record without a detected category.
        assert_eq!(submitted.follow_ups.attempted, 2);
    }

    #[tokio::test]
    async fn test_submit_urgent_flag_wins() {
        let desk = test_desk().await;
        let mut form = ac_form();
        form.is_urgent = true;
        let analysis = classify(&form.title, &form.description).unwrap();

        let submitted = desk.submit(&form, Some(&analysis), None).await.unwrap();
        assert_eq!(submitted.complaint.priority, taxonomy::Priority::Urgent);
        assert!(submitted.complaint.metadata.is_urgent);
    }

    #[tokio::test]
    async fn test_submit_normalizes_pnr_placeholder() {
        let desk = test_desk().await;
        let journey = JourneyDetails {
            train_number: Some("12951".to_string()),
            journey_date: None,
            pnr_number: Some("N/A".to_string()),
        };

        let submitted = desk
            .submit(&plain_form("meera@example.com"), None, Some(&journey))
            .await
            .unwrap();
        assert_eq!(submitted.complaint.pnr_number, None);
        assert!(!submitted.complaint.metadata.has_pnr);
        assert_eq!(submitted.complaint.train_number.as_deref(), Some("12951"));
    }

    #[tokio::test]
    async fn test_submit_validation_precedes_writes() {
        let desk = test_desk().await;

        let mut form = ac_form();
        form.title = "   ".to_string();
        let err = desk.submit(&form, None, None).await.unwrap_err();
        assert!(matches!(err, DeskError::Validation(_)));

        let mut form = ac_form();
        form.email = "not-an-email".to_string();
        let err = desk.submit(&form, None, None).await.unwrap_err();
        assert!(matches!(err, DeskError::Validation(_)));

        assert!(desk.all_complaints().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_detail_not_found_is_distinct() {
        let desk = test_desk().await;
        let err = desk
            .complaint_detail("RWC19990101000001", Viewer::Customer)
            .await
            .unwrap_err();
        assert!(matches!(err, DeskError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_contact_lookup_union_and_validation() {
        let desk = test_desk().await;

        let mut first = plain_form("asha@example.com");
        first.phone = Some("+911111111111".to_string());
        desk.submit(&first, None, None).await.unwrap();

        desk.submit(&plain_form("asha@example.com"), None, None)
            .await
            .unwrap();

        let mut third = plain_form("vikram@example.com");
        third.phone = Some("+911111111111".to_string());
        desk.submit(&third, None, None).await.unwrap();

        desk.submit(&plain_form("other@example.com"), None, None)
            .await
            .unwrap();

        let by_both = desk
            .complaints_by_contact(Some("asha@example.com"), Some("+911111111111"))
            .await
            .unwrap();
        assert_eq!(by_both.len(), 3);
        assert!(by_both.iter().all(|summary| summary.id.starts_with("RWC")));

        let by_phone = desk
            .complaints_by_contact(None, Some("+911111111111"))
            .await
            .unwrap();
        assert_eq!(by_phone.len(), 2);

        let err = desk.complaints_by_contact(None, None).await.unwrap_err();
        assert!(matches!(err, DeskError::Validation(_)));

        let err = desk
            .complaints_by_contact(Some("bad-email"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DeskError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_status_records_true_transition() {
        let desk = test_desk().await;
        let form = ac_form();
        let analysis = classify(&form.title, &form.description).unwrap();
        let submitted = desk.submit(&form, Some(&analysis), None).await.unwrap();
        let number = submitted.complaint.complaint_number.clone();

        let first = desk
            .update_status(&number, Status::InProgress, None, "S. Verma")
            .await
            .unwrap();
        assert_eq!(first.old_status, Status::Submitted);
        assert!(first.complaint.resolved_at.is_none());

        let second = desk
            .update_status(
                &number,
                Status::Resolved,
                Some("Compressor replaced at Jhansi."),
                "S. Verma",
            )
            .await
            .unwrap();
        assert_eq!(second.old_status, Status::InProgress);
        assert_eq!(second.complaint.status, Status::Resolved);
        assert!(second.complaint.resolved_at.is_some());
        assert!(second.follow_ups.all_succeeded());

        let detail = desk.complaint_detail(&number, Viewer::Customer).await.unwrap();
        let resolution = detail
            .history
            .iter()
            .find(|entry| entry.new_status == Some(Status::Resolved))
            .unwrap();
        assert_eq!(resolution.action, "Investigation & Resolution");
        assert_eq!(resolution.old_status, Some(Status::InProgress));
        assert_eq!(resolution.changed_by_name, "S. Verma");
        assert!(resolution.completed);

        let last_message = detail.messages.last().unwrap();
        assert_eq!(last_message.sender_label, "Support Agent");
        assert!(last_message.message.contains("Remark: Compressor replaced"));
    }

    #[tokio::test]
    async fn test_update_status_requires_inputs() {
        let desk = test_desk().await;

        let err = desk
            .update_status("", Status::Resolved, None, "S. Verma")
            .await
            .unwrap_err();
        assert!(matches!(err, DeskError::Validation(_)));

        let err = desk
            .update_status("RWC20250720000001", Status::Resolved, None, "  ")
            .await
            .unwrap_err();
        assert!(matches!(err, DeskError::Validation(_)));

        let err = desk
            .update_status("RWC19990101000001", Status::Resolved, None, "S. Verma")
            .await
            .unwrap_err();
        assert!(matches!(err, DeskError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_status_accepts_internal_id() {
        let desk = test_desk().await;
        let submitted = desk
            .submit(&plain_form("meera@example.com"), None, None)
            .await
            .unwrap();

        let updated = desk
            .update_status(&submitted.complaint.id, Status::Escalated, None, "R. Iyer")
            .await
            .unwrap();
        assert_eq!(updated.complaint.status, Status::Escalated);
    }

    #[tokio::test]
    async fn test_bulk_update_partial_failure() {
        let desk = test_desk().await;
        let first = desk
            .submit(&plain_form("a@example.com"), None, None)
            .await
            .unwrap();
        let second = desk
            .submit(&plain_form("b@example.com"), None, None)
            .await
            .unwrap();

        let references = vec![
            first.complaint.complaint_number.clone(),
            "RWC19990101000001".to_string(),
            second.complaint.complaint_number.clone(),
        ];
        let outcome = desk
            .bulk_update_status(&references, Status::InProgress, None, "S. Verma")
            .await
            .unwrap();

        assert_eq!(outcome.total, 3);
        assert_eq!(outcome.successful, 2);
        assert_eq!(outcome.failed, 1);
        assert!(!outcome.all_succeeded());
        assert!(outcome.results[0].success);
        assert!(!outcome.results[1].success);
        assert!(outcome.results[1].error.as_deref().unwrap().contains("not found"));
        assert!(outcome.results[2].success);
    }

    #[tokio::test]
    async fn test_messaging_labels_per_viewer() {
        let desk = test_desk().await;
        let submitted = desk
            .submit(&plain_form("asha@example.com"), None, None)
            .await
            .unwrap();
        let number = submitted.complaint.complaint_number.clone();

        desk.send_user_message(&number, "Any progress on this?")
            .await
            .unwrap();
        desk.send_staff_message(&number, "Looking into it today.", "S. Verma", false)
            .await
            .unwrap();

        let customer_view = desk
            .recent_messages(&number, None, Viewer::Customer)
            .await
            .unwrap();
        let labels: Vec<&str> = customer_view
            .iter()
            .map(|m| m.sender_label.as_str())
            .collect();
        assert_eq!(labels, ["RailCare System", "You", "Support Agent"]);

        let staff_view = desk
            .recent_messages(&number, None, Viewer::Staff)
            .await
            .unwrap();
        let labels: Vec<&str> = staff_view.iter().map(|m| m.sender_label.as_str()).collect();
        assert_eq!(labels, ["System", "Customer", "Support Agent"]);
    }

    #[tokio::test]
    async fn test_internal_notes_stay_internal() {
        let desk = test_desk().await;
        let submitted = desk
            .submit(&plain_form("asha@example.com"), None, None)
            .await
            .unwrap();
        let number = submitted.complaint.complaint_number.clone();

        desk.send_staff_message(&number, "Needs RPF escort at next halt.", "R. Iyer", true)
            .await
            .unwrap();
        desk.mark_messages_viewed(&number, "R. Iyer").await.unwrap();

        let detail = desk.complaint_detail(&number, Viewer::Customer).await.unwrap();
        assert_eq!(detail.messages.len(), 1); // submission notice only
        assert!(detail.messages.iter().all(|m| !m.is_internal));

        let customer_view = desk
            .recent_messages(&number, None, Viewer::Customer)
            .await
            .unwrap();
        assert_eq!(customer_view.len(), 1);

        let staff_view = desk
            .recent_messages(&number, None, Viewer::Staff)
            .await
            .unwrap();
        assert_eq!(staff_view.len(), 3);
        assert!(staff_view
            .iter()
            .any(|m| m.is_internal && m.message == "Messages viewed by R. Iyer"));
    }

    #[tokio::test]
    async fn test_recent_messages_since_checkpoint() {
        let desk = test_desk().await;
        let submitted = desk
            .submit(&plain_form("asha@example.com"), None, None)
            .await
            .unwrap();
        let number = submitted.complaint.complaint_number.clone();

        let checkpoint = Utc::now();
        desk.send_user_message(&number, "Hello?").await.unwrap();

        let fresh = desk
            .recent_messages(&number, Some(checkpoint), Viewer::Staff)
            .await
            .unwrap();
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].message, "Hello?");
    }

    #[tokio::test]
    async fn test_poll_updates_by_department() {
        let desk = test_desk().await;
        let before = Utc::now();

        desk.submit(&plain_form("asha@example.com"), None, None)
            .await
            .unwrap();

        let any = desk.poll_updates(before, None).await.unwrap();
        assert!(any.has_updates);
        assert_eq!(any.update_count, 1);

        let general = desk
            .poll_updates(before, Some("General Grievance Cell"))
            .await
            .unwrap();
        assert_eq!(general.update_count, 1);

        let electrical = desk.poll_updates(before, Some("Electrical")).await.unwrap();
        assert!(!electrical.has_updates);
        assert!(electrical.complaints.is_empty());
    }

    #[tokio::test]
    async fn test_check_new_messages_counts_external_only() {
        let desk = test_desk().await;
        let checkpoint = Utc::now();

        let submitted = desk
            .submit(&plain_form("asha@example.com"), None, None)
            .await
            .unwrap();
        let number = submitted.complaint.complaint_number.clone();
        desk.send_user_message(&number, "First question").await.unwrap();
        desk.mark_messages_viewed(&number, "S. Verma").await.unwrap();

        let fresh = desk.check_new_messages(checkpoint).await.unwrap();
        // Submission notice + user message; the internal note is excluded.
        assert_eq!(fresh.count, 2);
    }

    #[tokio::test]
    async fn test_export_and_search() {
        let desk = test_desk().await;
        let form = ac_form();
        let analysis = classify(&form.title, &form.description).unwrap();
        desk.submit(&form, Some(&analysis), None).await.unwrap();
        desk.submit(&plain_form("no-phone@example.com"), None, None)
            .await
            .unwrap();

        let found = desk
            .search(&SearchFilter {
                keyword: Some("air conditioning".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);

        let rows = desk.export(&SearchFilter::default()).await.unwrap();
        assert_eq!(rows.len(), 2);
        let no_phone = rows
            .iter()
            .find(|row| row.email == "no-phone@example.com")
            .unwrap();
        assert_eq!(no_phone.phone, "N/A");
        assert!(no_phone.complaint_id.starts_with("RWC"));
    }

    #[tokio::test]
    async fn test_stats_returned_verbatim() {
        let desk = test_desk().await;
        let first = desk
            .submit(&plain_form("a@example.com"), None, None)
            .await
            .unwrap();
        desk.submit(&plain_form("b@example.com"), None, None)
            .await
            .unwrap();
        desk.update_status(
            &first.complaint.complaint_number,
            Status::Resolved,
            None,
            "S. Verma",
        )
        .await
        .unwrap();

        let stats = desk.stats().await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.open, 1);
        assert_eq!(stats.resolved, 1);
    }

    #[tokio::test]
    async fn test_message_counts_keyed_by_internal_id() {
        let desk = test_desk().await;
        let submitted = desk
            .submit(&plain_form("asha@example.com"), None, None)
            .await
            .unwrap();
        desk.send_user_message(&submitted.complaint.complaint_number, "Hi")
            .await
            .unwrap();

        let counts = desk.message_counts().await.unwrap();
        // Submission notice + user message.
        assert_eq!(counts[&submitted.complaint.id], 2);
    }

    #[tokio::test]
    async fn test_department_listing_modes() {
        let desk = test_desk().await;
        let analysis = Analysis {
            category: "Coach Maintenance".to_string(),
            subcategory: "Electrical Fittings".to_string(),
            department: "Electrical".to_string(),
            confidence: 0.85,
            matched_keywords: vec!["socket".to_string()],
        };
        desk.submit(&plain_form("a@example.com"), Some(&analysis), None)
            .await
            .unwrap();

        let maintenance = Analysis {
            department: "Electrical Maintenance".to_string(),
            ..analysis.clone()
        };
        desk.submit(&plain_form("b@example.com"), Some(&maintenance), None)
            .await
            .unwrap();

        let exact = desk.complaints_by_department("Electrical", false).await.unwrap();
        assert_eq!(exact.len(), 1);

        let broad = desk.complaints_by_department("Electrical", true).await.unwrap();
        assert_eq!(broad.len(), 2);
    }
}
