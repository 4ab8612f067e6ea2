//! Complaint desk for the RailCare portal.
//!
//! This crate provides the [`Desk`] type which carries every workflow behind
//! the customer portal and the staff dashboard: submission with automatic
//! categorization, complaint lookup, status updates with history, message
//! threads, search, export, and aggregate statistics.
//!
//! The desk validates input before touching the store, keeps the primary
//! write authoritative over best-effort follow-up writes, and projects
//! records for a given [`Viewer`] so the web layers stay thin.
//!
//! # Example
//!
//! ```rust,ignore
//! use desk::{ComplaintForm, Desk, Viewer};
//! use database::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite:railcare.db?mode=rwc").await?;
//!     db.migrate().await?;
//!     let desk = Desk::new(db);
//!
//!     let form = ComplaintForm {
//!         title: "AC not working in coach B2".to_string(),
//!         description: "The air conditioning stopped an hour ago.".to_string(),
//!         email: "asha@example.com".to_string(),
//!         ..Default::default()
//!     };
//!     let analysis = taxonomy::classify(&form.title, &form.description);
//!     let submitted = desk.submit(&form, analysis.as_ref(), None).await?;
//!     println!("Filed {}", submitted.complaint.complaint_number);
//!
//!     let detail = desk
//!         .complaint_detail(&submitted.complaint.complaint_number, Viewer::Customer)
//!         .await?;
//!     println!("Status: {}", detail.status);
//!     Ok(())
//! }
//! ```

mod desk;
mod error;
mod export;
mod followup;
mod submit;
mod validation;
mod view;

// Public exports
pub use desk::{BulkItem, BulkOutcome, Desk, NewMessages, PollResult, Submitted, Updated};
pub use error::{DeskError, Result};
pub use export::{ExportRow, EXPORT_HEADERS};
pub use followup::{FollowUp, FollowUpFailure, FollowUpReport, FollowUpWrite};
pub use submit::{ComplaintForm, JourneyDetails, GENERAL_CELL};
pub use validation::{
    ValidationError, MAX_DESCRIPTION_LENGTH, MAX_EMAIL_LENGTH, MAX_MESSAGE_LENGTH, MAX_NAME_LENGTH,
    MAX_TITLE_LENGTH,
};
pub use view::{
    priority_tone, status_tone, ComplaintDetail, ComplaintSummary, HistoryView, MessageView, Viewer,
};

// Re-export commonly used types from dependencies
pub use database::models::{Complaint, Communication, SenderKind, Status};
pub use database::{ComplaintStats, Database, SearchFilter};
pub use taxonomy::{Analysis, Priority};
