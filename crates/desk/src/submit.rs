//! Complaint submission payloads.
//!
//! Builds the stored record from the web form, the optional categorization
//! result, and the optional journey details. All defaults documented for
//! submission live here: priority resolution, the general grievance
//! fallback, PNR normalization, and the metadata blob.

use chrono::{NaiveDate, Utc};
use database::models::{NewComplaint, SubmissionMeta};
use serde::{Deserialize, Serialize};
use taxonomy::{category_priority, Analysis, Priority};

/// Department complaints fall to when categorization finds nothing.
pub const GENERAL_CELL: &str = "General Grievance Cell";

/// The submission form as received from the customer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComplaintForm {
    pub title: String,
    pub description: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Customer marked the complaint as urgent.
    #[serde(default)]
    pub is_urgent: bool,
    /// Number of files attached alongside the form.
    #[serde(default)]
    pub files_count: u32,
}

/// Optional journey context attached to a submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JourneyDetails {
    #[serde(default)]
    pub train_number: Option<String>,
    #[serde(default)]
    pub journey_date: Option<NaiveDate>,
    #[serde(default)]
    pub pnr_number: Option<String>,
}

/// Build the insert payload from the validated form.
pub(crate) fn build_new_complaint(
    form: &ComplaintForm,
    analysis: Option<&Analysis>,
    journey: Option<&JourneyDetails>,
) -> NewComplaint {
    let pnr_number = journey.and_then(|j| normalize_pnr(j.pnr_number.as_deref()));
    let metadata = SubmissionMeta {
        matched_keywords: analysis
            .map(|a| a.matched_keywords.clone())
            .unwrap_or_default(),
        analysis_confidence: analysis.map(|a| a.confidence),
        analysis_timestamp: analysis.map(|_| Utc::now()),
        auto_assigned: analysis.is_some(),
        is_urgent: form.is_urgent,
        files_count: form.files_count,
        has_pnr: pnr_number.is_some(),
        ..SubmissionMeta::default()
    };

    NewComplaint {
        title: form.title.trim().to_string(),
        description: form.description.trim().to_string(),
        email: form.email.trim().to_lowercase(),
        phone: normalize_optional(form.phone.as_deref()),
        location: normalize_optional(form.location.as_deref())
            .unwrap_or_else(|| "Not specified".to_string()),
        train_number: journey.and_then(|j| normalize_optional(j.train_number.as_deref())),
        journey_date: journey.and_then(|j| j.journey_date),
        pnr_number,
        detected_category: analysis.map(|a| a.category.clone()),
        detected_subcategory: analysis.map(|a| a.subcategory.clone()),
        assigned_to: analysis
            .map(|a| a.department.clone())
            .unwrap_or_else(|| GENERAL_CELL.to_string()),
        confidence_score: analysis.map(|a| a.confidence),
        priority: resolve_priority(form.is_urgent, analysis),
        metadata,
    }
}

/// Urgent submissions are urgent regardless of category; otherwise the
/// detected category's configured priority applies, defaulting to medium.
pub(crate) fn resolve_priority(is_urgent: bool, analysis: Option<&Analysis>) -> Priority {
    if is_urgent {
        return Priority::Urgent;
    }
    analysis
        .map(|a| category_priority(&a.category))
        .unwrap_or_default()
}

// "N/A" and blanks mean the customer had no PNR to give.
pub(crate) fn normalize_pnr(pnr: Option<&str>) -> Option<String> {
    let pnr = pnr?.trim();
    if pnr.is_empty() || pnr.eq_ignore_ascii_case("n/a") {
        None
    } else {
        Some(pnr.to_string())
    }
}

fn normalize_optional(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
