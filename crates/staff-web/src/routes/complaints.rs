//! Customer-facing complaint routes.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use desk::{
    Communication, ComplaintDetail, ComplaintForm, ComplaintSummary, JourneyDetails, MessageView,
    Submitted, Viewer,
};
use serde::Deserialize;
use taxonomy::{classify, Analysis};

use crate::error::Result;
use crate::state::AppState;

/// Complaint submission request.
#[derive(Deserialize)]
pub struct SubmitRequest {
    #[serde(flatten)]
    pub form: ComplaintForm,
    #[serde(default)]
    pub journey: Option<JourneyDetails>,
    /// Caller-provided categorization. When absent the classifier runs over
    /// the title and description.
    #[serde(default)]
    pub analysis: Option<Analysis>,
}

/// Submit a complaint.
pub async fn submit(
    State(state): State<AppState>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<Submitted>> {
    let analysis = req
        .analysis
        .or_else(|| classify(&req.form.title, &req.form.description));
    let submitted = state
        .desk
        .submit(&req.form, analysis.as_ref(), req.journey.as_ref())
        .await?;
    Ok(Json(submitted))
}

/// Contact lookup query.
#[derive(Deserialize)]
pub struct ContactQuery {
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// List complaints filed under an email address and/or phone number.
pub async fn by_contact(
    State(state): State<AppState>,
    Query(query): Query<ContactQuery>,
) -> Result<Json<Vec<ComplaintSummary>>> {
    let complaints = state
        .desk
        .complaints_by_contact(query.email.as_deref(), query.phone.as_deref())
        .await?;
    Ok(Json(complaints))
}

#[derive(Deserialize)]
pub struct ViewerQuery {
    #[serde(default)]
    pub viewer: Viewer,
}

/// Full view of one complaint by its public number.
pub async fn detail(
    State(state): State<AppState>,
    Path(number): Path<String>,
    Query(query): Query<ViewerQuery>,
) -> Result<Json<ComplaintDetail>> {
    let detail = state.desk.complaint_detail(&number, query.viewer).await?;
    Ok(Json(detail))
}

/// Customer message request.
#[derive(Deserialize)]
pub struct MessageRequest {
    pub message: String,
}

/// Add a customer message to a complaint thread.
pub async fn send_message(
    State(state): State<AppState>,
    Path(reference): Path<String>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<Communication>> {
    let message = state
        .desk
        .send_user_message(&reference, &req.message)
        .await?;
    Ok(Json(message))
}

#[derive(Deserialize)]
pub struct MessagesQuery {
    #[serde(default)]
    pub since: Option<DateTime<Utc>>,
    #[serde(default)]
    pub viewer: Viewer,
}

/// A complaint's message thread, oldest first.
pub async fn messages(
    State(state): State<AppState>,
    Path(reference): Path<String>,
    Query(query): Query<MessagesQuery>,
) -> Result<Json<Vec<MessageView>>> {
    let messages = state
        .desk
        .recent_messages(&reference, query.since, query.viewer)
        .await?;
    Ok(Json(messages))
}
