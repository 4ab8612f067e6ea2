//! Staff dashboard and triage routes.
//!
//! Staff endpoints read the acting staff member from the session context;
//! calls without a session are rejected before touching the desk.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use desk::{
    BulkOutcome, Communication, ComplaintStats, ExportRow, PollResult, SearchFilter, Status,
    Updated, EXPORT_HEADERS,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dashboard::{self, DashboardQuery, DashboardView};
use crate::error::{AppError, Result};
use crate::session::StaffSession;
use crate::state::AppState;

/// Sign-in request. No credential check; the session records who is working.
#[derive(Deserialize)]
pub struct SignInRequest {
    pub staff_name: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Start a staff session, replacing any existing one.
pub async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> Result<Json<StaffSession>> {
    let staff_name = req.staff_name.trim().to_string();
    if staff_name.is_empty() {
        return Err(AppError::Session("staff_name is required".to_string()));
    }
    let role = req.role.unwrap_or_else(|| "staff".to_string());
    let session = state.sessions.sign_in(staff_name, role).await;
    info!(staff_name = %session.staff_name, "Staff signed in");
    Ok(Json(session))
}

/// Department selection request.
#[derive(Deserialize)]
pub struct DepartmentRequest {
    pub department: String,
    #[serde(default)]
    pub sub_department: Option<String>,
}

/// Select the dashboard scope and build a fresh baseline snapshot.
pub async fn select_department(
    State(state): State<AppState>,
    Json(req): Json<DepartmentRequest>,
) -> Result<Json<StaffSession>> {
    let department = req.department.trim().to_string();
    if department.is_empty() {
        return Err(AppError::Session("department is required".to_string()));
    }
    let sub_department = req
        .sub_department
        .map(|sub| sub.trim().to_string())
        .filter(|sub| !sub.is_empty());

    let session = state
        .sessions
        .select_department(department, sub_department)
        .await
        .ok_or_else(AppError::no_session)?;

    // Baseline snapshot so the first dashboard read is fresh.
    state.refresher.refresh().await?;

    info!(
        department = %session.department.as_deref().unwrap_or_default(),
        sub_department = session.sub_department.as_deref().unwrap_or("-"),
        "Dashboard scope selected"
    );
    Ok(Json(session))
}

/// Sign-out response.
#[derive(Serialize)]
pub struct SignOutResponse {
    pub signed_out: bool,
}

/// End the staff session.
pub async fn sign_out(State(state): State<AppState>) -> Json<SignOutResponse> {
    let signed_out = state.sessions.sign_out().await;
    if signed_out {
        info!("Staff signed out");
    }
    Json(SignOutResponse { signed_out })
}

/// The dashboard for the session's scope, served from the latest snapshot.
pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardView>> {
    let session = scoped_session(&state).await?;
    let snapshot = state.refresher.snapshot().await;
    Ok(Json(dashboard::build(&snapshot, &session, &query)))
}

/// Re-fetch the snapshot on request and acknowledge the message alert.
pub async fn refresh_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardView>> {
    let session = scoped_session(&state).await?;
    let snapshot = state.refresher.refresh().await?;
    Ok(Json(dashboard::build(&snapshot, &session, &query)))
}

/// Export payload: display headers plus one row per complaint.
#[derive(Serialize)]
pub struct ExportResponse {
    pub headers: [&'static str; 10],
    pub rows: Vec<ExportRow>,
}

/// Flat export of the complaints matching the filter.
pub async fn export(
    State(state): State<AppState>,
    Query(filter): Query<SearchFilter>,
) -> Result<Json<ExportResponse>> {
    signed_in(&state).await?;
    let rows = state.desk.export(&filter).await?;
    Ok(Json(ExportResponse {
        headers: EXPORT_HEADERS,
        rows,
    }))
}

/// Aggregate complaint statistics.
pub async fn stats(State(state): State<AppState>) -> Result<Json<ComplaintStats>> {
    signed_in(&state).await?;
    Ok(Json(state.desk.stats().await?))
}

#[derive(Deserialize)]
pub struct UpdatesQuery {
    pub since: DateTime<Utc>,
    #[serde(default)]
    pub department: Option<String>,
}

/// Complaints updated since a checkpoint.
pub async fn updates(
    State(state): State<AppState>,
    Query(query): Query<UpdatesQuery>,
) -> Result<Json<PollResult>> {
    signed_in(&state).await?;
    let result = state
        .desk
        .poll_updates(query.since, query.department.as_deref())
        .await?;
    Ok(Json(result))
}

/// Status update request. The acting staff member comes from the session.
#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: Status,
    #[serde(default)]
    pub remark: Option<String>,
}

/// Update one complaint's status.
pub async fn update_status(
    State(state): State<AppState>,
    Path(reference): Path<String>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<Updated>> {
    let session = signed_in(&state).await?;
    let updated = state
        .desk
        .update_status(
            &reference,
            req.status,
            req.remark.as_deref(),
            &session.staff_name,
        )
        .await?;
    Ok(Json(updated))
}

/// Bulk status update request.
#[derive(Deserialize)]
pub struct BulkStatusRequest {
    pub references: Vec<String>,
    pub status: Status,
    #[serde(default)]
    pub remark: Option<String>,
}

/// Apply one status to several complaints; failures are per-item.
pub async fn bulk_update_status(
    State(state): State<AppState>,
    Json(req): Json<BulkStatusRequest>,
) -> Result<Json<BulkOutcome>> {
    let session = signed_in(&state).await?;
    let outcome = state
        .desk
        .bulk_update_status(
            &req.references,
            req.status,
            req.remark.as_deref(),
            &session.staff_name,
        )
        .await?;
    info!(
        total = outcome.total,
        successful = outcome.successful,
        failed = outcome.failed,
        "Bulk status update complete"
    );
    Ok(Json(outcome))
}

/// Staff message request.
#[derive(Deserialize)]
pub struct StaffMessageRequest {
    pub message: String,
    #[serde(default)]
    pub is_internal: bool,
}

/// Add a staff message to a complaint thread.
pub async fn send_message(
    State(state): State<AppState>,
    Path(reference): Path<String>,
    Json(req): Json<StaffMessageRequest>,
) -> Result<Json<Communication>> {
    let session = signed_in(&state).await?;
    let message = state
        .desk
        .send_staff_message(
            &reference,
            &req.message,
            &session.staff_name,
            req.is_internal,
        )
        .await?;
    Ok(Json(message))
}

/// Viewed acknowledgement response.
#[derive(Serialize)]
pub struct ViewedResponse {
    pub viewed: bool,
}

/// Leave the internal note that the thread has been read.
pub async fn mark_viewed(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Json<ViewedResponse>> {
    let session = signed_in(&state).await?;
    state
        .desk
        .mark_messages_viewed(&reference, &session.staff_name)
        .await?;
    Ok(Json(ViewedResponse { viewed: true }))
}

/// The current session, any scope.
async fn signed_in(state: &AppState) -> Result<StaffSession> {
    state
        .sessions
        .current()
        .await
        .ok_or_else(AppError::no_session)
}

/// The current session, requiring a selected department.
async fn scoped_session(state: &AppState) -> Result<StaffSession> {
    let session = signed_in(state).await?;
    if session.department.is_none() {
        return Err(AppError::no_department());
    }
    Ok(session)
}
