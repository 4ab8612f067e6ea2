//! Route handlers for the staff web service.

pub mod complaints;
pub mod health;
pub mod staff;

use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Customer surface
        .route(
            "/api/complaints",
            post(complaints::submit).get(complaints::by_contact),
        )
        .route("/api/complaints/:number", get(complaints::detail))
        .route(
            "/api/complaints/:reference/messages",
            post(complaints::send_message).get(complaints::messages),
        )
        // Staff surface
        .route(
            "/api/staff/session",
            post(staff::sign_in).delete(staff::sign_out),
        )
        .route("/api/staff/session/department", put(staff::select_department))
        .route("/api/staff/dashboard", get(staff::dashboard))
        .route("/api/staff/dashboard/refresh", post(staff::refresh_dashboard))
        .route("/api/staff/export", get(staff::export))
        .route("/api/staff/stats", get(staff::stats))
        .route("/api/staff/updates", get(staff::updates))
        .route("/api/staff/complaints/status", post(staff::bulk_update_status))
        .route(
            "/api/staff/complaints/:reference/status",
            patch(staff::update_status),
        )
        .route(
            "/api/staff/complaints/:reference/messages",
            post(staff::send_message),
        )
        .route(
            "/api/staff/complaints/:reference/viewed",
            post(staff::mark_viewed),
        )
}
