//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use desk::DeskError;
use serde::Serialize;

use crate::error::Result;
use crate::state::AppState;

#[derive(Serialize)]
pub struct Health {
    pub status: String,
}

/// Health check endpoint. Pings the store.
pub async fn health(State(state): State<AppState>) -> Result<Json<Health>> {
    state
        .desk
        .database()
        .ping()
        .await
        .map_err(DeskError::from)?;
    Ok(Json(Health {
        status: "ok".to_string(),
    }))
}
