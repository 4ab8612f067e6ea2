//! Staff dashboard service for the RailCare complaint portal.
//!
//! Serves the customer submission API and the staff dashboard as JSON, with
//! a background task keeping the dashboard snapshot fresh while a department
//! is selected.

mod config;
mod dashboard;
mod error;
mod refresh;
mod routes;
mod session;
mod state;

use std::time::Duration;

use desk::{Database, Desk};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting staff web server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Build application state
    let state = AppState::new(Desk::new(db));

    // Background dashboard refresh, active only while a department is selected
    let refresher = state.refresher.clone();
    let sessions = state.sessions.clone();
    let refresh_interval = Duration::from_secs(config.refresh_secs);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(refresh_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if sessions.department_selected().await {
                refresher.tick().await;
            }
        }
    });

    // Build router
    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    info!(addr = %config.addr, "Staff web server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
