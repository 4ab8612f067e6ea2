//! Application state shared across handlers.

use std::sync::Arc;

use desk::Desk;

use crate::refresh::Refresher;
use crate::session::SessionStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The complaint desk, the workflow layer over the store.
    pub desk: Desk,
    /// The staff session context.
    pub sessions: Arc<SessionStore>,
    /// Dashboard snapshot refresher.
    pub refresher: Arc<Refresher>,
}

impl AppState {
    /// Create new application state.
    pub fn new(desk: Desk) -> Self {
        let refresher = Arc::new(Refresher::new(desk.clone()));
        Self {
            desk,
            sessions: Arc::new(SessionStore::new()),
            refresher,
        }
    }
}
