//! The staff session context.
//!
//! The dashboard serves one staff workstation at a time: signing in replaces
//! any previous session, selecting a department resets the sub-department,
//! and signing out clears the whole context. There is no credential check;
//! the session records who is working and which department they are viewing.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

/// A signed-in staff member and their dashboard scope.
#[derive(Debug, Clone, Serialize)]
pub struct StaffSession {
    pub staff_name: String,
    pub role: String,
    pub signed_in_at: DateTime<Utc>,
    /// Department group whose complaints the dashboard shows.
    pub department: Option<String>,
    /// Narrows the dashboard to one assigned department.
    pub sub_department: Option<String>,
}

/// Shared session store.
#[derive(Debug, Default)]
pub struct SessionStore {
    current: RwLock<Option<StaffSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session, replacing any existing one.
    pub async fn sign_in(&self, staff_name: String, role: String) -> StaffSession {
        let session = StaffSession {
            staff_name,
            role,
            signed_in_at: Utc::now(),
            department: None,
            sub_department: None,
        };
        *self.current.write().await = Some(session.clone());
        session
    }

    /// Select the dashboard scope. Selecting a department always replaces
    /// the sub-department with the one given, or clears it.
    ///
    /// Returns `None` when nobody is signed in.
    pub async fn select_department(
        &self,
        department: String,
        sub_department: Option<String>,
    ) -> Option<StaffSession> {
        let mut current = self.current.write().await;
        let session = current.as_mut()?;
        session.department = Some(department);
        session.sub_department = sub_department;
        Some(session.clone())
    }

    /// End the session and drop its scope. Returns whether one existed.
    pub async fn sign_out(&self) -> bool {
        self.current.write().await.take().is_some()
    }

    pub async fn current(&self) -> Option<StaffSession> {
        self.current.read().await.clone()
    }

    /// Whether a dashboard scope is selected. Gates the auto-refresh.
    pub async fn department_selected(&self) -> bool {
        self.current
            .read()
            .await
            .as_ref()
            .map(|session| session.department.is_some())
            .unwrap_or(false)
    }
}
