//! Guarded refresh of the dashboard snapshot.
//!
//! One snapshot serves every dashboard read. Refreshes hold a single
//! in-flight guard: a background tick that finds a refresh already running
//! skips instead of racing it, so a slow fetch is never overwritten by a
//! stale one.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use desk::{Complaint, Desk};
use tokio::sync::{Mutex, RwLock};

/// The data behind the staff dashboard, fetched as one unit.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// All complaints, newest first.
    pub complaints: Vec<Complaint>,
    /// External message count per complaint, keyed by internal id.
    pub message_counts: HashMap<String, i64>,
    /// Latest staff remark per complaint, keyed by internal id.
    pub remarks: HashMap<String, String>,
    pub total_messages: i64,
    /// Set when the total message count grew since the previous snapshot.
    /// Stays set until a staff-requested refresh acknowledges it.
    pub new_message_alert: bool,
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    fn empty() -> Self {
        Self {
            complaints: Vec::new(),
            message_counts: HashMap::new(),
            remarks: HashMap::new(),
            total_messages: 0,
            new_message_alert: false,
            fetched_at: Utc::now(),
        }
    }
}

/// Keeps the dashboard snapshot fresh.
#[derive(Debug)]
pub struct Refresher {
    desk: Desk,
    snapshot: RwLock<Snapshot>,
    in_flight: Mutex<()>,
}

impl Refresher {
    pub fn new(desk: Desk) -> Self {
        Self {
            desk,
            snapshot: RwLock::new(Snapshot::empty()),
            in_flight: Mutex::new(()),
        }
    }

    /// The latest snapshot.
    pub async fn snapshot(&self) -> Snapshot {
        self.snapshot.read().await.clone()
    }

    /// Background refresh. Skips when another refresh is in flight.
    pub async fn tick(&self) {
        let _guard = match self.in_flight.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                tracing::debug!("Refresh already in flight; skipping tick");
                return;
            }
        };
        if let Err(err) = self.reload(false).await {
            tracing::warn!(error = %err, "Dashboard refresh failed");
        }
    }

    /// Staff-requested refresh. Waits for any in-flight refresh, fetches,
    /// and acknowledges the new-message alert.
    pub async fn refresh(&self) -> desk::Result<Snapshot> {
        let _guard = self.in_flight.lock().await;
        self.reload(true).await?;
        Ok(self.snapshot.read().await.clone())
    }

    async fn reload(&self, acknowledge: bool) -> desk::Result<()> {
        let complaints = self.desk.all_complaints().await?;
        let message_counts = self.desk.message_counts().await?;
        let remarks = self.desk.latest_remarks().await?;
        let total_messages: i64 = message_counts.values().sum();

        let mut snapshot = self.snapshot.write().await;
        let new_message_alert = if acknowledge {
            false
        } else {
            snapshot.new_message_alert || total_messages > snapshot.total_messages
        };
        *snapshot = Snapshot {
            complaints,
            message_counts,
            remarks,
            total_messages,
            new_message_alert,
            fetched_at: Utc::now(),
        };
        Ok(())
    }
}
