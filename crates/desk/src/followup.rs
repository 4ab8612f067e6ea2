//! Best-effort follow-up writes.
//!
//! Operations like submission and status updates record secondary context
//! (system notices, history entries) after their primary write succeeds.
//! Each follow-up is attempted exactly once; a failure is logged and
//! reported to the caller but never overturns the primary outcome.

use database::{communication, history, Database, NewCommunication, NewHistoryEntry};
use serde::Serialize;

/// A pending secondary write.
#[derive(Debug, Clone)]
pub struct FollowUp {
    /// Short label used in logs and failure reports.
    pub label: &'static str,
    pub write: FollowUpWrite,
}

/// The record a follow-up appends.
#[derive(Debug, Clone)]
pub enum FollowUpWrite {
    Communication(NewCommunication),
    History(NewHistoryEntry),
}

impl FollowUp {
    pub fn communication(label: &'static str, new: NewCommunication) -> Self {
        Self {
            label,
            write: FollowUpWrite::Communication(new),
        }
    }

    pub fn history(label: &'static str, entry: NewHistoryEntry) -> Self {
        Self {
            label,
            write: FollowUpWrite::History(entry),
        }
    }
}

/// Outcome of running a batch of follow-ups.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FollowUpReport {
    /// How many follow-ups ran.
    pub attempted: usize,
    /// The ones that failed, in attempt order.
    pub failures: Vec<FollowUpFailure>,
}

/// A single failed follow-up.
#[derive(Debug, Clone, Serialize)]
pub struct FollowUpFailure {
    pub label: String,
    pub error: String,
}

impl FollowUpReport {
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run each follow-up once, collecting failures instead of propagating them.
pub async fn run_follow_ups(db: &Database, follow_ups: Vec<FollowUp>) -> FollowUpReport {
    let mut report = FollowUpReport::default();

    for follow_up in follow_ups {
        report.attempted += 1;
        let result = match &follow_up.write {
            FollowUpWrite::Communication(new) => {
                communication::append_communication(db.pool(), new)
                    .await
                    .map(|_| ())
            }
            FollowUpWrite::History(entry) => {
                history::append_history(db.pool(), entry).await.map(|_| ())
            }
        };
        if let Err(err) = result {
            tracing::warn!(label = follow_up.label, error = %err, "follow-up write failed");
            report.failures.push(FollowUpFailure {
                label: follow_up.label.to_string(),
                error: err.to_string(),
            });
        }
    }

    report
}
