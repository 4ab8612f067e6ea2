//! SQLite persistence layer for RailCare.
//!
//! This crate provides async database operations for complaints, their
//! status history, and threaded communications using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{complaint, models::NewComplaint, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:railcare.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let new = NewComplaint {
//!         title: "AC not working".to_string(),
//!         description: "Coach B2 has had no cooling since Kanpur.".to_string(),
//!         email: "asha@example.com".to_string(),
//!         phone: None,
//!         location: "Coach B2".to_string(),
//!         train_number: Some("12951".to_string()),
//!         journey_date: None,
//!         pnr_number: None,
//!         detected_category: Some("Coach Maintenance".to_string()),
//!         detected_subcategory: Some("Air Conditioning".to_string()),
//!         assigned_to: "Electrical".to_string(),
//!         confidence_score: Some(0.85),
//!         priority: taxonomy::Priority::High,
//!         metadata: Default::default(),
//!     };
//!     let complaint = complaint::create_complaint(db.pool(), &new).await?;
//!     println!("filed as {}", complaint.complaint_number);
//!
//!     Ok(())
//! }
//! ```

pub mod communication;
pub mod complaint;
pub mod error;
pub mod history;
pub mod models;
pub mod reference;
pub mod search;
pub mod stats;

pub use error::{DatabaseError, Result};
pub use models::{
    Communication, Complaint, HistoryEntry, NewCommunication, NewComplaint, NewHistoryEntry,
    SenderKind, Status, SubmissionMeta,
};
pub use reference::ComplaintRef;
pub use search::SearchFilter;
pub use stats::ComplaintStats;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    /// Set high enough to handle concurrent submissions alongside dashboard
    /// refreshes.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/railcare.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check that the database answers queries.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
