//! Complaint category configuration and keyword analysis.
//!
//! This crate owns the static complaint taxonomy used across RailCare:
//!
//! - [`Priority`] - Complaint priority levels with a defined default
//! - [`catalog`] - The category table and lookup helpers
//! - [`classify`] - Keyword-based categorization of free-text complaints
//!
//! The taxonomy is pure configuration; persistence integration (the `sqlx`
//! text mapping for [`Priority`]) is behind the `sqlx` cargo feature so
//! consumers that only need categorization stay free of database code.

mod catalog;
mod classify;
mod priority;

pub use catalog::{
    all_categories, category_confidence, category_priority, department_structure, Category,
    Subcategory, DEFAULT_CONFIDENCE,
};
pub use classify::{classify, Analysis};
pub use priority::Priority;
