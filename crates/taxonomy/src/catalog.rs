//! The static complaint category table and lookup helpers.
//!
//! Lookups are total: asking about a category that is not configured falls
//! back to documented defaults instead of failing, so categorization never
//! blocks a submission.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::Priority;

/// Confidence assumed for categories without a configured confidence.
pub const DEFAULT_CONFIDENCE: f64 = 0.7;

/// A complaint category with its routing configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    /// Priority for complaints filed under this category, if configured.
    pub priority: Option<Priority>,
    /// Confidence attached to automatic categorization, if configured.
    pub confidence: Option<f64>,
    pub subcategories: &'static [Subcategory],
}

/// A subcategory: the keywords that select it and the departments that
/// handle it. The first department is the assignment target.
#[derive(Debug, Clone, Serialize)]
pub struct Subcategory {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub departments: &'static [&'static str],
}

macro_rules! subcategories {
    ($(($name:expr, [$($kw:expr),+ $(,)?], [$($dept:expr),+ $(,)?])),+ $(,)?) => {
        &[$(Subcategory {
            name: $name,
            keywords: &[$($kw),+],
            departments: &[$($dept),+],
        }),+]
    };
}

pub(crate) static CATEGORIES: Lazy<IndexMap<&'static str, Category>> = Lazy::new(|| {
    let mut table = IndexMap::new();
    table.insert(
        "Coach Maintenance",
        Category {
            priority: Some(Priority::High),
            confidence: Some(0.85),
            subcategories: subcategories![
                (
                    "Air Conditioning",
                    ["ac", "air conditioning", "cooling", "temperature", "ventilation"],
                    ["Electrical", "Mechanical"]
                ),
                (
                    "Electrical Fittings",
                    ["fan", "light", "charging point", "socket", "switch"],
                    ["Electrical"]
                ),
                (
                    "Coach Interiors",
                    ["seat", "berth", "window", "door", "broken"],
                    ["Mechanical"]
                ),
            ],
        },
    );
    table.insert(
        "Cleanliness",
        Category {
            priority: Some(Priority::Medium),
            confidence: Some(0.8),
            subcategories: subcategories![
                (
                    "Coach Cleanliness",
                    ["dirty", "unclean", "garbage", "litter", "smell"],
                    ["Housekeeping"]
                ),
                (
                    "Toilet Hygiene",
                    ["toilet", "washroom", "lavatory", "stink", "no water"],
                    ["Housekeeping", "Mechanical"]
                ),
                (
                    "Pest Control",
                    ["cockroach", "rodent", "rat", "insect", "bed bug"],
                    ["Housekeeping"]
                ),
            ],
        },
    );
    table.insert(
        "Catering Services",
        Category {
            priority: Some(Priority::Medium),
            confidence: Some(0.75),
            subcategories: subcategories![
                (
                    "Food Quality",
                    ["food", "stale", "undercooked", "taste", "hygiene"],
                    ["Catering"]
                ),
                (
                    "Overcharging",
                    ["overcharged", "overcharging", "rate list", "billed extra"],
                    ["Catering", "Commercial"]
                ),
            ],
        },
    );
    table.insert(
        "Ticketing & Reservation",
        Category {
            // No configured priority: submissions here take the default.
            priority: None,
            confidence: Some(0.75),
            subcategories: subcategories![
                (
                    "Booking Issues",
                    ["booking", "reservation", "ticket", "waitlist", "chart"],
                    ["Commercial"]
                ),
                (
                    "Refunds",
                    ["refund", "cancellation", "tdr", "money back"],
                    ["Commercial", "Accounts"]
                ),
            ],
        },
    );
    table.insert(
        "Staff Behaviour",
        Category {
            priority: Some(Priority::High),
            // No configured confidence: lookups here take DEFAULT_CONFIDENCE.
            confidence: None,
            subcategories: subcategories![
                (
                    "Misconduct",
                    ["rude", "misbehaved", "abusive", "shouted", "tte"],
                    ["Personnel"]
                ),
                (
                    "Corruption",
                    ["bribe", "extra money", "demanded cash"],
                    ["Vigilance", "Personnel"]
                ),
            ],
        },
    );
    table.insert(
        "Security",
        Category {
            priority: Some(Priority::Urgent),
            confidence: Some(0.9),
            subcategories: subcategories![
                (
                    "Theft",
                    ["theft", "stolen", "robbery", "pickpocket"],
                    ["Railway Protection Force"]
                ),
                (
                    "Harassment",
                    ["harassment", "threatened", "unsafe", "drunk passenger"],
                    ["Railway Protection Force", "Government Railway Police"]
                ),
                (
                    "Unauthorized Occupancy",
                    ["unauthorized", "hawker", "encroached", "intruder"],
                    ["Railway Protection Force"]
                ),
            ],
        },
    );
    table.insert(
        "Punctuality",
        Category {
            priority: Some(Priority::Medium),
            confidence: Some(0.7),
            subcategories: subcategories![
                (
                    "Train Delay",
                    ["late", "delayed", "running behind", "rescheduled"],
                    ["Operations"]
                ),
                (
                    "Missed Connection",
                    ["connection", "connecting train", "missed"],
                    ["Operations", "Commercial"]
                ),
            ],
        },
    );
    table.insert(
        "Luggage & Parcel",
        Category {
            priority: Some(Priority::Low),
            confidence: Some(0.72),
            subcategories: subcategories![
                (
                    "Lost Luggage",
                    ["luggage", "baggage", "suitcase", "left behind"],
                    ["Commercial", "Railway Protection Force"]
                ),
                (
                    "Parcel Services",
                    ["parcel", "consignment", "parcel office"],
                    ["Commercial"]
                ),
            ],
        },
    );
    table
});

/// All configured category names.
pub fn all_categories() -> Vec<&'static str> {
    CATEGORIES.keys().copied().collect()
}

/// Priority for a category, falling back to [`Priority::Medium`] when the
/// category is unknown or has no configured priority.
pub fn category_priority(name: &str) -> Priority {
    CATEGORIES
        .get(name)
        .and_then(|category| category.priority)
        .unwrap_or_default()
}

/// Confidence for a category, falling back to [`DEFAULT_CONFIDENCE`] when
/// the category is unknown or has no configured confidence.
pub fn category_confidence(name: &str) -> f64 {
    CATEGORIES
        .get(name)
        .and_then(|category| category.confidence)
        .unwrap_or(DEFAULT_CONFIDENCE)
}

/// Map of category name to the departments that handle it, with each
/// department listed once per category.
pub fn department_structure() -> IndexMap<&'static str, Vec<&'static str>> {
    CATEGORIES
        .iter()
        .map(|(name, category)| {
            let mut departments = Vec::new();
            for subcategory in category.subcategories {
                for dept in subcategory.departments {
                    if !departments.contains(dept) {
                        departments.push(*dept);
                    }
                }
            }
            (*name, departments)
        })
        .collect()
}
