//! Keyword-based categorization of free-text complaints.

use serde::{Deserialize, Serialize};

use crate::catalog::{self, CATEGORIES};

/// Result of categorizing a complaint text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub category: String,
    pub subcategory: String,
    /// Department the complaint should be assigned to.
    pub department: String,
    pub confidence: f64,
    pub matched_keywords: Vec<String>,
}

/// Categorize a complaint from its title and description.
///
/// Every subcategory's keywords are matched case-insensitively against the
/// combined text; the subcategory with the most matches wins, earlier table
/// entries winning ties. Returns `None` when no keyword matches, in which
/// case the submission falls back to the general grievance defaults.
pub fn classify(title: &str, description: &str) -> Option<Analysis> {
    let haystack = format!("{} {}", title, description).to_lowercase();
    let words: Vec<&str> = haystack
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect();

    let mut best: Option<Analysis> = None;
    for (category, config) in CATEGORIES.iter() {
        for subcategory in config.subcategories {
            let matched: Vec<String> = subcategory
                .keywords
                .iter()
                .filter(|keyword| keyword_matches(&haystack, &words, keyword))
                .map(|keyword| keyword.to_string())
                .collect();
            if matched.is_empty() {
                continue;
            }
            let better = best
                .as_ref()
                .map(|current| matched.len() > current.matched_keywords.len())
                .unwrap_or(true);
            if better {
                best = Some(Analysis {
                    category: category.to_string(),
                    subcategory: subcategory.name.to_string(),
                    department: subcategory.departments[0].to_string(),
                    confidence: catalog::category_confidence(category),
                    matched_keywords: matched,
                });
            }
        }
    }
    best
}

// Single-word keywords match whole words only; phrases match as substrings.
fn keyword_matches(haystack: &str, words: &[&str], keyword: &str) -> bool {
    if keyword.contains(' ') {
        haystack.contains(keyword)
    } else {
        words.iter().any(|word| *word == keyword)
    }
}
