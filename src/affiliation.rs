//! Keyword heuristic for non-academic author affiliations.
//!
//! An affiliation counts as academic when its lower-cased text contains any
//! of [`ACADEMIC_KEYWORDS`]. Institutions without one of these words (e.g.
//! "Max Planck Society") are misclassified as non-academic, and companies
//! whose names happen to contain one ("Collaboratory Inc") as academic.

/// Substrings that mark an affiliation as academic
pub const ACADEMIC_KEYWORDS: [&str; 5] = ["university", "college", "institute", "lab", "hospital"];

/// True when none of the academic keywords occur in `affiliation`,
/// compared case-insensitively.
pub fn is_non_academic(affiliation: &str) -> bool {
    let lowered = affiliation.to_lowercase();
    !ACADEMIC_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}
