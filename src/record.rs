//! Paper records produced by the metadata parser.

use crate::affiliation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One publication parsed from a PubMed XML document.
///
/// Optional fields are `None` when the element was not found at all; an
/// element that is present but empty gives `Some("")`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    /// PubMed identifier (PMID)
    pub pubmed_id: String,
    /// Article title
    pub title: Option<String>,
    /// `YYYY-Mon-DD`, only when year, month and day are all present
    pub publication_date: Option<String>,
    /// "Forename Lastname" in document order
    pub authors: Vec<String>,
    /// Affiliation texts in document order, not aligned with `authors`
    pub affiliations: Vec<String>,
    /// Email of the author flagged as the validated contact
    pub corresponding_author_email: Option<String>,
}

impl PaperRecord {
    /// True if any affiliation fails the academic keyword test.
    pub fn has_non_academic_affiliation(&self) -> bool {
        self.affiliations
            .iter()
            .any(|aff| affiliation::is_non_academic(aff))
    }
}

impl fmt::Display for PaperRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const MISSING: &str = "-";

        writeln!(f, "PubmedID: {}", self.pubmed_id)?;
        writeln!(f, "  Title: {}", self.title.as_deref().unwrap_or(MISSING))?;
        writeln!(
            f,
            "  Publication Date: {}",
            self.publication_date.as_deref().unwrap_or(MISSING)
        )?;
        writeln!(f, "  Authors: {}", join_or_missing(&self.authors))?;
        writeln!(f, "  Affiliations: {}", join_or_missing(&self.affiliations))?;
        write!(
            f,
            "  Corresponding Author Email: {}",
            self.corresponding_author_email.as_deref().unwrap_or(MISSING)
        )
    }
}

fn join_or_missing(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join("; ")
    }
}
