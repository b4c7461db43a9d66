//! Fetch, parse and filter pipeline.
//!
//! Each PMID is fetched, parsed and tested in input order, one at a time.
//! A record is kept when at least one of its affiliations is non-academic.
//! Identifiers whose fetch or parse fails are logged and skipped; they never
//! abort the rest of the batch.

use crate::error::Result;
use crate::parser;
use crate::pubmed::PubMedClient;
use crate::record::PaperRecord;
use tracing::{debug, info, warn};

/// Source of raw PubMed XML, one document per identifier.
#[allow(async_fn_in_trait)]
pub trait DetailSource {
    /// Fetch the XML document for `pmid`
    async fn fetch_detail(&self, pmid: &str) -> Result<String>;
}

impl DetailSource for PubMedClient {
    async fn fetch_detail(&self, pmid: &str) -> Result<String> {
        PubMedClient::fetch_detail(self, pmid).await
    }
}

/// Counters for one pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    /// Identifiers processed
    pub total: usize,
    /// Identifiers whose fetch failed
    pub fetch_failed: usize,
    /// Documents that did not parse
    pub parse_failed: usize,
    /// Records kept
    pub retained: usize,
}

/// Keep only papers with at least one non-academic affiliation.
///
/// Output order follows `pmids`, restricted to retained records.
pub async fn filter_papers<S: DetailSource>(source: &S, pmids: &[String]) -> Vec<PaperRecord> {
    filter_papers_with_stats(source, pmids).await.0
}

/// Like [`filter_papers`], also returning per-run counters.
pub async fn filter_papers_with_stats<S: DetailSource>(
    source: &S,
    pmids: &[String],
) -> (Vec<PaperRecord>, FilterStats) {
    info!(count = pmids.len(), "Filtering papers");

    let mut stats = FilterStats {
        total: pmids.len(),
        ..Default::default()
    };
    let mut retained = Vec::new();

    for pmid in pmids {
        let xml = match source.fetch_detail(pmid).await {
            Ok(xml) => xml,
            Err(e) => {
                warn!(pmid = %pmid, error = %e, "Fetch failed, skipping");
                stats.fetch_failed += 1;
                continue;
            }
        };

        let Some(record) = parser::try_parse_paper(&xml) else {
            debug!(pmid = %pmid, "No record parsed, skipping");
            stats.parse_failed += 1;
            continue;
        };

        if record.has_non_academic_affiliation() {
            debug!(pmid = %pmid, "Retained");
            retained.push(record);
        } else {
            debug!(pmid = %pmid, "Only academic affiliations");
        }
    }

    stats.retained = retained.len();
    info!(
        total = stats.total,
        retained = stats.retained,
        fetch_failed = stats.fetch_failed,
        parse_failed = stats.parse_failed,
        "Filtering complete"
    );

    (retained, stats)
}
