//! # pubmed_papers
//!
//! PubMed literature search that keeps papers with at least one
//! non-academic (company, industry) author affiliation.
//!
//! ## Modules
//!
//! - [`pubmed`] - E-utilities search and record fetch
//! - [`parser`] - PubMed XML to [`PaperRecord`]
//! - [`affiliation`] - Academic keyword heuristic
//! - [`pipeline`] - Fetch, parse and filter over a list of PMIDs
//! - [`export`] - CSV and console output
//! - [`xml`] - Minimal XML element tree
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pubmed_papers::{export, pipeline, pubmed};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let client = pubmed::PubMedClient::new(&Default::default())?;
//!     let pmids = client.search("crispr therapy", &Default::default()).await?;
//!     let papers = pipeline::filter_papers(&client, &pmids).await;
//!     export::export(&papers, Some("papers.csv"))?;
//!     Ok(())
//! }
//! ```

pub mod affiliation;
pub mod error;
pub mod export;
pub mod parser;
pub mod pipeline;
pub mod pubmed;
pub mod record;
pub mod xml;

pub use error::{PaperError, ParseFailure, Result};
pub use record::PaperRecord;
