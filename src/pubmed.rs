//! NCBI E-utilities client for PubMed.
//!
//! Two endpoints are used:
//! - `esearch.fcgi` - keyword search returning PMIDs (JSON)
//! - `efetch.fcgi` - full record for one PMID (XML)
//!
//! Requests are sent one at a time. There is no retry, backoff or rate
//! limiting; a failed call is returned to the caller as
//! [`PaperError::Network`].

use crate::error::{PaperError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// E-utilities base URL
pub const DEFAULT_EUTILS_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Default number of PMIDs requested from a search
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// Environment variable overriding the E-utilities base URL
pub const BASE_URL_ENV: &str = "EUTILS_BASE_URL";

/// Environment variable overriding the request timeout, in seconds
pub const TIMEOUT_ENV: &str = "EUTILS_TIMEOUT_SECS";

/// Connection settings for the E-utilities endpoints
#[derive(Debug, Clone)]
pub struct EutilsConfig {
    /// Base URL under which `esearch.fcgi` and `efetch.fcgi` live
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for EutilsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_EUTILS_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("pubmed_papers/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl EutilsConfig {
    /// Defaults, overridden by `EUTILS_BASE_URL` and `EUTILS_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            config.base_url = base_url;
        }

        if let Ok(secs) = std::env::var(TIMEOUT_ENV) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                PaperError::Config(format!(
                    "{} must be a whole number of seconds, got {:?}",
                    TIMEOUT_ENV, secs
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    fn endpoint(&self, name: &str) -> Result<Url> {
        let raw = format!("{}/{}", self.base_url.trim_end_matches('/'), name);
        Url::parse(&raw)
            .map_err(|e| PaperError::Config(format!("Invalid endpoint URL {:?}: {}", raw, e)))
    }
}

/// Search options
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Maximum number of PMIDs to return
    pub max_results: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// PubMed client covering search and per-record fetch
pub struct PubMedClient {
    client: Client,
    search_url: Url,
    fetch_url: Url,
}

impl PubMedClient {
    /// Create a client from a configuration.
    ///
    /// Fails with [`PaperError::Config`] if the endpoints are not valid URLs
    /// or the HTTP client cannot be built.
    pub fn new(config: &EutilsConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaperError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            search_url: config.endpoint("esearch.fcgi")?,
            fetch_url: config.endpoint("efetch.fcgi")?,
        })
    }

    /// Search PubMed and return matching PMIDs, most relevant first.
    ///
    /// Returns an empty list when the response has no `esearchresult.idlist`.
    pub async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<String>> {
        info!(query = query, max_results = options.max_results, "Searching PubMed");

        let retmax = options.max_results.to_string();
        let response = self
            .client
            .get(self.search_url.clone())
            .query(&[
                ("db", "pubmed"),
                ("term", query),
                ("retmax", retmax.as_str()),
                ("retmode", "json"),
                ("sort", "relevance"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let data: SearchResponse = response.json().await?;
        let ids = data.esearchresult.and_then(|r| r.idlist).unwrap_or_default();

        info!(count = ids.len(), "PubMed search complete");
        Ok(ids)
    }

    /// Fetch the raw XML record for one PMID.
    pub async fn fetch_detail(&self, pmid: &str) -> Result<String> {
        debug!(pmid = pmid, "Fetching PubMed record");

        let response = self
            .client
            .get(self.fetch_url.clone())
            .query(&[("db", "pubmed"), ("id", pmid), ("retmode", "xml")])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?)
    }
}

// === esearch Response Types ===

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    esearchresult: Option<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    idlist: Option<Vec<String>>,
}
