//! HTTP client for the company-information search endpoint.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::SearchConfig;
use crate::domain::SearchResult;
use crate::infrastructure::traits::CompanySearch;
use crate::infrastructure::{InfraError, InfraResult};

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

/// Posts company queries to a JSON search endpoint.
pub struct HttpCompanySearch {
    http: Client,
    endpoint: String,
    query_suffix: String,
    max_results: usize,
}

impl HttpCompanySearch {
    pub fn new(config: &SearchConfig) -> InfraResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| InfraError::Http {
                message: format!("create HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            query_suffix: config.query_suffix.clone(),
            max_results: config.max_results,
        })
    }

    /// Full query text sent for `company`.
    pub fn query_for(&self, company: &str) -> String {
        compose_query(company, &self.query_suffix)
    }
}

/// Append the configured topic suffix to a company name.
pub fn compose_query(company: &str, suffix: &str) -> String {
    let suffix = suffix.trim();
    if suffix.is_empty() {
        company.trim().to_string()
    } else {
        format!("{} {}", company.trim(), suffix)
    }
}

impl CompanySearch for HttpCompanySearch {
    #[instrument(level = "debug", skip(self))]
    fn search(&self, company: &str) -> ApplicationResult<Vec<SearchResult>> {
        let query = self.query_for(company);
        let body = SearchRequest {
            query: &query,
            max_results: self.max_results,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .map_err(|e| {
                error!("search transport error: {}", e);
                ApplicationError::SearchFailed
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("search endpoint returned {}", status);
            return Err(ApplicationError::SearchFailed);
        }

        let parsed: SearchResponse = response.json().map_err(|e| {
            error!("search response not understood: {}", e);
            ApplicationError::SearchFailed
        })?;
        debug!("search returned {} results", parsed.results.len());
        Ok(parsed.results)
    }
}
