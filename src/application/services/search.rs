//! Company search service

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::SearchResult;
use crate::infrastructure::traits::CompanySearch;

/// Looks up public information about a company by name.
pub struct SearchService {
    search: Arc<dyn CompanySearch>,
}

impl SearchService {
    pub fn new(search: Arc<dyn CompanySearch>) -> Self {
        Self { search }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn search(&self, company: &str) -> ApplicationResult<Vec<SearchResult>> {
        let company = company.trim();
        if company.is_empty() {
            return Err(ApplicationError::InvalidInput(
                "company name must not be empty".into(),
            ));
        }
        let results = self.search.search(company)?;
        debug!("search '{}': {} results", company, results.len());
        Ok(results)
    }
}
