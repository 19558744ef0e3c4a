//! Tests for SearchService and the HTTP search client

use std::sync::{Arc, Mutex};

use orgmap::application::services::SearchService;
use orgmap::application::{ApplicationError, ApplicationResult};
use orgmap::config::SearchConfig;
use orgmap::domain::SearchResult;
use orgmap::infrastructure::search::HttpCompanySearch;
use orgmap::infrastructure::traits::CompanySearch;

/// Records queries and replays a canned answer.
struct MockSearch {
    calls: Mutex<Vec<String>>,
    fail: bool,
}

impl MockSearch {
    fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail,
        })
    }
}

impl CompanySearch for MockSearch {
    fn search(&self, company: &str) -> ApplicationResult<Vec<SearchResult>> {
        self.calls.lock().unwrap().push(company.to_string());
        if self.fail {
            return Err(ApplicationError::SearchFailed);
        }
        Ok(vec![SearchResult {
            title: format!("{company} annual report"),
            description: "Org structure overview".into(),
            url: "https://example.org/report".into(),
            source: "example.org".into(),
        }])
    }
}

#[test]
fn given_company_name_when_searching_then_trimmed_name_forwarded() {
    let mock = MockSearch::new(false);
    let service = SearchService::new(mock.clone());

    let results = service.search("  General Hospital ").unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "General Hospital annual report");
    assert_eq!(*mock.calls.lock().unwrap(), vec!["General Hospital"]);
}

#[test]
fn given_blank_name_when_searching_then_rejected_without_request() {
    let mock = MockSearch::new(false);
    let service = SearchService::new(mock.clone());

    let err = service.search("   ").unwrap_err();

    assert!(matches!(err, ApplicationError::InvalidInput(_)));
    assert!(mock.calls.lock().unwrap().is_empty());
}

#[test]
fn given_failing_backend_when_searching_then_single_generic_error() {
    let service = SearchService::new(MockSearch::new(true));

    let err = service.search("Acme").unwrap_err();

    assert_eq!(err.to_string(), "search request failed");
}

#[test]
fn given_configured_suffix_when_composing_query_then_name_comes_first() {
    let config = SearchConfig {
        query_suffix: "org chart".into(),
        ..SearchConfig::default()
    };
    let client = HttpCompanySearch::new(&config).unwrap();

    assert_eq!(client.query_for("Acme"), "Acme org chart");
}
