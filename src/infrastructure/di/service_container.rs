//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{ChartService, SearchService};
use crate::config::Settings;
use crate::infrastructure::search::HttpCompanySearch;
use crate::infrastructure::source::{BuiltinSource, DirectorySource, LayeredSource};
use crate::infrastructure::traits::{CompanySearch, FileSystem, OrgSource, RealFileSystem};
use crate::infrastructure::InfraResult;

/// Container holding all application services.
pub struct ServiceContainer {
    pub charts: ChartService,

    pub search: SearchService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    ///
    /// Companies come from the configured data directory, falling back to
    /// the embedded sample.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let source: Arc<dyn OrgSource> = Arc::new(LayeredSource::new(vec![
            Arc::new(DirectorySource::new(Arc::clone(&fs), settings.data_dir.clone())),
            Arc::new(BuiltinSource),
        ]));
        let search: Arc<dyn CompanySearch> = Arc::new(HttpCompanySearch::new(&settings.search)?);
        Self::with_deps(&settings, source, search)
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: &Settings,
        source: Arc<dyn OrgSource>,
        search: Arc<dyn CompanySearch>,
    ) -> InfraResult<Self> {
        let charts = ChartService::new(source, settings.layout.clone(), settings.viewport.clone())?;
        let search = SearchService::new(search);

        Ok(Self { charts, search })
    }
}
