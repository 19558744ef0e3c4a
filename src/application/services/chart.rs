//! Org-chart service
//!
//! Opens chart views for companies supplied by an `OrgSource`.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::view::ChartView;
use crate::application::viewport::CanvasConfig;
use crate::application::ApplicationResult;
use crate::domain::{LayoutConfig, LayoutEngine};
use crate::infrastructure::traits::OrgSource;

/// Service for loading companies into chart views.
pub struct ChartService {
    source: Arc<dyn OrgSource>,
    engine: LayoutEngine,
    canvas: CanvasConfig,
}

impl ChartService {
    /// Create a new chart service; rejects an invalid layout or canvas config.
    pub fn new(
        source: Arc<dyn OrgSource>,
        layout: LayoutConfig,
        canvas: CanvasConfig,
    ) -> ApplicationResult<Self> {
        canvas.validate()?;
        Ok(Self {
            source,
            engine: LayoutEngine::new(layout)?,
            canvas,
        })
    }

    /// Companies available from the source.
    pub fn companies(&self) -> ApplicationResult<Vec<String>> {
        self.source.list()
    }

    /// Open a view for `slug`.
    ///
    /// Fetch failures do not surface as `Err`: the returned view is in the
    /// `Failed` state, just as a rendering surface would show it.
    #[instrument(level = "debug", skip(self))]
    pub fn open(&self, slug: &str) -> ChartView {
        let mut view = ChartView::new(self.engine.clone(), self.canvas.clone());
        let ticket = view.begin_load();
        let outcome = view.finish_load(ticket, self.source.load(slug));
        debug!("open {}: {:?} -> {}", slug, outcome, view.state());
        view
    }
}
