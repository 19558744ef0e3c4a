//! Chart view state: load lifecycle, filtering, selection and viewport.
//!
//! The view owns the only mutable state of the presentation layer. Every
//! change builds a fresh `ChartSnapshot` and swaps it in whole; snapshots are
//! never edited in place.

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::application::render::{render_chart, render_guarded, NodeDetail, RenderedChart};
use crate::application::viewport::{CanvasConfig, Viewport};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    retained_ids, Company, DomainError, FilterCriteria, Layout, LayoutEngine, NodeId, OrgTree,
    TreeBuilder,
};

/// Message shown when company data could not be fetched.
pub const LOAD_FAILURE_MESSAGE: &str = "failed to load organization data";

/// Identifies one load request; only the latest one may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// What happened to a completed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// The result arrived for a superseded request or after teardown.
    Discarded,
}

/// Immutable frame of a ready view.
#[derive(Debug, Clone)]
pub struct ChartSnapshot {
    tree: Arc<OrgTree>,
    criteria: FilterCriteria,
    layout: Layout,
    selected: Option<NodeId>,
    viewport: Viewport,
}

impl ChartSnapshot {
    pub fn tree(&self) -> &OrgTree {
        &self.tree
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn selected(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_visible(&self, id: &NodeId) -> bool {
        self.layout.nodes.iter().any(|n| &n.id == id)
    }

    /// Drawer contents for the selected node, if any.
    pub fn detail(&self) -> Option<NodeDetail> {
        self.selected
            .as_ref()
            .and_then(|id| self.tree.node(id))
            .map(NodeDetail::from)
    }

    pub fn render(&self) -> RenderedChart {
        render_chart(&self.tree, &self.layout, self.selected.as_ref())
    }
}

#[derive(Debug, Clone)]
pub enum ViewState {
    Idle,
    Loading(LoadTicket),
    Ready(Arc<ChartSnapshot>),
    /// Data arrived but holds no chart.
    Empty,
    Failed(String),
    /// Torn down; no further updates are applied.
    Closed,
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewState::Idle => f.write_str("idle"),
            ViewState::Loading(_) => f.write_str("loading"),
            ViewState::Ready(_) => f.write_str("ready"),
            ViewState::Empty => f.write_str("empty"),
            ViewState::Failed(message) => write!(f, "failed: {message}"),
            ViewState::Closed => f.write_str("closed"),
        }
    }
}

/// Org-chart view for one company selection.
pub struct ChartView {
    engine: LayoutEngine,
    canvas: CanvasConfig,
    state: ViewState,
    generation: u64,
}

impl ChartView {
    pub fn new(engine: LayoutEngine, canvas: CanvasConfig) -> Self {
        Self {
            engine,
            canvas,
            state: ViewState::Idle,
            generation: 0,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn snapshot(&self) -> ApplicationResult<&ChartSnapshot> {
        match &self.state {
            ViewState::Ready(snapshot) => Ok(snapshot),
            other => Err(ApplicationError::ViewNotReady(other.to_string())),
        }
    }

    /// Start a load; any earlier outstanding load becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        let ticket = LoadTicket(self.generation);
        if !matches!(self.state, ViewState::Closed) {
            self.state = ViewState::Loading(ticket);
        }
        debug!("begin load {:?}", ticket);
        ticket
    }

    /// Deliver the result of a load started with `ticket`.
    #[instrument(level = "debug", skip(self, result))]
    pub fn finish_load<E: fmt::Display>(
        &mut self,
        ticket: LoadTicket,
        result: Result<Company, E>,
    ) -> LoadOutcome {
        match self.state {
            ViewState::Loading(current) if current == ticket => {}
            _ => {
                debug!("discarding load result for {:?} (state: {})", ticket, self.state);
                return LoadOutcome::Discarded;
            }
        }

        let company = match result {
            Ok(company) => company,
            Err(e) => {
                error!("load failed: {}", e);
                self.state = ViewState::Failed(LOAD_FAILURE_MESSAGE.to_string());
                return LoadOutcome::Applied;
            }
        };

        self.state = match TreeBuilder::new().build(&company) {
            Ok(tree) if tree.is_empty() => ViewState::Empty,
            Ok(tree) => {
                info!("loaded '{}' with {} nodes", company.title, tree.len());
                let tree = Arc::new(tree);
                let layout = self.engine.layout(&tree);
                let viewport = Viewport::new(self.engine.config().center);
                ViewState::Ready(Arc::new(ChartSnapshot {
                    tree,
                    criteria: FilterCriteria::default(),
                    layout,
                    selected: None,
                    viewport,
                }))
            }
            Err(e) => {
                error!("invalid company data: {}", e);
                ViewState::Failed(LOAD_FAILURE_MESSAGE.to_string())
            }
        };
        LoadOutcome::Applied
    }

    /// Stop accepting updates. In-flight loads are discarded when they land.
    pub fn teardown(&mut self) {
        debug!("teardown");
        self.state = ViewState::Closed;
    }

    /// Apply new filter criteria and re-derive layout and edges.
    ///
    /// A selection that is no longer visible is cleared.
    #[instrument(level = "debug", skip(self))]
    pub fn apply_filter(&mut self, criteria: FilterCriteria) -> ApplicationResult<()> {
        let current = self.snapshot()?;
        let layout = if criteria.is_unconstrained() {
            self.engine.layout(&current.tree)
        } else {
            let retained = retained_ids(&current.tree, &criteria);
            self.engine.layout_subset(&current.tree, &retained)
        };
        let selected = current
            .selected
            .clone()
            .filter(|id| layout.nodes.iter().any(|n| &n.id == id));
        if current.selected.is_some() && selected.is_none() {
            warn!("selected node filtered out, closing detail");
        }
        let next = ChartSnapshot {
            tree: Arc::clone(&current.tree),
            criteria,
            layout,
            selected,
            viewport: current.viewport,
        };
        self.replace(next);
        Ok(())
    }

    /// Select a node and open its detail; replaces any previous selection.
    #[instrument(level = "debug", skip(self))]
    pub fn select(&mut self, id: &NodeId) -> ApplicationResult<NodeDetail> {
        let current = self.snapshot()?;
        if current.tree.node(id).is_none() {
            return Err(DomainError::NodeNotFound(id.to_string()).into());
        }
        if !current.is_visible(id) {
            return Err(DomainError::NodeNotVisible(id.to_string()).into());
        }
        let next = ChartSnapshot {
            selected: Some(id.clone()),
            ..current.clone()
        };
        let detail = next.detail();
        self.replace(next);
        detail.ok_or_else(|| DomainError::NodeNotFound(id.to_string()).into())
    }

    /// Close the detail drawer.
    pub fn close_detail(&mut self) -> ApplicationResult<()> {
        let current = self.snapshot()?;
        let next = ChartSnapshot {
            selected: None,
            ..current.clone()
        };
        self.replace(next);
        Ok(())
    }

    pub fn detail(&self) -> Option<NodeDetail> {
        self.snapshot().ok().and_then(|s| s.detail())
    }

    pub fn zoom_in(&mut self) -> ApplicationResult<Viewport> {
        self.update_viewport(|v, _, _| v.zoom_in())
    }

    pub fn zoom_out(&mut self) -> ApplicationResult<Viewport> {
        self.update_viewport(|v, _, _| v.zoom_out())
    }

    pub fn fit_view(&mut self) -> ApplicationResult<Viewport> {
        self.update_viewport(|v, layout, canvas| v.fit(layout, canvas))
    }

    pub fn reset_view(&mut self) -> ApplicationResult<Viewport> {
        let home = self.engine.config().center;
        self.update_viewport(move |_, _, _| Viewport::reset(home))
    }

    fn update_viewport<F>(&mut self, f: F) -> ApplicationResult<Viewport>
    where
        F: FnOnce(Viewport, &Layout, &CanvasConfig) -> Viewport,
    {
        let current = self.snapshot()?;
        let viewport = f(current.viewport, &current.layout, &self.canvas);
        let next = ChartSnapshot {
            viewport,
            ..current.clone()
        };
        self.replace(next);
        Ok(viewport)
    }

    /// Render the current frame behind the panic boundary.
    pub fn render(&self) -> ApplicationResult<RenderedChart> {
        let snapshot = self.snapshot()?;
        render_guarded(AssertUnwindSafe(|| snapshot.render()))
    }

    fn replace(&mut self, next: ChartSnapshot) {
        self.state = ViewState::Ready(Arc::new(next));
    }
}
