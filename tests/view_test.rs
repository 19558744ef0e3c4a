//! Tests for the chart view lifecycle, selection and viewport

mod common;

use orgmap::application::view::LOAD_FAILURE_MESSAGE;
use orgmap::application::viewport::{MAX_ZOOM, MIN_ZOOM};
use orgmap::application::{
    ApplicationError, CanvasConfig, ChartView, LoadOutcome, ViewState,
};
use orgmap::domain::{
    Company, DomainError, FilterCriteria, LayoutEngine, NodeCategory, NodeId, Position,
};
use orgmap::util::testing;

use common::small_company;

fn view() -> ChartView {
    ChartView::new(LayoutEngine::default(), CanvasConfig::default())
}

fn ready_view() -> ChartView {
    testing::init_test_setup();
    let mut view = view();
    let ticket = view.begin_load();
    let outcome = view.finish_load(ticket, Ok::<_, String>(small_company()));
    assert_eq!(outcome, LoadOutcome::Applied);
    view
}

// ============================================================
// Load lifecycle
// ============================================================

#[test]
fn given_new_view_when_loading_then_idle_loading_ready() {
    let mut view = view();
    assert!(matches!(view.state(), ViewState::Idle));

    let ticket = view.begin_load();
    assert!(matches!(view.state(), ViewState::Loading(t) if *t == ticket));

    view.finish_load(ticket, Ok::<_, String>(small_company()));
    let snapshot = view.snapshot().unwrap();
    assert_eq!(snapshot.layout().nodes.len(), 9);
    assert!(snapshot.selected().is_none());
}

#[test]
fn given_two_loads_when_first_finishes_late_then_discarded() {
    let mut view = view();
    let stale = view.begin_load();
    let current = view.begin_load();

    let outcome = view.finish_load(stale, Ok::<_, String>(small_company()));
    assert_eq!(outcome, LoadOutcome::Discarded);
    assert!(matches!(view.state(), ViewState::Loading(_)));

    let outcome = view.finish_load(current, Ok::<_, String>(Company::default()));
    assert_eq!(outcome, LoadOutcome::Applied);
    assert!(matches!(view.state(), ViewState::Empty));
}

#[test]
fn given_teardown_when_load_lands_then_discarded() {
    let mut view = view();
    let ticket = view.begin_load();
    view.teardown();

    let outcome = view.finish_load(ticket, Ok::<_, String>(small_company()));

    assert_eq!(outcome, LoadOutcome::Discarded);
    assert!(matches!(view.state(), ViewState::Closed));
}

#[test]
fn given_fetch_error_when_finishing_then_failed_with_generic_message() {
    let mut view = view();
    let ticket = view.begin_load();

    view.finish_load(ticket, Err::<Company, _>("connection reset"));

    match view.state() {
        ViewState::Failed(message) => assert_eq!(message, LOAD_FAILURE_MESSAGE),
        other => panic!("expected failed, got {other}"),
    }
    assert!(matches!(view.snapshot(), Err(ApplicationError::ViewNotReady(_))));
}

#[test]
fn given_failed_view_when_reloading_then_ready_again() {
    let mut view = view();
    let ticket = view.begin_load();
    view.finish_load(ticket, Err::<Company, _>("timeout"));

    let ticket = view.begin_load();
    view.finish_load(ticket, Ok::<_, String>(small_company()));

    assert!(view.snapshot().is_ok());
}

#[test]
fn given_empty_company_when_loading_then_empty_state_not_error() {
    let mut view = view();
    let ticket = view.begin_load();
    view.finish_load(ticket, Ok::<_, String>(Company::default()));

    assert!(matches!(view.state(), ViewState::Empty));
    assert!(view.detail().is_none());
}

// ============================================================
// Filtering and selection
// ============================================================

#[test]
fn given_ready_view_when_filtering_then_previous_snapshot_untouched() {
    let mut view = ready_view();
    let ViewState::Ready(before) = view.state().clone() else {
        panic!("view not ready");
    };

    view.apply_filter(FilterCriteria::new().with_query("nurse"))
        .unwrap();

    assert_eq!(before.layout().nodes.len(), 9);
    assert!(before.criteria().is_unconstrained());
    let after = view.snapshot().unwrap();
    assert_eq!(after.layout().nodes.len(), 2);
    assert_eq!(after.criteria().query, "nurse");
}

#[test]
fn given_selection_when_selecting_another_then_first_closed() {
    let mut view = ready_view();

    view.select(&NodeId::governance(0)).unwrap();
    let detail = view.select(&NodeId::role(1, 0, 0)).unwrap();

    assert_eq!(detail.label, "Nurse");
    assert_eq!(view.snapshot().unwrap().selected(), Some(&NodeId::role(1, 0, 0)));
    let chart = view.render().unwrap();
    let selected: Vec<_> = chart.nodes.iter().filter(|n| n.selected).collect();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].id, NodeId::role(1, 0, 0));
    assert!(selected[0].ring.is_some());
}

#[test]
fn given_unknown_id_when_selecting_then_error_and_selection_kept() {
    let mut view = ready_view();
    view.select(&NodeId::governance(1)).unwrap();

    let err = view.select(&NodeId::from("gov-42")).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::NodeNotFound(_))
    ));
    assert_eq!(view.snapshot().unwrap().selected(), Some(&NodeId::governance(1)));
}

#[test]
fn given_filtered_out_node_when_selecting_then_not_visible() {
    let mut view = ready_view();
    view.apply_filter(FilterCriteria::new().with_category(Some(NodeCategory::Role)))
        .unwrap();

    let err = view.select(&NodeId::governance(0)).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::NodeNotVisible(_))
    ));
}

#[test]
fn given_selected_node_when_filter_removes_it_then_selection_cleared() {
    let mut view = ready_view();
    view.select(&NodeId::subunit(0, 0)).unwrap();

    view.apply_filter(FilterCriteria::new().with_level(Some("junior".into())))
        .unwrap();

    assert!(view.snapshot().unwrap().selected().is_none());
    assert!(view.detail().is_none());
}

#[test]
fn given_selected_node_when_filter_keeps_it_then_selection_survives() {
    let mut view = ready_view();
    view.select(&NodeId::role(1, 0, 0)).unwrap();

    view.apply_filter(FilterCriteria::new().with_query("nurse"))
        .unwrap();

    assert_eq!(view.detail().map(|d| d.label), Some("Nurse".to_string()));
}

#[test]
fn given_open_detail_when_closing_then_nothing_selected() {
    let mut view = ready_view();
    view.select(&NodeId::root()).unwrap();

    view.close_detail().unwrap();

    assert!(view.detail().is_none());
}

// ============================================================
// Viewport
// ============================================================

#[test]
fn given_ready_view_when_zooming_then_clamped_to_bounds() {
    let mut view = ready_view();

    for _ in 0..10 {
        view.zoom_in().unwrap();
    }
    assert_eq!(view.snapshot().unwrap().viewport().zoom, MAX_ZOOM);

    for _ in 0..20 {
        view.zoom_out().unwrap();
    }
    assert_eq!(view.snapshot().unwrap().viewport().zoom, MIN_ZOOM);
}

#[test]
fn given_zoomed_view_when_reset_then_home_at_zoom_one() {
    let mut view = ready_view();
    view.zoom_in().unwrap();
    view.fit_view().unwrap();

    let viewport = view.reset_view().unwrap();

    assert_eq!(viewport.zoom, 1.0);
    assert_eq!(viewport.center, Position::new(400.0, 300.0));
}

#[test]
fn given_full_chart_when_fitting_then_bounding_box_fits_canvas() {
    let mut view = ready_view();
    let canvas = CanvasConfig::default();

    let viewport = view.fit_view().unwrap();

    let (min, max) = view.snapshot().unwrap().layout().bounds().unwrap();
    let width = (max.x - min.x + 2.0 * canvas.padding) * viewport.zoom;
    let height = (max.y - min.y + 2.0 * canvas.padding) * viewport.zoom;
    assert!(width <= canvas.width + 1e-6);
    assert!(height <= canvas.height + 1e-6);
    assert!((viewport.center.x - (min.x + max.x) / 2.0).abs() < 1e-9);
}

#[test]
fn given_loading_view_when_zooming_then_not_ready() {
    let mut view = view();
    view.begin_load();
    assert!(matches!(view.zoom_in(), Err(ApplicationError::ViewNotReady(_))));
}
