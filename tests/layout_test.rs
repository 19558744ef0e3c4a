//! Tests for the radial layout engine

mod common;

use std::collections::HashSet;
use std::f64::consts::TAU;

use rstest::rstest;

use orgmap::domain::{
    retained_ids, Company, FilterCriteria, LayoutConfig, LayoutEngine, NodeCategory, NodeId,
    OrgTree, OrphanPolicy, Position, RelationKind, TreeBuilder,
};

use common::small_company;

const EPS: f64 = 1e-9;

fn tree() -> OrgTree {
    TreeBuilder::new().build(&small_company()).unwrap()
}

fn engine(policy: OrphanPolicy) -> LayoutEngine {
    LayoutEngine::new(LayoutConfig {
        orphan_policy: policy,
        ..LayoutConfig::default()
    })
    .unwrap()
}

#[test]
fn given_small_company_when_layout_then_nine_nodes_and_eight_edges() {
    let layout = LayoutEngine::default().layout(&tree());

    assert_eq!(layout.nodes.len(), 9);
    assert_eq!(layout.edges.len(), 8);
    assert_eq!(
        layout.position_of(&NodeId::root()),
        Some(Position::new(400.0, 300.0))
    );
}

#[test]
fn given_full_layout_when_measuring_then_each_node_on_its_ring() {
    let tree = tree();
    let engine = LayoutEngine::default();
    let layout = engine.layout(&tree);

    for placed in layout.nodes.iter().filter(|n| n.depth > 0) {
        let node = tree.node(&placed.id).unwrap();
        let parent = node.parent.as_ref().unwrap();
        let origin = layout.position_of(parent).unwrap();
        let expected = engine.config().radius_for(placed.depth);
        assert!(
            (placed.position.distance(&origin) - expected).abs() < EPS,
            "{} should sit {} from {}",
            placed.id,
            expected,
            parent
        );
        let from_center = placed.position.distance(&engine.config().center);
        assert!(from_center <= engine.config().max_extent(placed.depth) + EPS);
    }
}

#[test]
fn given_first_governance_when_layout_then_on_positive_x_axis() {
    let layout = LayoutEngine::default().layout(&tree());

    // index 0 of 2 at depth 1: angle 0
    let gov0 = layout.position_of(&NodeId::governance(0)).unwrap();
    assert!((gov0.x - 650.0).abs() < EPS);
    assert!((gov0.y - 300.0).abs() < EPS);

    // index 1 of 2: angle pi
    let gov1 = layout.position_of(&NodeId::governance(1)).unwrap();
    assert!((gov1.x - 150.0).abs() < EPS);
}

#[test]
fn given_full_layout_when_deriving_edges_then_one_per_non_root_to_parent() {
    let tree = tree();
    let layout = LayoutEngine::default().layout(&tree);

    let targets: HashSet<&NodeId> = layout.edges.iter().map(|e| &e.target).collect();
    assert_eq!(targets.len(), layout.edges.len(), "no duplicate targets");

    for edge in &layout.edges {
        let target = tree.node(&edge.target).unwrap();
        assert_eq!(target.parent.as_ref(), Some(&edge.source));
        assert_eq!(edge.id, format!("e-{}-{}", edge.source, edge.target));
        assert_eq!(RelationKind::for_target(target.category), Some(edge.relation_kind));
    }
}

#[test]
fn given_same_tree_when_layout_twice_then_identical() {
    let tree = tree();
    let engine = LayoutEngine::default();
    assert_eq!(engine.layout(&tree), engine.layout(&tree));
}

#[test]
fn given_empty_company_when_layout_then_empty_without_error() {
    let tree = TreeBuilder::new().build(&Company::default()).unwrap();
    let layout = LayoutEngine::default().layout(&tree);
    assert!(layout.is_empty());
    assert!(layout.edges.is_empty());
    assert!(layout.bounds().is_none());
}

#[test]
fn given_filtered_layout_when_repeated_then_idempotent() {
    let tree = tree();
    let engine = LayoutEngine::default();
    let retained = retained_ids(&tree, &FilterCriteria::new().with_query("nurse"));

    assert_eq!(
        engine.layout_subset(&tree, &retained),
        engine.layout_subset(&tree, &retained)
    );
}

#[test]
fn given_roles_only_when_reparenting_then_repacked_around_center() {
    let tree = tree();
    let engine = engine(OrphanPolicy::Reparent);
    let retained = retained_ids(
        &tree,
        &FilterCriteria::new().with_category(Some(NodeCategory::Role)),
    );

    let layout = engine.layout_subset(&tree, &retained);

    assert_eq!(layout.nodes.len(), 4);
    assert!(layout.edges.is_empty(), "no retained ancestors, no edges");
    // four roles share the center anchor: quarter turns, shifted by the depth-3 offset
    let offset = 0.25 * 2.0;
    for (i, placed) in layout.nodes.iter().enumerate() {
        let angle = TAU * i as f64 / 4.0 + offset;
        let expected = Position::new(400.0 + 150.0 * angle.cos(), 300.0 + 150.0 * angle.sin());
        assert!(placed.position.distance(&expected) < EPS, "{}", placed.id);
    }
}

#[rstest]
#[case(OrphanPolicy::Reparent, 2)]
#[case(OrphanPolicy::Drop, 0)]
fn given_subunits_filtered_out_when_layout_then_policy_decides_edges(
    #[case] policy: OrphanPolicy,
    #[case] expected_edges: usize,
) {
    let tree = tree();
    // keep root and the engineering roles; drop governance and subunits
    let retained: HashSet<NodeId> = [
        NodeId::root(),
        NodeId::role(0, 0, 0),
        NodeId::role(0, 0, 1),
    ]
    .into_iter()
    .collect();

    let layout = engine(policy).layout_subset(&tree, &retained);

    assert_eq!(layout.nodes.len(), 3);
    assert_eq!(layout.edges.len(), expected_edges);
    for edge in &layout.edges {
        assert!(retained.contains(&edge.source), "dangling source {}", edge.source);
        assert!(retained.contains(&edge.target), "dangling target {}", edge.target);
        assert_eq!(edge.source, NodeId::root());
        assert_eq!(edge.relation_kind, RelationKind::ReportsTo);
    }
    // Either way the roles ring the center like top-level nodes of depth 3
    for (i, id) in [NodeId::role(0, 0, 0), NodeId::role(0, 0, 1)].iter().enumerate() {
        let angle = TAU * i as f64 / 2.0 + 0.25 * 2.0;
        let expected = Position::new(400.0 + 150.0 * angle.cos(), 300.0 + 150.0 * angle.sin());
        let actual = layout.position_of(id).unwrap();
        assert!(actual.distance(&expected) < EPS, "{id} at {actual:?}, expected {expected:?}");
    }
}

#[test]
fn given_one_sibling_left_when_layout_then_repacked_under_retained_parent() {
    // Arrange
    let tree = tree();
    let subunit = NodeId::subunit(0, 0);
    let survivor = NodeId::role(0, 0, 1);
    let retained: HashSet<NodeId> = [
        NodeId::root(),
        NodeId::governance(0),
        subunit.clone(),
        survivor.clone(),
    ]
    .into_iter()
    .collect();

    // Act
    let layout = LayoutEngine::default().layout_subset(&tree, &retained);

    // Assert: index 0 of 1 at depth 3, not index 1 of 2
    let origin = layout.position_of(&subunit).unwrap();
    let actual = layout.position_of(&survivor).unwrap();
    let angle: f64 = 0.25 * 2.0;
    let expected = Position::new(origin.x + 150.0 * angle.cos(), origin.y + 150.0 * angle.sin());
    assert!((actual.distance(&origin) - 150.0).abs() < EPS);
    assert!(actual.distance(&expected) < EPS, "{actual:?} != {expected:?}");
    assert!(layout
        .edges
        .iter()
        .any(|e| e.source == subunit && e.target == survivor));
}

#[rstest]
#[case(vec![], "radii must not be empty")]
#[case(vec![100.0, -5.0], "radius must be positive")]
fn given_bad_radii_when_creating_engine_then_rejected(
    #[case] radii: Vec<f64>,
    #[case] message: &str,
) {
    let err = LayoutEngine::new(LayoutConfig {
        radii,
        ..LayoutConfig::default()
    })
    .unwrap_err();
    assert!(err.to_string().contains(message), "{err}");
}

#[test]
fn given_short_radii_table_when_deep_node_then_last_radius_reused() {
    let config = LayoutConfig {
        radii: vec![300.0],
        ..LayoutConfig::default()
    };
    assert_eq!(config.radius_for(1), 300.0);
    assert_eq!(config.radius_for(3), 300.0);
    assert_eq!(config.max_extent(3), 900.0);
}
