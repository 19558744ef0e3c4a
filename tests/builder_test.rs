//! Tests for building org trees from company data

mod common;

use orgmap::domain::{Company, DomainError, NodeCategory, NodeId, TreeBuilder};
use orgmap::infrastructure::source::{BuiltinSource, BUILTIN_SLUG};
use orgmap::infrastructure::traits::OrgSource;

use common::{governance, small_company};

#[test]
fn given_small_company_when_building_then_nine_nodes_in_preorder() {
    let tree = TreeBuilder::new().build(&small_company()).unwrap();

    let ids: Vec<&str> = tree.nodes().map(|n| n.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "root",
            "gov-0",
            "gov-0-sub-0",
            "gov-0-sub-0-role-0",
            "gov-0-sub-0-role-1",
            "gov-1",
            "gov-1-sub-0",
            "gov-1-sub-0-role-0",
            "gov-1-sub-0-role-1",
        ]
    );
    assert_eq!(tree.depth(), 4);
}

#[test]
fn given_built_tree_when_inspecting_parents_then_only_root_has_none() {
    let tree = TreeBuilder::new().build(&small_company()).unwrap();

    for node in tree.nodes() {
        match node.category {
            NodeCategory::Root => assert!(node.parent.is_none()),
            _ => {
                let parent = node.parent.as_ref().expect("non-root has parent");
                assert!(tree.node(parent).is_some(), "parent {parent} exists");
            }
        }
    }
    let nurse = tree.node(&NodeId::role(1, 0, 0)).unwrap();
    assert_eq!(nurse.parent, Some(NodeId::subunit(1, 0)));
    assert_eq!(nurse.level.as_deref(), Some("junior"));
}

#[test]
fn given_empty_company_when_building_then_empty_tree() {
    let tree = TreeBuilder::new().build(&Company::default()).unwrap();
    assert!(tree.is_empty());
    assert_eq!(tree.depth(), 0);
}

#[test]
fn given_title_only_company_when_building_then_single_root() {
    let company = Company {
        title: "Solo Practice".into(),
        ..Company::default()
    };
    let tree = TreeBuilder::new().build(&company).unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.leaf_nodes(), vec![NodeId::root()]);
}

#[test]
fn given_blank_title_with_governance_when_building_then_invalid_data() {
    let company = Company {
        title: "   ".into(),
        governance: vec![governance("Board", vec![])],
        ..Company::default()
    };

    let err = TreeBuilder::new().build(&company).unwrap_err();

    assert!(
        matches!(&err, DomainError::InvalidOrgData { message } if message.contains("company")),
        "{err}"
    );
}

#[test]
fn given_blank_governance_name_when_building_then_invalid_data() {
    let company = Company {
        title: "Acme".into(),
        governance: vec![governance("  ", vec![])],
        ..Company::default()
    };
    let err = TreeBuilder::new().build(&company).unwrap_err();
    assert!(matches!(err, DomainError::InvalidOrgData { .. }));
}

#[test]
fn given_builtin_hospital_when_building_then_all_levels_present() {
    let company = BuiltinSource.load(BUILTIN_SLUG).unwrap();
    let tree = TreeBuilder::new().build(&company).unwrap();

    assert_eq!(tree.len(), 16);
    assert_eq!(tree.leaf_nodes().len(), 8);
    assert_eq!(
        orgmap::domain::levels(&tree),
        vec!["executive", "junior", "mid", "senior"]
    );
}
