//! Filter/search engine over org nodes.

use std::collections::HashSet;

use crate::domain::arena::OrgTree;
use crate::domain::entities::{NodeCategory, NodeId, OrgNode};
use crate::domain::error::DomainError;

/// Text and categorical constraints, combined with logical AND.
///
/// `None` for category or level means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub query: String,
    pub category: Option<NodeCategory>,
    pub level: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_category(mut self, category: Option<NodeCategory>) -> Self {
        self.category = category;
        self
    }

    pub fn with_level(mut self, level: Option<String>) -> Self {
        self.level = level;
        self
    }

    /// Parse a category filter value; `all` (any case) means no constraint.
    pub fn parse_category(value: &str) -> Result<Option<NodeCategory>, DomainError> {
        if value.trim().eq_ignore_ascii_case("all") {
            Ok(None)
        } else {
            value.parse().map(Some)
        }
    }

    /// Parse a level filter value; `all` (any case) means no constraint.
    pub fn parse_level(value: &str) -> Option<String> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            None
        } else {
            Some(value.to_string())
        }
    }

    /// True when no predicate narrows the node set.
    pub fn is_unconstrained(&self) -> bool {
        self.query.trim().is_empty() && self.category.is_none() && self.level.is_none()
    }

    pub fn matches(&self, node: &OrgNode) -> bool {
        self.matches_query(node) && self.matches_category(node) && self.matches_level(node)
    }

    fn matches_query(&self, node: &OrgNode) -> bool {
        let query = self.query.trim();
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        node.label.to_lowercase().contains(&needle)
            || node
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
    }

    fn matches_category(&self, node: &OrgNode) -> bool {
        self.category.map_or(true, |c| node.category == c)
    }

    fn matches_level(&self, node: &OrgNode) -> bool {
        match &self.level {
            None => true,
            Some(level) => node.level.as_deref() == Some(level.as_str()),
        }
    }
}

/// Retain the nodes matching `criteria`, preserving input order.
pub fn filter_nodes<'a, I>(nodes: I, criteria: &FilterCriteria) -> Vec<&'a OrgNode>
where
    I: IntoIterator<Item = &'a OrgNode>,
{
    nodes.into_iter().filter(|n| criteria.matches(n)).collect()
}

/// Ids of the nodes of `tree` retained by `criteria`.
pub fn retained_ids(tree: &OrgTree, criteria: &FilterCriteria) -> HashSet<NodeId> {
    filter_nodes(tree.nodes(), criteria)
        .into_iter()
        .map(|n| n.id.clone())
        .collect()
}

/// Distinct level labels present in the tree, sorted.
pub fn levels(tree: &OrgTree) -> Vec<String> {
    let mut levels: Vec<String> = tree.nodes().filter_map(|n| n.level.clone()).collect();
    levels.sort();
    levels.dedup();
    levels
}
