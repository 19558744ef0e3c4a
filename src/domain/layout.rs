//! Radial layout engine.
//!
//! The root sits at a fixed center. Every other node is placed on a circle
//! around its anchor (normally its parent), with one circle per depth and
//! radii shrinking level by level. Nodes sharing an anchor and a category
//! are spread at equal angular spacing, shifted by a small per-depth offset
//! so neighbouring rings do not line up.
//!
//! Layout is a pure function of the tree, the retained node set and the
//! config: no state is carried between passes.

use std::collections::{HashMap, HashSet};
use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::domain::arena::OrgTree;
use crate::domain::entities::{NodeCategory, NodeId, OrgEdge, Position, RelationKind};
use crate::domain::error::DomainError;

/// What to do with a retained node whose parent was filtered out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
    /// Hang the node off its nearest retained ancestor, with an edge.
    #[default]
    Reparent,
    /// Keep the node without an edge, placed around the center.
    Drop,
}

impl OrphanPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrphanPolicy::Reparent => "reparent",
            OrphanPolicy::Drop => "drop",
        }
    }
}

impl fmt::Display for OrphanPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrphanPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reparent" => Ok(OrphanPolicy::Reparent),
            "drop" => Ok(OrphanPolicy::Drop),
            _ => Err(DomainError::UnknownOrphanPolicy(s.to_string())),
        }
    }
}

/// Layout parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Fixed position of the root node
    pub center: Position,
    /// Ring radius per depth, starting at depth 1; deeper levels reuse the last entry
    pub radii: Vec<f64>,
    /// Angular shift (radians) applied per depth below the first ring
    pub angular_offset: f64,
    pub orphan_policy: OrphanPolicy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            center: Position::new(400.0, 300.0),
            radii: vec![250.0, 200.0, 150.0, 100.0],
            angular_offset: 0.25,
            orphan_policy: OrphanPolicy::Reparent,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.radii.is_empty() {
            return Err(DomainError::InvalidLayout("radii must not be empty".into()));
        }
        if let Some(r) = self.radii.iter().find(|r| !r.is_finite() || **r <= 0.0) {
            return Err(DomainError::InvalidLayout(format!(
                "radius must be positive and finite, got {r}"
            )));
        }
        if !self.angular_offset.is_finite() {
            return Err(DomainError::InvalidLayout(
                "angular_offset must be finite".into(),
            ));
        }
        if !self.center.x.is_finite() || !self.center.y.is_finite() {
            return Err(DomainError::InvalidLayout("center must be finite".into()));
        }
        Ok(())
    }

    /// Ring radius for nodes at `depth` (>= 1).
    pub fn radius_for(&self, depth: usize) -> f64 {
        let slot = depth.saturating_sub(1).min(self.radii.len().saturating_sub(1));
        self.radii.get(slot).copied().unwrap_or(0.0)
    }

    /// Farthest a node at `depth` can be from the center.
    pub fn max_extent(&self, depth: usize) -> f64 {
        (1..=depth).map(|d| self.radius_for(d)).sum()
    }
}

/// A node id with its assigned coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedNode {
    pub id: NodeId,
    pub position: Position,
    pub depth: usize,
}

/// Output of one layout pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub nodes: Vec<PlacedNode>,
    pub edges: Vec<OrgEdge>,
}

impl Layout {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn position_of(&self, id: &NodeId) -> Option<Position> {
        self.nodes.iter().find(|n| &n.id == id).map(|n| n.position)
    }

    /// Bounding box `(min, max)` of all placed nodes.
    pub fn bounds(&self) -> Option<(Position, Position)> {
        let first = self.nodes.first()?.position;
        Some(self.nodes.iter().fold((first, first), |(min, max), n| {
            (
                Position::new(min.x.min(n.position.x), min.y.min(n.position.y)),
                Position::new(max.x.max(n.position.x), max.y.max(n.position.y)),
            )
        }))
    }
}

/// Where a node is placed around. `None` is the virtual center anchor.
type Anchor = Option<Index>;

struct Slot {
    idx: Index,
    anchor: Anchor,
    category: NodeCategory,
    depth: usize,
}

/// Computes positions and edges for an `OrgTree`.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Result<Self, DomainError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out the whole tree.
    #[instrument(level = "debug", skip(self, tree), fields(nodes = tree.len()))]
    pub fn layout(&self, tree: &OrgTree) -> Layout {
        self.place(tree, |_| true)
    }

    /// Lay out only the nodes whose ids are in `retained`.
    ///
    /// Positions are re-packed over the retained set; orphans are handled
    /// according to the configured `OrphanPolicy`.
    #[instrument(level = "debug", skip(self, tree, retained), fields(retained = retained.len()))]
    pub fn layout_subset(&self, tree: &OrgTree, retained: &HashSet<NodeId>) -> Layout {
        self.place(tree, |id| retained.contains(id))
    }

    fn place<F>(&self, tree: &OrgTree, keep: F) -> Layout
    where
        F: Fn(&NodeId) -> bool,
    {
        if tree.is_empty() {
            debug!("empty tree, empty layout");
            return Layout::default();
        }

        // Pass 1: anchors in pre-order, so anchors are placed before their dependents.
        let mut slots = Vec::new();
        for (idx, node) in tree.iter() {
            if !keep(&node.data.id) {
                continue;
            }
            let anchor = match node.parent {
                None => None,
                Some(parent) => self.anchor_for(tree, idx, parent, &keep),
            };
            slots.push(Slot {
                idx,
                anchor,
                category: node.data.category,
                depth: tree.depth_of(idx),
            });
        }

        let mut group_sizes: HashMap<(Anchor, NodeCategory), usize> = HashMap::new();
        for slot in slots.iter().filter(|s| s.depth > 0) {
            *group_sizes.entry((slot.anchor, slot.category)).or_default() += 1;
        }

        // Pass 2: positions and edges.
        let mut positions: HashMap<Index, Position> = HashMap::new();
        let mut next_in_group: HashMap<(Anchor, NodeCategory), usize> = HashMap::new();
        let mut layout = Layout::default();

        for slot in &slots {
            let Some(node) = tree.get_node(slot.idx) else {
                continue;
            };
            let position = if slot.depth == 0 {
                self.config.center
            } else {
                let key = (slot.anchor, slot.category);
                let n = group_sizes.get(&key).copied().unwrap_or(1).max(1);
                let i = next_in_group.entry(key).or_default();
                let origin = slot
                    .anchor
                    .and_then(|a| positions.get(&a).copied())
                    .unwrap_or(self.config.center);
                let angle =
                    TAU * (*i as f64) / (n as f64) + self.config.angular_offset * (slot.depth - 1) as f64;
                *i += 1;
                let radius = self.config.radius_for(slot.depth);
                Position::new(origin.x + radius * angle.cos(), origin.y + radius * angle.sin())
            };
            trace!("placed {} at ({:.1}, {:.1})", node.data.id, position.x, position.y);
            positions.insert(slot.idx, position);

            if let Some(anchor) = slot.anchor.and_then(|a| tree.get_node(a)) {
                if let Some(kind) = RelationKind::for_target(slot.category) {
                    layout
                        .edges
                        .push(OrgEdge::derive(&anchor.data.id, &node.data.id, kind));
                }
            }
            layout.nodes.push(PlacedNode {
                id: node.data.id.clone(),
                position,
                depth: slot.depth,
            });
        }

        debug!(
            "layout: {} nodes, {} edges",
            layout.nodes.len(),
            layout.edges.len()
        );
        layout
    }

    fn anchor_for<F>(&self, tree: &OrgTree, idx: Index, parent: Index, keep: &F) -> Anchor
    where
        F: Fn(&NodeId) -> bool,
    {
        match self.config.orphan_policy {
            OrphanPolicy::Drop => tree
                .get_node(parent)
                .filter(|p| keep(&p.data.id))
                .map(|_| parent),
            OrphanPolicy::Reparent => tree
                .ancestors(idx)
                .find(|(_, ancestor)| keep(&ancestor.data.id))
                .map(|(ancestor_idx, _)| ancestor_idx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_default_config_when_asking_radii_then_shrinks_per_depth() {
        let config = LayoutConfig::default();
        assert_eq!(config.radius_for(1), 250.0);
        assert_eq!(config.radius_for(3), 150.0);
        assert_eq!(config.radius_for(9), 100.0);
        assert_eq!(config.max_extent(2), 450.0);
    }

    #[test]
    fn given_non_positive_radius_when_validating_then_rejected() {
        let config = LayoutConfig {
            radii: vec![250.0, 0.0],
            ..LayoutConfig::default()
        };
        assert!(matches!(
            LayoutEngine::new(config),
            Err(DomainError::InvalidLayout(_))
        ));
    }

    #[test]
    fn given_policy_names_when_parsing_then_known_values_accepted() {
        assert_eq!("Drop".parse::<OrphanPolicy>(), Ok(OrphanPolicy::Drop));
        assert_eq!("reparent".parse::<OrphanPolicy>(), Ok(OrphanPolicy::Reparent));
        assert!("keep".parse::<OrphanPolicy>().is_err());
    }
}
