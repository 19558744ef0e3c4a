//! Presentation adapter: maps laid-out nodes and edges to render elements.

use std::panic::{self, UnwindSafe};

use serde::Serialize;
use tracing::{error, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Layout, NodeCategory, NodeId, OrgEdge, OrgNode, OrgTree, Position, RelationKind};

/// Ring drawn around the selected node.
pub const SELECTION_RING: &str = "#C084FC";

/// Visual treatment of one node category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeStyle {
    pub background: &'static str,
    pub text: &'static str,
    pub border: &'static str,
}

impl NodeStyle {
    pub fn for_category(category: NodeCategory) -> Self {
        match category {
            NodeCategory::Root => Self {
                background: "#9333EA",
                text: "#FFFFFF",
                border: "#6B21A8",
            },
            NodeCategory::Governance => Self {
                background: "#3B82F6",
                text: "#FFFFFF",
                border: "#1D4ED8",
            },
            NodeCategory::Subunit => Self {
                background: "#22C55E",
                text: "#FFFFFF",
                border: "#15803D",
            },
            NodeCategory::Role => Self {
                background: "#EAB308",
                text: "#FFFFFF",
                border: "#A16207",
            },
        }
    }
}

/// Line treatment shared by all edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EdgeStyle {
    pub kind: &'static str,
    pub stroke: &'static str,
    pub stroke_width: u8,
    pub marker_end: &'static str,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self {
            kind: "smoothstep",
            stroke: "#6B7280",
            stroke_width: 2,
            marker_end: "arrowclosed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderNode {
    pub id: NodeId,
    pub position: Position,
    pub category: NodeCategory,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub style: NodeStyle,
    pub selected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ring: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderEdge {
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
    pub relation_kind: RelationKind,
    pub style: EdgeStyle,
}

impl From<&OrgEdge> for RenderEdge {
    fn from(edge: &OrgEdge) -> Self {
        Self {
            id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            relation_kind: edge.relation_kind,
            style: EdgeStyle::default(),
        }
    }
}

/// Everything a graph surface needs to draw one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderedChart {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
}

/// Contents of the detail drawer for the selected node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeDetail {
    pub id: NodeId,
    pub label: String,
    pub category: NodeCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub responsibilities: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
}

impl From<&OrgNode> for NodeDetail {
    fn from(node: &OrgNode) -> Self {
        Self {
            id: node.id.clone(),
            label: node.label.clone(),
            category: node.category,
            level: node.level.clone(),
            description: node.description.clone(),
            responsibilities: node.responsibilities.clone(),
            requirements: node.requirements.clone(),
            skills: node.skills.clone(),
        }
    }
}

/// Build render elements for a layout pass.
#[instrument(level = "debug", skip_all, fields(nodes = layout.nodes.len()))]
pub fn render_chart(tree: &OrgTree, layout: &Layout, selected: Option<&NodeId>) -> RenderedChart {
    let nodes = layout
        .nodes
        .iter()
        .filter_map(|placed| {
            let node = tree.node(&placed.id)?;
            let is_selected = selected == Some(&placed.id);
            Some(RenderNode {
                id: node.id.clone(),
                position: placed.position,
                category: node.category,
                label: node.label.clone(),
                level: node.level.clone(),
                description: node.description.clone(),
                style: NodeStyle::for_category(node.category),
                selected: is_selected,
                ring: is_selected.then_some(SELECTION_RING),
            })
        })
        .collect();

    RenderedChart {
        nodes,
        edges: layout.edges.iter().map(RenderEdge::from).collect(),
    }
}

/// Run a render step, turning any panic into the generic render error.
pub fn render_guarded<T, F>(render: F) -> ApplicationResult<T>
where
    F: FnOnce() -> T + UnwindSafe,
{
    panic::catch_unwind(render).map_err(|cause| {
        let message = cause
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| cause.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        error!("render failed: {}", message);
        ApplicationError::Render
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_every_category_when_styling_then_backgrounds_are_distinct() {
        let mut backgrounds: Vec<_> = NodeCategory::ALL
            .iter()
            .map(|c| NodeStyle::for_category(*c).background)
            .collect();
        backgrounds.sort();
        backgrounds.dedup();
        assert_eq!(backgrounds.len(), NodeCategory::ALL.len());
    }

    #[test]
    fn given_panicking_render_when_guarded_then_generic_error() {
        let result: ApplicationResult<()> = render_guarded(|| panic!("boom"));
        let err = result.unwrap_err();
        assert!(matches!(err, ApplicationError::Render));
        assert_eq!(err.to_string(), "something went wrong, please reload");
    }

    #[test]
    fn given_successful_render_when_guarded_then_value_passes_through() {
        assert_eq!(render_guarded(|| 42).unwrap(), 42);
    }
}
