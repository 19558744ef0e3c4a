//! Domain entities: company hierarchy input and the flat node/edge model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

// ============================================================
// Inbound hierarchy
// ============================================================

/// Company hierarchy as delivered by a data source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub governance: Vec<Governance>,
}

impl Company {
    /// A company with no title and no governance units carries no chart.
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty() && self.governance.is_empty()
    }
}

/// Governance body directly under the company (board, committee, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Governance {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub subunits: Vec<Subunit>,
}

/// Department or office under a governance body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subunit {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub roles: Vec<Role>,
}

/// Position held inside a subunit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub title: String,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// One hit from the company-information search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub source: String,
}

// ============================================================
// Flat node model
// ============================================================

/// Stable node identifier, derived from the node's position in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn root() -> Self {
        Self("root".into())
    }

    pub fn governance(g: usize) -> Self {
        Self(format!("gov-{g}"))
    }

    pub fn subunit(g: usize, s: usize) -> Self {
        Self(format!("gov-{g}-sub-{s}"))
    }

    pub fn role(g: usize, s: usize, r: usize) -> Self {
        Self(format!("gov-{g}-sub-{s}-role-{r}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Closed set of node kinds in an org chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
    Root,
    Governance,
    Subunit,
    Role,
}

impl NodeCategory {
    pub const ALL: [NodeCategory; 4] = [
        NodeCategory::Root,
        NodeCategory::Governance,
        NodeCategory::Subunit,
        NodeCategory::Role,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeCategory::Root => "root",
            NodeCategory::Governance => "governance",
            NodeCategory::Subunit => "subunit",
            NodeCategory::Role => "role",
        }
    }

    /// Hierarchy depth at which this category lives (root = 0).
    pub fn depth(&self) -> usize {
        match self {
            NodeCategory::Root => 0,
            NodeCategory::Governance => 1,
            NodeCategory::Subunit => 2,
            NodeCategory::Role => 3,
        }
    }
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "root" => Ok(NodeCategory::Root),
            "governance" => Ok(NodeCategory::Governance),
            "subunit" => Ok(NodeCategory::Subunit),
            "role" => Ok(NodeCategory::Role),
            _ => Err(DomainError::UnknownCategory(s.to_string())),
        }
    }
}

/// A single entity of the hierarchy, flattened for layout and rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrgNode {
    pub id: NodeId,
    /// Explicit parent reference; `None` only for the root.
    pub parent: Option<NodeId>,
    pub label: String,
    pub category: NodeCategory,
    pub description: Option<String>,
    pub level: Option<String>,
    pub responsibilities: Vec<String>,
    pub requirements: Vec<String>,
    pub skills: Vec<String>,
}

impl OrgNode {
    pub fn new(id: NodeId, parent: Option<NodeId>, label: impl Into<String>, category: NodeCategory) -> Self {
        Self {
            id,
            parent,
            label: label.into(),
            category,
            description: None,
            level: None,
            responsibilities: Vec::new(),
            requirements: Vec::new(),
            skills: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|d| !d.trim().is_empty());
        self
    }
}

/// Kind of relation an edge expresses, keyed by the target's category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationKind {
    Oversees,
    Manages,
    ReportsTo,
}

impl RelationKind {
    /// Relation from a node's anchor to the node itself. Roots have none.
    pub fn for_target(category: NodeCategory) -> Option<Self> {
        match category {
            NodeCategory::Root => None,
            NodeCategory::Governance => Some(RelationKind::Oversees),
            NodeCategory::Subunit => Some(RelationKind::Manages),
            NodeCategory::Role => Some(RelationKind::ReportsTo),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Oversees => "oversees",
            RelationKind::Manages => "manages",
            RelationKind::ReportsTo => "reports-to",
        }
    }
}

/// Directed parent → child relation. Always derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OrgEdge {
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
    pub relation_kind: RelationKind,
}

impl OrgEdge {
    pub fn derive(source: &NodeId, target: &NodeId, relation_kind: RelationKind) -> Self {
        Self {
            id: format!("e-{source}-{target}"),
            source: source.clone(),
            target: target.clone(),
            relation_kind,
        }
    }
}

/// 2D display coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}
