//! Domain layer: org-chart entities, tree, layout and filtering
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod filter;
pub mod layout;

pub use arena::{OrgTree, TreeNode};
pub use builder::{TreeBuilder, TreeResult};
pub use entities::*;
pub use error::DomainError;
pub use filter::{filter_nodes, levels, retained_ids, FilterCriteria};
pub use layout::{Layout, LayoutConfig, LayoutEngine, OrphanPolicy, PlacedNode};
