//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the org-chart model.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("node not in current view: {0}")]
    NodeNotVisible(String),

    #[error("unknown category: {0} (expected all, root, governance, subunit or role)")]
    UnknownCategory(String),

    #[error("unknown orphan policy: {0} (expected reparent or drop)")]
    UnknownOrphanPolicy(String),

    #[error("invalid layout config: {0}")]
    InvalidLayout(String),

    #[error("invalid org data: {message}")]
    InvalidOrgData { message: String },
}
