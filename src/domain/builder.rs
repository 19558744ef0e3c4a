//! Tree builder: turns a nested company hierarchy into an arena tree.

use tracing::{debug, instrument};

use crate::domain::arena::OrgTree;
use crate::domain::entities::{Company, NodeCategory, NodeId, OrgNode};
use crate::domain::error::DomainError;

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;

/// Constructs an `OrgTree` from company data.
///
/// Every node gets an explicit parent reference and a deterministic id
/// (`root`, `gov-{g}`, `gov-{g}-sub-{s}`, `gov-{g}-sub-{s}-role-{r}`).
#[derive(Debug, Default)]
pub struct TreeBuilder;

impl TreeBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the tree for one company. Empty input yields an empty tree.
    #[instrument(level = "debug", skip(self, company), fields(company = %company.title))]
    pub fn build(&self, company: &Company) -> TreeResult<OrgTree> {
        let mut tree = OrgTree::new();
        if company.is_empty() {
            debug!("empty company, nothing to build");
            return Ok(tree);
        }

        if company.title.trim().is_empty() {
            return Err(DomainError::InvalidOrgData {
                message: "company has no name".into(),
            });
        }

        let root_id = NodeId::root();
        let root = tree.insert_node(
            OrgNode::new(root_id.clone(), None, company.title.clone(), NodeCategory::Root)
                .with_description(Some(company.description.clone())),
            None,
        );

        for (g, governance) in company.governance.iter().enumerate() {
            require_label(&governance.name, "governance unit", g)?;
            let gov_id = NodeId::governance(g);
            let gov_idx = tree.insert_node(
                OrgNode::new(
                    gov_id.clone(),
                    Some(root_id.clone()),
                    governance.name.clone(),
                    NodeCategory::Governance,
                )
                .with_description(Some(governance.description.clone())),
                Some(root),
            );

            for (s, subunit) in governance.subunits.iter().enumerate() {
                require_label(&subunit.name, "subunit", s)?;
                let sub_id = NodeId::subunit(g, s);
                let sub_idx = tree.insert_node(
                    OrgNode::new(
                        sub_id.clone(),
                        Some(gov_id.clone()),
                        subunit.name.clone(),
                        NodeCategory::Subunit,
                    )
                    .with_description(subunit.description.clone()),
                    Some(gov_idx),
                );

                for (r, role) in subunit.roles.iter().enumerate() {
                    require_label(&role.title, "role", r)?;
                    let mut node = OrgNode::new(
                        NodeId::role(g, s, r),
                        Some(sub_id.clone()),
                        role.title.clone(),
                        NodeCategory::Role,
                    )
                    .with_description(role.description.clone());
                    node.level = role.level.clone().filter(|l| !l.trim().is_empty());
                    node.responsibilities = role.responsibilities.clone();
                    node.requirements = role.requirements.clone();
                    node.skills = role.skills.clone();
                    tree.insert_node(node, Some(sub_idx));
                }
            }
        }

        debug!("built tree with {} nodes", tree.len());
        Ok(tree)
    }
}

fn require_label(label: &str, kind: &str, position: usize) -> TreeResult<()> {
    if label.trim().is_empty() {
        return Err(DomainError::InvalidOrgData {
            message: format!("{kind} #{position} has no name"),
        });
    }
    Ok(())
}
