//! Shared fixtures for integration tests

#![allow(dead_code)]

use orgmap::domain::{Company, Governance, Role, Subunit};

pub fn role(title: &str, level: &str) -> Role {
    Role {
        title: title.into(),
        level: Some(level.into()),
        ..Role::default()
    }
}

pub fn subunit(name: &str, roles: Vec<Role>) -> Subunit {
    Subunit {
        name: name.into(),
        roles,
        ..Subunit::default()
    }
}

pub fn governance(name: &str, subunits: Vec<Subunit>) -> Governance {
    Governance {
        name: name.into(),
        subunits,
        ..Governance::default()
    }
}

/// 1 root, 2 governance units, 1 subunit each with 2 roles: 9 nodes.
pub fn small_company() -> Company {
    Company {
        title: "Acme Health".into(),
        description: "Regional clinic group".into(),
        governance: vec![
            governance(
                "Board",
                vec![subunit(
                    "Engineering",
                    vec![
                        role("Director of Engineering", "senior"),
                        role("Software Engineer", "mid"),
                    ],
                )],
            ),
            governance(
                "Clinical Council",
                vec![subunit(
                    "Ward A",
                    vec![role("Nurse", "junior"), role("Head Nurse", "senior")],
                )],
            ),
        ],
    }
}
