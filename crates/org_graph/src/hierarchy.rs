//! Hierarchy snapshot supplied by the surrounding application.
//!
//! The snapshot is deliberately lenient: ids, names and roles may all be
//! missing or malformed, and the graph builder degrades instead of failing.

use serde::{Deserialize, Serialize};

/// Organization hierarchy as resolved by a hierarchy source.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HierarchySnapshot {
    #[serde(default)]
    pub regions: Vec<RegionSnapshot>,
    #[serde(default)]
    pub unassigned: Vec<MemberSnapshot>,
}

impl HierarchySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: RegionSnapshot) -> Self {
        self.regions.push(region);
        self
    }

    pub fn with_unassigned(mut self, member: MemberSnapshot) -> Self {
        self.unassigned.push(member);
        self
    }

    /// Total number of members across regions and the unassigned bucket.
    pub fn member_count(&self) -> usize {
        self.regions.iter().map(|r| r.members.len()).sum::<usize>() + self.unassigned.len()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionSnapshot {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub members: Vec<MemberSnapshot>,
}

impl RegionSnapshot {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            members: Vec::new(),
        }
    }

    pub fn with_member(mut self, member: MemberSnapshot) -> Self {
        self.members.push(member);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberSnapshot {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Role,
}

impl MemberSnapshot {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            role,
        }
    }

    pub fn manager(id: &str) -> Self {
        Self::new(id, id, Role::Manager)
    }

    pub fn driver(id: &str) -> Self {
        Self::new(id, id, Role::Driver)
    }

    pub fn client(id: &str) -> Self {
        Self::new(id, id, Role::Client)
    }

    pub fn admin(id: &str) -> Self {
        Self::new(id, id, Role::CompanyAdmin)
    }
}

/// Role of a hierarchy member.
///
/// Parsed leniently from free-form strings; anything unrecognized is kept as
/// [`Role::Other`] and treated like a client.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    CompanyAdmin,
    Manager,
    Driver,
    #[default]
    Client,
    Other(String),
}

impl Role {
    pub fn parse(raw: &str) -> Self {
        let normalized: String = raw
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        match normalized.as_str() {
            "company_admin" | "companyadmin" | "admin" => Role::CompanyAdmin,
            "manager" | "region_manager" | "regional_manager" => Role::Manager,
            "driver" => Role::Driver,
            "client" | "customer" => Role::Client,
            _ => Role::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::CompanyAdmin => "company_admin",
            Role::Manager => "manager",
            Role::Driver => "driver",
            Role::Client => "client",
            Role::Other(raw) => raw,
        }
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        Role::parse(&raw)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}
