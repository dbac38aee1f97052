use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node in the graph.
///
/// Member nodes reuse the hierarchy member id so that rebuilding from the same
/// snapshot yields the same ids.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Id of the synthetic company root.
    pub const COMPANY: &'static str = "company";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn company() -> Self {
        Self::new(Self::COMPANY)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a region as known to the hierarchy source.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RegionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Debug for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegionId({})", self.0)
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of an edge, derived from its endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    pub fn between(from: &NodeId, to: &NodeId) -> Self {
        Self(format!("{from}->{to}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a group circle.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupId {
    /// A real region from the hierarchy.
    Region(RegionId),
    /// Members without a region.
    Unassigned,
    /// Company administrators.
    Admins,
}

impl GroupId {
    /// The region a node dropped on this group would be assigned to.
    ///
    /// `None` for the admin cluster, which never receives reassignments.
    pub fn target_region(&self) -> Option<Option<RegionId>> {
        match self {
            GroupId::Region(id) => Some(Some(id.clone())),
            GroupId::Unassigned => Some(None),
            GroupId::Admins => None,
        }
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupId::Region(id) => write!(f, "region:{id}"),
            GroupId::Unassigned => f.write_str("unassigned"),
            GroupId::Admins => f.write_str("admins"),
        }
    }
}
