use crate::coords::WorldPoint;
use crate::hierarchy::Role;
use crate::{NodeId, RegionId};
use serde::{Deserialize, Serialize};

/// The kind of node, which drives its size and how it drags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Company,
    Admin,
    Manager,
    Driver,
    Client,
}

impl NodeKind {
    /// Node kind for a hierarchy role. Unknown roles get the client treatment.
    pub fn from_role(role: &Role) -> Self {
        match role {
            Role::CompanyAdmin => NodeKind::Admin,
            Role::Manager => NodeKind::Manager,
            Role::Driver => NodeKind::Driver,
            Role::Client | Role::Other(_) => NodeKind::Client,
        }
    }

    /// Default hit/draw radius in world units.
    pub fn default_radius(&self) -> f32 {
        match self {
            NodeKind::Company => 40.0,
            NodeKind::Manager => 30.0,
            NodeKind::Admin => 26.0,
            NodeKind::Driver | NodeKind::Client => 22.0,
        }
    }

    /// Managers and admins drag together with the nodes they point to.
    pub fn drags_linked(&self) -> bool {
        matches!(self, NodeKind::Manager | NodeKind::Admin)
    }

    /// Only staff that belong to a region can be moved between regions.
    pub fn is_reassignable(&self) -> bool {
        matches!(self, NodeKind::Manager | NodeKind::Driver | NodeKind::Client)
    }

    /// Whether this node sits on the member band under a manager.
    pub fn is_member(&self) -> bool {
        matches!(self, NodeKind::Driver | NodeKind::Client)
    }
}

/// A node in the region graph.
///
/// Identity is the id. Position is free-form once seeded; `region_id` only
/// changes through a rebuild after reassignments are committed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub label: String,
    pub position: WorldPoint,
    pub radius: f32,
    pub region_id: Option<RegionId>,
}

impl Node {
    pub fn new(id: NodeId, kind: NodeKind, label: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            label: label.into(),
            position: WorldPoint::ORIGIN,
            radius: kind.default_radius(),
            region_id: None,
        }
    }

    pub fn company(label: impl Into<String>) -> Self {
        Self::new(NodeId::company(), NodeKind::Company, label)
    }

    pub fn with_region(mut self, region_id: Option<RegionId>) -> Self {
        self.region_id = region_id;
        self
    }

    /// Circular hit area; points on the rim count as inside.
    pub fn contains_point(&self, point: WorldPoint) -> bool {
        self.position.distance(point) <= self.radius
    }
}
