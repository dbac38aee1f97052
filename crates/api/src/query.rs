//! Editor queries - read-only access to editor state.

use glam::Vec2;
use org_canvas::{CommitBatch, DropTarget, InteractionMode, ReassignmentIntent};
use org_graph::{BoundsMode, Edge, Group, GroupId, Node, NodeId, NodeKind, RegionId};
use serde::{Deserialize, Serialize};

/// A query for editor state (read-only).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Query {
    /// Get every node in draw order.
    GetNodes,

    /// Get a specific node by ID.
    GetNode { id: NodeId },

    /// Get every edge.
    GetEdges,

    /// Get every group circle.
    GetGroups,

    /// Get the current selection.
    GetSelection,

    /// Get the current viewport state.
    GetViewport,

    /// Get the current interaction mode.
    GetInteraction,

    /// Get the highlighted drop target, if a drag has one.
    GetDropTarget,

    /// Get every staged reassignment.
    GetPendingIntents,

    /// Get what a commit would send right now.
    GetCommitBatch,

    /// Hit test a screen position.
    HitTest { position: Vec2 },
}

/// Response to a query.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryResult {
    Nodes { nodes: Vec<NodeInfo> },

    Node { node: Option<NodeInfo> },

    Edges { edges: Vec<Edge> },

    Groups { groups: Vec<GroupInfo> },

    /// Selection result, sorted by id.
    Selection { ids: Vec<NodeId> },

    Viewport { pan: Vec2, zoom: f32 },

    Interaction { mode: InteractionMode },

    DropTarget { target: Option<DropTarget> },

    Intents { intents: Vec<ReassignmentIntent> },

    Batch { batch: CommitBatch },

    /// Topmost node and first group under a screen position.
    Hit {
        node: Option<NodeId>,
        group: Option<GroupId>,
    },

    /// Error result.
    Error { message: String },
}

/// Serializable node information.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub id: NodeId,
    pub kind: NodeKind,
    pub label: String,
    pub position: Vec2,
    pub radius: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<RegionId>,
}

impl From<&Node> for NodeInfo {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            kind: node.kind,
            label: node.label.clone(),
            position: node.position.0,
            radius: node.radius,
            region_id: node.region_id.clone(),
        }
    }
}

/// Serializable group circle information.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupInfo {
    pub id: GroupId,
    pub label: String,
    pub members: Vec<NodeId>,
    pub center: Vec2,
    pub radius: f32,
    pub mode: BoundsMode,
}

impl From<&Group> for GroupInfo {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id.clone(),
            label: group.label.clone(),
            members: group.members.clone(),
            center: group.center().0,
            radius: group.radius(),
            mode: group.mode,
        }
    }
}
