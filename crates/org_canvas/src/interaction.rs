//! Interaction state: one value, one payload per mode.

use org_graph::{Aabb, Graph, GroupId, NodeId, ScreenPoint, WorldDelta, WorldPoint};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Modifier keys held during a pointer press.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    /// Extends the selection on node clicks; starts a box select on empty canvas.
    #[serde(default)]
    pub shift: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn shift() -> Self {
        Self { shift: true }
    }
}

/// Current pointer interaction.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Interaction {
    #[default]
    Idle,
    /// Dragging empty canvas moves the viewport.
    Panning { last: ScreenPoint },
    /// Rubber-band selection between two world corners.
    BoxSelecting { origin: WorldPoint, current: WorldPoint },
    /// Moving nodes.
    Dragging(DragSession),
}

/// Discriminant of [`Interaction`], for reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
    Idle,
    Panning,
    BoxSelecting,
    Dragging,
}

impl Interaction {
    pub fn mode(&self) -> InteractionMode {
        match self {
            Interaction::Idle => InteractionMode::Idle,
            Interaction::Panning { .. } => InteractionMode::Panning,
            Interaction::BoxSelecting { .. } => InteractionMode::BoxSelecting,
            Interaction::Dragging(_) => InteractionMode::Dragging,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }

    /// The rubber band, while box selecting.
    pub fn selection_rect(&self) -> Option<Aabb> {
        match self {
            Interaction::BoxSelecting { origin, current } => {
                Some(Aabb::from_corners(origin.0, current.0))
            }
            _ => None,
        }
    }

    pub fn drag(&self) -> Option<&DragSession> {
        match self {
            Interaction::Dragging(session) => Some(session),
            _ => None,
        }
    }
}

/// What the pointer grabbed to start a drag.
#[derive(Clone, Debug, PartialEq)]
pub enum DragOrigin {
    Node(NodeId),
    /// A group circle; `offset` is the pointer's offset from the circle center.
    Group { id: GroupId, offset: WorldDelta },
}

/// The group a dragged node currently hovers over, eligible for a drop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropTarget {
    pub group: GroupId,
    /// The dragged node that overlaps the group.
    pub node: NodeId,
}

/// State of one drag, from pointer-down to release.
#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
    pub origin: DragOrigin,
    /// Nodes moving together, the grabbed node first.
    pub dragged: Vec<NodeId>,
    /// Pointer position minus node position, captured at drag start.
    pub offsets: HashMap<NodeId, WorldDelta>,
    pub drop_target: Option<DropTarget>,
}

impl DragSession {
    pub fn new(origin: DragOrigin, dragged: Vec<NodeId>, pointer: WorldPoint, graph: &Graph) -> Self {
        let offsets = dragged
            .iter()
            .filter_map(|id| graph.position(id).map(|p| (id.clone(), pointer - p)))
            .collect();
        Self {
            origin,
            dragged,
            offsets,
            drop_target: None,
        }
    }

    /// Where a dragged node goes for a pointer position.
    pub fn position_for(&self, node: &NodeId, pointer: WorldPoint) -> Option<WorldPoint> {
        self.offsets.get(node).map(|offset| pointer - *offset)
    }

    pub fn is_group_drag(&self) -> bool {
        matches!(self.origin, DragOrigin::Group { .. })
    }
}
