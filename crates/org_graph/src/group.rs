use crate::bounds::{compute_bounds, BoundsStyle, CircleBounds};
use crate::coords::WorldPoint;
use crate::{GroupId, NodeId};
use serde::{Deserialize, Serialize};

/// When a group's circle is recomputed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsMode {
    /// Frozen between explicit recomputes (load, save, reset view).
    #[default]
    Cached,
    /// Recomputed after every member position update.
    Live,
}

/// A group circle: a region, the unassigned bucket, or the admin cluster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub label: String,
    /// Ordered member ids, without duplicates.
    pub members: Vec<NodeId>,
    /// Where the circle sits while the group has no members.
    pub anchor: WorldPoint,
    pub bounds: CircleBounds,
    pub mode: BoundsMode,
    pub style: BoundsStyle,
}

impl Group {
    pub fn new(id: GroupId, label: impl Into<String>, mode: BoundsMode) -> Self {
        let style = match mode {
            BoundsMode::Cached => BoundsStyle::cached(),
            BoundsMode::Live => BoundsStyle::live(),
        };
        Self {
            id,
            label: label.into(),
            members: Vec::new(),
            anchor: WorldPoint::ORIGIN,
            bounds: CircleBounds {
                center: WorldPoint::ORIGIN,
                radius: style.min_radius,
            },
            mode,
            style,
        }
    }

    /// Add a member, keeping the first position of repeated ids.
    pub fn push_member(&mut self, id: NodeId) -> bool {
        if self.members.contains(&id) {
            return false;
        }
        self.members.push(id);
        true
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.members.contains(id)
    }

    pub fn center(&self) -> WorldPoint {
        self.bounds.center
    }

    pub fn radius(&self) -> f32 {
        self.bounds.radius
    }

    pub fn is_live(&self) -> bool {
        self.mode == BoundsMode::Live
    }

    /// Whether nodes may be dropped on this group to change region.
    pub fn accepts_drops(&self) -> bool {
        self.id.target_region().is_some()
    }

    /// Recompute the circle from the given member positions.
    pub fn recompute(&mut self, member_positions: &[WorldPoint]) {
        self.bounds = if member_positions.is_empty() {
            CircleBounds {
                center: self.anchor,
                radius: self.style.min_radius,
            }
        } else {
            compute_bounds(member_positions, self.style.padding, self.style.min_radius)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_member_is_ordered_set() {
        let mut group = Group::new(GroupId::Unassigned, "Unassigned", BoundsMode::Cached);
        assert!(group.push_member(NodeId::new("b")));
        assert!(group.push_member(NodeId::new("a")));
        assert!(!group.push_member(NodeId::new("b")));
        assert_eq!(group.members, vec![NodeId::new("b"), NodeId::new("a")]);
    }

    #[test]
    fn test_empty_group_sits_on_anchor() {
        let mut group = Group::new(GroupId::Unassigned, "Unassigned", BoundsMode::Cached);
        group.anchor = WorldPoint::new(400.0, 300.0);
        group.recompute(&[]);
        assert_eq!(group.center(), WorldPoint::new(400.0, 300.0));
        assert_eq!(group.radius(), BoundsStyle::cached().min_radius);
    }

    #[test]
    fn test_live_groups_are_roomier() {
        let cached = Group::new(GroupId::Unassigned, "", BoundsMode::Cached);
        let live = Group::new(GroupId::Admins, "", BoundsMode::Live);
        assert!(live.style.padding > cached.style.padding);
        assert!(live.style.min_radius > cached.style.min_radius);
        assert!(!live.accepts_drops());
        assert!(cached.accepts_drops());
    }
}
