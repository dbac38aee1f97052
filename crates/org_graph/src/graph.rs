//! Graph model built from a hierarchy snapshot.
//!
//! `Graph::build` is deterministic: the same snapshot always produces the same
//! node ids, edges (including the round-robin manager split) and group order.
//! Positions come from the seeder, see [`crate::seed`].

use crate::coords::WorldPoint;
use crate::edge::{Edge, EdgeStyle};
use crate::group::{BoundsMode, Group};
use crate::hierarchy::{HierarchySnapshot, MemberSnapshot, Role};
use crate::node::{Node, NodeKind};
use crate::seed::{seed, SeedConfig, SeedLayout};
use crate::split::split_round_robin;
use crate::{EdgeId, GroupId, NodeId, RegionId};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Label of the synthetic company root when none is given.
pub const DEFAULT_COMPANY_LABEL: &str = "Company";

/// Internally inconsistent graph state. Bad input data never produces these.
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("edge {edge} references missing node {node}")]
    DanglingEdge { edge: EdgeId, node: NodeId },
    #[error("node {0} appears more than once")]
    DuplicateNode(NodeId),
    #[error("group {group} lists missing node {node}")]
    DanglingMember { group: GroupId, node: NodeId },
    #[error("node {node} belongs to both {first} and {second}")]
    SharedMember {
        node: NodeId,
        first: GroupId,
        second: GroupId,
    },
}

/// Nodes, edges and groups of one hierarchy snapshot.
///
/// Nodes are kept in draw order (back to front).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub groups: Vec<Group>,
}

impl Graph {
    /// Build nodes, edges and groups from a snapshot. Never fails on bad data.
    pub fn build(snapshot: &HierarchySnapshot) -> Self {
        Self::build_with_label(snapshot, DEFAULT_COMPANY_LABEL)
    }

    pub fn build_with_label(snapshot: &HierarchySnapshot, company_label: &str) -> Self {
        let mut builder = Builder::new(company_label);

        for (index, region) in snapshot.regions.iter().enumerate() {
            let region_id = RegionId::new(
                region
                    .id
                    .clone()
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| format!("region-{index}")),
            );
            let label = region.name.clone().unwrap_or_default();
            builder.add_scope(Scope::Region(region_id), label, &region.members);
        }
        builder.add_scope(Scope::Unassigned, "Unassigned".to_string(), &snapshot.unassigned);

        let graph = builder.finish();
        debug_assert_eq!(graph.validate(), Ok(()));
        log::info!(
            "built region graph: {} nodes, {} edges, {} groups",
            graph.nodes.len(),
            graph.edges.len(),
            graph.groups.len()
        );
        graph
    }

    /// Build and seed positions and bounds in one go.
    pub fn build_seeded(snapshot: &HierarchySnapshot, config: &SeedConfig) -> Self {
        let mut graph = Self::build(snapshot);
        graph.reseed(config);
        graph
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut ids = HashSet::new();
        for node in &self.nodes {
            if !ids.insert(&node.id) {
                return Err(GraphError::DuplicateNode(node.id.clone()));
            }
        }

        for edge in &self.edges {
            for end in [&edge.from, &edge.to] {
                if !ids.contains(end) {
                    return Err(GraphError::DanglingEdge {
                        edge: edge.id.clone(),
                        node: end.clone(),
                    });
                }
            }
        }

        let mut owner: HashMap<&NodeId, &GroupId> = HashMap::new();
        for group in &self.groups {
            for member in &group.members {
                if !ids.contains(member) {
                    return Err(GraphError::DanglingMember {
                        group: group.id.clone(),
                        node: member.clone(),
                    });
                }
                if let Some(first) = owner.insert(member, &group.id) {
                    return Err(GraphError::SharedMember {
                        node: member.clone(),
                        first: first.clone(),
                        second: group.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| &n.id == id)
    }

    pub fn group(&self, id: &GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| &g.id == id)
    }

    /// The group that currently owns a node.
    pub fn group_of(&self, node: &NodeId) -> Option<&Group> {
        self.groups.iter().find(|g| g.contains(node))
    }

    /// Targets of the node's outgoing edges, in edge order.
    pub fn outgoing(&self, node: &NodeId) -> impl Iterator<Item = &NodeId> + '_ {
        let node = node.clone();
        self.edges
            .iter()
            .filter(move |e| e.from == node)
            .map(|e| &e.to)
    }

    pub fn position(&self, id: &NodeId) -> Option<WorldPoint> {
        self.node(id).map(|n| n.position)
    }

    /// Current positions of a group's members, in member order.
    pub fn member_positions(&self, group: &Group) -> Vec<WorldPoint> {
        group
            .members
            .iter()
            .filter_map(|id| self.position(id))
            .collect()
    }

    /// Recompute every group circle from current positions.
    pub fn recompute_bounds(&mut self) {
        self.recompute_where(|_| true);
    }

    /// Recompute only the live groups. Called after any position update.
    pub fn refresh_live_bounds(&mut self) {
        self.recompute_where(|g| g.mode == BoundsMode::Live);
    }

    fn recompute_where(&mut self, filter: impl Fn(&Group) -> bool) {
        let positions: HashMap<NodeId, WorldPoint> = self
            .nodes
            .iter()
            .map(|n| (n.id.clone(), n.position))
            .collect();

        for group in self.groups.iter_mut().filter(|g| filter(&**g)) {
            let members: Vec<_> = group
                .members
                .iter()
                .filter_map(|id| positions.get(id).copied())
                .collect();
            group.recompute(&members);
        }
    }

    /// Apply seeded positions and anchors, then recompute all bounds.
    pub fn apply_seed(&mut self, layout: &SeedLayout) {
        for node in &mut self.nodes {
            if let Some(position) = layout.positions.get(&node.id) {
                node.position = *position;
            }
        }
        for group in &mut self.groups {
            if let Some(anchor) = layout.anchors.get(&group.id) {
                group.anchor = *anchor;
            }
        }
        self.recompute_bounds();
    }

    /// Run the seeder over the current nodes and groups.
    pub fn reseed(&mut self, config: &SeedConfig) {
        let layout = seed(&self.nodes, &self.groups, config);
        self.apply_seed(&layout);
    }
}

enum Scope {
    Region(RegionId),
    Unassigned,
}

struct Builder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    regions: Vec<Group>,
    unassigned: Group,
    admins: Group,
    seen: HashSet<NodeId>,
}

impl Builder {
    fn new(company_label: &str) -> Self {
        let company = Node::company(company_label);
        let mut seen = HashSet::new();
        seen.insert(company.id.clone());
        Self {
            nodes: vec![company],
            edges: Vec::new(),
            regions: Vec::new(),
            unassigned: Group::new(GroupId::Unassigned, "Unassigned", BoundsMode::Cached),
            admins: Group::new(GroupId::Admins, "Administrators", BoundsMode::Live),
            seen,
        }
    }

    fn add_scope(&mut self, scope: Scope, label: String, members: &[MemberSnapshot]) {
        let (region_id, scope_key) = match &scope {
            Scope::Region(id) => (Some(id.clone()), id.to_string()),
            Scope::Unassigned => (None, "unassigned".to_string()),
        };

        let group_index = match &scope {
            Scope::Region(id) => {
                let group_id = GroupId::Region(id.clone());
                match self.regions.iter().position(|g| g.id == group_id) {
                    Some(index) => {
                        log::warn!("region {id} listed twice; merging members");
                        Some(index)
                    }
                    None => {
                        self.regions.push(Group::new(group_id, label, BoundsMode::Cached));
                        Some(self.regions.len() - 1)
                    }
                }
            }
            Scope::Unassigned => None,
        };

        for (index, member) in members.iter().enumerate() {
            let id = match member.id.as_deref().filter(|id| !id.is_empty()) {
                Some(id) => NodeId::new(id),
                None => {
                    log::warn!("member #{index} of {scope_key} has no id");
                    NodeId::new(format!("{scope_key}#{index}"))
                }
            };
            if !self.seen.insert(id.clone()) {
                log::warn!("member {id} appears more than once; keeping the first entry");
                continue;
            }
            if let Role::Other(raw) = &member.role {
                log::warn!("member {id} has unknown role {raw:?}; treating as client");
            }

            let kind = NodeKind::from_role(&member.role);
            let label = member.name.clone().unwrap_or_default();
            self.nodes
                .push(Node::new(id.clone(), kind, label).with_region(region_id.clone()));

            let group = match (kind, group_index) {
                (NodeKind::Admin, _) => &mut self.admins,
                (_, Some(index)) => &mut self.regions[index],
                (_, None) => &mut self.unassigned,
            };
            group.push_member(id.clone());

            match kind {
                NodeKind::Admin => self.edges.push(Edge::new(
                    NodeId::company(),
                    id,
                    EdgeStyle::dashed(1.0),
                )),
                NodeKind::Manager => self
                    .edges
                    .push(Edge::new(NodeId::company(), id, EdgeStyle::solid(2.0))),
                NodeKind::Driver | NodeKind::Client | NodeKind::Company => {}
            }
        }
    }

    /// Manager to member edges, split over each region's full member list so
    /// a region listed twice splits the same way the seeder does.
    fn link_members(&mut self) {
        let kinds: HashMap<&NodeId, NodeKind> =
            self.nodes.iter().map(|n| (&n.id, n.kind)).collect();

        // Unassigned members report to nobody, so only regions are linked.
        for group in &self.regions {
            let of_kind = |pick: fn(&NodeKind) -> bool| {
                group
                    .members
                    .iter()
                    .filter(|id| kinds.get(*id).is_some_and(pick))
                    .collect()
            };
            let managers: Vec<&NodeId> = of_kind(|k| *k == NodeKind::Manager);
            let others: Vec<&NodeId> = of_kind(NodeKind::is_member);

            for (manager, bucket) in managers
                .iter()
                .zip(split_round_robin(managers.len(), others.len()))
            {
                for member in bucket {
                    self.edges.push(Edge::new(
                        (*manager).clone(),
                        others[member].clone(),
                        EdgeStyle::solid(1.0),
                    ));
                }
            }
        }
    }

    fn finish(mut self) -> Graph {
        self.link_members();
        let mut groups = self.regions;
        groups.push(self.unassigned);
        if !self.admins.members.is_empty() {
            groups.push(self.admins);
        }
        Graph {
            nodes: self.nodes,
            edges: self.edges,
            groups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::RegionSnapshot;

    fn north() -> HierarchySnapshot {
        HierarchySnapshot::new().with_region(
            RegionSnapshot::new("north", "North")
                .with_member(MemberSnapshot::manager("M1"))
                .with_member(MemberSnapshot::driver("O1"))
                .with_member(MemberSnapshot::manager("M2"))
                .with_member(MemberSnapshot::client("O2"))
                .with_member(MemberSnapshot::driver("O3")),
        )
    }

    fn has_edge(graph: &Graph, from: &str, to: &str) -> bool {
        graph
            .edges
            .iter()
            .any(|e| e.from == NodeId::new(from) && e.to == NodeId::new(to))
    }

    #[test]
    fn test_one_node_per_member_plus_company() {
        let graph = Graph::build(&north());
        assert_eq!(graph.nodes.len(), 6);
        assert_eq!(graph.nodes[0].id, NodeId::company());
        assert_eq!(graph.nodes[0].kind, NodeKind::Company);
    }

    #[test]
    fn test_managers_link_to_company() {
        let graph = Graph::build(&north());
        assert!(has_edge(&graph, "company", "M1"));
        assert!(has_edge(&graph, "company", "M2"));
        assert!(!has_edge(&graph, "company", "O1"));
    }

    #[test]
    fn test_members_round_robin_across_managers() {
        let graph = Graph::build(&north());
        assert!(has_edge(&graph, "M1", "O1"));
        assert!(has_edge(&graph, "M2", "O2"));
        assert!(has_edge(&graph, "M1", "O3"));
        assert_eq!(graph.outgoing(&NodeId::new("M1")).count(), 2);
        assert_eq!(graph.outgoing(&NodeId::new("M2")).count(), 1);
    }

    #[test]
    fn test_region_listed_twice_splits_merged_members() {
        let snapshot = HierarchySnapshot::new()
            .with_region(
                RegionSnapshot::new("north", "North")
                    .with_member(MemberSnapshot::manager("M1"))
                    .with_member(MemberSnapshot::driver("O1")),
            )
            .with_region(
                RegionSnapshot::new("north", "North")
                    .with_member(MemberSnapshot::manager("M2"))
                    .with_member(MemberSnapshot::client("O2"))
                    .with_member(MemberSnapshot::driver("O3")),
            );
        let config = SeedConfig::default();
        let graph = Graph::build_seeded(&snapshot, &config);

        assert_eq!(graph.groups.len(), 2);
        assert!(has_edge(&graph, "M1", "O1"));
        assert!(has_edge(&graph, "M2", "O2"));
        assert!(has_edge(&graph, "M1", "O3"));
        assert!(!has_edge(&graph, "M2", "O3"));

        // Every member sits in its manager's column, as its edge says.
        for edge in graph.edges.iter().filter(|e| e.from != NodeId::company()) {
            let manager = graph.position(&edge.from).unwrap();
            let member = graph.position(&edge.to).unwrap();
            assert!((member.x() - manager.x()).abs() <= config.member_spacing / 2.0 + 1e-3);
        }
        assert_eq!(graph.validate(), Ok(()));
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = Graph::build(&north());
        let b = Graph::build(&north());
        assert_eq!(a, b);
    }

    #[test]
    fn test_admins_go_to_admin_cluster() {
        let snapshot = north()
            .with_unassigned(MemberSnapshot::admin("A1"))
            .with_unassigned(MemberSnapshot::driver("U1"));
        let graph = Graph::build(&snapshot);

        let admins = graph.group(&GroupId::Admins).unwrap();
        assert_eq!(admins.members, vec![NodeId::new("A1")]);
        assert!(admins.is_live());

        let unassigned = graph.group(&GroupId::Unassigned).unwrap();
        assert_eq!(unassigned.members, vec![NodeId::new("U1")]);
        assert_eq!(graph.node(&NodeId::new("A1")).unwrap().region_id, None);
        assert!(!has_edge(&graph, "company", "U1"));
        let admin_edge = graph
            .edges
            .iter()
            .find(|e| e.to == NodeId::new("A1"))
            .unwrap();
        assert_eq!(admin_edge.from, NodeId::company());
        assert_eq!(admin_edge.style, EdgeStyle::dashed(1.0));
    }

    #[test]
    fn test_group_order_is_regions_then_unassigned_then_admins() {
        let snapshot = north()
            .with_region(RegionSnapshot::new("south", "South"))
            .with_unassigned(MemberSnapshot::admin("A1"));
        let graph = Graph::build(&snapshot);

        let ids: Vec<_> = graph.groups.iter().map(|g| g.id.clone()).collect();
        assert_eq!(
            ids,
            vec![
                GroupId::Region(RegionId::new("north")),
                GroupId::Region(RegionId::new("south")),
                GroupId::Unassigned,
                GroupId::Admins,
            ]
        );
    }

    #[test]
    fn test_empty_snapshot_still_has_unassigned_group() {
        let graph = Graph::build(&HierarchySnapshot::new());
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.groups.len(), 1);
        assert_eq!(graph.groups[0].id, GroupId::Unassigned);
    }

    #[test]
    fn test_malformed_members_degrade() {
        let snapshot = HierarchySnapshot::new().with_region(
            RegionSnapshot::new("east", "East")
                .with_member(MemberSnapshot::default())
                .with_member(MemberSnapshot::new("x", "X", Role::Other("intern".into())))
                .with_member(MemberSnapshot::driver("x")),
        );
        let graph = Graph::build(&snapshot);

        let anonymous = graph.node(&NodeId::new("east#0")).unwrap();
        assert_eq!(anonymous.label, "");
        assert_eq!(anonymous.kind, NodeKind::Client);
        assert_eq!(graph.node(&NodeId::new("x")).unwrap().kind, NodeKind::Client);
        // The duplicate is dropped rather than creating two nodes with one id.
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.validate(), Ok(()));
    }

    #[test]
    fn test_validate_reports_dangling_edge() {
        let mut graph = Graph::build(&north());
        graph.edges.push(Edge::new(
            NodeId::new("M1"),
            NodeId::new("ghost"),
            EdgeStyle::default(),
        ));
        let err = graph.validate().unwrap_err();
        assert!(matches!(
            &err,
            GraphError::DanglingEdge { node, .. } if *node == NodeId::new("ghost")
        ));
        assert_eq!(err.to_string(), "edge M1->ghost references missing node ghost");
    }

    #[test]
    fn test_refresh_live_bounds_leaves_cached_groups() {
        let snapshot = north().with_unassigned(MemberSnapshot::admin("A1"));
        let mut graph = Graph::build_seeded(&snapshot, &SeedConfig::default());
        let north_before = graph.groups[0].bounds;

        graph.node_mut(&NodeId::new("O1")).unwrap().position = WorldPoint::new(5000.0, 5000.0);
        graph.node_mut(&NodeId::new("A1")).unwrap().position = WorldPoint::new(-900.0, -900.0);
        graph.refresh_live_bounds();

        assert_eq!(graph.groups[0].bounds, north_before);
        let admins = graph.group(&GroupId::Admins).unwrap();
        assert_eq!(admins.center(), WorldPoint::new(-900.0, -900.0));
    }
}
