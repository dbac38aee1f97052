use crate::config::EditorConfig;
use crate::hit_test::HitTester;
use crate::intents::{CommitBatch, PendingIntents, ReassignmentIntent};
use crate::interaction::{DragOrigin, DragSession, DropTarget, Interaction, Modifiers};
use crate::viewport::Viewport;
use glam::Vec2;
use org_graph::{Aabb, Graph, GroupId, HierarchySnapshot, NodeId, ScreenPoint, WorldPoint};
use std::collections::HashSet;

/// Events emitted by the editor, drained by the host with [`Editor::take_events`].
#[derive(Clone, Debug, PartialEq)]
pub enum EditorEvent {
    SelectionChanged,
    ViewportChanged,
    NodesMoved(Vec<NodeId>),
    /// The highlighted drop target changed (`None` clears the highlight).
    DropTargetChanged(Option<GroupId>),
    BoundsRecomputed,
    IntentStaged(ReassignmentIntent),
    IntentWithdrawn(NodeId),
    IntentsCleared,
    /// The graph was rebuilt from a hierarchy snapshot.
    Rebuilt,
}

/// One region graph editor: graph, viewport, selection, interaction and
/// staged reassignments.
///
/// All mutation happens synchronously through `&mut self`; a host feeds it
/// pointer events and persists what [`Editor::commit_batch`] hands out.
pub struct Editor {
    graph: Graph,
    /// Last snapshot the graph was built from.
    snapshot: HierarchySnapshot,
    /// Snapshot that arrived mid-interaction, applied once the pointer is released.
    deferred_snapshot: Option<HierarchySnapshot>,
    pub viewport: Viewport,
    selection: HashSet<NodeId>,
    interaction: Interaction,
    intents: PendingIntents,
    events: Vec<EditorEvent>,
    config: EditorConfig,
}

impl Editor {
    pub fn new(snapshot: HierarchySnapshot, config: EditorConfig) -> Self {
        let graph = build_graph(&snapshot, &config);
        Self {
            graph,
            snapshot,
            deferred_snapshot: None,
            viewport: Viewport::new(config.zoom),
            selection: HashSet::new(),
            interaction: Interaction::Idle,
            intents: PendingIntents::new(),
            events: Vec::new(),
            config,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn snapshot(&self) -> &HierarchySnapshot {
        &self.snapshot
    }

    pub fn selection(&self) -> &HashSet<NodeId> {
        &self.selection
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn intents(&self) -> &PendingIntents {
        &self.intents
    }

    /// The group highlighted as drop target, if a drag has one.
    pub fn drop_target(&self) -> Option<&DropTarget> {
        self.interaction.drag().and_then(|d| d.drop_target.as_ref())
    }

    pub fn hit_tester(&self) -> HitTester<'_> {
        HitTester::new(&self.graph, self.config.drop_tolerance)
    }

    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    // === Pointer input ===

    /// Press: pick a node drag, box select, group drag or pan, in that order.
    pub fn pointer_down(&mut self, screen: ScreenPoint, modifiers: Modifiers) {
        if !self.interaction.is_idle() {
            log::debug!(
                "pointer down while {:?}; releasing first",
                self.interaction.mode()
            );
            self.finish_interaction();
        }

        let world = self.viewport.screen_to_world(screen);
        let hits = self.hit_tester();
        let node = hits.node_at(world).cloned();
        let group = hits.group_at(world).cloned();

        self.interaction = match (node, group) {
            (Some(node), _) => self.start_node_drag(node, world, modifiers),
            (None, _) if modifiers.shift => {
                self.set_selection(HashSet::new());
                Interaction::BoxSelecting {
                    origin: world,
                    current: world,
                }
            }
            (None, Some(group)) => self.start_group_drag(group, world),
            (None, None) => Interaction::Panning { last: screen },
        };
        log::debug!("pointer down at {world:?}: {:?}", self.interaction.mode());
    }

    pub fn pointer_move(&mut self, screen: ScreenPoint) {
        let world = self.viewport.screen_to_world(screen);

        match &mut self.interaction {
            Interaction::Idle => {}
            Interaction::Panning { last } => {
                let delta = screen.0 - last.0;
                *last = screen;
                if delta != Vec2::ZERO {
                    self.viewport.pan(delta);
                    self.events.push(EditorEvent::ViewportChanged);
                }
            }
            Interaction::BoxSelecting { current, .. } => *current = world,
            Interaction::Dragging(session) => {
                for id in &session.dragged {
                    if let Some(position) = session.position_for(id, world) {
                        if let Some(node) = self.graph.node_mut(id) {
                            node.position = position;
                        }
                    }
                }
                if let DragOrigin::Group { id, offset } = &session.origin {
                    if let Some(group) = self.graph.groups.iter_mut().find(|g| &g.id == id) {
                        group.bounds.center = world - *offset;
                        group.anchor = group.bounds.center;
                    }
                }
                self.graph.refresh_live_bounds();

                let target = if session.is_group_drag() {
                    None
                } else {
                    resolve_drop_target(&self.graph, &session.dragged, self.config.drop_tolerance)
                };
                if target != session.drop_target {
                    log::debug!("drop target: {target:?}");
                    self.events
                        .push(EditorEvent::DropTargetChanged(target.as_ref().map(|t| t.group.clone())));
                    session.drop_target = target;
                }
                self.events
                    .push(EditorEvent::NodesMoved(session.dragged.clone()));
            }
        }
    }

    /// Release at a position: one last move, then finish.
    pub fn pointer_up(&mut self, screen: ScreenPoint) {
        self.pointer_move(screen);
        self.finish_interaction();
    }

    /// The pointer left the surface; same as releasing where it last was.
    pub fn pointer_leave(&mut self) {
        self.finish_interaction();
    }

    /// The surface lost focus; same as releasing where the pointer last was.
    pub fn focus_lost(&mut self) {
        self.finish_interaction();
    }

    /// One wheel tick zooms one step about the pointer.
    pub fn wheel(&mut self, scroll_delta: f32, screen: ScreenPoint) {
        if self.viewport.zoom_for_scroll(scroll_delta, screen) {
            self.events.push(EditorEvent::ViewportChanged);
        }
    }

    // === Direct viewport control ===

    pub fn pan(&mut self, delta: Vec2) {
        self.viewport.pan(delta);
        self.events.push(EditorEvent::ViewportChanged);
    }

    pub fn zoom_by(&mut self, delta: f32, anchor: ScreenPoint) {
        if self.viewport.zoom_by(delta, anchor) {
            self.events.push(EditorEvent::ViewportChanged);
        }
    }

    /// Fit every node and group circle into a screen area.
    pub fn zoom_to_fit(&mut self, screen_size: Vec2, margin: f32) {
        let nodes = self.graph.nodes.iter().map(|n| n.position.0);
        let Some(mut bounds) = Aabb::from_points(nodes) else {
            return;
        };
        for group in &self.graph.groups {
            bounds = bounds.union(&group.bounds.aabb());
        }
        self.viewport.fit_to(bounds, screen_size, margin);
        self.events.push(EditorEvent::ViewportChanged);
    }

    // === Selection ===

    /// Replace the selection, ignoring unknown ids.
    pub fn select(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        let selection = ids
            .into_iter()
            .filter(|id| self.graph.node(id).is_some())
            .collect();
        self.set_selection(selection);
    }

    pub fn clear_selection(&mut self) {
        self.set_selection(HashSet::new());
    }

    // === Layout ===

    /// Reseed every position, recompute bounds and reset the viewport.
    pub fn reset_view(&mut self) {
        self.cancel_interaction();
        self.graph.reseed(&self.config.seed);
        self.viewport.reset();
        self.events.push(EditorEvent::NodesMoved(
            self.graph.nodes.iter().map(|n| n.id.clone()).collect(),
        ));
        self.events.push(EditorEvent::BoundsRecomputed);
        self.events.push(EditorEvent::ViewportChanged);
    }

    /// Recompute cached group circles from where members are now.
    pub fn save_layout(&mut self) {
        self.graph.recompute_bounds();
        self.events.push(EditorEvent::BoundsRecomputed);
    }

    // === Reassignments ===

    /// Everything pending right now. Nothing is cleared until acknowledged.
    pub fn commit_batch(&self) -> CommitBatch {
        self.intents.batch()
    }

    /// Clear the intents a collaborator persisted; returns how many.
    pub fn acknowledge(&mut self, batch: &CommitBatch) -> usize {
        let removed = self.intents.acknowledge(batch);
        log::info!("{removed} reassignment(s) committed, {} pending", self.intents.len());
        removed
    }

    pub fn discard_intents(&mut self) {
        if !self.intents.is_empty() {
            self.intents.clear();
            self.events.push(EditorEvent::IntentsCleared);
        }
    }

    /// Rebuild from a fresh snapshot.
    ///
    /// During an interaction the snapshot is held back and applied on
    /// release. Returns whether the rebuild happened now.
    pub fn reload(&mut self, snapshot: HierarchySnapshot) -> bool {
        if !self.interaction.is_idle() {
            log::debug!("deferring reload until {:?} ends", self.interaction.mode());
            self.deferred_snapshot = Some(snapshot);
            return false;
        }

        // A newer snapshot supersedes one held back earlier.
        if self.deferred_snapshot.take().is_some() {
            log::debug!("dropping deferred reload superseded by a newer snapshot");
        }
        self.graph = build_graph(&snapshot, &self.config);
        self.snapshot = snapshot;

        let graph = &self.graph;
        let selection = self
            .selection
            .iter()
            .filter(|id| graph.node(id).is_some())
            .cloned()
            .collect();
        self.set_selection(selection);

        // Keep intents whose node still exists and is not already where the
        // intent wants it; refresh their origin region.
        let mut kept = PendingIntents::new();
        for intent in self.intents.iter() {
            let Some(node) = self.graph.node(&intent.node_id) else {
                continue;
            };
            if node.region_id == intent.to_region_id {
                continue;
            }
            kept.stage(ReassignmentIntent {
                from_region_id: node.region_id.clone(),
                ..intent.clone()
            });
        }
        if kept.len() != self.intents.len() {
            log::info!("{} pending reassignment(s) settled by reload", self.intents.len() - kept.len());
        }
        self.intents = kept;

        self.events.push(EditorEvent::Rebuilt);
        true
    }

    /// Rebuild from the last known-good snapshot.
    pub fn rebuild(&mut self) -> bool {
        self.reload(self.snapshot.clone())
    }

    // === Internals ===

    fn set_selection(&mut self, selection: HashSet<NodeId>) {
        if selection != self.selection {
            self.selection = selection;
            self.events.push(EditorEvent::SelectionChanged);
        }
    }

    fn start_node_drag(&mut self, node: NodeId, pointer: WorldPoint, modifiers: Modifiers) -> Interaction {
        let dragged = if modifiers.shift && !self.selection.is_empty() {
            if self.selection.insert(node.clone()) {
                self.events.push(EditorEvent::SelectionChanged);
            }
            self.ordered_selection(&node)
        } else if self.selection.len() > 1 && self.selection.contains(&node) {
            self.ordered_selection(&node)
        } else {
            self.set_selection(HashSet::from([node.clone()]));
            self.linked_set(&node)
        };

        let session = DragSession::new(DragOrigin::Node(node), dragged, pointer, &self.graph);
        Interaction::Dragging(session)
    }

    fn start_group_drag(&mut self, group: GroupId, pointer: WorldPoint) -> Interaction {
        let Some(circle) = self.graph.group(&group) else {
            return Interaction::Idle;
        };
        let members = circle.members.clone();
        let origin = DragOrigin::Group {
            offset: pointer - circle.center(),
            id: group,
        };
        Interaction::Dragging(DragSession::new(origin, members, pointer, &self.graph))
    }

    /// Selected nodes with `first` leading, the rest in draw order.
    fn ordered_selection(&self, first: &NodeId) -> Vec<NodeId> {
        std::iter::once(first.clone())
            .chain(
                self.graph
                    .nodes
                    .iter()
                    .filter(|n| &n.id != first && self.selection.contains(&n.id))
                    .map(|n| n.id.clone()),
            )
            .collect()
    }

    /// The node plus, for managers and admins, everything its edges point to.
    fn linked_set(&self, node: &NodeId) -> Vec<NodeId> {
        let mut set = vec![node.clone()];
        let linked = self
            .graph
            .node(node)
            .is_some_and(|n| n.kind.drags_linked());
        if linked {
            for target in self.graph.outgoing(node) {
                if !set.contains(target) {
                    set.push(target.clone());
                }
            }
        }
        set
    }

    fn finish_interaction(&mut self) {
        match std::mem::take(&mut self.interaction) {
            Interaction::Idle | Interaction::Panning { .. } => {}
            Interaction::BoxSelecting { origin, current } => {
                let rect = Aabb::from_corners(origin.0, current.0);
                let found = self.hit_tester().nodes_in_rect(rect);
                log::debug!("box select picked {} node(s)", found.len());
                self.set_selection(found);
            }
            Interaction::Dragging(session) => self.finish_drag(session),
        }

        if let Some(snapshot) = self.deferred_snapshot.take() {
            self.reload(snapshot);
        }
    }

    /// Abandon the current interaction without staging anything.
    fn cancel_interaction(&mut self) {
        if let Interaction::Dragging(session) = std::mem::take(&mut self.interaction) {
            if session.drop_target.is_some() {
                self.events.push(EditorEvent::DropTargetChanged(None));
            }
        }
        if let Some(snapshot) = self.deferred_snapshot.take() {
            self.reload(snapshot);
        }
    }

    fn finish_drag(&mut self, session: DragSession) {
        if let Some(target) = session.drop_target {
            self.events.push(EditorEvent::DropTargetChanged(None));
            let (Some(node), Some(to_region_id)) =
                (self.graph.node(&target.node), target.group.target_region())
            else {
                return;
            };
            if node.region_id == to_region_id {
                return;
            }
            let intent = ReassignmentIntent {
                node_id: node.id.clone(),
                from_region_id: node.region_id.clone(),
                to_region_id,
            };
            log::info!("staged {} -> {}", intent.node_id, target.group);
            self.intents.stage(intent.clone());
            self.events.push(EditorEvent::IntentStaged(intent));
            return;
        }

        // Dropped back inside its own region: nothing left to reassign.
        let DragOrigin::Node(primary) = &session.origin else {
            return;
        };
        let Some(node) = self.graph.node(primary) else {
            return;
        };
        let home = self
            .hit_tester()
            .drop_group_at(node.position)
            .and_then(|g| g.target_region());
        if home.as_ref() == Some(&node.region_id) && self.intents.withdraw(primary).is_some() {
            log::info!("withdrew reassignment of {primary}");
            self.events.push(EditorEvent::IntentWithdrawn(primary.clone()));
        }
    }
}

fn build_graph(snapshot: &HierarchySnapshot, config: &EditorConfig) -> Graph {
    let mut graph = Graph::build_with_label(snapshot, &config.company_label);
    graph.reseed(&config.seed);
    graph
}

/// First dragged node, in drag order, hovering over a group it does not belong to.
fn resolve_drop_target(graph: &Graph, dragged: &[NodeId], tolerance: f32) -> Option<DropTarget> {
    let hits = HitTester::new(graph, tolerance);
    dragged.iter().find_map(|id| {
        let node = graph.node(id)?;
        hits.foreign_group_for(node).map(|group| DropTarget {
            group: group.clone(),
            node: id.clone(),
        })
    })
}
