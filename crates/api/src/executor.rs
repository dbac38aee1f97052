//! Command and query execution against an editor.
//!
//! This module connects the abstract Command/Query types to the editor,
//! executing operations and returning results.

use crate::{Command, CommandResult, GroupInfo, NodeInfo, Query, QueryResult};
use org_canvas::{Editor, Modifiers, PendingIntents};
use org_graph::{NodeId, ScreenPoint};

/// Execute a command against an editor.
pub fn execute_command(editor: &mut Editor, command: Command) -> CommandResult {
    let before = editor.intents().clone();
    let result = execute_command_inner(editor, command);
    if result.is_success() {
        intent_changes(&before, editor.intents())
    } else {
        result
    }
}

fn execute_command_inner(editor: &mut Editor, command: Command) -> CommandResult {
    match command {
        Command::PointerDown { position, shift } => {
            let modifiers = if shift {
                Modifiers::shift()
            } else {
                Modifiers::none()
            };
            editor.pointer_down(ScreenPoint(position), modifiers);
            CommandResult::success()
        }

        Command::PointerMove { position } => {
            editor.pointer_move(ScreenPoint(position));
            CommandResult::success()
        }

        Command::PointerUp { position } => {
            editor.pointer_up(ScreenPoint(position));
            CommandResult::success()
        }

        Command::PointerLeave => {
            editor.pointer_leave();
            CommandResult::success()
        }

        Command::FocusLost => {
            editor.focus_lost();
            CommandResult::success()
        }

        Command::Wheel { delta, position } => {
            editor.wheel(delta, ScreenPoint(position));
            CommandResult::success()
        }

        Command::Pan { delta } => {
            editor.pan(delta);
            CommandResult::success()
        }

        Command::Zoom { delta, anchor } => {
            if !delta.is_finite() {
                return CommandResult::error(format!("invalid zoom delta: {delta}"));
            }
            editor.zoom_by(delta, ScreenPoint(anchor));
            CommandResult::success()
        }

        Command::ZoomToFit { size, margin } => {
            if size.x <= 0.0 || size.y <= 0.0 {
                return CommandResult::error(format!("invalid viewport size: {size}"));
            }
            editor.zoom_to_fit(size, margin);
            CommandResult::success()
        }

        Command::ResetView => {
            editor.reset_view();
            CommandResult::success()
        }

        Command::SaveLayout => {
            editor.save_layout();
            CommandResult::success()
        }

        Command::Select {
            ids,
            add_to_selection,
        } => {
            if let Some(unknown) = ids.iter().find(|id| editor.graph().node(id).is_none()) {
                return CommandResult::error(format!("unknown node: {unknown}"));
            }
            let ids: Vec<NodeId> = if add_to_selection {
                editor.selection().iter().cloned().chain(ids).collect()
            } else {
                ids
            };
            editor.select(ids);
            CommandResult::success()
        }

        Command::ClearSelection => {
            editor.clear_selection();
            CommandResult::success()
        }

        Command::DiscardIntents => {
            editor.discard_intents();
            CommandResult::success()
        }

        Command::Batch { commands } => {
            for command in commands {
                let result = execute_command_inner(editor, command);
                if !result.is_success() {
                    return result;
                }
            }
            CommandResult::success()
        }
    }
}

/// Describe how the pending intents changed across a command.
fn intent_changes(before: &PendingIntents, after: &PendingIntents) -> CommandResult {
    let staged = after
        .iter()
        .filter(|intent| before.get(&intent.node_id) != Some(*intent))
        .cloned()
        .collect();
    let withdrawn = before
        .iter()
        .filter(|intent| after.get(&intent.node_id).is_none())
        .map(|intent| intent.node_id.clone())
        .collect();
    CommandResult::with_changes(staged, withdrawn)
}

/// Execute a query against an editor.
pub fn execute_query(editor: &Editor, query: Query) -> QueryResult {
    let graph = editor.graph();
    match query {
        Query::GetNodes => QueryResult::Nodes {
            nodes: graph.nodes.iter().map(NodeInfo::from).collect(),
        },

        Query::GetNode { id } => QueryResult::Node {
            node: graph.node(&id).map(NodeInfo::from),
        },

        Query::GetEdges => QueryResult::Edges {
            edges: graph.edges.clone(),
        },

        Query::GetGroups => QueryResult::Groups {
            groups: graph.groups.iter().map(GroupInfo::from).collect(),
        },

        Query::GetSelection => {
            let mut ids: Vec<NodeId> = editor.selection().iter().cloned().collect();
            ids.sort();
            QueryResult::Selection { ids }
        }

        Query::GetViewport => QueryResult::Viewport {
            pan: editor.viewport.pan,
            zoom: editor.viewport.zoom,
        },

        Query::GetInteraction => QueryResult::Interaction {
            mode: editor.interaction().mode(),
        },

        Query::GetDropTarget => QueryResult::DropTarget {
            target: editor.drop_target().cloned(),
        },

        Query::GetPendingIntents => QueryResult::Intents {
            intents: editor.intents().iter().cloned().collect(),
        },

        Query::GetCommitBatch => QueryResult::Batch {
            batch: editor.commit_batch(),
        },

        Query::HitTest { position } => {
            if !position.is_finite() {
                return QueryResult::Error {
                    message: format!("invalid position: {position}"),
                };
            }
            let world = editor.viewport.screen_to_world(ScreenPoint(position));
            let hits = editor.hit_tester();
            QueryResult::Hit {
                node: hits.node_at(world).cloned(),
                group: hits.group_at(world).cloned(),
            }
        }
    }
}
