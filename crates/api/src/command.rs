//! Editor commands - everything that changes editor state.
//!
//! Commands mirror user input rather than internal operations: a drag is a
//! `pointer_down`, some `pointer_move`s and a `pointer_up`, exactly as a
//! host would forward them. Positions are screen pixels.

use glam::Vec2;
use org_canvas::ReassignmentIntent;
use org_graph::NodeId;
use serde::{Deserialize, Serialize};

/// A command that modifies editor state.
///
/// Commands are serializable so sessions can be recorded and replayed.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    // === Pointer ===
    /// Press at a screen position.
    PointerDown {
        position: Vec2,
        #[serde(default)]
        shift: bool,
    },

    /// Move the pointer.
    PointerMove { position: Vec2 },

    /// Release at a screen position.
    PointerUp { position: Vec2 },

    /// The pointer left the editor surface.
    PointerLeave,

    /// The editor surface lost focus.
    FocusLost,

    /// One wheel tick at a screen position. Negative deltas zoom in.
    Wheel { delta: f32, position: Vec2 },

    // === Viewport ===
    /// Pan by a screen delta.
    Pan { delta: Vec2 },

    /// Zoom by at most one step about a screen anchor.
    Zoom {
        delta: f32,
        #[serde(default)]
        anchor: Vec2,
    },

    /// Fit the whole graph into a screen area.
    ZoomToFit {
        size: Vec2,
        #[serde(default = "default_fit_margin")]
        margin: f32,
    },

    /// Reseed every position and reset the viewport.
    ResetView,

    /// Recompute cached group bounds from current positions.
    SaveLayout,

    // === Selection ===
    /// Select nodes, optionally adding to the existing selection.
    Select {
        ids: Vec<NodeId>,
        #[serde(default)]
        add_to_selection: bool,
    },

    /// Clear the current selection.
    ClearSelection,

    // === Intents ===
    /// Drop every staged reassignment.
    DiscardIntents,

    /// Execute several commands in order, stopping at the first error.
    Batch { commands: Vec<Command> },
}

fn default_fit_margin() -> f32 {
    40.0
}

/// Result of executing a command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommandResult {
    /// Command succeeded.
    Success {
        /// Intents staged or overwritten by the command.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        staged: Vec<ReassignmentIntent>,
        /// Nodes whose intent was withdrawn or discarded.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        withdrawn: Vec<NodeId>,
    },
    /// Command failed.
    Error { message: String },
}

impl CommandResult {
    pub fn success() -> Self {
        Self::Success {
            staged: vec![],
            withdrawn: vec![],
        }
    }

    pub fn with_changes(staged: Vec<ReassignmentIntent>, withdrawn: Vec<NodeId>) -> Self {
        Self::Success { staged, withdrawn }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
