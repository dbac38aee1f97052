//! Interactive editor over a region graph.
//!
//! Owns the viewport, hit testing, the pointer interaction state machine and
//! the set of staged reassignments. Rendering and persistence live elsewhere.

mod config;
mod editor;
mod intents;
mod interaction;
mod viewport;

pub use config::{ConfigError, EditorConfig};
pub use editor::{Editor, EditorEvent};
pub use hit_test::{HitTester, DROP_TOLERANCE};
pub use intents::{CommitBatch, PendingIntents, ReassignmentIntent, RegionBatch};
pub use interaction::{DragOrigin, DragSession, DropTarget, Interaction, InteractionMode, Modifiers};
// Re-export the graph model for hosts that only depend on this crate
pub use org_graph;
pub use viewport::{Viewport, ZoomLimits};
