//! Command and query interface for the region graph editor.
//!
//! Commands represent user intent and are:
//! - Serializable (for recording, scripted replay and tests)
//! - Input-shaped (pointer and viewport events, not internal operations)
//!
//! Queries give read-only access to graph, selection, viewport and staged
//! reassignments. [`EditorSession`] ties an editor to the systems that own
//! the hierarchy.
//!
//! # Example
//! ```ignore
//! use api::{Command, execute_command};
//!
//! let cmd = Command::PointerDown {
//!     position: Vec2::new(100.0, 100.0),
//!     shift: false,
//! };
//! let result = execute_command(&mut editor, cmd);
//! ```

mod command;
mod executor;
mod query;
mod session;

pub use command::*;
pub use executor::{execute_command, execute_query};
pub use query::*;
pub use session::{CommitReport, EditorSession, HierarchySource, ReassignmentSink};
