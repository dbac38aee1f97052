//! Region graph model.
//!
//! Turns an organization hierarchy snapshot into nodes, edges and group
//! circles, seeds their initial positions and computes group bounds.
//! Nothing here knows about pointers or screens.

pub mod bounds;
pub mod coords;
mod edge;
mod graph;
mod group;
mod hierarchy;
mod ids;
mod node;
pub mod seed;
mod split;

pub use bounds::{compute_bounds, Aabb, BoundsStyle, CircleBounds};
pub use coords::{ScreenPoint, WorldDelta, WorldPoint};
pub use edge::{Edge, EdgeStyle, LineStyle};
pub use graph::{Graph, GraphError, DEFAULT_COMPANY_LABEL};
pub use group::{BoundsMode, Group};
pub use hierarchy::{HierarchySnapshot, MemberSnapshot, RegionSnapshot, Role};
pub use ids::{EdgeId, GroupId, NodeId, RegionId};
pub use node::{Node, NodeKind};
pub use seed::{seed, SeedConfig, SeedLayout};
pub use split::split_round_robin;
