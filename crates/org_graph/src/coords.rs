//! Type-safe coordinates for the region graph.
//!
//! Two spaces exist and must never be mixed:
//!
//! - **World space**: where nodes and group circles live (infinite, zoomable)
//! - **Screen space**: pixels relative to the editor surface origin, after pan/zoom
//!
//! The viewport in `org_canvas` is the only place that converts between them.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Sub};

/// Position in world (diagram) space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint(pub Vec2);

/// Position in screen space (pixels, after pan/zoom).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint(pub Vec2);

/// Movement/offset in world space (not a position).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldDelta(pub Vec2);

// === WorldPoint ===

impl WorldPoint {
    pub const ORIGIN: WorldPoint = WorldPoint(Vec2::ZERO);

    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    pub fn x(&self) -> f32 {
        self.0.x
    }

    pub fn y(&self) -> f32 {
        self.0.y
    }

    pub fn distance(&self, other: WorldPoint) -> f32 {
        self.0.distance(other.0)
    }

    pub fn abs_diff_eq(&self, other: WorldPoint, max_abs_diff: f32) -> bool {
        self.0.abs_diff_eq(other.0, max_abs_diff)
    }
}

impl From<Vec2> for WorldPoint {
    fn from(v: Vec2) -> Self {
        Self(v)
    }
}

impl From<WorldPoint> for Vec2 {
    fn from(p: WorldPoint) -> Self {
        p.0
    }
}

impl Add<WorldDelta> for WorldPoint {
    type Output = WorldPoint;

    fn add(self, delta: WorldDelta) -> Self::Output {
        WorldPoint(self.0 + delta.0)
    }
}

impl AddAssign<WorldDelta> for WorldPoint {
    fn add_assign(&mut self, delta: WorldDelta) {
        self.0 += delta.0;
    }
}

impl Sub for WorldPoint {
    type Output = WorldDelta;

    /// Subtracting two points gives a delta.
    fn sub(self, other: WorldPoint) -> Self::Output {
        WorldDelta(self.0 - other.0)
    }
}

impl Sub<WorldDelta> for WorldPoint {
    type Output = WorldPoint;

    fn sub(self, delta: WorldDelta) -> Self::Output {
        WorldPoint(self.0 - delta.0)
    }
}

// === ScreenPoint ===

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    pub fn x(&self) -> f32 {
        self.0.x
    }

    pub fn y(&self) -> f32 {
        self.0.y
    }

    pub fn abs_diff_eq(&self, other: ScreenPoint, max_abs_diff: f32) -> bool {
        self.0.abs_diff_eq(other.0, max_abs_diff)
    }
}

impl From<Vec2> for ScreenPoint {
    fn from(v: Vec2) -> Self {
        Self(v)
    }
}

impl From<ScreenPoint> for Vec2 {
    fn from(p: ScreenPoint) -> Self {
        p.0
    }
}

// === WorldDelta ===

impl WorldDelta {
    pub fn new(dx: f32, dy: f32) -> Self {
        Self(Vec2::new(dx, dy))
    }

    pub fn dx(&self) -> f32 {
        self.0.x
    }

    pub fn dy(&self) -> f32 {
        self.0.y
    }
}

impl From<Vec2> for WorldDelta {
    fn from(v: Vec2) -> Self {
        Self(v)
    }
}

impl From<WorldDelta> for Vec2 {
    fn from(d: WorldDelta) -> Self {
        d.0
    }
}

impl Add for WorldDelta {
    type Output = WorldDelta;

    fn add(self, other: WorldDelta) -> Self::Output {
        WorldDelta(self.0 + other.0)
    }
}
