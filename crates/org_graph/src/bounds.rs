//! Bounds engine for group circles.
//!
//! A group's circle is derived from the axis-aligned bounding box of its
//! members' positions, padded and then circumscribed by the larger half-extent.

use crate::coords::WorldPoint;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box represented by minimum and maximum points.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Creates bounds from two corner points, automatically ordering them.
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Smallest box containing every point, or `None` for no points.
    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::from_corners(first, first), |acc, p| Self {
            min: acc.min.min(p),
            max: acc.max.max(p),
        }))
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn half_size(&self) -> Vec2 {
        self.size() * 0.5
    }

    /// Expands the bounds by a given amount in all directions.
    pub fn expand(&self, amount: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(amount),
            max: self.max + Vec2::splat(amount),
        }
    }

    /// Computes the union of two bounds.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Points on the boundary are considered contained.
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

/// Center and radius of a group circle.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CircleBounds {
    pub center: WorldPoint,
    pub radius: f32,
}

impl CircleBounds {
    pub fn contains_point(&self, point: WorldPoint, tolerance: f32) -> bool {
        self.center.distance(point) <= self.radius + tolerance
    }

    /// Axis-aligned box around the circle.
    pub fn aabb(&self) -> Aabb {
        Aabb::from_corners(
            self.center.0 - Vec2::splat(self.radius),
            self.center.0 + Vec2::splat(self.radius),
        )
    }
}

/// Padding and minimum radius used when circumscribing a group.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundsStyle {
    pub padding: f32,
    pub min_radius: f32,
}

impl BoundsStyle {
    pub fn new(padding: f32, min_radius: f32) -> Self {
        Self {
            padding,
            min_radius,
        }
    }

    /// Style for groups whose geometry is frozen between explicit recomputes.
    pub fn cached() -> Self {
        Self::new(60.0, 90.0)
    }

    /// Roomier style for groups recomputed on every update, so the label
    /// never gets crowded while members move.
    pub fn live() -> Self {
        Self::new(90.0, 130.0)
    }
}

/// Compute a group circle from member positions.
///
/// The box around `members` is expanded by `padding`; the circle sits at the
/// box midpoint with radius `max(half_width, half_height, min_radius)`.
/// An empty member list yields a circle of `min_radius` at the origin.
pub fn compute_bounds(members: &[WorldPoint], padding: f32, min_radius: f32) -> CircleBounds {
    match Aabb::from_points(members.iter().map(|p| p.0)) {
        Some(aabb) => {
            let padded = aabb.expand(padding);
            let half = padded.half_size();
            CircleBounds {
                center: WorldPoint(padded.center()),
                radius: half.x.max(half.y).max(min_radius),
            }
        }
        None => CircleBounds {
            center: WorldPoint::ORIGIN,
            radius: min_radius,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_members_use_default() {
        let bounds = compute_bounds(&[], 20.0, 50.0);
        assert_eq!(bounds.center, WorldPoint::ORIGIN);
        assert_eq!(bounds.radius, 50.0);
    }

    #[test]
    fn test_single_member_gets_min_radius() {
        let bounds = compute_bounds(&[WorldPoint::new(10.0, 10.0)], 20.0, 50.0);
        assert_eq!(bounds.center, WorldPoint::new(10.0, 10.0));
        assert_eq!(bounds.radius, 50.0);
    }

    #[test]
    fn test_padded_box_midpoint_and_half_extent() {
        let members = [WorldPoint::new(0.0, 0.0), WorldPoint::new(200.0, 100.0)];
        let bounds = compute_bounds(&members, 10.0, 0.0);

        // Box (-10,-10)..(210,110): width 220, height 120
        assert_eq!(bounds.center, WorldPoint::new(100.0, 50.0));
        assert_eq!(bounds.radius, 110.0);
    }

    #[test]
    fn test_radius_is_monotonic_in_farther_members() {
        let mut members = vec![WorldPoint::new(0.0, 0.0), WorldPoint::new(40.0, 30.0)];
        let mut last = compute_bounds(&members, 15.0, 20.0);

        for far in [
            WorldPoint::new(120.0, 0.0),
            WorldPoint::new(-80.0, 200.0),
            WorldPoint::new(500.0, -300.0),
        ] {
            assert!(last.center.distance(far) > last.radius);
            members.push(far);
            let next = compute_bounds(&members, 15.0, 20.0);
            assert!(next.radius >= last.radius);
            last = next;
        }
    }

    #[test]
    fn test_aabb_from_corners_orders_points() {
        let aabb = Aabb::from_corners(Vec2::new(10.0, -5.0), Vec2::new(-10.0, 5.0));
        assert_eq!(aabb.min, Vec2::new(-10.0, -5.0));
        assert_eq!(aabb.max, Vec2::new(10.0, 5.0));
        assert!(aabb.contains_point(Vec2::new(10.0, 5.0)));
        assert!(!aabb.contains_point(Vec2::new(10.1, 0.0)));
    }
}
