use crate::config::ConfigError;
use glam::Vec2;
use org_graph::{Aabb, ScreenPoint, WorldPoint};
use serde::{Deserialize, Serialize};

/// Zoom range and the largest change a single zoom step may apply.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomLimits {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: 0.3,
            max: 2.0,
            step: 0.1,
        }
    }
}

impl ZoomLimits {
    /// Limits must be finite and positive, with `min <= max`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Self { min, max, step } = *self;
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(ConfigError::ZoomRange { min, max });
        }
        if !(step.is_finite() && step > 0.0) {
            return Err(ConfigError::ZoomStep(step));
        }
        Ok(())
    }
}

/// Pan/zoom state of the editor surface.
///
/// `world = (screen - pan) / zoom` and `screen = world * zoom + pan`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Pan offset in screen pixels.
    pub pan: Vec2,
    /// Zoom level (1.0 = 100%), always within `limits`.
    pub zoom: f32,
    pub limits: ZoomLimits,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ZoomLimits::default())
    }
}

impl Viewport {
    /// Invalid limits fall back to the defaults.
    pub fn new(limits: ZoomLimits) -> Self {
        let limits = match limits.validate() {
            Ok(()) => limits,
            Err(err) => {
                log::warn!("{err}; using default zoom limits");
                ZoomLimits::default()
            }
        };
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0_f32.clamp(limits.min, limits.max),
            limits,
        }
    }

    /// Convert a point from screen coordinates to world coordinates.
    pub fn screen_to_world(&self, screen: ScreenPoint) -> WorldPoint {
        WorldPoint((screen.0 - self.pan) / self.zoom)
    }

    /// Convert a point from world coordinates to screen coordinates.
    pub fn world_to_screen(&self, world: WorldPoint) -> ScreenPoint {
        ScreenPoint(world.0 * self.zoom + self.pan)
    }

    /// Pan the viewport by a delta in screen pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Change zoom by at most one step, keeping `anchor` fixed on screen.
    ///
    /// Returns whether the zoom actually changed.
    pub fn zoom_by(&mut self, delta: f32, anchor: ScreenPoint) -> bool {
        let step = delta.clamp(-self.limits.step, self.limits.step);
        let zoom = (self.zoom + step).clamp(self.limits.min, self.limits.max);
        if zoom == self.zoom {
            return false;
        }

        let world = self.screen_to_world(anchor);
        self.zoom = zoom;
        self.pan = anchor.0 - world.0 * zoom;
        true
    }

    /// Zoom one step in or out for a wheel tick, about `anchor`.
    ///
    /// Scrolling up (negative delta) zooms in.
    pub fn zoom_for_scroll(&mut self, scroll_delta: f32, anchor: ScreenPoint) -> bool {
        if scroll_delta == 0.0 {
            return false;
        }
        let step = -scroll_delta.signum() * self.limits.step;
        self.zoom_by(step, anchor)
    }

    /// Fit a world rectangle into a screen area of `screen_size`, centered.
    pub fn fit_to(&mut self, world: Aabb, screen_size: Vec2, margin: f32) {
        let size = world.size().max(Vec2::splat(1.0));
        let available = (screen_size - Vec2::splat(margin * 2.0)).max(Vec2::splat(1.0));
        let fit = available / size;
        self.zoom = fit.x.min(fit.y).clamp(self.limits.min, self.limits.max);
        self.pan = screen_size * 0.5 - world.center() * self.zoom;
    }

    /// Reset to default view.
    pub fn reset(&mut self) {
        self.pan = Vec2::ZERO;
        self.zoom = 1.0_f32.clamp(self.limits.min, self.limits.max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn states() -> Vec<Viewport> {
        let mut states = Vec::new();
        for (pan, zoom) in [
            (Vec2::ZERO, 1.0),
            (Vec2::new(120.0, -45.5), 0.3),
            (Vec2::new(-300.0, 80.0), 1.7),
            (Vec2::new(12.25, 999.0), 2.0),
        ] {
            let mut viewport = Viewport::default();
            viewport.pan = pan;
            viewport.zoom = zoom;
            states.push(viewport);
        }
        states
    }

    #[test]
    fn test_inverse_law() {
        let points = [
            ScreenPoint::new(0.0, 0.0),
            ScreenPoint::new(640.0, 360.0),
            ScreenPoint::new(-50.0, 1200.5),
        ];
        for viewport in states() {
            for p in points {
                let back = viewport.world_to_screen(viewport.screen_to_world(p));
                assert!(back.abs_diff_eq(p, EPS), "{back:?} != {p:?}");
            }
        }
    }

    #[test]
    fn test_screen_to_world_formula() {
        let mut viewport = Viewport::default();
        viewport.pan = Vec2::new(100.0, 50.0);
        viewport.zoom = 2.0;
        let world = viewport.screen_to_world(ScreenPoint::new(300.0, 250.0));
        assert_eq!(world, WorldPoint::new(100.0, 100.0));
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed() {
        for mut viewport in states() {
            let anchor = ScreenPoint::new(400.0, 300.0);
            let world_before = viewport.screen_to_world(anchor);
            let screen_before = viewport.world_to_screen(world_before);

            for delta in [0.1, 0.1, -0.05, -0.1, 0.07] {
                viewport.zoom_by(delta, anchor);
                let screen_after = viewport.world_to_screen(world_before);
                assert!(screen_after.abs_diff_eq(screen_before, EPS));
            }
        }
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut viewport = Viewport::default();
        for _ in 0..100 {
            viewport.zoom_by(1.0, ScreenPoint::new(10.0, 10.0));
        }
        assert_eq!(viewport.zoom, 2.0);
        for _ in 0..100 {
            viewport.zoom_by(-1.0, ScreenPoint::new(10.0, 10.0));
        }
        assert_eq!(viewport.zoom, 0.3);
        assert!(!viewport.zoom_by(-0.1, ScreenPoint::new(10.0, 10.0)));
    }

    #[test]
    fn test_zoom_step_is_bounded() {
        let mut viewport = Viewport::default();
        viewport.zoom_by(5.0, ScreenPoint::new(0.0, 0.0));
        assert!((viewport.zoom - 1.1).abs() < EPS);
    }

    #[test]
    fn test_invalid_limits_fall_back_to_defaults() {
        let inverted = ZoomLimits {
            min: 3.0,
            ..ZoomLimits::default()
        };
        assert_eq!(
            inverted.validate(),
            Err(ConfigError::ZoomRange { min: 3.0, max: 2.0 })
        );
        let viewport = Viewport::new(inverted);
        assert_eq!(viewport.limits, ZoomLimits::default());
        assert_eq!(viewport.zoom, 1.0);

        let backwards = ZoomLimits {
            step: -0.1,
            ..ZoomLimits::default()
        };
        assert_eq!(backwards.validate(), Err(ConfigError::ZoomStep(-0.1)));
        let mut viewport = Viewport::new(backwards);
        assert!(viewport.zoom_by(0.5, ScreenPoint::new(0.0, 0.0)));
        assert!((viewport.zoom - 1.1).abs() < EPS);
    }

    #[test]
    fn test_scroll_direction() {
        let mut viewport = Viewport::default();
        assert!(viewport.zoom_for_scroll(-3.0, ScreenPoint::new(0.0, 0.0)));
        assert!(viewport.zoom > 1.0);
        assert!(!viewport.zoom_for_scroll(0.0, ScreenPoint::new(0.0, 0.0)));
    }

    #[test]
    fn test_pan_moves_world_under_pointer() {
        let mut viewport = Viewport::default();
        viewport.zoom = 2.0;
        let world = WorldPoint::new(10.0, 10.0);
        let before = viewport.world_to_screen(world);
        viewport.pan(Vec2::new(30.0, -20.0));
        let after = viewport.world_to_screen(world);
        assert_eq!(after.0 - before.0, Vec2::new(30.0, -20.0));
    }

    #[test]
    fn test_fit_to_centers_rect() {
        let mut viewport = Viewport::default();
        let rect = Aabb::from_corners(Vec2::new(-100.0, -50.0), Vec2::new(100.0, 50.0));
        viewport.fit_to(rect, Vec2::new(800.0, 600.0), 0.0);

        let center = viewport.world_to_screen(WorldPoint::ORIGIN);
        assert!(center.abs_diff_eq(ScreenPoint::new(400.0, 300.0), EPS));
        assert_eq!(viewport.zoom, 2.0);
    }

    #[test]
    fn test_reset() {
        let mut viewport = Viewport::default();
        viewport.pan(Vec2::new(5.0, 5.0));
        viewport.zoom_by(0.1, ScreenPoint::new(0.0, 0.0));
        viewport.reset();
        assert_eq!(viewport, Viewport::default());
    }
}
