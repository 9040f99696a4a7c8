//! World-to-screen transform with horizontal follow and zoom
//!
//! The scale factor is derived once at construction from the ratio of canvas
//! width to the design-reference width; a resize rebuilds the whole
//! simulation rather than mutating a live camera. The Y axis shares the same
//! scale and never pans.

use serde::{Deserialize, Serialize};

use crate::consts::FOLLOW_SCREEN_PCT;

/// Horizontally tracking camera
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Camera {
    /// World X of the screen's left edge
    pub left_x: f32,
    /// Screen-space X (pre-scale pixels) where the followed point is pinned
    follow_offset_x: f32,
    /// Screen pixels per world unit
    scale: f32,
    /// Canvas size in pixels
    canvas_w: f32,
    canvas_h: f32,
}

impl Camera {
    /// `reference_width` must be validated positive (see `Tuning::validate`).
    pub fn new(canvas_w: f32, canvas_h: f32, reference_width: f32) -> Self {
        debug_assert!(canvas_w > 0.0 && canvas_h > 0.0 && reference_width > 0.0);
        Self {
            left_x: 0.0,
            follow_offset_x: canvas_w * FOLLOW_SCREEN_PCT,
            scale: canvas_w / reference_width,
            canvas_w,
            canvas_h,
        }
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Pin `world_x` at the fixed screen fraction, regardless of zoom.
    pub fn follow(&mut self, world_x: f32) {
        self.left_x = world_x - self.follow_offset_x / self.scale;
    }

    #[inline]
    pub fn to_screen_x(&self, world_x: f32) -> f32 {
        (world_x - self.left_x) * self.scale
    }

    #[inline]
    pub fn to_screen_y(&self, world_y: f32) -> f32 {
        world_y * self.scale
    }

    /// Inverse of [`Camera::to_screen_x`].
    #[inline]
    pub fn to_world_x(&self, screen_x: f32) -> f32 {
        screen_x / self.scale + self.left_x
    }

    /// World units spanned by the canvas horizontally.
    #[inline]
    pub fn visible_world_width(&self) -> f32 {
        self.canvas_w / self.scale
    }

    /// World units spanned by the canvas vertically.
    #[inline]
    pub fn visible_world_height(&self) -> f32 {
        self.canvas_h / self.scale
    }

    #[inline]
    pub fn canvas_size(&self) -> (f32, f32) {
        (self.canvas_w, self.canvas_h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_scale_from_reference_width() {
        let cam = Camera::new(960.0, 720.0, 480.0);
        assert!((cam.scale() - 2.0).abs() < f32::EPSILON);
        // Visible world size is resolution independent
        assert!((cam.visible_world_width() - 480.0).abs() < 1e-4);
        assert!((cam.visible_world_height() - 360.0).abs() < 1e-4);
    }

    #[test]
    fn test_follow_pins_player_at_screen_fraction() {
        for (canvas_w, reference) in [(480.0, 480.0), (1600.0, 480.0), (400.0, 480.0)] {
            let mut cam = Camera::new(canvas_w, 720.0, reference);
            cam.follow(1234.5);
            let screen_x = cam.to_screen_x(1234.5);
            assert!(
                (screen_x - canvas_w * FOLLOW_SCREEN_PCT).abs() < 1e-2,
                "player must sit at the follow fraction for canvas {canvas_w}"
            );
        }
    }

    #[test]
    fn test_no_vertical_panning() {
        let mut cam = Camera::new(960.0, 720.0, 480.0);
        let before = cam.to_screen_y(100.0);
        cam.follow(5000.0);
        assert_eq!(cam.to_screen_y(100.0), before);
    }

    proptest! {
        #[test]
        fn prop_screen_world_round_trip(
            world_x in -1.0e5_f32..1.0e5,
            follow in -1.0e5_f32..1.0e5,
            canvas_w in 100.0_f32..4000.0,
        ) {
            let mut cam = Camera::new(canvas_w, canvas_w * 0.75, 480.0);
            cam.follow(follow);
            let recovered = cam.to_world_x(cam.to_screen_x(world_x));
            // Relative tolerance: large coordinates lose absolute precision
            let tol = 1e-2_f32.max((world_x.abs() + follow.abs()) * 1e-4);
            prop_assert!((recovered - world_x).abs() <= tol);
        }
    }
}
