//! Screen-space geometry pass
//!
//! The core computes geometry only; a host-provided sink owns the actual
//! drawing surface (canvas 2D context, terminal cells, a test recorder).
//! Rectangles arrive in screen space, already camera-transformed.

use crate::consts::{PLAYER_HEIGHT, PLAYER_WIDTH};
use crate::sim::GameState;

/// A screen-space rectangle, pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Visual state tag accompanying each rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Visual {
    Platform,
    /// Already credited; hosts typically dim these
    PlatformScored,
    Player,
    /// Charging player; `power` is the clamped charge fraction in [0, 1]
    PlayerCharging { power: f32 },
    /// Terminal state; hosts typically grey the body out
    PlayerDead,
}

/// Drawing surface provided by the host
pub trait RenderSink {
    fn draw_rect(&mut self, rect: ScreenRect, visual: Visual);
}

/// Emit the visible scene, platforms first, player on top.
///
/// Off-screen platforms are culled here so sinks never see them; the spawn
/// margin means the field always extends past both screen edges.
pub fn draw(state: &GameState, sink: &mut dyn RenderSink) {
    let camera = &state.camera;
    let (canvas_w, _) = camera.canvas_size();

    for platform in state.field.platforms() {
        let x = camera.to_screen_x(platform.left());
        let w = platform.width * camera.scale();
        if x + w < 0.0 || x > canvas_w {
            continue;
        }
        let rect = ScreenRect {
            x,
            y: camera.to_screen_y(platform.top()),
            w,
            h: platform.height * camera.scale(),
        };
        let visual = if platform.scored {
            Visual::PlatformScored
        } else {
            Visual::Platform
        };
        sink.draw_rect(rect, visual);
    }

    let player = &state.player;
    let rect = ScreenRect {
        x: camera.to_screen_x(player.pos.x),
        y: camera.to_screen_y(player.pos.y),
        w: PLAYER_WIDTH * camera.scale(),
        h: PLAYER_HEIGHT * camera.scale(),
    };
    let visual = if player.dead {
        Visual::PlayerDead
    } else if player.charging {
        Visual::PlayerCharging {
            power: player.charge_fraction(&state.tuning),
        }
    } else {
        Visual::Player
    };
    sink.draw_rect(rect, visual);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FOLLOW_SCREEN_PCT;
    use crate::tuning::Tuning;

    #[derive(Default)]
    struct Recorder {
        rects: Vec<(ScreenRect, Visual)>,
    }

    impl RenderSink for Recorder {
        fn draw_rect(&mut self, rect: ScreenRect, visual: Visual) {
            self.rects.push((rect, visual));
        }
    }

    fn state() -> GameState {
        GameState::new(480.0, 720.0, Tuning::default(), 8).expect("valid tuning")
    }

    #[test]
    fn test_player_drawn_last_at_follow_offset() {
        let state = state();
        let mut sink = Recorder::default();
        draw(&state, &mut sink);

        let (player_rect, visual) = sink.rects.last().expect("player always drawn");
        assert_eq!(*visual, Visual::Player);
        assert!(
            (player_rect.x - 480.0 * FOLLOW_SCREEN_PCT).abs() < 1e-2,
            "player pinned at the follow fraction"
        );
    }

    #[test]
    fn test_platforms_culled_to_screen() {
        let state = state();
        let mut sink = Recorder::default();
        draw(&state, &mut sink);

        // Everything emitted intersects the canvas horizontally
        for (rect, _) in &sink.rects {
            assert!(rect.x + rect.w >= 0.0 && rect.x <= 480.0);
        }
        // And at least the starter plus a few ahead are visible
        assert!(sink.rects.len() >= 3);
    }

    #[test]
    fn test_charging_visual_carries_power() {
        let mut state = state();
        state.player.start_charge();
        state.player.charge_time = state.tuning.max_charge * 0.5;

        let mut sink = Recorder::default();
        draw(&state, &mut sink);
        let (_, visual) = sink.rects.last().expect("player rect");
        match visual {
            Visual::PlayerCharging { power } => assert!((power - 0.5).abs() < 1e-4),
            other => panic!("expected charging visual, got {other:?}"),
        }
    }

    #[test]
    fn test_scored_platform_tagged() {
        let mut state = state();
        state.field.mark_scored(1);

        let mut sink = Recorder::default();
        draw(&state, &mut sink);
        assert!(
            sink.rects
                .iter()
                .any(|(_, v)| *v == Visual::PlatformScored),
            "starter and scored platforms are tagged"
        );
    }
}
