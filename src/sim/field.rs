//! Procedural platform field
//!
//! Spawns platforms ahead of the camera and recycles them once they fall far
//! enough behind it. All geometry derives from the visible world size, so the
//! same tuning produces the same level feel whether the canvas is 400 or 1600
//! pixels wide. Generation draws from a seeded RNG only; a run is fully
//! reproducible from its seed.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use crate::consts::{
    CEILING_PCT, FLOOR_PCT, INITIAL_AHEAD, PLATFORM_HEIGHT_PCT, PRUNE_BEHIND, SPAWN_AHEAD,
    START_ANCHOR_X, START_WIDTH_MULT,
};
use crate::round_world;
use crate::tuning::Tuning;

/// A landable platform
///
/// Geometry is immutable after creation; only the scored flag mutates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    /// Top-left corner, world units
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Whether the player has already been credited for landing here
    pub scored: bool,
}

impl Platform {
    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }
}

/// Field geometry derived from visible world size and tuning fractions
///
/// All lengths are pre-rounded to whole world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldParams {
    pub platform_width: f32,
    pub platform_height: f32,
    pub min_gap_x: f32,
    pub max_gap_x: f32,
    /// Symmetric vertical variance band (new top = previous top ± band)
    pub gap_y_band: f32,
    /// Lowest allowed platform top
    pub floor_y: f32,
    /// Highest allowed platform top
    pub ceiling_y: f32,
}

impl FieldParams {
    pub fn derive(world_w: f32, world_h: f32, tuning: &Tuning) -> Self {
        Self {
            platform_width: round_world(world_w * tuning.platform_width_pct),
            platform_height: round_world(world_h * PLATFORM_HEIGHT_PCT),
            min_gap_x: round_world(world_w * tuning.min_gap_x_pct),
            max_gap_x: round_world(world_w * tuning.max_gap_x_pct),
            gap_y_band: round_world(world_h * tuning.gap_y_pct),
            floor_y: round_world(world_h * FLOOR_PCT),
            ceiling_y: round_world(world_h * CEILING_PCT),
        }
    }
}

/// The rolling window of platforms around the camera
#[derive(Debug, Clone)]
pub struct PlatformField {
    params: FieldParams,
    platforms: Vec<Platform>,
    rng: Pcg32,
    /// Geometry of the most recently spawned platform; pruning never touches
    /// it, so spawning stays deterministic regardless of recycling.
    last_left: f32,
    last_right: f32,
    last_top: f32,
}

impl PlatformField {
    /// Seed the field: one wide starter platform at a fixed world anchor
    /// (pre-scored, the player begins standing on it) plus a runway of
    /// platforms ahead.
    pub fn new(world_w: f32, world_h: f32, tuning: &Tuning, seed: u64) -> Self {
        let params = FieldParams::derive(world_w, world_h, tuning);
        let starter = Platform {
            pos: Vec2::new(START_ANCHOR_X, params.floor_y),
            width: round_world(params.platform_width * START_WIDTH_MULT),
            height: params.platform_height,
            scored: true,
        };
        let mut field = Self {
            params,
            last_left: starter.left(),
            last_right: starter.right(),
            last_top: starter.top(),
            platforms: vec![starter],
            rng: Pcg32::seed_from_u64(seed),
        };
        for _ in 0..INITIAL_AHEAD {
            field.spawn_next();
        }
        field
    }

    #[inline]
    pub fn params(&self) -> &FieldParams {
        &self.params
    }

    /// Platforms in stable world order (left to right). Collision iterates
    /// this slice front to back; first match wins.
    #[inline]
    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    /// Credit a landing. Returns true if the platform had not been scored yet.
    pub fn mark_scored(&mut self, index: usize) -> bool {
        match self.platforms.get_mut(index) {
            Some(p) if !p.scored => {
                p.scored = true;
                true
            }
            _ => false,
        }
    }

    /// Append one platform past the current frontier.
    fn spawn_next(&mut self) {
        let gap_x = round_world(
            self.rng
                .random_range(self.params.min_gap_x..=self.params.max_gap_x),
        );
        let band = self.params.gap_y_band;
        let gap_y = if band > 0.0 {
            round_world(self.rng.random_range(-band..=band))
        } else {
            0.0
        };

        let x = self.last_right + gap_x;
        let y = (self.last_top + gap_y).clamp(self.params.ceiling_y, self.params.floor_y);
        let platform = Platform {
            pos: Vec2::new(x, y),
            width: self.params.platform_width,
            height: self.params.platform_height,
            scored: false,
        };
        self.last_left = platform.left();
        self.last_right = platform.right();
        self.last_top = platform.top();
        self.platforms.push(platform);
    }

    /// Per-tick maintenance: prune far behind the camera, keep the horizon
    /// populated ahead of the visible right edge.
    pub fn update(&mut self, camera: &Camera) {
        let cutoff = camera.left_x - PRUNE_BEHIND;
        self.platforms.retain(|p| p.right() >= cutoff);

        let horizon = camera.left_x + camera.visible_world_width() + SPAWN_AHEAD;
        while self.last_left < horizon {
            self.spawn_next();
        }
    }
}
