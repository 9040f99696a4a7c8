//! Simulation state composition and events
//!
//! `GameState` owns everything one run needs: player, camera, platform field,
//! score and the event buffer drained by the driver. Restart and resize
//! rebuild all of it wholesale; no partial state carries over between runs.

use super::camera::Camera;
use super::field::PlatformField;
use super::player::Player;
use crate::tuning::{Tuning, TuningError};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Live simulation
    Playing,
    /// Run ended; only restart leaves this phase
    GameOver,
}

/// Telemetry notifications emitted by the tick and drained by the driver
///
/// Pure notifications; the simulation never waits on their consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The player was credited for landing on a fresh platform
    PlatformScored { total: u32 },
    /// The player fell out of the world
    PlayerDied { score: u32 },
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Platforms landed on, one point each
    pub score: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    pub camera: Camera,
    pub field: PlatformField,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    canvas_w: f32,
    canvas_h: f32,
}

impl GameState {
    /// Build a fresh run. Fails on malformed tuning; the game refuses to
    /// start rather than simulate undefined gameplay.
    pub fn new(canvas_w: f32, canvas_h: f32, tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;

        let mut camera = Camera::new(canvas_w, canvas_h, tuning.reference_width);
        let field = PlatformField::new(
            camera.visible_world_width(),
            camera.visible_world_height(),
            &tuning,
            seed,
        );
        let player = Player::spawn_on(&field.platforms()[0]);
        camera.follow(player.pos.x);

        log::info!("New run: seed {seed}, canvas {canvas_w}x{canvas_h}");
        Ok(Self {
            seed,
            tuning,
            phase: GamePhase::Playing,
            score: 0,
            time_ticks: 0,
            player,
            camera,
            field,
            events: Vec::new(),
            canvas_w,
            canvas_h,
        })
    }

    /// Replace the whole run with a new seed, same viewport and tuning.
    ///
    /// Tuning was validated when this state was first built, so
    /// reconstruction cannot fail.
    pub fn restart(&mut self, seed: u64) {
        if let Ok(fresh) = Self::new(self.canvas_w, self.canvas_h, self.tuning, seed) {
            *self = fresh;
        }
    }

    /// Take the events accumulated since the last drain.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// World-space height of the visible area (the kill line hangs a fixed
    /// margin below it).
    #[inline]
    pub fn world_height(&self) -> f32 {
        self.camera.visible_world_height()
    }
}
