//! Player physics, charge state machine, and platform landing
//!
//! The player is an axis-aligned box of fixed size. Charging is only legal
//! while grounded; `release_jump` is the sole place velocity is assigned
//! pre-flight. Landing uses a swept surface-crossing test so thin platforms
//! cannot be tunneled through at high fall speed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::field::Platform;
use crate::consts::{KILL_MARGIN, PLAYER_HEIGHT, PLAYER_WIDTH};
use crate::tuning::Tuning;

/// The player body
///
/// Invariants: velocity is zero and charging is disallowed while dead;
/// charging is only possible while grounded; velocity is only non-zero while
/// airborne or at the instant of launch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Player {
    /// Top-left of the bounding box, world units
    pub pos: Vec2,
    pub vel: Vec2,
    pub grounded: bool,
    pub charging: bool,
    /// Seconds the jump input has been held (uncapped; clamped on read)
    pub charge_time: f32,
    /// Terminal and absorbing
    pub dead: bool,
}

impl Player {
    /// Spawn standing centered on a platform.
    pub fn spawn_on(platform: &Platform) -> Self {
        let x = platform.left() + (platform.width - PLAYER_WIDTH) * 0.5;
        Self {
            pos: Vec2::new(x, platform.top() - PLAYER_HEIGHT),
            vel: Vec2::ZERO,
            grounded: true,
            charging: false,
            charge_time: 0.0,
            dead: false,
        }
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + PLAYER_HEIGHT
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + PLAYER_WIDTH * 0.5
    }

    /// Begin charging a jump. Legal only while grounded, idle and alive;
    /// anything else is a silent no-op (a player mashing the button while
    /// airborne is expected, not an error).
    pub fn start_charge(&mut self) -> bool {
        if self.dead || !self.grounded || self.charging {
            return false;
        }
        self.charging = true;
        self.charge_time = 0.0;
        true
    }

    /// Release the charge and launch.
    ///
    /// Valid only while charging AND grounded AND alive; otherwise no jump is
    /// performed and state is untouched. On success the charge fraction
    /// interpolates the launch envelope, charging clears, and the player goes
    /// airborne.
    pub fn release_jump(&mut self, tuning: &Tuning) -> bool {
        if self.dead || !self.charging || !self.grounded {
            return false;
        }
        let t = self.charge_fraction(tuning);
        self.vel = tuning.launch_velocity(t);
        self.charging = false;
        self.grounded = false;
        true
    }

    /// Normalized charge in [0, 1], for presentation.
    #[inline]
    pub fn charge_fraction(&self, tuning: &Tuning) -> f32 {
        (self.charge_time / tuning.max_charge).min(1.0)
    }

    /// Advance one timestep.
    ///
    /// Integrates gravity while airborne and resolves landing against the
    /// platform slice in stable order (first qualifying match wins). Landing
    /// requires downward-or-apex motion, horizontal box overlap, and the
    /// bottom edge sweeping across the platform top within this step. Returns
    /// the index of the platform landed on this step, if any.
    pub fn tick(
        &mut self,
        dt: f32,
        platforms: &[Platform],
        world_h: f32,
        tuning: &Tuning,
    ) -> Option<usize> {
        if self.dead {
            return None;
        }

        if self.charging {
            self.charge_time += dt;
        }

        let mut landed = None;
        if !self.grounded {
            let prev_bottom = self.bottom();
            self.vel.y += tuning.gravity * dt;
            self.pos += self.vel * dt;

            // Ascending players cannot land
            if self.vel.y >= 0.0 {
                for (index, platform) in platforms.iter().enumerate() {
                    let overlaps_x = self.pos.x < platform.right()
                        && self.pos.x + PLAYER_WIDTH > platform.left();
                    let crossed_top =
                        prev_bottom <= platform.top() && self.bottom() >= platform.top();
                    if overlaps_x && crossed_top {
                        // Snap to the surface and cancel drift; a misjudged
                        // landing does not carry momentum forward.
                        self.pos.y = platform.top() - PLAYER_HEIGHT;
                        self.vel = Vec2::ZERO;
                        self.grounded = true;
                        landed = Some(index);
                        break;
                    }
                }
            }
        }

        if self.pos.y > world_h + KILL_MARGIN {
            self.kill();
        }
        landed
    }

    /// Fall-out-of-world transition: terminal from any state.
    pub fn kill(&mut self) {
        self.dead = true;
        self.vel = Vec2::ZERO;
        self.charging = false;
        self.grounded = false;
    }
}
