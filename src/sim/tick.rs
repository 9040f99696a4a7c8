//! Fixed timestep simulation tick
//!
//! Per tick, in order: apply decoded input edges, advance the player, follow
//! with the camera, maintain the platform field, credit scoring, detect the
//! terminal state. The driver flushes the input hub once per tick after
//! building the `TickInput` snapshot.

use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// The charge input went down this tick
    pub press: bool,
    /// The charge input went up this tick
    pub release: bool,
    /// Tear the run down and start a fresh one
    pub restart: bool,
    /// Idle/demo mode - the tick charges and releases by itself
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.restart {
        let seed = state.seed.wrapping_add(1);
        state.restart(seed);
        return;
    }
    if state.phase == GamePhase::GameOver {
        return;
    }

    let mut input = input.clone();
    if input.autopilot {
        drive_autopilot(state, &mut input);
    }

    state.time_ticks += 1;

    if input.press {
        state.player.start_charge();
    }
    if input.release {
        state.player.release_jump(&state.tuning);
    }

    let world_h = state.camera.visible_world_height();
    let landed = {
        let GameState {
            player,
            field,
            tuning,
            ..
        } = state;
        player.tick(dt, field.platforms(), world_h, tuning)
    };

    // Score before field maintenance: pruning renumbers the slice.
    if let Some(index) = landed {
        if state.field.mark_scored(index) {
            state.score += 1;
            let total = state.score;
            state.events.push(GameEvent::PlatformScored { total });
            log::debug!("Landed fresh platform, score {total}");
        }
    }

    state.camera.follow(state.player.pos.x);
    state.field.update(&state.camera);

    if state.player.dead && state.phase == GamePhase::Playing {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::PlayerDied { score: state.score });
        log::info!("Run over at score {}", state.score);
    }
}

/// Demo pilot: charge toward the center of the next unscored platform.
///
/// Greedy and fallible on purpose - when the next platform sits beyond the
/// jump envelope it jumps at full charge and takes its chances; the demo
/// driver restarts on death.
fn drive_autopilot(state: &GameState, input: &mut TickInput) {
    let player = &state.player;
    if player.dead || !player.grounded {
        return;
    }
    let Some(target) = state
        .field
        .platforms()
        .iter()
        .find(|p| !p.scored && p.left() > player.pos.x)
    else {
        return;
    };

    let distance = target.left() + target.width * 0.5 - player.center_x();
    let desired = state.tuning.charge_for_range(distance);

    if !player.charging {
        input.press = true;
        return;
    }
    if player.charge_fraction(&state.tuning) >= desired {
        input.release = true;
    }
}
