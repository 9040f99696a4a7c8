//! Edge-triggered input hub
//!
//! The single input surface the simulation reads, shared by keyboard/touch
//! capture and the gesture decoder so the game is agnostic to input source.
//! Producers call `trigger_press`/`trigger_release` at whatever cadence they
//! run; the tick thread reads the held state and the buffered one-tick
//! press/release edges, then the driver calls `flush` exactly once per tick
//! after the reads. Flags are atomics, so a gesture thread running on a
//! slower video cadence can write while the tick thread reads without
//! tearing.

use std::sync::atomic::{AtomicBool, Ordering};

/// Logical input codes; every source maps onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCode {
    /// Hold to charge, release to jump
    Jump,
    /// Tear down the run and start over
    Restart,
}

impl InputCode {
    const COUNT: usize = 2;

    #[inline]
    fn index(self) -> usize {
        match self {
            InputCode::Jump => 0,
            InputCode::Restart => 1,
        }
    }
}

#[derive(Debug, Default)]
struct KeyFlags {
    held: AtomicBool,
    just_pressed: AtomicBool,
    just_released: AtomicBool,
}

/// Shared edge buffer between input producers and the simulation tick
#[derive(Debug, Default)]
pub struct InputHub {
    keys: [KeyFlags; InputCode::COUNT],
}

impl InputHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press edge. Repeated presses while held are ignored, so a
    /// mashed or bouncing source cannot double-count an edge.
    pub fn trigger_press(&self, code: InputCode) {
        let key = &self.keys[code.index()];
        if !key.held.swap(true, Ordering::AcqRel) {
            key.just_pressed.store(true, Ordering::Release);
        }
    }

    /// Record a release edge. Ignored unless currently held.
    pub fn trigger_release(&self, code: InputCode) {
        let key = &self.keys[code.index()];
        if key.held.swap(false, Ordering::AcqRel) {
            key.just_released.store(true, Ordering::Release);
        }
    }

    /// Did a press edge arrive since the last flush?
    pub fn is_just_pressed(&self, code: InputCode) -> bool {
        self.keys[code.index()].just_pressed.load(Ordering::Acquire)
    }

    /// Did a release edge arrive since the last flush?
    pub fn is_just_released(&self, code: InputCode) -> bool {
        self.keys[code.index()]
            .just_released
            .load(Ordering::Acquire)
    }

    pub fn is_held(&self, code: InputCode) -> bool {
        self.keys[code.index()].held.load(Ordering::Acquire)
    }

    /// Clear the one-tick edges (held state persists). Must be called exactly
    /// once per tick, after game logic has read the edges.
    pub fn flush(&self) {
        for key in &self.keys {
            key.just_pressed.store(false, Ordering::Release);
            key.just_released.store(false, Ordering::Release);
        }
    }
}
