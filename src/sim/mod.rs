//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (platforms in world order, first match wins)
//! - No rendering or platform dependencies

pub mod camera;
pub mod field;
pub mod player;
pub mod state;
pub mod tick;

pub use camera::Camera;
pub use field::{FieldParams, Platform, PlatformField};
pub use player::Player;
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
