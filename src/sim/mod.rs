//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (players by id, fireballs by launch order)
//! - No rendering, storage, or platform dependencies

pub mod alien;
pub mod collision;
pub mod state;
pub mod tick;

pub use alien::{Alien, AlienPhase, AlienSignal, AlienState};
pub use collision::{circles_overlap, fireball_gone, first_hit};
pub use state::{Direction, Fireball, GameEvent, GamePhase, GameState, Player, PlayerCount};
pub use tick::tick;
