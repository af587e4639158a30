//! Alien Orbit - an orbit-dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (alien state machine, fireballs, collisions)
//! - `session`: Run/pause/game-over control around the simulation
//! - `snapshot`: Read-only view handed to the renderer
//! - `config`: Tunable sizes and speeds
//! - `persistence`: Key-value stores for settings and high score
//! - `platform`: Input routing and browser glue

pub mod config;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod sim;
pub mod snapshot;

pub use config::{GameConfig, SettingsPatch};
pub use session::{Session, SessionOptions};
pub use snapshot::Snapshot;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (~60 Hz)
    pub const TICK_MS: u32 = 16;

    /// Orbit radius as a fraction of the shorter playfield dimension (diameter)
    pub const ORBIT_FRACTION: f32 = 0.85;

    /// Player hit radius, independent of the hero sprite size
    pub const PLAYER_HIT_RADIUS: f32 = 8.0;

    /// Extra distance past the playfield edge before a fireball is dropped
    pub const FIREBALL_EXIT_MARGIN: f32 = 10.0;

    /// Fireballs per volley
    pub const VOLLEY_SIZE: usize = 3;

    /// Rotating phase duration bounds (ms, inclusive)
    pub const ROTATION_PHASE_MIN_MS: u32 = 1000;
    pub const ROTATION_PHASE_MAX_MS: u32 = 3000;

    /// Per-tick multiplier applied to the alien's spin while stopping
    pub const STOPPING_DECAY: f32 = 0.95;
    /// Spin below this snaps to zero and starts aiming
    pub const STOP_THRESHOLD: f32 = 0.001;

    /// How long impact points are telegraphed before the volley (ms)
    pub const AIM_DURATION_MS: u32 = 1000;

    /// How long the cheat-mode "HIT" indicator stays up (ms)
    pub const HIT_INDICATOR_MS: u32 = 500;

    /// Default playfield used by the headless runner
    pub const DEFAULT_PLAYFIELD_WIDTH: f32 = 800.0;
    pub const DEFAULT_PLAYFIELD_HEIGHT: f32 = 600.0;
}

/// Visible area in screen units, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new(consts::DEFAULT_PLAYFIELD_WIDTH, consts::DEFAULT_PLAYFIELD_HEIGHT)
    }
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Center of the playfield (where the alien sits)
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Radius of the circle the players run along
    #[inline]
    pub fn orbit_radius(&self) -> f32 {
        self.width.min(self.height) * consts::ORBIT_FRACTION / 2.0
    }

    /// Whether a circle has left the visible area by more than its radius plus `margin`
    pub fn has_left(&self, pos: Vec2, radius: f32, margin: f32) -> bool {
        let m = radius + margin;
        pos.x < -m || pos.x > self.width + m || pos.y < -m || pos.y > self.height + m
    }
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Point on a circle of radius `r` around `center`
#[inline]
pub fn point_on_circle(center: Vec2, r: f32, theta: f32) -> Vec2 {
    center + polar_to_cartesian(r, theta)
}

/// Shortest distance between two angles, in [0, π]
#[inline]
pub fn angular_distance(a: f32, b: f32) -> f32 {
    let d = wrap_angle(a - b);
    d.min(TAU - d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(TAU + 0.5) - 0.5).abs() < 1e-5);
        assert!((wrap_angle(-0.5) - (TAU - 0.5)).abs() < 1e-5);
        assert_eq!(wrap_angle(0.0), 0.0);
        assert_eq!(wrap_angle(TAU), 0.0);
        let tiny = wrap_angle(-1e-9);
        assert!((0.0..TAU).contains(&tiny));
    }

    #[test]
    fn test_angular_distance_wraps() {
        assert!((angular_distance(0.1, TAU - 0.1) - 0.2).abs() < 1e-5);
        assert!((angular_distance(0.0, PI) - PI).abs() < 1e-5);
        assert!(angular_distance(1.0, 1.0) < 1e-6);
    }

    #[test]
    fn test_point_on_circle() {
        let p = point_on_circle(Vec2::new(100.0, 50.0), 10.0, PI / 2.0);
        assert!((p.x - 100.0).abs() < 1e-4);
        assert!((p.y - 60.0).abs() < 1e-4);
    }

    #[test]
    fn test_playfield_geometry() {
        let field = Playfield::new(800.0, 600.0);
        assert_eq!(field.center(), Vec2::new(400.0, 300.0));
        assert!((field.orbit_radius() - 255.0).abs() < 1e-4);
    }

    #[test]
    fn test_playfield_exit_margin() {
        let field = Playfield::new(800.0, 600.0);
        // radius 8 + margin 10 = 18 past the edge
        assert!(!field.has_left(Vec2::new(-18.0, 300.0), 8.0, 10.0));
        assert!(field.has_left(Vec2::new(-18.5, 300.0), 8.0, 10.0));
        assert!(field.has_left(Vec2::new(400.0, 618.5), 8.0, 10.0));
        assert!(!field.has_left(Vec2::new(818.0, 618.0), 8.0, 10.0));
    }
}
