//! Read-only per-tick view handed to the renderer and HUD

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::point_on_circle;
use crate::sim::{AlienState, Direction, GamePhase, GameState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlienView {
    pub pos: Vec2,
    pub radius: f32,
    pub rotation: f32,
    pub state: AlienState,
    pub show_telegraph: bool,
    /// Telegraphed impact angles (Aiming only)
    pub target_angles: Vec<f32>,
    /// Where those angles meet the orbit
    pub telegraph_points: Vec<Vec2>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: u8,
    pub angle: f32,
    /// Radians per tick
    pub angular_speed: f32,
    pub pos: Vec2,
    pub direction: Direction,
    pub alive: bool,
    pub score: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireballView {
    pub pos: Vec2,
    pub angle: f32,
    pub radius: f32,
    /// Launch speed, units per tick
    pub speed: f32,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub width: f32,
    pub height: f32,
    pub center: Vec2,
    pub orbit_radius: f32,
    /// Sprite diameters from config
    pub hero_size: f32,
    pub fireball_size: f32,
    pub alien: AlienView,
    pub players: Vec<PlayerView>,
    pub fireballs: Vec<FireballView>,
    pub cheat_mode: bool,
    pub hit_indicator: bool,
    pub paused: bool,
    pub game_over: bool,
    pub high_score: u64,
}

impl Snapshot {
    pub fn capture(state: &GameState, config: &GameConfig) -> Self {
        let field = state.playfield;
        let center = field.center();
        let orbit_radius = field.orbit_radius();
        let alien = &state.alien;
        let target_angles = alien.phase.target_angles().to_vec();

        Self {
            tick: state.time_ticks,
            width: field.width,
            height: field.height,
            center,
            orbit_radius,
            hero_size: config.hero.size,
            fireball_size: config.fireball.size,
            alien: AlienView {
                pos: alien.pos,
                radius: alien.radius,
                rotation: alien.rotation,
                state: alien.state(),
                show_telegraph: alien.show_telegraph(),
                telegraph_points: target_angles
                    .iter()
                    .map(|&a| point_on_circle(center, orbit_radius, a))
                    .collect(),
                target_angles,
            },
            players: state
                .players
                .iter()
                .map(|p| PlayerView {
                    id: p.id,
                    angle: p.angle,
                    angular_speed: p.angular_speed,
                    pos: p.position(&field),
                    direction: p.direction,
                    alive: p.alive,
                    score: p.score,
                })
                .collect(),
            fireballs: state
                .fireballs
                .iter()
                .map(|f| FireballView {
                    pos: f.pos,
                    angle: f.angle,
                    radius: f.hit_radius,
                    speed: f.speed,
                })
                .collect(),
            cheat_mode: state.cheat_mode,
            hit_indicator: state.hit_indicator(),
            paused: state.phase == GamePhase::Paused,
            game_over: state.phase == GamePhase::GameOver,
            high_score: state.high_score,
        }
    }
}
