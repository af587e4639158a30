//! Game state and core simulation types
//!
//! Everything the fixed-step tick reads or writes lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::alien::Alien;
use crate::config::GameConfig;
use crate::consts::*;
use crate::{Playfield, point_on_circle, wrap_angle};

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Simulation frozen (alien, players, fireballs, timers)
    Paused,
    /// Run ended; nothing advances any more
    GameOver,
}

/// How many players share the orbit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerCount {
    #[default]
    One,
    Two,
}

impl PlayerCount {
    pub fn count(self) -> usize {
        match self {
            PlayerCount::One => 1,
            PlayerCount::Two => 2,
        }
    }
}

/// Travel direction along the orbit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    /// +1: increasing angle (clockwise on screen, y grows downward)
    #[default]
    Clockwise,
    /// -1: decreasing angle
    CounterClockwise,
}

impl Direction {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Clockwise => 1.0,
            Direction::CounterClockwise => -1.0,
        }
    }

    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

/// A player running along the orbit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// 1-based player number
    pub id: u8,
    /// Position on the orbit (radians, [0, 2π))
    pub angle: f32,
    pub hit_radius: f32,
    /// Radians per tick
    pub angular_speed: f32,
    pub direction: Direction,
    pub score: u64,
    pub alive: bool,
}

impl Player {
    pub fn new(id: u8, angle: f32, angular_speed: f32) -> Self {
        Self {
            id,
            angle: wrap_angle(angle),
            hit_radius: PLAYER_HIT_RADIUS,
            angular_speed,
            direction: Direction::default(),
            score: 0,
            alive: true,
        }
    }

    /// Move one tick along the orbit
    pub fn advance(&mut self) {
        self.angle = wrap_angle(self.angle + self.angular_speed * self.direction.sign());
    }

    pub fn flip_direction(&mut self) {
        self.direction = self.direction.flipped();
    }

    /// Cartesian position on the orbit
    pub fn position(&self, field: &Playfield) -> Vec2 {
        point_on_circle(field.center(), field.orbit_radius(), self.angle)
    }
}

/// A projectile launched by the alien
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fireball {
    pub pos: Vec2,
    /// Heading (radians)
    pub angle: f32,
    /// Units per tick
    pub speed: f32,
    pub hit_radius: f32,
    /// Ticks since launch
    pub age: u32,
}

impl Fireball {
    pub fn new(pos: Vec2, angle: f32, speed: f32, hit_radius: f32) -> Self {
        Self {
            pos,
            angle,
            speed,
            hit_radius,
            age: 0,
        }
    }

    /// Move one tick along the heading
    pub fn advance(&mut self) {
        self.pos += Vec2::new(self.angle.cos(), self.angle.sin()) * self.speed;
        self.age += 1;
    }
}

/// Notable things that happened during a tick (drained by the session)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    VolleyFired { angles: Vec<f32> },
    /// Every alive player gained a point; scores listed by player id order
    ScoreAwarded { scores: Vec<u64> },
    HighScoreBeaten { score: u64 },
    /// Cheat-mode hit (non-lethal)
    PlayerHit { player_id: u8 },
    PlayerKilled { player_id: u8 },
    GameOver { final_score: u64 },
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub playfield: Playfield,
    pub phase: GamePhase,
    /// Collisions mark hits instead of ending the run; no score accrues
    pub cheat_mode: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulated clock (sum of tick deltas)
    pub clock_ms: u64,
    /// Clock reading of the latest cheat-mode hit while its indicator is up
    pub hit_at_ms: Option<u64>,
    pub high_score: u64,
    pub alien: Alien,
    /// Sorted by player id
    pub players: Vec<Player>,
    /// Launch order
    pub fireballs: Vec<Fireball>,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh run
    pub fn new(
        seed: u64,
        players: PlayerCount,
        playfield: Playfield,
        config: &GameConfig,
        high_score: u64,
    ) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let alien = Alien::new(
            playfield.center(),
            config.alien.size / 2.0,
            config.alien.rotation_speed,
            &mut rng,
        );

        // Player 2 starts on the opposite side
        let players = (0..players.count())
            .map(|i| {
                Player::new(
                    i as u8 + 1,
                    i as f32 * std::f32::consts::PI,
                    config.hero.speed,
                )
            })
            .collect();

        Self {
            seed,
            rng,
            playfield,
            phase: GamePhase::Running,
            cheat_mode: false,
            time_ticks: 0,
            clock_ms: 0,
            hit_at_ms: None,
            high_score,
            alien,
            players,
            fireballs: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Whether the cheat-mode hit indicator is showing
    pub fn hit_indicator(&self) -> bool {
        self.hit_at_ms.is_some()
    }

    /// Highest score among the players
    pub fn best_score(&self) -> u64 {
        self.players.iter().map(|p| p.score).max().unwrap_or(0)
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{PI, TAU};

    #[test]
    fn test_new_state_layout() {
        let config = GameConfig::default();
        let state = GameState::new(1, PlayerCount::Two, Playfield::default(), &config, 12);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.players.len(), 2);
        assert_eq!(state.players[0].id, 1);
        assert_eq!(state.players[0].angle, 0.0);
        assert!((state.players[1].angle - PI).abs() < 1e-6);
        assert!(state.players.iter().all(|p| p.alive && p.score == 0));
        assert_eq!(state.alien.pos, Playfield::default().center());
        assert_eq!(state.alien.radius, 90.0);
        assert_eq!(state.high_score, 12);
        assert!(state.fireballs.is_empty());
    }

    #[test]
    fn test_player_wraps_both_ways() {
        let mut p = Player::new(1, TAU - 0.01, 0.03);
        p.advance();
        assert!(p.angle < 0.03 && p.angle >= 0.0);

        p.flip_direction();
        p.advance();
        p.advance();
        assert!(p.angle > TAU - 0.05 && p.angle < TAU);
    }

    #[test]
    fn test_fireball_moves_along_heading() {
        let mut f = Fireball::new(Vec2::new(10.0, 10.0), PI / 2.0, 3.0, 8.0);
        f.advance();
        assert!((f.pos.x - 10.0).abs() < 1e-4);
        assert!((f.pos.y - 13.0).abs() < 1e-4);
        assert_eq!(f.age, 1);
    }

    #[test]
    fn test_direction_flip() {
        assert_eq!(Direction::Clockwise.flipped(), Direction::CounterClockwise);
        assert_eq!(Direction::CounterClockwise.sign(), -1.0);
    }
}
