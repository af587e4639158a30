//! Game session controller
//!
//! Owns the simulation state, config, high score and input router for one
//! player-facing run, and the store they persist to. The renderer only ever
//! sees `Snapshot`s; the platform layer only calls the methods here.

use crate::Playfield;
use crate::config::{GameConfig, SettingsPatch};
use crate::consts::TICK_MS;
use crate::highscores::HighScore;
use crate::persistence::KeyValueStore;
use crate::platform::input::{InputRouter, KeyCommand, Touch};
use crate::sim::{GameEvent, GamePhase, GameState, PlayerCount, tick};
use crate::snapshot::Snapshot;

/// Parameters for a new run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionOptions {
    pub seed: u64,
    pub players: PlayerCount,
    pub playfield: Playfield,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            players: PlayerCount::One,
            playfield: Playfield::default(),
        }
    }
}

/// One game session
pub struct Session<S: KeyValueStore> {
    store: S,
    config: GameConfig,
    high_score: HighScore,
    state: GameState,
    router: InputRouter,
}

impl<S: KeyValueStore> Session<S> {
    /// Start a run, reading config and high score from `store`
    pub fn new(store: S, options: SessionOptions) -> Self {
        let config = GameConfig::load(&store);
        let high_score = HighScore::load(&store);
        let state = GameState::new(
            options.seed,
            options.players,
            options.playfield,
            &config,
            high_score.best,
        );
        log::info!(
            "Session started: seed {}, {} player(s), high score {}",
            options.seed,
            options.players.count(),
            high_score.best
        );

        Self {
            store,
            config,
            high_score,
            state,
            router: InputRouter::new(options.players, options.playfield.height),
        }
    }

    /// Advance one fixed tick. Returns the events it raised.
    pub fn tick(&mut self) -> Vec<GameEvent> {
        tick(&mut self.state, &self.config, TICK_MS);
        let events = self.state.drain_events();
        self.process_events(&events);
        events
    }

    fn process_events(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::HighScoreBeaten { score } => {
                    if self.high_score.record(*score) {
                        log::info!("New high score: {}", score);
                        self.high_score.save(&mut self.store);
                    }
                }
                GameEvent::GameOver { final_score } => {
                    log::info!(
                        "Game over at tick {}: final score {}",
                        self.state.time_ticks,
                        final_score
                    );
                }
                GameEvent::PlayerKilled { player_id } => {
                    log::info!("Player {} hit", player_id);
                }
                other => log::debug!("tick {}: {:?}", self.state.time_ticks, other),
            }
        }
    }

    /// Pointer down / tap at vertical coordinate `y`
    pub fn handle_input(&mut self, y: f32) {
        let index = self.router.route(y);
        self.flip(index);
    }

    pub fn touch_start(&mut self, touches: &[Touch]) {
        for index in self.router.touch_start(touches) {
            self.flip(index);
        }
    }

    pub fn touch_move(&mut self, touches: &[Touch]) {
        for index in self.router.touch_move(touches) {
            self.flip(index);
        }
    }

    pub fn touch_end(&mut self, ids: &[i32]) {
        self.router.touch_end(ids);
    }

    pub fn touch_cancel(&mut self, ids: &[i32]) {
        self.router.touch_cancel(ids);
    }

    /// Keyboard input by `KeyboardEvent.code`. Returns whether it was used.
    pub fn handle_key(&mut self, code: &str) -> bool {
        match KeyCommand::from_code(code) {
            Some(KeyCommand::TogglePause) => {
                self.toggle_pause();
                true
            }
            Some(KeyCommand::ToggleCheat) => {
                self.toggle_cheat();
                true
            }
            Some(KeyCommand::Flip) if self.state.players.len() == 1 => {
                self.flip(0);
                true
            }
            _ => false,
        }
    }

    /// Reverse a player's direction (running sessions and alive players only)
    fn flip(&mut self, index: usize) {
        if self.state.phase != GamePhase::Running {
            return;
        }
        if let Some(player) = self.state.players.get_mut(index) {
            if player.alive {
                player.flip_direction();
            }
        }
    }

    /// Pause or resume. No-op once the run is over. Returns whether paused.
    pub fn toggle_pause(&mut self) -> bool {
        self.state.phase = match self.state.phase {
            GamePhase::Running => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Running,
            GamePhase::GameOver => return false,
        };
        log::info!("{}", if self.is_paused() { "Paused" } else { "Resumed" });
        self.is_paused()
    }

    /// Switch cheat mode. No-op once the run is over. Returns the new mode.
    pub fn toggle_cheat(&mut self) -> bool {
        if self.state.is_over() {
            return self.state.cheat_mode;
        }
        self.state.cheat_mode = !self.state.cheat_mode;
        log::info!("Cheat mode {}", if self.state.cheat_mode { "on" } else { "off" });
        self.state.cheat_mode
    }

    /// Merge a settings patch, apply it to the live run, and persist the
    /// full config. Called between ticks, so a tick never sees half of it.
    pub fn apply_settings(&mut self, patch: &SettingsPatch) {
        if patch.is_empty() {
            return;
        }
        self.config.merge(patch);
        self.config.warn_if_suspicious();

        if patch.alien_size.is_some() {
            self.state.alien.radius = self.config.alien.size / 2.0;
        }
        if patch.alien_rotation_speed.is_some() {
            self.state
                .alien
                .set_base_rotation_speed(self.config.alien.rotation_speed);
        }
        if patch.hero_speed.is_some() {
            for player in &mut self.state.players {
                player.angular_speed = self.config.hero.speed;
            }
        }
        // Hero size is render-only; fireball size/speed apply from the next volley

        log::debug!("Settings applied: {:?}", patch);
        self.config.save(&mut self.store);
    }

    /// Start a fresh run with the same config, high score and playfield
    pub fn restart(&mut self, seed: u64) {
        let players = if self.state.players.len() == 2 {
            PlayerCount::Two
        } else {
            PlayerCount::One
        };
        self.state = GameState::new(
            seed,
            players,
            self.state.playfield,
            &self.config,
            self.high_score.best,
        );
        self.router.reset();
        log::info!("Session restarted with seed {}", seed);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state, &self.config)
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    pub fn is_paused(&self) -> bool {
        self.state.phase == GamePhase::Paused
    }

    pub fn cheat_mode(&self) -> bool {
        self.state.cheat_mode
    }

    /// Highest score among the players
    pub fn final_score(&self) -> u64 {
        self.state.best_score()
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for tools and scripted scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{CONFIG_KEY, HIGH_SCORE_KEY, MemoryStore};
    use crate::sim::{AlienPhase, Direction};

    fn session(players: PlayerCount) -> Session<MemoryStore> {
        Session::new(
            MemoryStore::new(),
            SessionOptions {
                seed: 21,
                players,
                playfield: Playfield::new(800.0, 600.0),
            },
        )
    }

    #[test]
    fn test_loads_from_store() {
        let store = MemoryStore::with_entries([
            (HIGH_SCORE_KEY, "17"),
            (CONFIG_KEY, r#"{"hero":{"speed":0.05}}"#),
        ]);
        let session = Session::new(store, SessionOptions::default());
        assert_eq!(session.high_score(), 17);
        assert_eq!(session.config().hero.speed, 0.05);
        assert_eq!(session.state().players[0].angular_speed, 0.05);
        assert_eq!(session.snapshot().high_score, 17);
    }

    #[test]
    fn test_input_routes_to_halves() {
        let mut s = session(PlayerCount::Two);
        s.handle_input(100.0);
        assert_eq!(s.state().players[1].direction, Direction::CounterClockwise);
        assert_eq!(s.state().players[0].direction, Direction::Clockwise);
        s.handle_input(500.0);
        assert_eq!(s.state().players[0].direction, Direction::CounterClockwise);
    }

    #[test]
    fn test_dead_player_ignores_input() {
        let mut s = session(PlayerCount::Two);
        s.state_mut().players[1].alive = false;
        s.handle_input(10.0);
        assert_eq!(s.state().players[1].direction, Direction::Clockwise);
    }

    #[test]
    fn test_touch_flips_once_per_contact() {
        let mut s = session(PlayerCount::One);
        let t = Touch::new(3, 200.0);
        s.touch_start(&[t]);
        s.touch_move(&[t]);
        s.touch_start(&[t]);
        assert_eq!(s.state().players[0].direction, Direction::CounterClockwise);
        s.touch_end(&[3]);
        s.touch_start(&[t]);
        assert_eq!(s.state().players[0].direction, Direction::Clockwise);
    }

    #[test]
    fn test_keys() {
        let mut s = session(PlayerCount::One);
        assert!(s.handle_key("Space"));
        assert_eq!(s.state().players[0].direction, Direction::CounterClockwise);
        assert!(s.handle_key("KeyC"));
        assert!(s.cheat_mode());
        assert!(s.handle_key("KeyP"));
        assert!(s.is_paused());
        assert!(!s.handle_key("KeyZ"));

        let mut two = session(PlayerCount::Two);
        assert!(!two.handle_key("Enter"));
    }

    #[test]
    fn test_flip_ignored_while_paused() {
        let mut s = session(PlayerCount::One);
        s.toggle_pause();
        s.handle_input(10.0);
        assert_eq!(s.state().players[0].direction, Direction::Clockwise);
    }

    #[test]
    fn test_pause_and_cheat_noop_after_game_over() {
        let mut s = session(PlayerCount::One);
        s.state_mut().phase = GamePhase::GameOver;
        assert!(!s.toggle_pause());
        assert_eq!(s.state().phase, GamePhase::GameOver);
        assert!(!s.toggle_cheat());
        assert!(!s.cheat_mode());
    }

    #[test]
    fn test_apply_settings_live_and_persisted() {
        let mut s = session(PlayerCount::Two);
        s.apply_settings(&SettingsPatch {
            alien_size: Some(100.0),
            alien_rotation_speed: Some(0.02),
            hero_speed: Some(0.04),
            fireball_speed: Some(5.0),
            ..Default::default()
        });
        assert_eq!(s.state().alien.radius, 50.0);
        assert_eq!(s.state().alien.base_rotation_speed, 0.02);
        assert_eq!(s.state().alien.rotation_speed, 0.02);
        assert!(s.state().players.iter().all(|p| p.angular_speed == 0.04));

        let saved = GameConfig::load(s.store());
        assert_eq!(saved, *s.config());
        assert_eq!(saved.fireball.speed, 5.0);
    }

    #[test]
    fn test_next_volley_uses_new_fireball_config() {
        let mut s = session(PlayerCount::One);
        s.apply_settings(&SettingsPatch {
            fireball_size: Some(30.0),
            fireball_speed: Some(6.0),
            ..Default::default()
        });
        s.state_mut().alien.rotation_speed = 0.0;
        s.state_mut().alien.phase = AlienPhase::Aiming {
            elapsed_ms: 990,
            targets: [0.0, 2.0, 4.0],
        };
        s.tick();
        assert_eq!(s.state().fireballs.len(), 3);
        assert!(s
            .state()
            .fireballs
            .iter()
            .all(|f| f.hit_radius == 15.0 && f.speed == 6.0));
    }

    #[test]
    fn test_high_score_persisted_on_beat() {
        let mut s = session(PlayerCount::One);
        s.state_mut().alien.rotation_speed = 0.0;
        s.state_mut().alien.phase = AlienPhase::Aiming {
            elapsed_ms: 990,
            targets: [0.0, 2.0, 4.0],
        };
        let events = s.tick();
        assert!(events.contains(&GameEvent::HighScoreBeaten { score: 1 }));
        assert_eq!(s.high_score(), 1);
        assert_eq!(s.store().get(HIGH_SCORE_KEY).unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_restart_keeps_high_score_and_config() {
        let mut s = session(PlayerCount::Two);
        s.apply_settings(&SettingsPatch {
            hero_speed: Some(0.05),
            ..Default::default()
        });
        s.state_mut().phase = GamePhase::GameOver;
        s.restart(99);
        assert!(!s.is_over());
        assert_eq!(s.state().players.len(), 2);
        assert_eq!(s.state().players[0].angular_speed, 0.05);
        assert_eq!(s.state().seed, 99);
    }
}
