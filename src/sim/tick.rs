//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.
//!
//! Order per tick: alien state machine, players, fireballs, collisions,
//! transient timers. Collisions run against post-move positions.

use super::alien::AlienSignal;
use super::collision::{fireball_gone, first_hit};
use super::state::{Fireball, GameEvent, GamePhase, GameState};
use crate::config::GameConfig;
use crate::consts::*;

/// Advance the game state by one fixed timestep of `dt_ms`
pub fn tick(state: &mut GameState, config: &GameConfig, dt_ms: u32) {
    // Don't tick if paused or game over
    if state.phase != GamePhase::Running {
        return;
    }

    state.time_ticks += 1;
    state.clock_ms += u64::from(dt_ms);

    step_alien(state, config, dt_ms);

    for player in state.players.iter_mut().filter(|p| p.alive) {
        player.advance();
    }

    for fireball in &mut state.fireballs {
        fireball.advance();
    }
    let field = state.playfield;
    state.fireballs.retain(|f| !fireball_gone(f, &field));

    resolve_collisions(state);
    if state.phase == GamePhase::GameOver {
        return;
    }

    if let Some(hit_at) = state.hit_at_ms {
        if state.clock_ms - hit_at >= u64::from(HIT_INDICATOR_MS) {
            state.hit_at_ms = None;
        }
    }
}

fn step_alien(state: &mut GameState, config: &GameConfig, dt_ms: u32) {
    let in_flight = !state.fireballs.is_empty();
    match state.alien.advance(dt_ms, in_flight, &mut state.rng) {
        AlienSignal::Idle => {}
        AlienSignal::Fire(angles) => {
            award_volley_score(state, in_flight);
            launch_volley(state, config, &angles);
        }
        signal => log::debug!("tick {}: alien {:?}", state.time_ticks, signal),
    }
}

/// Surviving a full aim phase earns every alive player a point
fn award_volley_score(state: &mut GameState, in_flight: bool) {
    if state.cheat_mode || in_flight {
        return;
    }

    for player in state.players.iter_mut().filter(|p| p.alive) {
        player.score += 1;
    }
    let scores = state.players.iter().map(|p| p.score).collect();
    state.events.push(GameEvent::ScoreAwarded { scores });

    let best = state.best_score();
    if best > state.high_score {
        state.high_score = best;
        state.events.push(GameEvent::HighScoreBeaten { score: best });
    }
}

fn launch_volley(state: &mut GameState, config: &GameConfig, angles: &[f32]) {
    let origin = state.alien.pos;
    let radius = config.fireball.size / 2.0;
    state.fireballs.extend(
        angles
            .iter()
            .map(|&angle| Fireball::new(origin, angle, config.fireball.speed, radius)),
    );
    state.events.push(GameEvent::VolleyFired {
        angles: angles.to_vec(),
    });
}

/// First lethal hit ends the run; in cheat mode hits only raise the indicator
fn resolve_collisions(state: &mut GameState) {
    for i in 0..state.players.len() {
        let player = &state.players[i];
        if !player.alive || first_hit(player, &state.fireballs, &state.playfield).is_none() {
            continue;
        }
        let player_id = player.id;

        if state.cheat_mode {
            state.hit_at_ms = Some(state.clock_ms);
            state.events.push(GameEvent::PlayerHit { player_id });
            continue;
        }

        state.players[i].alive = false;
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::PlayerKilled { player_id });
        state.events.push(GameEvent::GameOver {
            final_score: state.best_score(),
        });
        return;
    }
}
