//! Alien Orbit entry point
//!
//! The browser build is driven from JavaScript through `platform::web`.
//! Natively there is no renderer: this runs a headless session with a
//! simple autopilot against a file-backed store and reports the result.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::time::{SystemTime, UNIX_EPOCH};

    use alien_orbit::consts::{PLAYER_HIT_RADIUS, TICK_MS};
    use alien_orbit::persistence::FileStore;
    use alien_orbit::sim::{Direction, PlayerCount};
    use alien_orbit::snapshot::{PlayerView, Snapshot};
    use alien_orbit::{Playfield, Session, SessionOptions, angular_distance};

    /// Give up after this much simulated time (5 minutes)
    const MAX_TICKS: u64 = 5 * 60 * 1000 / TICK_MS as u64;
    /// How far ahead the autopilot looks for incoming fireballs
    const LOOKAHEAD_TICKS: f32 = 45.0;
    /// Extra clearance the autopilot keeps beyond the hit radii
    const CLEARANCE: f32 = 12.0;

    pub fn run() {
        env_logger::init();

        let mut args = std::env::args().skip(1);
        let store_path = args.next().unwrap_or_else(|| "alien-orbit.json".to_string());
        let players = match args.next().as_deref() {
            Some("2") => PlayerCount::Two,
            _ => PlayerCount::One,
        };
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        log::info!("Alien Orbit (native, headless) starting...");
        let options = SessionOptions {
            seed,
            players,
            playfield: Playfield::default(),
        };
        let mut session = Session::new(FileStore::new(&store_path), options);

        let mut ticks = 0;
        while !session.is_over() && ticks < MAX_TICKS {
            let snapshot = session.snapshot();
            for player in snapshot.players.iter().filter(|p| p.alive) {
                if in_danger(&snapshot, player) {
                    // Top half steers player 2, bottom half player 1
                    let y = if player.id == 2 {
                        snapshot.height * 0.25
                    } else {
                        snapshot.height * 0.75
                    };
                    session.handle_input(y);
                }
            }
            session.tick();
            ticks += 1;
        }

        let seconds = ticks as f32 * TICK_MS as f32 / 1000.0;
        if session.is_over() {
            println!("Game over after {:.1}s", seconds);
        } else {
            println!("Autopilot survived {:.1}s, stopping", seconds);
        }
        println!("Final score: {}", session.final_score());
        println!("High score:  {} (stored in {})", session.high_score(), store_path);
    }

    /// Closest approach (in orbit units) between where soon-arriving
    /// fireballs cross the orbit and where the player will be at that moment
    fn closest_approach(snapshot: &Snapshot, player: &PlayerView, direction: Direction) -> f32 {
        let mut closest = f32::MAX;
        for fireball in &snapshot.fireballs {
            let dist = fireball.pos.distance(snapshot.center);
            if fireball.speed <= 0.0 || dist > snapshot.orbit_radius {
                continue;
            }
            let eta = (snapshot.orbit_radius - dist) / fireball.speed;
            if eta > LOOKAHEAD_TICKS {
                continue;
            }
            let future = player.angle + direction.sign() * player.angular_speed * eta;
            let gap = angular_distance(future, fireball.angle) * snapshot.orbit_radius;
            closest = closest.min(gap);
        }
        closest
    }

    fn in_danger(snapshot: &Snapshot, player: &PlayerView) -> bool {
        let reach = snapshot
            .fireballs
            .iter()
            .map(|f| f.radius)
            .fold(0.0, f32::max)
            + PLAYER_HIT_RADIUS
            + CLEARANCE;
        let ahead = closest_approach(snapshot, player, player.direction);
        if ahead > reach {
            return false;
        }
        // Only turn around if that is actually safer
        closest_approach(snapshot, player, player.direction.flipped()) > ahead
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use alien_orbit::persistence::MemoryStore;
        use alien_orbit::sim::Fireball;

        #[test]
        fn test_arrival_uses_launch_speed() {
            let mut session = Session::new(MemoryStore::new(), SessionOptions::default());
            let center = session.state().playfield.center();
            let state = session.state_mut();
            state.players[0].angle = 0.0;
            state.players[0].angular_speed = 0.0;
            // Launched at double the configured speed: ~42 ticks to the orbit
            state.fireballs.push(Fireball::new(center, 0.0, 6.0, 8.0));

            let snapshot = session.snapshot();
            let player = &snapshot.players[0];
            assert!(closest_approach(&snapshot, player, player.direction) < 1e-3);

            session.state_mut().fireballs[0].speed = 3.0;
            let snapshot = session.snapshot();
            let player = &snapshot.players[0];
            assert_eq!(closest_approach(&snapshot, player, player.direction), f32::MAX);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
