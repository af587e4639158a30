//! Alien behavior state machine
//!
//! The alien cycles forever through four phases:
//! Rotating -> Stopping -> Aiming -> Firing -> Rotating ...
//!
//! Each phase carries only the data it needs. Timers accumulate tick
//! deltas, so a paused session freezes them along with everything else.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::consts::*;
use crate::wrap_angle;

/// Current alien phase and its phase-local data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AlienPhase {
    /// Spinning at base speed for a randomly drawn duration
    Rotating { elapsed_ms: u32, duration_ms: u32 },
    /// Spin decays exponentially until it drops below the stop threshold
    Stopping,
    /// Impact points are telegraphed while the aim window runs
    Aiming {
        elapsed_ms: u32,
        targets: [f32; VOLLEY_SIZE],
    },
    /// Volley in flight; waits for the playfield to clear
    Firing,
}

/// Phase tag without payload (for snapshots and assertions)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlienState {
    Rotating,
    Stopping,
    Aiming,
    Firing,
}

impl AlienPhase {
    pub fn state(&self) -> AlienState {
        match self {
            AlienPhase::Rotating { .. } => AlienState::Rotating,
            AlienPhase::Stopping => AlienState::Stopping,
            AlienPhase::Aiming { .. } => AlienState::Aiming,
            AlienPhase::Firing => AlienState::Firing,
        }
    }

    /// Telegraphed impact angles (empty outside Aiming)
    pub fn target_angles(&self) -> &[f32] {
        match self {
            AlienPhase::Aiming { targets, .. } => targets,
            _ => &[],
        }
    }
}

/// What the state machine asks the simulation to do after a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlienSignal {
    /// Nothing beyond the alien's own motion
    Idle,
    StartedStopping,
    StartedAiming,
    /// Aim window expired: launch one fireball per angle
    Fire([f32; VOLLEY_SIZE]),
    ResumedRotating,
}

/// The alien at the center of the orbit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alien {
    /// Fixed at the orbit center
    pub pos: Vec2,
    /// Render/body radius (size / 2)
    pub radius: f32,
    /// Facing angle, radians in [0, 2π)
    pub rotation: f32,
    /// Current spin in radians per tick
    pub rotation_speed: f32,
    /// Spin restored on every return to Rotating
    pub base_rotation_speed: f32,
    pub phase: AlienPhase,
}

impl Alien {
    /// Create an alien already in its first Rotating phase
    pub fn new<R: Rng + ?Sized>(pos: Vec2, radius: f32, base_rotation_speed: f32, rng: &mut R) -> Self {
        Self {
            pos,
            radius,
            rotation: 0.0,
            rotation_speed: base_rotation_speed,
            base_rotation_speed,
            phase: Self::rotating_phase(rng),
        }
    }

    fn rotating_phase<R: Rng + ?Sized>(rng: &mut R) -> AlienPhase {
        AlienPhase::Rotating {
            elapsed_ms: 0,
            duration_ms: rng.random_range(ROTATION_PHASE_MIN_MS..=ROTATION_PHASE_MAX_MS),
        }
    }

    pub fn state(&self) -> AlienState {
        self.phase.state()
    }

    /// Whether impact points should be drawn
    pub fn show_telegraph(&self) -> bool {
        matches!(self.phase, AlienPhase::Aiming { .. })
    }

    /// Change the base spin. Only a Rotating alien picks it up immediately;
    /// a Stopping decay runs out undisturbed.
    pub fn set_base_rotation_speed(&mut self, speed: f32) {
        self.base_rotation_speed = speed;
        if let AlienPhase::Rotating { .. } = self.phase {
            self.rotation_speed = speed;
        }
    }

    fn spin(&mut self) {
        self.rotation = wrap_angle(self.rotation + self.rotation_speed);
    }

    /// Advance the state machine by one tick of `dt_ms`.
    ///
    /// `volley_in_flight` is whether any fireball is still on the playfield;
    /// Firing only ends once it is false.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        dt_ms: u32,
        volley_in_flight: bool,
        rng: &mut R,
    ) -> AlienSignal {
        match self.phase {
            AlienPhase::Rotating {
                ref mut elapsed_ms,
                duration_ms,
            } => {
                *elapsed_ms = elapsed_ms.saturating_add(dt_ms);
                let expired = *elapsed_ms >= duration_ms;
                self.spin();
                if expired {
                    self.phase = AlienPhase::Stopping;
                    return AlienSignal::StartedStopping;
                }
                AlienSignal::Idle
            }

            AlienPhase::Stopping => {
                self.rotation_speed *= STOPPING_DECAY;
                self.spin();
                if self.rotation_speed.abs() < STOP_THRESHOLD {
                    self.rotation_speed = 0.0;
                    let r = self.rotation;
                    let step = TAU / VOLLEY_SIZE as f32;
                    let targets: [f32; VOLLEY_SIZE] =
                        std::array::from_fn(|i| wrap_angle(r + i as f32 * step));
                    self.phase = AlienPhase::Aiming {
                        elapsed_ms: 0,
                        targets,
                    };
                    return AlienSignal::StartedAiming;
                }
                AlienSignal::Idle
            }

            AlienPhase::Aiming {
                ref mut elapsed_ms,
                targets,
            } => {
                *elapsed_ms = elapsed_ms.saturating_add(dt_ms);
                if *elapsed_ms >= AIM_DURATION_MS {
                    self.phase = AlienPhase::Firing;
                    return AlienSignal::Fire(targets);
                }
                AlienSignal::Idle
            }

            AlienPhase::Firing => {
                if volley_in_flight {
                    return AlienSignal::Idle;
                }
                self.rotation_speed = self.base_rotation_speed;
                self.phase = Self::rotating_phase(rng);
                AlienSignal::ResumedRotating
            }
        }
    }
}
