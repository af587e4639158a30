//! Collision tests between players and fireballs
//!
//! Everything here is a circle: players are a hit circle at their orbit
//! position, fireballs a hit circle at their center.

use glam::Vec2;

use super::state::{Fireball, Player};
use crate::Playfield;
use crate::consts::FIREBALL_EXIT_MARGIN;

/// Two circles overlap when their centers are closer than the sum of radii
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance(b) < a_radius + b_radius
}

/// Index of the first fireball touching the player, if any
pub fn first_hit(player: &Player, fireballs: &[Fireball], field: &Playfield) -> Option<usize> {
    let pos = player.position(field);
    fireballs
        .iter()
        .position(|f| circles_overlap(pos, player.hit_radius, f.pos, f.hit_radius))
}

/// Whether the fireball has fully left the playfield
#[inline]
pub fn fireball_gone(fireball: &Fireball, field: &Playfield) -> bool {
    field.has_left(fireball.pos, fireball.hit_radius, FIREBALL_EXIT_MARGIN)
}
