//! Input routing
//!
//! Turns raw pointer, touch and key events into player commands. The
//! router never touches game state; the session applies what it returns.

use std::collections::BTreeSet;

use crate::sim::PlayerCount;

/// One point of contact from a touch event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    /// Browser touch identifier, stable for the life of the contact
    pub id: i32,
    /// Vertical screen coordinate
    pub y: f32,
}

impl Touch {
    pub fn new(id: i32, y: f32) -> Self {
        Self { id, y }
    }
}

/// Discrete keyboard commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    TogglePause,
    ToggleCheat,
    /// Flip the sole player (single-player only)
    Flip,
}

impl KeyCommand {
    /// Map a `KeyboardEvent.code` string
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "KeyP" => Some(KeyCommand::TogglePause),
            "KeyC" => Some(KeyCommand::ToggleCheat),
            "Space" | "Enter" => Some(KeyCommand::Flip),
            _ => None,
        }
    }
}

/// Maps screen coordinates to player indices and de-duplicates touches
#[derive(Debug, Clone)]
pub struct InputRouter {
    players: PlayerCount,
    viewport_height: f32,
    active_touches: BTreeSet<i32>,
}

impl InputRouter {
    pub fn new(players: PlayerCount, viewport_height: f32) -> Self {
        Self {
            players,
            viewport_height,
            active_touches: BTreeSet::new(),
        }
    }

    /// Player index controlled by a tap at `y`.
    ///
    /// With two players the top half (at or above the midpoint) belongs to
    /// player 2 and the bottom half to player 1.
    pub fn route(&self, y: f32) -> usize {
        route_for(self.players, self.viewport_height, y)
    }

    /// Register touches, returning player indices for contacts not seen before
    pub fn touch_start(&mut self, touches: &[Touch]) -> Vec<usize> {
        let (players, height) = (self.players, self.viewport_height);
        touches
            .iter()
            .filter(|t| self.active_touches.insert(t.id))
            .map(|t| route_for(players, height, t.y))
            .collect()
    }

    /// Same as `touch_start`: a contact already down never registers twice
    pub fn touch_move(&mut self, touches: &[Touch]) -> Vec<usize> {
        self.touch_start(touches)
    }

    pub fn touch_end(&mut self, ids: &[i32]) {
        for id in ids {
            self.active_touches.remove(id);
        }
    }

    pub fn touch_cancel(&mut self, ids: &[i32]) {
        self.touch_end(ids);
    }

    /// Forget every active contact
    pub fn reset(&mut self) {
        self.active_touches.clear();
    }

    pub fn active_touch_count(&self) -> usize {
        self.active_touches.len()
    }
}

fn route_for(players: PlayerCount, viewport_height: f32, y: f32) -> usize {
    match players {
        PlayerCount::One => 0,
        PlayerCount::Two if y <= viewport_height / 2.0 => 1,
        PlayerCount::Two => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_split() {
        let router = InputRouter::new(PlayerCount::Two, 600.0);
        assert_eq!(router.route(0.0), 1);
        assert_eq!(router.route(300.0), 1);
        assert_eq!(router.route(300.5), 0);
        assert_eq!(router.route(599.0), 0);
    }

    #[test]
    fn test_route_single_player_ignores_split() {
        let router = InputRouter::new(PlayerCount::One, 600.0);
        assert_eq!(router.route(10.0), 0);
        assert_eq!(router.route(590.0), 0);
    }

    #[test]
    fn test_touch_dedup_across_start_and_move() {
        let mut router = InputRouter::new(PlayerCount::Two, 600.0);
        let a = Touch::new(1, 100.0);
        let b = Touch::new(2, 500.0);

        assert_eq!(router.touch_start(&[a]), vec![1]);
        // Browser reports the full touch list again when b lands
        assert_eq!(router.touch_start(&[a, b]), vec![0]);
        assert!(router.touch_move(&[a, b]).is_empty());
        assert_eq!(router.active_touch_count(), 2);

        router.touch_end(&[1]);
        assert_eq!(router.touch_start(&[a]), vec![1]);

        router.touch_cancel(&[1, 2]);
        assert_eq!(router.active_touch_count(), 0);
    }

    #[test]
    fn test_duplicate_ids_in_one_event() {
        let mut router = InputRouter::new(PlayerCount::One, 600.0);
        let t = Touch::new(9, 10.0);
        assert_eq!(router.touch_start(&[t, t]), vec![0]);
    }

    #[test]
    fn test_key_codes() {
        assert_eq!(KeyCommand::from_code("KeyP"), Some(KeyCommand::TogglePause));
        assert_eq!(KeyCommand::from_code("KeyC"), Some(KeyCommand::ToggleCheat));
        assert_eq!(KeyCommand::from_code("Space"), Some(KeyCommand::Flip));
        assert_eq!(KeyCommand::from_code("Enter"), Some(KeyCommand::Flip));
        assert_eq!(KeyCommand::from_code("KeyX"), None);
    }
}
