//! High score tracking
//!
//! A single integer persisted under `persistence::HIGH_SCORE_KEY` as a
//! decimal string.

use crate::persistence::{HIGH_SCORE_KEY, KeyValueStore};

/// Best score seen across runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    pub fn new(best: u64) -> Self {
        Self { best }
    }

    /// Raise the best score if `score` beats it. Returns true when it did.
    pub fn record(&mut self, score: u64) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }

    /// Load from the store; missing or unreadable entries count as 0
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(HIGH_SCORE_KEY) {
            Ok(Some(raw)) => match parse_leading_digits(&raw) {
                Some(best) => {
                    log::info!("Loaded high score {}", best);
                    Self::new(best)
                }
                None => {
                    log::warn!("Saved high score {:?} malformed, starting at 0", raw);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read high score: {}", e);
                Self::default()
            }
        }
    }

    /// Save to the store (best-effort)
    pub fn save(&self, store: &mut impl KeyValueStore) {
        match store.set(HIGH_SCORE_KEY, &self.best.to_string()) {
            Ok(()) => log::info!("High score saved ({})", self.best),
            Err(e) => log::warn!("Could not save high score: {}", e),
        }
    }
}

/// Read the leading decimal digits (after whitespace and an optional `+`),
/// ignoring whatever follows: `"12.0"` and `"12abc"` both give 12
fn parse_leading_digits(raw: &str) -> Option<u64> {
    let s = raw.trim_start();
    let s = s.strip_prefix('+').unwrap_or(s);
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse().ok()
}
