//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (pointer, touch, keyboard)
//! - Storage (LocalStorage on web)
//! - Exposing the session to the page

pub mod input;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::{InputRouter, KeyCommand, Touch};
