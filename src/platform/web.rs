//! Browser glue (wasm32 only)
//!
//! The page owns the canvas, the animation frame loop and the DOM; it calls
//! into `WebSession` once per frame and draws from the JSON snapshot.

use wasm_bindgen::prelude::*;
use web_sys::Storage;

use super::input::Touch;
use crate::Playfield;
use crate::config::SettingsPatch;
use crate::persistence::{KeyValueStore, StoreError};
use crate::session::{Session, SessionOptions};
use crate::sim::PlayerCount;

/// `window.localStorage` as a key-value store
pub struct LocalStorageStore {
    storage: Option<Storage>,
}

impl LocalStorageStore {
    pub fn open() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable; settings will not persist");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage, StoreError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable("localStorage missing".to_string()))
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }
}

fn touches(ids: &[i32], ys: &[f32]) -> Vec<Touch> {
    ids.iter()
        .zip(ys)
        .map(|(&id, &y)| Touch::new(id, y))
        .collect()
}

/// Session handle exported to JavaScript
#[wasm_bindgen]
pub struct WebSession {
    inner: Session<LocalStorageStore>,
}

#[wasm_bindgen]
impl WebSession {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, two_players: bool) -> WebSession {
        let seed = js_sys::Date::now() as u64;
        let players = if two_players {
            PlayerCount::Two
        } else {
            PlayerCount::One
        };
        let options = SessionOptions {
            seed,
            players,
            playfield: Playfield::new(width, height),
        };
        WebSession {
            inner: Session::new(LocalStorageStore::open(), options),
        }
    }

    /// One fixed simulation step; call once per animation frame
    pub fn tick(&mut self) {
        self.inner.tick();
    }

    pub fn pointer_down(&mut self, y: f32) {
        self.inner.handle_input(y);
    }

    pub fn touch_start(&mut self, ids: Vec<i32>, ys: Vec<f32>) {
        self.inner.touch_start(&touches(&ids, &ys));
    }

    pub fn touch_move(&mut self, ids: Vec<i32>, ys: Vec<f32>) {
        self.inner.touch_move(&touches(&ids, &ys));
    }

    pub fn touch_end(&mut self, ids: Vec<i32>) {
        self.inner.touch_end(&ids);
    }

    pub fn touch_cancel(&mut self, ids: Vec<i32>) {
        self.inner.touch_cancel(&ids);
    }

    pub fn key_down(&mut self, code: &str) -> bool {
        self.inner.handle_key(code)
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.inner.toggle_pause()
    }

    pub fn toggle_cheat(&mut self) -> bool {
        self.inner.toggle_cheat()
    }

    /// Apply a JSON settings patch (`{"heroSpeed":0.04}` etc.)
    pub fn apply_settings(&mut self, json: &str) -> bool {
        match serde_json::from_str::<SettingsPatch>(json) {
            Ok(patch) => {
                self.inner.apply_settings(&patch);
                true
            }
            Err(e) => {
                log::warn!("Ignoring malformed settings patch: {}", e);
                false
            }
        }
    }

    /// Current state for the renderer, as JSON
    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.inner.snapshot()).unwrap_or_default()
    }

    /// Current tunables as JSON (`{"alien":{"size":180,...},...}`), for
    /// seeding the settings panel
    pub fn config_json(&self) -> String {
        serde_json::to_string(self.inner.config()).unwrap_or_default()
    }

    pub fn is_over(&self) -> bool {
        self.inner.is_over()
    }

    pub fn final_score(&self) -> f64 {
        self.inner.final_score() as f64
    }

    pub fn high_score(&self) -> f64 {
        self.inner.high_score() as f64
    }

    pub fn restart(&mut self) {
        self.inner.restart(js_sys::Date::now() as u64);
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
    log::info!("Alien Orbit core loaded");
}
