//! Tunable sizes and speeds
//!
//! Persisted separately from gameplay state under `persistence::CONFIG_KEY`.
//! Every field has a named default, so a partially stored object merges
//! over the defaults field by field.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::persistence::{CONFIG_KEY, KeyValueStore, StoreError};

pub const DEFAULT_ALIEN_SIZE: f32 = 180.0;
pub const DEFAULT_ALIEN_ROTATION_SPEED: f32 = 0.01;
pub const DEFAULT_HERO_SIZE: f32 = 88.0;
pub const DEFAULT_HERO_SPEED: f32 = 0.03;
pub const DEFAULT_FIREBALL_SIZE: f32 = 16.0;
pub const DEFAULT_FIREBALL_SPEED: f32 = 3.0;

/// Alien tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlienConfig {
    /// Diameter
    pub size: f32,
    /// Radians per tick while rotating
    pub rotation_speed: f32,
}

impl Default for AlienConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_ALIEN_SIZE,
            rotation_speed: DEFAULT_ALIEN_ROTATION_SPEED,
        }
    }
}

/// Hero (player) tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroConfig {
    /// Sprite diameter (rendering only)
    pub size: f32,
    /// Radians per tick along the orbit
    pub speed: f32,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_HERO_SIZE,
            speed: DEFAULT_HERO_SPEED,
        }
    }
}

/// Fireball tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FireballConfig {
    /// Diameter
    pub size: f32,
    /// Units per tick
    pub speed: f32,
}

impl Default for FireballConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_FIREBALL_SIZE,
            speed: DEFAULT_FIREBALL_SPEED,
        }
    }
}

/// Game configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub alien: AlienConfig,
    pub hero: HeroConfig,
    pub fireball: FireballConfig,
}

/// A partial settings update; `None` leaves the current value alone
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsPatch {
    pub alien_size: Option<f32>,
    pub alien_rotation_speed: Option<f32>,
    pub hero_size: Option<f32>,
    pub hero_speed: Option<f32>,
    pub fireball_size: Option<f32>,
    pub fireball_speed: Option<f32>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl GameConfig {
    /// Apply a patch. Fields present in the patch win; absent fields keep
    /// their current value.
    pub fn merge(&mut self, patch: &SettingsPatch) {
        if let Some(v) = patch.alien_size {
            self.alien.size = v;
        }
        if let Some(v) = patch.alien_rotation_speed {
            self.alien.rotation_speed = v;
        }
        if let Some(v) = patch.hero_size {
            self.hero.size = v;
        }
        if let Some(v) = patch.hero_speed {
            self.hero.speed = v;
        }
        if let Some(v) = patch.fireball_size {
            self.fireball.size = v;
        }
        if let Some(v) = patch.fireball_speed {
            self.fireball.speed = v;
        }
    }

    /// Names of values that are zero or negative. They are used as-is;
    /// this only exists so callers can warn about them.
    pub fn suspicious_fields(&self) -> Vec<&'static str> {
        let checks = [
            ("alien.size", self.alien.size),
            ("hero.size", self.hero.size),
            ("hero.speed", self.hero.speed),
            ("fireball.size", self.fireball.size),
            ("fireball.speed", self.fireball.speed),
        ];
        checks
            .into_iter()
            .filter(|(_, v)| v.is_nan() || *v <= 0.0)
            .map(|(name, _)| name)
            .collect()
    }

    /// Load from the store, falling back to defaults on any problem
    pub fn load(store: &impl KeyValueStore) -> Self {
        let json = match store.get(CONFIG_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => {
                log::info!("No saved config, using defaults");
                return Self::default();
            }
            Err(e) => {
                log::warn!("Could not read config, using defaults: {}", e);
                return Self::default();
            }
        };

        let root = match serde_json::from_str::<Value>(&json) {
            Ok(Value::Object(root)) => root,
            Ok(other) => {
                log::warn!("Saved config is not an object ({}), using defaults", other);
                return Self::default();
            }
            Err(e) => {
                log::warn!("Saved config malformed, using defaults: {}", e);
                return Self::default();
            }
        };

        let config = Self {
            alien: load_section(&root, "alien"),
            hero: load_section(&root, "hero"),
            fireball: load_section(&root, "fireball"),
        };
        log::info!("Loaded config");
        config.warn_if_suspicious();
        config
    }

    /// Save to the store (best-effort)
    pub fn save(&self, store: &mut impl KeyValueStore) {
        let result = serde_json::to_string(self)
            .map_err(StoreError::from)
            .and_then(|json| store.set(CONFIG_KEY, &json));
        match result {
            Ok(()) => log::debug!("Config saved"),
            Err(e) => log::warn!("Could not save config: {}", e),
        }
    }

    pub(crate) fn warn_if_suspicious(&self) {
        let fields = self.suspicious_fields();
        if !fields.is_empty() {
            log::warn!("Non-positive config values accepted as-is: {}", fields.join(", "));
        }
    }
}

/// Overlay the saved fields of one section onto its defaults. A field
/// that does not deserialize keeps its default; so does a section that
/// is missing or not an object.
fn load_section<T>(root: &Map<String, Value>, name: &str) -> T
where
    T: Default + Serialize + DeserializeOwned,
{
    let saved = match root.get(name) {
        None => return T::default(),
        Some(Value::Object(saved)) => saved,
        Some(other) => {
            log::warn!("Saved config section {:?} is {}, using defaults", name, other);
            return T::default();
        }
    };
    let mut merged = match serde_json::to_value(T::default()) {
        Ok(Value::Object(defaults)) => defaults,
        _ => return T::default(),
    };

    for (key, value) in saved {
        let mut candidate = merged.clone();
        candidate.insert(key.clone(), value.clone());
        match serde_json::from_value::<T>(Value::Object(candidate.clone())) {
            Ok(_) => merged = candidate,
            Err(e) => log::warn!("Ignoring saved {}.{} ({}): {}", name, key, value, e),
        }
    }

    serde_json::from_value(Value::Object(merged)).unwrap_or_default()
}
