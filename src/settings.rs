//! Game settings and preferences
//!
//! Persisted separately from game saves.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KeyValueStore};
use crate::sim::Rules;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Board ===
    /// Cell edge in CSS pixels (board size follows the viewport)
    pub cell_size: f32,
    /// Wrap around edges instead of dying at walls
    pub wraparound: bool,
    /// Draw faint grid lines
    pub show_grid: bool,

    // === Audio ===
    pub sound: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,

    // === Player services ===
    /// Sign in to achievements/leaderboards at startup
    pub game_services: bool,
    /// Name shown on the leaderboard
    pub player_alias: String,

    // === Accessibility ===
    /// Reduced motion (no head bob, no flashes)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cell_size: 20.0,
            wraparound: true,
            show_grid: false,

            sound: true,
            master_volume: 0.8,

            game_services: true,
            player_alias: "player".to_string(),

            reduced_motion: false,
        }
    }
}

impl Settings {
    const STORAGE_KEY: &'static str = "slyme_settings";

    /// Smallest cell we allow, keeps touch targets usable
    pub const MIN_CELL_SIZE: f32 = 8.0;

    /// Rules for a new run under these settings
    pub fn rules(&self) -> Rules {
        Rules {
            wraparound: self.wraparound,
            ..Rules::default()
        }
    }

    /// Cell size clamped to a usable range
    pub fn effective_cell_size(&self) -> f32 {
        if self.cell_size.is_finite() {
            self.cell_size.clamp(Self::MIN_CELL_SIZE, 128.0)
        } else {
            Self::default().cell_size
        }
    }

    /// Effective volume (0 when sound is off)
    pub fn effective_volume(&self) -> f32 {
        if self.sound {
            self.master_volume.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Load settings; anything missing or unreadable falls back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match persistence::load_json::<Settings>(store, Self::STORAGE_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Settings unreadable ({}), using defaults", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match persistence::save_json(store, Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }
}
