//! slyme - a wraparound snake arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, wraparound, collisions, scoring)
//! - `session`: Host-independent game session (timing, events, saves, services)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Player services (sign-in, leaderboards, achievements)
//! - `persistence`: Key-value save/load
//! - `ui`: Menu, alerts, HUD text

pub mod achievements;
pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod ui;

pub use highscores::HighScores;
pub use session::Session;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Longest frame we simulate; longer gaps (tab switch) are dropped
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Maximum steps per frame to prevent spiral of death
    pub const MAX_STEPS_PER_FRAME: u32 = 4;
    /// Swipes shorter than this (CSS px) count as taps
    pub const SWIPE_MIN_DISTANCE: f32 = 24.0;
}
