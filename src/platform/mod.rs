//! Platform abstraction layer
//!
//! Player services (sign-in, leaderboards, achievements) sit behind the
//! `GameServices` trait so the game never talks to a vendor SDK directly.
//! `LocalGameServices` keeps everything on-device through the key-value store.

pub mod services;

pub use services::{
    AchievementProgress, AuthState, BEST_SCORE_LEADERBOARD, GameServices, LeaderboardEntry,
    LocalGameServices, ServicesError,
};
