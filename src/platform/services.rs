//! Player services: sign-in, leaderboards, achievements

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persistence::{self, KeyValueStore, StoreError};

/// Leaderboard for the best single-run score
pub const BEST_SCORE_LEADERBOARD: &str = "best_score";

/// Keep this many entries per leaderboard
const MAX_LEADERBOARD_ENTRIES: usize = 50;

#[derive(Debug, Error)]
pub enum ServicesError {
    #[error("player is not signed in")]
    NotAuthenticated,
    #[error("unknown achievement: {0}")]
    UnknownAchievement(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Sign-in status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated { alias: String },
    /// Turned off in settings
    Disabled,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub alias: String,
    pub score: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementProgress {
    pub id: String,
    /// 0-100
    pub percent: f64,
}

impl AchievementProgress {
    pub fn is_complete(&self) -> bool {
        self.percent >= 100.0
    }
}

/// Achievement and leaderboard backend
pub trait GameServices {
    /// Try to sign the local player in
    fn authenticate(&mut self) -> AuthState;

    fn auth_state(&self) -> AuthState;

    /// Report a score. Only the player's best per leaderboard is kept.
    fn submit_score(&mut self, leaderboard: &str, score: u64) -> Result<(), ServicesError>;

    /// Report progress; returns true when this report completed the achievement
    fn report_achievement(&mut self, id: &str, percent: f64) -> Result<bool, ServicesError>;

    /// Entries best first
    fn leaderboard(&self, leaderboard: &str) -> Vec<LeaderboardEntry>;

    fn achievements(&self) -> Vec<AchievementProgress>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ServicesData {
    leaderboards: BTreeMap<String, Vec<LeaderboardEntry>>,
    achievements: BTreeMap<String, f64>,
}

/// On-device services backed by the key-value store
pub struct LocalGameServices<S: KeyValueStore> {
    store: S,
    alias: String,
    enabled: bool,
    auth: AuthState,
    data: ServicesData,
}

impl<S: KeyValueStore> LocalGameServices<S> {
    const STORAGE_KEY: &'static str = "slyme_services";

    pub fn new(store: S, alias: &str, enabled: bool) -> Self {
        let data = match persistence::load_json::<ServicesData>(&store, Self::STORAGE_KEY) {
            Ok(data) => data.unwrap_or_default(),
            Err(e) => {
                log::warn!("Player services data unreadable ({}), starting fresh", e);
                ServicesData::default()
            }
        };
        Self {
            store,
            alias: alias.trim().to_string(),
            enabled,
            auth: if enabled {
                AuthState::Unauthenticated
            } else {
                AuthState::Disabled
            },
            data,
        }
    }

    fn persist(&mut self) -> Result<(), ServicesError> {
        persistence::save_json(&mut self.store, Self::STORAGE_KEY, &self.data)?;
        Ok(())
    }

    fn signed_in_alias(&self) -> Result<String, ServicesError> {
        match &self.auth {
            AuthState::Authenticated { alias } => Ok(alias.clone()),
            _ => Err(ServicesError::NotAuthenticated),
        }
    }
}

impl<S: KeyValueStore> GameServices for LocalGameServices<S> {
    fn authenticate(&mut self) -> AuthState {
        self.auth = if !self.enabled {
            AuthState::Disabled
        } else if self.alias.is_empty() {
            log::info!("Player not authenticated: no alias set");
            AuthState::Unauthenticated
        } else {
            log::info!("Player authenticated as {}", self.alias);
            AuthState::Authenticated {
                alias: self.alias.clone(),
            }
        };
        self.auth.clone()
    }

    fn auth_state(&self) -> AuthState {
        self.auth.clone()
    }

    fn submit_score(&mut self, leaderboard: &str, score: u64) -> Result<(), ServicesError> {
        let alias = self.signed_in_alias()?;
        let entries = self
            .data
            .leaderboards
            .entry(leaderboard.to_string())
            .or_default();

        match entries.iter_mut().find(|e| e.alias == alias) {
            Some(existing) if existing.score >= score => return Ok(()),
            Some(existing) => existing.score = score,
            None => entries.push(LeaderboardEntry { alias, score }),
        }
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_LEADERBOARD_ENTRIES);

        log::info!("Score {} submitted to {}", score, leaderboard);
        self.persist()
    }

    fn report_achievement(&mut self, id: &str, percent: f64) -> Result<bool, ServicesError> {
        self.signed_in_alias()?;
        if crate::achievements::find(id).is_none() {
            return Err(ServicesError::UnknownAchievement(id.to_string()));
        }

        let percent = if percent.is_finite() {
            percent.clamp(0.0, 100.0)
        } else {
            0.0
        };
        let current = self.data.achievements.get(id).copied().unwrap_or(0.0);
        if percent <= current {
            return Ok(false);
        }
        self.data.achievements.insert(id.to_string(), percent);
        self.persist()?;

        let unlocked = percent >= 100.0;
        if unlocked {
            log::info!("Achievement unlocked: {}", id);
        }
        Ok(unlocked)
    }

    fn leaderboard(&self, leaderboard: &str) -> Vec<LeaderboardEntry> {
        self.data
            .leaderboards
            .get(leaderboard)
            .cloned()
            .unwrap_or_default()
    }

    fn achievements(&self) -> Vec<AchievementProgress> {
        self.data
            .achievements
            .iter()
            .map(|(id, percent)| AchievementProgress {
                id: id.clone(),
                percent: *percent,
            })
            .collect()
    }
}
