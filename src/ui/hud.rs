//! HUD, game-over panel and share text

use crate::sim::{GameOverReason, GameState};

/// Live HUD strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudText {
    pub score: String,
    pub level: String,
    pub length: String,
}

impl HudText {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score: format!("Score: {}", state.score),
            level: format!("Level {}", state.level),
            length: format!("Length {}", state.len()),
        }
    }
}

/// Shown when a run ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOverPanel {
    pub heading: String,
    pub final_score: String,
    /// Place in the local table, if the run made it
    pub place: Option<usize>,
    /// Set when the run made the local table
    pub rank: Option<String>,
    pub prompt: String,
}

impl GameOverPanel {
    pub fn new(reason: GameOverReason, score: u64, rank: Option<usize>) -> Self {
        let heading = match reason {
            GameOverReason::BoardFull => "Board Cleared",
            GameOverReason::SelfCollision | GameOverReason::WallCollision => "Game Over",
        };
        Self {
            heading: heading.to_string(),
            final_score: format!("Final Score: {}", score),
            place: rank,
            rank: rank.map(|r| {
                if r == 1 {
                    "New high score!".to_string()
                } else {
                    format!("#{} on your high scores", r)
                }
            }),
            prompt: "Tap to Restart".to_string(),
        }
    }

    /// The run tops the local table
    pub fn is_new_best(&self) -> bool {
        self.place == Some(1)
    }
}

/// Text for the share sheet
pub fn share_message(score: u64, level: u32) -> String {
    format!(
        "I just scored {} (level {}) in slyme. eat or be ate, snake or be snaked.",
        score, level
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GridSize, Rules};

    #[test]
    fn test_hud_text() {
        let mut state = GameState::new(1, GridSize::new(10, 10), Rules::default());
        state.score = 30;
        let hud = HudText::from_state(&state);
        assert_eq!(hud.score, "Score: 30");
        assert_eq!(hud.level, "Level 1");
        assert_eq!(hud.length, "Length 1");
    }

    #[test]
    fn test_game_over_panel() {
        let panel = GameOverPanel::new(GameOverReason::SelfCollision, 120, Some(1));
        assert_eq!(panel.heading, "Game Over");
        assert_eq!(panel.final_score, "Final Score: 120");
        assert_eq!(panel.rank.as_deref(), Some("New high score!"));
        assert!(panel.is_new_best());
        assert_eq!(panel.prompt, "Tap to Restart");

        let panel = GameOverPanel::new(GameOverReason::BoardFull, 5000, Some(3));
        assert_eq!(panel.heading, "Board Cleared");
        assert_eq!(panel.rank.as_deref(), Some("#3 on your high scores"));
        assert!(!panel.is_new_best());

        let panel = GameOverPanel::new(GameOverReason::WallCollision, 0, None);
        assert!(panel.rank.is_none());
    }

    #[test]
    fn test_share_message_mentions_score() {
        let msg = share_message(250, 4);
        assert!(msg.contains("250"));
        assert!(msg.contains("level 4"));
    }
}
