//! Game state and core simulation types
//!
//! Everything needed to save and resume a run lives here.

use std::collections::{HashSet, VecDeque};

use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::grid::{Direction, GridPos, GridSize};
use super::rules::{Rules, RulesError};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Snake is moving
    Playing,
    /// Game is paused
    Paused,
    /// Run ended
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// Head ran into the body
    SelfCollision,
    /// Head left the board with wraparound off
    WallCollision,
    /// No free cell left for an apple
    BoardFull,
}

/// A snapshot that cannot be played
#[derive(Debug, Error, PartialEq)]
pub enum StateError {
    #[error("board {width}x{height} is not playable")]
    BadGrid { width: u32, height: u32 },
    #[error("snake has no segments")]
    EmptySnake,
    #[error("cell ({}, {}) is off the board", .0.col, .0.row)]
    OffBoard(GridPos),
    #[error("level must be at least 1")]
    ZeroLevel,
    #[error(transparent)]
    Rules(#[from] RulesError),
}

/// Things that happened during a tick, drained by the host for sound/HUD/services
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    AteFood {
        pos: GridPos,
        score: u64,
    },
    LevelUp {
        level: u32,
    },
    GameOver {
        reason: GameOverReason,
        score: u64,
        length: usize,
        level: u32,
    },
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub rules: Rules,
    pub grid: GridSize,
    /// Body cells, head first
    pub snake: VecDeque<GridPos>,
    /// Direction moved on the last step
    pub heading: Direction,
    /// Turn applied on the next step
    pub queued: Option<Direction>,
    /// Apple position (None only when the board is full)
    pub food: Option<GridPos>,
    pub score: u64,
    pub foods_eaten: u32,
    /// Current level (1-based)
    pub level: u32,
    /// Steps taken this run
    pub time_ticks: u64,
    pub phase: GamePhase,
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new run with the given seed
    pub fn new(seed: u64, grid: GridSize, rules: Rules) -> Self {
        let center = grid.center();
        let length = rules.initial_length.clamp(1, grid.width) as i32;
        let snake = (0..length)
            .map(|i| grid.wrap(GridPos::new(center.col - i, center.row)))
            .collect();

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            rules,
            grid,
            snake,
            heading: Direction::Right,
            queued: None,
            food: None,
            score: 0,
            foods_eaten: 0,
            level: 1,
            time_ticks: 0,
            phase: GamePhase::Playing,
            events: Vec::new(),
        };
        state.food = state.spawn_food();
        state
    }

    /// Start over with the same board and rules
    pub fn restart(&mut self) {
        let seed = self.next_seed();
        *self = Self::new(seed, self.grid, self.rules.clone());
    }

    /// Seed for the run after this one
    pub fn next_seed(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Check a deserialized snapshot before playing it
    pub fn validate(&self) -> Result<(), StateError> {
        let GridSize { width, height } = self.grid;
        let max = i32::MAX as u32;
        if width == 0 || height == 0 || width > max || height > max {
            return Err(StateError::BadGrid { width, height });
        }
        self.rules.validate()?;
        if self.snake.is_empty() {
            return Err(StateError::EmptySnake);
        }
        if let Some(&cell) = self
            .snake
            .iter()
            .chain(self.food.iter())
            .find(|&&cell| !self.grid.contains(cell))
        {
            return Err(StateError::OffBoard(cell));
        }
        if self.level == 0 {
            return Err(StateError::ZeroLevel);
        }
        Ok(())
    }

    pub fn head(&self) -> GridPos {
        self.snake[0]
    }

    pub fn len(&self) -> usize {
        self.snake.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snake.is_empty()
    }

    pub fn occupies(&self, pos: GridPos) -> bool {
        self.snake.contains(&pos)
    }

    /// Queue a turn for the next step. Reversing onto the neck is refused.
    pub fn queue_turn(&mut self, dir: Direction) -> bool {
        if dir.is_opposite(self.heading) {
            return false;
        }
        self.queued = Some(dir);
        true
    }

    /// Seconds until the next step at the current level
    pub fn step_interval(&self) -> f32 {
        self.rules.step_interval(self.level)
    }

    /// Pick a random free cell for the next apple
    pub fn spawn_food(&mut self) -> Option<GridPos> {
        let body: HashSet<GridPos> = self.snake.iter().copied().collect();
        let free: Vec<GridPos> = self.grid.cells().filter(|c| !body.contains(c)).collect();
        if free.is_empty() {
            return None;
        }
        let idx = self.rng.random_range(0..free.len());
        Some(free[idx])
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_centers_snake() {
        let state = GameState::new(7, GridSize::new(20, 40), Rules::default());
        assert_eq!(state.len(), 1);
        assert_eq!(state.head(), GridPos::new(10, 20));
        assert_eq!(state.heading, Direction::Right);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level, 1);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_longer_start_trails_left() {
        let rules = Rules {
            initial_length: 3,
            ..Default::default()
        };
        let state = GameState::new(7, GridSize::new(10, 10), rules);
        let body: Vec<_> = state.snake.iter().copied().collect();
        assert_eq!(
            body,
            vec![GridPos::new(5, 5), GridPos::new(4, 5), GridPos::new(3, 5)]
        );
    }

    #[test]
    fn test_food_never_spawns_on_snake() {
        let rules = Rules {
            initial_length: 3,
            ..Default::default()
        };
        // 4 cells, 3 taken: the apple has exactly one place to go
        let state = GameState::new(1, GridSize::new(4, 1), rules);
        assert_eq!(state.food, Some(GridPos::new(3, 0)));

        for seed in 0..50 {
            let mut state = GameState::new(seed, GridSize::new(6, 6), Rules::default());
            for _ in 0..20 {
                let food = state.spawn_food().unwrap();
                assert!(!state.occupies(food));
                assert!(state.grid.contains(food));
            }
        }
    }

    #[test]
    fn test_full_board_has_no_food() {
        let rules = Rules {
            initial_length: 4,
            ..Default::default()
        };
        let state = GameState::new(1, GridSize::new(4, 1), rules);
        assert_eq!(state.food, None);
    }

    #[test]
    fn test_same_seed_same_food() {
        let a = GameState::new(42, GridSize::new(30, 30), Rules::default());
        let b = GameState::new(42, GridSize::new(30, 30), Rules::default());
        assert_eq!(a.food, b.food);
    }

    #[test]
    fn test_snapshot_roundtrip_keeps_rng() {
        let mut state = GameState::new(99, GridSize::new(16, 16), Rules::default());
        state.score = 30;
        let json = serde_json::to_string(&state).unwrap();
        let mut restored: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.score, 30);
        assert_eq!(restored.snake, state.snake);
        // RNG continues from the same point
        assert_eq!(restored.spawn_food(), state.spawn_food());
    }

    #[test]
    fn test_validate_accepts_fresh_state() {
        let state = GameState::new(3, GridSize::new(10, 10), Rules::default());
        assert_eq!(state.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_unplayable_snapshots() {
        let fresh = || GameState::new(3, GridSize::new(10, 10), Rules::default());

        let mut state = fresh();
        state.grid.width = 0;
        assert_eq!(
            state.validate(),
            Err(StateError::BadGrid {
                width: 0,
                height: 10
            })
        );

        let mut state = fresh();
        state.grid.height = u32::MAX;
        assert!(matches!(state.validate(), Err(StateError::BadGrid { .. })));

        let mut state = fresh();
        state.snake.push_back(GridPos::new(10, 3));
        assert_eq!(
            state.validate(),
            Err(StateError::OffBoard(GridPos::new(10, 3)))
        );

        let mut state = fresh();
        state.food = Some(GridPos::new(-1, 0));
        assert_eq!(
            state.validate(),
            Err(StateError::OffBoard(GridPos::new(-1, 0)))
        );

        let mut state = fresh();
        state.snake.clear();
        assert_eq!(state.validate(), Err(StateError::EmptySnake));

        let mut state = fresh();
        state.level = 0;
        assert_eq!(state.validate(), Err(StateError::ZeroLevel));

        let mut state = fresh();
        state.rules.foods_per_level = 0;
        assert_eq!(
            state.validate(),
            Err(StateError::Rules(RulesError::ZeroFoodsPerLevel))
        );
    }

    #[test]
    fn test_restart_resets_progress() {
        let mut state = GameState::new(5, GridSize::new(12, 12), Rules::default());
        state.score = 90;
        state.level = 3;
        state.phase = GamePhase::GameOver;
        state.restart();
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.grid, GridSize::new(12, 12));
    }
}
