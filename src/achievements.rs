//! Achievement catalog and progress rules

use crate::sim::{GameEvent, GameOverReason, GameState};

/// A catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub const FIRST_BITE: &str = "first_bite";
pub const CENTURY: &str = "century";
pub const LONG_SNAKE: &str = "long_snake";
pub const SPEED_DEMON: &str = "speed_demon";
pub const MARATHON: &str = "marathon";
pub const CLEAN_SWEEP: &str = "clean_sweep";

pub const CATALOG: &[Achievement] = &[
    Achievement {
        id: FIRST_BITE,
        title: "first bite",
        description: "crush your first apple",
    },
    Achievement {
        id: CENTURY,
        title: "century",
        description: "score 100 in one run",
    },
    Achievement {
        id: LONG_SNAKE,
        title: "long boi",
        description: "grow to 20 segments",
    },
    Achievement {
        id: SPEED_DEMON,
        title: "speed demon",
        description: "reach level 5",
    },
    Achievement {
        id: MARATHON,
        title: "marathon",
        description: "survive 500 moves in one run",
    },
    Achievement {
        id: CLEAN_SWEEP,
        title: "clean sweep",
        description: "fill the whole board",
    },
];

pub fn find(id: &str) -> Option<&'static Achievement> {
    CATALOG.iter().find(|a| a.id == id)
}

/// What a finished (or ongoing) run achieved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub score: u64,
    pub foods_eaten: u32,
    pub length: usize,
    pub level: u32,
    pub ticks: u64,
    pub filled_board: bool,
}

impl RunSummary {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score: state.score,
            foods_eaten: state.foods_eaten,
            length: state.len(),
            level: state.level,
            ticks: state.time_ticks,
            filled_board: false,
        }
    }

    /// Summary of a run from its game-over event
    pub fn from_game_over(state: &GameState, event: &GameEvent) -> Self {
        let mut summary = Self::from_state(state);
        if let GameEvent::GameOver { reason, .. } = event {
            summary.filled_board = *reason == GameOverReason::BoardFull;
        }
        summary
    }
}

fn percent(value: u64, target: u64) -> f64 {
    (value as f64 * 100.0 / target as f64).min(100.0)
}

/// Progress (0-100) toward every catalog entry
pub fn evaluate(run: &RunSummary) -> Vec<(&'static str, f64)> {
    CATALOG
        .iter()
        .map(|a| {
            let progress = match a.id {
                FIRST_BITE => percent(run.foods_eaten as u64, 1),
                CENTURY => percent(run.score, 100),
                LONG_SNAKE => percent(run.length as u64, 20),
                SPEED_DEMON => percent(run.level.saturating_sub(1) as u64, 4),
                MARATHON => percent(run.ticks, 500),
                CLEAN_SWEEP => {
                    if run.filled_board {
                        100.0
                    } else {
                        0.0
                    }
                }
                _ => 0.0,
            };
            (a.id, progress)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress_of(run: &RunSummary, id: &str) -> f64 {
        evaluate(run)
            .into_iter()
            .find(|(a, _)| *a == id)
            .map(|(_, p)| p)
            .unwrap()
    }

    #[test]
    fn test_catalog_ids_unique() {
        for (i, a) in CATALOG.iter().enumerate() {
            assert!(CATALOG[i + 1..].iter().all(|b| b.id != a.id));
        }
        assert!(find(CENTURY).is_some());
        assert!(find("nope").is_none());
    }

    #[test]
    fn test_empty_run_has_no_progress() {
        let run = RunSummary {
            length: 1,
            level: 1,
            ..Default::default()
        };
        assert_eq!(progress_of(&run, FIRST_BITE), 0.0);
        assert_eq!(progress_of(&run, SPEED_DEMON), 0.0);
        assert_eq!(progress_of(&run, LONG_SNAKE), 5.0);
    }

    #[test]
    fn test_progress_caps_at_complete() {
        let run = RunSummary {
            score: 250,
            foods_eaten: 25,
            length: 26,
            level: 6,
            ticks: 200,
            filled_board: false,
        };
        assert_eq!(progress_of(&run, FIRST_BITE), 100.0);
        assert_eq!(progress_of(&run, CENTURY), 100.0);
        assert_eq!(progress_of(&run, LONG_SNAKE), 100.0);
        assert_eq!(progress_of(&run, SPEED_DEMON), 100.0);
        assert_eq!(progress_of(&run, MARATHON), 40.0);
        assert_eq!(progress_of(&run, CLEAN_SWEEP), 0.0);
    }
}
