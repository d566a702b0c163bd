//! Fixed-interval simulation step
//!
//! Advances the snake one cell: turn, move, wrap, eat, collide.

use super::state::{GameEvent, GameOverReason, GamePhase, GameState};
use super::grid::Direction;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Requested heading (keys, swipe or tap)
    pub turn: Option<Direction>,
    /// Pause toggle
    pub pause: bool,
    /// Start a fresh run
    pub restart: bool,
}

/// Advance the game state by one step
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.restart {
        state.restart();
        return;
    }

    if input.pause {
        match state.phase {
            GamePhase::Playing => state.phase = GamePhase::Paused,
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
        return;
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    if let Some(dir) = input.turn {
        state.queue_turn(dir);
    }
    if let Some(dir) = state.queued.take() {
        state.heading = dir;
    }

    // Counts the fatal move into a wall too
    state.time_ticks += 1;

    let Some(new_head) = state
        .grid
        .step(state.head(), state.heading, state.rules.wraparound)
    else {
        end_run(state, GameOverReason::WallCollision);
        return;
    };

    state.snake.push_front(new_head);

    if state.food == Some(new_head) {
        eat(state);
    } else {
        state.snake.pop_back();
    }

    if state.phase == GamePhase::Playing && hit_self(state) {
        end_run(state, GameOverReason::SelfCollision);
    }
}

/// Grow, score and respawn the apple
fn eat(state: &mut GameState) {
    state.score += state.rules.points_per_food;
    state.foods_eaten += 1;
    state.events.push(GameEvent::AteFood {
        pos: state.head(),
        score: state.score,
    });

    let level = state.rules.level_for(state.foods_eaten);
    if level > state.level {
        state.level = level;
        state.events.push(GameEvent::LevelUp { level });
        log::debug!(
            "Level {} (step {:.3}s)",
            level,
            state.step_interval()
        );
    }

    state.food = state.spawn_food();
    if state.food.is_none() {
        end_run(state, GameOverReason::BoardFull);
    }
}

/// Head overlaps any other segment (tail already moved this step)
fn hit_self(state: &GameState) -> bool {
    let head = state.head();
    state.snake.iter().skip(1).any(|&segment| segment == head)
}

fn end_run(state: &mut GameState, reason: GameOverReason) {
    state.phase = GamePhase::GameOver;
    state.events.push(GameEvent::GameOver {
        reason,
        score: state.score,
        length: state.len(),
        level: state.level,
    });
    log::info!(
        "Game over ({:?}): score {}, length {}, level {}",
        reason,
        state.score,
        state.len(),
        state.level
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::{GridPos, GridSize};
    use crate::sim::rules::Rules;
    use proptest::prelude::*;

    fn state_with_body(body: &[(i32, i32)], heading: Direction, grid: GridSize) -> GameState {
        let mut state = GameState::new(1, grid, Rules::default());
        state.snake = body.iter().map(|&(c, r)| GridPos::new(c, r)).collect();
        state.heading = heading;
        state.food = state.spawn_food();
        state
    }

    fn turn(dir: Direction) -> TickInput {
        TickInput {
            turn: Some(dir),
            ..Default::default()
        }
    }

    #[test]
    fn test_moves_one_cell_per_tick() {
        let mut state = GameState::new(3, GridSize::new(20, 20), Rules::default());
        state.food = Some(GridPos::new(0, 0));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.head(), GridPos::new(11, 10));
        assert_eq!(state.len(), 1);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_wraparound_right_edge() {
        let mut state = state_with_body(&[(9, 4)], Direction::Right, GridSize::new(10, 10));
        state.food = Some(GridPos::new(5, 5));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.head(), GridPos::new(0, 4));
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_walls_end_run_without_wraparound() {
        let mut state = state_with_body(&[(9, 4)], Direction::Right, GridSize::new(10, 10));
        state.rules.wraparound = false;
        state.food = Some(GridPos::new(5, 5));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.time_ticks, 1);
        assert_eq!(state.head(), GridPos::new(9, 4));
        assert!(matches!(
            state.drain_events().as_slice(),
            [GameEvent::GameOver {
                reason: GameOverReason::WallCollision,
                ..
            }]
        ));
    }

    #[test]
    fn test_eating_grows_and_scores() {
        let mut state = state_with_body(&[(4, 4)], Direction::Right, GridSize::new(10, 10));
        state.food = Some(GridPos::new(5, 4));
        tick(&mut state, &TickInput::default());

        assert_eq!(state.len(), 2);
        assert_eq!(state.score, 10);
        assert_eq!(state.foods_eaten, 1);
        let food = state.food.unwrap();
        assert!(!state.occupies(food));
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::AteFood {
                pos: GridPos::new(5, 4),
                score: 10
            }]
        );
    }

    #[test]
    fn test_level_up_speeds_up() {
        let mut state = state_with_body(&[(0, 0)], Direction::Right, GridSize::new(20, 1));
        let before = state.step_interval();
        for col in 1..=5 {
            state.food = Some(GridPos::new(col, 0));
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.level, 2);
        assert!(state.step_interval() < before);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::LevelUp { level: 2 })
        );
    }

    #[test]
    fn test_reverse_turn_ignored() {
        let mut state = state_with_body(&[(5, 5), (4, 5)], Direction::Right, GridSize::new(10, 10));
        state.food = Some(GridPos::new(0, 0));
        tick(&mut state, &turn(Direction::Left));
        assert_eq!(state.head(), GridPos::new(6, 5));
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_quick_double_turn_cannot_reverse() {
        let mut state = state_with_body(&[(5, 5), (4, 5)], Direction::Right, GridSize::new(10, 10));
        state.food = Some(GridPos::new(0, 0));
        // Up then Left before the next step: Left reverses the last move
        assert!(state.queue_turn(Direction::Up));
        assert!(!state.queue_turn(Direction::Left));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.head(), GridPos::new(5, 6));
    }

    #[test]
    fn test_self_collision_ends_run() {
        // Head at (2,2) heading down into its own body
        let body = [(2, 2), (3, 2), (3, 1), (2, 1), (1, 1)];
        let mut state = state_with_body(&body, Direction::Left, GridSize::new(6, 6));
        state.food = Some(GridPos::new(5, 5));
        tick(&mut state, &turn(Direction::Down));
        assert_eq!(state.phase, GamePhase::GameOver);

        // Further ticks do nothing
        let head = state.head();
        tick(&mut state, &TickInput::default());
        assert_eq!(state.head(), head);
    }

    #[test]
    fn test_following_tail_is_legal() {
        // A 2x2 loop: the head moves into the cell the tail vacates
        let body = [(1, 1), (2, 1), (2, 2), (1, 2)];
        let mut state = state_with_body(&body, Direction::Left, GridSize::new(6, 6));
        state.food = Some(GridPos::new(5, 5));
        tick(&mut state, &turn(Direction::Up));
        assert_eq!(state.head(), GridPos::new(1, 2));
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_filling_board_ends_run() {
        let mut state = state_with_body(&[(1, 0), (0, 0)], Direction::Right, GridSize::new(3, 1));
        state.food = Some(GridPos::new(2, 0));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.drain_events().iter().any(|e| matches!(
            e,
            GameEvent::GameOver {
                reason: GameOverReason::BoardFull,
                ..
            }
        )));
    }

    #[test]
    fn test_pause_and_restart() {
        let mut state = GameState::new(11, GridSize::new(10, 10), Rules::default());
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Paused);

        let head = state.head();
        tick(&mut state, &TickInput::default());
        assert_eq!(state.head(), head);

        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Playing);

        state.phase = GamePhase::GameOver;
        state.score = 40;
        tick(
            &mut state,
            &TickInput {
                restart: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999, GridSize::new(15, 15), Rules::default());
        let mut state2 = GameState::new(99999, GridSize::new(15, 15), Rules::default());

        let inputs = [
            turn(Direction::Up),
            TickInput::default(),
            turn(Direction::Left),
            TickInput::default(),
            turn(Direction::Down),
        ];

        for _ in 0..20 {
            for input in &inputs {
                tick(&mut state1, input);
                tick(&mut state2, input);
            }
        }

        assert_eq!(state1.snake, state2.snake);
        assert_eq!(state1.food, state2.food);
        assert_eq!(state1.score, state2.score);
    }

    proptest! {
        #[test]
        fn snake_stays_on_board_and_length_tracks_food(
            seed in any::<u64>(),
            turns in proptest::collection::vec(0usize..5, 1..200),
        ) {
            let mut state = GameState::new(seed, GridSize::new(8, 8), Rules::default());
            for t in turns {
                let input = TickInput {
                    turn: Direction::ALL.get(t).copied(),
                    ..Default::default()
                };
                tick(&mut state, &input);
                prop_assert!(state.snake.iter().all(|&p| state.grid.contains(p)));
                prop_assert_eq!(state.len(), 1 + state.foods_eaten as usize);
                prop_assert_eq!(state.score, state.foods_eaten as u64 * 10);
                if state.phase == GamePhase::GameOver {
                    break;
                }
            }
        }
    }
}
