//! Idle/demo player
//!
//! Greedy: head for the apple along the shortest safe step.

use super::grid::Direction;
use super::state::GameState;

/// Choose the next heading, or `None` to keep going straight
pub fn autopilot(state: &GameState) -> Option<Direction> {
    let head = state.head();
    let wrap = state.rules.wraparound;
    let tail = state.snake.back().copied();

    let safe = |dir: Direction| {
        let Some(next) = state.grid.step(head, dir, wrap) else {
            return false;
        };
        // The tail cell frees up this step (the apple is never on it)
        if Some(next) == tail {
            return true;
        }
        !state.occupies(next)
    };

    let mut candidates = Direction::ALL
        .into_iter()
        .filter(|&dir| !dir.is_opposite(state.heading) && safe(dir));

    let best = match state.food {
        Some(food) => candidates.min_by_key(|&dir| {
            let next = state.grid.step(head, dir, wrap).unwrap_or(head);
            // Prefer straight on ties so the path doesn't zigzag
            let turn_cost = u32::from(dir != state.heading);
            (state.grid.distance(next, food, wrap), turn_cost)
        }),
        None => candidates.next(),
    };

    best.filter(|&dir| dir != state.heading)
}
