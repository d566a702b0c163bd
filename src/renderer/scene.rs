//! Board to triangles
//!
//! Output is in grid units: cell (col, row) covers [col, col+1] x [row, row+1].

use glam::Vec2;

use super::shapes::{circle, quad, rect, triangle};
use super::vertex::{Vertex, colors};
use crate::settings::Settings;
use crate::sim::{Direction, GamePhase, GameState, GridPos, Sprite, snake_sprites};

/// Half-width of a snake segment
const BODY_HALF: f32 = 0.4;

fn cell_center(pos: GridPos) -> Vec2 {
    Vec2::new(pos.col as f32 + 0.5, pos.row as f32 + 0.5)
}

fn unit(dir: Direction) -> Vec2 {
    let (dx, dy) = dir.delta();
    Vec2::new(dx as f32, dy as f32)
}

/// Bar from the cell center to the cell edge facing `dir`
fn connector(center: Vec2, dir: Direction, color: [f32; 4]) -> Vec<Vertex> {
    let half = if dir.is_horizontal() {
        Vec2::new(0.25, BODY_HALF)
    } else {
        Vec2::new(BODY_HALF, 0.25)
    };
    rect(center + unit(dir) * 0.25, half, color)
}

fn head(center: Vec2, dir: Direction, has_neck: bool, color: [f32; 4]) -> Vec<Vertex> {
    let mut v = rect(center, Vec2::splat(0.45), color);
    if has_neck {
        v.extend(connector(center, dir.opposite(), color));
    }
    let forward = unit(dir);
    let side = Vec2::new(-forward.y, forward.x);
    for s in [-1.0, 1.0] {
        let eye = center + forward * 0.15 + side * (0.2 * s);
        v.extend(circle(eye, 0.12, colors::EYE_WHITE, 10));
        v.extend(circle(eye + forward * 0.04, 0.06, colors::EYE_PUPIL, 8));
    }
    v
}

fn tail(center: Vec2, tip: Direction, color: [f32; 4]) -> Vec<Vertex> {
    let mut v = connector(center, tip.opposite(), color);
    let forward = unit(tip);
    let side = Vec2::new(-forward.y, forward.x);
    v.extend(triangle(
        center + side * BODY_HALF,
        center - side * BODY_HALF,
        center + forward * 0.45,
        color,
    ));
    v
}

fn apple(center: Vec2, radius: f32) -> Vec<Vertex> {
    let mut v = circle(center, radius, colors::APPLE, 16);
    let top = center + Vec2::new(0.0, radius);
    v.extend(quad(
        top + Vec2::new(-0.03, -0.05),
        top + Vec2::new(0.03, 0.12),
        colors::APPLE_STEM,
    ));
    v.extend(triangle(
        top + Vec2::new(0.02, 0.06),
        top + Vec2::new(0.22, 0.16),
        top + Vec2::new(0.10, 0.0),
        colors::APPLE_LEAF,
    ));
    v
}

fn grid_lines(state: &GameState) -> Vec<Vertex> {
    let (w, h) = (state.grid.width as f32, state.grid.height as f32);
    let t = 0.02;
    let mut v = Vec::new();
    for col in 0..=state.grid.width {
        let x = col as f32;
        v.extend(quad(Vec2::new(x - t, 0.0), Vec2::new(x + t, h), colors::GRID_LINE));
    }
    for row in 0..=state.grid.height {
        let y = row as f32;
        v.extend(quad(Vec2::new(0.0, y - t), Vec2::new(w, y + t), colors::GRID_LINE));
    }
    v
}

/// Everything on the board for one frame
pub fn scene_vertices(state: &GameState, settings: &Settings, time_secs: f32) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    if settings.show_grid {
        vertices.extend(grid_lines(state));
    }

    if let Some(food) = state.food {
        let pulse = if settings.reduced_motion {
            0.0
        } else {
            (time_secs * 4.0).sin() * 0.03
        };
        vertices.extend(apple(cell_center(food), 0.36 + pulse));
    }

    let dead = state.phase == GamePhase::GameOver;
    let tint = |c: [f32; 4]| if dead { colors::SNAKE_DEAD } else { c };
    let has_neck = state.len() > 1;

    // Tail first so the head draws on top
    for (pos, sprite) in snake_sprites(state).into_iter().rev() {
        let center = cell_center(pos);
        match sprite {
            Sprite::Head(dir) => {
                vertices.extend(head(center, dir, has_neck, tint(colors::SNAKE_HEAD)))
            }
            Sprite::Body(shape) => {
                let color = tint(colors::SNAKE_BODY);
                vertices.extend(rect(center, Vec2::splat(BODY_HALF), color));
                for dir in shape.openings() {
                    vertices.extend(connector(center, dir, color));
                }
            }
            Sprite::Tail(dir) => vertices.extend(tail(center, dir, tint(colors::SNAKE_TAIL))),
        }
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GridSize, Rules};

    #[test]
    fn test_scene_stays_on_board() {
        let mut state = GameState::new(3, GridSize::new(12, 9), Rules::default());
        state.snake = [(0, 0), (11, 0), (11, 8)]
            .iter()
            .map(|&(c, r)| GridPos::new(c, r))
            .collect();
        state.heading = Direction::Right;
        let vertices = scene_vertices(&state, &Settings::default(), 0.0);
        assert!(!vertices.is_empty());
        for v in vertices {
            // Apple stem and leaf may poke slightly above their cell
            assert!(v.position[0] >= -0.1 && v.position[0] <= 12.1);
            assert!(v.position[1] >= -0.1 && v.position[1] <= 9.5);
        }
    }

    #[test]
    fn test_grid_lines_optional() {
        let state = GameState::new(3, GridSize::new(5, 5), Rules::default());
        let plain = scene_vertices(&state, &Settings::default(), 0.0);
        let settings = Settings {
            show_grid: true,
            ..Default::default()
        };
        let gridded = scene_vertices(&state, &settings, 0.0);
        // 6 vertical + 6 horizontal lines, 6 vertices each
        assert_eq!(gridded.len(), plain.len() + 12 * 6);
    }

    #[test]
    fn test_dead_snake_is_grey() {
        let mut state = GameState::new(3, GridSize::new(5, 5), Rules::default());
        state.food = None;
        state.phase = GamePhase::GameOver;
        let vertices = scene_vertices(&state, &Settings::default(), 0.0);
        assert!(vertices.iter().any(|v| v.color == colors::SNAKE_DEAD));
        assert!(vertices.iter().all(|v| v.color != colors::SNAKE_HEAD));
    }
}
