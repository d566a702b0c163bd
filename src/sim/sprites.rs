//! Sprite selection for snake segments
//!
//! Pure lookup from board state to the art each cell should show. The renderer
//! draws these procedurally; `name()` matches the texture atlas naming.

use super::grid::{Direction, GridPos, GridSize};
use super::state::GameState;

/// Role of a segment within the body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Head,
    Body,
    Tail,
}

/// Role of segment `index` in a snake of `len` segments
pub fn segment_kind(index: usize, len: usize) -> SegmentKind {
    if index == 0 {
        SegmentKind::Head
    } else if index + 1 == len {
        SegmentKind::Tail
    } else {
        SegmentKind::Body
    }
}

/// Shape of a body segment, from the two cells it joins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
    Horizontal,
    Vertical,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl BodyShape {
    fn joining(a: Direction, b: Direction) -> Self {
        match (a.is_horizontal(), b.is_horizontal()) {
            (true, true) => BodyShape::Horizontal,
            (false, false) => BodyShape::Vertical,
            _ => {
                let (vertical, horizontal) = if a.is_horizontal() { (b, a) } else { (a, b) };
                match (vertical, horizontal) {
                    (Direction::Up, Direction::Left) => BodyShape::TopLeft,
                    (Direction::Up, _) => BodyShape::TopRight,
                    (_, Direction::Left) => BodyShape::BottomLeft,
                    _ => BodyShape::BottomRight,
                }
            }
        }
    }

    /// Directions this segment connects toward
    pub fn openings(self) -> [Direction; 2] {
        match self {
            BodyShape::Horizontal => [Direction::Left, Direction::Right],
            BodyShape::Vertical => [Direction::Up, Direction::Down],
            BodyShape::TopLeft => [Direction::Up, Direction::Left],
            BodyShape::TopRight => [Direction::Up, Direction::Right],
            BodyShape::BottomLeft => [Direction::Down, Direction::Left],
            BodyShape::BottomRight => [Direction::Down, Direction::Right],
        }
    }
}

/// One drawable cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    /// Facing the heading
    Head(Direction),
    Body(BodyShape),
    /// Tip points this way (away from the body)
    Tail(Direction),
}

impl Sprite {
    /// Texture name
    pub fn name(&self) -> &'static str {
        match self {
            Sprite::Head(Direction::Up) => "head_up",
            Sprite::Head(Direction::Down) => "head_down",
            Sprite::Head(Direction::Left) => "head_left",
            Sprite::Head(Direction::Right) => "head_right",
            Sprite::Body(BodyShape::Horizontal) => "body_horizontal",
            Sprite::Body(BodyShape::Vertical) => "body_vertical",
            Sprite::Body(BodyShape::TopLeft) => "body_topleft",
            Sprite::Body(BodyShape::TopRight) => "body_topright",
            Sprite::Body(BodyShape::BottomLeft) => "body_bottomleft",
            Sprite::Body(BodyShape::BottomRight) => "body_bottomright",
            Sprite::Tail(Direction::Up) => "tail_up",
            Sprite::Tail(Direction::Down) => "tail_down",
            Sprite::Tail(Direction::Left) => "tail_left",
            Sprite::Tail(Direction::Right) => "tail_right",
        }
    }
}

fn toward(grid: &GridSize, from: GridPos, to: GridPos, fallback: Direction) -> Direction {
    grid.neighbor_direction(from, to).unwrap_or(fallback)
}

/// Sprites for every snake segment, head first
pub fn snake_sprites(state: &GameState) -> Vec<(GridPos, Sprite)> {
    let grid = &state.grid;
    let len = state.len();
    let heading = state.heading;

    state
        .snake
        .iter()
        .enumerate()
        .map(|(i, &pos)| {
            let sprite = match segment_kind(i, len) {
                SegmentKind::Head => Sprite::Head(heading),
                SegmentKind::Tail => {
                    let ahead = toward(grid, pos, state.snake[i - 1], heading);
                    Sprite::Tail(ahead.opposite())
                }
                SegmentKind::Body => {
                    let ahead = toward(grid, pos, state.snake[i - 1], heading);
                    let behind = toward(grid, pos, state.snake[i + 1], heading.opposite());
                    Sprite::Body(BodyShape::joining(ahead, behind))
                }
            };
            (pos, sprite)
        })
        .collect()
}
