//! Grid coordinates, headings and wraparound
//!
//! Row 0 is the bottom row; rows grow upward.

use serde::{Deserialize, Serialize};

/// A single cell on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub col: i32,
    pub row: i32,
}

impl GridPos {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }
}

/// Heading of the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Column/row offset of one step
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Steering toward a point: the dominant axis wins, ties go vertical.
    ///
    /// Coordinates are in any y-up unit (cells or pixels).
    pub fn toward(from: (f32, f32), to: (f32, f32)) -> Option<Direction> {
        let dx = to.0 - from.0;
        let dy = to.1 - from.1;
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        if dx.abs() > dy.abs() {
            Some(if dx > 0.0 { Direction::Right } else { Direction::Left })
        } else {
            Some(if dy > 0.0 { Direction::Up } else { Direction::Down })
        }
    }
}

/// Board dimensions in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Fit as many whole cells as the viewport allows
    pub fn from_viewport(width_px: f32, height_px: f32, cell_px: f32) -> Self {
        let cell = cell_px.max(1.0);
        Self::new((width_px / cell) as u32, (height_px / cell) as u32)
    }

    pub fn center(&self) -> GridPos {
        GridPos::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        pos.col >= 0 && pos.row >= 0 && pos.col < self.width as i32 && pos.row < self.height as i32
    }

    /// Fold any position back onto the torus
    pub fn wrap(&self, pos: GridPos) -> GridPos {
        GridPos::new(
            pos.col.rem_euclid(self.width as i32),
            pos.row.rem_euclid(self.height as i32),
        )
    }

    /// One step in `dir`. Without wraparound, leaving the board yields `None`.
    pub fn step(&self, pos: GridPos, dir: Direction, wrap: bool) -> Option<GridPos> {
        let (dc, dr) = dir.delta();
        let next = GridPos::new(pos.col + dc, pos.row + dr);
        if wrap {
            Some(self.wrap(next))
        } else if self.contains(next) {
            Some(next)
        } else {
            None
        }
    }

    /// Direction of a single-cell step between adjacent cells, seam included
    pub fn neighbor_direction(&self, from: GridPos, to: GridPos) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|&dir| self.step(from, dir, true) == Some(to))
    }

    /// Shortest Manhattan distance on the torus (plain distance when `wrap` is off)
    pub fn distance(&self, a: GridPos, b: GridPos, wrap: bool) -> u32 {
        let dc = (a.col - b.col).unsigned_abs();
        let dr = (a.row - b.row).unsigned_abs();
        if wrap {
            dc.min(self.width - dc.min(self.width)) + dr.min(self.height - dr.min(self.height))
        } else {
            dc + dr
        }
    }

    /// All cells, bottom row first
    pub fn cells(&self) -> impl Iterator<Item = GridPos> + '_ {
        (0..self.height as i32)
            .flat_map(move |row| (0..self.width as i32).map(move |col| GridPos::new(col, row)))
    }
}
