//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed steps only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod grid;
pub mod rules;
pub mod sprites;
pub mod state;
pub mod tick;

pub use autopilot::autopilot;
pub use grid::{Direction, GridPos, GridSize};
pub use rules::{Rules, RulesError};
pub use sprites::{BodyShape, SegmentKind, Sprite, segment_kind, snake_sprites};
pub use state::{GameEvent, GameOverReason, GamePhase, GameState, StateError};
pub use tick::{TickInput, tick};
