//! Tunable rules: scoring, leveling and the speed curve

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected rule sets
#[derive(Debug, Error, PartialEq)]
pub enum RulesError {
    #[error("initial_length must be at least 1")]
    ZeroInitialLength,
    #[error("foods_per_level must be at least 1")]
    ZeroFoodsPerLevel,
    #[error("step interval {0} must be positive and finite")]
    BadInterval(f32),
    #[error("step_decay {0} must be in (0, 1]")]
    BadDecay(f32),
    #[error("min_step_interval {min} exceeds base_step_interval {base}")]
    MinAboveBase { min: f32, base: f32 },
}

/// Game rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Edges wrap to the opposite side; when off, walls end the run
    pub wraparound: bool,
    /// Segments at spawn
    pub initial_length: u32,
    /// Points per apple
    pub points_per_food: u64,
    /// Apples needed per level
    pub foods_per_level: u32,
    /// Seconds per step at level 1
    pub base_step_interval: f32,
    /// Interval multiplier per level gained
    pub step_decay: f32,
    /// Fastest allowed interval
    pub min_step_interval: f32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            wraparound: true,
            initial_length: 1,
            points_per_food: 10,
            foods_per_level: 5,
            base_step_interval: 0.2,
            step_decay: 0.9,
            min_step_interval: 0.06,
        }
    }
}

impl Rules {
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.initial_length == 0 {
            return Err(RulesError::ZeroInitialLength);
        }
        if self.foods_per_level == 0 {
            return Err(RulesError::ZeroFoodsPerLevel);
        }
        for interval in [self.base_step_interval, self.min_step_interval] {
            if !(interval.is_finite() && interval > 0.0) {
                return Err(RulesError::BadInterval(interval));
            }
        }
        if !(self.step_decay > 0.0 && self.step_decay <= 1.0) {
            return Err(RulesError::BadDecay(self.step_decay));
        }
        if self.min_step_interval > self.base_step_interval {
            return Err(RulesError::MinAboveBase {
                min: self.min_step_interval,
                base: self.base_step_interval,
            });
        }
        Ok(())
    }

    /// Level reached after eating `foods_eaten` apples (1-based)
    pub fn level_for(&self, foods_eaten: u32) -> u32 {
        1 + foods_eaten / self.foods_per_level.max(1)
    }

    /// Seconds between steps at `level`
    pub fn step_interval(&self, level: u32) -> f32 {
        let gained = level.saturating_sub(1).min(i32::MAX as u32) as i32;
        (self.base_step_interval * self.step_decay.powi(gained)).max(self.min_step_interval)
    }
}
