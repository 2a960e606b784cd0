//! Simulation configuration
//!
//! Deserialized from a JSON parameter file by the CLI and passed to
//! `Surface::new`; no ambient global parameters exist. Validation runs
//! before any tick does.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::evolve::MutationConfig;
use crate::payoff::LOSS_PER_TICK;

/// Grid dimensions
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
        }
    }
}

/// All recognised simulation parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub surface: SurfaceConfig,
    /// Ticks the driver runs
    pub generations: u32,
    /// Interaction/death/movement rounds per tick
    pub interactions: u32,
    /// Fraction of the population eligible to reproduce each tick
    pub reproduction_ratio: f64,
    /// Fraction of the population (lowest-scoring) eligible to move
    pub move_ratio: f64,
    /// Probability that an eligible cell attempts a move
    pub move_chance: f64,
    /// Whether cells age each tick
    pub ageing: bool,
    /// Age at which a cell dies, honoured only when `ageing` is on
    pub max_age: Option<u32>,
    /// Tree depth of founder genes
    pub default_memory_size: usize,
    pub mutation: MutationConfig,
    /// Metabolic cost charged at the start of every tick
    pub loss_per_tick: i64,
    /// A cell dies when its score falls below this
    pub death_threshold: i64,
    /// RNG seed; `None` means seed from entropy
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            surface: SurfaceConfig::default(),
            generations: 100,
            interactions: 10,
            reproduction_ratio: 0.2,
            move_ratio: 0.2,
            move_chance: 0.5,
            ageing: false,
            max_age: None,
            default_memory_size: 3,
            mutation: MutationConfig::default(),
            loss_per_tick: LOSS_PER_TICK,
            death_threshold: 0,
            seed: None,
        }
    }
}

/// Configuration rejected before the simulation starts
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("surface dimensions must be positive (got {width}x{height})")]
    EmptySurface { width: u32, height: u32 },
    #[error("{name} must be within [0, 1] (got {value})")]
    RatioOutOfRange { name: &'static str, value: f64 },
    #[error("default_memory_size must be at least 1")]
    MemoryDepthTooSmall,
    #[error("loss_per_tick must not be negative (got {0})")]
    NegativeLoss(i64),
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.surface.width == 0 || self.surface.height == 0 {
            return Err(ConfigError::EmptySurface {
                width: self.surface.width,
                height: self.surface.height,
            });
        }
        check_ratio("reproduction_ratio", self.reproduction_ratio)?;
        check_ratio("move_ratio", self.move_ratio)?;
        check_ratio("move_chance", self.move_chance)?;
        check_ratio("mutation.mutation_rate", self.mutation.mutation_rate)?;
        check_ratio("mutation.grow_chance", self.mutation.grow_chance)?;
        check_ratio("mutation.shrink_chance", self.mutation.shrink_chance)?;
        if self.default_memory_size < 1 {
            return Err(ConfigError::MemoryDepthTooSmall);
        }
        if self.loss_per_tick < 0 {
            return Err(ConfigError::NegativeLoss(self.loss_per_tick));
        }
        Ok(())
    }
}

fn check_ratio(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) || value.is_nan() {
        return Err(ConfigError::RatioOutOfRange { name, value });
    }
    Ok(())
}
