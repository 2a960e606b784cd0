//! DILEMMA Core - Simulation engine
//!
//! This crate provides the core logic for DILEMMA, a spatial iterated
//! prisoner's dilemma simulator:
//! - Board geometry (toroidal 2D grid with integer coordinates)
//! - Payoff matrix for a single round of the dilemma
//! - Genes (heritable strategies encoded as binary decision trees)
//! - Genetic operators (mutation, recombination)
//! - Cells (agents) and their bounded opponent-move memory
//! - The surface: grid, cell registry and the phased tick scheduler

pub mod board;
pub mod payoff;
pub mod gene;
pub mod evolve;
pub mod memory;
pub mod cell;
pub mod config;
pub mod surface;

// Re-exports for convenient access
pub use board::{Position, NEIGHBOUR_OFFSETS};
pub use payoff::{payoff, Move, LOSS_PER_TICK};
pub use gene::Gene;
pub use evolve::{mutate, recombinate, MutationConfig};
pub use memory::Memory;
pub use cell::{Cell, CellId};
pub use config::{ConfigError, SimConfig, SurfaceConfig};
pub use surface::Surface;
