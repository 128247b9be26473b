//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The board wraps at every edge; each segment also tracks an unwrapped position
//! so the renderer can orient tiles across the seam.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::{Axis, Direction};
pub use config::{ConfigError, GameConfig};
pub use engine::{GameEngine, StepEvent, StepResult};
pub use state::{GameState, Position, Segment, Snake};
