//! Wrap Snake - a terminal Snake game on a wraparound board
//!
//! This library provides:
//! - Core game logic (game module)
//! - Tile orientation and frame composition (render module)
//! - The presentation layer the loop draws through (platform module)
//! - Keyboard mapping (input module) and overlay bookkeeping (metrics module)
//! - The interactive frame loop (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod platform;
pub mod render;
