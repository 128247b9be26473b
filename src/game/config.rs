use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use super::action::{Axis, Direction};
use super::state::Position;

/// Reasons a [`GameConfig`] cannot drive a game
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("a {cells}-cell grid leaves no free cell for food beside the start snake")]
    NoRoomForFood { cells: usize },
    #[error("pixel scale must be non-zero")]
    ZeroScale,
    #[error("speed step must be non-zero")]
    ZeroSpeedStep,
    #[error("start cell ({x}, {y}) lies outside the {width}x{height} grid")]
    StartOutsideGrid {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
    #[error("start tail must sit directly behind the head along the start heading")]
    StartNotAdjacent,
    #[error("window {window_width}x{window_height} cannot hold a {needed_width}x{needed_height} board")]
    WindowTooSmall {
        window_width: u32,
        window_height: u32,
        needed_width: u32,
        needed_height: u32,
    },
}

/// Configuration for the game
///
/// `Default` yields the compiled-in values the game ships with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Pixels per grid cell
    pub scale: u32,
    /// Pixel size of every segment texture
    pub tile_size: u32,
    /// Window size in pixels
    pub window_width: u32,
    pub window_height: u32,

    /// Ticks per second at the starting length
    pub base_rate: u32,
    /// Segments gained per extra tick per second
    pub rate_step: usize,

    /// Head and trailing cell of a fresh snake
    pub start_head: Position,
    pub start_tail: Position,
    pub start_heading: Direction,

    /// How long the game-over message stays up before the reset
    pub game_over_hold: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 32,
            grid_height: 18,
            scale: 40,
            tile_size: 40,
            window_width: 1280,
            window_height: 720,
            base_rate: 16,
            rate_step: 4,
            start_head: Position::new(10, 10),
            start_tail: Position::new(9, 10),
            start_heading: Direction::Right,
            game_over_hold: Duration::from_secs(2),
        }
    }
}

impl GameConfig {
    /// Number of cells on the board
    pub fn cell_count(&self) -> usize {
        self.grid_width * self.grid_height
    }

    /// Ticks per second for a snake of the given length.
    pub fn speed_tier(&self, length: usize) -> u32 {
        let bonus = length / self.rate_step.max(1);
        self.base_rate
            .saturating_add(u32::try_from(bonus).unwrap_or(u32::MAX))
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.grid_width
            && (pos.y as usize) < self.grid_height
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        if self.cell_count() <= 2 {
            return Err(ConfigError::NoRoomForFood {
                cells: self.cell_count(),
            });
        }
        if self.scale == 0 {
            return Err(ConfigError::ZeroScale);
        }
        if self.rate_step == 0 {
            return Err(ConfigError::ZeroSpeedStep);
        }
        for cell in [self.start_head, self.start_tail] {
            if !self.contains(cell) {
                return Err(ConfigError::StartOutsideGrid {
                    x: cell.x,
                    y: cell.y,
                    width: self.grid_width,
                    height: self.grid_height,
                });
            }
        }
        let (dx, dy) = self.start_heading.delta();
        if self.start_tail.moved_by(dx, dy) != self.start_head
            || self.start_heading.axis() != Axis::Horizontal
        {
            return Err(ConfigError::StartNotAdjacent);
        }
        let needed_width = self.grid_width as u32 * self.scale;
        let needed_height = self.grid_height as u32 * self.scale;
        if self.window_width < needed_width || self.window_height < needed_height {
            return Err(ConfigError::WindowTooSmall {
                window_width: self.window_width,
                window_height: self.window_height,
                needed_width,
                needed_height,
            });
        }
        Ok(())
    }

    /// Create a configuration with a custom grid, sizing the window to fit
    pub fn with_grid(width: usize, height: usize) -> Self {
        let defaults = Self::default();
        Self {
            grid_width: width,
            grid_height: height,
            window_width: width as u32 * defaults.scale,
            window_height: height as u32 * defaults.scale,
            ..defaults
        }
    }
}
