//! Presentation layer the game loop talks to.
//!
//! The loop never touches the terminal directly: it polls keys, issues draw
//! calls between `begin_frame`/`end_frame`, and lets the platform pace frames.
//! [`TerminalPlatform`] draws with ratatui; [`HeadlessPlatform`] records
//! everything and is what the tests drive.

pub mod glyphs;
pub mod headless;
pub mod terminal;

use anyhow::Result;
use crossterm::event::KeyEvent;
use glam::Vec2;
use ratatui::style::Color;
use std::time::Duration;

use crate::render::TileKind;

pub use headless::{DrawCall, HeadlessPlatform};
pub use terminal::TerminalPlatform;

/// Texture roles loaded once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Texture {
    Apple,
    Head,
    Straight,
    Corner,
    Tail,
}

impl From<TileKind> for Texture {
    fn from(tile: TileKind) -> Self {
        match tile {
            TileKind::Head => Texture::Head,
            TileKind::Straight => Texture::Straight,
            TileKind::Corner => Texture::Corner,
            TileKind::Tail => Texture::Tail,
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait Platform {
    /// Next pending key press, without blocking
    fn poll_next_key_event(&mut self) -> Result<Option<KeyEvent>>;

    fn begin_frame(&mut self);

    /// Wipe everything drawn so far with a solid colour
    fn clear(&mut self, color: Color);

    fn draw_textured_rect(&mut self, texture: Texture, position: Vec2, rotation_degrees: f32);

    fn draw_rect(&mut self, position: Vec2, size: Vec2, color: Color);

    fn draw_text(&mut self, text: &str, position: Vec2, size: u16, color: Color);

    /// Present everything drawn since `begin_frame`
    fn end_frame(&mut self) -> Result<()>;

    fn set_target_rate(&mut self, ticks_per_second: u32);

    /// Block until the next frame boundary at the target rate
    async fn wait_next_frame(&mut self);

    async fn sleep(&mut self, duration: Duration);
}
