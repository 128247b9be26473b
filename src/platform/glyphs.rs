//! Character art standing in for the tile textures.
//!
//! Each board cell is two terminal columns wide. The art for a texture is
//! authored facing right, like the image assets, and picked per quarter turn.

use super::Texture;

/// Columns one board cell takes up in the terminal
pub const CELL_COLUMNS: u16 = 2;

/// Number of clockwise quarter turns closest to `degrees`, in `0..4`
pub fn quarter_turns(degrees: f32) -> usize {
    ((degrees / 90.0).round() as i32).rem_euclid(4) as usize
}

// Indexed by quarter turns: right, down, left, up.
const HEAD: [&str; 4] = ["━▶", "▼ ", "◀━", "▲ "];
const STRAIGHT: [&str; 4] = ["━━", "┃ ", "━━", "┃ "];
// Facing right the corner joins the right and bottom edges.
const CORNER: [&str; 4] = ["┏━", "┓ ", "┛ ", "┗━"];
const TAIL: [&str; 4] = ["━╴", "╵ ", "╶━", "╷ "];
const APPLE: &str = "● ";

pub fn glyph(texture: Texture, degrees: f32) -> &'static str {
    let turn = quarter_turns(degrees);
    match texture {
        Texture::Apple => APPLE,
        Texture::Head => HEAD[turn],
        Texture::Straight => STRAIGHT[turn],
        Texture::Corner => CORNER[turn],
        Texture::Tail => TAIL[turn],
    }
}
