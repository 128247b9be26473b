//! Orientation math for snake tiles.
//!
//! Every tile asset is authored facing right. These functions decide which
//! asset a segment uses and how far to rotate it, looking only at the
//! segment's immediate neighbours. Directions are taken from unwrapped
//! positions so a segment that just crossed an edge still points the right
//! way; straight/corner classification uses grid cells.
//!
//! Angles are in degrees and follow the screen convention (y grows
//! downward), so a positive angle turns clockwise on screen.

use glam::Vec2;

use crate::game::Position;

/// Which asset a segment is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    Head,
    Straight,
    Corner,
    Tail,
}

/// Asset and rotation chosen for one segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub tile: TileKind,
    /// Direction vector the rotation was derived from
    pub direction: (i32, i32),
    pub degrees: f32,
}

impl Orientation {
    fn new(tile: TileKind, direction: (i32, i32)) -> Self {
        Self {
            tile,
            direction,
            degrees: angle_degrees(direction),
        }
    }
}

/// Signed angle from the right-facing unit vector to `direction`.
pub fn angle_degrees((dx, dy): (i32, i32)) -> f32 {
    (dy as f32).atan2(dx as f32).to_degrees()
}

/// Rotate a grid vector by +90 degrees, the same sense tiles rotate in.
pub fn rotate_quarter((dx, dy): (i32, i32)) -> (i32, i32) {
    (-dy, dx)
}

pub fn orient_head(head: Position, neck: Position) -> Orientation {
    Orientation::new(TileKind::Head, head.offset_from(neck))
}

pub fn orient_tail(tail: Position, before_tail: Position) -> Orientation {
    Orientation::new(TileKind::Tail, tail.offset_from(before_tail))
}

/// Orient a segment that has a neighbour on both sides.
///
/// The segment is straight when its neighbours share a row or a column on
/// the grid, otherwise it is a corner. A corner tile joins its direction
/// with that direction turned a quarter, so the direction is taken toward
/// whichever neighbour makes the quarter turn land on the other one.
pub fn orient_interior(
    prev_grid: Position,
    next_grid: Position,
    prev_abs: Position,
    self_abs: Position,
    next_abs: Position,
) -> Orientation {
    let toward_prev = prev_abs.offset_from(self_abs);

    if prev_grid.x == next_grid.x || prev_grid.y == next_grid.y {
        return Orientation::new(TileKind::Straight, toward_prev);
    }

    let (rx, ry) = rotate_quarter(toward_prev);
    if self_abs.moved_by(rx, ry) == next_abs {
        Orientation::new(TileKind::Corner, toward_prev)
    } else {
        Orientation::new(TileKind::Corner, next_abs.offset_from(self_abs))
    }
}

/// Shift, in tile units, that keeps a tile rotated about its top-left
/// corner inside its own cell.
pub fn tile_offset(degrees: f32) -> Vec2 {
    let rotated = Vec2::from_angle(degrees.to_radians()).rotate(Vec2::ONE);
    (Vec2::ONE - rotated) * 0.5
}

/// Top-left draw position of a rotated tile for a grid cell.
pub fn tile_position(cell: Position, scale: u32, tile_size: u32, degrees: f32) -> Vec2 {
    cell_origin(cell, scale) + tile_offset(degrees) * tile_size as f32
}

/// Unrotated pixel origin of a grid cell.
pub fn cell_origin(cell: Position, scale: u32) -> Vec2 {
    Vec2::new(cell.x as f32, cell.y as f32) * scale as f32
}

/// Top-left corner of the area a tile covers once drawn at `position` and
/// rotated by `degrees`. Undoes [`tile_position`] for quarter turns.
pub fn covered_origin(position: Vec2, degrees: f32, tile_size: u32) -> Vec2 {
    let size = tile_size as f32;
    let rotation = Vec2::from_angle(degrees.to_radians());
    let corners = [
        Vec2::ZERO,
        Vec2::new(size, 0.0),
        Vec2::new(0.0, size),
        Vec2::splat(size),
    ];
    let reach = corners
        .into_iter()
        .map(|corner| rotation.rotate(corner))
        .fold(Vec2::splat(f32::INFINITY), Vec2::min);
    position + reach
}
