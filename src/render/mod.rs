pub mod geometry;
pub mod renderer;

pub use geometry::{Orientation, TileKind};
pub use renderer::{Renderer, SegmentDraw};
