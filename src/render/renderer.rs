use glam::Vec2;
use ratatui::style::Color;

use super::geometry::{
    cell_origin, orient_head, orient_interior, orient_tail, tile_position, Orientation, TileKind,
};
use crate::game::{GameConfig, GameState, Position, Snake};
use crate::metrics::GameMetrics;
use crate::platform::{Platform, Texture};

const GRASS_LIGHT: Color = Color::Rgb(173, 214, 68);
const GRASS_DARK: Color = Color::Rgb(166, 209, 60);
const SCORE_COLOR: Color = Color::Rgb(245, 245, 245);
const FPS_COLOR: Color = Color::Rgb(80, 80, 80);

/// Draw instruction for one snake segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentDraw {
    pub cell: Position,
    pub orientation: Orientation,
    /// Top-left corner to hand to the platform, already corrected for rotation
    pub position: Vec2,
}

impl SegmentDraw {
    pub fn tile(&self) -> TileKind {
        self.orientation.tile
    }
}

pub struct Renderer {
    grid_width: usize,
    grid_height: usize,
    scale: u32,
    tile_size: u32,
}

impl Renderer {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            grid_width: config.grid_width,
            grid_height: config.grid_height,
            scale: config.scale,
            tile_size: config.tile_size,
        }
    }

    /// Tile, rotation and placement for every segment, head first.
    pub fn segment_draws(&self, snake: &Snake) -> Vec<SegmentDraw> {
        let segments = snake.segments();
        let last = segments.len() - 1;

        segments
            .iter()
            .enumerate()
            .map(|(i, segment)| {
                let orientation = if i == 0 {
                    orient_head(segment.absolute, segments[1].absolute)
                } else if i == last {
                    orient_tail(segment.absolute, segments[i - 1].absolute)
                } else {
                    orient_interior(
                        segments[i - 1].grid,
                        segments[i + 1].grid,
                        segments[i - 1].absolute,
                        segment.absolute,
                        segments[i + 1].absolute,
                    )
                };
                SegmentDraw {
                    cell: segment.grid,
                    orientation,
                    position: tile_position(
                        segment.grid,
                        self.scale,
                        self.tile_size,
                        orientation.degrees,
                    ),
                }
            })
            .collect()
    }

    /// Food is drawn unrotated at its cell origin
    pub fn food_position(&self, food: Position) -> Vec2 {
        cell_origin(food, self.scale)
    }

    pub fn render<P: Platform>(&self, platform: &mut P, state: &GameState, metrics: &GameMetrics) {
        self.render_background(platform);

        for draw in self.segment_draws(&state.snake) {
            platform.draw_textured_rect(
                Texture::from(draw.tile()),
                draw.position,
                draw.orientation.degrees,
            );
        }
        platform.draw_textured_rect(Texture::Apple, self.food_position(state.food), 0.0);

        self.render_stats(platform, state, metrics);
    }

    /// Checkerboard grass: odd cells get the darker shade
    fn render_background<P: Platform>(&self, platform: &mut P) {
        platform.clear(GRASS_LIGHT);
        let size = Vec2::splat(self.scale as f32);
        for y in 0..self.grid_height {
            for x in (y % 2..self.grid_width).step_by(2) {
                let cell = Position::new(x as i32, y as i32);
                platform.draw_rect(cell_origin(cell, self.scale), size, GRASS_DARK);
            }
        }
    }

    fn render_stats<P: Platform>(&self, platform: &mut P, state: &GameState, metrics: &GameMetrics) {
        platform.draw_text(
            &format!("Score: {}", state.score()),
            Vec2::new(5.0, 5.0),
            20,
            SCORE_COLOR,
        );
        let right = (self.grid_width as u32 * self.scale) as f32;
        platform.draw_text(
            &metrics.format_fps(),
            Vec2::new(right - 80.0, 5.0),
            20,
            FPS_COLOR,
        );
    }

    /// Centred banner drawn over whatever is already on screen
    pub fn render_banner<P: Platform>(&self, platform: &mut P, text: &str) {
        let center = Vec2::new(
            (self.grid_width as u32 * self.scale) as f32,
            (self.grid_height as u32 * self.scale) as f32,
        ) / 2.0;
        platform.draw_text(text, center - Vec2::new(120.0, 20.0), 40, Color::White);
    }
}
