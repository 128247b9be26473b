use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use glam::Vec2;
use ratatui::{
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, BorderType, Borders, Widget},
    Terminal,
};
use std::io::{stderr, Stderr};
use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, error};

use super::glyphs::{glyph, CELL_COLUMNS};
use super::{DrawCall, Platform, Texture};
use crate::game::GameConfig;
use crate::render::geometry::covered_origin;

const SNAKE_COLOR: Color = Color::Rgb(72, 118, 255);
const APPLE_COLOR: Color = Color::Rgb(231, 71, 29);

/// Draws the board into the alternate screen of the controlling terminal,
/// one grid cell per two character columns.
pub struct TerminalPlatform {
    terminal: Terminal<CrosstermBackend<Stderr>>,
    scale: u32,
    tile_size: u32,
    grid_width: u16,
    grid_height: u16,
    calls: Vec<DrawCall>,
    ticker: Interval,
}

impl TerminalPlatform {
    /// Take over the terminal. Call [`TerminalPlatform::restore`] before exiting.
    pub fn new(config: &GameConfig) -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        undo_on_error(Self::enter(config), || {
            let raw = disable_raw_mode();
            execute!(stderr(), LeaveAlternateScreen).and(raw)
        })
    }

    /// Setup that runs once raw mode is on
    fn enter(config: &GameConfig) -> Result<Self> {
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        Ok(Self {
            terminal,
            scale: config.scale,
            tile_size: config.tile_size,
            grid_width: u16::try_from(config.grid_width).context("Grid too wide")?,
            grid_height: u16::try_from(config.grid_height).context("Grid too tall")?,
            calls: Vec::new(),
            ticker: pacing(config.base_rate),
        })
    }

    pub fn restore(&mut self) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        self.terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// Hand back `result`, running `undo` first if it failed. The setup error is
/// the one reported; a failing `undo` is only logged.
fn undo_on_error<T>(result: Result<T>, undo: impl FnOnce() -> std::io::Result<()>) -> Result<T> {
    if result.is_err() {
        if let Err(err) = undo() {
            error!(%err, "failed to restore terminal after setup error");
        }
    }
    result
}

/// Ticker whose first tick lands one full period from now
fn pacing(ticks_per_second: u32) -> Interval {
    let period = Duration::from_secs_f64(1.0 / f64::from(ticks_per_second.max(1)));
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

impl Platform for TerminalPlatform {
    fn poll_next_key_event(&mut self) -> Result<Option<KeyEvent>> {
        while event::poll(Duration::ZERO).context("Failed to poll terminal events")? {
            if let Event::Key(key) = event::read().context("Failed to read terminal event")? {
                // Only process key press events, not release
                if key.kind == KeyEventKind::Press {
                    return Ok(Some(key));
                }
            }
        }
        Ok(None)
    }

    fn begin_frame(&mut self) {}

    fn clear(&mut self, color: Color) {
        self.calls.clear();
        self.calls.push(DrawCall::Clear(color));
    }

    fn draw_textured_rect(&mut self, texture: Texture, position: Vec2, rotation_degrees: f32) {
        self.calls.push(DrawCall::Texture {
            texture,
            position,
            rotation: rotation_degrees,
        });
    }

    fn draw_rect(&mut self, position: Vec2, size: Vec2, color: Color) {
        self.calls.push(DrawCall::Rect {
            position,
            size,
            color,
        });
    }

    fn draw_text(&mut self, text: &str, position: Vec2, size: u16, color: Color) {
        self.calls.push(DrawCall::Text {
            text: text.to_owned(),
            position,
            size,
            color,
        });
    }

    fn end_frame(&mut self) -> Result<()> {
        let board = BoardView {
            calls: &self.calls,
            scale: self.scale as f32,
            tile_size: self.tile_size,
            columns: self.grid_width * CELL_COLUMNS,
            rows: self.grid_height,
        };
        self.terminal
            .draw(|frame| frame.render_widget(board, frame.area()))
            .context("Failed to draw frame")?;
        Ok(())
    }

    fn set_target_rate(&mut self, ticks_per_second: u32) {
        debug!(ticks_per_second, "frame pacing changed");
        self.ticker = pacing(ticks_per_second);
    }

    async fn wait_next_frame(&mut self) {
        self.ticker.tick().await;
    }

    async fn sleep(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// One frame's draw calls laid out on the character grid
struct BoardView<'a> {
    calls: &'a [DrawCall],
    scale: f32,
    tile_size: u32,
    columns: u16,
    rows: u16,
}

impl BoardView<'_> {
    /// Character cell for a pixel position, if it lands on the board
    fn cell(&self, board: Rect, pixel: Vec2) -> Option<(u16, u16)> {
        let cell = (pixel / self.scale).floor();
        if cell.x < 0.0 || cell.y < 0.0 {
            return None;
        }
        let x = board.x + (cell.x as u16).checked_mul(CELL_COLUMNS)?;
        let y = board.y + cell.y as u16;
        (x < board.right() && y < board.bottom()).then_some((x, y))
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

impl Widget for BoardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let outer = centered(area, self.columns + 2, self.rows + 2);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Color::White))
            .title(" Snake ");
        let board = block.inner(outer);
        block.render(outer, buf);

        for call in self.calls {
            match call {
                DrawCall::Clear(color) => buf.set_style(board, Style::default().bg(*color)),
                DrawCall::Rect {
                    position,
                    size,
                    color,
                } => {
                    let Some((x, y)) = self.cell(board, *position) else {
                        continue;
                    };
                    let columns = ((size.x / self.scale).round() as u16) * CELL_COLUMNS;
                    let rows = (size.y / self.scale).round() as u16;
                    let rect = Rect::new(x, y, columns, rows).intersection(board);
                    buf.set_style(rect, Style::default().bg(*color));
                }
                DrawCall::Texture {
                    texture,
                    position,
                    rotation,
                } => {
                    let origin = covered_origin(*position, *rotation, self.tile_size);
                    // nudge off the cell edge so float error cannot floor into the neighbour
                    let Some((x, y)) = self.cell(board, origin + Vec2::splat(0.5)) else {
                        continue;
                    };
                    let color = match texture {
                        Texture::Apple => APPLE_COLOR,
                        _ => SNAKE_COLOR,
                    };
                    let width = usize::from(board.right() - x);
                    buf.set_stringn(
                        x,
                        y,
                        glyph(*texture, *rotation),
                        width,
                        Style::default().fg(color),
                    );
                }
                DrawCall::Text {
                    text,
                    position,
                    color,
                    ..
                } => {
                    let Some((x, y)) = self.cell(board, *position) else {
                        continue;
                    };
                    let width = usize::from(board.right() - x);
                    buf.set_stringn(x, y, text, width, Style::default().fg(*color));
                }
            }
        }
    }
}
