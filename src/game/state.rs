use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A position on the game grid, or an unwrapped position off it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Fold a position that stepped one cell off the board back onto the
    /// opposite edge.
    pub fn wrapped(&self, width: usize, height: usize) -> Self {
        Self {
            x: self.x.rem_euclid(width as i32),
            y: self.y.rem_euclid(height as i32),
        }
    }

    /// Component-wise difference `self - other`
    pub fn offset_from(&self, other: Position) -> (i32, i32) {
        (self.x - other.x, self.y - other.y)
    }
}

/// One body cell: where it sits on the board and where it would be had the
/// board never wrapped. Both move together, so they can never drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub grid: Position,
    pub absolute: Position,
}

impl Segment {
    /// A segment that has not crossed an edge yet
    pub fn at(grid: Position) -> Self {
        Self {
            grid,
            absolute: grid,
        }
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    segments: Vec<Segment>,
    /// Heading for the next move
    pub direction: Direction,
    /// Heading used by the most recent move; turns are judged against it
    moved_direction: Direction,
}

impl Snake {
    /// Create a snake from explicit segments, head first
    ///
    /// # Panics
    ///
    /// Panics if fewer than two segments are given.
    pub fn from_segments(segments: Vec<Segment>, direction: Direction) -> Self {
        assert!(segments.len() >= 2, "a snake needs a head and a tail");
        Self {
            segments,
            direction,
            moved_direction: direction,
        }
    }

    /// Create a snake whose unwrapped positions coincide with its grid cells
    pub fn from_cells(cells: &[Position], direction: Direction) -> Self {
        Self::from_segments(cells.iter().copied().map(Segment::at).collect(), direction)
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.segments[0].grid
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn grid_positions(&self) -> impl ExactSizeIterator<Item = Position> + '_ {
        self.segments.iter().map(|segment| segment.grid)
    }

    pub fn absolute_positions(&self) -> impl ExactSizeIterator<Item = Position> + '_ {
        self.segments.iter().map(|segment| segment.absolute)
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.segments[1..].iter().any(|segment| segment.grid == pos)
    }

    /// Check if any segment, head included, sits on the position
    pub fn occupies(&self, pos: Position) -> bool {
        self.segments.iter().any(|segment| segment.grid == pos)
    }

    /// Request a new heading. Returns whether it was accepted.
    pub fn steer(&mut self, requested: Direction) -> bool {
        if self.moved_direction.can_turn_to(requested) {
            self.direction = requested;
            true
        } else {
            false
        }
    }

    /// Pull every segment into its predecessor's place, then move the head
    /// one cell along the heading, wrapping its grid cell at the edges.
    pub fn advance(&mut self, grid_width: usize, grid_height: usize) {
        for i in (1..self.segments.len()).rev() {
            self.segments[i] = self.segments[i - 1];
        }

        let head = &mut self.segments[0];
        head.grid = head
            .grid
            .moved_in_direction(self.direction)
            .wrapped(grid_width, grid_height);
        head.absolute = head.absolute.moved_in_direction(self.direction);
        self.moved_direction = self.direction;
    }

    /// Append a copy of the last segment; the next move pulls it into place.
    pub fn grow(&mut self) {
        let last = self.segments[self.segments.len() - 1];
        self.segments.push(last);
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// A snake always has at least two segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub grid_width: usize,
    pub grid_height: usize,
    /// Current ticks per second
    pub speed: u32,
    pub steps: u32,
}

impl GameState {
    /// Create a new game state
    pub fn new(
        snake: Snake,
        food: Position,
        grid_width: usize,
        grid_height: usize,
        speed: u32,
    ) -> Self {
        Self {
            snake,
            food,
            grid_width,
            grid_height,
            speed,
            steps: 0,
        }
    }

    /// Score shown to the player
    pub fn score(&self) -> usize {
        self.snake.len()
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }
}
