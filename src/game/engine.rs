use super::{
    action::Direction,
    config::GameConfig,
    state::{GameState, Position, Snake},
};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use tracing::{debug, info, warn};

/// Food position used when no cell is free. The head never reaches it and
/// the platforms clip it.
const OFF_BOARD: Position = Position::new(-1, -1);

/// Terminal events a step can end with. Both are followed by a full reset
/// before `step` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    /// The head ran into another segment
    Collision { length: usize },
    /// The snake filled every cell, leaving nowhere to put food
    BoardFull { length: usize },
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// New ticks per second, if the step changed it
    pub speed_changed: Option<u32>,
    /// Terminal event, if one occurred
    pub event: Option<StepEvent>,
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an engine whose food placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Reset the game to initial state
    pub fn reset(&mut self) -> GameState {
        let snake = Snake::from_cells(
            &[self.config.start_head, self.config.start_tail],
            self.config.start_heading,
        );

        // only an unvalidated config can leave no free cell here
        let food = self.place_food(&snake).unwrap_or_else(|| {
            warn!("no free cell for food, parking it off the board");
            OFF_BOARD
        });

        info!(?food, "new game");

        GameState::new(
            snake,
            food,
            self.config.grid_width,
            self.config.grid_height,
            self.config.base_rate,
        )
    }

    /// Pick a uniformly random cell the snake does not occupy.
    ///
    /// Samples by linear index for a bounded number of attempts, then falls
    /// back to choosing among the enumerated free cells. Returns `None` only
    /// when the snake covers the whole board.
    pub fn place_food(&mut self, snake: &Snake) -> Option<Position> {
        let cells = self.config.cell_count();
        if cells == 0 {
            return None;
        }

        for _ in 0..cells {
            let index = self.rng.gen_range(0..cells);
            let pos = self.cell_at(index);
            if !snake.occupies(pos) {
                return Some(pos);
            }
        }

        let free: Vec<Position> = (0..cells)
            .map(|index| self.cell_at(index))
            .filter(|pos| !snake.occupies(*pos))
            .collect();
        free.choose(&mut self.rng).copied()
    }

    /// Ask for a new heading. Requests along the axis already in motion are
    /// ignored; the last accepted request before a step wins.
    pub fn set_heading(&self, state: &mut GameState, requested: Direction) -> bool {
        let accepted = state.snake.steer(requested);
        if accepted {
            debug!(?requested, "heading change accepted");
        }
        accepted
    }

    /// Execute one step of the game
    pub fn step(&mut self, state: &mut GameState) -> StepResult {
        let speed_before = state.speed;
        state.snake.advance(state.grid_width, state.grid_height);
        state.steps += 1;

        let ate_food = state.snake.head() == state.food;
        if ate_food {
            state.snake.grow();
            let length = state.snake.len();

            match self.place_food(&state.snake) {
                Some(food) => state.food = food,
                None => {
                    warn!(length, "board full, nowhere left to place food");
                    *state = self.reset();
                    return StepResult {
                        ate_food,
                        speed_changed: changed(speed_before, state.speed),
                        event: Some(StepEvent::BoardFull { length }),
                    };
                }
            }

            state.speed = self.config.speed_tier(length);
            debug!(length, food = ?state.food, speed = state.speed, "ate food");
        }

        if state.snake.collides_with_body(state.snake.head()) {
            let length = state.snake.len();
            info!(length, head = ?state.snake.head(), "snake ran into itself");
            *state = self.reset();
            return StepResult {
                ate_food,
                speed_changed: changed(speed_before, state.speed),
                event: Some(StepEvent::Collision { length }),
            };
        }

        StepResult {
            ate_food,
            speed_changed: changed(speed_before, state.speed),
            event: None,
        }
    }

    fn cell_at(&self, index: usize) -> Position {
        let width = self.config.grid_width;
        Position::new((index % width) as i32, (index / width) as i32)
    }
}

fn changed(before: u32, after: u32) -> Option<u32> {
    (before != after).then_some(after)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GameEngine {
        GameEngine::with_seed(GameConfig::default(), 7)
    }

    fn cells(state: &GameState) -> Vec<Position> {
        state.snake.grid_positions().collect()
    }

    #[test]
    fn test_reset() {
        let mut engine = engine();
        let state = engine.reset();

        assert_eq!(state.snake.len(), 2);
        assert_eq!(
            cells(&state),
            vec![Position::new(10, 10), Position::new(9, 10)]
        );
        assert_eq!(state.snake.direction, Direction::Right);
        assert_eq!(state.speed, 16);
        assert_eq!(state.steps, 0);
        assert!(!state.snake.occupies(state.food));
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = engine();
        let mut state = engine.reset();
        state.food = Position::new(0, 0);

        let result = engine.step(&mut state);

        assert!(!result.ate_food);
        assert_eq!(result.event, None);
        assert_eq!(result.speed_changed, None);
        assert_eq!(state.steps, 1);
        assert_eq!(state.snake.head(), Position::new(11, 10));
    }

    #[test]
    fn test_end_to_end_growth() {
        let mut engine = engine();
        let mut state = engine.reset();

        state.food = Position::new(11, 10);
        let result = engine.step(&mut state);
        assert!(result.ate_food);
        // eating the first food grows the snake to three
        assert_eq!(state.snake.len(), 3);

        let mut state = engine.reset();
        state.food = Position::new(20, 0);
        engine.step(&mut state);
        assert_eq!(
            cells(&state),
            vec![Position::new(11, 10), Position::new(10, 10)]
        );

        state.food = Position::new(12, 10);
        let result = engine.step(&mut state);

        assert!(result.ate_food);
        assert_eq!(
            cells(&state),
            vec![
                Position::new(12, 10),
                Position::new(11, 10),
                Position::new(11, 10)
            ]
        );

        // the duplicate is pulled onto the vacated cell by the next move
        state.food = Position::new(0, 0);
        engine.step(&mut state);
        assert_eq!(
            cells(&state),
            vec![
                Position::new(13, 10),
                Position::new(12, 10),
                Position::new(11, 10)
            ]
        );
    }

    #[test]
    fn test_length_grows_exactly_when_food_is_eaten() {
        let mut engine = engine();
        let mut state = engine.reset();
        let turns = [Direction::Down, Direction::Left, Direction::Up, Direction::Right];

        for tick in 0..400 {
            if tick % 7 == 0 {
                engine.set_heading(&mut state, turns[(tick / 7) % turns.len()]);
            }
            let before = state.snake.len();
            let next_head = state
                .snake
                .head()
                .moved_in_direction(state.snake.direction)
                .wrapped(state.grid_width, state.grid_height);
            let will_eat = next_head == state.food;

            let result = engine.step(&mut state);
            if result.event.is_some() {
                assert_eq!(state.snake.len(), 2);
                continue;
            }

            assert_eq!(result.ate_food, will_eat);
            if will_eat {
                assert_eq!(state.snake.len(), before + 1);
            } else {
                assert_eq!(state.snake.len(), before);
            }
            assert_eq!(
                state.snake.grid_positions().len(),
                state.snake.absolute_positions().len()
            );
        }
    }

    #[test]
    fn test_wraps_at_each_edge() {
        let config = GameConfig::default();
        let mut engine = engine();
        let cases = [
            (Position::new(31, 4), Direction::Right, Position::new(0, 4)),
            (Position::new(0, 4), Direction::Left, Position::new(31, 4)),
            (Position::new(6, 17), Direction::Down, Position::new(6, 0)),
            (Position::new(6, 0), Direction::Up, Position::new(6, 17)),
        ];

        for (head, direction, expected) in cases {
            let (dx, dy) = direction.delta();
            let snake = Snake::from_cells(&[head, head.moved_by(-dx, -dy)], direction);
            let mut state = GameState::new(snake, Position::new(15, 9), 32, 18, config.base_rate);

            engine.step(&mut state);

            assert_eq!(state.snake.head(), expected);
            assert_eq!(state.snake.segments()[0].absolute, head.moved_by(dx, dy));
        }
    }

    #[test]
    fn test_prevent_reversal() {
        let engine = engine();
        let mut state = GameEngine::with_seed(GameConfig::default(), 1).reset();

        assert!(!engine.set_heading(&mut state, Direction::Left));
        assert_eq!(state.snake.direction, Direction::Right);

        assert!(engine.set_heading(&mut state, Direction::Up));
        assert_eq!(state.snake.direction, Direction::Up);

        let mut state = GameEngine::with_seed(GameConfig::default(), 1).reset();
        assert!(engine.set_heading(&mut state, Direction::Down));
        assert_eq!(state.snake.direction, Direction::Down);
    }

    #[test]
    fn test_last_accepted_turn_in_a_tick_wins() {
        let mut engine = engine();
        let mut state = engine.reset();
        state.food = Position::new(0, 0);

        engine.set_heading(&mut state, Direction::Up);
        engine.set_heading(&mut state, Direction::Left);
        engine.set_heading(&mut state, Direction::Down);
        engine.step(&mut state);

        assert_eq!(state.snake.head(), Position::new(10, 11));
    }

    #[test]
    fn test_self_collision_resets() {
        let mut engine = engine();
        let snake = Snake::from_cells(
            &[Position::new(5, 5), Position::new(4, 5), Position::new(3, 5)],
            Direction::Left,
        );
        let mut state = GameState::new(snake, Position::new(20, 2), 32, 18, 16);

        let result = engine.step(&mut state);

        assert_eq!(result.event, Some(StepEvent::Collision { length: 3 }));
        assert_eq!(state.snake.len(), 2);
        assert_eq!(state.snake.direction, Direction::Right);
        assert_eq!(state.snake.head(), Position::new(10, 10));
    }

    #[test]
    fn test_collision_restores_base_speed() {
        let mut engine = engine();
        let cells: Vec<Position> = (0..9).map(|x| Position::new(12 - x, 3)).collect();
        let snake = Snake::from_cells(&cells, Direction::Left);
        let mut state = GameState::new(snake, Position::new(20, 12), 32, 18, 18);

        let result = engine.step(&mut state);

        assert!(matches!(result.event, Some(StepEvent::Collision { .. })));
        assert_eq!(result.speed_changed, Some(16));
        assert_eq!(state.speed, 16);
    }

    #[test]
    fn test_speed_rises_with_length() {
        let mut engine = engine();
        let cells: Vec<Position> = (0..3).map(|x| Position::new(12 - x, 3)).collect();
        let snake = Snake::from_cells(&cells, Direction::Right);
        let mut state = GameState::new(snake, Position::new(13, 3), 32, 18, 16);

        let result = engine.step(&mut state);

        assert!(result.ate_food);
        assert_eq!(state.snake.len(), 4);
        assert_eq!(result.speed_changed, Some(17));
        assert_eq!(state.speed, 17);
    }

    #[test]
    fn test_food_never_lands_on_snake() {
        let mut engine = GameEngine::with_seed(GameConfig::with_grid(12, 12), 99);
        let cells: Vec<Position> = (0..12)
            .flat_map(|y| (0..12).map(move |x| Position::new(x, y)))
            .filter(|pos| (pos.x + pos.y) % 5 != 0)
            .collect();
        let snake = Snake::from_cells(&cells, Direction::Right);

        for _ in 0..500 {
            let food = engine.place_food(&snake).unwrap();
            assert!(!snake.occupies(food));
            assert!((food.x + food.y) % 5 == 0);
        }
    }

    #[test]
    fn test_place_food_finds_last_free_cell() {
        let config = GameConfig::with_grid(4, 1);
        let mut engine = GameEngine::with_seed(config, 3);
        let snake = Snake::from_cells(
            &[Position::new(0, 0), Position::new(1, 0), Position::new(3, 0)],
            Direction::Left,
        );

        assert_eq!(engine.place_food(&snake), Some(Position::new(2, 0)));
    }

    #[test]
    fn test_place_food_on_full_board() {
        let mut engine = GameEngine::with_seed(GameConfig::with_grid(2, 1), 3);
        let snake =
            Snake::from_cells(&[Position::new(0, 0), Position::new(1, 0)], Direction::Left);

        assert_eq!(engine.place_food(&snake), None);
    }

    #[test]
    fn test_reset_without_free_cell_keeps_food_off_snake() {
        let config = GameConfig {
            start_head: Position::new(1, 0),
            start_tail: Position::new(0, 0),
            ..GameConfig::with_grid(2, 1)
        };
        assert!(config.validate().is_err());
        let mut engine = GameEngine::with_seed(config, 8);

        let state = engine.reset();

        assert!(!state.snake.occupies(state.food));
        assert!(!state.is_in_bounds(state.food));
    }

    #[test]
    fn test_filling_the_board_resets() {
        let config = GameConfig {
            start_head: Position::new(1, 0),
            start_tail: Position::new(0, 0),
            ..GameConfig::with_grid(3, 1)
        };
        let mut engine = GameEngine::with_seed(config, 5);
        let mut state = engine.reset();
        assert_eq!(state.food, Position::new(2, 0));

        // just grew, so the tail does not vacate a cell on this move
        state.snake = Snake::from_cells(
            &[Position::new(1, 0), Position::new(0, 0), Position::new(0, 0)],
            Direction::Right,
        );
        let result = engine.step(&mut state);

        assert!(result.ate_food);
        assert_eq!(result.event, Some(StepEvent::BoardFull { length: 4 }));
        assert_eq!(state.snake.len(), 2);
        assert_eq!(state.food, Position::new(2, 0));
    }
}
