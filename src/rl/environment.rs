use crate::game::{Direction, GameConfig, GameEngine, GameState, Position};

/// Narrow view of a running game used by the learning code.
///
/// Positions, bounds and cell size share one unit: a simulation may work in
/// grid cells (cell size 1) or in pixels (cell size = block size).
pub trait Simulation {
    /// Current heading of the snake
    fn heading(&self) -> Direction;

    /// Replace the heading used by the next `advance`
    fn set_heading(&mut self, heading: Direction);

    /// Head position
    fn head(&self) -> Position;

    /// All body segments, head first
    fn body(&self) -> &[Position];

    /// Goal (food) position
    fn goal(&self) -> Position;

    /// Playfield (width, height); valid positions are `[0, w) x [0, h)`
    fn bounds(&self) -> (i32, i32);

    /// Distance the head travels in one tick
    fn cell_size(&self) -> i32;

    /// Cumulative score of the current episode
    fn score(&self) -> u32;

    /// Whether the current episode has ended
    fn is_terminal(&self) -> bool;

    /// Advance the game by one tick
    fn advance(&mut self);

    /// Restore the initial spawn state
    fn reset(&mut self);
}

/// Snake environment for reinforcement learning
///
/// Wraps the grid-based game engine and exposes it through [`Simulation`].
/// Positions are grid cells, so the cell size is 1.
pub struct SnakeEnvironment {
    engine: GameEngine,
    state: GameState,
}

impl SnakeEnvironment {
    /// Create a new Snake environment
    pub fn new(config: GameConfig) -> Self {
        let mut engine = GameEngine::new(config);
        let state = engine.reset();
        Self { engine, state }
    }

    /// Create an environment starting from a hand-built state
    pub fn from_state(config: GameConfig, state: GameState) -> Self {
        Self {
            engine: GameEngine::new(config),
            state,
        }
    }

    /// Get reference to current game state (for rendering/testing)
    pub fn state(&self) -> &GameState {
        &self.state
    }
}

impl Simulation for SnakeEnvironment {
    fn heading(&self) -> Direction {
        self.state.snake.direction
    }

    fn set_heading(&mut self, heading: Direction) {
        self.state.snake.direction = heading;
    }

    fn head(&self) -> Position {
        self.state.snake.head()
    }

    fn body(&self) -> &[Position] {
        &self.state.snake.body
    }

    fn goal(&self) -> Position {
        self.state.food
    }

    fn bounds(&self) -> (i32, i32) {
        (self.state.grid_width as i32, self.state.grid_height as i32)
    }

    fn cell_size(&self) -> i32 {
        1
    }

    fn score(&self) -> u32 {
        self.state.score
    }

    fn is_terminal(&self) -> bool {
        !self.state.is_alive
    }

    fn advance(&mut self) {
        self.engine.step(&mut self.state);
    }

    fn reset(&mut self) {
        self.state = self.engine.reset();
    }
}
