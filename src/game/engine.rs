use super::{
    action::Direction,
    config::GameConfig,
    state::{CollisionType, GameState, Position, Snake},
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::ops::Range;

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

impl StepResult {
    fn game_over(collision_type: Option<CollisionType>) -> Self {
        Self {
            terminated: true,
            info: StepInfo {
                ate_food: false,
                collision_type,
            },
        }
    }
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, rng }
    }

    /// Configuration this engine was built with
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Reset the game to initial state
    pub fn reset(&mut self) -> GameState {
        let center_x = (self.config.grid_width / 2) as i32;
        let center_y = (self.config.grid_height / 2) as i32;

        let snake = Snake::new(
            Position::new(center_x, center_y),
            Direction::Right,
            self.config.initial_snake_length,
        );

        // A validated config always leaves a free cell beside a fresh snake
        let food = self
            .spawn_food_avoid_snake(&snake)
            .unwrap_or_else(|| snake.head());

        GameState::new(snake, food, self.config.grid_width, self.config.grid_height)
    }

    /// Advance the game by one tick in the snake's current direction.
    ///
    /// The snake moves first and collisions are checked afterwards, so the
    /// cell its tail just left is safe to enter.
    pub fn step(&mut self, state: &mut GameState) -> StepResult {
        if !state.is_alive {
            return StepResult::game_over(None);
        }

        let ate_food = state.snake.head().step(state.snake.direction) == state.food;
        state.snake.advance(ate_food);
        state.steps += 1;

        if let Some(collision) = state.collision() {
            state.is_alive = false;
            return StepResult::game_over(Some(collision));
        }

        if ate_food {
            state.score += 1;
            match self.spawn_food_avoid_snake(&state.snake) {
                Some(food) => state.food = food,
                None => {
                    // Board full: nothing left to eat
                    state.is_alive = false;
                    return StepResult::game_over(None);
                }
            }
        }

        StepResult {
            terminated: false,
            info: StepInfo {
                ate_food,
                collision_type: None,
            },
        }
    }

    /// Spawn food on a random free cell inside the wall margin. When the
    /// snake covers every margin cell the whole grid is used instead; `None`
    /// means the snake fills the board.
    fn spawn_food_avoid_snake(&mut self, snake: &Snake) -> Option<Position> {
        let xs = spawn_range(self.config.grid_width, self.config.food_margin);
        let ys = spawn_range(self.config.grid_height, self.config.food_margin);

        let mut free = free_cells(snake, xs, ys);
        if free.is_empty() {
            free = free_cells(
                snake,
                0..self.config.grid_width as i32,
                0..self.config.grid_height as i32,
            );
        }

        if free.is_empty() {
            return None;
        }
        Some(free[self.rng.gen_range(0..free.len())])
    }
}

fn free_cells(snake: &Snake, xs: Range<i32>, ys: Range<i32>) -> Vec<Position> {
    ys.flat_map(|y| xs.clone().map(move |x| Position::new(x, y)))
        .filter(|&pos| !snake.occupies(pos))
        .collect()
}

/// Cells along one axis where food may spawn. Falls back to the whole axis
/// when the grid is too small for the margin.
fn spawn_range(extent: usize, margin: usize) -> Range<i32> {
    if extent > margin * 2 {
        margin as i32..(extent - margin) as i32
    } else {
        0..extent as i32
    }
}
