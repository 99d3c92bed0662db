use super::action::Direction;

/// Base tick rate for human play, in ticks per second
pub const BASE_SPEED: u32 = 10;

/// Upper bound on the progressive tick rate
pub const MAX_SPEED: u32 = 20;

/// A cell on the game grid. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Neighbouring cell in `direction`
    pub fn step(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }
}

/// The snake: segments head first, plus the heading used on the next tick
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    pub body: Vec<Position>,
    pub direction: Direction,
}

impl Snake {
    /// Lay out `length` segments in a straight line trailing away from `direction`
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let body = (0..length.max(1) as i32)
            .map(|i| head.offset(-dx * i, -dy * i))
            .collect();

        Self { body, direction }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Everything behind the head
    pub fn tail_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    pub fn hits_tail(&self, pos: Position) -> bool {
        self.tail_segments().contains(&pos)
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Change heading unless it would reverse onto the neck.
    ///
    /// Returns whether the heading was changed.
    pub fn steer(&mut self, direction: Direction) -> bool {
        if self.direction.is_opposite(direction) {
            return false;
        }
        self.direction = direction;
        true
    }

    /// Push a new head one cell along the heading. Unless `grow` is set the
    /// last segment is dropped and returned.
    pub fn advance(&mut self, grow: bool) -> Option<Position> {
        let next = self.head().step(self.direction);
        self.body.insert(0, next);

        if grow {
            None
        } else {
            self.body.pop()
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    Wall,
    SelfCollision,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub grid_width: usize,
    pub grid_height: usize,
    pub score: u32,
    pub steps: u32,
    pub is_alive: bool,
}

impl GameState {
    pub fn new(snake: Snake, food: Position, grid_width: usize, grid_height: usize) -> Self {
        Self {
            snake,
            food,
            grid_width,
            grid_height,
            score: 0,
            steps: 0,
            is_alive: true,
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        (0..self.grid_width as i32).contains(&pos.x) && (0..self.grid_height as i32).contains(&pos.y)
    }

    /// What the snake's current head has run into, if anything
    pub fn collision(&self) -> Option<CollisionType> {
        let head = self.snake.head();
        if !self.contains(head) {
            Some(CollisionType::Wall)
        } else if self.snake.hits_tail(head) {
            Some(CollisionType::SelfCollision)
        } else {
            None
        }
    }

    /// Ticks per second for human play; grows by one every 10 points
    pub fn speed(&self) -> u32 {
        (BASE_SPEED + self.score / 10).min(MAX_SPEED)
    }
}
