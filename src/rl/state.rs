//! Discrete state abstraction for the Q-table
//!
//! Reduces a game snapshot to 11 booleans: three relative danger flags, four
//! goal-direction flags and a one-hot heading. The encoding is what lets a
//! plain hash map stand in for a value function.

use serde::{Deserialize, Serialize};

use super::environment::Simulation;
use crate::game::{Direction, Position};

/// Number of boolean features in an [`EncodedState`]
pub const STATE_FEATURES: usize = 11;

/// Discretized observation used as a value-table key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[bool; STATE_FEATURES]", into = "[bool; STATE_FEATURES]")]
pub struct EncodedState {
    pub danger_straight: bool,
    pub danger_left: bool,
    pub danger_right: bool,
    pub goal_left: bool,
    pub goal_right: bool,
    pub goal_above: bool,
    pub goal_below: bool,
    pub heading_up: bool,
    pub heading_down: bool,
    pub heading_left: bool,
    pub heading_right: bool,
}

impl EncodedState {
    /// Flatten to the canonical feature order:
    /// dangers (straight, left, right), goal (right, left, below, above),
    /// heading (up, down, left, right).
    pub fn to_array(&self) -> [bool; STATE_FEATURES] {
        [
            self.danger_straight,
            self.danger_left,
            self.danger_right,
            self.goal_right,
            self.goal_left,
            self.goal_below,
            self.goal_above,
            self.heading_up,
            self.heading_down,
            self.heading_left,
            self.heading_right,
        ]
    }

    /// Inverse of [`EncodedState::to_array`]
    pub fn from_array(flags: [bool; STATE_FEATURES]) -> Self {
        Self {
            danger_straight: flags[0],
            danger_left: flags[1],
            danger_right: flags[2],
            goal_right: flags[3],
            goal_left: flags[4],
            goal_below: flags[5],
            goal_above: flags[6],
            heading_up: flags[7],
            heading_down: flags[8],
            heading_left: flags[9],
            heading_right: flags[10],
        }
    }
}

impl From<[bool; STATE_FEATURES]> for EncodedState {
    fn from(flags: [bool; STATE_FEATURES]) -> Self {
        Self::from_array(flags)
    }
}

impl From<EncodedState> for [bool; STATE_FEATURES] {
    fn from(state: EncodedState) -> Self {
        state.to_array()
    }
}

/// Encode the current simulation snapshot.
///
/// Pure function of the snapshot: identical snapshots give identical states.
pub fn encode_state<S: Simulation + ?Sized>(sim: &S) -> EncodedState {
    let head = sim.head();
    let goal = sim.goal();
    let heading = sim.heading();

    let dx = goal.x - head.x;
    let dy = goal.y - head.y;

    let is_dangerous = |direction: Direction| {
        let (step_x, step_y) = direction.delta();
        let cell = sim.cell_size();
        let next = head.offset(step_x * cell, step_y * cell);
        !in_bounds(next, sim.bounds()) || sim.body().iter().skip(1).any(|&seg| seg == next)
    };

    EncodedState {
        danger_straight: is_dangerous(heading),
        danger_left: is_dangerous(heading.turned_left()),
        danger_right: is_dangerous(heading.turned_right()),
        goal_left: dx < 0,
        goal_right: dx > 0,
        goal_above: dy < 0,
        goal_below: dy > 0,
        heading_up: heading == Direction::Up,
        heading_down: heading == Direction::Down,
        heading_left: heading == Direction::Left,
        heading_right: heading == Direction::Right,
    }
}

fn in_bounds(pos: Position, (width, height): (i32, i32)) -> bool {
    pos.x >= 0 && pos.x < width && pos.y >= 0 && pos.y < height
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Fixed snapshot; `advance` and `reset` are inert
    #[derive(Debug, Clone)]
    pub(crate) struct Snapshot {
        pub heading: Direction,
        pub body: Vec<Position>,
        pub goal: Position,
        pub bounds: (i32, i32),
        pub cell_size: i32,
    }

    impl Snapshot {
        /// Single-cell snake in grid units
        pub fn grid(head: Position, heading: Direction, goal: Position) -> Self {
            Self {
                heading,
                body: vec![head],
                goal,
                bounds: (20, 20),
                cell_size: 1,
            }
        }
    }

    impl Simulation for Snapshot {
        fn heading(&self) -> Direction {
            self.heading
        }
        fn set_heading(&mut self, heading: Direction) {
            self.heading = heading;
        }
        fn head(&self) -> Position {
            self.body[0]
        }
        fn body(&self) -> &[Position] {
            &self.body
        }
        fn goal(&self) -> Position {
            self.goal
        }
        fn bounds(&self) -> (i32, i32) {
            self.bounds
        }
        fn cell_size(&self) -> i32 {
            self.cell_size
        }
        fn score(&self) -> u32 {
            0
        }
        fn is_terminal(&self) -> bool {
            false
        }
        fn advance(&mut self) {}
        fn reset(&mut self) {}
    }

    #[test]
    fn test_centre_heading_right_goal_up_right() {
        let snap = Snapshot::grid(Position::new(10, 10), Direction::Right, Position::new(11, 9));
        let state = encode_state(&snap);

        assert!(!state.danger_straight);
        assert!(!state.danger_left);
        assert!(!state.danger_right);
        assert!(state.goal_right);
        assert!(state.goal_above);
        assert!(!state.goal_left);
        assert!(!state.goal_below);
        assert!(state.heading_right);
        assert!(!state.heading_up);
        assert!(!state.heading_down);
        assert!(!state.heading_left);
    }

    #[test]
    fn test_exactly_one_heading_flag() {
        for heading in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            let snap = Snapshot::grid(Position::new(5, 5), heading, Position::new(1, 1));
            let flags = encode_state(&snap).to_array();
            let set = flags[7..].iter().filter(|&&f| f).count();
            assert_eq!(set, 1, "heading {:?}", heading);
        }
    }

    #[test]
    fn test_encoding_is_pure() {
        let snap = Snapshot {
            heading: Direction::Up,
            body: vec![Position::new(3, 3), Position::new(3, 4), Position::new(2, 4)],
            goal: Position::new(7, 1),
            bounds: (10, 10),
            cell_size: 1,
        };
        assert_eq!(encode_state(&snap), encode_state(&snap.clone()));
        assert_eq!(encode_state(&snap).to_array().len(), STATE_FEATURES);
    }

    #[test]
    fn test_wall_dangers_are_relative_to_heading() {
        // Top-left corner heading up: straight (up) and left (left) are walls
        let snap = Snapshot::grid(Position::new(0, 0), Direction::Up, Position::new(5, 5));
        let state = encode_state(&snap);
        assert!(state.danger_straight);
        assert!(state.danger_left);
        assert!(!state.danger_right);

        // Same corner heading left: straight is wall, right turn goes up into wall
        let snap = Snapshot::grid(Position::new(0, 0), Direction::Left, Position::new(5, 5));
        let state = encode_state(&snap);
        assert!(state.danger_straight);
        assert!(!state.danger_left);
        assert!(state.danger_right);
    }

    #[test]
    fn test_body_dangers() {
        // Heading right with body segments above, ahead and below the head
        let snap = Snapshot {
            heading: Direction::Right,
            body: vec![
                Position::new(5, 5),
                Position::new(4, 5),
                Position::new(4, 4),
                Position::new(5, 4),
                Position::new(6, 4),
                Position::new(6, 5),
                Position::new(6, 6),
                Position::new(5, 6),
            ],
            goal: Position::new(0, 0),
            bounds: (10, 10),
            cell_size: 1,
        };
        let state = encode_state(&snap);

        assert!(state.danger_straight);
        assert!(state.danger_left);
        assert!(state.danger_right);
    }

    #[test]
    fn test_head_is_not_its_own_danger() {
        let snap = Snapshot {
            heading: Direction::Down,
            body: vec![Position::new(5, 5), Position::new(5, 4)],
            goal: Position::new(5, 9),
            bounds: (10, 10),
            cell_size: 1,
        };
        let state = encode_state(&snap);

        assert!(!state.danger_straight);
        assert!(!state.danger_left);
        assert!(!state.danger_right);
        assert!(state.goal_below);
    }

    #[test]
    fn test_pixel_geometry_matches_grid_geometry() {
        // 800x600 playfield with 20px blocks, head on the right edge
        let pixels = Snapshot {
            heading: Direction::Down,
            body: vec![Position::new(780, 300), Position::new(780, 280)],
            goal: Position::new(400, 300),
            bounds: (800, 600),
            cell_size: 20,
        };
        let grid = Snapshot {
            heading: Direction::Down,
            body: vec![Position::new(39, 15), Position::new(39, 14)],
            goal: Position::new(20, 15),
            bounds: (40, 30),
            cell_size: 1,
        };

        let state = encode_state(&pixels);
        assert_eq!(state, encode_state(&grid));
        // Heading down, a left turn faces east into the wall
        assert!(state.danger_left);
        assert!(!state.danger_right);
        assert!(state.goal_left);
        assert!(!state.goal_above && !state.goal_below);
    }

    #[test]
    fn test_array_order() {
        let snap = Snapshot::grid(Position::new(10, 10), Direction::Up, Position::new(12, 12));
        let flags = encode_state(&snap).to_array();
        assert_eq!(
            flags,
            [false, false, false, true, false, true, false, true, false, false, false]
        );
        assert_eq!(EncodedState::from_array(flags).to_array(), flags);
    }
}
