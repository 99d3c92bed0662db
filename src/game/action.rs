/// Compass direction the snake can move in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    /// Returns the delta (dx, dy) for moving in this direction.
    ///
    /// Screen coordinates: y grows downward.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Direction after a 90-degree counter-clockwise turn (as seen on screen)
    pub fn turned_left(&self) -> Direction {
        match self {
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
        }
    }

    /// Direction after a 90-degree clockwise turn (as seen on screen)
    pub fn turned_right(&self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }
}

/// Relative action chosen by the agent.
///
/// Turns are relative to the current heading, never absolute compass
/// directions, so a reversal is impossible by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Straight,
    TurnLeft,
    TurnRight,
}

impl Action {
    /// Number of actions in the discrete action space
    pub const COUNT: usize = 3;

    /// All actions in index order
    pub const ALL: [Action; Action::COUNT] = [Action::Straight, Action::TurnLeft, Action::TurnRight];

    /// Convert a discrete action index to an action.
    ///
    /// - 0 → Straight
    /// - 1 → TurnLeft
    /// - 2 → TurnRight
    /// - other → Straight (default)
    pub fn from_index(idx: usize) -> Action {
        match idx {
            1 => Action::TurnLeft,
            2 => Action::TurnRight,
            _ => Action::Straight,
        }
    }

    /// Index of this action in the value table
    pub fn index(&self) -> usize {
        match self {
            Action::Straight => 0,
            Action::TurnLeft => 1,
            Action::TurnRight => 2,
        }
    }

    /// Heading that results from applying this action to `heading`
    pub fn apply(&self, heading: Direction) -> Direction {
        match self {
            Action::Straight => heading,
            Action::TurnLeft => heading.turned_left(),
            Action::TurnRight => heading.turned_right(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_DIRECTIONS: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    #[test]
    fn test_opposite_directions() {
        assert!(Direction::Up.is_opposite(Direction::Down));
        assert!(Direction::Down.is_opposite(Direction::Up));
        assert!(Direction::Left.is_opposite(Direction::Right));
        assert!(Direction::Right.is_opposite(Direction::Left));

        assert!(!Direction::Up.is_opposite(Direction::Left));
        assert!(!Direction::Up.is_opposite(Direction::Right));
    }

    #[test]
    fn test_direction_delta() {
        assert_eq!(Direction::Up.delta(), (0, -1));
        assert_eq!(Direction::Down.delta(), (0, 1));
        assert_eq!(Direction::Left.delta(), (-1, 0));
        assert_eq!(Direction::Right.delta(), (1, 0));
    }

    #[test]
    fn test_turns_rotate_delta_by_ninety_degrees() {
        for dir in ALL_DIRECTIONS {
            let (dx, dy) = dir.delta();
            assert_eq!(dir.turned_left().delta(), (dy, -dx));
            assert_eq!(dir.turned_right().delta(), (-dy, dx));
        }
    }

    #[test]
    fn test_left_then_right_is_identity() {
        for dir in ALL_DIRECTIONS {
            assert_eq!(dir.turned_left().turned_right(), dir);
            assert_eq!(
                dir.turned_left().turned_left().turned_left().turned_left(),
                dir
            );
        }
    }

    #[test]
    fn test_action_indices() {
        assert_eq!(Action::from_index(0), Action::Straight);
        assert_eq!(Action::from_index(1), Action::TurnLeft);
        assert_eq!(Action::from_index(2), Action::TurnRight);
        assert_eq!(Action::from_index(7), Action::Straight);

        for action in Action::ALL {
            assert_eq!(Action::from_index(action.index()), action);
        }
    }

    #[test]
    fn test_action_never_reverses() {
        for dir in ALL_DIRECTIONS {
            for action in Action::ALL {
                assert!(!dir.is_opposite(action.apply(dir)));
            }
        }
        assert_eq!(Action::TurnLeft.apply(Direction::Up), Direction::Left);
        assert_eq!(Action::TurnRight.apply(Direction::Up), Direction::Right);
    }
}
