//! Core value types for the racetrack domain.
//!
//! A [`State`] pairs a grid position with a velocity. Positions use screen
//! coordinates: `x` grows rightward, `y` grows downward. Velocity is capped at
//! [`MAX_SPEED`] cells per timestep on each axis.

use serde::{Deserialize, Serialize};

/// Hard cap on per-axis velocity magnitude.
pub const MAX_SPEED: i32 = 5;

/// A control input: an acceleration delta of -1, 0, or +1 on each axis.
///
/// The enumeration order of [`LEGAL_ACTIONS`] is fixed and significant:
/// argmax loops break ties in favor of the first action in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    UpLeft,
    Up,
    UpRight,
    Left,
    Coast,
    Right,
    DownLeft,
    Down,
    DownRight,
}

/// Every legal action, in tie-breaking order.
pub const LEGAL_ACTIONS: [Action; 9] = [
    Action::UpLeft,
    Action::Up,
    Action::UpRight,
    Action::Left,
    Action::Coast,
    Action::Right,
    Action::DownLeft,
    Action::Down,
    Action::DownRight,
];

impl Action {
    /// The `(ax, ay)` acceleration applied to velocity when this action succeeds.
    pub fn acceleration(self) -> (i32, i32) {
        match self {
            Action::UpLeft => (-1, -1),
            Action::Up => (0, -1),
            Action::UpRight => (1, -1),
            Action::Left => (-1, 0),
            Action::Coast => (0, 0),
            Action::Right => (1, 0),
            Action::DownLeft => (-1, 1),
            Action::Down => (0, 1),
            Action::DownRight => (1, 1),
        }
    }
}

/// Classification of a single map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Open,
    Wall,
    Start,
    Goal,
}

/// An immutable agent state: grid position plus per-axis velocity.
///
/// States are plain values: equal iff both components are equal, hashable for
/// use as table keys, and never mutated after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct State {
    position: (i32, i32),
    velocity: (i32, i32),
}

impl State {
    pub fn new(position: (i32, i32), velocity: (i32, i32)) -> Self {
        Self { position, velocity }
    }

    /// A state at rest on the given cell.
    pub fn at_rest(position: (i32, i32)) -> Self {
        Self::new(position, (0, 0))
    }

    pub fn position(&self) -> (i32, i32) {
        self.position
    }

    pub fn velocity(&self) -> (i32, i32) {
        self.velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_order_is_stable() {
        assert_eq!(LEGAL_ACTIONS[0], Action::UpLeft);
        assert_eq!(LEGAL_ACTIONS[4], Action::Coast);
        assert_eq!(LEGAL_ACTIONS[8], Action::DownRight);
        assert_eq!(LEGAL_ACTIONS.len(), 9);
    }

    #[test]
    fn state_equality_and_hashing() {
        use std::collections::HashMap;

        let a = State::new((1, 2), (0, -1));
        let b = State::new((1, 2), (0, -1));
        let c = State::new((1, 2), (0, 0));
        assert_eq!(a, b);
        assert_ne!(a, c);

        let mut map = HashMap::new();
        map.insert(a, 1.0);
        assert_eq!(map.get(&b), Some(&1.0));
        assert_eq!(map.get(&c), None);
    }
}
