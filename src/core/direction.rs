use serde::{Deserialize, Serialize};

/// Cardinal walk direction, serialized in the lowercase form the server expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Classifies a raw displacement into the direction to face while walking.
    ///
    /// Horizontal wins only when |dx| is strictly larger; a tie is treated as
    /// vertical, so a perfectly diagonal hop faces up or down.
    pub fn from_displacement(dx: f32, dy: f32) -> Self {
        if dx.abs() > dy.abs() {
            if dx < 0.0 {
                Direction::Left
            } else {
                Direction::Right
            }
        } else if dy < 0.0 {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    /// Unit grid vector in screen coordinates (y grows downward).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }

    /// Single-character marker used when drawing a walking avatar.
    pub fn glyph(self) -> char {
        match self {
            Direction::Left => '<',
            Direction::Right => '>',
            Direction::Up => '^',
            Direction::Down => 'v',
        }
    }
}
