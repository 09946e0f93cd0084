//! Direction of travel along the corridor.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two opposing directions a train can run along the corridor.
///
/// Both directions traverse the same physical sections, in mirror-image order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Both directions, `Up` first.
    pub const ALL: [Direction; 2] = [Direction::Up, Direction::Down];

    /// Returns the opposing direction.
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Returns the lowercase name used in fixtures and JSON bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
