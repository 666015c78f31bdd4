//! Direction and axis types for face and rotation handling.

use serde::{Deserialize, Serialize};

/// The six face directions. Java and Bedrock share the names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl Direction {
    /// All six directions in order.
    pub const ALL: [Direction; 6] = [
        Direction::Down,
        Direction::Up,
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Get the axis this direction is on.
    pub fn axis(&self) -> Axis {
        match self {
            Direction::Down | Direction::Up => Axis::Y,
            Direction::North | Direction::South => Axis::Z,
            Direction::West | Direction::East => Axis::X,
        }
    }

    /// Whether this face lies in a horizontal plane (`up`/`down`).
    pub fn is_vertical(&self) -> bool {
        self.axis() == Axis::Y
    }

    /// Lowercase name, as used in JSON keys.
    pub fn name(&self) -> &'static str {
        match self {
            Direction::Down => "down",
            Direction::Up => "up",
            Direction::North => "north",
            Direction::South => "south",
            Direction::West => "west",
            Direction::East => "east",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The three axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Component index of this axis in a 3-vector.
    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_axis() {
        assert_eq!(Direction::Up.axis(), Axis::Y);
        assert_eq!(Direction::North.axis(), Axis::Z);
        assert_eq!(Direction::East.axis(), Axis::X);
        assert!(Direction::Down.is_vertical());
        assert!(!Direction::West.is_vertical());
    }

    #[test]
    fn test_direction_serde_names() {
        let dir: Direction = serde_json::from_str("\"south\"").unwrap();
        assert_eq!(dir, Direction::South);
        assert_eq!(serde_json::to_string(&Direction::West).unwrap(), "\"west\"");
        assert_eq!(Direction::East.to_string(), "east");
    }

    #[test]
    fn test_axis_index() {
        assert_eq!(Axis::X.index(), 0);
        assert_eq!(Axis::Y.index(), 1);
        assert_eq!(Axis::Y.to_string(), "y");
    }
}
