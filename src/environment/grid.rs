//! Grid geometry shared by every environment

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    types::{Action, State},
};

/// Compass move on a rectangular grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Move one cell, clamping at the grid boundary.
    pub fn apply(self, row: usize, col: usize, rows: usize, cols: usize) -> (usize, usize) {
        match self {
            Direction::North => (row.saturating_sub(1), col),
            Direction::East => (row, (col + 1).min(cols - 1)),
            Direction::South => ((row + 1).min(rows - 1), col),
            Direction::West => (row, col.saturating_sub(1)),
        }
    }

    /// Arrow glyph for policy rendering.
    pub fn arrow(self) -> char {
        match self {
            Direction::North => '↑',
            Direction::East => '→',
            Direction::South => '↓',
            Direction::West => '←',
        }
    }
}

/// Label attached to a special grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellLabel {
    Start,
    Goal,
    Hazard,
    Hole,
    Food,
    Water,
    Exit,
    /// Named pick-up/drop-off point
    Landmark(char),
}

impl CellLabel {
    pub fn glyph(self) -> char {
        match self {
            CellLabel::Start => 'S',
            CellLabel::Goal => 'G',
            CellLabel::Hazard => 'C',
            CellLabel::Hole => 'H',
            CellLabel::Food => 'F',
            CellLabel::Water => 'W',
            CellLabel::Exit => 'E',
            CellLabel::Landmark(name) => name,
        }
    }
}

impl fmt::Display for CellLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// Environment-specific data attached to a visualization snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnvironmentDetail {
    Plain,
    Dispatch {
        passenger: usize,
        destination: usize,
    },
    Forage {
        has_eaten: bool,
        has_drunk: bool,
        food: usize,
        water: usize,
    },
}

pub(crate) fn check_action(action: Action, num_actions: usize) -> Result<()> {
    if action >= num_actions {
        return Err(Error::ActionOutOfRange {
            action,
            num_actions,
        });
    }
    Ok(())
}

pub(crate) fn check_state(state: State, num_states: usize) -> Result<()> {
    if state >= num_states {
        return Err(Error::StateOutOfRange { state, num_states });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_clamps_at_every_edge() {
        assert_eq!(Direction::North.apply(0, 2, 4, 4), (0, 2));
        assert_eq!(Direction::West.apply(1, 0, 4, 4), (1, 0));
        assert_eq!(Direction::South.apply(3, 1, 4, 4), (3, 1));
        assert_eq!(Direction::East.apply(2, 3, 4, 4), (2, 3));
        assert_eq!(Direction::East.apply(2, 1, 4, 4), (2, 2));
    }

    #[test]
    fn test_check_action_bounds() {
        assert!(check_action(3, 4).is_ok());
        assert!(matches!(
            check_action(4, 4),
            Err(Error::ActionOutOfRange {
                action: 4,
                num_actions: 4
            })
        ));
    }
}
