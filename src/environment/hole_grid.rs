//! Deterministic frozen lake

use std::collections::{BTreeMap, BTreeSet};

use super::grid::{CellLabel, Direction, check_action, check_state};
use crate::{
    Error, Result,
    ports::Environment,
    types::{Action, State, StepResult},
};

const ACTIONS: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];
const ACTION_LABELS: &[&str] = &["up", "right", "down", "left"];

pub const GOAL_REWARD: f64 = 1.0;

/// Grid with holes and a single rewarding goal. Moves never slip.
///
/// Falling into a hole ends the episode with reward 0; reaching the goal ends
/// it with reward +1. The start is always state 0.
#[derive(Debug, Clone)]
pub struct HoleGrid {
    rows: usize,
    cols: usize,
    holes: BTreeSet<State>,
    goal: State,
    current: State,
}

impl HoleGrid {
    /// The classic 4×4 lake with holes at 5, 7, 11, 12 and goal at 15.
    pub fn new() -> Self {
        Self {
            rows: 4,
            cols: 4,
            holes: BTreeSet::from([5, 7, 11, 12]),
            goal: 15,
            current: 0,
        }
    }

    /// Build a custom lake.
    ///
    /// # Errors
    ///
    /// Fails if the grid is empty, if the goal or any hole lies outside the
    /// grid, or if the start cell (0) or goal is also a hole.
    pub fn with_layout(
        rows: usize,
        cols: usize,
        holes: impl IntoIterator<Item = State>,
        goal: State,
    ) -> Result<Self> {
        let cells = rows * cols;
        if cells < 2 {
            return Err(Error::InvalidLayout {
                message: format!("hole grid needs at least two cells, got {rows}x{cols}"),
            });
        }
        if goal == 0 || goal >= cells {
            return Err(Error::InvalidLayout {
                message: format!("goal {goal} must lie in 1..{cells}"),
            });
        }
        let holes: BTreeSet<State> = holes.into_iter().collect();
        if let Some(&bad) = holes
            .iter()
            .find(|&&hole| hole == 0 || hole == goal || hole >= cells)
        {
            return Err(Error::InvalidLayout {
                message: format!("hole {bad} overlaps the start, the goal or the grid edge"),
            });
        }
        Ok(Self {
            rows,
            cols,
            holes,
            goal,
            current: 0,
        })
    }

    pub fn goal_state(&self) -> State {
        self.goal
    }

    pub fn is_hole(&self, state: State) -> bool {
        self.holes.contains(&state)
    }
}

impl Default for HoleGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for HoleGrid {
    fn name(&self) -> &str {
        "HoleGrid"
    }

    fn num_states(&self) -> usize {
        self.rows * self.cols
    }

    fn num_actions(&self) -> usize {
        ACTIONS.len()
    }

    fn reset(&mut self) -> State {
        self.current = 0;
        self.current
    }

    fn step(&mut self, action: Action) -> Result<StepResult> {
        check_action(action, ACTIONS.len())?;
        let (row, col) = (self.current / self.cols, self.current % self.cols);
        let (row, col) = ACTIONS[action].apply(row, col, self.rows, self.cols);
        self.current = row * self.cols + col;

        if self.is_hole(self.current) {
            return Ok(StepResult::new(self.current, 0.0, true));
        }
        if self.current == self.goal {
            return Ok(StepResult::new(self.current, GOAL_REWARD, true));
        }
        Ok(StepResult::new(self.current, 0.0, false))
    }

    fn grid_rows(&self) -> usize {
        self.rows
    }

    fn grid_cols(&self) -> usize {
        self.cols
    }

    fn special_cells(&self) -> BTreeMap<usize, CellLabel> {
        let mut cells: BTreeMap<usize, CellLabel> =
            self.holes.iter().map(|&h| (h, CellLabel::Hole)).collect();
        cells.insert(0, CellLabel::Start);
        cells.insert(self.goal, CellLabel::Goal);
        cells
    }

    fn position(&self, state: State) -> Result<(usize, usize)> {
        check_state(state, self.num_states())?;
        Ok((state / self.cols, state % self.cols))
    }

    fn current_position(&self) -> usize {
        self.current
    }

    fn action_labels(&self) -> &'static [&'static str] {
        ACTION_LABELS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_up_from_start_clamps() {
        let mut env = HoleGrid::new();
        assert_eq!(env.reset(), 0);
        for _ in 0..3 {
            assert_eq!(env.step(0).unwrap(), StepResult::new(0, 0.0, false));
        }
    }

    #[test]
    fn test_hole_ends_episode_without_reward() {
        let mut env = HoleGrid::new();
        env.reset();
        env.step(1).unwrap();
        let result = env.step(2).unwrap();
        assert_eq!(result, StepResult::new(5, 0.0, true));
    }

    #[test]
    fn test_shortest_safe_path_reaches_goal() {
        let mut env = HoleGrid::new();
        env.reset();
        // right, right, down, down, down, right
        let path = [1, 1, 2, 2, 2, 1];
        let mut last = None;
        for action in path {
            last = Some(env.step(action).unwrap());
        }
        assert_eq!(last.unwrap(), StepResult::new(15, GOAL_REWARD, true));
    }

    #[test]
    fn test_layout_validation() {
        assert!(HoleGrid::with_layout(3, 3, [0], 8).is_err());
        assert!(HoleGrid::with_layout(3, 3, [4], 9).is_err());
        assert!(HoleGrid::with_layout(3, 3, [8], 8).is_err());
        let env = HoleGrid::with_layout(3, 3, [4], 8).unwrap();
        assert_eq!(env.num_states(), 9);
        assert_eq!(env.special_cells().get(&4), Some(&CellLabel::Hole));
    }
}
