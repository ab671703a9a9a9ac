//! Cliff-walking grid: a row of hazards between start and goal

use std::collections::BTreeMap;

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

/// Reward for every move, including the one that reaches the goal.
pub const STEP_REWARD: f64 = -1.0;
/// Reward for stepping onto a hazard cell.
pub const HAZARD_REWARD: f64 = -100.0;

/// Rectangular grid whose bottom row is start, hazards, goal.
///
/// The default layout is 4×12 with start at (3,0), goal at (3,11) and
/// hazards on (3,1)..=(3,10). Stepping onto a hazard sends the agent back to
/// the start, costs [`HAZARD_REWARD`] and ends the episode.
#[derive(Debug, Clone)]
pub struct HazardGrid {
    rows: usize,
    cols: usize,
    current: State,
}

impl HazardGrid {
    pub fn new() -> Self {
        Self {
            rows: 4,
            cols: 12,
            current: 36,
        }
    }

    /// Build a grid of custom size keeping the bottom-row layout.
    ///
    /// # Errors
    ///
    /// Requires at least 2 rows and 3 columns so that start, one hazard and
    /// goal fit and the hazard row can be bypassed.
    pub fn with_dimensions(rows: usize, cols: usize) -> Result<Self> {
        if rows < 2 || cols < 3 {
            return Err(Error::InvalidLayout {
                message: format!("hazard grid needs at least 2x3 cells, got {rows}x{cols}"),
            });
        }
        let mut grid = Self {
            rows,
            cols,
            current: 0,
        };
        grid.current = grid.start_state();
        Ok(grid)
    }

    pub fn start_state(&self) -> State {
        (self.rows - 1) * self.cols
    }

    pub fn goal_state(&self) -> State {
        self.rows * self.cols - 1
    }

    pub fn is_hazard(&self, state: State) -> bool {
        state > self.start_state() && state < self.goal_state()
    }
}

impl Default for HazardGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for HazardGrid {
    fn name(&self) -> &str {
        "HazardGrid"
    }

    fn num_states(&self) -> usize {
        self.rows * self.cols
    }

    fn num_actions(&self) -> usize {
        ACTIONS.len()
    }

    fn reset(&mut self) -> State {
        self.current = self.start_state();
        self.current
    }

    fn step(&mut self, action: Action) -> Result<StepResult> {
        check_action(action, ACTIONS.len())?;
        let (row, col) = (self.current / self.cols, self.current % self.cols);
        let (row, col) = ACTIONS[action].apply(row, col, self.rows, self.cols);
        self.current = row * self.cols + col;

        if self.is_hazard(self.current) {
            self.current = self.start_state();
            return Ok(StepResult::new(self.current, HAZARD_REWARD, true));
        }
        let done = self.current == self.goal_state();
        Ok(StepResult::new(self.current, STEP_REWARD, done))
    }

    fn grid_rows(&self) -> usize {
        self.rows
    }

    fn grid_cols(&self) -> usize {
        self.cols
    }

    fn special_cells(&self) -> BTreeMap<usize, CellLabel> {
        let mut cells = BTreeMap::new();
        cells.insert(self.start_state(), CellLabel::Start);
        cells.insert(self.goal_state(), CellLabel::Goal);
        for hazard in self.start_state() + 1..self.goal_state() {
            cells.insert(hazard, CellLabel::Hazard);
        }
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
    fn test_default_layout() {
        let env = HazardGrid::new();
        assert_eq!(env.num_states(), 48);
        assert_eq!(env.start_state(), 36);
        assert_eq!(env.goal_state(), 47);
        assert!((37..47).all(|s| env.is_hazard(s)));
        assert!(!env.is_hazard(36) && !env.is_hazard(47) && !env.is_hazard(35));
    }

    #[test]
    fn test_hazard_resets_to_start_and_ends_episode() {
        let mut env = HazardGrid::new();
        env.reset();
        let result = env.step(1).unwrap();
        assert_eq!(result, StepResult::new(36, HAZARD_REWARD, true));
        assert_eq!(env.current_position(), 36);
    }

    #[test]
    fn test_goal_costs_one_step() {
        let mut env = HazardGrid::new();
        env.reset();
        env.step(0).unwrap();
        for _ in 0..11 {
            let result = env.step(1).unwrap();
            assert_eq!(result.reward, STEP_REWARD);
            assert!(!result.done);
        }
        let result = env.step(2).unwrap();
        assert_eq!(result, StepResult::new(47, -1.0, true));
    }

    #[test]
    fn test_boundary_moves_clamp_without_extra_penalty() {
        let mut env = HazardGrid::new();
        env.reset();
        let result = env.step(3).unwrap();
        assert_eq!(result, StepResult::new(36, -1.0, false));
        let result = env.step(2).unwrap();
        assert_eq!(result, StepResult::new(36, -1.0, false));
    }

    #[test]
    fn test_invalid_action_rejected() {
        let mut env = HazardGrid::new();
        env.reset();
        assert!(env.step(4).is_err());
        assert_eq!(env.current_position(), 36);
    }

    #[test]
    fn test_custom_dimensions() {
        let env = HazardGrid::with_dimensions(3, 5).unwrap();
        assert_eq!(env.start_state(), 10);
        assert_eq!(env.goal_state(), 14);
        assert_eq!(env.special_cells().len(), 5);
        assert!(HazardGrid::with_dimensions(1, 5).is_err());
    }
}
