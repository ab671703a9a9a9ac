//! Mouse maze: collect food and water, then leave through the exit

use std::collections::BTreeMap;

use rand::{Rng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::grid::{CellLabel, Direction, EnvironmentDetail, check_action, check_state};
use crate::{
    Error, Result,
    ports::Environment,
    types::{Action, State, StepResult},
    utils::build_rng,
};

const ACTIONS: [Direction; 4] = [
    Direction::North,
    Direction::South,
    Direction::East,
    Direction::West,
];
const ACTION_LABELS: &[&str] = &["north", "south", "east", "west"];

pub const STEP_REWARD: f64 = -1.0;
pub const RESOURCE_BONUS: f64 = 20.0;
pub const EXIT_BONUS: f64 = 50.0;
pub const EXIT_PENALTY: f64 = -50.0;

/// Where food and water are placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ResourcePlacement {
    /// Redrawn on every reset, never on start, exit or each other
    Random,
    /// Same grid positions every episode
    Fixed { food: usize, water: usize },
}

/// Grid where the agent must visit food and water before reaching the exit.
///
/// State encoding (`cells = rows * cols`):
///
/// ```text
/// state = position + cells * has_eaten + 2 * cells * has_drunk
/// ```
#[derive(Debug, Clone)]
pub struct ForageGrid {
    rows: usize,
    cols: usize,
    placement: ResourcePlacement,
    food: usize,
    water: usize,
    position: usize,
    has_eaten: bool,
    has_drunk: bool,
    rng: StdRng,
}

impl ForageGrid {
    /// 10×10 maze with randomly placed resources.
    pub fn new() -> Self {
        Self::build(10, 10, ResourcePlacement::Random, build_rng(None))
    }

    /// 10×10 maze with randomly placed resources drawn from a seeded generator.
    pub fn with_seed(seed: u64) -> Self {
        Self::build(10, 10, ResourcePlacement::Random, build_rng(Some(seed)))
    }

    /// Custom maze.
    ///
    /// # Errors
    ///
    /// Fails if the grid has fewer than four cells, or if fixed resources lie
    /// outside the grid, on the start or exit, or on top of each other.
    pub fn with_placement(
        rows: usize,
        cols: usize,
        placement: ResourcePlacement,
        seed: Option<u64>,
    ) -> Result<Self> {
        let cells = rows * cols;
        if cells < 4 {
            return Err(Error::InvalidLayout {
                message: format!("forage grid needs at least four cells, got {rows}x{cols}"),
            });
        }
        if let ResourcePlacement::Fixed { food, water } = placement {
            let exit = cells - 1;
            for (name, cell) in [("food", food), ("water", water)] {
                if cell == 0 || cell >= exit {
                    return Err(Error::InvalidLayout {
                        message: format!("{name} cell {cell} must lie strictly between start and exit"),
                    });
                }
            }
            if food == water {
                return Err(Error::InvalidLayout {
                    message: format!("food and water share cell {food}"),
                });
            }
        }
        Ok(Self::build(rows, cols, placement, build_rng(seed)))
    }

    fn build(rows: usize, cols: usize, placement: ResourcePlacement, rng: StdRng) -> Self {
        let mut env = Self {
            rows,
            cols,
            placement,
            food: 1,
            water: 2,
            position: 0,
            has_eaten: false,
            has_drunk: false,
            rng,
        };
        env.reset();
        env
    }

    fn cells(&self) -> usize {
        self.rows * self.cols
    }

    pub fn exit_cell(&self) -> usize {
        self.cells() - 1
    }

    pub fn food_cell(&self) -> usize {
        self.food
    }

    pub fn water_cell(&self) -> usize {
        self.water
    }

    pub fn has_eaten(&self) -> bool {
        self.has_eaten
    }

    pub fn has_drunk(&self) -> bool {
        self.has_drunk
    }

    /// Encode a configuration into a state index.
    pub fn encode(&self, position: usize, has_eaten: bool, has_drunk: bool) -> Result<State> {
        check_state(position, self.cells())?;
        let cells = self.cells();
        Ok(position + cells * usize::from(has_eaten) + 2 * cells * usize::from(has_drunk))
    }

    /// Decode a state index into `(position, has_eaten, has_drunk)`.
    pub fn decode(&self, state: State) -> Result<(usize, bool, bool)> {
        check_state(state, self.num_states())?;
        let cells = self.cells();
        let flags = state / cells;
        Ok((state % cells, flags & 1 == 1, flags & 2 == 2))
    }

    fn encode_current(&self) -> State {
        let cells = self.cells();
        self.position + cells * usize::from(self.has_eaten) + 2 * cells * usize::from(self.has_drunk)
    }

    fn draw_free_cell(&mut self, taken: &[usize]) -> usize {
        let cells = self.cells();
        loop {
            let cell = self.rng.random_range(0..cells);
            if cell != 0 && cell != cells - 1 && !taken.contains(&cell) {
                return cell;
            }
        }
    }
}

impl Default for ForageGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for ForageGrid {
    fn name(&self) -> &str {
        "ForageGrid"
    }

    fn num_states(&self) -> usize {
        self.cells() * 4
    }

    fn num_actions(&self) -> usize {
        ACTIONS.len()
    }

    fn reset(&mut self) -> State {
        self.position = 0;
        self.has_eaten = false;
        self.has_drunk = false;
        match self.placement {
            ResourcePlacement::Fixed { food, water } => {
                self.food = food;
                self.water = water;
            }
            ResourcePlacement::Random => {
                let food = self.draw_free_cell(&[]);
                self.food = food;
                self.water = self.draw_free_cell(&[food]);
            }
        }
        self.encode_current()
    }

    fn step(&mut self, action: Action) -> Result<StepResult> {
        check_action(action, ACTIONS.len())?;
        let (row, col) = (self.position / self.cols, self.position % self.cols);
        let (row, col) = ACTIONS[action].apply(row, col, self.rows, self.cols);
        self.position = row * self.cols + col;

        let mut reward = STEP_REWARD;
        let mut done = false;

        if self.position == self.food && !self.has_eaten {
            self.has_eaten = true;
            reward += RESOURCE_BONUS;
        }
        if self.position == self.water && !self.has_drunk {
            self.has_drunk = true;
            reward += RESOURCE_BONUS;
        }
        if self.position == self.exit_cell() {
            reward += if self.has_eaten && self.has_drunk {
                EXIT_BONUS
            } else {
                EXIT_PENALTY
            };
            done = true;
        }

        Ok(StepResult::new(self.encode_current(), reward, done))
    }

    fn grid_rows(&self) -> usize {
        self.rows
    }

    fn grid_cols(&self) -> usize {
        self.cols
    }

    fn special_cells(&self) -> BTreeMap<usize, CellLabel> {
        BTreeMap::from([
            (0, CellLabel::Start),
            (self.exit_cell(), CellLabel::Exit),
            (self.food, CellLabel::Food),
            (self.water, CellLabel::Water),
        ])
    }

    fn position(&self, state: State) -> Result<(usize, usize)> {
        let (position, _, _) = self.decode(state)?;
        Ok((position / self.cols, position % self.cols))
    }

    fn current_position(&self) -> usize {
        self.position
    }

    fn action_labels(&self) -> &'static [&'static str] {
        ACTION_LABELS
    }

    fn detail(&self) -> EnvironmentDetail {
        EnvironmentDetail::Forage {
            has_eaten: self.has_eaten,
            has_drunk: self.has_drunk,
            food: self.food,
            water: self.water,
        }
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = build_rng(Some(seed));
    }
}
