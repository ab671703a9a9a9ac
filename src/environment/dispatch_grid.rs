//! Taxi pickup/drop-off task

use std::collections::BTreeMap;

use rand::{Rng, rngs::StdRng};

use super::grid::{CellLabel, Direction, EnvironmentDetail, check_action, check_state};
use crate::{
    Error, Result,
    ports::Environment,
    types::{Action, State, StepResult},
    utils::build_rng,
};

const ROWS: usize = 5;
const COLS: usize = 5;
const PASSENGER_SLOTS: usize = LANDMARKS.len() + 1;
const NUM_STATES: usize = ROWS * COLS * PASSENGER_SLOTS * LANDMARKS.len();

/// Landmark cells `(row, col)` for R, G, Y, B.
pub const LANDMARKS: [(usize, usize); 4] = [(0, 0), (0, 4), (4, 0), (4, 3)];
const LANDMARK_NAMES: [char; 4] = ['R', 'G', 'Y', 'B'];

/// Passenger index meaning "riding in the vehicle".
pub const IN_VEHICLE: usize = 4;

pub const ACTION_PICKUP: Action = 4;
pub const ACTION_DROPOFF: Action = 5;
const MOVES: [Direction; 4] = [
    Direction::South,
    Direction::North,
    Direction::East,
    Direction::West,
];
const ACTION_LABELS: &[&str] = &["south", "north", "east", "west", "pickup", "dropoff"];

pub const STEP_REWARD: f64 = -1.0;
pub const ILLEGAL_REWARD: f64 = -10.0;
pub const DROPOFF_REWARD: f64 = 20.0;

/// Fixed 5×5 grid with four landmarks, one passenger and one destination.
///
/// State encoding (500 states):
///
/// ```text
/// state = ((row * 5 + col) * 5 + passenger) * 4 + destination
/// ```
///
/// where `passenger` is a landmark index or [`IN_VEHICLE`].
#[derive(Debug, Clone)]
pub struct DispatchGrid {
    row: usize,
    col: usize,
    passenger: usize,
    destination: usize,
    rng: StdRng,
}

impl DispatchGrid {
    /// Create an environment whose resets are drawn from an unseeded generator.
    pub fn new() -> Self {
        Self::from_rng(build_rng(None))
    }

    /// Create an environment whose resets replay deterministically.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(build_rng(Some(seed)))
    }

    fn from_rng(rng: StdRng) -> Self {
        let mut env = Self {
            row: 0,
            col: 0,
            passenger: 0,
            destination: 1,
            rng,
        };
        env.reset();
        env
    }

    /// Encode a configuration into a state index.
    ///
    /// # Errors
    ///
    /// Fails when any component is outside its range.
    pub fn encode(row: usize, col: usize, passenger: usize, destination: usize) -> Result<State> {
        if row >= ROWS || col >= COLS || passenger >= PASSENGER_SLOTS || destination >= LANDMARKS.len()
        {
            return Err(Error::InvalidLayout {
                message: format!(
                    "dispatch configuration ({row}, {col}, passenger {passenger}, destination {destination}) is out of range"
                ),
            });
        }
        Ok(((row * COLS + col) * PASSENGER_SLOTS + passenger) * LANDMARKS.len() + destination)
    }

    /// Decode a state index into `(row, col, passenger, destination)`.
    pub fn decode(state: State) -> Result<(usize, usize, usize, usize)> {
        check_state(state, NUM_STATES)?;
        let destination = state % LANDMARKS.len();
        let rest = state / LANDMARKS.len();
        let passenger = rest % PASSENGER_SLOTS;
        let cell = rest / PASSENGER_SLOTS;
        Ok((cell / COLS, cell % COLS, passenger, destination))
    }

    /// Place the vehicle, passenger and destination explicitly.
    ///
    /// Used for benchmark episodes that must start from a known
    /// configuration.
    pub fn set_state(
        &mut self,
        row: usize,
        col: usize,
        passenger: usize,
        destination: usize,
    ) -> Result<State> {
        let state = Self::encode(row, col, passenger, destination)?;
        self.row = row;
        self.col = col;
        self.passenger = passenger;
        self.destination = destination;
        Ok(state)
    }

    pub fn passenger(&self) -> usize {
        self.passenger
    }

    pub fn destination(&self) -> usize {
        self.destination
    }

    fn encode_current(&self) -> State {
        ((self.row * COLS + self.col) * PASSENGER_SLOTS + self.passenger) * LANDMARKS.len()
            + self.destination
    }

    fn at_landmark(&self, landmark: usize) -> bool {
        LANDMARKS[landmark] == (self.row, self.col)
    }
}

impl Default for DispatchGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for DispatchGrid {
    fn name(&self) -> &str {
        "DispatchGrid"
    }

    fn num_states(&self) -> usize {
        NUM_STATES
    }

    fn num_actions(&self) -> usize {
        ACTION_LABELS.len()
    }

    fn reset(&mut self) -> State {
        self.row = self.rng.random_range(0..ROWS);
        self.col = self.rng.random_range(0..COLS);
        self.passenger = self.rng.random_range(0..LANDMARKS.len());
        self.destination = loop {
            let candidate = self.rng.random_range(0..LANDMARKS.len());
            if candidate != self.passenger {
                break candidate;
            }
        };
        self.encode_current()
    }

    fn step(&mut self, action: Action) -> Result<StepResult> {
        check_action(action, ACTION_LABELS.len())?;
        let mut reward = STEP_REWARD;
        let mut done = false;

        match action {
            ACTION_PICKUP => {
                if self.passenger == IN_VEHICLE || !self.at_landmark(self.passenger) {
                    reward = ILLEGAL_REWARD;
                } else {
                    self.passenger = IN_VEHICLE;
                }
            }
            ACTION_DROPOFF => {
                if self.passenger != IN_VEHICLE || !self.at_landmark(self.destination) {
                    reward = ILLEGAL_REWARD;
                } else {
                    reward = DROPOFF_REWARD;
                    done = true;
                }
            }
            movement => {
                (self.row, self.col) = MOVES[movement].apply(self.row, self.col, ROWS, COLS);
            }
        }

        Ok(StepResult::new(self.encode_current(), reward, done))
    }

    fn grid_rows(&self) -> usize {
        ROWS
    }

    fn grid_cols(&self) -> usize {
        COLS
    }

    fn special_cells(&self) -> BTreeMap<usize, CellLabel> {
        LANDMARKS
            .iter()
            .zip(LANDMARK_NAMES)
            .map(|(&(row, col), name)| (row * COLS + col, CellLabel::Landmark(name)))
            .collect()
    }

    fn position(&self, state: State) -> Result<(usize, usize)> {
        let (row, col, _, _) = Self::decode(state)?;
        Ok((row, col))
    }

    fn current_position(&self) -> usize {
        self.row * COLS + self.col
    }

    fn action_labels(&self) -> &'static [&'static str] {
        ACTION_LABELS
    }

    fn detail(&self) -> EnvironmentDetail {
        EnvironmentDetail::Dispatch {
            passenger: self.passenger,
            destination: self.destination,
        }
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = build_rng(Some(seed));
    }
}
