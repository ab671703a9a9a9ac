//! Closed set of environments selected by configuration

use std::collections::BTreeMap;

use super::{
    CellLabel, DispatchGrid, EnvironmentDetail, ForageGrid, HazardGrid, HoleGrid,
};
use crate::{
    Result,
    ports::Environment,
    types::{Action, EnvironmentKind, State, StepResult},
};

/// Tagged union over the bundled environments
///
/// Callers that need concrete access (for example
/// [`DispatchGrid::set_state`]) match on the variant; everything else goes
/// through the [`Environment`] trait.
#[derive(Debug, Clone)]
pub enum GridWorld {
    Hazard(HazardGrid),
    Hole(HoleGrid),
    Dispatch(DispatchGrid),
    Forage(ForageGrid),
}

impl GridWorld {
    /// Build the default layout for `kind`. The seed drives any reset
    /// randomness; deterministic environments ignore it.
    pub fn from_kind(kind: EnvironmentKind, seed: Option<u64>) -> Self {
        match kind {
            EnvironmentKind::HazardGrid => GridWorld::Hazard(HazardGrid::new()),
            EnvironmentKind::HoleGrid => GridWorld::Hole(HoleGrid::new()),
            EnvironmentKind::DispatchGrid => GridWorld::Dispatch(match seed {
                Some(seed) => DispatchGrid::with_seed(seed),
                None => DispatchGrid::new(),
            }),
            EnvironmentKind::ForageGrid => GridWorld::Forage(match seed {
                Some(seed) => ForageGrid::with_seed(seed),
                None => ForageGrid::new(),
            }),
        }
    }

    pub fn kind(&self) -> EnvironmentKind {
        match self {
            GridWorld::Hazard(_) => EnvironmentKind::HazardGrid,
            GridWorld::Hole(_) => EnvironmentKind::HoleGrid,
            GridWorld::Dispatch(_) => EnvironmentKind::DispatchGrid,
            GridWorld::Forage(_) => EnvironmentKind::ForageGrid,
        }
    }

    fn inner(&self) -> &dyn Environment {
        match self {
            GridWorld::Hazard(env) => env,
            GridWorld::Hole(env) => env,
            GridWorld::Dispatch(env) => env,
            GridWorld::Forage(env) => env,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Environment {
        match self {
            GridWorld::Hazard(env) => env,
            GridWorld::Hole(env) => env,
            GridWorld::Dispatch(env) => env,
            GridWorld::Forage(env) => env,
        }
    }
}

impl Environment for GridWorld {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn num_states(&self) -> usize {
        self.inner().num_states()
    }

    fn num_actions(&self) -> usize {
        self.inner().num_actions()
    }

    fn reset(&mut self) -> State {
        self.inner_mut().reset()
    }

    fn step(&mut self, action: Action) -> Result<StepResult> {
        self.inner_mut().step(action)
    }

    fn grid_rows(&self) -> usize {
        self.inner().grid_rows()
    }

    fn grid_cols(&self) -> usize {
        self.inner().grid_cols()
    }

    fn special_cells(&self) -> BTreeMap<usize, CellLabel> {
        self.inner().special_cells()
    }

    fn position(&self, state: State) -> Result<(usize, usize)> {
        self.inner().position(state)
    }

    fn current_position(&self) -> usize {
        self.inner().current_position()
    }

    fn action_labels(&self) -> &'static [&'static str] {
        self.inner().action_labels()
    }

    fn detail(&self) -> EnvironmentDetail {
        self.inner().detail()
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.inner_mut().set_rng_seed(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_kind_dimensions() {
        let expected = [
            (EnvironmentKind::HazardGrid, 48, 4),
            (EnvironmentKind::HoleGrid, 16, 4),
            (EnvironmentKind::DispatchGrid, 500, 6),
            (EnvironmentKind::ForageGrid, 400, 4),
        ];
        for (kind, states, actions) in expected {
            let world = GridWorld::from_kind(kind, Some(1));
            assert_eq!(world.kind(), kind);
            assert_eq!(world.num_states(), states);
            assert_eq!(world.num_actions(), actions);
        }
    }

    #[test]
    fn test_detail_dispatches_to_variant() {
        let world = GridWorld::from_kind(EnvironmentKind::HoleGrid, None);
        assert_eq!(world.detail(), EnvironmentDetail::Plain);
        let world = GridWorld::from_kind(EnvironmentKind::DispatchGrid, Some(5));
        assert!(matches!(world.detail(), EnvironmentDetail::Dispatch { .. }));
    }
}
