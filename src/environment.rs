//! Discrete grid environments
//!
//! Four episodic MDPs sharing one [`Environment`](crate::ports::Environment)
//! contract:
//!
//! | Variant | a.k.a. | States | Actions |
//! |---------|--------|--------|---------|
//! | [`HazardGrid`] | cliff walking | 48 | 4 |
//! | [`HoleGrid`] | frozen lake (deterministic) | 16 | 4 |
//! | [`DispatchGrid`] | taxi | 500 | 6 |
//! | [`ForageGrid`] | mouse maze | 400 | 4 |
//!
//! [`GridWorld`] wraps them as a closed set of tagged variants selected by
//! [`EnvironmentKind`](crate::types::EnvironmentKind).

pub mod dispatch_grid;
pub mod forage_grid;
pub mod grid;
pub mod hazard_grid;
pub mod hole_grid;
pub mod world;

pub use dispatch_grid::{DispatchGrid, IN_VEHICLE, LANDMARKS};
pub use forage_grid::{ForageGrid, ResourcePlacement};
pub use grid::{CellLabel, Direction, EnvironmentDetail};
pub use hazard_grid::HazardGrid;
pub use hole_grid::HoleGrid;
pub use world::GridWorld;
