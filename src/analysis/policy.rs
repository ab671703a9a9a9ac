//! Text rendering of greedy policies

use std::fmt::Write;

use crate::{
    Result,
    environment::CellLabel,
    ports::Environment,
    q_learning::QTable,
    types::State,
};

/// Marker for cells whose row has never moved away from a full tie
pub const UNVISITED: char = '·';

/// Display glyph for an action label.
pub fn action_glyph(label: &str) -> char {
    match label {
        "up" | "north" => '↑',
        "right" | "east" => '→',
        "down" | "south" => '↓',
        "left" | "west" => '←',
        "pickup" => 'P',
        "dropoff" => 'D',
        _ => '?',
    }
}

fn shows_label(label: CellLabel) -> bool {
    matches!(
        label,
        CellLabel::Goal | CellLabel::Hazard | CellLabel::Hole | CellLabel::Exit
    )
}

/// Render the greedy action of every grid cell.
///
/// `state_for` maps a grid position `row * cols + col` to the state whose
/// row should be shown there, which lets compound environments pick a
/// sub-state (flags, passenger, destination). Terminal-like special cells
/// print their glyph instead of an arrow, and fully tied rows print
/// [`UNVISITED`].
///
/// # Examples
///
/// ```
/// use tdgrid::{analysis::render_position_policy, environment::HoleGrid, q_learning::QTable};
///
/// let env = HoleGrid::new();
/// let q = QTable::new(16, 4, 0.0)?;
/// let grid = render_position_policy(&q, &env)?;
/// assert_eq!(grid.lines().count(), 4);
/// assert!(grid.ends_with("G\n"));
/// # Ok::<(), tdgrid::Error>(())
/// ```
pub fn render_policy<F>(q_table: &QTable, env: &dyn Environment, state_for: F) -> Result<String>
where
    F: Fn(usize) -> Result<State>,
{
    let special = env.special_cells();
    let labels = env.action_labels();
    let cols = env.grid_cols();
    let mut out = String::new();

    for row in 0..env.grid_rows() {
        let mut cells = Vec::with_capacity(cols);
        for col in 0..cols {
            let position = row * cols + col;
            let glyph = match special.get(&position) {
                Some(&label) if shows_label(label) => label.to_string(),
                _ => {
                    let state = state_for(position)?;
                    if q_table.is_row_uniform(state)? {
                        UNVISITED.to_string()
                    } else {
                        let action = q_table.first_greedy_action(state)?;
                        action_glyph(labels.get(action).copied().unwrap_or("")).to_string()
                    }
                }
            };
            cells.push(glyph);
        }
        writeln!(out, "{}", cells.join(" "))?;
    }
    Ok(out)
}

/// [`render_policy`] for environments whose state is the grid position.
pub fn render_position_policy(q_table: &QTable, env: &dyn Environment) -> Result<String> {
    render_policy(q_table, env, Ok)
}
