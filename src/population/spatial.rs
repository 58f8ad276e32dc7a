/*!

A uniform grid over the plane used to narrow down which agents can possibly be within the
contact distance of a given point.

Cells are squares whose side is the contact distance (at least one pixel), so every agent
within that distance of a point lies in a cell overlapping the square of that half-width
around the point. The grid only prunes candidates; callers still apply the exact distance test. Candidates are
returned in ascending index order so that a caller iterating them consumes random draws in
the same order as a scan over the whole population.

*/

use crate::agent::{Agent, Position};
use crate::hashing::HashMap;

/// Agent indices bucketed by cell. Only occupied cells are stored, so the grid is as large as
/// the population no matter how large the world is.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f64,
    reach: f64,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl SpatialGrid {
    /// Buckets `agents` by their current position.
    #[must_use]
    pub fn build(agents: &[Agent], contact_distance: f64) -> Self {
        let mut grid = SpatialGrid {
            cell_size: contact_distance.max(1.0),
            reach: contact_distance.max(0.0),
            cells: HashMap::default(),
        };
        for agent in agents {
            let key = grid.cell_of(agent.position());
            grid.cells.entry(key).or_default().push(agent.index());
        }
        grid
    }

    /// Number of cells holding at least one agent.
    #[must_use]
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// Indices of every agent that may lie within the contact distance of `pos`, sorted
    /// ascending.
    #[must_use]
    pub fn candidates(&self, pos: Position) -> Vec<usize> {
        // One extra cell on every side absorbs rounding in the division when a neighbor sits
        // exactly at the contact distance on a cell boundary.
        let (first_column, first_row) =
            self.cell_of(Position::new(pos.x - self.reach, pos.y - self.reach));
        let (last_column, last_row) =
            self.cell_of(Position::new(pos.x + self.reach, pos.y + self.reach));
        let mut found = Vec::new();
        for row in first_row - 1..=last_row + 1 {
            for column in first_column - 1..=last_column + 1 {
                if let Some(cell) = self.cells.get(&(column, row)) {
                    found.extend_from_slice(cell);
                }
            }
        }
        found.sort_unstable();
        found
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cell_of(&self, pos: Position) -> (i64, i64) {
        (
            (pos.x / self.cell_size).floor() as i64,
            (pos.y / self.cell_size).floor() as i64,
        )
    }
}
