use rand::{Rng, seq::IndexedRandom};

use crate::{
    error::{GameError, Result},
    model::{CellState, Grid},
};

/// Copy of `cells` with position `index` replaced by `state`.
pub fn fill_cell_item_by_index(
    cells: &[CellState],
    index: usize,
    state: CellState,
) -> Result<Grid> {
    if index >= cells.len() {
        return Err(GameError::IndexOutOfRange {
            index,
            len: cells.len(),
        });
    }

    let mut next = cells.to_vec();
    next[index] = state;
    Ok(next)
}

/// Index of a uniformly chosen targetable cell.
pub fn get_random_cell_index(cells: &[CellState]) -> Result<usize> {
    get_random_cell_index_with_rng(cells, &mut rand::rng())
}

pub fn get_random_cell_index_with_rng<R: Rng + ?Sized>(
    cells: &[CellState],
    rng: &mut R,
) -> Result<usize> {
    let eligible: Vec<usize> = cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| cell.is_targetable())
        .map(|(index, _)| index)
        .collect();

    eligible
        .choose(rng)
        .copied()
        .ok_or(GameError::NoEligibleCell)
}
