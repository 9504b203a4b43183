use crate::error::Result;
use crate::grid::Grid;
use crate::roster::{unseated, Student};

#[derive(Debug, Clone, PartialEq)]
pub struct AutoFillOutcome {
    pub grid: Grid,
    /// How many roster members were placed by this call.
    pub placed: usize,
    /// Roster members left without a seat. A grid smaller than the roster is
    /// legitimate, so this is reported rather than treated as a failure.
    pub left_over: Vec<Student>,
}

/// Seat every not-yet-seated roster member onto the empty, unpinned seats,
/// roster order against row-major seat order. Already-seated students are
/// never reshuffled and pinned seats are never touched.
pub fn auto_fill(grid: &Grid, roster: &[Student]) -> Result<AutoFillOutcome> {
    let pool = unseated(roster, grid);
    let targets = grid.empty_unpinned();
    let take = pool.len().min(targets.len());

    let mut next = grid.clone();
    for (student, &(row, col)) in pool.iter().zip(targets.iter()).take(take) {
        next = next.set_occupant(row, col, Some(&student.id))?;
    }
    let left_over: Vec<Student> = pool.into_iter().skip(take).cloned().collect();

    tracing::debug!(placed = take, left_over = left_over.len(), "auto-filled grid");
    Ok(AutoFillOutcome {
        grid: next,
        placed: take,
        left_over,
    })
}
