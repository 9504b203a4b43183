use serde::{Deserialize, Serialize};

use crate::error::{Result, SeatingError};

pub const MIN_ROWS: usize = 1;
pub const MIN_COLS: usize = 1;

/// Host-configured ceiling on grid dimensions. The floor is always 1x1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridBounds {
    pub max_rows: usize,
    pub max_cols: usize,
}

impl GridBounds {
    pub fn new(max_rows: usize, max_cols: usize) -> Self {
        GridBounds { max_rows, max_cols }
    }

    fn check(&self, rows: usize, cols: usize) -> Result<()> {
        if rows < MIN_ROWS || cols < MIN_COLS || rows > self.max_rows || cols > self.max_cols {
            return Err(SeatingError::InvalidDimension {
                rows,
                cols,
                max_rows: self.max_rows,
                max_cols: self.max_cols,
            });
        }
        Ok(())
    }
}

impl Default for GridBounds {
    fn default() -> Self {
        GridBounds {
            max_rows: 16,
            max_cols: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub row: usize,
    pub col: usize,
    #[serde(default)]
    pub occupant_id: Option<String>,
    #[serde(default)]
    pub pinned: bool,
}

impl Seat {
    fn empty(row: usize, col: usize) -> Self {
        Seat {
            row,
            col,
            occupant_id: None,
            pinned: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.occupant_id.is_none()
    }
}

/// Rectangular seat grid. Every mutator returns a new `Grid` and leaves the
/// receiver untouched, so the host can snapshot or undo by keeping old values.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    seats: Vec<Seat>, // row-major, seats[row * cols + col]
}

impl Grid {
    pub fn new(rows: usize, cols: usize, bounds: GridBounds) -> Result<Grid> {
        bounds.check(rows, cols)?;
        let mut seats = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                seats.push(Seat::empty(r, c));
            }
        }
        Ok(Grid { rows, cols, seats })
    }

    /// Rebuild a grid from a flat seat list, e.g. a deserialized snapshot.
    /// Seats are placed by their own (row, col); list order does not matter.
    /// Cells the list does not mention come back empty and unpinned.
    pub fn from_parts(
        rows: usize,
        cols: usize,
        seats: Vec<Seat>,
        bounds: GridBounds,
    ) -> Result<Grid> {
        bounds.check(rows, cols)?;
        let mut grid = Grid::new(rows, cols, bounds)?;
        for seat in seats {
            if seat.row >= rows || seat.col >= cols {
                return Err(SeatingError::OutOfBounds {
                    row: seat.row,
                    col: seat.col,
                    rows,
                    cols,
                });
            }
            if let Some(id) = seat.occupant_id.as_deref() {
                if let Some(prev) = grid.seat_of(id) {
                    return Err(SeatingError::DuplicateOccupant {
                        student_id: id.to_string(),
                        row: prev.row,
                        col: prev.col,
                    });
                }
            }
            let idx = seat.row * cols + seat.col;
            grid.seats[idx] = seat;
        }
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn seat_count(&self) -> usize {
        self.rows * self.cols
    }

    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Seat> {
        if row < self.rows && col < self.cols {
            Some(&self.seats[self.idx(row, col)])
        } else {
            None
        }
    }

    pub fn seat(&self, row: usize, col: usize) -> Result<&Seat> {
        self.get(row, col).ok_or(SeatingError::OutOfBounds {
            row,
            col,
            rows: self.rows,
            cols: self.cols,
        })
    }

    pub fn seats(&self) -> impl Iterator<Item = &Seat> {
        self.seats.iter()
    }

    /// Where a student currently sits, if anywhere.
    pub fn seat_of(&self, student_id: &str) -> Option<&Seat> {
        self.seats
            .iter()
            .find(|s| s.occupant_id.as_deref() == Some(student_id))
    }

    /// Ids of everyone currently seated, row-major order.
    pub fn seated_ids(&self) -> Vec<String> {
        self.seats
            .iter()
            .filter_map(|s| s.occupant_id.clone())
            .collect()
    }

    pub fn occupied_count(&self) -> usize {
        self.seats.iter().filter(|s| s.occupant_id.is_some()).count()
    }

    /// Coordinates of empty, unpinned seats in row-major order. These are the
    /// only seats template and auto-fill operations may write into.
    pub fn empty_unpinned(&self) -> Vec<(usize, usize)> {
        self.seats
            .iter()
            .filter(|s| s.is_empty() && !s.pinned)
            .map(|s| (s.row, s.col))
            .collect()
    }

    /// Grow or shrink the grid. New cells come up empty and unpinned.
    /// Shrinking evicts occupants of removed unpinned seats (they return to
    /// the unseated pool); a removed cell that is pinned and occupied rejects
    /// the whole resize.
    pub fn resize(&self, rows: usize, cols: usize, bounds: GridBounds) -> Result<Grid> {
        bounds.check(rows, cols)?;
        for seat in &self.seats {
            let removed = seat.row >= rows || seat.col >= cols;
            if removed && seat.pinned && seat.occupant_id.is_some() {
                return Err(SeatingError::PinnedSeatConflict {
                    row: seat.row,
                    col: seat.col,
                });
            }
        }
        let mut next = Grid::new(rows, cols, bounds)?;
        for seat in &self.seats {
            if seat.row < rows && seat.col < cols {
                let idx = seat.row * cols + seat.col;
                next.seats[idx] = seat.clone();
            }
        }
        Ok(next)
    }

    /// Place a student on a seat, or clear it with `None`. Manual placement
    /// is allowed on pinned seats; only template/auto operations honor pins.
    pub fn set_occupant(&self, row: usize, col: usize, occupant: Option<&str>) -> Result<Grid> {
        self.seat(row, col)?;
        if let Some(id) = occupant {
            if let Some(prev) = self.seat_of(id) {
                if (prev.row, prev.col) != (row, col) {
                    return Err(SeatingError::DuplicateOccupant {
                        student_id: id.to_string(),
                        row: prev.row,
                        col: prev.col,
                    });
                }
            }
        }
        let mut next = self.clone();
        let idx = next.idx(row, col);
        next.seats[idx].occupant_id = occupant.map(|s| s.to_string());
        Ok(next)
    }

    pub fn toggle_pin(&self, row: usize, col: usize) -> Result<Grid> {
        self.seat(row, col)?;
        let mut next = self.clone();
        let idx = next.idx(row, col);
        next.seats[idx].pinned = !next.seats[idx].pinned;
        Ok(next)
    }

    /// Atomic exchange of occupants between two seats. Works for
    /// occupied<->occupied and occupied<->empty; either seat being pinned
    /// rejects the swap and leaves both unchanged.
    pub fn swap_occupants(
        &self,
        a: (usize, usize),
        b: (usize, usize),
    ) -> Result<Grid> {
        let seat_a = self.seat(a.0, a.1)?;
        let seat_b = self.seat(b.0, b.1)?;
        if seat_a.pinned {
            return Err(SeatingError::PinnedSeatConflict { row: a.0, col: a.1 });
        }
        if seat_b.pinned {
            return Err(SeatingError::PinnedSeatConflict { row: b.0, col: b.1 });
        }
        let mut next = self.clone();
        let ia = next.idx(a.0, a.1);
        let ib = next.idx(b.0, b.1);
        next.seats.swap(ia, ib);
        // swap moved the coordinates along with the occupants; fix them up
        next.seats[ia].row = a.0;
        next.seats[ia].col = a.1;
        next.seats[ib].row = b.0;
        next.seats[ib].col = b.1;
        Ok(next)
    }

    /// Clear every unpinned seat. Pinned seats keep their occupants.
    pub fn clear_unpinned(&self) -> Grid {
        let mut next = self.clone();
        for seat in &mut next.seats {
            if !seat.pinned {
                seat.occupant_id = None;
            }
        }
        next
    }
}
