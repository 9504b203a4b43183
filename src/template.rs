use std::cmp::Ordering;

use crate::error::{Result, SeatingError};
use crate::grid::Grid;
use crate::roster::Student;

/// Band half-width for the circle template: a seat joins the circle when
/// its normalized ellipse distance is within this much of 1.0.
pub const DEFAULT_CIRCLE_TOLERANCE: f64 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupSpec {
    /// Blocks of roughly this many seats; the remainder lands in the
    /// trailing blocks.
    BySize(usize),
    /// This many blocks; block size is derived from the assignable seats.
    ByCount(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Template {
    /// Classic arrangement; behaves as `RowsOnly`.
    Default,
    RowsOnly,
    UShape,
    Circle { tolerance: f64 },
    Groups(GroupSpec),
}

impl Template {
    pub fn circle() -> Template {
        Template::Circle {
            tolerance: DEFAULT_CIRCLE_TOLERANCE,
        }
    }
}

/// Compute a fresh occupancy for the grid from a named template.
///
/// Unpinned seats are cleared first; pinned seats keep their occupants
/// verbatim and those occupants are excluded from the pool being placed.
/// Deterministic for a given (grid, roster order): no randomness anywhere.
pub fn apply_template(grid: &Grid, template: Template, roster: &[Student]) -> Result<Grid> {
    let order = match template {
        Template::Default | Template::RowsOnly => row_major_order(grid.rows(), grid.cols()),
        Template::UShape => border_order(grid.rows(), grid.cols()),
        Template::Circle { tolerance } => circle_order(grid.rows(), grid.cols(), tolerance),
        Template::Groups(spec) => group_order(grid, spec)?,
    };

    let cleared = grid.clear_unpinned();
    let pinned_ids: Vec<String> = cleared.seated_ids();
    let mut pool = roster
        .iter()
        .filter(|s| !pinned_ids.iter().any(|p| p == &s.id));

    let mut next = cleared;
    let mut placed = 0usize;
    for (row, col) in order {
        let seat = next.seat(row, col)?;
        if seat.pinned {
            continue;
        }
        let Some(student) = pool.next() else {
            break;
        };
        next = next.set_occupant(row, col, Some(&student.id))?;
        placed += 1;
    }

    tracing::debug!(template = ?template, placed, "applied seating template");
    Ok(next)
}

fn row_major_order(rows: usize, cols: usize) -> Vec<(usize, usize)> {
    let mut order = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            order.push((r, c));
        }
    }
    order
}

/// Outer border cells, clockwise from the top-left corner.
fn border_order(rows: usize, cols: usize) -> Vec<(usize, usize)> {
    let mut order = Vec::new();
    for c in 0..cols {
        order.push((0, c));
    }
    for r in 1..rows {
        order.push((r, cols - 1));
    }
    if rows > 1 {
        for c in (0..cols.saturating_sub(1)).rev() {
            order.push((rows - 1, c));
        }
    }
    if cols > 1 {
        for r in (1..rows.saturating_sub(1)).rev() {
            order.push((r, 0));
        }
    }
    order
}

/// Seats whose centers fall within `tolerance` of the ellipse inscribed in
/// the grid bounding box, ordered by angle from 0 to 360 degrees. Grids too
/// thin to hold an interior collapse to the border ring.
fn circle_order(rows: usize, cols: usize, tolerance: f64) -> Vec<(usize, usize)> {
    if rows < 3 || cols < 3 {
        return border_order(rows, cols);
    }
    let cy = (rows as f64 - 1.0) / 2.0;
    let cx = (cols as f64 - 1.0) / 2.0;
    let ry = cy;
    let rx = cx;

    let mut on_ring: Vec<(f64, usize, usize)> = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            let dy = (r as f64 - cy) / ry;
            let dx = (c as f64 - cx) / rx;
            let v = dx * dx + dy * dy;
            if (v.sqrt() - 1.0).abs() <= tolerance {
                let mut theta = dy.atan2(dx);
                if theta < 0.0 {
                    theta += std::f64::consts::TAU;
                }
                on_ring.push((theta, r, c));
            }
        }
    }
    on_ring.sort_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap_or(Ordering::Equal)
            .then(a.1.cmp(&b.1))
            .then(a.2.cmp(&b.2))
    });
    on_ring.into_iter().map(|(_, r, c)| (r, c)).collect()
}

/// Contiguous rectangular blocks tiling the grid, each visited row-major,
/// block origins left-to-right then top-to-bottom. Returns the full seat
/// order; edge blocks clipped by the grid absorb the remainder.
fn group_order(grid: &Grid, spec: GroupSpec) -> Result<Vec<(usize, usize)>> {
    let rows = grid.rows();
    let cols = grid.cols();
    let assignable = grid.seats().filter(|s| !s.pinned).count();

    let group_size = match spec {
        GroupSpec::BySize(size) => size,
        GroupSpec::ByCount(count) => {
            if count == 0 || count > assignable {
                return Err(SeatingError::InsufficientSeats {
                    required: count.max(1),
                    available: assignable,
                });
            }
            assignable.div_ceil(count)
        }
    };
    if group_size == 0 || group_size > assignable {
        return Err(SeatingError::InsufficientSeats {
            required: group_size.max(1),
            available: assignable,
        });
    }

    // Block shape: near-square, clamped to the grid. group_size <= rows*cols
    // guarantees the clamped shape fits.
    let mut block_cols = ((group_size as f64).sqrt().ceil() as usize).min(cols);
    let mut block_rows = group_size.div_ceil(block_cols);
    if block_rows > rows {
        block_rows = rows;
        block_cols = group_size.div_ceil(block_rows).min(cols);
    }

    let mut order = Vec::with_capacity(rows * cols);
    let mut r0 = 0;
    while r0 < rows {
        let mut c0 = 0;
        while c0 < cols {
            for r in r0..(r0 + block_rows).min(rows) {
                for c in c0..(c0 + block_cols).min(cols) {
                    order.push((r, c));
                }
            }
            c0 += block_cols;
        }
        r0 += block_rows;
    }
    Ok(order)
}
